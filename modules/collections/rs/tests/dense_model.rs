use std::iter;

use proptest::prelude::*;
use runseq_collections_rs::{Direction, Result, RleSeq};

#[derive(Debug, Clone)]
enum Op {
    Set(usize, u8),
    SetRange(usize, usize, u8),
    SetRangeFrom(usize, Vec<u8>),
    Insert(usize, usize, u8),
    InsertFrom(usize, Vec<u8>),
    Remove(usize, usize),
}

fn op() -> impl Strategy<Value = Op> {
    let source = || prop::collection::vec(0..4u8, 1..8);
    prop_oneof![
        (0..24usize, 0..4u8).prop_map(|(index, value)| Op::Set(index, value)),
        (0..24usize, 0..24usize, 0..4u8)
            .prop_map(|(start, end, value)| Op::SetRange(start, end, value)),
        (0..24usize, source()).prop_map(|(start, source)| Op::SetRangeFrom(start, source)),
        (0..24usize, 0..8usize, 0..4u8)
            .prop_map(|(index, count, value)| Op::Insert(index, count, value)),
        (0..24usize, source()).prop_map(|(index, source)| Op::InsertFrom(index, source)),
        (0..24usize, 0..8usize).prop_map(|(index, count)| Op::Remove(index, count)),
    ]
}

/// Applies `op` to a plain vector with the same fixed-length semantics. Returns `false` if the
/// operation must be rejected.
fn apply_dense(dense: &mut Vec<u8>, op: &Op) -> bool {
    let length = dense.len();
    let structural = |index: usize, count: usize| count > 0 && index < length && index + count <= length;

    match op {
        Op::Set(index, value) => {
            if *index >= length {
                return false;
            }
            dense[*index] = *value;
        }
        Op::SetRange(start, end, value) => {
            if *start >= length || *end >= length || start > end {
                return false;
            }
            dense[*start..=*end].fill(*value);
        }
        Op::SetRangeFrom(start, source) => {
            if *start >= length || start + source.len() > length {
                return false;
            }
            dense[*start..start + source.len()].copy_from_slice(source);
        }
        Op::Insert(index, count, value) => {
            if !structural(*index, *count) {
                return false;
            }
            dense.splice(*index..*index, iter::repeat(*value).take(*count));
            dense.truncate(length);
        }
        Op::InsertFrom(index, source) => {
            if !structural(*index, source.len()) {
                return false;
            }
            dense.splice(*index..*index, source.iter().copied());
            dense.truncate(length);
        }
        Op::Remove(index, count) => {
            if !structural(*index, *count) {
                return false;
            }
            let last = dense[length - 1];
            dense.drain(*index..index + count);
            dense.extend(iter::repeat(last).take(*count));
        }
    }
    true
}

fn apply_rle(seq: &mut RleSeq<u8>, op: &Op) -> Result<()> {
    match op {
        Op::Set(index, value) => seq.set(*index, *value),
        Op::SetRange(start, end, value) => seq.set_range(*start, *end, *value),
        Op::SetRangeFrom(start, source) => {
            let source = RleSeq::builder().with_dense_values(source)?;
            seq.set_range_from(*start, &source)
        }
        Op::Insert(index, count, value) => seq.insert(*index, *count, *value),
        Op::InsertFrom(index, source) => {
            let source = RleSeq::builder().with_dense_values(source)?;
            seq.insert_from(*index, &source)
        }
        Op::Remove(index, count) => seq.remove(*index, *count),
    }
}

fn dense_positions(dense: &[u8], first: usize, last: usize, target: u8) -> Vec<usize> {
    let matches = |index: &usize| dense[*index] == target;
    if first <= last {
        (first..=last).filter(matches).collect()
    } else {
        (last..=first).rev().filter(matches).collect()
    }
}

proptest! {
    #[test]
    fn test_matches_dense_model(
        initial in prop::collection::vec(0..4u8, 1..20),
        ops in prop::collection::vec(op(), 1..40),
    ) {
        let mut dense = initial.clone();
        let mut seq = RleSeq::builder().with_dense_values(&initial).unwrap();

        for op in &ops {
            let accepted = apply_dense(&mut dense, op);
            let result = apply_rle(&mut seq, op);

            prop_assert_eq!(result.is_ok(), accepted, "{:?}", op);
            prop_assert!(seq.is_well_formed(), "{:?} broke the runs: {:?}", op, seq);
            prop_assert_eq!(seq.values().copied().collect::<Vec<_>>(), dense.clone());
        }

        for (index, value) in dense.iter().enumerate() {
            prop_assert_eq!(seq.get(index).unwrap(), *value);
        }
        for target in 0..4u8 {
            let length = dense.len();
            prop_assert_eq!(seq.count(&target), dense.iter().filter(|x| **x == target).count());
            prop_assert_eq!(
                seq.positions_of(&target, Direction::Forward).collect::<Vec<_>>(),
                dense_positions(&dense, 0, length - 1, target)
            );
            prop_assert_eq!(
                seq.positions_of(&target, Direction::Reversed).collect::<Vec<_>>(),
                dense_positions(&dense, length - 1, 0, target)
            );
        }
    }

    #[test]
    fn test_positions_in_window(
        values in prop::collection::vec(0..3u8, 1..30),
        first in 0..30usize,
        last in 0..30usize,
        target in 0..3u8,
    ) {
        let seq = RleSeq::builder().with_dense_values(&values).unwrap();
        match seq.positions_of_in(&target, first, last) {
            Ok(positions) => {
                prop_assert!(first < values.len() && last < values.len());
                prop_assert_eq!(
                    positions.collect::<Vec<_>>(),
                    dense_positions(&values, first, last, target)
                );
            }
            Err(_) => prop_assert!(first >= values.len() || last >= values.len()),
        };
    }

    #[test]
    fn test_get_range_then_set_range_restores(
        values in prop::collection::vec(0..3u8, 1..30),
        a in 0..30usize,
        b in 0..30usize,
    ) {
        let (a, b) = (a % values.len(), b % values.len());
        let (start, end) = (a.min(b), a.max(b));

        let original = RleSeq::builder().with_dense_values(&values).unwrap();
        let window = original.get_range(start, end).unwrap();
        prop_assert_eq!(
            window.values().copied().collect::<Vec<_>>(),
            values[start..=end].to_vec()
        );

        let mut seq = original.clone();
        seq.set_range(start, end, 7).unwrap();
        seq.set_range_from(start, &window).unwrap();
        prop_assert_eq!(seq, original);
    }
}
