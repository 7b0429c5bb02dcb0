use std::fmt::{self, Debug};
use std::iter;

use itertools::Itertools;

use crate::error::{Error, Result};

use super::access::AccessPolicy;
use super::builder::RleSeqBuilder;
use super::identical::Identical;
use super::iter::{Direction, MatchingIndices, Values};
use super::locate::Locator;
use super::run::Run;

/// A fixed-length sequence stored as maximal runs of identical values.
///
/// Invariants, restored by every public method before it returns:
/// * runs are sorted and contiguous, the first starts at `0` and the last ends at `len() - 1`;
/// * neighbouring runs never hold identical values (as judged by `I`).
///
/// Positions are mapped to runs through a most-recently-used hint backed by a binary search, so
/// point access is O(1) for local access patterns and O(log runs) otherwise.
#[derive(Clone)]
pub struct RleSeq<V, I: Identical<V> = fn(&V, &V) -> bool> {
    length: usize,
    runs: Vec<Run<V>>,
    locator: Locator,
    identical: I,
    access: AccessPolicy<V>,
}

impl<V: PartialEq> RleSeq<V> {
    /// A sequence of `length` copies of `value`, using `PartialEq` as the run identity.
    pub fn new(length: usize, value: V) -> Result<Self> {
        RleSeqBuilder::default().filled(length, value)
    }

    pub fn builder() -> RleSeqBuilder<V, fn(&V, &V) -> bool> {
        RleSeqBuilder::default()
    }
}

impl<V, I: Identical<V>> RleSeq<V, I> {
    pub(crate) fn from_parts(
        length: usize,
        runs: Vec<Run<V>>,
        identical: I,
        access: AccessPolicy<V>,
    ) -> Self {
        let seq = Self {
            length,
            runs,
            locator: Locator::default(),
            identical,
            access,
        };
        debug_assert!(seq.is_well_formed());
        seq
    }

    #[inline]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Index of the most recently used run. Exposed for diagnostics only.
    #[inline]
    pub fn mru(&self) -> usize {
        self.locator.mru()
    }

    pub fn runs(&self) -> impl ExactSizeIterator<Item = &Run<V>> + Clone {
        self.runs.iter()
    }

    pub fn access(&self) -> AccessPolicy<V> {
        self.access
    }

    pub fn identical(&self, first: &V, second: &V) -> bool {
        self.identical.identical(first, second)
    }

    /// Checks that the runs tile `[0, len())` and that no neighbours are identical.
    pub fn is_well_formed(&self) -> bool {
        let (Some(first), Some(last)) = (self.runs.first(), self.runs.last()) else {
            return false;
        };

        first.start() == 0
            && last.end() + 1 == self.length
            && self.runs.iter().all(|run| run.start() <= run.end())
            && self.runs.iter().tuple_windows().all(|(prev, next)| {
                prev.end() + 1 == next.start() && !self.identical(prev.value(), next.value())
            })
    }

    pub fn check_index(&self, index: usize, name: &'static str) -> Result<()> {
        if index < self.length {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange {
                name,
                index,
                length: self.length,
            })
        }
    }

    /// Validates an inclusive `[start, end]` window.
    pub fn check_range(&self, start: usize, end: usize) -> Result<()> {
        self.check_index(start, "start")?;
        self.check_index(end, "end")?;
        if start > end {
            return Err(Error::InvalidArgument(format!(
                "start ({start}) is greater than end ({end})"
            )));
        }
        Ok(())
    }

    /// Validates the arguments of a structural edit (`insert`/`remove`).
    pub fn check_index_and_count(&self, index: usize, count: usize) -> Result<()> {
        if count == 0 {
            return Err(Error::InvalidArgument(
                "count must be greater than zero".to_string(),
            ));
        }
        self.check_index(index, "index")?;
        match index.checked_add(count) {
            Some(end) if end <= self.length => Ok(()),
            _ => Err(Error::InvalidArgument(format!(
                "index ({index}) + count ({count}) exceeds the sequence length ({})",
                self.length
            ))),
        }
    }

    /// Validates a window of `count` positions starting at `start`, returning its last position.
    pub fn check_span(&self, start: usize, count: usize) -> Result<usize> {
        if count == 0 {
            return Err(Error::InvalidArgument(
                "count must be greater than zero".to_string(),
            ));
        }
        self.check_index(start, "start")?;
        let end = start.checked_add(count - 1).ok_or(Error::IndexOutOfRange {
            name: "end",
            index: usize::MAX,
            length: self.length,
        })?;
        self.check_index(end, "end")?;
        Ok(end)
    }

    #[inline]
    fn locate(&self, index: usize) -> usize {
        self.locator.locate(&self.runs, index)
    }

    /// Borrow the value stored at `index`.
    pub fn get_ref(&self, index: usize) -> Result<&V> {
        self.check_index(index, "index")?;
        Ok(self.runs[self.locate(index)].value())
    }

    /// An owned value for `index`, produced according to the configured [`AccessPolicy`].
    pub fn get(&self, index: usize) -> Result<V>
    where
        V: Clone,
    {
        self.access.read(self.get_ref(index)?)
    }

    /// Number of positions holding a value identical to `value`.
    pub fn count(&self, value: &V) -> usize {
        self.runs
            .iter()
            .filter(|run| self.identical(value, run.value()))
            .map(Run::len)
            .sum()
    }

    /// Number of positions whose value satisfies `predicate`.
    pub fn count_where(&self, mut predicate: impl FnMut(&V) -> bool) -> usize {
        self.runs
            .iter()
            .filter(|run| predicate(run.value()))
            .map(Run::len)
            .sum()
    }

    pub fn values(&self) -> Values<'_, V> {
        Values::new(&self.runs, self.length)
    }

    /// Positions satisfying `predicate` over the whole sequence.
    pub fn positions<P: FnMut(&V) -> bool>(
        &self,
        predicate: P,
        direction: Direction,
    ) -> MatchingIndices<'_, V, P> {
        let (first, last) = match direction {
            Direction::Forward => (0, self.length - 1),
            Direction::Reversed => (self.length - 1, 0),
        };
        MatchingIndices::new(&self.runs, self.locate(first), first, last, predicate)
    }

    /// Positions satisfying `predicate`, walking from `first` to `last` inclusive. The walk goes
    /// backwards when `first > last`.
    pub fn positions_in<P: FnMut(&V) -> bool>(
        &self,
        predicate: P,
        first: usize,
        last: usize,
    ) -> Result<MatchingIndices<'_, V, P>> {
        self.check_index(first, "start")?;
        self.check_index(last, "end")?;
        Ok(MatchingIndices::new(
            &self.runs,
            self.locate(first),
            first,
            last,
            predicate,
        ))
    }

    /// Positions holding a value identical to `value`.
    pub fn positions_of<'a>(
        &'a self,
        value: &'a V,
        direction: Direction,
    ) -> MatchingIndices<'a, V, impl FnMut(&V) -> bool + Clone + 'a> {
        self.positions(move |x| self.identical(value, x), direction)
    }

    pub fn positions_of_in<'a>(
        &'a self,
        value: &'a V,
        first: usize,
        last: usize,
    ) -> Result<MatchingIndices<'a, V, impl FnMut(&V) -> bool + Clone + 'a>> {
        self.positions_in(move |x| self.identical(value, x), first, last)
    }

    /// Collapses run `at` into its predecessor if they are identical.
    fn merge_with_previous(&mut self, at: usize) -> bool {
        if at == 0 || at >= self.runs.len() {
            return false;
        }
        if !self.identical(self.runs[at - 1].value(), self.runs[at].value()) {
            return false;
        }

        let end = self.runs[at].end();
        self.runs[at - 1].set_end(end);
        self.runs.remove(at);
        self.locator.remember(at - 1);
        true
    }

    /// Collapses run `at` into its successor if they are identical.
    fn merge_with_next(&mut self, at: usize) -> bool {
        if at + 1 >= self.runs.len() {
            return false;
        }
        if !self.identical(self.runs[at + 1].value(), self.runs[at].value()) {
            return false;
        }

        let start = self.runs[at].start();
        self.runs[at + 1].set_start(start);
        self.runs.remove(at);
        true
    }
}

impl<V: Clone, I: Identical<V>> RleSeq<V, I> {
    pub fn set(&mut self, index: usize, value: V) -> Result<()> {
        self.check_index(index, "index")?;

        let at = self.locate(index);
        let run = &mut self.runs[at];
        if self.identical.identical(run.value(), &value) {
            return Ok(());
        }

        if run.len() == 1 {
            *run.value_mut() = value;
            // A merge with the predecessor moves the current run one slot to the left
            if self.merge_with_previous(at) {
                self.merge_with_next(at - 1);
            } else {
                self.merge_with_next(at);
            }
        } else if index == run.start() {
            run.set_start(index + 1);
            self.runs.insert(at, Run::new(value, index, index));
            self.merge_with_previous(at);
        } else if index == run.end() {
            run.set_end(index - 1);
            self.runs.insert(at + 1, Run::new(value, index, index));
            self.locator.remember(at + 1);
            self.merge_with_next(at + 1);
        } else {
            // Both neighbours keep the old value, nothing to merge
            let tail = Run::new(run.value().clone(), index + 1, run.end());
            run.set_end(index - 1);
            self.runs
                .splice(at + 1..at + 1, [Run::new(value, index, index), tail]);
            self.locator.remember(at + 1);
        }

        debug_assert!(self.is_well_formed());
        Ok(())
    }

    /// Copy of the inclusive window `[start, end]`, re-based to start at zero.
    pub fn get_range(&self, start: usize, end: usize) -> Result<RleSeq<V, I>>
    where
        I: Clone,
    {
        self.check_range(start, end)?;

        let first = self.locate(start);
        let runs = self.runs[first..]
            .iter()
            .take_while(|run| run.start() <= end)
            .map(|run| {
                Run::new(
                    run.value().clone(),
                    run.start().max(start) - start,
                    run.end().min(end) - start,
                )
            })
            .collect();

        Ok(RleSeq::from_parts(
            end - start + 1,
            runs,
            self.identical.clone(),
            self.access,
        ))
    }

    /// Overwrites the inclusive window `[start, end]` with `value`.
    pub fn set_range(&mut self, start: usize, end: usize, value: V) -> Result<()> {
        self.check_range(start, end)?;

        let at = self.cut(start, end);
        self.place(at, iter::once(Run::new(value, start, end)));
        Ok(())
    }

    /// Overwrites `source.len()` positions starting at `start` with a copy of `source`.
    pub fn set_range_from<SrcI: Identical<V>>(
        &mut self,
        start: usize,
        source: &RleSeq<V, SrcI>,
    ) -> Result<()> {
        self.set_range_with(start, source, V::clone)
    }

    /// Like [`set_range_from`](Self::set_range_from), but every copied value is passed through
    /// `convert`. Values already stored in `self` are never converted.
    pub fn set_range_with<SrcI: Identical<V>>(
        &mut self,
        start: usize,
        source: &RleSeq<V, SrcI>,
        mut convert: impl FnMut(&V) -> V,
    ) -> Result<()> {
        let end = self.check_span(start, source.len())?;

        let at = self.cut(start, end);
        self.place(
            at,
            source.runs.iter().map(|run| {
                Run::new(
                    convert(run.value()),
                    run.start() + start,
                    run.end() + start,
                )
            }),
        );
        Ok(())
    }

    pub fn insert_one(&mut self, index: usize, value: V) -> Result<()> {
        self.insert(index, 1, value)
    }

    /// Inserts `count` copies of `value` at `index`. The length is fixed, so the last `count`
    /// values fall off the end of the sequence.
    pub fn insert(&mut self, index: usize, count: usize, value: V) -> Result<()> {
        self.check_index_and_count(index, count)?;

        let at = self.open_gap(index, count);
        self.place(at, iter::once(Run::new(value, index, index + count - 1)));
        Ok(())
    }

    pub fn insert_from<SrcI: Identical<V>>(
        &mut self,
        index: usize,
        source: &RleSeq<V, SrcI>,
    ) -> Result<()> {
        self.insert_with(index, source, V::clone)
    }

    /// Inserts a converted copy of `source` at `index`, discarding `source.len()` values at the
    /// end of the sequence.
    pub fn insert_with<SrcI: Identical<V>>(
        &mut self,
        index: usize,
        source: &RleSeq<V, SrcI>,
        mut convert: impl FnMut(&V) -> V,
    ) -> Result<()> {
        self.check_index_and_count(index, source.len())?;

        let at = self.open_gap(index, source.len());
        self.place(
            at,
            source.runs.iter().map(|run| {
                Run::new(
                    convert(run.value()),
                    run.start() + index,
                    run.end() + index,
                )
            }),
        );
        Ok(())
    }

    pub fn remove_one(&mut self, index: usize) -> Result<()> {
        self.remove(index, 1)
    }

    /// Removes `count` positions starting at `index`. Everything after the window moves back and
    /// the freed tail is filled with the value that was stored at the last position.
    pub fn remove(&mut self, index: usize, count: usize) -> Result<()> {
        self.check_index_and_count(index, count)?;

        let length = self.length;
        let backfill = self.runs[self.runs.len() - 1].value().clone();

        let at = self.cut(index, index + count - 1);
        if at == self.runs.len() {
            self.runs.push(Run::new(backfill, index, length - 1));
        } else {
            for run in &mut self.runs[at..] {
                run.shift_backward(count);
            }
            let last = self.runs.len() - 1;
            self.runs[last].set_end(length - 1);
        }
        log::debug!(
            "Removed [{index}, {}], tail [{}, {}] backfilled with the last value",
            index + count - 1,
            length - count,
            length - 1
        );

        self.merge_with_previous(at);
        debug_assert!(self.is_well_formed());
        Ok(())
    }

    /// Removes the window `[start, end]` from the run list, truncating runs that overlap it
    /// partially. Returns the index where runs for the window should be placed.
    fn cut(&mut self, start: usize, end: usize) -> usize {
        let mut first = self.locate(start);
        let mut last = self.locate(end);
        if first == last {
            return self.cut_within(first, start, end);
        }

        if self.runs[first].start() < start {
            self.runs[first].set_end(start - 1);
            first += 1;
        }
        if self.runs[last].end() > end {
            self.runs[last].set_start(end + 1);
            last -= 1;
        }
        if first <= last {
            self.runs.drain(first..=last);
        }
        first
    }

    fn cut_within(&mut self, at: usize, start: usize, end: usize) -> usize {
        let run = &mut self.runs[at];
        if run.start() == start {
            if run.end() == end {
                self.runs.remove(at);
            } else {
                run.set_start(end + 1);
            }
            return at;
        }

        if run.end() > end {
            let tail = Run::new(run.value().clone(), end + 1, run.end());
            run.set_end(start - 1);
            self.runs.insert(at + 1, tail);
        } else {
            run.set_end(start - 1);
        }
        at + 1
    }

    /// Shifts everything from `index` onwards `count` positions forward, dropping what no longer
    /// fits. Returns the index where runs for `[index, index + count)` should be placed.
    fn open_gap(&mut self, index: usize, count: usize) -> usize {
        let mut at = self.locate(index);

        let run = &mut self.runs[at];
        if run.start() < index {
            let tail = Run::new(run.value().clone(), index, run.end());
            run.set_end(index - 1);
            at += 1;
            self.runs.insert(at, tail);
        }

        let length = self.length;
        let keep = self.runs[at..]
            .iter()
            .position(|run| run.start() + count >= length)
            .map_or(self.runs.len(), |offset| at + offset);
        if keep < self.runs.len() {
            log::debug!(
                "Insert of {count} at {index} discarded {} trailing run(s)",
                self.runs.len() - keep
            );
            self.runs.truncate(keep);
        }

        for run in &mut self.runs[at..] {
            let end = (run.end() + count).min(length - 1);
            run.shift_forward(count);
            run.set_end(end);
        }
        at
    }

    /// Inserts runs at `at`, collapsing identical neighbours among them and at both edges.
    fn place(&mut self, at: usize, runs: impl IntoIterator<Item = Run<V>>) {
        let mut incoming: Vec<Run<V>> = Vec::new();
        for run in runs {
            if let Some(last) = incoming
                .last_mut()
                .filter(|last| self.identical.identical(last.value(), run.value()))
            {
                last.set_end(run.end());
                continue;
            }
            incoming.push(run);
        }

        let placed = incoming.len();
        self.runs.splice(at..at, incoming);

        self.merge_with_next(at + placed - 1);
        self.merge_with_previous(at);
        debug_assert!(self.is_well_formed());
    }
}

/// Sequences are equal when they have the same length and the same runs.
impl<V: PartialEq, I: Identical<V>, OtherI: Identical<V>> PartialEq<RleSeq<V, OtherI>>
    for RleSeq<V, I>
{
    fn eq(&self, other: &RleSeq<V, OtherI>) -> bool {
        self.length == other.length && self.runs == other.runs
    }
}

impl<V: Debug, I: Identical<V>> Debug for RleSeq<V, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RleSeq")
            .field("length", &self.length)
            .field("runs", &self.runs)
            .field("access", &self.access)
            .finish()
    }
}
