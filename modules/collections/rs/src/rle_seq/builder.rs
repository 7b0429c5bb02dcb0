use crate::error::{Error, Result};

use super::access::AccessPolicy;
use super::identical::Identical;
use super::rle_seq::RleSeq;
use super::run::Run;

/// Configures and constructs an [`RleSeq`].
///
/// The identity rule and the access policy are fixed at construction; sub-sequences extracted
/// from the result inherit both.
pub struct RleSeqBuilder<V, I: Identical<V>> {
    identical: I,
    access: AccessPolicy<V>,
}

impl<V: PartialEq> Default for RleSeqBuilder<V, fn(&V, &V) -> bool> {
    fn default() -> Self {
        Self {
            identical: PartialEq::eq,
            access: AccessPolicy::Shared,
        }
    }
}

impl<V, I: Identical<V>> RleSeqBuilder<V, I> {
    pub fn new(identical: I) -> Self {
        Self {
            identical,
            access: AccessPolicy::Shared,
        }
    }

    pub fn with_identical<NewI: Identical<V>>(self, identical: NewI) -> RleSeqBuilder<V, NewI> {
        RleSeqBuilder {
            identical,
            access: self.access,
        }
    }

    pub fn with_access(mut self, access: AccessPolicy<V>) -> Self {
        self.access = access;
        self
    }

    /// A sequence of `length` copies of `value`.
    pub fn filled(self, length: usize, value: V) -> Result<RleSeq<V, I>> {
        if length == 0 {
            return Err(Error::InvalidArgument(
                "sequence length must be greater than zero".to_string(),
            ));
        }
        Ok(RleSeq::from_parts(
            length,
            vec![Run::new(value, 0, length - 1)],
            self.identical,
            self.access,
        ))
    }

    /// Compresses a dense slice; the resulting length equals `dense.len()`.
    pub fn with_dense_values(self, dense: &[V]) -> Result<RleSeq<V, I>>
    where
        V: Clone,
    {
        if dense.is_empty() {
            return Err(Error::InvalidArgument(
                "can't build a sequence from an empty slice".to_string(),
            ));
        }

        let mut runs = Vec::new();
        let mut current = &dense[0];
        let mut start = 0;

        for (index, value) in dense.iter().enumerate().skip(1) {
            if !self.identical.identical(current, value) {
                runs.push(Run::new(current.clone(), start, index - 1));
                current = value;
                start = index;
            }
        }
        runs.push(Run::new(current.clone(), start, dense.len() - 1));

        Ok(RleSeq::from_parts(
            dense.len(),
            runs,
            self.identical,
            self.access,
        ))
    }

    /// Builds a sequence from `(value, run length)` pairs. Neighbouring identical values are
    /// collapsed, so the input doesn't have to be maximally compressed.
    pub fn with_rle_values(self, values: Vec<V>, lengths: Vec<usize>) -> Result<RleSeq<V, I>> {
        if values.len() != lengths.len() {
            return Err(Error::InvalidArgument(format!(
                "values and lengths must have the same length, got {} and {}",
                values.len(),
                lengths.len()
            )));
        }
        if let Some(position) = lengths.iter().position(|x| *x == 0) {
            return Err(Error::InvalidArgument(format!(
                "run #{position} has zero length"
            )));
        }

        let mut runs: Vec<Run<V>> = Vec::with_capacity(values.len());
        let mut start = 0;
        for (value, length) in values.into_iter().zip(lengths) {
            let end = start + length - 1;
            let extends_last = runs
                .last()
                .is_some_and(|last| self.identical.identical(last.value(), &value));
            match runs.last_mut() {
                Some(last) if extends_last => last.set_end(end),
                _ => runs.push(Run::new(value, start, end)),
            }
            start = end + 1;
        }

        if runs.is_empty() {
            return Err(Error::InvalidArgument(
                "can't build a sequence without runs".to_string(),
            ));
        }

        Ok(RleSeq::from_parts(start, runs, self.identical, self.access))
    }
}
