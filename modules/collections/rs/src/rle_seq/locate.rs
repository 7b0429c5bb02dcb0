use std::cell::Cell;

use super::run::Run;

/// Maps absolute positions to the run that owns them.
///
/// The most recently resolved run is remembered as a hint. The hint may go stale after any edit of
/// the run list, so it is re-validated on every lookup before being trusted.
#[derive(Clone, Debug, Default)]
pub(crate) struct Locator {
    mru: Cell<usize>,
}

impl Locator {
    #[inline]
    pub fn mru(&self) -> usize {
        self.mru.get()
    }

    #[inline]
    pub fn remember(&self, run: usize) {
        self.mru.set(run);
    }

    /// Returns the index of the run covering `index`. The caller guarantees that the runs tile a
    /// window containing `index`.
    pub fn locate<V>(&self, runs: &[Run<V>], index: usize) -> usize {
        let mru = self.mru.get();
        if runs.get(mru).is_some_and(|run| run.contains(index)) {
            return mru;
        }

        let found = match runs.binary_search_by(|run| run.cmp_position(index)) {
            Ok(found) => found,
            Err(_) => unreachable!("Runs don't cover position {index}"),
        };
        log::trace!("MRU run {mru} missed position {index}, resolved to run {found}");

        self.mru.set(found);
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runs() -> Vec<Run<u8>> {
        vec![Run::new(1, 0, 2), Run::new(2, 3, 3), Run::new(3, 4, 9)]
    }

    #[test]
    fn test_locate_every_position() {
        let runs = runs();
        let locator = Locator::default();
        for (index, expected) in [(0, 0), (2, 0), (3, 1), (4, 2), (9, 2), (1, 0), (7, 2)] {
            assert_eq!(locator.locate(&runs, index), expected);
            assert_eq!(locator.mru(), expected);
        }
    }

    #[test]
    fn test_locate_with_stale_hint() {
        let runs = runs();
        let locator = Locator::default();

        // Out of bounds hint falls back to the binary search
        locator.remember(17);
        assert_eq!(locator.locate(&runs, 5), 2);
        assert_eq!(locator.mru(), 2);

        // Valid hint that doesn't cover the position
        locator.remember(0);
        assert_eq!(locator.locate(&runs, 3), 1);
        assert_eq!(locator.mru(), 1);
    }
}
