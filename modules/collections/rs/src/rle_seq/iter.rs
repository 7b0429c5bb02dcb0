use std::iter::FusedIterator;
use std::slice;

use derive_more::IsVariant;

use super::run::Run;

/// Walking order for index iteration.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, IsVariant)]
pub enum Direction {
    Forward,
    Reversed,
}

/// Every value of a sequence in index order, each run's value repeated once per position.
#[derive(Clone, Debug)]
pub struct Values<'a, V> {
    runs: slice::Iter<'a, Run<V>>,
    current: Option<&'a Run<V>>,
    position: usize,
    remaining: usize,
}

impl<'a, V> Values<'a, V> {
    pub(crate) fn new(runs: &'a [Run<V>], length: usize) -> Self {
        Self {
            runs: runs.iter(),
            current: None,
            position: 0,
            remaining: length,
        }
    }
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(run) = self.current {
                if self.position <= run.end() {
                    self.position += 1;
                    self.remaining -= 1;
                    return Some(run.value());
                }
            }
            self.current = Some(self.runs.next()?);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Values<'_, V> {}

impl<V> FusedIterator for Values<'_, V> {}

/// Positions whose values satisfy a predicate, between two inclusive bounds.
///
/// Runs that don't match are skipped as a whole, so the cost is proportional to the number of
/// visited runs plus the number of yielded positions.
#[derive(Clone)]
pub struct MatchingIndices<'a, V, P> {
    runs: &'a [Run<V>],
    matches: P,
    // Run that holds `cursor`
    run: usize,
    cursor: usize,
    last: usize,
    direction: Direction,
    exhausted: bool,
}

impl<'a, V, P: FnMut(&V) -> bool> MatchingIndices<'a, V, P> {
    pub(crate) fn new(runs: &'a [Run<V>], run: usize, first: usize, last: usize, matches: P) -> Self {
        debug_assert!(runs[run].contains(first));
        Self {
            runs,
            matches,
            run,
            cursor: first,
            last,
            direction: if first > last {
                Direction::Reversed
            } else {
                Direction::Forward
            },
            exhausted: false,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl<V, P: FnMut(&V) -> bool> Iterator for MatchingIndices<'_, V, P> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let runs = self.runs;
        while !self.exhausted {
            let run = &runs[self.run];
            let matched = (self.matches)(run.value());

            match self.direction {
                Direction::Forward => {
                    if matched {
                        let found = self.cursor;
                        if found == self.last {
                            self.exhausted = true;
                        } else {
                            self.cursor += 1;
                            if self.cursor > run.end() {
                                self.run += 1;
                            }
                        }
                        return Some(found);
                    }

                    if run.end() >= self.last {
                        self.exhausted = true;
                    } else {
                        self.cursor = run.end() + 1;
                        self.run += 1;
                    }
                }
                Direction::Reversed => {
                    if matched {
                        let found = self.cursor;
                        if found == self.last {
                            self.exhausted = true;
                        } else {
                            self.cursor -= 1;
                            if self.cursor < run.start() {
                                self.run -= 1;
                            }
                        }
                        return Some(found);
                    }

                    if run.start() <= self.last {
                        self.exhausted = true;
                    } else {
                        self.cursor = run.start() - 1;
                        self.run -= 1;
                    }
                }
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.exhausted {
            (0, Some(0))
        } else {
            (0, Some(self.cursor.abs_diff(self.last) + 1))
        }
    }
}

impl<V, P: FnMut(&V) -> bool> FusedIterator for MatchingIndices<'_, V, P> {}
