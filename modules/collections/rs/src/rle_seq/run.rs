use std::cmp::Ordering;

use derive_getters::Dissolve;
use derive_more::Constructor;

/// A maximal stretch of positions `[start, end]` (both inclusive) holding one value.
#[derive(Clone, PartialEq, Eq, Debug, Hash, Constructor, Dissolve)]
pub struct Run<V> {
    value: V,
    start: usize,
    end: usize,
}

impl<V> Run<V> {
    #[inline(always)]
    pub fn value(&self) -> &V {
        &self.value
    }

    #[inline(always)]
    pub fn start(&self) -> usize {
        self.start
    }

    #[inline(always)]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of positions covered by the run, always at least one.
    #[inline(always)]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    #[inline(always)]
    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }

    /// Orders the run relative to `index`: `Less` if the run lies entirely before it, `Greater`
    /// if entirely after, `Equal` if the run covers it.
    #[inline]
    pub(crate) fn cmp_position(&self, index: usize) -> Ordering {
        if self.end < index {
            Ordering::Less
        } else if self.start > index {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    #[inline]
    pub(crate) fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    #[inline]
    pub(crate) fn set_start(&mut self, start: usize) {
        self.start = start;
    }

    #[inline]
    pub(crate) fn set_end(&mut self, end: usize) {
        self.end = end;
    }

    #[inline]
    pub(crate) fn shift_forward(&mut self, offset: usize) {
        self.start += offset;
        self.end += offset;
    }

    #[inline]
    pub(crate) fn shift_backward(&mut self, offset: usize) {
        self.start -= offset;
        self.end -= offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_ordering() {
        let run = Run::new('x', 3, 5);
        assert_eq!(run.len(), 3);
        for (index, expected) in [
            (0, Ordering::Greater),
            (2, Ordering::Greater),
            (3, Ordering::Equal),
            (5, Ordering::Equal),
            (6, Ordering::Less),
        ] {
            assert_eq!(run.cmp_position(index), expected, "index {index}");
            assert_eq!(run.contains(index), expected.is_eq());
        }
    }

    #[test]
    fn test_shift() {
        let mut run = Run::new(1u8, 2, 4);
        run.shift_forward(3);
        assert_eq!(run.clone().dissolve(), (1, 5, 7));
        run.shift_backward(5);
        assert_eq!(run.dissolve(), (1, 0, 2));
    }
}
