/// Decides whether two values belong to the same run.
///
/// The rule is fixed when an [`RleSeq`](super::RleSeq) is built and acts as the sequence's notion
/// of equality everywhere:
/// * mutations collapse neighbouring runs it considers identical, keeping the value of the run
///   that was already in place (or the first of the incoming runs);
/// * [`count`](super::RleSeq::count) and [`positions_of`](super::RleSeq::positions_of) match
///   positions through it, not through `PartialEq`;
/// * `set` of an identical value is a no-op.
///
/// It must behave like an equivalence relation, otherwise the compression invariants can't be
/// maintained. Any `Fn(&T, &T) -> bool` qualifies; the default is `PartialEq::eq`.
pub trait Identical<T> {
    fn identical(&self, first: &T, second: &T) -> bool;
}

impl<T, F> Identical<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn identical(&self, first: &T, second: &T) -> bool {
        self(first, second)
    }
}
