use std::cell::{Ref, RefCell};
use std::rc::Rc;

use eyre::Result;
use runseq_collections_rs::{Identical, RleSeq};

use crate::command::{Converter, Edit, SeqCommand};
use crate::history::History;

/// A [`RleSeq`] whose mutations are recorded in a [`History`].
///
/// Every mutating call is validated and executed immediately, and only then registered with the
/// history. Rejected calls change nothing and register nothing. Reads go through [`seq`](Self::seq).
pub struct UndoableRleSeq<V, H: History, I: Identical<V> = fn(&V, &V) -> bool> {
    seq: Rc<RefCell<RleSeq<V, I>>>,
    history: H,
}

impl<V, H, I> UndoableRleSeq<V, H, I>
where
    V: Clone + 'static,
    H: History,
    I: Identical<V> + Clone + 'static,
{
    pub fn new(seq: RleSeq<V, I>, history: H) -> Self {
        Self::shared(Rc::new(RefCell::new(seq)), history)
    }

    /// Wraps a sequence that other owners may also hold.
    pub fn shared(seq: Rc<RefCell<RleSeq<V, I>>>, history: H) -> Self {
        Self { seq, history }
    }

    /// Borrow the underlying sequence for reading.
    ///
    /// The borrow must be released before the next mutation or history step, otherwise the
    /// `RefCell` panics.
    pub fn seq(&self) -> Ref<'_, RleSeq<V, I>> {
        self.seq.borrow()
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    pub fn into_parts(self) -> (Rc<RefCell<RleSeq<V, I>>>, H) {
        (self.seq, self.history)
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.seq.borrow().len()
    }

    pub fn get(&self, index: usize) -> Result<V> {
        Ok(self.seq.borrow().get(index)?)
    }

    pub fn undo(&mut self) -> Result<bool> {
        self.history.undo()
    }

    pub fn redo(&mut self) -> Result<bool> {
        self.history.redo()
    }

    fn execute<S>(&mut self, edit: Edit<V, I, S>) -> Result<()>
    where
        S: Identical<V> + Clone + 'static,
    {
        let mut command = SeqCommand::new(self.seq.clone(), edit);
        command.apply()?;
        self.history.add(Box::new(command));
        Ok(())
    }

    pub fn set(&mut self, index: usize, value: V) -> Result<()> {
        self.execute::<I>(Edit::set_value(index, value))
    }

    pub fn set_range(&mut self, start: usize, end: usize, value: V) -> Result<()> {
        self.execute::<I>(Edit::fill_range(start, end, value))
    }

    /// Copies `source` over the window starting at `start`. The source may use its own identity
    /// rule; copied runs are collapsed by the rule of this sequence.
    pub fn set_range_from<S>(&mut self, start: usize, source: &RleSeq<V, S>) -> Result<()>
    where
        S: Identical<V> + Clone + 'static,
    {
        self.execute(Edit::copy_range(start, source.clone(), None))
    }

    pub fn set_range_with<S>(
        &mut self,
        start: usize,
        source: &RleSeq<V, S>,
        convert: impl Fn(&V) -> V + 'static,
    ) -> Result<()>
    where
        S: Identical<V> + Clone + 'static,
    {
        let convert: Converter<V> = Rc::new(convert);
        self.execute(Edit::copy_range(start, source.clone(), Some(convert)))
    }

    pub fn insert_one(&mut self, index: usize, value: V) -> Result<()> {
        self.insert(index, 1, value)
    }

    pub fn insert(&mut self, index: usize, count: usize, value: V) -> Result<()> {
        self.execute::<I>(Edit::insert_value(index, count, value))
    }

    pub fn insert_from<S>(&mut self, index: usize, source: &RleSeq<V, S>) -> Result<()>
    where
        S: Identical<V> + Clone + 'static,
    {
        self.execute(Edit::insert_range(index, source.clone(), None))
    }

    pub fn insert_with<S>(
        &mut self,
        index: usize,
        source: &RleSeq<V, S>,
        convert: impl Fn(&V) -> V + 'static,
    ) -> Result<()>
    where
        S: Identical<V> + Clone + 'static,
    {
        let convert: Converter<V> = Rc::new(convert);
        self.execute(Edit::insert_range(index, source.clone(), Some(convert)))
    }

    pub fn remove_one(&mut self, index: usize) -> Result<()> {
        self.remove(index, 1)
    }

    pub fn remove(&mut self, index: usize, count: usize) -> Result<()> {
        self.execute::<I>(Edit::remove_range(index, count))
    }
}
