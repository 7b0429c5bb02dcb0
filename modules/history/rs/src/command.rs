use std::cell::RefCell;
use std::rc::Rc;

use derive_more::IsVariant;
use eyre::{eyre, Result};
use runseq_collections_rs::{Identical, RleSeq};

use crate::history::Undoable;

/// Value conversion applied to every value copied from a source range.
pub type Converter<V> = Rc<dyn Fn(&V) -> V>;

/// One mutation of a sequence together with the snapshot needed to revert it.
///
/// Snapshots are `None` until the edit has been applied once. `S` is the identity rule of the
/// source sequences copied by `CopyRange` and `InsertRange`.
#[derive(Clone, IsVariant)]
pub enum Edit<V, I: Identical<V> = fn(&V, &V) -> bool, S: Identical<V> = I> {
    SetValue {
        index: usize,
        value: V,
        previous: Option<V>,
    },
    FillRange {
        start: usize,
        end: usize,
        value: V,
        previous: Option<RleSeq<V, I>>,
    },
    CopyRange {
        start: usize,
        source: RleSeq<V, S>,
        convert: Option<Converter<V>>,
        previous: Option<RleSeq<V, I>>,
    },
    InsertValue {
        index: usize,
        count: usize,
        value: V,
        evicted: Option<RleSeq<V, I>>,
    },
    InsertRange {
        index: usize,
        source: RleSeq<V, S>,
        convert: Option<Converter<V>>,
        evicted: Option<RleSeq<V, I>>,
    },
    RemoveRange {
        index: usize,
        count: usize,
        removed: Option<RleSeq<V, I>>,
    },
}

impl<V, I: Identical<V>, S: Identical<V>> Edit<V, I, S> {
    pub fn set_value(index: usize, value: V) -> Self {
        Edit::SetValue {
            index,
            value,
            previous: None,
        }
    }

    pub fn fill_range(start: usize, end: usize, value: V) -> Self {
        Edit::FillRange {
            start,
            end,
            value,
            previous: None,
        }
    }

    pub fn copy_range(start: usize, source: RleSeq<V, S>, convert: Option<Converter<V>>) -> Self {
        Edit::CopyRange {
            start,
            source,
            convert,
            previous: None,
        }
    }

    pub fn insert_value(index: usize, count: usize, value: V) -> Self {
        Edit::InsertValue {
            index,
            count,
            value,
            evicted: None,
        }
    }

    pub fn insert_range(index: usize, source: RleSeq<V, S>, convert: Option<Converter<V>>) -> Self {
        Edit::InsertRange {
            index,
            source,
            convert,
            evicted: None,
        }
    }

    pub fn remove_range(index: usize, count: usize) -> Self {
        Edit::RemoveRange {
            index,
            count,
            removed: None,
        }
    }

    /// True once the edit has been applied and holds its inverse snapshot.
    pub fn is_applied(&self) -> bool {
        match self {
            Edit::SetValue { previous, .. } => previous.is_some(),
            Edit::FillRange { previous, .. } | Edit::CopyRange { previous, .. } => {
                previous.is_some()
            }
            Edit::InsertValue { evicted, .. } | Edit::InsertRange { evicted, .. } => {
                evicted.is_some()
            }
            Edit::RemoveRange { removed, .. } => removed.is_some(),
        }
    }
}

/// An [`Edit`] bound to the sequence it mutates. The sequence is shared with the owner of the
/// command, typically an [`UndoableRleSeq`](crate::UndoableRleSeq).
pub struct SeqCommand<V, I: Identical<V> = fn(&V, &V) -> bool, S: Identical<V> = I> {
    target: Rc<RefCell<RleSeq<V, I>>>,
    edit: Edit<V, I, S>,
}

impl<V: Clone, I: Identical<V> + Clone, S: Identical<V>> SeqCommand<V, I, S> {
    pub fn new(target: Rc<RefCell<RleSeq<V, I>>>, edit: Edit<V, I, S>) -> Self {
        Self { target, edit }
    }

    pub fn edit(&self) -> &Edit<V, I, S> {
        &self.edit
    }

    pub fn target(&self) -> &Rc<RefCell<RleSeq<V, I>>> {
        &self.target
    }

    /// Performs the edit, capturing its inverse snapshot first. Arguments are validated before
    /// anything is touched, so a failed call leaves both the sequence and the command unchanged.
    pub fn apply(&mut self) -> Result<()> {
        let mut seq = self.target.borrow_mut();
        let length = seq.len();

        match &mut self.edit {
            Edit::SetValue {
                index,
                value,
                previous,
            } => {
                let old = seq.get_ref(*index)?.clone();
                seq.set(*index, value.clone())?;
                *previous = Some(old);
            }
            Edit::FillRange {
                start,
                end,
                value,
                previous,
            } => {
                let old = seq.get_range(*start, *end)?;
                seq.set_range(*start, *end, value.clone())?;
                *previous = Some(old);
            }
            Edit::CopyRange {
                start,
                source,
                convert,
                previous,
            } => {
                let end = seq.check_span(*start, source.len())?;
                let old = seq.get_range(*start, end)?;
                match convert {
                    Some(convert) => seq.set_range_with(*start, source, |value| convert(value))?,
                    None => seq.set_range_from(*start, source)?,
                }
                *previous = Some(old);
            }
            Edit::InsertValue {
                index,
                count,
                value,
                evicted,
            } => {
                seq.check_index_and_count(*index, *count)?;
                let tail = seq.get_range(length - *count, length - 1)?;
                seq.insert(*index, *count, value.clone())?;
                *evicted = Some(tail);
            }
            Edit::InsertRange {
                index,
                source,
                convert,
                evicted,
            } => {
                let count = source.len();
                seq.check_index_and_count(*index, count)?;
                let tail = seq.get_range(length - count, length - 1)?;
                match convert {
                    Some(convert) => seq.insert_with(*index, source, |value| convert(value))?,
                    None => seq.insert_from(*index, source)?,
                }
                *evicted = Some(tail);
            }
            Edit::RemoveRange {
                index,
                count,
                removed,
            } => {
                seq.check_index_and_count(*index, *count)?;
                let window = seq.get_range(*index, *index + *count - 1)?;
                seq.remove(*index, *count)?;
                *removed = Some(window);
            }
        }
        Ok(())
    }
}

fn snapshot<T>(saved: &Option<T>) -> Result<&T> {
    saved
        .as_ref()
        .ok_or_else(|| eyre!("Edit can't be undone before it was applied"))
}

impl<V: Clone, I: Identical<V> + Clone, S: Identical<V>> Undoable for SeqCommand<V, I, S> {
    fn undo(&mut self) -> Result<()> {
        let mut seq = self.target.borrow_mut();
        let length = seq.len();

        match &self.edit {
            Edit::SetValue {
                index, previous, ..
            } => seq.set(*index, snapshot(previous)?.clone())?,
            Edit::FillRange {
                start, previous, ..
            }
            | Edit::CopyRange {
                start, previous, ..
            } => seq.set_range_from(*start, snapshot(previous)?)?,
            Edit::InsertValue {
                index,
                count,
                evicted,
                ..
            } => {
                let evicted = snapshot(evicted)?;
                seq.remove(*index, *count)?;
                seq.set_range_from(length - *count, evicted)?;
            }
            Edit::InsertRange {
                index, evicted, ..
            } => {
                let evicted = snapshot(evicted)?;
                seq.remove(*index, evicted.len())?;
                seq.set_range_from(length - evicted.len(), evicted)?;
            }
            Edit::RemoveRange { index, removed, .. } => {
                seq.insert_from(*index, snapshot(removed)?)?
            }
        }
        Ok(())
    }

    fn redo(&mut self) -> Result<()> {
        self.apply()
    }
}
