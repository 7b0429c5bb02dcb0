pub use command::{Converter, Edit, SeqCommand};
pub use history::{History, LinearHistory, Undoable};
pub use undoable::UndoableRleSeq;

mod command;
mod history;
mod undoable;
