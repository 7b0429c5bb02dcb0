use std::cell::RefCell;
use std::fmt::{self, Debug};
use std::num::NonZeroUsize;
use std::rc::Rc;

use eyre::Result;
use impl_tools::autoimpl;

/// An already executed edit that can be reverted and re-applied.
///
/// Calls must alternate strictly: `undo` is only valid after the edit has been applied (or
/// redone), `redo` only after an `undo`. Ordering is the job of the [`History`].
#[autoimpl(for <T: trait + ?Sized> &mut T, Box<T>)]
pub trait Undoable {
    fn undo(&mut self) -> Result<()>;

    fn redo(&mut self) -> Result<()>;
}

/// A stack of executed commands. `add` only registers a command, it never runs it.
#[autoimpl(for <H: trait + ?Sized> &mut H, Box<H>)]
pub trait History {
    fn add(&mut self, command: Box<dyn Undoable>);

    /// Reverts the most recent applied command. Returns `false` if there was nothing to undo.
    fn undo(&mut self) -> Result<bool>;

    /// Re-applies the most recently undone command. Returns `false` if there was nothing to redo.
    fn redo(&mut self) -> Result<bool>;

    /// Number of registered commands, applied or undone.
    fn count(&self) -> usize;
}

// Lets several sequences record into one shared document history
impl<H: History + ?Sized> History for Rc<RefCell<H>> {
    fn add(&mut self, command: Box<dyn Undoable>) {
        self.borrow_mut().add(command)
    }

    fn undo(&mut self) -> Result<bool> {
        self.borrow_mut().undo()
    }

    fn redo(&mut self) -> Result<bool> {
        self.borrow_mut().redo()
    }

    fn count(&self) -> usize {
        self.borrow().count()
    }
}

/// Linear undo history: adding a command after a series of undos drops the undone commands.
#[derive(Default)]
pub struct LinearHistory {
    commands: Vec<Box<dyn Undoable>>,
    // Commands before the cursor are applied, commands after it are undone
    cursor: usize,
    limit: Option<NonZeroUsize>,
}

impl LinearHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A history that keeps at most `limit` commands, forgetting the oldest ones first.
    pub fn with_limit(limit: NonZeroUsize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn limit(&self) -> Option<NonZeroUsize> {
        self.limit
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.commands.len()
    }

    /// Number of commands that can currently be undone.
    pub fn applied(&self) -> usize {
        self.cursor
    }

    pub fn clear(&mut self) {
        log::debug!("Clearing history with {} commands", self.commands.len());
        self.commands.clear();
        self.cursor = 0;
    }
}

impl History for LinearHistory {
    fn add(&mut self, command: Box<dyn Undoable>) {
        if self.can_redo() {
            log::debug!(
                "Dropping {} undone commands",
                self.commands.len() - self.cursor
            );
            self.commands.truncate(self.cursor);
        }
        self.commands.push(command);

        if let Some(limit) = self.limit {
            let excess = self.commands.len().saturating_sub(limit.get());
            if excess > 0 {
                log::debug!("History limit {limit} reached, evicting {excess} oldest commands");
                self.commands.drain(..excess);
            }
        }
        self.cursor = self.commands.len();
    }

    fn undo(&mut self) -> Result<bool> {
        if !self.can_undo() {
            log::warn!("Nothing to undo");
            return Ok(false);
        }
        self.commands[self.cursor - 1].undo()?;
        self.cursor -= 1;
        Ok(true)
    }

    fn redo(&mut self) -> Result<bool> {
        if !self.can_redo() {
            log::warn!("Nothing to redo");
            return Ok(false);
        }
        self.commands[self.cursor].redo()?;
        self.cursor += 1;
        Ok(true)
    }

    fn count(&self) -> usize {
        self.commands.len()
    }
}

impl Debug for LinearHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinearHistory")
            .field("commands", &self.commands.len())
            .field("cursor", &self.cursor)
            .field("limit", &self.limit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use eyre::eyre;

    use super::*;

    type Journal = Rc<RefCell<Vec<String>>>;

    struct Recorder {
        name: &'static str,
        journal: Journal,
        broken: bool,
    }

    impl Recorder {
        fn boxed(name: &'static str, journal: &Journal) -> Box<dyn Undoable> {
            Box::new(Self {
                name,
                journal: journal.clone(),
                broken: false,
            })
        }
    }

    impl Undoable for Recorder {
        fn undo(&mut self) -> Result<()> {
            if self.broken {
                return Err(eyre!("{} can't be undone", self.name));
            }
            self.journal.borrow_mut().push(format!("undo {}", self.name));
            Ok(())
        }

        fn redo(&mut self) -> Result<()> {
            self.journal.borrow_mut().push(format!("redo {}", self.name));
            Ok(())
        }
    }

    fn journal(journal: &Journal) -> Vec<String> {
        journal.borrow_mut().drain(..).collect()
    }

    #[test]
    fn test_undo_redo_order() -> Result<()> {
        let log = Journal::default();
        let mut history = LinearHistory::new();
        assert!(!history.can_undo() && !history.can_redo());

        history.add(Recorder::boxed("a", &log));
        history.add(Recorder::boxed("b", &log));
        assert_eq!(history.count(), 2);
        assert!(journal(&log).is_empty(), "add must not execute commands");

        assert!(history.undo()?);
        assert!(history.undo()?);
        assert!(!history.undo()?);
        assert_eq!(journal(&log), ["undo b", "undo a"]);

        assert!(history.redo()?);
        assert!(history.redo()?);
        assert!(!history.redo()?);
        assert_eq!(journal(&log), ["redo a", "redo b"]);
        Ok(())
    }

    #[test]
    fn test_add_drops_redo_branch() -> Result<()> {
        let log = Journal::default();
        let mut history = LinearHistory::new();
        for name in ["a", "b", "c"] {
            history.add(Recorder::boxed(name, &log));
        }
        history.undo()?;
        history.undo()?;
        assert_eq!(history.applied(), 1);

        history.add(Recorder::boxed("d", &log));
        assert_eq!(history.count(), 2);
        assert!(!history.can_redo());

        journal(&log);
        history.undo()?;
        history.undo()?;
        assert_eq!(journal(&log), ["undo d", "undo a"]);
        Ok(())
    }

    #[test]
    fn test_limit_evicts_oldest() -> Result<()> {
        let log = Journal::default();
        let mut history = LinearHistory::with_limit(NonZeroUsize::new(2).unwrap());
        for name in ["a", "b", "c"] {
            history.add(Recorder::boxed(name, &log));
        }
        assert_eq!(history.count(), 2);

        while history.undo()? {}
        assert_eq!(journal(&log), ["undo c", "undo b"]);
        Ok(())
    }

    #[test]
    fn test_failed_undo_keeps_cursor() {
        let log = Journal::default();
        let mut history = LinearHistory::new();
        history.add(Box::new(Recorder {
            name: "broken",
            journal: log.clone(),
            broken: true,
        }));

        assert!(history.undo().is_err());
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_clear() -> Result<()> {
        let log = Journal::default();
        let mut history = LinearHistory::new();
        history.add(Recorder::boxed("a", &log));
        history.clear();

        assert_eq!(history.count(), 0);
        assert!(!history.undo()?);
        assert!(journal(&log).is_empty());
        Ok(())
    }

    #[test]
    fn test_shared_history() -> Result<()> {
        let log = Journal::default();
        let shared = Rc::new(RefCell::new(LinearHistory::new()));
        let (mut first, mut second) = (shared.clone(), shared.clone());

        first.add(Recorder::boxed("a", &log));
        second.add(Recorder::boxed("b", &log));
        assert_eq!(shared.count(), 2);

        first.undo()?;
        second.undo()?;
        assert_eq!(journal(&log), ["undo b", "undo a"]);

        let mut boxed: Box<dyn History> = Box::new(shared);
        assert!(boxed.redo()?);
        assert_eq!(journal(&log), ["redo a"]);
        Ok(())
    }
}
