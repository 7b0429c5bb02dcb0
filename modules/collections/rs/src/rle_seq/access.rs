use crate::error::{Error, Result};

/// How [`RleSeq::get`](super::RleSeq::get) hands out values.
///
/// A single stored value backs every position of its run. Handing out an owned value must not let
/// the caller reach back into that shared storage, which matters for handle types (`Rc<RefCell<_>>`,
/// `Arc<Mutex<_>>`) whose `Clone` only copies the handle.
pub enum AccessPolicy<V> {
    /// Values are returned through `Clone`. Appropriate for plain data and immutable handles.
    Shared,
    /// Values are returned as independent copies made by the given function. Without one,
    /// owned reads fail with [`Error::Unsupported`].
    Detached(Option<fn(&V) -> V>),
}

impl<V> AccessPolicy<V> {
    pub fn is_shared(&self) -> bool {
        matches!(self, AccessPolicy::Shared)
    }

    pub(crate) fn read(&self, stored: &V) -> Result<V>
    where
        V: Clone,
    {
        match self {
            AccessPolicy::Shared => Ok(stored.clone()),
            AccessPolicy::Detached(Some(detach)) => Ok(detach(stored)),
            AccessPolicy::Detached(None) => Err(Error::Unsupported(
                "values are detached on read, but no copy function was configured".to_string(),
            )),
        }
    }
}

impl<V> Default for AccessPolicy<V> {
    fn default() -> Self {
        AccessPolicy::Shared
    }
}

impl<V> Clone for AccessPolicy<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for AccessPolicy<V> {}

impl<V> std::fmt::Debug for AccessPolicy<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessPolicy::Shared => write!(f, "Shared"),
            AccessPolicy::Detached(detach) => {
                write!(f, "Detached({})", if detach.is_some() { "fn" } else { "None" })
            }
        }
    }
}
