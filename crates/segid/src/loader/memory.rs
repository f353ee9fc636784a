use portable_atomic::{AtomicU64, Ordering};

use crate::loader::{LoadError, Loader};

/// A process-local high segment counter.
///
/// Uniqueness only holds within one process, so this is meant for tests and
/// single-process deployments. Each load returns the previous value plus one.
///
/// # Example
/// ```
/// use segid::loader::{Loader, MemoryLoader};
///
/// let loader = MemoryLoader::new(0);
/// assert_eq!(futures::executor::block_on(loader.load()).unwrap(), 1);
/// assert_eq!(futures::executor::block_on(loader.load()).unwrap(), 2);
/// ```
#[derive(Debug, Default)]
pub struct MemoryLoader {
    last: AtomicU64,
}

impl MemoryLoader {
    /// Creates a loader whose first load returns `last + 1`.
    pub const fn new(last: u64) -> Self {
        Self {
            last: AtomicU64::new(last),
        }
    }

    /// The most recently issued value.
    pub fn last(&self) -> u64 {
        self.last.load(Ordering::Acquire)
    }
}

impl Loader for MemoryLoader {
    async fn load(&self) -> Result<u64, LoadError> {
        let prev = self.last.fetch_add(1, Ordering::AcqRel);
        prev.checked_add(1).ok_or(LoadError::Unavailable)
    }
}
