use core::future::Future;

use tokio::runtime::Handle;

use crate::{Error, Result, runtime::Spawner};

/// Runs renewals as detached tasks on a Tokio runtime.
///
/// This is the spawner to use with loaders built on Tokio I/O, such as
/// [`MysqlLoader`].
///
/// [`MysqlLoader`]: crate::loader::MysqlLoader
#[derive(Clone, Debug)]
pub struct TokioSpawner {
    handle: Handle,
}

impl TokioSpawner {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Captures the runtime the caller is currently running on.
    ///
    /// # Errors
    /// Returns [`Error::Spawn`] when called outside a Tokio runtime.
    pub fn current() -> Result<Self> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| Error::Spawn(e.to_string()))
    }
}

impl Spawner for TokioSpawner {
    fn spawn<F>(&self, task: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        drop(self.handle.spawn(task));
        Ok(())
    }
}
