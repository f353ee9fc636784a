use core::future::Future;

use crate::Result;

/// Abstracts over where background renewals run.
///
/// This allows the generator to be generic over runtimes like `Tokio` or
/// `Smol`, or plain OS threads. The task is fire-and-forget: nothing ever
/// awaits it, and its only effect on shared state is the final install.
pub trait Spawner: Send + Sync + 'static {
    /// Hands `task` to the executor without waiting for it.
    ///
    /// # Errors
    /// Returns [`Error::Spawn`] if the executor refused the task. The task
    /// has been dropped in that case.
    ///
    /// [`Error::Spawn`]: crate::Error::Spawn
    fn spawn<F>(&self, task: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static;
}
