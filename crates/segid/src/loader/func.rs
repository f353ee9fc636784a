use core::{fmt, future::Future};

use crate::loader::{LoadError, Loader};

/// Adapts an async closure into a [`Loader`].
///
/// Handy for wiring in a backend that already exposes an
/// increment-and-read call without writing a dedicated type.
///
/// # Example
/// ```
/// use std::sync::{
///     Arc,
///     atomic::{AtomicU64, Ordering},
/// };
/// use segid::loader::{Loader, loader_fn};
///
/// let counter = Arc::new(AtomicU64::new(41));
/// let loader = loader_fn(move || {
///     let counter = Arc::clone(&counter);
///     async move { Ok(counter.fetch_add(1, Ordering::SeqCst) + 1) }
/// });
///
/// assert_eq!(futures::executor::block_on(loader.load()).unwrap(), 42);
/// ```
pub struct FnLoader<F> {
    f: F,
}

/// Creates a [`FnLoader`] from `f`.
pub fn loader_fn<F, Fut>(f: F) -> FnLoader<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<u64, LoadError>> + Send,
{
    FnLoader { f }
}

impl<F, Fut> Loader for FnLoader<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<u64, LoadError>> + Send,
{
    fn load(&self) -> impl Future<Output = Result<u64, LoadError>> + Send {
        (self.f)()
    }
}

impl<F> fmt::Debug for FnLoader<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnLoader").finish_non_exhaustive()
    }
}
