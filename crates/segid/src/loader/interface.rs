use core::future::Future;

/// Errors a [`Loader`] may report.
///
/// The generator does not look inside these beyond logging them; any error
/// simply means "this renewal failed".
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LoadError {
    /// The loader's own parameters are unusable.
    #[error("invalid loader configuration: {0}")]
    Config(String),

    /// The backing store returned an error.
    #[error("backend error: {0}")]
    Backend(String),

    /// The backing store answered but produced no value.
    #[error("backend returned no value")]
    Unavailable,
}

/// A source of high segments.
///
/// Every call must return a value strictly greater than any value it has
/// returned before, to any process. Backends usually get this from an
/// atomic increment-and-read primitive such as an auto-increment column.
///
/// Implementations are free to block or suspend; the generator only ever
/// polls them off the `next_id` path. Bounding latency is the loader's job.
pub trait Loader: Send + Sync + 'static {
    /// Fetches the next unused high segment.
    fn load(&self) -> impl Future<Output = Result<u64, LoadError>> + Send;
}
