use std::sync::Arc;

use portable_atomic::{AtomicU64, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Error, Result,
    generator::{GeneratorStatus, RenewalFlag},
    layout::{HighVerifier, Layout, Options},
    loader::Loader,
    runtime::{Spawner, ThreadSpawner},
};

/// State shared between a generator and its in-flight renewal task.
pub(crate) struct Shared<L> {
    #[cfg(feature = "cache-padded")]
    pub(crate) state: crossbeam_utils::CachePadded<AtomicU64>,
    #[cfg(not(feature = "cache-padded"))]
    pub(crate) state: AtomicU64,
    pub(crate) flag: RenewalFlag,
    pub(crate) layout: Layout,
    pub(crate) name: String,
    pub(crate) verifier: Option<HighVerifier>,
    pub(crate) loader: L,
}

/// A lock-free high/low segment ID generator.
///
/// Every ID is a single 64-bit word `section | high | low`. The high segment
/// comes from a [`Loader`] and is unique among all processes that ever asked
/// for one; the low segment is a local atomic counter. [`Self::next_id`] is a
/// single `fetch_add` on that word and never waits on the loader.
///
/// Once the low segment crosses the configured critical value, every
/// renew-interval increments a renewal is dispatched through the
/// [`Spawner`]. At most one renewal is in flight at a time. A successful
/// renewal installs `section | new_high | 0` with a single atomic store.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Lock-free hot path
/// - ❌ Strict ordering across processes
///
/// ## Lifecycle
/// A new generator has no high segment; call [`Self::load_initial`] (or
/// [`Self::load_initial_blocking`]) before the first [`Self::next_id`].
///
/// # Example
/// ```
/// use segid::{
///     generator::SegmentGenerator,
///     layout::Options,
///     loader::MemoryLoader,
/// };
///
/// let generator = SegmentGenerator::new(MemoryLoader::new(0), &Options::new()).unwrap();
/// generator.load_initial_blocking().unwrap();
///
/// assert_eq!(generator.next_id().unwrap(), (1 << 40) | 1);
/// assert_eq!(generator.next_id().unwrap(), (1 << 40) | 2);
/// ```
pub struct SegmentGenerator<L, S = ThreadSpawner>
where
    L: Loader,
    S: Spawner,
{
    pub(crate) shared: Arc<Shared<L>>,
    pub(crate) spawner: S,
}

impl<L> SegmentGenerator<L, ThreadSpawner>
where
    L: Loader,
{
    /// Creates a generator that renews on background OS threads.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if `options` do not form a valid layout.
    pub fn new(loader: L, options: &Options) -> Result<Self> {
        Self::with_spawner(loader, ThreadSpawner, options)
    }
}

impl<L, S> SegmentGenerator<L, S>
where
    L: Loader,
    S: Spawner,
{
    /// Creates a generator that hands renewals to `spawner`.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if `options` do not form a valid layout.
    pub fn with_spawner(loader: L, spawner: S, options: &Options) -> Result<Self> {
        let layout = options.layout()?;
        let initial = layout.compose(0, 0);

        Ok(Self {
            shared: Arc::new(Shared {
                #[cfg(feature = "cache-padded")]
                state: crossbeam_utils::CachePadded::new(AtomicU64::new(initial)),
                #[cfg(not(feature = "cache-padded"))]
                state: AtomicU64::new(initial),
                flag: RenewalFlag::new(),
                layout,
                name: options.name.clone(),
                verifier: options.verifier.clone(),
                loader,
            }),
            spawner,
        })
    }

    /// Returns the next ID.
    ///
    /// The returned value is the state word after a single atomic increment.
    /// If that increment lands on a renewal boundary, a renewal is dispatched
    /// in the background; this call still returns immediately.
    ///
    /// # Errors
    /// - [`Error::NotLoaded`] if no high segment was ever installed. The
    ///   state word is left untouched.
    /// - [`Error::Exhausted`] once the low segment has reached the exhaust
    ///   value, or an increment carried out of it. This is permanent for the
    ///   generator.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> Result<u64> {
        let shared = &*self.shared;
        let layout = &shared.layout;
        let current = shared.state.load(Ordering::Acquire);
        if shared.flag.is_exhausted() {
            return Err(self.cold_exhausted(current));
        }
        if layout.high(current) == 0 {
            return Err(Self::cold_not_loaded());
        }

        let prev = shared.state.fetch_add(1, Ordering::AcqRel);
        let id = prev.wrapping_add(1);
        let low = layout.low(id);

        // A carry out of the low segment would issue IDs under a high
        // segment nobody loaded.
        if layout.high(id) != layout.high(prev) {
            return Err(self.cold_exhausted(prev));
        }
        if layout.high(id) == 0 {
            return Err(Self::cold_not_loaded());
        }
        if low >= layout.exhaust_value() {
            return Err(self.cold_exhausted(id));
        }
        if layout.is_renew_boundary(low) {
            self.maybe_renew();
        }

        Ok(id)
    }

    pub fn layout(&self) -> &Layout {
        &self.shared.layout
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    pub fn loader(&self) -> &L {
        &self.shared.loader
    }

    /// The high segment currently installed, or zero before the first load.
    pub fn current_high(&self) -> u64 {
        self.shared
            .layout
            .high(self.shared.state.load(Ordering::Acquire))
    }

    pub fn status(&self) -> GeneratorStatus {
        self.shared.flag.status()
    }

    /// Force-sets the state word. The section bits of `raw` are replaced with
    /// the configured section.
    ///
    /// Only meant for driving boundary conditions in tests.
    #[doc(hidden)]
    #[cfg(any(test, feature = "test-util"))]
    pub fn reset(&self, raw: u64) {
        let layout = &self.shared.layout;
        let word = layout.compose(layout.high(raw), layout.low(raw));
        self.shared.state.store(word, Ordering::Release);
    }

    #[cold]
    #[inline(never)]
    fn cold_not_loaded() -> Error {
        Error::NotLoaded
    }

    #[cold]
    #[inline(never)]
    fn cold_exhausted(&self, id: u64) -> Error {
        let layout = &self.shared.layout;
        let (high, low) = (layout.high(id), layout.low(id));
        if self.shared.flag.exhaust() {
            #[cfg(feature = "tracing")]
            tracing::error!(
                name = %self.shared.name,
                high,
                low,
                "low segment exhausted before a renewal landed; generator is unusable"
            );
        }
        Error::Exhausted { high, low }
    }
}

impl<L, S> Clone for SegmentGenerator<L, S>
where
    L: Loader,
    S: Spawner + Clone,
{
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            spawner: self.spawner.clone(),
        }
    }
}

impl<L, S> core::fmt::Debug for SegmentGenerator<L, S>
where
    L: Loader,
    S: Spawner,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SegmentGenerator")
            .field("name", &self.shared.name)
            .field("layout", &self.shared.layout)
            .field("state", &self.shared.state.load(Ordering::Relaxed))
            .field("status", &self.shared.flag.status())
            .finish_non_exhaustive()
    }
}
