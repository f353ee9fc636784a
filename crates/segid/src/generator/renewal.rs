use std::sync::Arc;

use portable_atomic::Ordering;

use super::engine::Shared;
use crate::{Error, Result, generator::SegmentGenerator, loader::Loader, runtime::Spawner};

/// Proof of holding the renewal flag. Releases it on drop, including when a
/// renewal task is dropped unpolled or its loader panics.
struct RenewalPermit<L> {
    shared: Arc<Shared<L>>,
}

impl<L> Drop for RenewalPermit<L> {
    fn drop(&mut self) {
        self.shared.flag.release();
    }
}

impl<L> Shared<L>
where
    L: Loader,
{
    fn try_permit(self: &Arc<Self>) -> Option<RenewalPermit<L>> {
        self.flag.try_acquire().then(|| RenewalPermit {
            shared: Arc::clone(self),
        })
    }

    /// Fetches a new high segment and installs it.
    async fn refill(&self) -> Result<u64> {
        let high = self.loader.load().await?;
        self.install(high)
    }

    /// Verifies `high` and, if it advances the current high segment, stores
    /// `section | high | 0` as the new state word.
    fn install(&self, high: u64) -> Result<u64> {
        let layout = &self.layout;
        let max = layout.max_high();
        if high == 0 || high > max {
            return Err(Error::InvalidHigh { high, max });
        }
        if let Some(verify) = &self.verifier {
            verify(high).map_err(|reason| Error::Rejected { high, reason })?;
        }

        let current_word = self.state.load(Ordering::Acquire);
        let current = layout.high(current_word);
        if self.flag.is_exhausted() {
            return Err(Error::Exhausted {
                high: current,
                low: layout.low(current_word),
            });
        }
        if high <= current {
            return Err(Error::NonMonotonic {
                current,
                loaded: high,
            });
        }

        // Increments racing with this store land on the old word and are
        // simply overwritten; their IDs were already unique under `current`.
        self.state.store(layout.compose(high, 0), Ordering::Release);

        #[cfg(feature = "tracing")]
        tracing::debug!(name = %self.name, high, previous = current, "installed high segment");

        Ok(high)
    }
}

impl<L, S> SegmentGenerator<L, S>
where
    L: Loader,
    S: Spawner,
{
    /// Dispatches a background renewal unless one is already in flight.
    pub(crate) fn maybe_renew(&self) {
        let Some(permit) = self.shared.try_permit() else {
            return;
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(name = %self.shared.name, "dispatching renewal");

        let task = async move {
            let shared = &permit.shared;
            if let Err(_e) = shared.refill().await {
                #[cfg(feature = "tracing")]
                tracing::warn!(name = %shared.name, error = %_e, "renewal failed");
            }
            drop(permit);
        };

        // on failure the task, and with it the permit, has already been
        // dropped
        if let Err(_e) = self.spawner.spawn(task) {
            #[cfg(feature = "tracing")]
            tracing::warn!(name = %self.shared.name, error = %_e, "renewal dispatch failed");
        }
    }

    /// Loads a high segment and installs it with the low segment reset to
    /// zero, on the caller's task.
    ///
    /// This must succeed once before [`Self::next_id`] can be used. Calling
    /// it again forces an early renewal.
    ///
    /// # Errors
    /// - [`Error::RenewalInFlight`] if a background renewal holds the flag
    /// - [`Error::Exhausted`] if the generator is exhausted
    /// - [`Error::Load`] if the loader failed
    /// - [`Error::InvalidHigh`], [`Error::Rejected`] or
    ///   [`Error::NonMonotonic`] if the loaded value cannot be installed
    pub async fn load_initial(&self) -> Result<u64> {
        let Some(permit) = self.shared.try_permit() else {
            return Err(self.busy());
        };

        let result = permit.shared.refill().await;
        drop(permit);

        #[cfg(feature = "tracing")]
        match &result {
            Ok(high) => tracing::info!(name = %self.shared.name, high, "loaded high segment"),
            Err(e) => tracing::warn!(name = %self.shared.name, error = %e, "load failed"),
        }

        result
    }

    /// Blocking flavour of [`Self::load_initial`] that drives the loader on
    /// the current thread.
    ///
    /// Do not call this from inside an async runtime, or with a loader that
    /// needs one.
    ///
    /// # Errors
    /// Same as [`Self::load_initial`].
    pub fn load_initial_blocking(&self) -> Result<u64> {
        futures::executor::block_on(self.load_initial())
    }

    fn busy(&self) -> Error {
        if self.shared.flag.is_exhausted() {
            let word = self.shared.state.load(Ordering::Acquire);
            let layout = &self.shared.layout;
            Error::Exhausted {
                high: layout.high(word),
                low: layout.low(word),
            }
        } else {
            Error::RenewalInFlight
        }
    }
}
