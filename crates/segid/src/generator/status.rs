use portable_atomic::{AtomicU8, Ordering};

const IDLE: u8 = 0;
const RENEWING: u8 = 1;
const EXHAUSTED: u8 = 2;

/// Observable renewal state of a generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeneratorStatus {
    /// No renewal is in flight.
    Idle,
    /// A renewal (background or explicit load) holds the flag.
    Renewing,
    /// The low segment ran out. Terminal.
    Exhausted,
}

/// The renewal flag.
///
/// `Idle -> Renewing` is a single compare-and-swap and is the only mutual
/// exclusion in the generator. `Exhausted` is terminal: nothing transitions
/// out of it, so a renewal that completes afterwards cannot revive the
/// generator.
#[derive(Debug)]
pub(crate) struct RenewalFlag(AtomicU8);

impl RenewalFlag {
    pub(crate) const fn new() -> Self {
        Self(AtomicU8::new(IDLE))
    }

    /// Attempts `Idle -> Renewing`. Returns `false` if a renewal is already in
    /// flight or the generator is exhausted.
    #[inline]
    pub(crate) fn try_acquire(&self) -> bool {
        self.0
            .compare_exchange(IDLE, RENEWING, Ordering::AcqRel, Ordering::Relaxed)
            .is_ok()
    }

    /// `Renewing -> Idle`. Leaves `Exhausted` untouched.
    pub(crate) fn release(&self) {
        let _ = self
            .0
            .compare_exchange(RENEWING, IDLE, Ordering::AcqRel, Ordering::Relaxed);
    }

    /// Marks the generator exhausted. Returns `true` for the caller that made
    /// the transition.
    pub(crate) fn exhaust(&self) -> bool {
        self.0.swap(EXHAUSTED, Ordering::AcqRel) != EXHAUSTED
    }

    #[inline]
    pub(crate) fn is_exhausted(&self) -> bool {
        self.0.load(Ordering::Relaxed) == EXHAUSTED
    }

    pub(crate) fn status(&self) -> GeneratorStatus {
        match self.0.load(Ordering::Acquire) {
            IDLE => GeneratorStatus::Idle,
            RENEWING => GeneratorStatus::Renewing,
            _ => GeneratorStatus::Exhausted,
        }
    }
}
