use crate::{layout::ConfigError, loader::LoadError};

/// Result alias used throughout `segid`.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors a generator can report.
///
/// Only [`Error::NotLoaded`] and [`Error::Exhausted`] are ever returned from
/// [`SegmentGenerator::next_id`]. The remaining variants come out of explicit
/// loads, or are logged when a background renewal fails.
///
/// [`SegmentGenerator::next_id`]: crate::generator::SegmentGenerator::next_id
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The options could not be turned into a valid layout.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// `next_id` was called before a high segment was ever installed.
    #[error("no high segment has been loaded yet")]
    NotLoaded,

    /// The low segment reached the exhaust value before a renewal landed.
    /// The generator is permanently unusable.
    #[error("low segment exhausted at high {high:#x}, low {low:#x}")]
    Exhausted { high: u64, low: u64 },

    /// An explicit load was attempted while a renewal holds the flag.
    #[error("a renewal is already in flight")]
    RenewalInFlight,

    /// The loader failed to produce a value.
    #[error("loader failed: {0}")]
    Load(#[from] LoadError),

    /// The loader returned a value that does not advance the high segment.
    #[error("non-monotonic source: loaded {loaded:#x}, current {current:#x}")]
    NonMonotonic { current: u64, loaded: u64 },

    /// The loaded value is zero or does not fit the high segment.
    #[error("high segment {high:#x} is outside 1..={max:#x}")]
    InvalidHigh { high: u64, max: u64 },

    /// The configured verifier vetoed the loaded value.
    #[error("high segment {high:#x} rejected: {reason}")]
    Rejected { high: u64, reason: String },

    /// The renewal task could not be handed to its executor.
    #[error("failed to dispatch renewal: {0}")]
    Spawn(String),
}
