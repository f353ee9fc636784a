use core::fmt;
use std::sync::Arc;

use crate::layout::{DEFAULT_LOW_BITS, DEFAULT_MIN_HIGH_BITS, Layout};

/// A caller-supplied check run against every freshly loaded high segment.
///
/// Returning `Err(reason)` vetoes the value; the install is abandoned and the
/// previous high segment stays in effect.
pub type HighVerifier = Arc<dyn Fn(u64) -> Result<(), String> + Send + Sync>;

/// How the 64-bit word is shaped for consumers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IdTransform {
    /// All 64 bits are available.
    #[default]
    Unsigned,
    /// Bit 63 is always zero so every ID is a non-negative `i64`. Useful when
    /// IDs cross into languages or databases without unsigned 64-bit integers.
    Signed63,
}

/// Errors raised while validating [`Options`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("section width {bits} exceeds the maximum of {max} bits")]
    SectionBits { bits: u32, max: u32 },

    #[error("section {section} does not fit in {bits} bits")]
    SectionOutOfRange { section: u64, bits: u32 },

    #[error("low segment width {bits} is out of range")]
    LowBits { bits: u32 },

    #[error(
        "section ({section_bits}) + high ({high_bits}) + low ({low_bits}) bits exceed the \
         {usable_bits} usable bits"
    )]
    Overcommitted {
        section_bits: u32,
        high_bits: u32,
        low_bits: u32,
        usable_bits: u32,
    },

    #[error("renew interval {interval} must be a power of two no larger than the low range")]
    RenewInterval { interval: u64 },

    #[error(
        "critical value {critical} leaves no renewal boundary before the exhaust value {exhaust}"
    )]
    Thresholds { critical: u64, exhaust: u64 },
}

/// Construction-time configuration for a generator.
///
/// Everything here is validated by [`Options::layout`]; once a generator is
/// built the resulting [`Layout`] is immutable.
///
/// Choosing thresholds is a trade-off: a lower critical value gives the
/// loader more renewal attempts before the low segment runs dry, at the cost
/// of consuming high segments faster.
///
/// # Example
/// ```
/// use segid::layout::{IdTransform, Options};
///
/// let options = Options::new()
///     .with_name("orders")
///     .with_section(4, 3)
///     .with_transform(IdTransform::Signed63);
///
/// let layout = options.layout().unwrap();
/// assert_eq!(layout.high_bits(), 63 - 4 - 40);
/// ```
#[derive(Clone)]
pub struct Options {
    pub(crate) name: String,
    pub(crate) section_bits: u32,
    pub(crate) section: u64,
    pub(crate) low_bits: u32,
    pub(crate) min_high_bits: u32,
    pub(crate) renew_interval: Option<u64>,
    pub(crate) critical_value: Option<u64>,
    pub(crate) exhaust_value: Option<u64>,
    pub(crate) transform: IdTransform,
    pub(crate) verifier: Option<HighVerifier>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            name: String::from("default"),
            section_bits: 0,
            section: 0,
            low_bits: DEFAULT_LOW_BITS,
            min_high_bits: DEFAULT_MIN_HIGH_BITS,
            renew_interval: None,
            critical_value: None,
            exhaust_value: None,
            transform: IdTransform::Unsigned,
            verifier: None,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name carried in log events to tell generators apart.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Reserves the top `bits` of every ID for the static tag `section`.
    #[must_use]
    pub fn with_section(mut self, bits: u32, section: u64) -> Self {
        self.section_bits = bits;
        self.section = section;
        self
    }

    /// Width of the locally incremented low segment.
    #[must_use]
    pub fn with_low_bits(mut self, bits: u32) -> Self {
        self.low_bits = bits;
        self
    }

    /// Smallest high segment width the layout may be left with.
    #[must_use]
    pub fn with_min_high_bits(mut self, bits: u32) -> Self {
        self.min_high_bits = bits;
        self
    }

    /// How often, in increments, a renewal is retried past the critical
    /// value. Must be a power of two.
    #[must_use]
    pub fn with_renew_interval(mut self, interval: u64) -> Self {
        self.renew_interval = Some(interval);
        self
    }

    /// Low value from which renewal boundaries start firing.
    #[must_use]
    pub fn with_critical_value(mut self, value: u64) -> Self {
        self.critical_value = Some(value);
        self
    }

    /// Low value at which the generator is declared exhausted.
    #[must_use]
    pub fn with_exhaust_value(mut self, value: u64) -> Self {
        self.exhaust_value = Some(value);
        self
    }

    #[must_use]
    pub fn with_transform(mut self, transform: IdTransform) -> Self {
        self.transform = transform;
        self
    }

    #[must_use]
    pub fn with_verifier<F>(mut self, verifier: F) -> Self
    where
        F: Fn(u64) -> Result<(), String> + Send + Sync + 'static,
    {
        self.verifier = Some(Arc::new(verifier));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validates the options and freezes them into a [`Layout`].
    ///
    /// # Errors
    /// Returns a [`ConfigError`] describing the first constraint violated.
    pub fn layout(&self) -> Result<Layout, ConfigError> {
        Layout::from_options(self)
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("name", &self.name)
            .field("section_bits", &self.section_bits)
            .field("section", &self.section)
            .field("low_bits", &self.low_bits)
            .field("min_high_bits", &self.min_high_bits)
            .field("renew_interval", &self.renew_interval)
            .field("critical_value", &self.critical_value)
            .field("exhaust_value", &self.exhaust_value)
            .field("transform", &self.transform)
            .field("verifier", &self.verifier.is_some())
            .finish()
    }
}
