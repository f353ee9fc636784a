use core::fmt;

use crate::layout::{ConfigError, IdTransform, Options};

/// Number of bits in the low segment when nothing else is configured.
pub const DEFAULT_LOW_BITS: u32 = 40;

/// Widest section tag the layout accepts.
pub const MAX_SECTION_BITS: u32 = 8;

/// Narrowest high segment the layout accepts unless overridden.
pub const DEFAULT_MIN_HIGH_BITS: u32 = 16;

/// Percentage of the low range at which renewal starts being attempted.
pub const DEFAULT_CRITICAL_PERCENT: u64 = 80;

/// Percentage of the low range at which the generator gives up.
pub const DEFAULT_EXHAUST_PERCENT: u64 = 96;

/// The components of a generated ID.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Parts {
    pub section: u64,
    pub high: u64,
    pub low: u64,
}

/// Frozen bit layout of a generator's 64-bit state word.
///
/// ```text
/// | [sign] | section (S) | high (H) | low (L) |
/// ```
///
/// The sign bit only exists with [`IdTransform::Signed63`], in which case it
/// is always zero. All shift constants and thresholds are computed once at
/// construction and never change afterwards.
///
/// # Example
/// ```
/// use segid::layout::Options;
///
/// let layout = Options::new().with_section(4, 15).layout().unwrap();
/// let id = layout.compose(7, 42);
///
/// assert_eq!(id >> 60, 15);
/// assert_eq!(layout.decompose(id).high, 7);
/// assert_eq!(layout.decompose(id).low, 42);
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    usable_bits: u32,
    section_bits: u32,
    section: u64,
    section_prefix: u64,
    high_bits: u32,
    high_mask: u64,
    low_bits: u32,
    low_mask: u64,
    renew_mask: u64,
    critical_value: u64,
    exhaust_value: u64,
}

impl Layout {
    pub(crate) fn from_options(options: &Options) -> Result<Self, ConfigError> {
        let usable_bits = match options.transform {
            IdTransform::Unsigned => 64,
            IdTransform::Signed63 => 63,
        };

        let section_bits = options.section_bits;
        if section_bits > MAX_SECTION_BITS {
            return Err(ConfigError::SectionBits {
                bits: section_bits,
                max: MAX_SECTION_BITS,
            });
        }
        if options.section > mask(section_bits) {
            return Err(ConfigError::SectionOutOfRange {
                section: options.section,
                bits: section_bits,
            });
        }

        let low_bits = options.low_bits;
        if low_bits == 0 || low_bits >= usable_bits {
            return Err(ConfigError::LowBits { bits: low_bits });
        }

        let required = section_bits
            .saturating_add(options.min_high_bits)
            .saturating_add(low_bits);
        if options.min_high_bits == 0 || required > usable_bits {
            return Err(ConfigError::Overcommitted {
                section_bits,
                high_bits: options.min_high_bits,
                low_bits,
                usable_bits,
            });
        }
        let high_bits = usable_bits - section_bits - low_bits;

        let range = 1u64 << low_bits;
        let renew_interval = options
            .renew_interval
            .unwrap_or_else(|| 1u64 << low_bits.saturating_sub(7));
        if !renew_interval.is_power_of_two() || renew_interval > range {
            return Err(ConfigError::RenewInterval {
                interval: renew_interval,
            });
        }

        let critical_value = options
            .critical_value
            .unwrap_or_else(|| percent_of(range, DEFAULT_CRITICAL_PERCENT));
        let exhaust_value = options
            .exhaust_value
            .unwrap_or_else(|| percent_of(range, DEFAULT_EXHAUST_PERCENT));
        if exhaust_value >= range || critical_value == 0 {
            return Err(ConfigError::Thresholds {
                critical: critical_value,
                exhaust: exhaust_value,
            });
        }

        let renew_mask = renew_interval - 1;
        // at least one renewal boundary must come before the generator dies
        let first_boundary = critical_value
            .checked_add(renew_mask)
            .map(|v| v & !renew_mask);
        match first_boundary {
            Some(boundary) if boundary < exhaust_value => {}
            _ => {
                return Err(ConfigError::Thresholds {
                    critical: critical_value,
                    exhaust: exhaust_value,
                });
            }
        }

        let section_prefix = if section_bits == 0 {
            0
        } else {
            options.section << (usable_bits - section_bits)
        };

        Ok(Self {
            usable_bits,
            section_bits,
            section: options.section,
            section_prefix,
            high_bits,
            high_mask: mask(high_bits),
            low_bits,
            low_mask: mask(low_bits),
            renew_mask,
            critical_value,
            exhaust_value,
        })
    }

    /// Builds the full state word for a given high and low segment.
    ///
    /// Both inputs are masked to their field widths so the section tag can
    /// never be clobbered.
    #[inline]
    pub const fn compose(&self, high: u64, low: u64) -> u64 {
        self.section_prefix | ((high & self.high_mask) << self.low_bits) | (low & self.low_mask)
    }

    /// Splits an ID back into its section, high and low segments.
    pub const fn decompose(&self, id: u64) -> Parts {
        Parts {
            section: self.section_of(id),
            high: self.high(id),
            low: self.low(id),
        }
    }

    #[inline]
    pub const fn high(&self, id: u64) -> u64 {
        (id >> self.low_bits) & self.high_mask
    }

    #[inline]
    pub const fn low(&self, id: u64) -> u64 {
        id & self.low_mask
    }

    pub const fn section_of(&self, id: u64) -> u64 {
        if self.section_bits == 0 {
            0
        } else {
            (id >> (self.usable_bits - self.section_bits)) & mask(self.section_bits)
        }
    }

    /// Returns `true` when `low` sits on a boundary that should dispatch a
    /// renewal: at or past the critical value and a multiple of the renew
    /// interval.
    #[inline]
    pub const fn is_renew_boundary(&self, low: u64) -> bool {
        low >= self.critical_value && low & self.renew_mask == 0
    }

    /// The first low value at which [`Self::is_renew_boundary`] fires.
    pub const fn first_renew_boundary(&self) -> u64 {
        (self.critical_value + self.renew_mask) & !self.renew_mask
    }

    pub const fn section(&self) -> u64 {
        self.section
    }

    pub const fn section_bits(&self) -> u32 {
        self.section_bits
    }

    pub const fn high_bits(&self) -> u32 {
        self.high_bits
    }

    pub const fn low_bits(&self) -> u32 {
        self.low_bits
    }

    /// Largest high segment that fits the layout.
    pub const fn max_high(&self) -> u64 {
        self.high_mask
    }

    pub const fn renew_interval(&self) -> u64 {
        self.renew_mask + 1
    }

    pub const fn critical_value(&self) -> u64 {
        self.critical_value
    }

    pub const fn exhaust_value(&self) -> u64 {
        self.exhaust_value
    }

    /// Whether bit 63 is reserved (always zero).
    pub const fn is_signed(&self) -> bool {
        self.usable_bits == 63
    }
}

impl fmt::Debug for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layout")
            .field("signed", &self.is_signed())
            .field("section_bits", &self.section_bits)
            .field("section", &self.section)
            .field("high_bits", &self.high_bits)
            .field("low_bits", &self.low_bits)
            .field("renew_interval", &self.renew_interval())
            .field("critical_value", &self.critical_value)
            .field("exhaust_value", &self.exhaust_value)
            .finish()
    }
}

const fn mask(bits: u32) -> u64 {
    if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 }
}

fn percent_of(range: u64, percent: u64) -> u64 {
    (u128::from(range) * u128::from(percent) / 100) as u64
}
