//! Globally unique, roughly monotonic 64-bit IDs without per-call
//! coordination.
//!
//! Each generator holds an exclusively owned high segment fetched from a
//! shared, strictly increasing counter (a [`Loader`]) and issues IDs by
//! atomically incrementing a local low segment beneath it:
//!
//! ```text
//! | section (S bits) | high segment | low segment (40 bits by default) |
//! ```
//!
//! Before the low segment runs out, a fresh high segment is fetched in the
//! background and installed with a single atomic store. [`next_id`] never
//! takes a lock and never waits on the loader.
//!
//! ```
//! use segid::{Options, SegmentGenerator, MemoryLoader};
//!
//! let generator = SegmentGenerator::new(MemoryLoader::new(0), &Options::new().with_section(4, 15))?;
//! generator.load_initial_blocking()?;
//!
//! let id = generator.next_id()?;
//! assert_eq!(id >> 60, 15);
//! # Ok::<(), segid::Error>(())
//! ```
//!
//! [`Loader`]: crate::loader::Loader
//! [`next_id`]: crate::generator::SegmentGenerator::next_id
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
pub mod generator;
pub mod layout;
pub mod loader;
pub mod runtime;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::layout::*;
pub use crate::loader::*;
pub use crate::runtime::*;

#[cfg(doctest)]
#[doc = include_str!("../README.md")]
struct ReadmeDoctests;
