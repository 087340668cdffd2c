//! Core recurrence inference.
//!
//! This crate contains the fundamental types and logic for:
//! - Occurrences: concrete, validated time slots with a title, location and attendees
//! - Grouping: partitioning a pool of occurrences into candidate series
//! - Period detection: finding the dominant interval and anchor of a series
//! - Materialization: compressing a series into anchor, pattern, exceptions and additions
//!
//! [`infer`] ties these together.

pub mod event;
mod grouping;
mod inference;
mod materialize;
pub mod occurrence;
pub mod pattern;
mod period;
pub mod types;

pub use event::Event;
pub use grouping::{Series, group_series};
pub use inference::{InferenceConfig, InferenceError, InferenceSummary, infer};
pub use materialize::{materialize_irregular, materialize_recurring};
pub use occurrence::{Descriptor, Occurrence};
pub use pattern::{EventPattern, Instants, PatternError, Termination};
pub use period::{DetectedPeriod, MIN_GRID_MATCHES, detect_period};
pub use types::{AttendeeId, ValidationError};
