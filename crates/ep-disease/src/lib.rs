//! `ep-disease`: disease parameters and the infection state machine.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`span`]      | `Span<T>`: inclusive sampling interval                   |
//! | [`age`]       | `AgeGroup`: nine decade-wide mortality buckets           |
//! | [`disease`]   | `Disease`: immutable distribution over illness courses   |
//! | [`builder`]   | `DiseaseBuilder`: fail-fast construction                 |
//! | [`infection`] | `Infection`, `SeirState`, `InfectionStage`, `DayOutcome`  |
//! | [`error`]     | `DiseaseError`, `DiseaseResult<T>`                        |
//!
//! # Model
//!
//! A [`Disease`] is a distribution, not a fixed set of numbers: every accessor
//! draws a fresh sample.  An [`Infection`] snapshots one illness course at
//! exposure time and only counts it down afterwards.

pub mod age;
pub mod builder;
pub mod disease;
pub mod error;
pub mod infection;
pub mod span;

#[cfg(test)]
mod tests;

pub use age::AgeGroup;
pub use builder::DiseaseBuilder;
pub use disease::Disease;
pub use error::{DiseaseError, DiseaseResult};
pub use infection::{DayOutcome, Infection, InfectionStage, MASK_TRANSMISSION_FACTOR, SeirState, linear_map};
pub use span::Span;
