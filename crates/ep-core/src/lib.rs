//! `ep-core`: foundational types for the `epitown` epidemic simulator.
//!
//! This crate is a dependency of every other `ep-*` crate.  It has no `ep-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `PersonId`, `PlaceId`, `CommunityId`, `PlaceKind`     |
//! | [`time`]        | `Tick`, `SimClock`, `HourContext`                     |
//! | [`rng`]         | `PersonRng`, `PlaceRng`, `SimRng`                     |
//! | [`config`]      | `SimConfig`                                           |
//! | [`error`]       | `EpiError`, `EpiResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids, clock and config.   |

pub mod config;
pub mod error;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::SimConfig;
pub use error::{EpiError, EpiResult};
pub use ids::{CommunityId, PersonId, PlaceId, PlaceKind};
pub use rng::{PersonRng, PlaceRng, SimRng};
pub use time::{HourContext, SimClock, Tick, Weekday};
