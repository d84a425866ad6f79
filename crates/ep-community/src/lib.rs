//! `ep-community`: the thread-safe population and place registry.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                        |
//! |-----------------|-----------------------------------------------------------------|
//! | [`place`]       | `Place`, `PlaceRegistry` (per-kind arenas), `PlaceSnapshot`     |
//! | [`person`]      | `Person`, `PersonSpec`, `Sex`, `Job`, `PersonSnapshot`          |
//! | [`profile`]     | `BehaviorProfile`: static per-person behavior parameters       |
//! | [`routine`]     | `DailyRoutine`: opening hours, shifts, behavior constants      |
//! | [`movement`]    | the hourly priority-ordered movement decision tree              |
//! | [`containment`] | `ContainmentMeasures`, `ContainmentStage`                       |
//! | [`community`]   | `Community`, `CommunityView`, `CommunityStats`, `TestCounters`  |
//! | [`populate`]    | `Populator` trait, `SyntheticPopulator`, `PopulationProfile`    |
//! | [`error`]       | `CommunityError`, `CommunityResult<T>`                          |
//!
//! # Locking model
//!
//! ```text
//! Community
//!  ├─ population   RwLock<Vec<Person>>          exclusive during the per-person update
//!  ├─ places       [RwLock<Vec<Place>>; 7]      shared for lookups, exclusive to add places
//!  │    └─ Place   Mutex<Vec<PersonId>>         exclusive for one add/remove
//!  ├─ measures     RwLock<ContainmentMeasures>
//!  └─ tests        Mutex<TestCounters>
//! ```
//!
//! No operation holds two of these at once except a place lookup (shared
//! per-kind lock) followed by that place's occupant lock, always in that order.

pub mod community;
pub mod containment;
pub mod error;
pub mod movement;
pub mod person;
pub mod place;
pub mod populate;
pub mod profile;
pub mod routine;

mod sync;


pub use community::{Community, CommunityStats, CommunityView, TestCounters};
pub use containment::{ContainmentMeasures, ContainmentStage};
pub use error::{CommunityError, CommunityResult};
pub use person::{Job, Person, PersonSnapshot, PersonSpec, Sex};
pub use place::{Place, PlaceRegistry, PlaceSnapshot};
pub use populate::{Populator, PopulationProfile, SyntheticPopulator};
pub use profile::BehaviorProfile;
pub use routine::DailyRoutine;
