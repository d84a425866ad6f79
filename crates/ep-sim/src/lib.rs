//! `ep-sim`: tick loop orchestrator for the epitown simulator.
//!
//! # Tick loop
//!
//! ```text
//! every tick (one simulated hour):
//!   ① Clock   : advance one hour; the first hour of a day is a new day.
//!   ② Persons : per community, Person::update for everyone in parallel:
//!                 new day → advance the infection; then pick one move.
//!   ③ Exposure: per community, per occupied place in parallel (read-only):
//!                 every infectious × susceptible pair rolls one contact;
//!                 travelers roll 0..=N contacts against the outside carrier.
//!   ④ Apply   : exposures applied sequentially in ascending PersonId order:
//!                 contaminate the target, credit the source's spread count.
//! ```
//!
//! Person updates draw only from each person's own RNG stream, and the
//! exposure phase draws from a per-place stream derived from
//! `(seed, tick, community, place)`, so a run is reproducible for a given
//! seed whatever the thread count.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ep_core::SimConfig;
//! use ep_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(SimConfig::default(), disease).build()?;
//! sim.run_for_days(60, &mut NoopObserver)?;
//! println!("{:?}", sim.summary(0));
//! ```

pub mod builder;
pub mod contacts;
pub mod control;
pub mod error;
pub mod observer;
pub mod sim;
pub mod summary;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use control::RunControl;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Simulation;
pub use summary::RunSummary;
