//! Simulation time model.
//!
//! Time is a monotonically increasing `Tick` counter; one tick is one
//! simulated hour.  `SimClock` maps ticks onto (day, hour-of-day, weekday):
//!
//!   day  = tick / 24
//!   hour = tick % 24
//!
//! Using an integer tick as the canonical time unit keeps all schedule
//! arithmetic exact and comparisons O(1).

use std::fmt;
use std::str::FromStr;

use crate::EpiError;

/// Hours in one simulated day.
pub const HOURS_PER_DAY: u64 = 24;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter (one tick = one hour).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Zero-based simulated day this tick falls on.
    #[inline]
    pub fn day(self) -> u64 {
        self.0 / HOURS_PER_DAY
    }

    /// Hour of day in `0..24`.
    #[inline]
    pub fn hour(self) -> u32 {
        (self.0 % HOURS_PER_DAY) as u32
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── Weekday ───────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Weekday {
    #[default]
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    const ORDER: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// The weekday `days` after `self`.
    pub fn plus_days(self, days: u64) -> Weekday {
        Self::ORDER[(self as usize + (days % 7) as usize) % 7]
    }

    #[inline]
    pub fn is_workday(self) -> bool {
        !matches!(self, Weekday::Saturday | Weekday::Sunday)
    }
}

impl FromStr for Weekday {
    type Err = EpiError;

    /// Case-insensitive full name or three-letter abbreviation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ORDER
            .into_iter()
            .find(|day| {
                let name = format!("{day:?}").to_ascii_lowercase();
                lower == name || (lower.len() == 3 && name.starts_with(&lower))
            })
            .ok_or_else(|| EpiError::Parse(format!("unknown weekday {s:?}")))
    }
}

// ── HourContext ───────────────────────────────────────────────────────────────

/// What a person's movement engine needs to know about "now".
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct HourContext {
    pub tick:       Tick,
    /// Hour of day in `0..24`.
    pub hour:       u32,
    pub day:        u64,
    pub is_workday: bool,
    /// `true` on the first tick of a simulated day; infections advance then.
    pub is_new_day: bool,
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The hourly simulation clock.
///
/// `SimClock` is cheap to copy and intentionally holds no heap data.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Weekday of day 0.
    pub start_weekday: Weekday,
    /// The current tick, advanced by `SimClock::advance()` each iteration.
    pub current_tick:  Tick,
}

impl SimClock {
    pub fn new(start_weekday: Weekday) -> Self {
        Self { start_weekday, current_tick: Tick::ZERO }
    }

    /// Advance the clock by one hour.  Returns `true` when the new tick is
    /// the first hour of a new day.
    #[inline]
    pub fn advance(&mut self) -> bool {
        self.current_tick = Tick(self.current_tick.0 + 1);
        self.current_tick.hour() == 0
    }

    #[inline]
    pub fn hour(&self) -> u32 {
        self.current_tick.hour()
    }

    #[inline]
    pub fn day(&self) -> u64 {
        self.current_tick.day()
    }

    pub fn weekday(&self) -> Weekday {
        self.start_weekday.plus_days(self.day())
    }

    #[inline]
    pub fn is_workday(&self) -> bool {
        self.weekday().is_workday()
    }

    /// Snapshot of the current hour for the movement engine.
    pub fn hour_context(&self, is_new_day: bool) -> HourContext {
        HourContext {
            tick:       self.current_tick,
            hour:       self.hour(),
            day:        self.day(),
            is_workday: self.is_workday(),
            is_new_day,
        }
    }

    /// Ticks spanning `days` whole days.
    #[inline]
    pub fn ticks_for_days(days: u64) -> u64 {
        days * HOURS_PER_DAY
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (day {} {:02}:00 {:?})", self.current_tick, self.day(), self.hour(), self.weekday())
    }
}
