//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  Persons and places live in
//! per-community slot arrays; an ID is a stable index into those arrays and
//! stays valid when the arrays grow.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a person in its community's population arena.
    pub struct PersonId(u32);
}

typed_id! {
    /// Index of a community owned by the simulation.
    pub struct CommunityId(u16);
}

// ── PlaceKind ─────────────────────────────────────────────────────────────────

/// The type tag every place carries.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlaceKind {
    Home,
    Supply,
    Workplace,
    School,
    HardwareStore,
    Morgue,
    Travel,
}

impl PlaceKind {
    /// Every kind, in storage order.
    pub const ALL: [PlaceKind; 7] = [
        PlaceKind::Home,
        PlaceKind::Supply,
        PlaceKind::Workplace,
        PlaceKind::School,
        PlaceKind::HardwareStore,
        PlaceKind::Morgue,
        PlaceKind::Travel,
    ];

    /// Position of this kind inside [`PlaceKind::ALL`]; used to index the
    /// per-kind place arenas.
    #[inline]
    pub fn slot(self) -> usize {
        self as usize
    }

    /// Human-readable label, useful for CSV column values.
    pub fn as_str(self) -> &'static str {
        match self {
            PlaceKind::Home          => "home",
            PlaceKind::Supply        => "supply",
            PlaceKind::Workplace     => "workplace",
            PlaceKind::School        => "school",
            PlaceKind::HardwareStore => "hardware_store",
            PlaceKind::Morgue        => "morgue",
            PlaceKind::Travel        => "travel",
        }
    }

    /// `true` for the two shop kinds a person visits on errands.
    #[inline]
    pub fn is_store(self) -> bool {
        matches!(self, PlaceKind::Supply | PlaceKind::HardwareStore)
    }
}

impl fmt::Display for PlaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── PlaceId ───────────────────────────────────────────────────────────────────

/// Handle of a place: its kind plus an index into that kind's arena.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaceId {
    pub kind:  PlaceKind,
    pub index: u32,
}

impl PlaceId {
    #[inline]
    pub fn new(kind: PlaceKind, index: u32) -> Self {
        Self { kind, index }
    }

    /// Stable 64-bit key mixing kind and index, used to derive per-place RNG
    /// streams.
    #[inline]
    pub fn stream_key(self) -> u64 {
        ((self.kind.slot() as u64) << 32) | self.index as u64
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.index)
    }
}
