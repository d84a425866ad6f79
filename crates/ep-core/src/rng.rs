//! Deterministic per-person, per-place and simulation-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Each person owns an independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (person_id * MIXING_CONSTANT)
//!
//! Contact resolution draws from a `PlaceRng` re-derived every tick from
//! `(global_seed, tick, community, place)`.  The mixing constant is the 64-bit fractional
//! part of the golden ratio, which spreads consecutive IDs uniformly across the
//! seed space.  This means:
//!
//! - Workers never share RNG state (no contention, no ordering dependency).
//! - A run is reproducible for a given seed regardless of the thread count.
//! - All RNG calls are local to the owning thread; no synchronisation needed.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{CommunityId, PersonId, PlaceId, Tick};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Second odd constant so tick and place offsets never cancel each other out.
const TICK_CONSTANT: u64 = 0xbf58_476d_1ce4_e5b9;

/// Shared sampling helpers for all three wrappers.
macro_rules! rng_helpers {
    () => {
        /// Expose the inner `SmallRng` for use with `rand` distribution types
        /// and with functions generic over `R: Rng`.
        #[inline]
        pub fn inner(&mut self) -> &mut SmallRng {
            &mut self.0
        }

        /// Sample a uniformly distributed value of any `Standard`-distributed type.
        #[inline]
        pub fn random<T>(&mut self) -> T
        where
            rand::distributions::Standard: rand::distributions::Distribution<T>,
        {
            self.0.r#gen()
        }

        /// Generate a value uniformly in `range`.
        ///
        /// # Panics
        /// Panics if `range` is empty.
        #[inline]
        pub fn gen_range<T, R>(&mut self, range: R) -> T
        where
            T: rand::distributions::uniform::SampleUniform,
            R: rand::distributions::uniform::SampleRange<T>,
        {
            self.0.gen_range(range)
        }

        /// `true` with probability `p` (clamped to [0, 1]).
        #[inline]
        pub fn gen_bool(&mut self, p: f64) -> bool {
            self.0.gen_bool(p.clamp(0.0, 1.0))
        }

        /// Uniform index into a collection of `len` elements.
        ///
        /// # Panics
        /// Panics if `len == 0`.  An empty place or population collection at
        /// this point means the generator produced an invalid community.
        #[inline]
        pub fn index_below(&mut self, len: usize) -> usize {
            self.0.gen_range(0..len)
        }

        /// Choose a random element from a slice; `None` if it is empty.
        #[inline]
        pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
            use rand::seq::SliceRandom;
            slice.choose(&mut self.0)
        }

        /// Shuffle a mutable slice in-place (Fisher-Yates).
        #[inline]
        pub fn shuffle<T>(&mut self, slice: &mut [T]) {
            use rand::seq::SliceRandom;
            slice.shuffle(&mut self.0);
        }
    };
}

// ── PersonRng ─────────────────────────────────────────────────────────────────

/// Per-person deterministic RNG.
///
/// Created once per person by the population generator and stored on the
/// person itself, so the parallel per-person update hands every worker an
/// exclusive stream through `par_iter_mut()`.
#[derive(Clone, Debug)]
pub struct PersonRng(SmallRng);

impl PersonRng {
    /// Seed deterministically from the run's global seed and a person ID.
    pub fn new(global_seed: u64, person: PersonId) -> Self {
        let seed = global_seed ^ (person.0 as u64).wrapping_mul(MIXING_CONSTANT);
        PersonRng(SmallRng::seed_from_u64(seed))
    }

    rng_helpers!();
}

// ── PlaceRng ──────────────────────────────────────────────────────────────────

/// Per-place, per-tick RNG used by contact resolution.
///
/// Re-derived every tick, so the stream a place sees depends only on the seed,
/// the tick, the community and the place, never on which worker thread
/// resolved it.  Place handles restart at index 0 in every community, so the
/// community id is part of the key.
pub struct PlaceRng(SmallRng);

impl PlaceRng {
    pub fn new(global_seed: u64, tick: Tick, community: CommunityId, place: PlaceId) -> Self {
        // kind and index fill the low 48 bits of the stream key.
        let key = place.stream_key() | ((community.0 as u64) << 48);
        let seed = global_seed
            ^ key.wrapping_add(1).wrapping_mul(MIXING_CONSTANT)
            ^ tick.0.wrapping_add(1).wrapping_mul(TICK_CONSTANT);
        PlaceRng(SmallRng::seed_from_u64(seed))
    }

    rng_helpers!();
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level RNG for global operations (population generation,
/// initial infections, …).
///
/// Used only in single-threaded contexts.  If you need parallel randomness,
/// derive a child per worker with [`SimRng::child`].
#[derive(Clone, Debug)]
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` with a different seed offset, useful for
    /// seeding per-run or per-community streams deterministically.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    rng_helpers!();
}
