//! The `Person` agent.

use std::sync::Arc;

use ep_core::{CommunityId, PersonId, PersonRng, PlaceId, PlaceKind, Tick};
use ep_disease::{AgeGroup, Disease, Infection, SeirState};

use crate::BehaviorProfile;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sex {
    #[default]
    Female,
    Male,
}

/// Employment traits consulted by the work-from-home and lockdown rules.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Job {
    pub can_work_from_home:      bool,
    pub critical_infrastructure: bool,
}

/// Everything the population generator decides about a new person.
///
/// [`Community::add_person`][crate::Community::add_person] turns a spec into
/// a [`Person`], assigning its id and RNG stream.
#[derive(Clone, Debug, PartialEq)]
pub struct PersonSpec {
    pub age:       AgeGroup,
    pub sex:       Sex,
    pub profile:   BehaviorProfile,
    pub job:       Job,
    pub home:      PlaceId,
    pub workplace: Option<PlaceId>,
    pub school:    Option<PlaceId>,
}

/// Store visit planned for later today.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Errand {
    pub(crate) kind: PlaceKind,
    pub(crate) day:  u64,
    pub(crate) hour: u32,
}

/// One simulated individual.
///
/// A person is owned by its community's population arena.  `whereabouts`
/// always names a place in which this person is registered as an occupant;
/// only the community's transfer primitive changes it.
#[derive(Clone, Debug)]
pub struct Person {
    pub(crate) id:          PersonId,
    pub(crate) community:   CommunityId,
    pub(crate) age:         AgeGroup,
    pub(crate) sex:         Sex,
    pub(crate) profile:     BehaviorProfile,
    pub(crate) job:         Job,
    pub(crate) home:        PlaceId,
    pub(crate) workplace:   Option<PlaceId>,
    pub(crate) school:      Option<PlaceId>,
    pub(crate) whereabouts: PlaceId,
    pub(crate) alive:       bool,
    pub(crate) quarantined: bool,
    pub(crate) traveling:   bool,
    pub(crate) infection:   Infection,
    pub(crate) rng:         PersonRng,

    // ── Movement-engine bookkeeping ───────────────────────────────────────
    pub(crate) days_since_food:     u32,
    pub(crate) days_since_hardware: u32,
    pub(crate) errand:              Option<Errand>,
    pub(crate) shopping_day:        Option<u64>,
    pub(crate) arrived_at:          Tick,
    pub(crate) travel_days:         u32,
    pub(crate) last_test_day:       Option<u64>,
}

impl Person {
    pub(crate) fn from_spec(id: PersonId, community: CommunityId, spec: PersonSpec, seed: u64) -> Self {
        Self {
            id,
            community,
            age:         spec.age,
            sex:         spec.sex,
            profile:     spec.profile,
            job:         spec.job,
            home:        spec.home,
            workplace:   spec.workplace,
            school:      spec.school,
            whereabouts: spec.home,
            alive:       true,
            quarantined: false,
            traveling:   false,
            infection:   Infection::new(),
            rng:         PersonRng::new(seed, id),

            days_since_food:     0,
            days_since_hardware: 0,
            errand:              None,
            shopping_day:        None,
            arrived_at:          Tick::ZERO,
            travel_days:         0,
            last_test_day:       None,
        }
    }

    // ── Identity & static profile ─────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> PersonId {
        self.id
    }

    #[inline]
    pub fn community(&self) -> CommunityId {
        self.community
    }

    #[inline]
    pub fn age(&self) -> AgeGroup {
        self.age
    }

    #[inline]
    pub fn sex(&self) -> Sex {
        self.sex
    }

    #[inline]
    pub fn profile(&self) -> &BehaviorProfile {
        &self.profile
    }

    #[inline]
    pub fn job(&self) -> Job {
        self.job
    }

    #[inline]
    pub fn home(&self) -> PlaceId {
        self.home
    }

    #[inline]
    pub fn workplace(&self) -> Option<PlaceId> {
        self.workplace
    }

    #[inline]
    pub fn school(&self) -> Option<PlaceId> {
        self.school
    }

    // ── Dynamic state ─────────────────────────────────────────────────────

    #[inline]
    pub fn whereabouts(&self) -> PlaceId {
        self.whereabouts
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[inline]
    pub fn is_quarantined(&self) -> bool {
        self.quarantined
    }

    #[inline]
    pub fn is_traveling(&self) -> bool {
        self.traveling
    }

    #[inline]
    pub fn infection(&self) -> &Infection {
        &self.infection
    }

    #[inline]
    pub fn acceptance(&self) -> f64 {
        self.profile.acceptance
    }

    /// Expose this person to `disease`, snapshotting one illness course from
    /// the person's own RNG stream.  Returns `false` if not susceptible.
    pub fn contaminate(&mut self, disease: &Arc<Disease>) -> bool {
        self.infection.contaminate(disease, self.age, self.rng.inner())
    }

    /// Count one onward transmission from this person.
    pub fn record_spread(&mut self) {
        self.infection.record_spread();
    }

    /// Mark the person dead.  The next hourly update moves them to a morgue.
    pub fn kill(&mut self) {
        if self.alive {
            log::debug!("{} died at {}", self.id, self.whereabouts);
        }
        self.alive = false;
    }

    pub fn snapshot(&self) -> PersonSnapshot {
        PersonSnapshot {
            id:           self.id,
            age:          self.age,
            sex:          self.sex,
            alive:        self.alive,
            quarantined:  self.quarantined,
            traveling:    self.traveling,
            whereabouts:  self.whereabouts,
            seir:         self.infection.seir_state(),
            has_disease:  self.infection.has_disease(),
            symptomatic:  self.infection.has_symptoms(),
            recovered:    self.infection.has_recovered(),
            spread_count: self.infection.spread_count(),
        }
    }
}

/// Read-only copy of one person for reporting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersonSnapshot {
    pub id:           PersonId,
    pub age:          AgeGroup,
    pub sex:          Sex,
    pub alive:        bool,
    pub quarantined:  bool,
    pub traveling:    bool,
    pub whereabouts:  PlaceId,
    pub seir:         SeirState,
    pub has_disease:  bool,
    pub symptomatic:  bool,
    pub recovered:    bool,
    pub spread_count: u32,
}
