//! Population and place generation.
//!
//! The engine consumes already-built communities through the [`Populator`]
//! trait.  [`SyntheticPopulator`] draws everything uniformly from a
//! [`PopulationProfile`]; census-driven generators plug in the same way.

use ep_core::{CommunityId, PlaceId, PlaceKind, SimRng};
use ep_disease::{AgeGroup, Span};

use crate::{
    BehaviorProfile, Community, CommunityError, CommunityResult, DailyRoutine, Job, PersonSpec, Sex,
};

/// Builds one community of `size` persons.
///
/// Implementations must return a community that passes
/// [`Community::validate`].  `seed` seeds the persons' RNG streams; `rng` is
/// for the generator's own draws.
pub trait Populator: Send + Sync {
    fn populate(
        &self,
        id:      CommunityId,
        size:    usize,
        seed:    u64,
        routine: DailyRoutine,
        rng:     &mut SimRng,
    ) -> CommunityResult<Community>;
}

// ── PopulationProfile ─────────────────────────────────────────────────────────

/// Distributions used by [`SyntheticPopulator`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PopulationProfile {
    pub household_size:             Span<u32>,
    pub persons_per_supply:         usize,
    pub persons_per_hardware_store: usize,
    pub persons_per_workplace:      usize,
    pub persons_per_school:         usize,
    pub morgues:                    usize,
    pub travel_destinations:        usize,
    /// Share of working-age persons (20-69) with a job.
    pub employment_share:           f64,
    /// Share of persons under 20 enrolled in a school.
    pub student_share:              f64,
    /// Share of jobs that can be done from home.
    pub remote_work_share:          f64,
    /// Share of jobs in critical infrastructure.
    pub critical_job_share:         f64,
    pub food_interval_days:         Span<u32>,
    pub hardware_interval_days:     Span<u32>,
    pub acceptance:                 Span<f64>,
    pub travel_need:                Span<f64>,
}

impl PopulationProfile {
    pub fn validate(&self) -> CommunityResult<()> {
        let per_place = [
            ("persons_per_supply", self.persons_per_supply),
            ("persons_per_hardware_store", self.persons_per_hardware_store),
            ("persons_per_workplace", self.persons_per_workplace),
            ("persons_per_school", self.persons_per_school),
            ("morgues", self.morgues),
            ("travel_destinations", self.travel_destinations),
        ];
        if let Some((name, _)) = per_place.iter().find(|(_, n)| *n == 0) {
            return Err(CommunityError::Profile(format!("{name} must be positive")));
        }

        let shares = [
            ("employment_share", self.employment_share),
            ("student_share", self.student_share),
            ("remote_work_share", self.remote_work_share),
            ("critical_job_share", self.critical_job_share),
        ];
        for (name, share) in shares {
            if !(0.0..=1.0).contains(&share) {
                return Err(CommunityError::Profile(format!("{name} = {share} is outside [0, 1]")));
            }
        }

        if self.household_size.min == 0 || !self.household_size.is_ordered() {
            return Err(CommunityError::Profile("household_size must be a range of positive sizes".into()));
        }
        if self.food_interval_days.min == 0 || !self.food_interval_days.is_ordered() {
            return Err(CommunityError::Profile("food_interval_days must be a range of positive days".into()));
        }
        if self.hardware_interval_days.min == 0 || !self.hardware_interval_days.is_ordered() {
            return Err(CommunityError::Profile(
                "hardware_interval_days must be a range of positive days".into(),
            ));
        }
        for (name, span) in [("acceptance", self.acceptance), ("travel_need", self.travel_need)] {
            if !span.is_ordered() || span.min < 0.0 || span.max > 1.0 {
                return Err(CommunityError::Profile(format!("{name} must be an ordered range in [0, 1]")));
            }
        }
        Ok(())
    }
}

impl Default for PopulationProfile {
    fn default() -> Self {
        Self {
            household_size:             Span::new(1, 5),
            persons_per_supply:         250,
            persons_per_hardware_store: 1_000,
            persons_per_workplace:      25,
            persons_per_school:         200,
            morgues:                    1,
            travel_destinations:        1,
            employment_share:           0.7,
            student_share:              0.9,
            remote_work_share:          0.4,
            critical_job_share:         0.15,
            food_interval_days:         Span::new(2, 5),
            hardware_interval_days:     Span::new(7, 30),
            acceptance:                 Span::new(0.0, 1.0),
            travel_need:                Span::new(0.0, 0.02),
        }
    }
}

// ── SyntheticPopulator ────────────────────────────────────────────────────────

/// Uniform population generator.
///
/// Place counts scale with `size` (one supply store per
/// `persons_per_supply` persons, at least one of each kind); households are
/// filled until `size` persons exist.
#[derive(Clone, Debug, Default)]
pub struct SyntheticPopulator {
    pub profile: PopulationProfile,
}

impl SyntheticPopulator {
    pub fn new(profile: PopulationProfile) -> Self {
        Self { profile }
    }

    fn person_spec(
        &self,
        home:       PlaceId,
        workplaces: &[PlaceId],
        schools:    &[PlaceId],
        rng:        &mut SimRng,
    ) -> PersonSpec {
        let p = &self.profile;
        let age = AgeGroup::from_bucket(rng.gen_range(0..AgeGroup::COUNT));
        let sex = if rng.gen_bool(0.5) { Sex::Male } else { Sex::Female };

        let student = age.bucket() < 2 && rng.gen_bool(p.student_share);
        let employed = (2..7).contains(&age.bucket()) && rng.gen_bool(p.employment_share);
        let job = if employed {
            Job {
                can_work_from_home:      rng.gen_bool(p.remote_work_share),
                critical_infrastructure: rng.gen_bool(p.critical_job_share),
            }
        } else {
            Job::default()
        };

        PersonSpec {
            age,
            sex,
            profile: BehaviorProfile {
                food_interval_days:     p.food_interval_days.sample(rng.inner()),
                hardware_interval_days: p.hardware_interval_days.sample(rng.inner()),
                acceptance:             p.acceptance.sample(rng.inner()),
                travel_need:            p.travel_need.sample(rng.inner()),
            },
            job,
            home,
            workplace: if employed { rng.choose(workplaces).copied() } else { None },
            school:    if student { rng.choose(schools).copied() } else { None },
        }
    }
}

impl Populator for SyntheticPopulator {
    fn populate(
        &self,
        id:      CommunityId,
        size:    usize,
        seed:    u64,
        routine: DailyRoutine,
        rng:     &mut SimRng,
    ) -> CommunityResult<Community> {
        self.profile.validate()?;
        if size == 0 {
            return Err(CommunityError::EmptyPopulation);
        }

        let p = &self.profile;
        let community = Community::new(id, seed, routine);
        let place_counts = [
            (PlaceKind::Supply, size.div_ceil(p.persons_per_supply)),
            (PlaceKind::HardwareStore, size.div_ceil(p.persons_per_hardware_store)),
            (PlaceKind::Workplace, size.div_ceil(p.persons_per_workplace)),
            (PlaceKind::School, size.div_ceil(p.persons_per_school)),
            (PlaceKind::Morgue, p.morgues),
            (PlaceKind::Travel, p.travel_destinations),
        ];
        for (kind, count) in place_counts {
            for _ in 0..count {
                community.add_place(kind);
            }
        }
        let workplaces = community.places().ids(PlaceKind::Workplace);
        let schools = community.places().ids(PlaceKind::School);

        let mut remaining = size;
        while remaining > 0 {
            let home = community.add_place(PlaceKind::Home);
            let members = (p.household_size.sample(rng.inner()) as usize).min(remaining);
            for _ in 0..members {
                let spec = self.person_spec(home, &workplaces, &schools, rng);
                community.add_person(spec)?;
            }
            remaining -= members;
        }

        community.validate()?;
        log::info!(
            "{id}: populated {size} persons in {} homes",
            community.places().count(PlaceKind::Home)
        );
        Ok(community)
    }
}
