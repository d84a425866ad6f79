//! The `Community` registry and its borrowed per-tick view.

use std::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use ep_core::{CommunityId, PersonId, PlaceId, PlaceKind};
use ep_disease::SeirState;

use crate::sync::{lock, read, write};
use crate::{
    CommunityError, CommunityResult, ContainmentMeasures, ContainmentStage, DailyRoutine, Person,
    PersonSnapshot, PersonSpec, PlaceRegistry, PlaceSnapshot,
};

/// Kinds every community needs at least one place of; the movement engine
/// draws random destinations from them.
const REQUIRED_KINDS: [PlaceKind; 4] = [
    PlaceKind::Supply,
    PlaceKind::HardwareStore,
    PlaceKind::Morgue,
    PlaceKind::Travel,
];

/// Test-station tallies, cumulative over the run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TestCounters {
    pub tests_performed: u64,
    pub positive_tests:  u64,
    /// Quarantine orders issued, one per positive result.
    pub quarantined:     u64,
}

// ── Community ─────────────────────────────────────────────────────────────────

/// A population and all its places, plus the policy flags and test counters
/// that apply to them.
///
/// Every shared resource sits behind its own lock and is held only for one
/// operation.  The per-person update takes the population write lock once and
/// hands each worker a [`CommunityView`], which reaches places, policy and
/// counters without touching the population lock again.
#[derive(Debug)]
pub struct Community {
    id:         CommunityId,
    seed:       u64,
    routine:    DailyRoutine,
    population: RwLock<Vec<Person>>,
    places:     PlaceRegistry,
    measures:   RwLock<ContainmentMeasures>,
    tests:      Mutex<TestCounters>,
}

impl Community {
    /// An empty community.  `seed` seeds every person's RNG stream.
    pub fn new(id: CommunityId, seed: u64, routine: DailyRoutine) -> Self {
        Self {
            id,
            seed,
            routine,
            population: RwLock::new(Vec::new()),
            places:     PlaceRegistry::new(),
            measures:   RwLock::new(ContainmentMeasures::NONE),
            tests:      Mutex::new(TestCounters::default()),
        }
    }

    #[inline]
    pub fn id(&self) -> CommunityId {
        self.id
    }

    #[inline]
    pub fn routine(&self) -> &DailyRoutine {
        &self.routine
    }

    #[inline]
    pub fn places(&self) -> &PlaceRegistry {
        &self.places
    }

    // ── Construction ──────────────────────────────────────────────────────

    pub fn add_place(&self, kind: PlaceKind) -> PlaceId {
        self.places.add(kind)
    }

    /// Create a person from `spec`, register them as an occupant of their
    /// home, and return the new id.
    pub fn add_person(&self, spec: PersonSpec) -> CommunityResult<PersonId> {
        self.check_assignment(spec.home, PlaceKind::Home)?;
        if let Some(work) = spec.workplace {
            self.check_assignment(work, PlaceKind::Workplace)?;
        }
        if let Some(school) = spec.school {
            self.check_assignment(school, PlaceKind::School)?;
        }

        let mut population = write(&self.population);
        let id = PersonId(population.len() as u32);
        let person = Person::from_spec(id, self.id, spec, self.seed);
        self.places.with_place(person.home, |home| home.add(id))?;
        population.push(person);
        Ok(id)
    }

    fn check_assignment(&self, place: PlaceId, role: PlaceKind) -> CommunityResult<()> {
        if place.kind != role {
            return Err(CommunityError::WrongPlaceKind { place, role });
        }
        if !self.places.contains(place) {
            return Err(CommunityError::UnknownPlace(place));
        }
        Ok(())
    }

    /// Reject a community the movement engine could not run on.
    pub fn validate(&self) -> CommunityResult<()> {
        if read(&self.population).is_empty() {
            return Err(CommunityError::EmptyPopulation);
        }
        match REQUIRED_KINDS.iter().find(|&&kind| self.places.count(kind) == 0) {
            Some(&kind) => Err(CommunityError::MissingPlaces(kind)),
            None => Ok(()),
        }
    }

    // ── Population access ─────────────────────────────────────────────────

    pub fn population_len(&self) -> usize {
        read(&self.population).len()
    }

    /// Shared lock on the population.  Do not call
    /// [`write_population`](Self::write_population) while holding it.
    pub fn read_population(&self) -> RwLockReadGuard<'_, Vec<Person>> {
        read(&self.population)
    }

    /// Exclusive lock on the population.
    pub fn write_population(&self) -> RwLockWriteGuard<'_, Vec<Person>> {
        write(&self.population)
    }

    pub fn with_person<T>(&self, id: PersonId, f: impl FnOnce(&Person) -> T) -> CommunityResult<T> {
        read(&self.population)
            .get(id.index())
            .map(f)
            .ok_or(CommunityError::UnknownPerson(id))
    }

    pub fn with_person_mut<T>(
        &self,
        id: PersonId,
        f:  impl FnOnce(&mut Person) -> T,
    ) -> CommunityResult<T> {
        write(&self.population)
            .get_mut(id.index())
            .map(f)
            .ok_or(CommunityError::UnknownPerson(id))
    }

    // ── Policy ────────────────────────────────────────────────────────────

    pub fn measures(&self) -> ContainmentMeasures {
        *read(&self.measures)
    }

    pub fn set_measures(&self, measures: ContainmentMeasures) {
        *write(&self.measures) = measures;
    }

    /// Put the cumulative measures of `stage` into force.
    pub fn apply_stage(&self, stage: ContainmentStage) {
        log::info!("{}: containment stage {stage}", self.id);
        self.set_measures(stage.measures());
    }

    /// Borrowed view for one tick.  Policy flags are copied in, so a change
    /// made during the tick applies from the next one.
    pub fn view(&self) -> CommunityView<'_> {
        CommunityView {
            places:   &self.places,
            measures: self.measures(),
            tests:    &self.tests,
            routine:  &self.routine,
        }
    }

    // ── Transfers ─────────────────────────────────────────────────────────
    //
    // `person` is borrowed from this community's population guard; none of
    // these take the population lock.

    pub fn transfer_to_home(&self, person: &mut Person) -> CommunityResult<PlaceId> {
        self.view().transfer_to_home(person)
    }

    pub fn transfer_to_work(&self, person: &mut Person) -> CommunityResult<PlaceId> {
        self.view().transfer_to_work(person)
    }

    pub fn transfer_to_school(&self, person: &mut Person) -> CommunityResult<PlaceId> {
        self.view().transfer_to_school(person)
    }

    pub fn transfer_to_supply(&self, person: &mut Person) -> CommunityResult<PlaceId> {
        self.view().transfer_to_supply(person)
    }

    pub fn transfer_to_hardware_store(&self, person: &mut Person) -> CommunityResult<PlaceId> {
        self.view().transfer_to_hardware_store(person)
    }

    pub fn transfer_to_morgue(&self, person: &mut Person) -> CommunityResult<PlaceId> {
        self.view().transfer_to_morgue(person)
    }

    pub fn transfer_to_travel(&self, person: &mut Person) -> CommunityResult<PlaceId> {
        self.view().transfer_to_travel(person)
    }

    /// Test `person`; see [`CommunityView::test_station`].
    pub fn test_station(&self, person: &mut Person) -> CommunityResult<bool> {
        self.view().test_station(person)
    }

    // ── Counters & reporting ──────────────────────────────────────────────

    pub fn test_counters(&self) -> TestCounters {
        *lock(&self.tests)
    }

    pub fn number_of_positive_tests(&self) -> u64 {
        lock(&self.tests).positive_tests
    }

    pub fn number_of_persons_quarantined(&self) -> u64 {
        lock(&self.tests).quarantined
    }

    /// Persons ever infected: dead, recovered, or currently infectious.
    pub fn current_infection_max(&self) -> usize {
        read(&self.population)
            .iter()
            .filter(|p| {
                !p.alive
                    || matches!(p.infection.seir_state(), SeirState::Infectious | SeirState::Recovered)
            })
            .count()
    }

    pub fn stats(&self) -> CommunityStats {
        let mut stats = CommunityStats::default();
        {
            let population = read(&self.population);
            stats.population = population.len();
            for p in population.iter() {
                if !p.alive {
                    stats.dead += 1;
                    stats.infection_max += 1;
                    continue;
                }
                match p.infection.seir_state() {
                    SeirState::Susceptible => stats.susceptible += 1,
                    SeirState::Exposed     => stats.exposed += 1,
                    SeirState::Infectious  => stats.infectious += 1,
                    SeirState::Recovered   => stats.recovered += 1,
                }
                if p.infection.has_recovered() {
                    stats.cured += 1;
                }
                if p.quarantined {
                    stats.quarantined_now += 1;
                }
                if p.traveling {
                    stats.traveling += 1;
                }
            }
            stats.infection_max += stats.infectious + stats.recovered;
        }
        let tests = self.test_counters();
        stats.tests_performed   = tests.tests_performed;
        stats.positive_tests    = tests.positive_tests;
        stats.quarantined_total = tests.quarantined;
        stats
    }

    pub fn population_snapshot(&self) -> Vec<PersonSnapshot> {
        read(&self.population).iter().map(Person::snapshot).collect()
    }

    pub fn place_snapshots(&self) -> Vec<PlaceSnapshot> {
        PlaceKind::ALL
            .iter()
            .flat_map(|&kind| self.places.snapshots(kind))
            .collect()
    }
}

/// Headline numbers for one community at one moment.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CommunityStats {
    pub population:        usize,
    pub susceptible:       usize,
    pub exposed:           usize,
    pub infectious:        usize,
    /// SEIR `Recovered`, cured or not.
    pub recovered:         usize,
    /// Fully cured (subset of `recovered`).
    pub cured:             usize,
    pub dead:              usize,
    pub quarantined_now:   usize,
    pub traveling:         usize,
    pub infection_max:     usize,
    pub tests_performed:   u64,
    pub positive_tests:    u64,
    pub quarantined_total: u64,
}

// ── CommunityView ─────────────────────────────────────────────────────────────

/// What one person's update may touch: places, a copy of the policy flags,
/// the routine, and the test counters.  `Sync`, so every Rayon worker
/// shares one.
#[derive(Clone, Copy)]
pub struct CommunityView<'a> {
    pub(crate) places:   &'a PlaceRegistry,
    pub(crate) measures: ContainmentMeasures,
    pub(crate) tests:    &'a Mutex<TestCounters>,
    pub(crate) routine:  &'a DailyRoutine,
}

impl<'a> CommunityView<'a> {
    #[inline]
    pub fn measures(&self) -> ContainmentMeasures {
        self.measures
    }

    #[inline]
    pub fn routine(&self) -> &'a DailyRoutine {
        self.routine
    }

    #[inline]
    pub fn places(&self) -> &'a PlaceRegistry {
        self.places
    }

    /// The one movement primitive: leave the current place, enter `dest`.
    pub fn transfer(&self, person: &mut Person, dest: PlaceId) -> CommunityResult<PlaceId> {
        if person.whereabouts != dest {
            self.places.relocate(person.id, person.whereabouts, dest)?;
            person.whereabouts = dest;
        }
        Ok(dest)
    }

    fn transfer_to_random(&self, person: &mut Person, kind: PlaceKind) -> CommunityResult<PlaceId> {
        let n = person.rng.index_below(self.places.count(kind));
        let dest = self.places.nth(kind, n);
        self.transfer(person, dest)
    }

    pub fn transfer_to_home(&self, person: &mut Person) -> CommunityResult<PlaceId> {
        let home = person.home;
        self.transfer(person, home)
    }

    /// Move to the assigned workplace; persons without one stay put.
    pub fn transfer_to_work(&self, person: &mut Person) -> CommunityResult<PlaceId> {
        match person.workplace {
            Some(work) => self.transfer(person, work),
            None => Ok(person.whereabouts),
        }
    }

    /// Move to the assigned school; persons without one stay put.
    pub fn transfer_to_school(&self, person: &mut Person) -> CommunityResult<PlaceId> {
        match person.school {
            Some(school) => self.transfer(person, school),
            None => Ok(person.whereabouts),
        }
    }

    pub fn transfer_to_supply(&self, person: &mut Person) -> CommunityResult<PlaceId> {
        self.transfer_to_random(person, PlaceKind::Supply)
    }

    pub fn transfer_to_hardware_store(&self, person: &mut Person) -> CommunityResult<PlaceId> {
        self.transfer_to_random(person, PlaceKind::HardwareStore)
    }

    pub fn transfer_to_morgue(&self, person: &mut Person) -> CommunityResult<PlaceId> {
        self.transfer_to_random(person, PlaceKind::Morgue)
    }

    pub fn transfer_to_travel(&self, person: &mut Person) -> CommunityResult<PlaceId> {
        self.transfer_to_random(person, PlaceKind::Travel)
    }

    /// Test `person` for disease.
    ///
    /// A person carrying a disease tests positive with the disease's test
    /// accuracy; a positive result sends them home into quarantine.  A
    /// quarantined person who no longer carries a disease and tests negative
    /// is released.  Every positive result counts one positive test and one
    /// quarantine order, even for a person already in quarantine.  Returns
    /// the test result.
    pub fn test_station(&self, person: &mut Person) -> CommunityResult<bool> {
        let positive = match person.infection.disease().cloned() {
            Some(disease) => disease.test_positive(person.rng.inner()),
            None => false,
        };

        if positive {
            self.transfer_to_home(person)?;
            if !person.quarantined {
                log::debug!("{} tested positive, quarantined", person.id);
            }
            person.quarantined = true;
            person.traveling = false;
            person.travel_days = 0;
            person.errand = None;
        } else if person.quarantined && !person.infection.has_disease() {
            person.quarantined = false;
            log::debug!("{} tested negative, released from quarantine", person.id);
        }

        let mut counters = lock(self.tests);
        counters.tests_performed += 1;
        if positive {
            counters.positive_tests += 1;
            counters.quarantined += 1;
        }
        Ok(positive)
    }
}
