//! Per-place contact resolution.
//!
//! Split in two phases so parallel execution cannot reorder random draws or
//! mutations:
//!
//! 1. **Exposure** (parallel over places, read-only): each occupied place
//!    draws from its own `PlaceRng` and lists the susceptible occupants who
//!    were exposed this hour, with the source that exposed them.
//! 2. **Apply** (sequential, ascending `PersonId`): contaminate each target
//!    and credit the source's spread counter.
//!
//! A person occupies exactly one place, so each target appears at most once.

use ep_community::{Community, ContainmentMeasures, DailyRoutine, Person};
use ep_core::{CommunityId, PersonId, PlaceId, PlaceKind, PlaceRng, Tick};
use ep_disease::Infection;
use rayon::ThreadPool;
use rayon::prelude::*;

/// Who passed the disease on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Source {
    Person(PersonId),
    /// The outside carrier travelers meet.
    Outside,
}

/// One successful contact found by the exposure phase.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Exposure {
    pub target: PersonId,
    pub source: Source,
}

/// Resolve one hour of contacts in `community`; returns the number of new
/// infections.
///
/// Morgues are skipped; the dead are never sources or targets.
pub fn resolve(
    pool:      &ThreadPool,
    community: &Community,
    outside:   &mut Infection,
    seed:      u64,
    tick:      Tick,
) -> usize {
    let exposures = find_exposures(pool, community, outside, seed, tick);
    if exposures.is_empty() {
        return 0;
    }

    let mut population = community.write_population();
    let mut infected = 0;
    for Exposure { target, source } in exposures {
        let disease = match source {
            Source::Person(src) => population[src.index()].infection().disease().cloned(),
            Source::Outside => outside.disease().cloned(),
        };
        let Some(disease) = disease else { continue };
        if !population[target.index()].contaminate(&disease) {
            continue;
        }
        match source {
            Source::Person(src) => population[src.index()].record_spread(),
            Source::Outside => outside.record_spread(),
        }
        infected += 1;
    }
    log::trace!("{}: {tick} {infected} new infections", community.id());
    infected
}

/// Exposure phase.  Result is sorted by target id.
pub fn find_exposures(
    pool:      &ThreadPool,
    community: &Community,
    outside:   &Infection,
    seed:      u64,
    tick:      Tick,
) -> Vec<Exposure> {
    let occupied = community.places().occupied(&[PlaceKind::Morgue]);
    let measures = community.measures();
    let routine = community.routine();
    let id = community.id();
    let population = community.read_population();
    let people: &[Person] = &population;

    let mut exposures: Vec<Exposure> = pool.install(|| {
        occupied
            .par_iter()
            .flat_map_iter(|(place, occupants)| {
                expose_place(id, *place, occupants, people, outside, measures, routine, seed, tick)
            })
            .collect()
    });
    exposures.sort_unstable_by_key(|e| e.target);
    exposures
}

#[allow(clippy::too_many_arguments)]
fn expose_place(
    community:  CommunityId,
    place:      PlaceId,
    occupants:  &[PersonId],
    population: &[Person],
    outside:    &Infection,
    measures:   ContainmentMeasures,
    routine:    &DailyRoutine,
    seed:       u64,
    tick:       Tick,
) -> Vec<Exposure> {
    let mut occupants = occupants.to_vec();
    occupants.sort_unstable();

    let (infectious, susceptible): (Vec<PersonId>, Vec<PersonId>) = {
        let alive = occupants.iter().copied().filter(|id| population[id.index()].is_alive());
        let mut infectious = Vec::new();
        let mut susceptible = Vec::new();
        for id in alive {
            let infection = population[id.index()].infection();
            if infection.is_infectious() {
                infectious.push(id);
            } else if infection.is_susceptible() {
                susceptible.push(id);
            }
        }
        (infectious, susceptible)
    };

    let travel = place.kind == PlaceKind::Travel;
    if susceptible.is_empty() || (infectious.is_empty() && !travel) {
        return Vec::new();
    }

    let mut rng = PlaceRng::new(seed, tick, community, place);
    let mut exposures = Vec::new();
    for target in susceptible {
        let person = &population[target.index()];
        let acceptance = person.acceptance();

        let mut source = infectious
            .iter()
            .find(|src| {
                population[src.index()].infection().will_infect(
                    person.infection(),
                    acceptance,
                    measures.mask_mandate,
                    rng.inner(),
                )
            })
            .map(|&src| Source::Person(src));

        if source.is_none() && travel && person.is_traveling() {
            let contacts = rng.gen_range(0..=routine.max_travel_contacts);
            let caught = (0..contacts).any(|_| {
                outside.will_infect(person.infection(), acceptance, measures.mask_mandate, rng.inner())
            });
            if caught {
                source = Some(Source::Outside);
            }
        }

        if let Some(source) = source {
            exposures.push(Exposure { target, source });
        }
    }
    log::trace!("{place}: {} exposures at {tick}", exposures.len());
    exposures
}
