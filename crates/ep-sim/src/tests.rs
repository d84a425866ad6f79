//! Integration tests for ep-sim.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use ep_community::{
    BehaviorProfile, Community, CommunityStats, ContainmentStage, DailyRoutine, Job, PersonSpec,
    PopulationProfile, Sex, SyntheticPopulator,
};
use ep_core::{CommunityId, HourContext, PersonId, PlaceKind, SimConfig, Tick, Weekday};
use ep_disease::{AgeGroup, Disease, DiseaseBuilder, Infection, InfectionStage, SeirState, Span};

use crate::{NoopObserver, RunControl, RunSummary, SimBuilder, SimError, SimObserver, Simulation};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn test_config(population: usize, threads: usize) -> SimConfig {
    SimConfig {
        seed:                 42,
        num_threads:          Some(threads),
        start_weekday:        Weekday::Monday,
        community_count:      1,
        population_size:      population,
        initial_infections:   3,
        output_interval_days: 1,
    }
}

fn flu() -> DiseaseBuilder {
    DiseaseBuilder::new("flu")
        .incubation_period(1, 2)
        .infectious_days(4)
        .duration(8, 10)
        .mortality_by_age([0.0, 0.0, 0.0, 0.0, 0.01, 0.02, 0.05, 0.1, 0.2])
        .days_till_death(3, 5)
        .spread_factor(0.9, 1.0)
        .test_accuracy(0.9)
        .symptom_probability(0.5, 0.7)
}

fn build(config: SimConfig) -> Simulation {
    init_logger();
    SimBuilder::from_disease(config, flu()).unwrap().build().unwrap()
}

/// Records every callback.
#[derive(Default)]
struct Recorder {
    tick_starts: usize,
    tick_ends:   usize,
    infections:  usize,
    days:        Vec<u64>,
    curve:       Vec<usize>,
    stages:      Vec<(usize, ContainmentStage)>,
    runs:        Vec<RunSummary>,
    ends:        usize,
    stop_on_day: Option<(u64, RunControl)>,
    stop_on_run: Option<(usize, RunControl)>,
}

impl SimObserver for Recorder {
    fn on_tick_start(&mut self, _tick: Tick) {
        self.tick_starts += 1;
    }

    fn on_tick_end(&mut self, _tick: Tick, new_infections: usize) {
        self.tick_ends += 1;
        self.infections += new_infections;
    }

    fn on_new_day(&mut self, day: u64, _community: CommunityId, stats: &CommunityStats) {
        self.days.push(day);
        self.curve.push(stats.infection_max);
        if let Some((stop_day, control)) = &self.stop_on_day {
            if day == *stop_day {
                control.stop();
            }
        }
    }

    fn on_stage_change(&mut self, run: usize, stage: ContainmentStage) {
        self.stages.push((run, stage));
    }

    fn on_run_end(&mut self, summary: &RunSummary) {
        self.runs.push(*summary);
        if let Some((run, control)) = &self.stop_on_run {
            if summary.run == *run {
                control.stop();
            }
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        self.ends += 1;
    }
}

/// A two-person household with nowhere else to go.
fn household(seed: u64) -> Community {
    let community = Community::new(CommunityId(0), seed, DailyRoutine::default());
    for kind in [PlaceKind::Supply, PlaceKind::HardwareStore, PlaceKind::Morgue, PlaceKind::Travel] {
        community.add_place(kind);
    }
    let home = community.add_place(PlaceKind::Home);
    for _ in 0..2 {
        community
            .add_person(PersonSpec {
                age:       AgeGroup::from_years(40),
                sex:       Sex::Male,
                profile:   BehaviorProfile {
                    food_interval_days:     100,
                    hardware_interval_days: 100,
                    acceptance:             0.0,
                    travel_need:            0.0,
                },
                job:       Job::default(),
                home,
                workplace: None,
                school:    None,
            })
            .unwrap();
    }
    community
}

// ── SimBuilder ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn builds_and_seeds_infections() {
        let sim = build(test_config(200, 2));
        assert_eq!(sim.communities().len(), 1);
        let stats = sim.stats()[0];
        assert_eq!(stats.population, 200);
        assert_eq!(stats.exposed, 3);
        assert_eq!(sim.clock.current_tick, Tick::ZERO);
        assert_eq!(sim.travel_infecter().seir_state(), SeirState::Infectious);
    }

    #[test]
    fn zero_threads_is_a_config_error() {
        let mut config = test_config(10, 1);
        config.num_threads = Some(0);
        let result = SimBuilder::from_disease(config, flu()).unwrap().build();
        assert!(matches!(result, Err(SimError::Core(_))));
    }

    #[test]
    fn incomplete_disease_is_rejected() {
        let result = SimBuilder::from_disease(test_config(10, 1), DiseaseBuilder::new("half"));
        assert!(matches!(result, Err(SimError::Disease(_))));
    }

    #[test]
    fn prebuilt_communities_are_validated() {
        let empty = SimBuilder::from_disease(test_config(10, 1), flu())
            .unwrap()
            .communities(Vec::new())
            .build();
        assert!(matches!(empty, Err(SimError::Config(_))));

        let bare = Community::new(CommunityId(0), 1, DailyRoutine::default());
        let invalid = SimBuilder::from_disease(test_config(10, 1), flu())
            .unwrap()
            .communities(vec![bare])
            .build();
        assert!(matches!(invalid, Err(SimError::Community(_))));
    }

    #[test]
    fn surplus_initial_infections_infect_everyone() {
        let config = SimConfig { initial_infections: 50, ..test_config(5, 1) };
        let sim = build(config);
        assert_eq!(sim.stats()[0].exposed, 5);
    }

    #[test]
    fn containment_stage_applies_to_communities() {
        init_logger();
        let sim = SimBuilder::from_disease(test_config(20, 1), flu())
            .unwrap()
            .containment(ContainmentStage::Lockdown)
            .initial_infections(0)
            .build()
            .unwrap();
        assert_eq!(sim.stage(), ContainmentStage::Lockdown);
        assert!(sim.communities()[0].measures().lockdown);
        assert_eq!(sim.stats()[0].exposed, 0);
    }
}

// ── Tick loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    #[test]
    fn run_for_days_advances_whole_days() {
        let mut sim = build(test_config(50, 2));
        let mut rec = Recorder::default();
        sim.run_for_days(3, &mut rec).unwrap();

        assert_eq!(sim.clock.current_tick, Tick(72));
        assert_eq!(rec.tick_starts, 72);
        assert_eq!(rec.tick_ends, 72);
        assert_eq!(rec.days, vec![1, 2, 3]);
        assert_eq!(rec.ends, 1);
    }

    #[test]
    fn every_community_reports_each_day() {
        let config = SimConfig { community_count: 2, ..test_config(40, 2) };
        let mut sim = build(config);
        let mut rec = Recorder::default();
        sim.run_for_days(2, &mut rec).unwrap();

        let ids: Vec<CommunityId> = sim.communities().iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec![CommunityId(0), CommunityId(1)]);
        assert_eq!(rec.days, vec![1, 1, 2, 2]);
        assert!(sim.stats().iter().all(|s| s.population == 40));
        assert_eq!(sim.summary(0).population, 80);
    }

    #[test]
    fn report_interval_limits_daily_callbacks() {
        let config = SimConfig { output_interval_days: 2, ..test_config(30, 1) };
        let mut sim = build(config);
        let mut rec = Recorder::default();
        sim.run_for_days(5, &mut rec).unwrap();
        assert_eq!(rec.days, vec![2, 4]);
    }

    #[test]
    fn same_seed_same_outcome_across_thread_counts() {
        let mut one = build(test_config(300, 1));
        let mut four = build(test_config(300, 4));
        one.run_for_days(10, &mut NoopObserver).unwrap();
        four.run_for_days(10, &mut NoopObserver).unwrap();

        assert_eq!(
            one.communities()[0].population_snapshot(),
            four.communities()[0].population_snapshot()
        );
        assert_eq!(one.stats(), four.stats());
    }

    #[test]
    fn epidemic_spreads_and_curve_never_falls() {
        let mut sim = build(test_config(300, 2));
        let mut rec = Recorder::default();
        sim.run_for_days(20, &mut rec).unwrap();

        assert!(rec.infections > 0);
        assert!(sim.communities()[0].current_infection_max() > 3);
        assert!(rec.curve.windows(2).all(|w| w[0] <= w[1]), "curve {:?}", rec.curve);
    }

    #[test]
    fn infection_stages_never_regress() {
        let mut sim = build(test_config(200, 2));
        let mut last: Vec<InfectionStage> =
            vec![InfectionStage::Susceptible; sim.communities()[0].population_len()];
        for _ in 0..15 {
            sim.run_for_days(1, &mut NoopObserver).unwrap();
            let population = sim.communities()[0].read_population();
            for (i, person) in population.iter().enumerate() {
                let stage = person.infection().stage();
                assert!(stage >= last[i], "person {i}: {:?} -> {stage:?}", last[i]);
                last[i] = stage;
            }
        }
    }

    #[test]
    fn the_dead_rest_in_morgues() {
        init_logger();
        let deadly = DiseaseBuilder::new("deadly")
            .incubation_period(1, 1)
            .infectious_days(3)
            .duration(10, 10)
            .mortality_by_age([1.0; AgeGroup::COUNT])
            .days_till_death(2, 2)
            .spread_factor(0.5, 0.5)
            .test_accuracy(0.0)
            .symptom_probability(0.0, 0.0);
        let mut sim = SimBuilder::from_disease(test_config(50, 2), deadly).unwrap().build().unwrap();
        sim.run_for_days(5, &mut NoopObserver).unwrap();

        let community = &sim.communities()[0];
        assert!(community.stats().dead >= 3);
        for person in community.read_population().iter().filter(|p| !p.is_alive()) {
            let at = person.whereabouts();
            assert_eq!(at.kind, PlaceKind::Morgue);
            assert!(community.places().with_place(at, |p| p.contains(person.id())).unwrap());
        }
    }

    #[test]
    fn household_contact_is_certain_at_zero_acceptance() {
        init_logger();
        let certain = flu().incubation_period(1, 1).spread_factor(1.0, 1.0).symptom_probability(0.0, 0.0);
        let mut sim = SimBuilder::from_disease(test_config(2, 1), certain)
            .unwrap()
            .communities(vec![household(3)])
            .initial_infections(0)
            .build()
            .unwrap();
        let disease = Arc::clone(sim.disease());
        sim.communities()[0].with_person_mut(PersonId(0), |p| p.contaminate(&disease)).unwrap();

        // Person 0 turns infectious at the first midnight and exposes person 1.
        sim.run_for_days(1, &mut NoopObserver).unwrap();
        let community = &sim.communities()[0];
        assert_eq!(
            community.with_person(PersonId(1), |p| p.infection().seir_state()).unwrap(),
            SeirState::Exposed
        );
        assert_eq!(community.with_person(PersonId(0), |p| p.infection().spread_count()).unwrap(), 1);
    }

    #[test]
    fn travelers_catch_the_disease_outside() {
        init_logger();
        let populator = SyntheticPopulator::new(PopulationProfile {
            travel_need: Span::new(0.5, 0.5),
            ..PopulationProfile::default()
        });
        let mut sim = SimBuilder::from_disease(test_config(100, 2), flu())
            .unwrap()
            .populator(populator)
            .initial_infections(0)
            .build()
            .unwrap();
        sim.run_for_days(5, &mut NoopObserver).unwrap();

        assert!(sim.travel_infecter().spread_count() > 0);
        assert!(sim.communities()[0].current_infection_max() + sim.stats()[0].exposed > 0);
    }

    #[test]
    fn observer_can_stop_an_open_ended_run() {
        let mut sim = build(test_config(30, 1));
        let mut rec = Recorder { stop_on_day: Some((2, sim.control())), ..Recorder::default() };
        sim.run(&mut rec).unwrap();

        assert_eq!(sim.clock.current_tick, Tick(48));
        assert_eq!(rec.days, vec![1, 2]);
        assert_eq!(rec.ends, 1);
    }

    #[test]
    fn paused_run_waits_for_resume() {
        let mut sim = build(test_config(20, 1));
        let control = sim.control();
        control.pause();
        assert!(control.is_paused());

        let resumer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            control.resume();
        });
        sim.run_for_days(1, &mut NoopObserver).unwrap();
        resumer.join().unwrap();

        assert_eq!(sim.clock.current_tick, Tick(24));
    }
}

// ── Contacts ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod contact_tests {
    use super::*;
    use crate::contacts::find_exposures;

    #[test]
    fn no_carriers_no_exposures() {
        init_logger();
        let sim = SimBuilder::from_disease(test_config(100, 2), flu())
            .unwrap()
            .initial_infections(0)
            .build()
            .unwrap();
        let exposures =
            find_exposures(&sim.pool, &sim.communities()[0], sim.travel_infecter(), 42, Tick(1));
        assert!(exposures.is_empty());
    }

    /// One home of `size` persons in community `id`; person 0 is infectious.
    fn crowded_home(id: u16, size: usize, disease: &Arc<Disease>) -> Community {
        let community = Community::new(CommunityId(id), 7, DailyRoutine::default());
        for kind in [PlaceKind::Supply, PlaceKind::HardwareStore, PlaceKind::Morgue, PlaceKind::Travel] {
            community.add_place(kind);
        }
        let home = community.add_place(PlaceKind::Home);
        for _ in 0..size {
            community
                .add_person(PersonSpec {
                    age:       AgeGroup::from_years(30),
                    sex:       Sex::Female,
                    profile:   BehaviorProfile {
                        food_interval_days:     100,
                        hardware_interval_days: 100,
                        acceptance:             0.0,
                        travel_need:            0.0,
                    },
                    job:       Job::default(),
                    home,
                    workplace: None,
                    school:    None,
                })
                .unwrap();
        }
        let view = community.view();
        let midnight = HourContext { tick: Tick(24), hour: 0, day: 1, is_workday: true, is_new_day: true };
        community
            .with_person_mut(PersonId(0), |p| {
                assert!(p.contaminate(disease));
                p.update(&view, midnight).unwrap();
                assert!(p.infection().is_infectious());
            })
            .unwrap();
        community
    }

    #[test]
    fn communities_draw_independent_contact_streams() {
        init_logger();
        let disease = Arc::new(
            flu().incubation_period(1, 1).spread_factor(0.05, 0.05).build().unwrap(),
        );
        let outside = Infection::carrier(Arc::clone(&disease));
        let pool = rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap();
        let first = crowded_home(0, 20, &disease);
        let second = crowded_home(1, 20, &disease);

        let mut busy = 0;
        let mut identical = 0;
        for tick in 1..200 {
            let a = find_exposures(&pool, &first, &outside, 42, Tick(tick));
            let b = find_exposures(&pool, &second, &outside, 42, Tick(tick));
            if !a.is_empty() || !b.is_empty() {
                busy += 1;
                if a == b {
                    identical += 1;
                }
            }
        }
        assert!(busy > 20, "only {busy} ticks with exposures");
        assert!(identical < busy / 2, "{identical} of {busy} ticks identical");
    }

    #[test]
    fn exposures_are_sorted_and_unique() {
        let mut sim = build(SimConfig { initial_infections: 40, ..test_config(300, 4) });
        // Let the seeded cases turn infectious.
        sim.run_for_days(2, &mut NoopObserver).unwrap();

        let exposures =
            find_exposures(&sim.pool, &sim.communities()[0], sim.travel_infecter(), 42, Tick(49));
        assert!(exposures.windows(2).all(|w| w[0].target < w[1].target));
    }
}

// ── Containment comparison ────────────────────────────────────────────────────

#[cfg(test)]
mod compare_tests {
    use super::*;

    #[test]
    fn cycles_through_the_ladder() {
        let mut sim = build(test_config(60, 2));
        let mut rec = Recorder::default();
        let summaries = sim.compare_containment_measures(2, 6, &mut rec).unwrap();

        let stages: Vec<_> = summaries.iter().map(|s| s.stage).collect();
        assert_eq!(
            stages,
            vec![
                ContainmentStage::None,
                ContainmentStage::MaskMandate,
                ContainmentStage::WorkFromHome,
                ContainmentStage::ShopClosure,
                ContainmentStage::Lockdown,
                ContainmentStage::None,
            ]
        );
        assert!(summaries.iter().all(|s| s.days == 2 && s.population == 60));
        assert_eq!(rec.stages.len(), 6);
        assert_eq!(rec.runs, summaries);
        assert_eq!(summaries[0], RunSummary { run: 0, ..summaries[5] }, "same seed, same policy");
    }

    #[test]
    fn stop_ends_comparison_after_current_run() {
        let mut sim = build(test_config(30, 1));
        let mut rec = Recorder { stop_on_run: Some((1, sim.control())), ..Recorder::default() };
        let summaries = sim.compare_containment_measures(1, 5, &mut rec).unwrap();
        assert_eq!(summaries.len(), 2);
    }
}
