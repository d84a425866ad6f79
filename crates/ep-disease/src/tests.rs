//! Unit tests for ep-disease.

use std::sync::Arc;

use ep_core::SimRng;

use crate::{AgeGroup, Disease, DiseaseBuilder};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// A disease with every parameter fixed, so tests can reason about exact days.
fn fixed_disease(mortality: f64, duration: u32) -> DiseaseBuilder {
    DiseaseBuilder::new("fixed")
        .incubation_period(1, 1)
        .infectious_days(1)
        .duration(duration, duration)
        .mortality_by_age([mortality; AgeGroup::COUNT])
        .days_till_death(2, 2)
        .spread_factor(1.0, 1.0)
        .test_accuracy(1.0)
        .symptom_probability(0.0, 0.0)
}

fn shared(builder: DiseaseBuilder) -> Arc<Disease> {
    Arc::new(builder.build().unwrap())
}

// ── AgeGroup ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod age_tests {
    use super::*;

    #[test]
    fn decade_boundaries() {
        for years in 0..10 {
            assert_eq!(AgeGroup::from_years(years).bucket(), 0, "age {years}");
        }
        for bucket in 1..8u32 {
            assert_eq!(AgeGroup::from_years(bucket * 10 - 1).bucket(), (bucket - 1) as usize);
            assert_eq!(AgeGroup::from_years(bucket * 10).bucket(), bucket as usize);
        }
        for years in [80, 81, 95, 120, u32::MAX] {
            assert_eq!(AgeGroup::from_years(years), AgeGroup::OLDEST);
        }
    }

    #[test]
    fn out_of_range_bucket_degrades_to_oldest() {
        assert_eq!(AgeGroup::from_bucket(42), AgeGroup::OLDEST);
        assert_eq!(AgeGroup::all().count(), AgeGroup::COUNT);
    }

    #[test]
    fn display() {
        assert_eq!(AgeGroup::from_years(34).to_string(), "30-39");
        assert_eq!(AgeGroup::OLDEST.to_string(), "80+");
    }
}

// ── Disease & builder ─────────────────────────────────────────────────────────

#[cfg(test)]
mod disease_tests {
    use crate::DiseaseError;

    use super::*;

    #[test]
    fn mortality_by_age_uses_decade_buckets() {
        let table = [0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8];
        let disease = fixed_disease(0.0, 3).mortality_by_age(table).build().unwrap();
        for years in 0..10 {
            assert_eq!(disease.mortality_by_age(years), 0.0);
        }
        assert_eq!(disease.mortality_by_age(10), 0.1);
        assert_eq!(disease.mortality_by_age(19), 0.1);
        assert_eq!(disease.mortality_by_age(79), 0.7);
        assert_eq!(disease.mortality_by_age(80), 0.8);
        assert_eq!(disease.mortality_by_age(104), 0.8);
    }

    #[test]
    fn accessors_sample_inside_ranges() {
        let disease = DiseaseBuilder::new("ranged")
            .incubation_period(2, 5)
            .infectious_days(3)
            .duration(6, 9)
            .mortality_by_age([0.0; AgeGroup::COUNT])
            .days_till_death(4, 4)
            .spread_factor(0.1, 0.3)
            .test_accuracy(0.8)
            .symptom_probability(0.2, 0.4)
            .build()
            .unwrap();
        let mut rng = SimRng::new(7);
        for _ in 0..500 {
            assert!((2..=5).contains(&disease.incubation_period(rng.inner())));
            assert!((6..=9).contains(&disease.disease_duration(rng.inner())));
            assert_eq!(disease.days_till_death(rng.inner()), 4);
            let s = disease.spread_factor(rng.inner());
            assert!((0.1..=0.3).contains(&s));
        }
        assert_eq!(disease.infectious_days(), 3);
        assert_eq!(disease.test_accuracy(), 0.8);
        assert_eq!(disease.name(), "ranged");
    }

    #[test]
    fn accessors_redraw_each_call() {
        let disease = fixed_disease(0.0, 3).incubation_period(1, 1_000).build().unwrap();
        let mut rng = SimRng::new(1);
        let draws: std::collections::HashSet<u32> =
            (0..20).map(|_| disease.incubation_period(rng.inner())).collect();
        assert!(draws.len() > 1, "a disease is a distribution, not a fixed value");
    }

    #[test]
    fn certain_and_impossible_fatality() {
        let mut rng = SimRng::new(3);
        let deadly = fixed_disease(1.0, 3).build().unwrap();
        let harmless = fixed_disease(0.0, 3).build().unwrap();
        for group in AgeGroup::all() {
            assert!(deadly.is_fatal(group, rng.inner()));
            assert!(!harmless.is_fatal(group, rng.inner()));
        }
    }

    #[test]
    fn missing_parameter_is_reported() {
        let err = DiseaseBuilder::new("incomplete")
            .incubation_period(1, 2)
            .build()
            .unwrap_err();
        assert!(matches!(err, DiseaseError::MissingParameter("infectious_days")));

        let err = DiseaseBuilder::new("empty").build().unwrap_err();
        assert!(matches!(err, DiseaseError::MissingParameter("incubation_period")));
    }

    #[test]
    fn inverted_range_rejected() {
        let err = fixed_disease(0.0, 3).duration(9, 2).build().unwrap_err();
        assert!(matches!(err, DiseaseError::InvalidRange { name: "duration", .. }));
    }

    #[test]
    fn probability_out_of_bounds_rejected() {
        let err = fixed_disease(0.0, 3).test_accuracy(1.5).build().unwrap_err();
        assert!(matches!(err, DiseaseError::InvalidProbability { name: "test_accuracy", .. }));

        let err = fixed_disease(-0.1, 3).build().unwrap_err();
        assert!(matches!(err, DiseaseError::InvalidProbability { name: "mortality_by_age", .. }));
    }
}

// ── Infection state machine ───────────────────────────────────────────────────

#[cfg(test)]
mod infection_tests {
    use crate::{DayOutcome, Infection, InfectionStage, SeirState};

    use super::*;

    #[test]
    fn fresh_infection_is_susceptible() {
        let inf = Infection::new();
        assert!(inf.is_susceptible());
        assert!(!inf.has_disease());
        assert_eq!(inf.seir_state(), SeirState::Susceptible);
    }

    #[test]
    fn contaminate_leaves_exposed() {
        let disease = shared(fixed_disease(0.0, 3));
        let mut rng = SimRng::new(0);
        let mut inf = Infection::new();
        assert!(inf.contaminate(&disease, AgeGroup::from_years(30), rng.inner()));
        assert!(!inf.is_susceptible());
        assert!(!inf.is_infectious());
        assert!(inf.is_exposed());
        assert!(inf.has_disease());
        assert_eq!(inf.latent_days(), 1);
        assert_eq!(inf.days_till_cured(), 3);
    }

    #[test]
    fn contaminate_twice_is_ignored() {
        let disease = shared(fixed_disease(0.0, 3));
        let mut rng = SimRng::new(0);
        let mut inf = Infection::new();
        assert!(inf.contaminate(&disease, AgeGroup::default(), rng.inner()));
        assert!(!inf.contaminate(&disease, AgeGroup::default(), rng.inner()));
    }

    #[test]
    fn recovered_before_cured_scenario() {
        let disease = shared(fixed_disease(0.0, 3));
        let mut rng = SimRng::new(0);
        let mut inf = Infection::new();
        inf.contaminate(&disease, AgeGroup::default(), rng.inner());

        assert_eq!(inf.advance_day(rng.inner()), DayOutcome::Survived);
        assert!(inf.is_infectious(), "day 1: infectious");

        assert_eq!(inf.advance_day(rng.inner()), DayOutcome::Survived);
        assert_eq!(inf.seir_state(), SeirState::Recovered, "day 2: SEIR recovered");
        assert_eq!(inf.stage(), InfectionStage::Convalescent);
        assert!(!inf.has_recovered(), "day 2: not yet cured");
        assert!(inf.has_disease());

        assert_eq!(inf.advance_day(rng.inner()), DayOutcome::Survived);
        assert!(inf.has_recovered(), "day 3: cured");
        assert!(!inf.has_disease());
        assert!(!inf.is_susceptible(), "no re-susceptibility after cure");
    }

    #[test]
    fn fatal_case_dies_on_second_day() {
        let disease = shared(fixed_disease(1.0, 5));
        let mut rng = SimRng::new(0);
        let mut inf = Infection::new();
        inf.contaminate(&disease, AgeGroup::OLDEST, rng.inner());
        assert!(inf.is_fatal());
        assert_eq!(inf.days_to_live(), Some(2));

        assert_eq!(inf.advance_day(rng.inner()), DayOutcome::Survived);
        assert_eq!(inf.advance_day(rng.inner()), DayOutcome::Died);
    }

    #[test]
    fn death_after_infectious_period_but_before_cure() {
        // Infectious for 1 day, dead on day 3, cured on day 5.
        let disease = shared(fixed_disease(1.0, 5).days_till_death(3, 3));
        let mut rng = SimRng::new(0);
        let mut inf = Infection::new();
        inf.contaminate(&disease, AgeGroup::default(), rng.inner());
        assert_eq!(inf.advance_day(rng.inner()), DayOutcome::Survived);
        assert_eq!(inf.advance_day(rng.inner()), DayOutcome::Survived);
        assert_eq!(inf.seir_state(), SeirState::Recovered);
        assert_eq!(inf.advance_day(rng.inner()), DayOutcome::Died);
    }

    #[test]
    fn cure_before_death_day_survives() {
        let disease = shared(fixed_disease(1.0, 1).days_till_death(4, 4));
        let mut rng = SimRng::new(0);
        let mut inf = Infection::new();
        inf.contaminate(&disease, AgeGroup::default(), rng.inner());
        for _ in 0..10 {
            assert_eq!(inf.advance_day(rng.inner()), DayOutcome::Survived);
        }
        assert!(inf.has_recovered());
    }

    #[test]
    fn seir_never_regresses() {
        let disease = shared(
            DiseaseBuilder::new("ranged")
                .incubation_period(0, 4)
                .infectious_days(3)
                .duration(1, 12)
                .mortality_by_age([0.0; AgeGroup::COUNT])
                .days_till_death(1, 1)
                .spread_factor(0.5, 0.5)
                .test_accuracy(1.0)
                .symptom_probability(0.0, 1.0),
        );
        let mut rng = SimRng::new(99);
        for _ in 0..200 {
            let mut inf = Infection::new();
            inf.contaminate(&disease, AgeGroup::default(), rng.inner());
            let mut last = inf.stage();
            for _ in 0..20 {
                let _ = inf.advance_day(rng.inner());
                assert!(inf.stage() >= last, "{last:?} -> {:?}", inf.stage());
                last = inf.stage();
            }
        }
    }

    #[test]
    fn disease_free_day_is_noop() {
        let mut rng = SimRng::new(0);
        let mut inf = Infection::new();
        assert_eq!(inf.advance_day(rng.inner()), DayOutcome::Survived);
        assert!(inf.is_susceptible());
    }
}

// ── Transmission ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod transmission_tests {
    use crate::{Infection, MASK_TRANSMISSION_FACTOR, linear_map};

    use super::*;

    #[test]
    fn linear_map_endpoints_and_degenerate() {
        assert_eq!(linear_map(0.0, (0.0, 1.0), (0.5, 0.05)), 0.5);
        assert!((linear_map(1.0, (0.0, 1.0), (0.5, 0.05)) - 0.05).abs() < 1e-12);
        assert!((linear_map(0.5, (0.0, 1.0), (1.0, 0.0)) - 0.5).abs() < 1e-12);
        assert_eq!(linear_map(0.3, (2.0, 2.0), (7.0, 9.0)), 7.0);
    }

    #[test]
    fn zero_acceptance_full_spread_always_infects() {
        let disease = shared(fixed_disease(0.0, 3));
        let source = Infection::carrier(disease);
        let target = Infection::new();
        let mut rng = SimRng::new(4);
        for _ in 0..1_000 {
            assert!(source.will_infect(&target, 0.0, false, rng.inner()));
        }
    }

    #[test]
    fn never_infects_non_susceptible_or_from_healthy() {
        let disease = shared(fixed_disease(0.0, 3));
        let source = Infection::carrier(Arc::clone(&disease));
        let mut rng = SimRng::new(4);
        let mut exposed = Infection::new();
        exposed.contaminate(&disease, AgeGroup::default(), rng.inner());
        assert!(!source.will_infect(&exposed, 0.0, false, rng.inner()));

        let healthy = Infection::new();
        assert!(!healthy.will_infect(&Infection::new(), 0.0, false, rng.inner()));
    }

    #[test]
    fn mask_mandate_scales_rate() {
        let disease = shared(fixed_disease(0.0, 3).spread_factor(0.6, 0.6));
        let source = Infection::carrier(disease);
        let target = Infection::new();
        let mut rng = SimRng::new(11);
        let trials = 200_000;
        let acceptance = 0.25;
        let plain = (0..trials)
            .filter(|_| source.will_infect(&target, acceptance, false, rng.inner()))
            .count() as f64;
        let masked = (0..trials)
            .filter(|_| source.will_infect(&target, acceptance, true, rng.inner()))
            .count() as f64;
        let ratio = masked / plain;
        assert!(
            (ratio - MASK_TRANSMISSION_FACTOR).abs() < 0.02,
            "masked/plain = {ratio}"
        );
    }

    #[test]
    fn higher_acceptance_lowers_rate() {
        let disease = shared(fixed_disease(0.0, 3).spread_factor(0.5, 0.5));
        let source = Infection::carrier(disease);
        let target = Infection::new();
        let mut rng = SimRng::new(12);
        let rate = |acc: f64, rng: &mut SimRng| {
            (0..50_000)
                .filter(|_| source.will_infect(&target, acc, false, rng.inner()))
                .count()
        };
        let low = rate(1.0, &mut rng);
        let high = rate(0.0, &mut rng);
        assert!(low * 5 < high, "acceptance 1 → {low}, acceptance 0 → {high}");
    }

    #[test]
    fn spread_counter() {
        let disease = shared(fixed_disease(0.0, 3));
        let mut source = Infection::carrier(disease);
        source.record_spread();
        source.record_spread();
        assert_eq!(source.spread_count(), 2);
    }
}
