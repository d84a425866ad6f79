//! Disease parameters used by the demo.

use ep_disease::{AgeGroup, DiseaseBuilder};

/// A respiratory disease with steeply age-dependent mortality.
pub fn respiratory() -> DiseaseBuilder {
    let mortality: [f64; AgeGroup::COUNT] =
        [0.0, 0.002, 0.002, 0.002, 0.004, 0.013, 0.036, 0.08, 0.148];
    DiseaseBuilder::new("respiratory")
        .incubation_period(2, 14)
        .infectious_days(7)
        .duration(14, 21)
        .mortality_by_age(mortality)
        .days_till_death(14, 56)
        .spread_factor(0.03, 0.06)
        .test_accuracy(0.95)
        .symptom_probability(0.4, 0.7)
}
