//! The `Disease` parameter bundle.

use rand::Rng;

use crate::{AgeGroup, Span};

/// Immutable stochastic description of a disease.
///
/// Shared by `Arc` across every [`Infection`][crate::Infection] exposed to it
/// and read-only for the whole run.  All "get a value" accessors redraw a fresh
/// sample from the stored range on every call.
///
/// Build with [`DiseaseBuilder`][crate::DiseaseBuilder].
#[derive(Clone, Debug, PartialEq)]
pub struct Disease {
    pub(crate) name:                String,
    pub(crate) incubation_period:   Span<u32>,
    pub(crate) infectious_days:     u32,
    pub(crate) duration:            Span<u32>,
    pub(crate) mortality_by_age:    [f64; AgeGroup::COUNT],
    pub(crate) days_till_death:     Span<u32>,
    pub(crate) spread_factor:       Span<f64>,
    pub(crate) test_accuracy:       f64,
    pub(crate) symptom_probability: Span<f64>,
}

impl Disease {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Days from exposure until the person becomes infectious.
    pub fn incubation_period<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        self.incubation_period.sample(rng)
    }

    /// Fixed number of days a person stays infectious.
    #[inline]
    pub fn infectious_days(&self) -> u32 {
        self.infectious_days
    }

    /// Days from exposure until the illness is over.
    pub fn disease_duration<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        self.duration.sample(rng)
    }

    /// Days a fatally ill person has left, counted from exposure.
    pub fn days_till_death<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        self.days_till_death.sample(rng)
    }

    /// Base per-contact transmission probability.
    pub fn spread_factor<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.spread_factor.sample(rng)
    }

    /// Probability that a test of an ill person comes back positive.
    #[inline]
    pub fn test_accuracy(&self) -> f64 {
        self.test_accuracy
    }

    /// Mortality for a person aged `years`; bucket = `min(years / 10, 8)`.
    #[inline]
    pub fn mortality_by_age(&self, years: u32) -> f64 {
        self.mortality_for(AgeGroup::from_years(years))
    }

    #[inline]
    pub fn mortality_for(&self, group: AgeGroup) -> f64 {
        self.mortality_by_age[group.bucket()]
    }

    /// Bernoulli trial against the age group's mortality.
    pub fn is_fatal<R: Rng + ?Sized>(&self, group: AgeGroup, rng: &mut R) -> bool {
        rng.gen_bool(self.mortality_for(group))
    }

    /// Bernoulli trial against a freshly sampled symptom probability.
    pub fn will_develop_symptoms<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        let p = self.symptom_probability.sample(rng);
        rng.gen_bool(p)
    }

    /// Bernoulli trial against the test accuracy.
    pub fn test_positive<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.gen_bool(self.test_accuracy)
    }
}
