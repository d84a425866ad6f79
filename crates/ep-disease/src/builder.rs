//! Fluent, fail-fast builder for [`Disease`].

use crate::{AgeGroup, Disease, DiseaseError, DiseaseResult, Span};

/// Fluent builder for [`Disease`].
///
/// Every parameter is required.  [`build`](Self::build) returns
/// [`DiseaseError::MissingParameter`] naming the first one left unset; the
/// caller must fix the construction sequence, nothing is defaulted.
///
/// # Example
///
/// ```rust
/// use ep_disease::DiseaseBuilder;
///
/// let disease = DiseaseBuilder::new("flu")
///     .incubation_period(1, 3)
///     .infectious_days(4)
///     .duration(7, 10)
///     .mortality_by_age([0.0, 0.0, 0.0, 0.0, 0.001, 0.002, 0.005, 0.01, 0.02])
///     .days_till_death(8, 12)
///     .spread_factor(0.01, 0.05)
///     .test_accuracy(0.9)
///     .symptom_probability(0.5, 0.7)
///     .build()
///     .unwrap();
/// assert_eq!(disease.infectious_days(), 4);
/// ```
#[derive(Clone, Debug, Default)]
pub struct DiseaseBuilder {
    name:                String,
    incubation_period:   Option<Span<u32>>,
    infectious_days:     Option<u32>,
    duration:            Option<Span<u32>>,
    mortality_by_age:    Option<[f64; AgeGroup::COUNT]>,
    days_till_death:     Option<Span<u32>>,
    spread_factor:       Option<Span<f64>>,
    test_accuracy:       Option<f64>,
    symptom_probability: Option<Span<f64>>,
}

impl DiseaseBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn incubation_period(mut self, min: u32, max: u32) -> Self {
        self.incubation_period = Some(Span::new(min, max));
        self
    }

    pub fn infectious_days(mut self, days: u32) -> Self {
        self.infectious_days = Some(days);
        self
    }

    pub fn duration(mut self, min: u32, max: u32) -> Self {
        self.duration = Some(Span::new(min, max));
        self
    }

    /// Mortality per age bucket, youngest (0–9) first, 80+ last.
    pub fn mortality_by_age(mut self, table: [f64; AgeGroup::COUNT]) -> Self {
        self.mortality_by_age = Some(table);
        self
    }

    pub fn days_till_death(mut self, min: u32, max: u32) -> Self {
        self.days_till_death = Some(Span::new(min, max));
        self
    }

    pub fn spread_factor(mut self, min: f64, max: f64) -> Self {
        self.spread_factor = Some(Span::new(min, max));
        self
    }

    pub fn test_accuracy(mut self, accuracy: f64) -> Self {
        self.test_accuracy = Some(accuracy);
        self
    }

    pub fn symptom_probability(mut self, min: f64, max: f64) -> Self {
        self.symptom_probability = Some(Span::new(min, max));
        self
    }

    /// Validate every parameter and return the immutable [`Disease`].
    pub fn build(self) -> DiseaseResult<Disease> {
        let incubation_period = self.incubation_period
            .ok_or(DiseaseError::MissingParameter("incubation_period"))?;
        let infectious_days = self.infectious_days
            .ok_or(DiseaseError::MissingParameter("infectious_days"))?;
        let duration = self.duration
            .ok_or(DiseaseError::MissingParameter("duration"))?;
        let mortality_by_age = self.mortality_by_age
            .ok_or(DiseaseError::MissingParameter("mortality_by_age"))?;
        let days_till_death = self.days_till_death
            .ok_or(DiseaseError::MissingParameter("days_till_death"))?;
        let spread_factor = self.spread_factor
            .ok_or(DiseaseError::MissingParameter("spread_factor"))?;
        let test_accuracy = self.test_accuracy
            .ok_or(DiseaseError::MissingParameter("test_accuracy"))?;
        let symptom_probability = self.symptom_probability
            .ok_or(DiseaseError::MissingParameter("symptom_probability"))?;

        check_days("incubation_period", incubation_period)?;
        check_days("duration", duration)?;
        check_days("days_till_death", days_till_death)?;
        check_probabilities("spread_factor", spread_factor)?;
        check_probabilities("symptom_probability", symptom_probability)?;
        check_probability("test_accuracy", test_accuracy)?;
        for p in mortality_by_age {
            check_probability("mortality_by_age", p)?;
        }

        Ok(Disease {
            name: self.name,
            incubation_period,
            infectious_days,
            duration,
            mortality_by_age,
            days_till_death,
            spread_factor,
            test_accuracy,
            symptom_probability,
        })
    }
}

fn check_days(name: &'static str, span: Span<u32>) -> DiseaseResult<()> {
    if span.is_ordered() {
        Ok(())
    } else {
        Err(DiseaseError::InvalidRange { name, min: span.min as f64, max: span.max as f64 })
    }
}

fn check_probabilities(name: &'static str, span: Span<f64>) -> DiseaseResult<()> {
    check_probability(name, span.min)?;
    check_probability(name, span.max)?;
    if span.is_ordered() {
        Ok(())
    } else {
        Err(DiseaseError::InvalidRange { name, min: span.min, max: span.max })
    }
}

fn check_probability(name: &'static str, value: f64) -> DiseaseResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(DiseaseError::InvalidProbability { name, value })
    }
}
