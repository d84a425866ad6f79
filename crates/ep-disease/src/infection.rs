//! Per-person epidemiological state machine.
//!
//! # Stages
//!
//! ```text
//! Susceptible ──contaminate──▶ Exposed ──latent=0──▶ Infectious ──infectious=0──▶ Convalescent ──duration=0──▶ Cured
//! ```
//!
//! `Convalescent` and `Cured` both report [`SeirState::Recovered`]; only
//! `Cured` sets [`Infection::has_recovered`] and clears the disease.  The
//! fatality countdown runs beside the stages: once armed it ticks every day
//! until cure, so a convalescent person can still die.
//!
//! A cured person is never re-armed as susceptible.

use std::sync::Arc;

use rand::Rng;

use crate::{AgeGroup, Disease};

/// Transmission multiplier applied while a mask mandate is active.
pub const MASK_TRANSMISSION_FACTOR: f64 = 0.68333;

/// Lower end of the transmission range as a fraction of the spread factor;
/// reached by a person with acceptance factor 1.
const FULL_ACCEPTANCE_SPREAD_SHARE: f64 = 0.1;

/// Classic SEIR compartment.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum SeirState {
    Susceptible,
    Exposed,
    Infectious,
    Recovered,
}

/// Finer-grained stage; splits `Recovered` into still-ill and cured.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub enum InfectionStage {
    #[default]
    Susceptible,
    Exposed,
    Infectious,
    /// No longer infectious, still carrying the disease.
    Convalescent,
    /// Illness over; disease cleared.
    Cured,
}

impl InfectionStage {
    pub fn seir(self) -> SeirState {
        match self {
            InfectionStage::Susceptible  => SeirState::Susceptible,
            InfectionStage::Exposed      => SeirState::Exposed,
            InfectionStage::Infectious   => SeirState::Infectious,
            InfectionStage::Convalescent
            | InfectionStage::Cured      => SeirState::Recovered,
        }
    }
}

/// Result of one simulated day of illness.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[must_use]
pub enum DayOutcome {
    Survived,
    Died,
}

/// The infection carried by exactly one person.
#[derive(Clone, Debug, Default)]
pub struct Infection {
    stage:                InfectionStage,
    disease:              Option<Arc<Disease>>,
    latent_days:          u32,
    infectious_days_left: u32,
    days_till_cured:      u32,
    days_to_live:         u32,
    fatal:                bool,
    symptomatic:          bool,
    spread_count:         u32,
}

impl Infection {
    /// A disease-free, susceptible infection.
    pub fn new() -> Self {
        Self::default()
    }

    /// A permanently infectious carrier of `disease` that never advances.
    /// Stands in for exposure sources outside the modelled population.
    pub fn carrier(disease: Arc<Disease>) -> Self {
        Self {
            stage:   InfectionStage::Infectious,
            disease: Some(disease),
            ..Self::default()
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn stage(&self) -> InfectionStage {
        self.stage
    }

    #[inline]
    pub fn seir_state(&self) -> SeirState {
        self.stage.seir()
    }

    #[inline]
    pub fn is_susceptible(&self) -> bool {
        self.stage == InfectionStage::Susceptible
    }

    #[inline]
    pub fn is_exposed(&self) -> bool {
        self.stage == InfectionStage::Exposed
    }

    #[inline]
    pub fn is_infectious(&self) -> bool {
        self.stage == InfectionStage::Infectious
    }

    /// `true` once the whole illness is over (not merely past infectiousness).
    #[inline]
    pub fn has_recovered(&self) -> bool {
        self.stage == InfectionStage::Cured
    }

    #[inline]
    pub fn has_disease(&self) -> bool {
        self.disease.is_some()
    }

    #[inline]
    pub fn disease(&self) -> Option<&Arc<Disease>> {
        self.disease.as_ref()
    }

    #[inline]
    pub fn is_fatal(&self) -> bool {
        self.fatal
    }

    #[inline]
    pub fn has_symptoms(&self) -> bool {
        self.symptomatic
    }

    /// How many people this infection has passed the disease on to.
    #[inline]
    pub fn spread_count(&self) -> u32 {
        self.spread_count
    }

    #[inline]
    pub fn latent_days(&self) -> u32 {
        self.latent_days
    }

    #[inline]
    pub fn days_till_cured(&self) -> u32 {
        self.days_till_cured
    }

    /// Remaining days for a fatal case; `None` when not fatal.
    #[inline]
    pub fn days_to_live(&self) -> Option<u32> {
        self.fatal.then_some(self.days_to_live)
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// Expose a susceptible person to `disease`.
    ///
    /// Snapshots the latent period, infectious days and illness duration,
    /// rolls fatality for `age`, and samples days-to-live for fatal cases.
    /// Returns `false` (and changes nothing) if the person is not susceptible.
    pub fn contaminate<R: Rng + ?Sized>(
        &mut self,
        disease: &Arc<Disease>,
        age:     AgeGroup,
        rng:     &mut R,
    ) -> bool {
        if !self.is_susceptible() {
            return false;
        }
        self.latent_days          = disease.incubation_period(rng);
        self.infectious_days_left = disease.infectious_days();
        self.days_till_cured      = disease.disease_duration(rng);
        self.fatal                = disease.is_fatal(age, rng);
        self.days_to_live         = if self.fatal { disease.days_till_death(rng) } else { 0 };
        self.symptomatic          = false;
        self.disease              = Some(Arc::clone(disease));
        self.stage                = InfectionStage::Exposed;
        true
    }

    /// Advance the illness by one simulated day.
    ///
    /// Order within a day: stage countdown, then the fatality countdown, then
    /// the cure countdown.  A fatal case whose last day coincides with its cure
    /// day dies.
    pub fn advance_day<R: Rng + ?Sized>(&mut self, rng: &mut R) -> DayOutcome {
        let Some(disease) = self.disease.clone() else {
            return DayOutcome::Survived;
        };

        match self.stage {
            InfectionStage::Exposed => {
                self.latent_days = self.latent_days.saturating_sub(1);
                if self.latent_days == 0 {
                    self.stage = InfectionStage::Infectious;
                    self.symptomatic = disease.will_develop_symptoms(rng);
                }
            }
            InfectionStage::Infectious => {
                self.infectious_days_left = self.infectious_days_left.saturating_sub(1);
                if self.infectious_days_left == 0 {
                    self.stage = InfectionStage::Convalescent;
                }
            }
            InfectionStage::Susceptible
            | InfectionStage::Convalescent
            | InfectionStage::Cured => {}
        }

        if self.fatal {
            self.days_to_live = self.days_to_live.saturating_sub(1);
            if self.days_to_live == 0 {
                return DayOutcome::Died;
            }
        }

        self.days_till_cured = self.days_till_cured.saturating_sub(1);
        if self.days_till_cured == 0 {
            self.cure();
        }
        DayOutcome::Survived
    }

    fn cure(&mut self) {
        self.disease     = None;
        self.symptomatic = false;
        self.fatal       = false;
        self.stage       = InfectionStage::Cured;
    }

    /// Bernoulli trial: does this (infectious) infection pass the disease to
    /// `target` on one contact?
    ///
    /// The probability linearly maps `acceptance ∈ [0, 1]` onto
    /// `[spread, spread × 0.1]`, so a more compliant target is less likely to
    /// be infected, and is scaled by [`MASK_TRANSMISSION_FACTOR`] under a mask
    /// mandate.  Always `false` when there is nothing to transmit or the
    /// target is not susceptible.
    pub fn will_infect<R: Rng + ?Sized>(
        &self,
        target:       &Infection,
        acceptance:   f64,
        mask_mandate: bool,
        rng:          &mut R,
    ) -> bool {
        let Some(disease) = &self.disease else {
            return false;
        };
        if !target.is_susceptible() {
            return false;
        }
        let spread = disease.spread_factor(rng);
        let mut p = linear_map(
            acceptance.clamp(0.0, 1.0),
            (0.0, 1.0),
            (spread, spread * FULL_ACCEPTANCE_SPREAD_SHARE),
        );
        if mask_mandate {
            p *= MASK_TRANSMISSION_FACTOR;
        }
        rng.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Count one onward transmission.
    #[inline]
    pub fn record_spread(&mut self) {
        self.spread_count += 1;
    }
}

/// Map `value` linearly from `from` onto `to`.
///
/// A collapsed source interval maps everything to `to.0`.
pub fn linear_map(value: f64, from: (f64, f64), to: (f64, f64)) -> f64 {
    let span = from.1 - from.0;
    if span == 0.0 {
        return to.0;
    }
    to.0 + (value - from.0) * (to.1 - to.0) / span
}
