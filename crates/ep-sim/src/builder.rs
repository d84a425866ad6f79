//! Fluent builder for constructing a [`Simulation`].

use std::sync::Arc;

use ep_community::{Community, ContainmentStage, DailyRoutine, Populator, SyntheticPopulator};
use ep_core::{SimClock, SimConfig};
use ep_disease::{Disease, DiseaseBuilder, Infection};
use rayon::ThreadPoolBuilder;

use crate::sim::{generate_communities, seed_infections};
use crate::{RunControl, SimError, SimResult, Simulation};

/// Fluent builder for [`Simulation`].
///
/// # Required inputs
///
/// - [`SimConfig`]: seed, thread count, population size, …
/// - the [`Disease`] every infection in the run is drawn from
///
/// # Optional inputs (have defaults)
///
/// | Method                     | Default                              |
/// |----------------------------|--------------------------------------|
/// | `.routine(r)`              | `DailyRoutine::default()`            |
/// | `.populator(p)`            | `SyntheticPopulator::default()`      |
/// | `.communities(v)`          | generated by the populator           |
/// | `.containment(stage)`      | `ContainmentStage::None`             |
/// | `.initial_infections(n)`   | `config.initial_infections`          |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, disease)
///     .containment(ContainmentStage::MaskMandate)
///     .initial_infections(10)
///     .build()?;
/// sim.run_for_days(30, &mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config:      SimConfig,
    disease:     Arc<Disease>,
    routine:     DailyRoutine,
    populator:   Option<Box<dyn Populator>>,
    communities: Option<Vec<Community>>,
    stage:       ContainmentStage,
}

impl SimBuilder {
    pub fn new(config: SimConfig, disease: impl Into<Arc<Disease>>) -> Self {
        Self {
            config,
            disease:     disease.into(),
            routine:     DailyRoutine::default(),
            populator:   None,
            communities: None,
            stage:       ContainmentStage::None,
        }
    }

    /// Like [`new`](Self::new), building the disease first.
    pub fn from_disease(config: SimConfig, disease: DiseaseBuilder) -> SimResult<Self> {
        Ok(Self::new(config, disease.build()?))
    }

    /// Timetable and behavior constants shared by every community.
    pub fn routine(mut self, routine: DailyRoutine) -> Self {
        self.routine = routine;
        self
    }

    /// Population generator used at build time and by
    /// [`Simulation::reset`] / containment comparisons.
    pub fn populator(mut self, populator: impl Populator + 'static) -> Self {
        self.populator = Some(Box::new(populator));
        self
    }

    /// Use prebuilt communities for the first run instead of generating them.
    ///
    /// Each must pass [`Community::validate`].  Later resets still regenerate
    /// from the populator.
    pub fn communities(mut self, communities: Vec<Community>) -> Self {
        self.communities = Some(communities);
        self
    }

    /// Containment stage in force from tick 0.
    pub fn containment(mut self, stage: ContainmentStage) -> Self {
        self.stage = stage;
        self
    }

    /// Persons contaminated at tick 0 in every community.
    pub fn initial_infections(mut self, count: usize) -> Self {
        self.config.initial_infections = count;
        self
    }

    /// Validate inputs, build the worker pool and communities, seed the
    /// initial infections, and return a ready-to-run [`Simulation`].
    pub fn build(self) -> SimResult<Simulation> {
        self.config.validate()?;

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.config.num_threads.unwrap_or(0))
            .thread_name(|i| format!("ep-worker-{i}"))
            .build()
            .map_err(|e| SimError::ThreadPool(e.to_string()))?;

        let populator: Box<dyn Populator> = self
            .populator
            .unwrap_or_else(|| Box::new(SyntheticPopulator::default()));

        let communities = match self.communities {
            Some(communities) => {
                if communities.is_empty() {
                    return Err(SimError::Config("no communities supplied".into()));
                }
                for community in &communities {
                    community.validate()?;
                }
                communities
            }
            None => generate_communities(&self.config, populator.as_ref(), &self.routine)?,
        };

        let mut sim = Simulation {
            clock:           SimClock::new(self.config.start_weekday),
            travel_infecter: Infection::carrier(Arc::clone(&self.disease)),
            disease:         self.disease,
            routine:         self.routine,
            populator,
            communities,
            stage:           self.stage,
            control:         RunControl::new(),
            pool,
            config:          self.config,
        };
        sim.set_containment(self.stage);
        seed_infections(
            &sim.communities,
            &sim.disease,
            sim.config.initial_infections,
            sim.config.seed,
        );

        log::info!(
            "simulation ready: {} communities, {} persons, disease {:?}, {} threads",
            sim.communities.len(),
            sim.communities.iter().map(Community::population_len).sum::<usize>(),
            sim.disease.name(),
            sim.pool.current_num_threads()
        );
        Ok(sim)
    }
}
