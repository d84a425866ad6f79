//! town: a small epidemic in a synthetic town.
//!
//! Generates one community, seeds a handful of infections and runs the
//! containment comparison: the same town, the same seed, once under each
//! stage of the policy ladder.  Daily counts and run summaries land in
//! `output/town/`.
//!
//! ```text
//! RUST_LOG=debug cargo run --release -p town -- [config.json]
//! ```
//!
//! The optional JSON file overrides any field of [`TownConfig`].

mod disease;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Deserialize;

use ep_community::{CommunityStats, ContainmentStage, DailyRoutine, PopulationProfile, SyntheticPopulator};
use ep_core::{CommunityId, SimConfig, Tick};
use ep_output::{CsvWriter, OutputWriter, SimOutputObserver};
use ep_sim::{RunSummary, SimBuilder, SimObserver};

// ── Configuration ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(default)]
struct TownConfig {
    sim:        SimConfig,
    routine:    DailyRoutine,
    population: PopulationProfile,
    /// Days per run.
    days:       u64,
    /// Runs in the comparison; 1 runs the configured stage only.
    runs:       usize,
    stage:      ContainmentStage,
    output_dir: PathBuf,
}

impl Default for TownConfig {
    fn default() -> Self {
        Self {
            sim:        SimConfig { population_size: 2_000, initial_infections: 5, ..SimConfig::default() },
            routine:    DailyRoutine::default(),
            population: PopulationProfile::default(),
            days:       60,
            runs:       ContainmentStage::ALL.len(),
            stage:      ContainmentStage::None,
            output_dir: PathBuf::from("output/town"),
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<TownConfig> {
    let Some(path) = path else {
        return Ok(TownConfig::default());
    };
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file)).with_context(|| format!("parsing {}", path.display()))
}

// ── Observer wrapper printing the epidemic curve ──────────────────────────────

struct CurvePrinter<W: OutputWriter> {
    inner:    SimOutputObserver<W>,
    run:      usize,
    new_rows: usize,
}

impl<W: OutputWriter> CurvePrinter<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self { inner, run: 0, new_rows: 0 }
    }
}

impl<W: OutputWriter> SimObserver for CurvePrinter<W> {
    fn on_new_day(&mut self, day: u64, community: CommunityId, stats: &CommunityStats) {
        self.new_rows += 1;
        if day % 7 == 0 {
            println!(
                "  run {} day {day:>3}: S {:>5} E {:>4} I {:>4} R {:>5} dead {:>3} quarantined {:>4}",
                self.run,
                stats.susceptible,
                stats.exposed,
                stats.infectious,
                stats.recovered,
                stats.dead,
                stats.quarantined_now
            );
        }
        self.inner.on_new_day(day, community, stats);
    }

    fn on_stage_change(&mut self, run: usize, stage: ContainmentStage) {
        self.run = run;
        println!("── run {run}: {stage} ──");
        self.inner.on_stage_change(run, stage);
    }

    fn on_run_end(&mut self, summary: &RunSummary) {
        self.inner.on_run_end(summary);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let arg = std::env::args().nth(1).map(PathBuf::from);
    let town = load_config(arg.as_deref())?;

    println!("=== town: agent-based epidemic ===");
    println!(
        "Persons: {}  |  Days: {}  |  Runs: {}  |  Seed: {}",
        town.sim.population_size, town.days, town.runs, town.sim.seed
    );
    println!();

    // 1. Disease and simulation.
    let mut sim = SimBuilder::from_disease(town.sim.clone(), disease::respiratory())?
        .routine(town.routine.clone())
        .populator(SyntheticPopulator::new(town.population.clone()))
        .containment(town.stage)
        .build()?;
    println!(
        "Disease: {}  |  Communities: {}  |  Initial infections: {}",
        sim.disease().name(),
        sim.communities().len(),
        town.sim.initial_infections
    );

    // 2. Output.
    let writer = CsvWriter::new(&town.output_dir)?;
    let mut obs = CurvePrinter::new(SimOutputObserver::new(writer));

    // 3. Run.
    let t0 = Instant::now();
    let summaries = if town.runs > 1 {
        sim.compare_containment_measures(town.days, town.runs, &mut obs)?
    } else {
        obs.on_stage_change(0, sim.stage());
        sim.run_for_days(town.days, &mut obs)?;
        let summary = sim.summary(0);
        obs.on_run_end(&summary);
        vec![summary]
    };
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 4. Summary table.
    println!();
    println!("Simulation complete in {:.3} s ({} daily rows)", elapsed.as_secs_f64(), obs.new_rows);
    println!();
    println!(
        "{:<4} {:<16} {:>10} {:>8} {:>10} {:>12}",
        "Run", "Stage", "Infected", "Dead", "Positive", "Quarantined"
    );
    println!("{}", "-".repeat(64));
    for s in &summaries {
        println!(
            "{:<4} {:<16} {:>10} {:>8} {:>10} {:>12}",
            s.run,
            s.stage.as_str(),
            s.infection_max,
            s.dead,
            s.positive_tests,
            s.quarantined
        );
    }
    println!();
    println!("Reports written to {}", town.output_dir.display());
    log::debug!("outside infections: {}", sim.travel_infecter().spread_count());

    Ok(())
}
