//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `daily_counts.csv`
//! - `run_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{DailyCountRow, OutputResult, RunSummaryRow};

pub const DAILY_COUNTS_FILE: &str = "daily_counts.csv";
pub const RUN_SUMMARIES_FILE: &str = "run_summaries.csv";

const DAILY_HEADER: [&str; 12] = [
    "run",
    "day",
    "community",
    "susceptible",
    "exposed",
    "infectious",
    "recovered",
    "dead",
    "quarantined_now",
    "infection_max",
    "positive_tests",
    "quarantined_total",
];

const SUMMARY_HEADER: [&str; 8] = [
    "run",
    "stage",
    "days",
    "population",
    "infection_max",
    "dead",
    "positive_tests",
    "quarantined",
];

/// Writes reports to two CSV files.
pub struct CsvWriter {
    daily:     Writer<File>,
    summaries: Writer<File>,
}

impl CsvWriter {
    /// Create `dir` if needed, open (or truncate) the two CSV files in it and
    /// write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut daily = Writer::from_path(dir.join(DAILY_COUNTS_FILE))?;
        daily.write_record(DAILY_HEADER)?;

        let mut summaries = Writer::from_path(dir.join(RUN_SUMMARIES_FILE))?;
        summaries.write_record(SUMMARY_HEADER)?;

        Ok(Self { daily, summaries })
    }
}

impl OutputWriter for CsvWriter {
    fn write_daily_counts(&mut self, row: &DailyCountRow) -> OutputResult<()> {
        self.daily.write_record(&[
            row.run.to_string(),
            row.day.to_string(),
            row.community.to_string(),
            row.susceptible.to_string(),
            row.exposed.to_string(),
            row.infectious.to_string(),
            row.recovered.to_string(),
            row.dead.to_string(),
            row.quarantined_now.to_string(),
            row.infection_max.to_string(),
            row.positive_tests.to_string(),
            row.quarantined_total.to_string(),
        ])?;
        Ok(())
    }

    fn write_run_summary(&mut self, row: &RunSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.run.to_string(),
            row.stage.to_owned(),
            row.days.to_string(),
            row.population.to_string(),
            row.infection_max.to_string(),
            row.dead.to_string(),
            row.positive_tests.to_string(),
            row.quarantined.to_string(),
        ])?;
        Ok(())
    }

    fn flush(&mut self) -> OutputResult<()> {
        self.daily.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
