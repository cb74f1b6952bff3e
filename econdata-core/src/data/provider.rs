//! Source adapter trait, structured error types, and progress reporting.
//!
//! The SourceAdapter trait abstracts over the upstream APIs (IMF DataMapper,
//! World Bank) so the pipeline can iterate them without knowing their
//! response shapes, and so tests can swap in canned transports.

use std::path::Path;

use thiserror::Error;

use crate::config::{CountrySet, Indicator, IndicatorSet};
use crate::domain::{ObservationRecord, Source};

/// Structured error types for data operations.
///
/// None of these escape the adapters: transport failures are retried and
/// then degrade to an empty outcome, structural failures degrade to zero
/// records for the indicator.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("response body is not valid JSON: {0}")]
    InvalidBody(String),

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),
}

/// One upstream statistical API.
///
/// Implementations own their indicator set and translate one batched
/// response per indicator into [`ObservationRecord`]s. `fetch` never fails:
/// a call that yields nothing usable returns an empty vector.
pub trait SourceAdapter: Send + Sync {
    /// Which source records are tagged with.
    fn source(&self) -> Source;

    /// Indicators to request, in fetch order.
    fn indicators(&self) -> &IndicatorSet;

    /// Fetch one indicator for every country in `countries`.
    fn fetch(&self, indicator: &Indicator, countries: &CountrySet) -> Vec<ObservationRecord>;
}

/// Progress callbacks for a pipeline run.
pub trait FetchProgress {
    /// Called before the first indicator of a source is requested.
    fn on_source_start(&self, source: Source, indicator_count: usize);

    /// Called when starting to fetch an indicator.
    fn on_indicator_start(&self, indicator: &Indicator, index: usize, total: usize);

    /// Called when an indicator fetch completes.
    fn on_indicator_complete(&self, indicator: &Indicator, records: usize);

    /// Called after the last indicator of a source, with its record count.
    fn on_source_complete(&self, source: Source, records: usize);

    /// Called once every source has been fetched.
    fn on_fetch_complete(&self, total_records: usize);

    /// Called after cleaning.
    fn on_cleaned(&self, kept: usize);

    /// Called for every file written.
    fn on_exported(&self, path: &Path, rows: usize);

    /// Called when the run ends without any data.
    fn on_no_data(&self);
}

/// Progress reporter that prints to stdout.
pub struct StdoutProgress;

impl FetchProgress for StdoutProgress {
    fn on_source_start(&self, source: Source, _indicator_count: usize) {
        println!("Fetching data from {source} API...");
        println!("{}", "-".repeat(70));
    }

    fn on_indicator_start(&self, indicator: &Indicator, _index: usize, _total: usize) {
        println!("  Fetching {}...", indicator.name);
    }

    fn on_indicator_complete(&self, _indicator: &Indicator, _records: usize) {}

    fn on_source_complete(&self, _source: Source, _records: usize) {
        println!();
    }

    fn on_fetch_complete(&self, total_records: usize) {
        println!("Processing data...");
        if total_records > 0 {
            println!("  Total records retrieved: {total_records}");
        }
    }

    fn on_cleaned(&self, kept: usize) {
        println!(" Cleaning data...");
        println!("  Records after cleaning: {kept}");
        println!();
        println!("Exporting CSV files...");
        println!("{}", "-".repeat(70));
    }

    fn on_exported(&self, path: &Path, rows: usize) {
        println!("  Exported: {} ({rows} rows)", path.display());
    }

    fn on_no_data(&self) {
        println!("No data retrieved. Please check your API connections and country codes.");
    }
}

/// Progress reporter that discards everything.
pub struct SilentProgress;

impl FetchProgress for SilentProgress {
    fn on_source_start(&self, _source: Source, _indicator_count: usize) {}
    fn on_indicator_start(&self, _indicator: &Indicator, _index: usize, _total: usize) {}
    fn on_indicator_complete(&self, _indicator: &Indicator, _records: usize) {}
    fn on_source_complete(&self, _source: Source, _records: usize) {}
    fn on_fetch_complete(&self, _total_records: usize) {}
    fn on_cleaned(&self, _kept: usize) {}
    fn on_exported(&self, _path: &Path, _rows: usize) {}
    fn on_no_data(&self) {}
}
