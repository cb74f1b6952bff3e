//! Pipeline orchestrator: fetch every indicator from every source, then
//! clean and export.
//!
//! Execution is strictly sequential. After each indicator request the
//! pipeline sleeps for the configured rate limit, whether or not the request
//! produced data. Per-call failures never abort the run: adapters already
//! degrade them to zero records.

use std::sync::Arc;

use anyhow::Result;
use econdata_core::data::{default_adapters, FetchProgress, JsonTransport, SourceAdapter};
use econdata_core::{ObservationRecord, PipelineConfig};
use tracing::{debug, info};

use crate::clean::clean;
use crate::export::{export_run, run_timestamp, ExportedFile};
use crate::summary::RunSummary;

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// No source returned any record; nothing was written.
    NoData,
    /// Records were cleaned and exported.
    Completed {
        summary: RunSummary,
        files: Vec<ExportedFile>,
    },
}

/// The fetch → clean → export pipeline over a set of adapters.
pub struct Pipeline<'a> {
    config: &'a PipelineConfig,
    adapters: Vec<Box<dyn SourceAdapter>>,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a PipelineConfig, adapters: Vec<Box<dyn SourceAdapter>>) -> Self {
        Self { config, adapters }
    }

    /// IMF then World Bank over the given transport.
    pub fn with_default_adapters(
        config: &'a PipelineConfig,
        transport: Arc<dyn JsonTransport>,
    ) -> Self {
        Self::new(config, default_adapters(config, transport))
    }

    /// Fetch every indicator of every adapter, in order, into one vector.
    pub fn collect(&self, progress: &dyn FetchProgress) -> Vec<ObservationRecord> {
        let mut all = Vec::new();
        let rate_limit = self.config.rate_limit();

        for adapter in &self.adapters {
            let indicators = adapter.indicators();
            let total = indicators.len();
            progress.on_source_start(adapter.source(), total);
            let before = all.len();

            for (i, indicator) in indicators.iter().enumerate() {
                progress.on_indicator_start(indicator, i, total);
                let records = adapter.fetch(indicator, &self.config.countries);
                debug!(
                    source = %adapter.source(),
                    indicator = %indicator.code,
                    records = records.len(),
                    "indicator fetched"
                );
                progress.on_indicator_complete(indicator, records.len());
                all.extend(records);

                std::thread::sleep(rate_limit);
            }

            progress.on_source_complete(adapter.source(), all.len() - before);
        }

        progress.on_fetch_complete(all.len());
        all
    }

    /// Run the whole pipeline with a fresh timestamp.
    pub fn run(&self, progress: &dyn FetchProgress) -> Result<RunOutcome> {
        self.run_at(progress, &run_timestamp())
    }

    /// Run the whole pipeline, naming output files with `timestamp`.
    pub fn run_at(&self, progress: &dyn FetchProgress, timestamp: &str) -> Result<RunOutcome> {
        let raw = self.collect(progress);
        if raw.is_empty() {
            info!("no data retrieved; nothing exported");
            progress.on_no_data();
            return Ok(RunOutcome::NoData);
        }

        let cleaned = clean(raw);
        progress.on_cleaned(cleaned.len());

        let files = export_run(&cleaned, &self.config.output_dir, timestamp)?;
        for file in &files {
            progress.on_exported(&file.path, file.rows);
        }
        info!(
            files = files.len(),
            dir = %self.config.output_dir.display(),
            "export complete"
        );

        Ok(RunOutcome::Completed {
            summary: RunSummary::from_records(&cleaned),
            files,
        })
    }
}
