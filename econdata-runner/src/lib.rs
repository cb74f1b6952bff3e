//! EconData Runner — pipeline orchestration, cleaning, export, summary.
//!
//! This crate builds on `econdata-core` to provide:
//! - The sequential fetch loop over every source and indicator
//! - Cleaning of the concatenated records (drop, null, sort)
//! - CSV export of a master file and per-source files
//! - Summary statistics for the end-of-run report

pub mod clean;
pub mod export;
pub mod pipeline;
pub mod summary;

pub use clean::clean;
pub use export::{export_run, run_timestamp, ExportedFile};
pub use pipeline::{Pipeline, RunOutcome};
pub use summary::RunSummary;

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn run_summary_is_send_sync() {
        assert_send::<RunSummary>();
        assert_sync::<RunSummary>();
    }

    #[test]
    fn exported_file_is_send_sync() {
        assert_send::<ExportedFile>();
        assert_sync::<ExportedFile>();
    }

    #[test]
    fn run_outcome_is_send_sync() {
        assert_send::<RunOutcome>();
        assert_sync::<RunOutcome>();
    }
}
