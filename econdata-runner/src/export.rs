//! CSV export of a master file plus one file per source.
//!
//! Every file from one run shares a single `YYYYMMDD_HHMMSS` timestamp:
//! - `economic_data_master_{ts}.csv`: all cleaned records
//! - `imf_data_{ts}.csv`: IMF subset, only if non-empty
//! - `world_bank_data_{ts}.csv`: World Bank subset, only if non-empty

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use econdata_core::{ObservationRecord, Source, CSV_HEADER};

/// Prefix of the file holding every record.
pub const MASTER_FILE_STEM: &str = "economic_data_master";

/// A file written by [`export_run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub path: PathBuf,
    pub rows: usize,
    /// `None` for the master file.
    pub source: Option<Source>,
}

/// Run timestamp in local time, shared by every file of one run.
pub fn run_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// `{stem}_{timestamp}.csv`
pub fn file_name(stem: &str, timestamp: &str) -> String {
    format!("{stem}_{timestamp}.csv")
}

/// Write records to `path` with a header row, even when there are no records.
///
/// Creates the parent directory if needed.
pub fn write_records_csv(records: &[ObservationRecord], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output dir: {}", parent.display()))?;
    }
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    write_all(&mut wtr, records)?;
    wtr.flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;
    Ok(())
}

fn write_all<W: std::io::Write>(
    wtr: &mut csv::Writer<W>,
    records: &[ObservationRecord],
) -> Result<()> {
    wtr.write_record(CSV_HEADER)?;
    for record in records {
        wtr.serialize(record)?;
    }
    Ok(())
}

/// Write the master file and the per-source files for one run.
///
/// Per-source subsets keep the master file's row order.
pub fn export_run(
    records: &[ObservationRecord],
    output_dir: &Path,
    timestamp: &str,
) -> Result<Vec<ExportedFile>> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir: {}", output_dir.display()))?;

    let mut files = Vec::with_capacity(1 + Source::ALL.len());

    let master = output_dir.join(file_name(MASTER_FILE_STEM, timestamp));
    write_records_csv(records, &master)?;
    files.push(ExportedFile {
        path: master,
        rows: records.len(),
        source: None,
    });

    for source in Source::ALL {
        let subset: Vec<ObservationRecord> = records
            .iter()
            .filter(|r| r.source == source)
            .cloned()
            .collect();
        if subset.is_empty() {
            continue;
        }
        let path = output_dir.join(file_name(source.file_stem(), timestamp));
        write_records_csv(&subset, &path)?;
        files.push(ExportedFile {
            path,
            rows: subset.len(),
            source: Some(source),
        });
    }

    Ok(files)
}
