//! Summary statistics printed at the end of a run.

use std::collections::BTreeSet;
use std::fmt;

use econdata_core::ObservationRecord;

/// Counts over the cleaned record set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub total_records: usize,
    pub countries: usize,
    pub indicators: usize,
    /// `(min, max)` year, `None` when there are no records.
    pub year_range: Option<(i32, i32)>,
    pub missing_values: usize,
}

impl RunSummary {
    pub fn from_records(records: &[ObservationRecord]) -> Self {
        let countries: BTreeSet<&str> = records.iter().map(|r| r.country_name.as_str()).collect();
        let indicators: BTreeSet<&str> =
            records.iter().map(|r| r.indicator_name.as_str()).collect();
        let min = records.iter().map(|r| r.year).min();
        let max = records.iter().map(|r| r.year).max();

        Self {
            total_records: records.len(),
            countries: countries.len(),
            indicators: indicators.len(),
            year_range: min.zip(max),
            missing_values: records.iter().filter(|r| r.value.is_none()).count(),
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Countries: {}", self.countries)?;
        writeln!(f, "Total Indicators: {}", self.indicators)?;
        match self.year_range {
            Some((min, max)) => writeln!(f, "Year Range: {min} - {max}")?,
            None => writeln!(f, "Year Range: n/a")?,
        }
        writeln!(f, "Total Data Points: {}", self.total_records)?;
        write!(f, "Missing Values: {}", self.missing_values)
    }
}
