use serde::{Deserialize, Serialize};

use super::source::Source;
use crate::config::{Country, Indicator};

/// Column names of every exported file, in order.
pub const CSV_HEADER: [&str; 8] = [
    "Country_Code",
    "Country",
    "Region",
    "Year",
    "Indicator_Name",
    "Indicator_Code",
    "Value",
    "Source",
];

/// One (country, year, indicator) data point.
///
/// Field renames match [`CSV_HEADER`], so the `csv` serde writer and reader
/// agree with the header row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    #[serde(rename = "Country_Code")]
    pub country_code: String,
    #[serde(rename = "Country")]
    pub country_name: String,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Indicator_Name")]
    pub indicator_name: String,
    #[serde(rename = "Indicator_Code")]
    pub indicator_code: String,
    #[serde(rename = "Value")]
    pub value: Option<f64>,
    #[serde(rename = "Source")]
    pub source: Source,
}

impl ObservationRecord {
    /// Build a record from configured country and indicator metadata.
    pub fn new(
        country: &Country,
        year: i32,
        indicator: &Indicator,
        value: Option<f64>,
        source: Source,
    ) -> Self {
        Self {
            country_code: country.code.clone(),
            country_name: country.name.clone(),
            region: country.region.clone(),
            year,
            indicator_name: indicator.name.clone(),
            indicator_code: indicator.code.clone(),
            value,
            source,
        }
    }
}
