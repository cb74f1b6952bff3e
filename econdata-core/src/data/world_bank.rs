//! World Bank open data adapter.
//!
//! The v2 API answers with a two-element array `[metadata, records]` where
//! each record is a flat object carrying `countryiso3code`, `date` and
//! `value`. Error responses are a one-element array holding a `message`
//! list.

use serde_json::Value;
use tracing::{debug, warn};

use super::http::RequestHelper;
use super::provider::SourceAdapter;
use super::value::{parse_year, to_number};
use crate::config::{CountrySet, Indicator, IndicatorSet, PipelineConfig, YearRange};
use crate::domain::{ObservationRecord, Source};

/// Large enough that one page holds every (country, year) pair.
pub const PER_PAGE: u32 = 10_000;

/// World Bank source adapter.
pub struct WorldBankAdapter {
    helper: RequestHelper,
    base_url: String,
    indicators: IndicatorSet,
    years: YearRange,
}

impl WorldBankAdapter {
    pub fn new(helper: RequestHelper, config: &PipelineConfig) -> Self {
        Self {
            helper,
            base_url: config.world_bank.base_url.trim_end_matches('/').to_string(),
            indicators: config.world_bank.indicators.clone(),
            years: config.years,
        }
    }

    /// `{base}/country/{BRA;MEX;...}/indicator/{code}`
    pub fn request_url(base_url: &str, indicator_code: &str, countries: &CountrySet) -> String {
        format!(
            "{base_url}/country/{}/indicator/{indicator_code}",
            countries.codes().join(";")
        )
    }

    pub fn request_query(years: YearRange) -> Vec<(&'static str, String)> {
        vec![
            ("format", "json".to_string()),
            ("date", format!("{}:{}", years.start, years.end)),
            ("per_page", PER_PAGE.to_string()),
        ]
    }

    /// Parse a `[metadata, records]` response into records.
    ///
    /// Anything that is not a list of at least two elements, or whose second
    /// element is not a list, yields no records. Individual records that
    /// don't convert are skipped.
    pub fn parse_response(
        resp: &Value,
        indicator: &Indicator,
        countries: &CountrySet,
        years: YearRange,
    ) -> Vec<ObservationRecord> {
        let Some(parts) = resp.as_array() else {
            debug!(indicator = %indicator.code, "response is not a list");
            return Vec::new();
        };
        if parts.len() < 2 {
            if let Some(message) = error_message(parts) {
                warn!(indicator = %indicator.code, "World Bank API error: {message}");
            }
            return Vec::new();
        }
        let Some(rows) = parts[1].as_array() else {
            debug!(indicator = %indicator.code, "no records in response");
            return Vec::new();
        };

        rows.iter()
            .filter_map(|row| parse_row(row, indicator, countries, years))
            .collect()
    }
}

fn parse_row(
    row: &Value,
    indicator: &Indicator,
    countries: &CountrySet,
    years: YearRange,
) -> Option<ObservationRecord> {
    let code = row.get("countryiso3code")?.as_str()?;
    let country = countries.get(code)?;

    let raw_value = row.get("value").filter(|v| !v.is_null())?;
    let year = parse_year(row.get("date")?)?;
    if !years.contains(year) {
        return None;
    }
    let value = to_number(raw_value)?;

    Some(ObservationRecord::new(
        country,
        year,
        indicator,
        Some(value),
        Source::WorldBank,
    ))
}

/// First upstream message from a `[{"message": [{"value": ...}]}]` error body.
fn error_message(parts: &[Value]) -> Option<String> {
    let messages = parts.first()?.get("message")?.as_array()?;
    let first = messages.first()?;
    let text = first
        .get("value")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| first.to_string());
    Some(text)
}

impl SourceAdapter for WorldBankAdapter {
    fn source(&self) -> Source {
        Source::WorldBank
    }

    fn indicators(&self) -> &IndicatorSet {
        &self.indicators
    }

    fn fetch(&self, indicator: &Indicator, countries: &CountrySet) -> Vec<ObservationRecord> {
        let url = Self::request_url(&self.base_url, &indicator.code, countries);
        let query = Self::request_query(self.years);

        match self.helper.get(&url, &query).into_data() {
            Some(resp) => Self::parse_response(&resp, indicator, countries, self.years),
            None => Vec::new(),
        }
    }
}
