//! Pipeline configuration: countries, indicator sets, year bounds, endpoints.
//!
//! Everything the pipeline needs is carried in an immutable [`PipelineConfig`]
//! that is passed down explicitly. The built-in default is the 25-country,
//! 2018–2024 setup; the same structure round-trips through TOML so a run can
//! be pointed at a different country or indicator table without recompiling.
//! Countries and indicators are stored as ordered lists: fetch order follows
//! the order they are declared in.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_IMF_BASE_URL: &str = "https://www.imf.org/external/datamapper/api/v1";
pub const DEFAULT_WORLD_BANK_BASE_URL: &str = "https://api.worldbank.org/v2";

/// Errors from loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// A country in the fixed country set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// ISO 3166 alpha-3 code, used by both APIs.
    pub code: String,
    pub name: String,
    pub region: String,
}

impl Country {
    pub fn new(code: &str, name: &str, region: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            region: region.to_string(),
        }
    }
}

/// Ordered set of countries, looked up by code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountrySet {
    countries: Vec<Country>,
}

impl CountrySet {
    pub fn new(countries: Vec<Country>) -> Self {
        Self { countries }
    }

    /// Look up a country by code.
    pub fn get(&self, code: &str) -> Option<&Country> {
        self.countries.iter().find(|c| c.code == code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Country codes in declaration order.
    pub fn codes(&self) -> Vec<&str> {
        self.countries.iter().map(|c| c.code.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Country> {
        self.countries.iter()
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

/// A source-specific indicator code and its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indicator {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Indicator {
    pub fn new(code: &str, name: &str, description: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

/// Ordered set of indicators for one source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndicatorSet {
    indicators: Vec<Indicator>,
}

impl IndicatorSet {
    pub fn new(indicators: Vec<Indicator>) -> Self {
        Self { indicators }
    }

    pub fn get(&self, code: &str) -> Option<&Indicator> {
        self.indicators.iter().find(|i| i.code == code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Indicator> {
        self.indicators.iter()
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }
}

/// Inclusive year bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }

    pub fn years(&self) -> RangeInclusive<i32> {
        self.start..=self.end
    }
}

/// Retry policy for a single HTTP call.
///
/// Delay before retry `n` (0-based attempt that just failed) is
/// `base_delay_ms * 2^n`; with the default 1000ms that is 1s, then 2s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

impl RetryPolicy {
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
    }

    /// No waiting between attempts (tests, replays).
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay_ms: 0,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
        }
    }
}

/// Endpoint and indicator set for one upstream API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub base_url: String,
    pub indicators: IndicatorSet,
}

/// Complete, immutable configuration for one pipeline run.
///
/// Scalars come before tables so the struct serializes to valid TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub output_dir: PathBuf,
    /// Fixed pause after every indicator request.
    pub rate_limit_ms: u64,
    pub request_timeout_secs: u64,
    pub years: YearRange,
    pub retry: RetryPolicy,
    pub imf: SourceConfig,
    pub world_bank: SourceConfig,
    pub countries: CountrySet,
}

impl PipelineConfig {
    /// Load a configuration from a TOML file and validate it.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.years.start > self.years.end {
            return Err(ConfigError::Invalid(format!(
                "start year {} is after end year {}",
                self.years.start, self.years.end
            )));
        }
        if self.countries.is_empty() {
            return Err(ConfigError::Invalid("country set is empty".into()));
        }
        let mut seen = HashSet::new();
        for country in self.countries.iter() {
            if !seen.insert(country.code.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate country code {}",
                    country.code
                )));
            }
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid("retry.max_attempts must be at least 1".into()));
        }
        Ok(())
    }

    pub fn rate_limit(&self) -> Duration {
        Duration::from_millis(self.rate_limit_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

const DEFAULT_COUNTRIES: &[(&str, &str, &str)] = &[
    ("BRA", "Brazil", "Latin America"),
    ("MEX", "Mexico", "Latin America"),
    ("ARG", "Argentina", "Latin America"),
    ("COL", "Colombia", "Latin America"),
    ("CHL", "Chile", "Latin America"),
    ("PER", "Peru", "Latin America"),
    ("ZAF", "South Africa", "Africa"),
    ("NGA", "Nigeria", "Africa"),
    ("KEN", "Kenya", "Africa"),
    ("EGY", "Egypt", "Africa"),
    ("GHA", "Ghana", "Africa"),
    ("ETH", "Ethiopia", "Africa"),
    ("IND", "India", "Asia"),
    ("IDN", "Indonesia", "Asia"),
    ("PHL", "Philippines", "Asia"),
    ("VNM", "Vietnam", "Asia"),
    ("BGD", "Bangladesh", "Asia"),
    ("THA", "Thailand", "Asia"),
    ("MYS", "Malaysia", "Asia"),
    ("POL", "Poland", "Europe"),
    ("ROU", "Romania", "Europe"),
    ("TUR", "Turkey", "Europe"),
    ("UKR", "Ukraine", "Europe"),
    ("JOR", "Jordan", "Middle East"),
    ("LBN", "Lebanon", "Middle East"),
];

const DEFAULT_IMF_INDICATORS: &[(&str, &str, &str)] = &[
    (
        "NGDP_RPCH",
        "GDP Growth Rate (Annual %)",
        "Real GDP growth rate, annual percentage change",
    ),
    (
        "PCPIPCH",
        "Inflation Rate (CPI)",
        "Consumer Price Index, annual percentage change",
    ),
    (
        "GGXWDG_NGDP",
        "Government Debt (% of GDP)",
        "General government gross debt as percentage of GDP",
    ),
    (
        "GGXCNL_NGDP",
        "Fiscal Balance (% of GDP)",
        "General government net lending/borrowing as percentage of GDP",
    ),
    (
        "GGR_NGDP",
        "Government Revenue (% of GDP)",
        "General government revenue as percentage of GDP",
    ),
    (
        "GGX_NGDP",
        "Government Expenditure (% of GDP)",
        "General government total expenditure as percentage of GDP",
    ),
    (
        "BCA_NGDPD",
        "Current Account Balance (% of GDP)",
        "Current account balance as percentage of GDP",
    ),
    ("LUR", "Unemployment Rate", "Unemployment rate, percent"),
];

const DEFAULT_WORLD_BANK_INDICATORS: &[(&str, &str, &str)] = &[
    (
        "SE.XPD.TOTL.GD.ZS",
        "Education Expenditure (% of GDP)",
        "Government expenditure on education, total (% of GDP)",
    ),
    (
        "IS.RRS.TOTL.KM",
        "Railway Infrastructure",
        "Railways, total (route-km)",
    ),
    ("SP.POP.TOTL", "Population", "Population, total"),
    (
        "NY.GNP.PCAP.CD",
        "GNI per Capita",
        "GNI per capita, Atlas method (current US$)",
    ),
    (
        "IE.PPI.ENGY.CD",
        "Infrastructure Investment (Energy)",
        "Investment in energy with private participation (current US$)",
    ),
];

fn indicator_set(table: &[(&str, &str, &str)]) -> IndicatorSet {
    IndicatorSet::new(
        table
            .iter()
            .map(|&(code, name, description)| Indicator::new(code, name, description))
            .collect(),
    )
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("data"),
            rate_limit_ms: 1000,
            request_timeout_secs: 30,
            years: YearRange::new(2018, 2024),
            retry: RetryPolicy::default(),
            imf: SourceConfig {
                base_url: DEFAULT_IMF_BASE_URL.to_string(),
                indicators: indicator_set(DEFAULT_IMF_INDICATORS),
            },
            world_bank: SourceConfig {
                base_url: DEFAULT_WORLD_BANK_BASE_URL.to_string(),
                indicators: indicator_set(DEFAULT_WORLD_BANK_INDICATORS),
            },
            countries: CountrySet::new(
                DEFAULT_COUNTRIES
                    .iter()
                    .map(|&(code, name, region)| Country::new(code, name, region))
                    .collect(),
            ),
        }
    }
}
