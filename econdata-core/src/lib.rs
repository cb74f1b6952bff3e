//! EconData Core — domain types, configuration, and upstream data adapters.
//!
//! This crate contains everything that talks to or models the upstream APIs:
//! - The observation record and its source tag
//! - Injectable pipeline configuration (countries, indicators, year bounds)
//! - A retrying HTTP helper that degrades to "no data" instead of failing
//! - One adapter per upstream API behind the `SourceAdapter` trait

pub mod config;
pub mod data;
pub mod domain;

pub use config::{
    ConfigError, Country, CountrySet, Indicator, IndicatorSet, PipelineConfig, RetryPolicy,
    SourceConfig, YearRange,
};
pub use data::{DataError, FetchOutcome, FetchProgress, JsonTransport, SourceAdapter};
pub use domain::{ObservationRecord, Source, CSV_HEADER};
