//! Integration tests for the full fetch → clean → export pipeline.
//!
//! A canned transport stands in for both APIs; output goes to a temp dir.

use serde_json::{json, Value};
use std::cell::RefCell;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use econdata_core::config::{
    Country, CountrySet, Indicator, IndicatorSet, PipelineConfig, RetryPolicy, SourceConfig,
    YearRange,
};
use econdata_core::data::{DataError, FetchProgress, JsonTransport, Query, SilentProgress};
use econdata_core::{ObservationRecord, Source};
use econdata_runner::{Pipeline, RunOutcome};

const TS: &str = "20250101_120000";

/// Answers by URL substring; unknown URLs fail like a dead network.
#[derive(Default)]
struct StubTransport {
    routes: Vec<(String, Value)>,
    calls: Mutex<usize>,
}

impl StubTransport {
    fn route(mut self, needle: &str, body: Value) -> Self {
        self.routes.push((needle.to_string(), body));
        self
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl JsonTransport for StubTransport {
    fn get_json(&self, url: &str, _query: &Query<'_>) -> Result<Value, DataError> {
        *self.calls.lock().unwrap() += 1;
        self.routes
            .iter()
            .find(|(needle, _)| url.contains(needle.as_str()))
            .map(|(_, body)| body.clone())
            .ok_or_else(|| DataError::NetworkUnreachable(format!("no route for {url}")))
    }
}

/// Records every callback as a string.
#[derive(Default)]
struct RecordingProgress {
    events: RefCell<Vec<String>>,
}

impl FetchProgress for RecordingProgress {
    fn on_source_start(&self, source: Source, indicator_count: usize) {
        self.events
            .borrow_mut()
            .push(format!("source {source} {indicator_count}"));
    }
    fn on_indicator_start(&self, indicator: &Indicator, index: usize, total: usize) {
        self.events
            .borrow_mut()
            .push(format!("start {} {}/{}", indicator.code, index + 1, total));
    }
    fn on_indicator_complete(&self, indicator: &Indicator, records: usize) {
        self.events
            .borrow_mut()
            .push(format!("done {} {records}", indicator.code));
    }
    fn on_source_complete(&self, source: Source, records: usize) {
        self.events
            .borrow_mut()
            .push(format!("source done {source} {records}"));
    }
    fn on_fetch_complete(&self, total_records: usize) {
        self.events
            .borrow_mut()
            .push(format!("fetched {total_records}"));
    }
    fn on_cleaned(&self, kept: usize) {
        self.events.borrow_mut().push(format!("cleaned {kept}"));
    }
    fn on_exported(&self, _path: &Path, rows: usize) {
        self.events.borrow_mut().push(format!("exported {rows}"));
    }
    fn on_no_data(&self) {
        self.events.borrow_mut().push("no data".to_string());
    }
}

fn fixture_config(output_dir: &Path) -> PipelineConfig {
    PipelineConfig {
        output_dir: output_dir.to_path_buf(),
        rate_limit_ms: 0,
        request_timeout_secs: 1,
        years: YearRange::new(2019, 2020),
        retry: RetryPolicy::immediate(3),
        imf: SourceConfig {
            base_url: "http://imf.test".into(),
            indicators: IndicatorSet::new(vec![
                Indicator::new("LUR", "Unemployment Rate", ""),
                Indicator::new("PCPIPCH", "Inflation Rate (CPI)", ""),
            ]),
        },
        world_bank: SourceConfig {
            base_url: "http://wb.test".into(),
            indicators: IndicatorSet::new(vec![Indicator::new("SP.POP.TOTL", "Population", "")]),
        },
        countries: CountrySet::new(vec![
            Country::new("KEN", "Kenya", "Africa"),
            Country::new("BRA", "Brazil", "Latin America"),
        ]),
    }
}

fn read_csv(path: &Path) -> Vec<ObservationRecord> {
    let mut rdr = csv::Reader::from_path(path).unwrap();
    rdr.deserialize().map(|r| r.unwrap()).collect()
}

#[test]
fn full_run_writes_master_and_per_source_files() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("data");
    let config = fixture_config(&out);
    let stub = Arc::new(
        StubTransport::default()
            .route(
                "/LUR/",
                json!({"values": {"LUR": {
                    "BRA": {"2019": 11.9, "2020": 13.5, "2025": 8.0},
                    "KEN": {"2020": ""}
                }}}),
            )
            // PCPIPCH has no route: all retries fail, the run continues
            .route(
                "/indicator/SP.POP.TOTL",
                json!([{"page": 1}, [
                    {"countryiso3code": "KEN", "date": "2019", "value": 52573973},
                    {"countryiso3code": "USA", "date": "2019", "value": 328329953}
                ]]),
            ),
    );

    let pipeline = Pipeline::with_default_adapters(&config, stub.clone());
    let progress = RecordingProgress::default();
    let outcome = pipeline.run_at(&progress, TS).unwrap();

    // LUR once, PCPIPCH three times, population once
    assert_eq!(stub.calls(), 5);

    let RunOutcome::Completed { summary, files } = outcome else {
        panic!("expected a completed run");
    };
    assert_eq!(summary.total_records, 4);
    assert_eq!(summary.countries, 2);
    assert_eq!(summary.indicators, 2);
    assert_eq!(summary.year_range, Some((2019, 2020)));
    assert_eq!(summary.missing_values, 1);

    let names: Vec<String> = files
        .iter()
        .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            format!("economic_data_master_{TS}.csv"),
            format!("imf_data_{TS}.csv"),
            format!("world_bank_data_{TS}.csv"),
        ]
    );
    assert_eq!(files.iter().map(|f| f.rows).collect::<Vec<_>>(), vec![4, 3, 1]);

    let master = read_csv(&files[0].path);
    let keys: Vec<(&str, i32, &str, Option<f64>)> = master
        .iter()
        .map(|r| (r.country_name.as_str(), r.year, r.indicator_name.as_str(), r.value))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("Brazil", 2019, "Unemployment Rate", Some(11.9)),
            ("Brazil", 2020, "Unemployment Rate", Some(13.5)),
            ("Kenya", 2019, "Population", Some(52573973.0)),
            ("Kenya", 2020, "Unemployment Rate", None),
        ]
    );

    let world_bank = read_csv(&files[2].path);
    assert!(world_bank.iter().all(|r| r.source == Source::WorldBank));

    let events = progress.events.borrow();
    let fetch_events: Vec<&str> = events.iter().take(10).map(String::as_str).collect();
    assert_eq!(
        fetch_events,
        vec![
            "source IMF 2",
            "start LUR 1/2",
            "done LUR 3",
            "start PCPIPCH 2/2",
            "done PCPIPCH 0",
            "source done IMF 3",
            "source World Bank 1",
            "start SP.POP.TOTL 1/1",
            "done SP.POP.TOTL 1",
            "source done World Bank 1",
        ]
    );
    assert_eq!(events[10], "fetched 4");
    assert_eq!(events[11], "cleaned 4");
}

#[test]
fn no_data_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("data");
    let config = fixture_config(&out);
    let stub = Arc::new(StubTransport::default());

    let pipeline = Pipeline::with_default_adapters(&config, stub.clone());
    let progress = RecordingProgress::default();
    let outcome = pipeline.run_at(&progress, TS).unwrap();

    assert!(matches!(outcome, RunOutcome::NoData));
    assert!(!out.exists());
    // every indicator still attempted with full retries
    assert_eq!(stub.calls(), 9);
    assert_eq!(progress.events.borrow().last().unwrap(), "no data");
}

#[test]
fn world_bank_file_skipped_when_subset_empty() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture_config(dir.path());
    let stub = Arc::new(StubTransport::default().route(
        "imf.test",
        json!({"values": {"LUR": {"BRA": {"2019": 11.9}}, "PCPIPCH": {"BRA": {"2019": 3.7}}}}),
    ));

    let pipeline = Pipeline::with_default_adapters(&config, stub);
    let outcome = pipeline.run_at(&SilentProgress, TS).unwrap();

    let RunOutcome::Completed { files, .. } = outcome else {
        panic!("expected a completed run");
    };
    assert_eq!(files.len(), 2);
    assert_eq!(files[1].source, Some(Source::Imf));
    assert!(!dir.path().join(format!("world_bank_data_{TS}.csv")).exists());
}

#[test]
fn collect_keeps_indicator_order() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture_config(dir.path());
    let stub = Arc::new(
        StubTransport::default()
            .route("/LUR/", json!({"values": {"LUR": {"BRA": {"2020": 1.0}}}}))
            .route("/PCPIPCH/", json!({"values": {"PCPIPCH": {"BRA": {"2020": 2.0}}}}))
            .route(
                "wb.test",
                json!([{}, [{"countryiso3code": "BRA", "date": "2020", "value": 3.0}]]),
            ),
    );

    let pipeline = Pipeline::with_default_adapters(&config, stub);
    let raw = pipeline.collect(&SilentProgress);
    let codes: Vec<&str> = raw.iter().map(|r| r.indicator_code.as_str()).collect();
    assert_eq!(codes, vec!["LUR", "PCPIPCH", "SP.POP.TOTL"]);
}

#[test]
fn rate_limit_pause_follows_every_indicator() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = fixture_config(dir.path());
    config.rate_limit_ms = 50;
    config.retry = RetryPolicy::immediate(1);
    let indicators = config.imf.indicators.len() + config.world_bank.indicators.len();

    // dead network: every request fails, the pause still applies
    let pipeline = Pipeline::with_default_adapters(&config, Arc::new(StubTransport::default()));
    let started = Instant::now();
    let raw = pipeline.collect(&SilentProgress);
    let elapsed = started.elapsed();

    assert!(raw.is_empty());
    assert_eq!(indicators, 3);
    assert!(
        elapsed >= Duration::from_millis(50 * indicators as u64),
        "elapsed {elapsed:?}"
    );
}
