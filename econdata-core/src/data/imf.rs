//! IMF DataMapper adapter.
//!
//! One batched request per indicator covers every country and every year in
//! range. The response nests values as
//! `values[indicator][country][year] = value`.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::http::RequestHelper;
use super::provider::{DataError, SourceAdapter};
use super::value::{parse_year_str, to_number};
use crate::config::{CountrySet, Indicator, IndicatorSet, PipelineConfig, YearRange};
use crate::domain::{ObservationRecord, Source};

/// IMF DataMapper source adapter.
pub struct ImfAdapter {
    helper: RequestHelper,
    base_url: String,
    indicators: IndicatorSet,
    years: YearRange,
}

impl ImfAdapter {
    pub fn new(helper: RequestHelper, config: &PipelineConfig) -> Self {
        Self {
            helper,
            base_url: config.imf.base_url.trim_end_matches('/').to_string(),
            indicators: config.imf.indicators.clone(),
            years: config.years,
        }
    }

    /// `{base}/{indicator}/{BRA,MEX,...}`
    pub fn request_url(base_url: &str, indicator_code: &str, countries: &CountrySet) -> String {
        format!("{base_url}/{indicator_code}/{}", countries.codes().join(","))
    }

    /// `periods=2018,2019,...`
    pub fn request_query(years: YearRange) -> Vec<(&'static str, String)> {
        let periods = years
            .years()
            .map(|y| y.to_string())
            .collect::<Vec<_>>()
            .join(",");
        vec![("periods", periods)]
    }

    /// Parse a DataMapper response into records.
    ///
    /// A missing `values` or indicator key means the API has no data and
    /// yields no records. A key that is present with the wrong shape is a
    /// format error.
    pub fn parse_response(
        resp: &Value,
        indicator: &Indicator,
        countries: &CountrySet,
        years: YearRange,
    ) -> Result<Vec<ObservationRecord>, DataError> {
        let root = resp
            .as_object()
            .ok_or_else(|| DataError::ResponseFormatChanged("response is not an object".into()))?;

        let Some(values) = root.get("values") else {
            debug!(indicator = %indicator.code, "response has no values");
            return Ok(Vec::new());
        };
        let values = expect_object(values, "values")?;

        let Some(indicator_data) = values.get(&indicator.code) else {
            debug!(indicator = %indicator.code, "indicator absent from response");
            return Ok(Vec::new());
        };
        let indicator_data = expect_object(indicator_data, &indicator.code)?;

        let mut records = Vec::new();
        for country in countries.iter() {
            let Some(country_data) = indicator_data.get(&country.code) else {
                continue;
            };
            let country_data = expect_object(country_data, &country.code)?;

            for (year_key, raw) in country_data {
                let Some(year) = parse_year_str(year_key) else {
                    debug!(year = %year_key, "skipping non-integer year key");
                    continue;
                };
                if !years.contains(year) {
                    continue;
                }
                let value = match raw {
                    Value::Null => continue,
                    Value::String(s) if s.is_empty() => None,
                    other => match to_number(other) {
                        Some(v) => Some(v),
                        None => {
                            debug!(country = %country.code, year, "skipping non-numeric value");
                            continue;
                        }
                    },
                };
                records.push(ObservationRecord::new(
                    country,
                    year,
                    indicator,
                    value,
                    Source::Imf,
                ));
            }
        }

        Ok(records)
    }
}

fn expect_object<'a>(value: &'a Value, key: &str) -> Result<&'a Map<String, Value>, DataError> {
    value.as_object().ok_or_else(|| {
        DataError::ResponseFormatChanged(format!("expected an object under '{key}'"))
    })
}

impl SourceAdapter for ImfAdapter {
    fn source(&self) -> Source {
        Source::Imf
    }

    fn indicators(&self) -> &IndicatorSet {
        &self.indicators
    }

    fn fetch(&self, indicator: &Indicator, countries: &CountrySet) -> Vec<ObservationRecord> {
        let url = Self::request_url(&self.base_url, &indicator.code, countries);
        let query = Self::request_query(self.years);

        let Some(resp) = self.helper.get(&url, &query).into_data() else {
            return Vec::new();
        };

        match Self::parse_response(&resp, indicator, countries, self.years) {
            Ok(records) => records,
            Err(e) => {
                warn!(indicator = %indicator.code, "error parsing IMF response: {e}");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Country;
    use serde_json::json;

    fn countries() -> CountrySet {
        CountrySet::new(vec![
            Country::new("BRA", "Brazil", "Latin America"),
            Country::new("KEN", "Kenya", "Africa"),
        ])
    }

    fn lur() -> Indicator {
        Indicator::new("LUR", "Unemployment Rate", "Unemployment rate, percent")
    }

    #[test]
    fn url_joins_countries_with_commas() {
        let url = ImfAdapter::request_url("http://imf.test/api/v1", "LUR", &countries());
        assert_eq!(url, "http://imf.test/api/v1/LUR/BRA,KEN");
    }

    #[test]
    fn query_lists_every_period() {
        let query = ImfAdapter::request_query(YearRange::new(2018, 2020));
        assert_eq!(query, vec![("periods", "2018,2019,2020".to_string())]);
    }

    #[test]
    fn years_outside_bounds_are_excluded() {
        let resp = json!({"values": {"LUR": {"BRA": {"2019": 11.9, "2025": 8.0}}}});
        let recs =
            ImfAdapter::parse_response(&resp, &lur(), &countries(), YearRange::new(2018, 2024))
                .unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].year, 2019);
        assert_eq!(recs[0].value, Some(11.9));
        assert_eq!(recs[0].country_name, "Brazil");
        assert_eq!(recs[0].source, Source::Imf);
    }

    #[test]
    fn value_rules() {
        let resp = json!({"values": {"LUR": {"BRA": {
            "2018": null,
            "2019": "",
            "2020": "7.5",
            "2021": "n/a",
            "2022": true,
            "year": 1.0
        }}}});
        let recs =
            ImfAdapter::parse_response(&resp, &lur(), &countries(), YearRange::new(2018, 2024))
                .unwrap();
        let got: Vec<(i32, Option<f64>)> = recs.iter().map(|r| (r.year, r.value)).collect();
        assert_eq!(got, vec![(2019, None), (2020, Some(7.5))]);
    }

    #[test]
    fn boolean_values_are_not_numbers() {
        let resp = json!({"values": {"LUR": {
            "BRA": {"2019": true, "2020": false},
            "KEN": {"2019": 4.9}
        }}});
        let recs =
            ImfAdapter::parse_response(&resp, &lur(), &countries(), YearRange::new(2018, 2024))
                .unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].country_code, "KEN");
    }

    #[test]
    fn missing_keys_mean_no_data() {
        let y = YearRange::new(2018, 2024);
        for resp in [json!({}), json!({"values": {}}), json!({"values": {"PCPIPCH": {}}})] {
            let recs = ImfAdapter::parse_response(&resp, &lur(), &countries(), y).unwrap();
            assert!(recs.is_empty());
        }
    }

    #[test]
    fn unrequested_countries_are_ignored() {
        let resp = json!({"values": {"LUR": {
            "USA": {"2019": 3.7},
            "KEN": {"2019": 5.0}
        }}});
        let recs =
            ImfAdapter::parse_response(&resp, &lur(), &countries(), YearRange::new(2018, 2024))
                .unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].country_code, "KEN");
    }

    #[test]
    fn wrong_shape_is_a_format_error() {
        let y = YearRange::new(2018, 2024);
        for resp in [
            json!([1, 2]),
            json!({"values": []}),
            json!({"values": {"LUR": "oops"}}),
            json!({"values": {"LUR": {"BRA": [11.9]}}}),
        ] {
            let err = ImfAdapter::parse_response(&resp, &lur(), &countries(), y).unwrap_err();
            assert!(matches!(err, DataError::ResponseFormatChanged(_)));
        }
    }
}
