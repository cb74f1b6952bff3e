//! HTTP request helper.
//!
//! A single GET returning parsed JSON, retried with exponential backoff.
//! Exhausting the retries is not an error: the caller gets
//! [`FetchOutcome::Empty`] and carries on with whatever data it has.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error, warn};

use super::provider::DataError;
use crate::config::RetryPolicy;

/// Query parameters as `(name, value)` pairs.
pub type Query<'a> = [(&'a str, String)];

/// One GET → JSON round trip, no retries.
///
/// The seam between the adapters and the network; tests replace it with
/// canned responses.
pub trait JsonTransport: Send + Sync {
    fn get_json(&self, url: &str, query: &Query<'_>) -> Result<Value, DataError>;
}

/// Blocking `reqwest` transport with a per-request timeout.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("econdata/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DataError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

impl JsonTransport for HttpTransport {
    fn get_json(&self, url: &str, query: &Query<'_>) -> Result<Value, DataError> {
        let resp = self
            .client
            .get(url)
            .query(query)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DataError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        resp.json::<Value>()
            .map_err(|e| DataError::InvalidBody(e.to_string()))
    }
}

/// Result of a retried request.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Parsed JSON body.
    Data(Value),
    /// Every attempt failed; there is no data for this call.
    Empty {
        attempts: u32,
        last_error: Option<DataError>,
    },
}

impl FetchOutcome {
    pub fn into_data(self) -> Option<Value> {
        match self {
            FetchOutcome::Data(value) => Some(value),
            FetchOutcome::Empty { .. } => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FetchOutcome::Empty { .. })
    }
}

/// Retrying GET helper shared by the adapters.
#[derive(Clone)]
pub struct RequestHelper {
    transport: Arc<dyn JsonTransport>,
    retry: RetryPolicy,
}

impl RequestHelper {
    pub fn new(transport: Arc<dyn JsonTransport>, retry: RetryPolicy) -> Self {
        Self { transport, retry }
    }

    /// GET `url` with `query`, retrying on any transport, status, or body failure.
    pub fn get(&self, url: &str, query: &Query<'_>) -> FetchOutcome {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 0..max_attempts {
            if attempt > 0 {
                let delay = self.retry.delay_for(attempt - 1);
                debug!(?delay, "backing off before retry");
                std::thread::sleep(delay);
            }

            match self.transport.get_json(url, query) {
                Ok(value) => return FetchOutcome::Data(value),
                Err(e) => {
                    warn!(
                        "request failed (attempt {}/{}): {e}",
                        attempt + 1,
                        max_attempts
                    );
                    last_error = Some(e);
                }
            }
        }

        error!(url, "failed to fetch data after {max_attempts} attempts");
        FetchOutcome::Empty {
            attempts: max_attempts,
            last_error,
        }
    }
}
