//! Fetching and parsing upstream data

pub mod http;
pub mod imf;
pub mod provider;
pub mod value;
pub mod world_bank;

pub use http::{FetchOutcome, HttpTransport, JsonTransport, Query, RequestHelper};
pub use imf::ImfAdapter;
pub use provider::{DataError, FetchProgress, SilentProgress, SourceAdapter, StdoutProgress};
pub use world_bank::WorldBankAdapter;

use std::sync::Arc;

use crate::config::PipelineConfig;

/// The two built-in adapters, IMF first, sharing one transport.
pub fn default_adapters(
    config: &PipelineConfig,
    transport: Arc<dyn JsonTransport>,
) -> Vec<Box<dyn SourceAdapter>> {
    let helper = RequestHelper::new(transport, config.retry);
    vec![
        Box::new(ImfAdapter::new(helper.clone(), config)),
        Box::new(WorldBankAdapter::new(helper, config)),
    ]
}
