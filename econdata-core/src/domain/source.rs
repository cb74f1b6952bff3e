use serde::{Deserialize, Serialize};
use std::fmt;

/// Upstream statistical API a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Source {
    /// IMF DataMapper API
    #[serde(rename = "IMF")]
    Imf,
    /// World Bank open data API
    #[serde(rename = "World Bank")]
    WorldBank,
}

impl Source {
    /// All sources, in fetch order.
    pub const ALL: [Source; 2] = [Source::Imf, Source::WorldBank];

    /// Label written to the `Source` column.
    pub fn label(&self) -> &'static str {
        match self {
            Source::Imf => "IMF",
            Source::WorldBank => "World Bank",
        }
    }

    /// Prefix of the per-source export file.
    pub fn file_stem(&self) -> &'static str {
        match self {
            Source::Imf => "imf_data",
            Source::WorldBank => "world_bank_data",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
