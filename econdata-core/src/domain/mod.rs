//! Domain types for EconData

pub mod observation;
pub mod source;

pub use observation::{ObservationRecord, CSV_HEADER};
pub use source::Source;
