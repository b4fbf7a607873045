pub mod aggregate;
pub mod config;
pub mod error;
pub mod formats;
pub mod registry;
pub mod sequence;
pub mod types;
pub mod variants;

pub use aggregate::{AggregationResult, aggregate_group, aggregate_region};
pub use config::Config;
pub use error::{Error, Result};
pub use sequence::{SequenceHandle, SequenceStore, lookup_character};
pub use types::{Position, SourceFile};
