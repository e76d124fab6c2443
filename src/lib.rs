pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod types;

// Ports and their infrastructure implementations
pub mod app;
pub mod infra;

pub use error::{CompactorError, Result};
pub use pipeline::source::SourceLocator;
pub use pipeline::{Pipeline, PipelineResult};
pub use types::{NormalizedRecord, RawRecord};
