#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod extract;
pub mod normalize;
pub mod pipeline;
pub mod record;

pub use error::{Error, Result};
pub use extract::{
    Extraction, ExtractorConfig, FieldExtractor, FieldRule, IssueNoRule, PersonRule, StopRule,
    ValueShape,
};
pub use normalize::{Substitution, TextNormalizer};
pub use pipeline::{ExtractionPipeline, ExtractionStats, PipelineOutput};
pub use record::{Field, LandRecord, PersonRecord};
