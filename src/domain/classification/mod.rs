//! Context classification domain - labels, cache entries and oracle prompt

mod cache;
mod label;
mod outcome;
mod prompt;

pub use cache::{
    CachedClassification, ClassificationCacheRepository, ClassificationCacheSnapshot,
    normalize_query,
};
pub use label::ContextLabel;
pub use outcome::{Classification, ClassificationSource};
pub use prompt::{classification_prompt, parse_verdict};
