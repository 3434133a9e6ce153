//! Storage infrastructure - JSON file and in-memory repositories

mod classification_cache;
mod factory;
mod json_file;
mod response_memory;
mod transcript;

pub use classification_cache::{InMemoryClassificationCache, JsonFileClassificationCache};
pub use factory::{Repositories, StorageFactory};
pub use json_file::JsonFileStore;
pub use response_memory::{InMemoryResponseMemory, JsonFileResponseMemory};
pub use transcript::{InMemoryTranscript, JsonFileTranscript};
