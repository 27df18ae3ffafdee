pub mod persistent;
pub mod tier;
pub mod types;
mod core;

// Re-export cache types
pub use types::*;
// Re-export the pipeline cache
pub use core::{CacheSettings, PipelineCache};
pub use persistent::{PERSISTED_CACHE_VERSION, PersistedCache, PersistentStore};
pub use tier::TtlCache;
