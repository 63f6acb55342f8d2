//! Snapshot providers: the fetch interface and its checkpoint API
//! implementation.

pub mod checkpoint;
pub mod traits;

pub use checkpoint::CheckpointApiFetcher;
pub use traits::{FetchError, SnapshotFetcher};
