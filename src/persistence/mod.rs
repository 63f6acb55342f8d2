//! Durable storage for finalized hourly statistics.

pub mod error;
pub mod text_file;
pub mod traits;

pub use error::PersistenceError;
pub use text_file::TextFileStatisticsSink;
pub use traits::StatisticsSink;
