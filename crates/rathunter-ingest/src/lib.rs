pub mod client;
pub mod error;
pub mod ingestor;
pub mod normalize;
pub mod snapshot;

pub use client::FindARatClient;
pub use error::{FetchError, NormalizeError};
pub use ingestor::Ingestor;
pub use normalize::{augment, AugmentReport, SkippedRow};
pub use snapshot::{load_offline_records, parse_records, write_snapshot};
