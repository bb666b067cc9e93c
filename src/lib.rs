//! Mood Insights - analytics engine for mood journal entries
//!
//! The engine turns one user's chronological mood-entry history into a
//! statistics snapshot through a deterministic pipeline: entry
//! normalization → numeric aggregation + note text mining → snapshot
//! assembly.
//!
//! ## Modules
//!
//! - **Numeric Aggregator**: streaks, trend series, stability, correlations
//! - **Text Miner**: word frequency, distinctiveness, co-occurrence mining
//!
//! The engine performs no I/O: entries arrive pre-fetched (newest first)
//! and the snapshot is a pure function of them.

pub mod aggregator;
pub mod error;
pub mod miner;
pub mod normalizer;
pub mod pipeline;
pub mod stem;
pub mod types;

pub use error::StatsError;
pub use miner::{NotePartition, TextMiner};
pub use normalizer::EntryNormalizer;
pub use pipeline::{compute_stats, validate_user_id, EntryStore, StatsEngine};
pub use stem::{PorterStemmer, Stemmer};
pub use types::{Mood, MoodEntry, NormalizedEntry, StatsSnapshot};

/// Engine version reported by the CLI
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
