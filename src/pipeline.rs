//! Pipeline orchestration
//!
//! This module provides the public API for the mood analytics engine. It
//! wires identifier validation, entry normalization, numeric aggregation,
//! and text mining into one snapshot computation.
//!
//! The engine holds no state between calls: a snapshot is a pure function
//! of the entry list, so the same entries always produce the same snapshot
//! and concurrent computations need no locking.

use crate::aggregator::NumericAggregator;
use crate::error::StatsError;
use crate::miner::{NotePartition, TextMiner};
use crate::normalizer::EntryNormalizer;
use crate::types::{MoodEntry, StatsSnapshot};

/// Check a candidate user identifier before any data access.
///
/// Accepts strictly positive identifiers only. Failure signals a contract
/// violation in the caller, never an empty result; callers must not fold it
/// into the "no data" path.
pub fn validate_user_id(user_id: Option<i64>) -> Result<i64, StatsError> {
    match user_id {
        None => Err(StatsError::InvalidUserId("missing".to_string())),
        Some(id) if id > 0 => Ok(id),
        Some(id) => Err(StatsError::InvalidUserId(format!(
            "{id} is not strictly positive"
        ))),
    }
}

/// External persistence collaborator.
///
/// Contract: entries come back ordered by date descending (newest first),
/// and a user with no entries yields an empty list, not an error.
pub trait EntryStore {
    fn entries_for_user(&self, user_id: i64) -> Result<Vec<MoodEntry>, StatsError>;
}

/// Compute a snapshot from newest-first entries with default settings.
///
/// Infallible: degenerate input (empty list, unmapped moods, missing notes)
/// produces a fully-formed snapshot of documented defaults.
pub fn compute_stats(entries: &[MoodEntry]) -> StatsSnapshot {
    StatsEngine::new().compute(entries)
}

/// Analytics engine configured with a text miner.
///
/// Use this to swap the stemmer or co-occurrence window; [`compute_stats`]
/// covers the common case.
pub struct StatsEngine {
    miner: TextMiner,
}

impl Default for StatsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsEngine {
    /// Create an engine with the default miner configuration
    pub fn new() -> Self {
        Self {
            miner: TextMiner::new(),
        }
    }

    /// Create an engine around a configured miner
    pub fn with_miner(miner: TextMiner) -> Self {
        Self { miner }
    }

    /// Assemble a snapshot from newest-first entries.
    ///
    /// Pure aggregation: the numeric aggregator and the text miner run over
    /// the same normalized entries and their outputs merge unchanged into
    /// the snapshot.
    pub fn compute(&self, entries: &[MoodEntry]) -> StatsSnapshot {
        let normalized = EntryNormalizer::normalize(entries);
        let notes = EntryNormalizer::collect_notes(&normalized);
        let partition = NotePartition::from_entries(&normalized);

        let numeric = NumericAggregator::aggregate(&normalized);
        let word_cloud_data = self.miner.word_cloud(&notes, &partition);
        let mood_word_associations = self.miner.mood_associations(&partition);

        StatsSnapshot {
            streak: numeric.streak,
            mood_chart_data: numeric.mood_chart_data,
            mood_counts: numeric.mood_counts,
            stability_score: numeric.stability_score,
            activity_patterns: numeric.activity_patterns,
            day_of_week_averages: numeric.day_of_week_averages,
            productivity_correlation: numeric.productivity_correlation,
            word_cloud_data,
            mood_word_associations,
        }
    }

    /// Validate the identifier, fetch the user's entries, and compute.
    ///
    /// Store failures propagate unchanged; no partial snapshot is returned.
    pub fn compute_for_user(
        &self,
        store: &dyn EntryStore,
        user_id: Option<i64>,
    ) -> Result<StatsSnapshot, StatsError> {
        let user_id = validate_user_id(user_id)?;
        let entries = store.entries_for_user(user_id)?;
        Ok(self.compute(&entries))
    }
}
