//! Entry normalization
//!
//! This module converts raw persisted entries into the canonical in-memory
//! form the aggregators consume:
//! - `activities` derived as `emotions ++ sleep ++ productivity`
//! - note text collected for the text miner
//!
//! Entries arrive ordered newest-first and leave in the same order; nothing
//! is dropped or reordered.

use crate::types::{MoodEntry, NormalizedEntry};

/// Normalizer for deriving per-entry activity lists
pub struct EntryNormalizer;

impl EntryNormalizer {
    /// Normalize raw entries, preserving order and count.
    ///
    /// The derived `activities` list concatenates the three tag lists in
    /// order; duplicates are kept so repeated tags weigh more in the
    /// activity pattern tallies.
    pub fn normalize(entries: &[MoodEntry]) -> Vec<NormalizedEntry> {
        entries
            .iter()
            .map(|entry| NormalizedEntry {
                entry: entry.clone(),
                activities: derive_activities(entry),
            })
            .collect()
    }

    /// Collect the non-empty, non-whitespace-only notes in original order.
    pub fn collect_notes(entries: &[NormalizedEntry]) -> Vec<String> {
        entries
            .iter()
            .filter_map(|normalized| normalized.entry.note.as_deref())
            .filter(|note| !note.trim().is_empty())
            .map(str::to_string)
            .collect()
    }
}

fn derive_activities(entry: &MoodEntry) -> Vec<String> {
    let mut activities =
        Vec::with_capacity(entry.emotions.len() + entry.sleep.len() + entry.productivity.len());
    activities.extend(entry.emotions.iter().cloned());
    activities.extend(entry.sleep.iter().cloned());
    activities.extend(entry.productivity.iter().cloned());
    activities
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn entry_with_tags() -> MoodEntry {
        MoodEntry {
            id: 1,
            date: Utc::now(),
            mood: "good".to_string(),
            emotions: vec!["calm".to_string(), "happy".to_string()],
            sleep: vec!["rested".to_string()],
            productivity: vec!["focus".to_string(), "calm".to_string()],
            note: Some("a good day".to_string()),
        }
    }

    #[test]
    fn test_activities_concatenation_order() {
        let normalized = EntryNormalizer::normalize(&[entry_with_tags()]);

        assert_eq!(
            normalized[0].activities,
            vec!["calm", "happy", "rested", "focus", "calm"]
        );
    }

    #[test]
    fn test_duplicates_are_kept() {
        let normalized = EntryNormalizer::normalize(&[entry_with_tags()]);

        // "calm" appears in both emotions and productivity
        let calm_count = normalized[0]
            .activities
            .iter()
            .filter(|a| *a == "calm")
            .count();
        assert_eq!(calm_count, 2);
    }

    #[test]
    fn test_no_entries_dropped_or_reordered() {
        let mut older = entry_with_tags();
        older.id = 2;
        older.note = None;

        let normalized = EntryNormalizer::normalize(&[entry_with_tags(), older]);

        assert_eq!(normalized.len(), 2);
        assert_eq!(normalized[0].entry.id, 1);
        assert_eq!(normalized[1].entry.id, 2);
    }

    #[test]
    fn test_collect_notes_skips_blank_text() {
        let mut blank = entry_with_tags();
        blank.note = Some("   ".to_string());
        let mut missing = entry_with_tags();
        missing.note = None;

        let normalized = EntryNormalizer::normalize(&[entry_with_tags(), blank, missing]);
        let notes = EntryNormalizer::collect_notes(&normalized);

        assert_eq!(notes, vec!["a good day"]);
    }
}
