//! Core types for the mood analytics pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: raw journal entries, normalized entries, and the final snapshot
//! consumed by the reporting layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fixed mood scale used by the journal UI.
///
/// Entries and snapshot keys carry mood labels as plain strings; this enum
/// only backs the label-to-score mapping and never crosses a serialization
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Great,
    Good,
    Meh,
    Bad,
    Awful,
}

impl Mood {
    /// Parse a free-form mood label from the persistence layer.
    ///
    /// Labels outside the fixed scale yield `None`; entries carrying them
    /// never contribute to numeric aggregates.
    pub fn from_label(label: &str) -> Option<Mood> {
        match label {
            "great" => Some(Mood::Great),
            "good" => Some(Mood::Good),
            "meh" => Some(Mood::Meh),
            "bad" => Some(Mood::Bad),
            "awful" => Some(Mood::Awful),
            _ => None,
        }
    }

    /// Numeric value on the 1-5 scale
    pub fn score(self) -> f64 {
        match self {
            Mood::Great => 5.0,
            Mood::Good => 4.0,
            Mood::Meh => 3.0,
            Mood::Bad => 2.0,
            Mood::Awful => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Great => "great",
            Mood::Good => "good",
            Mood::Meh => "meh",
            Mood::Bad => "bad",
            Mood::Awful => "awful",
        }
    }
}

/// Numeric value of a free-form mood label, if it maps onto the fixed scale
pub fn mood_score(label: &str) -> Option<f64> {
    Mood::from_label(label).map(Mood::score)
}

/// A raw journal entry as stored by the persistence layer.
///
/// Entries are read-only to the engine; callers may reuse the same list
/// across invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodEntry {
    /// Opaque entry identifier
    pub id: i64,
    /// When the entry was logged (streaks use day granularity, weekday
    /// averages use weekday granularity)
    pub date: DateTime<Utc>,
    /// Mood label; expected on the fixed scale but not guaranteed
    pub mood: String,
    /// Emotion tags (may be empty)
    #[serde(default)]
    pub emotions: Vec<String>,
    /// Sleep tags (may be empty)
    #[serde(default)]
    pub sleep: Vec<String>,
    /// Productivity tags (may be empty)
    #[serde(default)]
    pub productivity: Vec<String>,
    /// Optional free-text note
    #[serde(default)]
    pub note: Option<String>,
}

/// A journal entry augmented with its derived activity list.
///
/// `activities` is the order-preserving concatenation
/// `emotions ++ sleep ++ productivity`; duplicates are kept.
///
/// In-memory only; never serialized.
#[derive(Debug, Clone)]
pub struct NormalizedEntry {
    /// Source entry
    pub entry: MoodEntry,
    /// Derived activity tags
    pub activities: Vec<String>,
}

/// One point of the recent-mood chart
#[derive(Debug, Clone, Serialize)]
pub struct ChartPoint {
    pub date: DateTime<Utc>,
    /// Numeric mood; NaN (serialized as null) for unmapped labels
    pub mood: f64,
}

/// Activity tag with its tally inside one mood group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityCount {
    pub activity: String,
    pub count: u32,
}

/// A mined word with its frequency and distinctiveness score
#[derive(Debug, Clone, Serialize)]
pub struct WordStat {
    /// Representative surface form of the stem group
    pub text: String,
    /// Stem frequency across the analyzed notes
    pub value: u32,
    /// TF-IDF-like distinctiveness relative to the mood partition
    pub tfidf: f64,
}

/// A co-occurring word pair with its tally
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordPair {
    /// Example surface forms, in first-encountered order
    pub words: [String; 2],
    pub count: u32,
}

/// Word statistics for one mood group
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodWordProfile {
    /// Most distinctive words, tfidf-descending (at most 15)
    pub words: Vec<WordStat>,
    /// Most frequent word pairs, count-descending (at most 20)
    pub co_occurring: Vec<WordPair>,
}

/// Aggregate statistics over one user's entry history.
///
/// Constructed fresh per invocation and never mutated after return. All maps
/// are ordered so the same entry list always serializes byte-identically.
///
/// Serialize-only: the snapshot is an output for the rendering layer, and an
/// unmapped-mood chart point serializes as null, which has no `f64` reading
/// back.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    /// Consecutive-day streak ending at the most recent entry
    pub streak: u32,
    /// Up to the 7 most recent entries, ascending by date
    pub mood_chart_data: Vec<ChartPoint>,
    /// Mood label histogram
    pub mood_counts: BTreeMap<String, u32>,
    /// Inverse mood volatility, 0-100
    pub stability_score: f64,
    /// Per mood label: top activity tags, count-descending (at most 5)
    pub activity_patterns: BTreeMap<String, Vec<ActivityCount>>,
    /// Mean numeric mood per weekday; weekdays with no entries are omitted
    pub day_of_week_averages: BTreeMap<String, f64>,
    /// Approximate mood/productivity correlation, [-1,1], 3 decimals
    pub productivity_correlation: f64,
    /// Top words across all notes, value-descending (at most 100)
    pub word_cloud_data: Vec<WordStat>,
    /// Per mood label: distinctive words and co-occurring pairs
    pub mood_word_associations: BTreeMap<String, MoodWordProfile>,
}
