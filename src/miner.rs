//! Note text mining
//!
//! This module turns free-text journal notes into word statistics:
//! - Tokenization with stopword removal and stemming
//! - Stem frequency with a representative surface form per stem
//! - A TF-IDF-like distinctiveness score against the mood partition
//! - Sliding-window word co-occurrence mining
//!
//! The stemmer is an injected capability (see [`crate::stem::Stemmer`]) so
//! the miner stays testable with a fake.

use crate::stem::{is_stopword, PorterStemmer, Stemmer};
use crate::types::{MoodWordProfile, NormalizedEntry, WordPair, WordStat};
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

/// Maximum words in the global word cloud
pub const WORD_CLOUD_CAP: usize = 100;

/// Maximum distinctive words per mood group
pub const MOOD_WORDS_CAP: usize = 15;

/// Maximum co-occurring pairs per mood group
pub const CO_OCCURRENCE_CAP: usize = 20;

/// Default sliding-window width for co-occurrence mining
pub const DEFAULT_CO_OCCURRENCE_WINDOW: usize = 5;

/// Minimum token length kept by the tokenizer
const MIN_TOKEN_LEN: usize = 3;

/// Notes grouped under one mood label
#[derive(Debug, Clone)]
pub struct MoodNotes {
    pub mood: String,
    pub notes: Vec<String>,
    /// Concatenated lowercase note text, kept for containment checks
    lower_text: String,
}

/// Partition of all non-empty notes by mood label, in first-seen label
/// order. Entries without a note are excluded.
#[derive(Debug, Clone, Default)]
pub struct NotePartition {
    groups: Vec<MoodNotes>,
}

impl NotePartition {
    pub fn from_entries(entries: &[NormalizedEntry]) -> Self {
        let mut groups: Vec<MoodNotes> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for normalized in entries {
            let note = match normalized.entry.note.as_deref() {
                Some(note) if !note.trim().is_empty() => note,
                _ => continue,
            };

            let mood = &normalized.entry.mood;
            let slot = *index.entry(mood.clone()).or_insert_with(|| {
                groups.push(MoodNotes {
                    mood: mood.clone(),
                    notes: Vec::new(),
                    lower_text: String::new(),
                });
                groups.len() - 1
            });

            let group = &mut groups[slot];
            if !group.lower_text.is_empty() {
                group.lower_text.push(' ');
            }
            group.lower_text.push_str(&note.to_lowercase());
            group.notes.push(note.to_string());
        }

        NotePartition { groups }
    }

    pub fn groups(&self) -> &[MoodNotes] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// A surviving token: original surface form plus its stem
#[derive(Debug, Clone)]
struct Token {
    surface: String,
    stem: String,
}

/// Miner over note text, configured with a stemmer and a co-occurrence
/// window width
pub struct TextMiner {
    stemmer: Box<dyn Stemmer>,
    window: usize,
}

impl Default for TextMiner {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMiner {
    /// Create a miner with the default Porter stemmer and window width
    pub fn new() -> Self {
        Self {
            stemmer: Box::new(PorterStemmer),
            window: DEFAULT_CO_OCCURRENCE_WINDOW,
        }
    }

    /// Create a miner with a custom stemming capability
    pub fn with_stemmer(stemmer: Box<dyn Stemmer>) -> Self {
        Self {
            stemmer,
            window: DEFAULT_CO_OCCURRENCE_WINDOW,
        }
    }

    /// Override the co-occurrence window width
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Top words across the given notes, frequency-descending, capped at
    /// `WORD_CLOUD_CAP`. The partition supplies IDF context for the tfidf
    /// field; sorting ignores it.
    pub fn word_cloud(&self, notes: &[String], context: &NotePartition) -> Vec<WordStat> {
        let mut scored = self.score_words(notes, context);
        scored.sort_by_key(|(stat, first_seen)| (Reverse(stat.value), *first_seen));
        scored.truncate(WORD_CLOUD_CAP);
        scored.into_iter().map(|(stat, _)| stat).collect()
    }

    /// Per-mood word associations: distinctive words (tfidf-descending,
    /// capped at `MOOD_WORDS_CAP`) and co-occurring pairs per group. The
    /// co-occurrence window never crosses mood groups.
    pub fn mood_associations(&self, context: &NotePartition) -> BTreeMap<String, MoodWordProfile> {
        let mut associations = BTreeMap::new();

        for group in context.groups() {
            let mut scored = self.score_words(&group.notes, context);
            scored.sort_by(|(a, a_seen), (b, b_seen)| {
                b.tfidf
                    .partial_cmp(&a.tfidf)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a_seen.cmp(b_seen))
            });
            scored.truncate(MOOD_WORDS_CAP);

            associations.insert(
                group.mood.clone(),
                MoodWordProfile {
                    words: scored.into_iter().map(|(stat, _)| stat).collect(),
                    co_occurring: self.co_occurrences(&group.notes),
                },
            );
        }

        associations
    }

    /// Sliding-window co-occurrence pairs across the given notes,
    /// count-descending, capped at `CO_OCCURRENCE_CAP`.
    ///
    /// For every ordered position pair (i, j) with `i < j < i + window`,
    /// pairs with identical stems are skipped and the remaining pairs are
    /// keyed order-independently (stems sorted). One example surface pair is
    /// retained per key.
    pub fn co_occurrences(&self, notes: &[String]) -> Vec<WordPair> {
        let tokens = self.tokenize(notes);

        // pair key -> (count, first-seen index, example surfaces)
        let mut pairs: HashMap<(String, String), (u32, usize, [String; 2])> = HashMap::new();
        let mut next_index = 0usize;

        for i in 0..tokens.len() {
            let upper = (i + self.window).min(tokens.len());
            for j in (i + 1)..upper {
                let (a, b) = (&tokens[i], &tokens[j]);
                if a.stem == b.stem {
                    continue;
                }

                let key = if a.stem <= b.stem {
                    (a.stem.clone(), b.stem.clone())
                } else {
                    (b.stem.clone(), a.stem.clone())
                };

                let slot = pairs.entry(key).or_insert_with(|| {
                    let slot = (0, next_index, [a.surface.clone(), b.surface.clone()]);
                    next_index += 1;
                    slot
                });
                slot.0 += 1;
            }
        }

        let mut ranked: Vec<(u32, usize, [String; 2])> = pairs.into_values().collect();
        ranked.sort_by_key(|&(count, first_seen, _)| (Reverse(count), first_seen));
        ranked.truncate(CO_OCCURRENCE_CAP);

        ranked
            .into_iter()
            .map(|(count, _, words)| WordPair { words, count })
            .collect()
    }

    /// Frequency plus distinctiveness for every stem in the notes, paired
    /// with its first-seen index for stable downstream ordering.
    fn score_words(&self, notes: &[String], context: &NotePartition) -> Vec<(WordStat, usize)> {
        let tokens = self.tokenize(notes);

        // stem -> (count, first-seen index, surface form tallies)
        #[allow(clippy::type_complexity)]
        let mut stems: HashMap<String, (u32, usize, HashMap<String, (u32, usize)>)> =
            HashMap::new();
        let mut next_index = 0usize;

        for token in &tokens {
            let group = stems.entry(token.stem.clone()).or_insert_with(|| {
                let group = (0, next_index, HashMap::new());
                next_index += 1;
                group
            });
            group.0 += 1;

            let surfaces = &mut group.2;
            let surface_index = surfaces.len();
            let surface = surfaces
                .entry(token.surface.clone())
                .or_insert((0, surface_index));
            surface.0 += 1;
        }

        let mut scored: Vec<(WordStat, usize)> = stems
            .into_values()
            .map(|(count, first_seen, surfaces)| {
                let representative = representative_surface(surfaces);
                let tfidf = f64::from(count) * inverse_group_frequency(context, &representative);
                (
                    WordStat {
                        text: representative,
                        value: count,
                        tfidf,
                    },
                    first_seen,
                )
            })
            .collect();

        // deterministic base order before the caller's ranking sort
        scored.sort_by_key(|&(_, first_seen)| first_seen);
        scored
    }

    /// Lowercase-match tokenization: alphanumeric runs of at least
    /// `MIN_TOKEN_LEN` characters, stopwords dropped, stems computed from
    /// the lowercase form while the original surface form is retained.
    fn tokenize(&self, notes: &[String]) -> Vec<Token> {
        let text = notes.join(" ");
        let mut tokens = Vec::new();

        for raw in text.split(|c: char| !c.is_alphanumeric()) {
            if raw.chars().count() < MIN_TOKEN_LEN {
                continue;
            }
            let lower = raw.to_lowercase();
            if is_stopword(&lower) {
                continue;
            }
            tokens.push(Token {
                surface: raw.to_string(),
                stem: self.stemmer.stem(&lower),
            });
        }

        tokens
    }
}

/// The original-case form that occurs most often among tokens sharing a
/// stem; ties keep the form seen first.
fn representative_surface(surfaces: HashMap<String, (u32, usize)>) -> String {
    let mut forms: Vec<(String, (u32, usize))> = surfaces.into_iter().collect();
    forms.sort_by_key(|&(_, (count, first_seen))| (Reverse(count), first_seen));
    forms
        .into_iter()
        .next()
        .map(|(form, _)| form)
        .unwrap_or_default()
}

/// `ln(totalGroups / max(groupsContainingWord, 1))` over the mood partition.
fn inverse_group_frequency(context: &NotePartition, word: &str) -> f64 {
    let total = context.len();
    if total == 0 {
        return 0.0;
    }
    let containing = groups_containing_word(context, word).max(1);
    ((total as f64) / (containing as f64)).ln()
}

/// Count mood groups whose concatenated lowercase note text contains the
/// representative word as a raw substring.
///
/// This intentionally matches the surface form, not the stem, and matches
/// inside larger words ("run" hits "brunch"). The original scorer behaves
/// this way and published tfidf values depend on it, so it is reproduced
/// here rather than corrected.
fn groups_containing_word(context: &NotePartition, word: &str) -> usize {
    let needle = word.to_lowercase();
    context
        .groups()
        .iter()
        .filter(|group| group.lower_text.contains(&needle))
        .count()
}
