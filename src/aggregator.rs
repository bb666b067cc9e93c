//! Numeric aggregation
//!
//! This module computes the numeric half of the snapshot from normalized
//! entries:
//! - Consecutive-day streak
//! - Recent mood chart series
//! - Mood histogram and stability score
//! - Per-mood activity rankings
//! - Day-of-week averages
//! - Mood/productivity correlation
//!
//! Precondition: entries are ordered newest-first. The streak scan and the
//! stability score both read adjacency in that order.

use crate::types::{mood_score, ActivityCount, ChartPoint, NormalizedEntry};
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

/// Number of entries shown on the recent-mood chart
pub const CHART_WINDOW: usize = 7;

/// Maximum activity tags kept per mood group
pub const ACTIVITY_PATTERN_CAP: usize = 5;

/// Numeric aggregates over one user's entry history
#[derive(Debug, Clone)]
pub struct NumericAggregates {
    pub streak: u32,
    pub mood_chart_data: Vec<ChartPoint>,
    pub mood_counts: BTreeMap<String, u32>,
    pub stability_score: f64,
    pub activity_patterns: BTreeMap<String, Vec<ActivityCount>>,
    pub day_of_week_averages: BTreeMap<String, f64>,
    pub productivity_correlation: f64,
}

/// Aggregator for the numeric snapshot fields
pub struct NumericAggregator;

impl NumericAggregator {
    /// Compute all numeric aggregates from newest-first entries.
    pub fn aggregate(entries: &[NormalizedEntry]) -> NumericAggregates {
        NumericAggregates {
            streak: current_streak(entries),
            mood_chart_data: mood_chart_data(entries),
            mood_counts: mood_counts(entries),
            stability_score: stability_score(entries),
            activity_patterns: activity_patterns(entries),
            day_of_week_averages: day_of_week_averages(entries),
            productivity_correlation: productivity_correlation(entries),
        }
    }
}

/// Count consecutive calendar days walking backward from the most recent
/// entry. Stops at the first gap that is not exactly one day, so duplicate
/// same-day entries end the streak too.
pub fn current_streak(entries: &[NormalizedEntry]) -> u32 {
    let mut dates = entries.iter().map(|n| n.entry.date.date_naive());

    let mut last = match dates.next() {
        Some(date) => date,
        None => return 0,
    };

    let mut streak = 1;
    for date in dates {
        match last.pred_opt() {
            Some(expected) if date == expected => {
                streak += 1;
                last = date;
            }
            _ => break,
        }
    }
    streak
}

/// Take the most recent `CHART_WINDOW` entries and reverse them into
/// ascending chronological order. Unmapped mood labels chart as NaN.
fn mood_chart_data(entries: &[NormalizedEntry]) -> Vec<ChartPoint> {
    let mut points: Vec<ChartPoint> = entries
        .iter()
        .take(CHART_WINDOW)
        .map(|n| ChartPoint {
            date: n.entry.date,
            mood: mood_score(&n.entry.mood).unwrap_or(f64::NAN),
        })
        .collect();
    points.reverse();
    points
}

/// Unnormalized histogram over mood labels
fn mood_counts(entries: &[NormalizedEntry]) -> BTreeMap<String, u32> {
    let mut counts = BTreeMap::new();
    for normalized in entries {
        *counts.entry(normalized.entry.mood.clone()).or_insert(0) += 1;
    }
    counts
}

/// Mean absolute difference between consecutive numeric moods, mapped onto
/// a 0-100 scale: `max(0, 100 - meanAbsDiff * 20)`.
///
/// Fewer than two scorable entries yields 100 (maximal stability is the
/// default, not an error). Pairs touching an unmapped mood are skipped.
pub fn stability_score(entries: &[NormalizedEntry]) -> f64 {
    if entries.len() < 2 {
        return 100.0;
    }

    let scores: Vec<Option<f64>> = entries
        .iter()
        .map(|n| mood_score(&n.entry.mood))
        .collect();

    let mut diff_sum = 0.0;
    let mut diff_count = 0u32;
    for pair in scores.windows(2) {
        if let (Some(a), Some(b)) = (pair[0], pair[1]) {
            diff_sum += (a - b).abs();
            diff_count += 1;
        }
    }

    if diff_count == 0 {
        return 100.0;
    }

    let mean_abs_diff = diff_sum / f64::from(diff_count);
    (100.0 - mean_abs_diff * 20.0).max(0.0)
}

/// For each observed mood label, tally activity tags and keep the top
/// `ACTIVITY_PATTERN_CAP` by count. Ties resolve to the tag seen first.
fn activity_patterns(entries: &[NormalizedEntry]) -> BTreeMap<String, Vec<ActivityCount>> {
    // tag -> (count, first-seen index); the index keeps ranking ties stable
    // and independent of hash iteration order
    let mut per_mood: HashMap<String, HashMap<String, (u32, usize)>> = HashMap::new();
    let mut next_index = 0usize;

    for normalized in entries {
        let tallies = per_mood
            .entry(normalized.entry.mood.clone())
            .or_default();
        for activity in &normalized.activities {
            let slot = tallies.entry(activity.clone()).or_insert_with(|| {
                let slot = (0, next_index);
                next_index += 1;
                slot
            });
            slot.0 += 1;
        }
    }

    let mut patterns = BTreeMap::new();
    for (mood, tallies) in per_mood {
        let mut ranked: Vec<(String, (u32, usize))> = tallies.into_iter().collect();
        ranked.sort_by_key(|&(_, (count, first_seen))| (Reverse(count), first_seen));
        ranked.truncate(ACTIVITY_PATTERN_CAP);

        patterns.insert(
            mood,
            ranked
                .into_iter()
                .map(|(activity, (count, _))| ActivityCount { activity, count })
                .collect(),
        );
    }
    patterns
}

/// Mean numeric mood per weekday. Weekdays with no scorable entries are
/// omitted entirely rather than reported as zero.
fn day_of_week_averages(entries: &[NormalizedEntry]) -> BTreeMap<String, f64> {
    let mut buckets: BTreeMap<String, (f64, u32)> = BTreeMap::new();

    for normalized in entries {
        if let Some(score) = mood_score(&normalized.entry.mood) {
            let weekday = normalized.entry.date.format("%A").to_string();
            let bucket = buckets.entry(weekday).or_insert((0.0, 0));
            bucket.0 += score;
            bucket.1 += 1;
        }
    }

    buckets
        .into_iter()
        .map(|(weekday, (sum, count))| (weekday, sum / f64::from(count)))
        .collect()
}

/// Pearson-style correlation between numeric mood and productivity tag
/// count.
///
/// Every degenerate path returns exactly 0.0: fewer than two valid pairs,
/// non-finite means, or zero variance in either series. The result is
/// clamped to [-1, 1] and rounded to three decimals; this function never
/// returns NaN or infinity.
pub fn productivity_correlation(entries: &[NormalizedEntry]) -> f64 {
    let pairs: Vec<(f64, f64)> = entries
        .iter()
        .filter_map(|n| {
            mood_score(&n.entry.mood).map(|mood| (mood, n.entry.productivity.len() as f64))
        })
        .filter(|(mood, prod)| mood.is_finite() && prod.is_finite())
        .collect();

    if pairs.len() < 2 {
        return 0.0;
    }

    let n = pairs.len() as f64;
    let mean_mood = pairs.iter().map(|(m, _)| m).sum::<f64>() / n;
    let mean_prod = pairs.iter().map(|(_, p)| p).sum::<f64>() / n;

    if !mean_mood.is_finite() || !mean_prod.is_finite() {
        return 0.0;
    }

    let mut covariance = 0.0;
    let mut mood_sq = 0.0;
    let mut prod_sq = 0.0;
    for (mood, prod) in &pairs {
        let dm = mood - mean_mood;
        let dp = prod - mean_prod;
        covariance += dm * dp;
        mood_sq += dm * dm;
        prod_sq += dp * dp;
    }

    if mood_sq <= 0.0 || prod_sq <= 0.0 {
        return 0.0;
    }

    let correlation = (covariance / (mood_sq.sqrt() * prod_sq.sqrt())).clamp(-1.0, 1.0);
    round3(correlation)
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::EntryNormalizer;
    use crate::types::MoodEntry;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn entry(id: i64, day: u32, mood: &str, productivity: Vec<&str>) -> MoodEntry {
        MoodEntry {
            id,
            date: Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap(),
            mood: mood.to_string(),
            emotions: vec![],
            sleep: vec![],
            productivity: productivity.into_iter().map(str::to_string).collect(),
            note: None,
        }
    }

    fn normalize(entries: Vec<MoodEntry>) -> Vec<NormalizedEntry> {
        EntryNormalizer::normalize(&entries)
    }

    #[test]
    fn test_streak_consecutive_days() {
        let entries = normalize(vec![
            entry(1, 3, "great", vec![]),
            entry(2, 2, "good", vec![]),
            entry(3, 1, "meh", vec![]),
        ]);
        assert_eq!(current_streak(&entries), 3);
    }

    #[test]
    fn test_streak_stops_at_gap() {
        let entries = normalize(vec![
            entry(1, 3, "great", vec![]),
            entry(2, 1, "good", vec![]),
        ]);
        assert_eq!(current_streak(&entries), 1);
    }

    #[test]
    fn test_streak_defaults() {
        assert_eq!(current_streak(&[]), 0);

        let single = normalize(vec![entry(1, 5, "meh", vec![])]);
        assert_eq!(current_streak(&single), 1);
    }

    #[test]
    fn test_streak_same_day_duplicate_ends_scan() {
        // two entries on the same day: gap of 0 is not a 1-day step
        let entries = normalize(vec![
            entry(1, 3, "great", vec![]),
            entry(2, 3, "good", vec![]),
            entry(3, 2, "meh", vec![]),
        ]);
        assert_eq!(current_streak(&entries), 1);
    }

    #[test]
    fn test_mood_chart_window_and_order() {
        let entries = normalize(
            (1..=10)
                .rev()
                .map(|day| entry(i64::from(day), day, "good", vec![]))
                .collect(),
        );

        let chart = mood_chart_data(&entries);
        assert_eq!(chart.len(), 7);
        // ascending chronological order: days 4..=10
        for window in chart.windows(2) {
            assert!(window[0].date < window[1].date);
        }
        assert_eq!(chart[0].date.date_naive().to_string(), "2024-01-04");
        assert_eq!(chart[6].date.date_naive().to_string(), "2024-01-10");
    }

    #[test]
    fn test_mood_chart_unmapped_label_is_nan() {
        let entries = normalize(vec![entry(1, 1, "ecstatic", vec![])]);
        let chart = mood_chart_data(&entries);
        assert!(chart[0].mood.is_nan());
    }

    #[test]
    fn test_mood_counts() {
        let entries = normalize(vec![
            entry(1, 3, "great", vec![]),
            entry(2, 2, "good", vec![]),
            entry(3, 1, "great", vec![]),
        ]);

        let counts = mood_counts(&entries);
        assert_eq!(counts.get("great"), Some(&2));
        assert_eq!(counts.get("good"), Some(&1));
    }

    #[test]
    fn test_stability_default_for_single_entry() {
        let entries = normalize(vec![entry(1, 1, "awful", vec![])]);
        assert_eq!(stability_score(&entries), 100.0);
    }

    #[test]
    fn test_stability_penalizes_swings() {
        // great(5) -> awful(1) -> great(5): mean abs diff 4, score 20
        let entries = normalize(vec![
            entry(1, 3, "great", vec![]),
            entry(2, 2, "awful", vec![]),
            entry(3, 1, "great", vec![]),
        ]);
        assert_eq!(stability_score(&entries), 20.0);
    }

    #[test]
    fn test_stability_single_pair() {
        let entries = normalize(vec![
            entry(1, 2, "great", vec![]),
            entry(2, 1, "awful", vec![]),
        ]);
        assert_eq!(stability_score(&entries), 20.0);

        let steady = normalize(vec![
            entry(1, 2, "good", vec![]),
            entry(2, 1, "good", vec![]),
        ]);
        assert_eq!(stability_score(&steady), 100.0);
    }

    #[test]
    fn test_stability_skips_unmapped_pairs() {
        let entries = normalize(vec![
            entry(1, 3, "good", vec![]),
            entry(2, 2, "ecstatic", vec![]),
            entry(3, 1, "good", vec![]),
        ]);
        // no adjacent pair has two scorable moods
        assert_eq!(stability_score(&entries), 100.0);
    }

    #[test]
    fn test_activity_patterns_top_five_with_stable_ties() {
        let mut first = entry(1, 2, "good", vec![]);
        first.emotions = vec![
            "calm".to_string(),
            "happy".to_string(),
            "calm".to_string(),
        ];
        first.sleep = vec!["rested".to_string()];
        first.productivity = vec![
            "focus".to_string(),
            "lists".to_string(),
            "gym".to_string(),
        ];

        let mut second = entry(2, 1, "good", vec![]);
        second.emotions = vec!["happy".to_string()];

        let patterns = activity_patterns(&normalize(vec![first, second]));
        let good = &patterns["good"];

        assert_eq!(good.len(), 5);
        assert_eq!(good[0].activity, "calm");
        assert_eq!(good[0].count, 2);
        assert_eq!(good[1].activity, "happy");
        assert_eq!(good[1].count, 2);
        // remaining singletons keep first-encountered order
        assert_eq!(good[2].activity, "rested");
        assert_eq!(good[3].activity, "focus");
        assert_eq!(good[4].activity, "lists");
    }

    #[test]
    fn test_day_of_week_averages_omit_empty_buckets() {
        // 2024-01-01 is a Monday, 2024-01-02 a Tuesday
        let entries = normalize(vec![
            entry(1, 2, "great", vec![]),
            entry(2, 1, "meh", vec![]),
        ]);

        let averages = day_of_week_averages(&entries);
        assert_eq!(averages.len(), 2);
        assert_eq!(averages.get("Monday"), Some(&3.0));
        assert_eq!(averages.get("Tuesday"), Some(&5.0));
        assert!(!averages.contains_key("Sunday"));
    }

    #[test]
    fn test_day_of_week_averages_skip_unmapped_moods() {
        let entries = normalize(vec![entry(1, 1, "ecstatic", vec![])]);
        assert!(day_of_week_averages(&entries).is_empty());
    }

    #[test]
    fn test_correlation_zero_variance_is_zero() {
        let entries = normalize(vec![
            entry(1, 3, "good", vec!["focus"]),
            entry(2, 2, "good", vec![]),
            entry(3, 1, "good", vec!["focus", "lists"]),
        ]);
        assert_eq!(productivity_correlation(&entries), 0.0);
    }

    #[test]
    fn test_correlation_fewer_than_two_pairs_is_zero() {
        assert_eq!(productivity_correlation(&[]), 0.0);

        let one = normalize(vec![entry(1, 1, "good", vec!["focus"])]);
        assert_eq!(productivity_correlation(&one), 0.0);

        // unmapped moods do not form valid pairs
        let unmapped = normalize(vec![
            entry(1, 2, "ecstatic", vec!["focus"]),
            entry(2, 1, "good", vec![]),
        ]);
        assert_eq!(productivity_correlation(&unmapped), 0.0);
    }

    #[test]
    fn test_correlation_perfectly_aligned_series() {
        let entries = normalize(vec![
            entry(1, 3, "great", vec!["a", "b", "c"]),
            entry(2, 2, "meh", vec!["a"]),
            entry(3, 1, "awful", vec![]),
        ]);
        // not exactly collinear (5,3)-(3,1)-(1,0), but strongly positive
        let r = productivity_correlation(&entries);
        assert!(r > 0.9 && r <= 1.0);
        // rounded to three decimals
        assert_eq!(r, (r * 1000.0).round() / 1000.0);
    }

    #[test]
    fn test_correlation_negative_series() {
        let entries = normalize(vec![
            entry(1, 3, "great", vec![]),
            entry(2, 2, "meh", vec!["a"]),
            entry(3, 1, "awful", vec!["a", "b"]),
        ]);
        assert_eq!(productivity_correlation(&entries), -1.0);
    }
}
