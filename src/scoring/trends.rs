// Trend tracking — per-creator rolling score history and windowed queries.
//
// History lives for the process lifetime only. Each creator's history is
// capped at the 100 most recent entries (oldest evicted first) so the map
// can't grow without bound per creator.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use crate::models::{ContentType, QualityRating, ScoreDistribution, ScoreTrend, TrendReport};

const HISTORY_CAP: usize = 100;

#[derive(Debug, Clone)]
struct HistoryEntry {
    #[allow(dead_code)]
    content_id: String,
    score: f64,
    timestamp: DateTime<Utc>,
    #[allow(dead_code)]
    content_type: ContentType,
}

#[derive(Default)]
pub struct TrendTracker {
    history: Mutex<HashMap<String, Vec<HistoryEntry>>>,
}

impl TrendTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a scored result to the creator's history.
    pub fn record(
        &self,
        creator_id: &str,
        content_id: &str,
        score: f64,
        content_type: ContentType,
        timestamp: DateTime<Utc>,
    ) {
        let mut history = self.history.lock().expect("trend history lock poisoned");
        let entries = history.entry(creator_id.to_string()).or_default();
        entries.push(HistoryEntry {
            content_id: content_id.to_string(),
            score,
            timestamp,
            content_type,
        });
        if entries.len() > HISTORY_CAP {
            let excess = entries.len() - HISTORY_CAP;
            entries.drain(..excess);
        }
    }

    /// Windowed trend summary. `None` creator aggregates all tracked
    /// creators. Returns `None` when no entries fall inside the window —
    /// callers surface that as a distinct no-data response, not zeros.
    pub fn trends(&self, creator_id: Option<&str>, window_days: i64) -> Option<TrendReport> {
        self.trends_at(creator_id, window_days, Utc::now())
    }

    fn trends_at(
        &self,
        creator_id: Option<&str>,
        window_days: i64,
        now: DateTime<Utc>,
    ) -> Option<TrendReport> {
        let cutoff = now - Duration::days(window_days);
        let history = self.history.lock().expect("trend history lock poisoned");

        let mut entries: Vec<&HistoryEntry> = match creator_id {
            Some(id) => history.get(id).map(|v| v.iter().collect()).unwrap_or_default(),
            None => history.values().flatten().collect(),
        };
        entries.retain(|e| e.timestamp > cutoff);
        if entries.is_empty() {
            return None;
        }
        // Cross-creator aggregation interleaves histories; order the
        // window chronologically before the first/last comparison.
        entries.sort_by_key(|e| e.timestamp);

        let scores: Vec<f64> = entries.iter().map(|e| e.score).collect();
        let average = scores.iter().sum::<f64>() / scores.len() as f64;
        let highest = scores.iter().cloned().fold(f64::MIN, f64::max);
        let lowest = scores.iter().cloned().fold(f64::MAX, f64::min);

        let score_trend = if scores.len() > 1 && scores[scores.len() - 1] > scores[0] {
            ScoreTrend::Improving
        } else {
            ScoreTrend::Stable
        };

        let mut distribution = ScoreDistribution::default();
        for &score in &scores {
            match QualityRating::from_score(score) {
                QualityRating::Excellent => distribution.excellent += 1,
                QualityRating::Good => distribution.good += 1,
                QualityRating::Fair => distribution.fair += 1,
                QualityRating::Poor => distribution.poor += 1,
            }
        }

        Some(TrendReport {
            average_score: average,
            highest_score: highest,
            lowest_score: lowest,
            score_trend,
            total_content: scores.len(),
            score_distribution: distribution,
        })
    }

    pub fn creators_tracked(&self) -> usize {
        self.history.lock().expect("trend history lock poisoned").len()
    }

    pub fn total_entries(&self) -> usize {
        self.history
            .lock()
            .expect("trend history lock poisoned")
            .values()
            .map(|v| v.len())
            .sum()
    }
}
