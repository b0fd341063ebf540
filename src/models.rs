use crate::config::Taxonomy;
use crate::daylog::SyncStatus;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayRecord {
    pub completed: BTreeSet<String>,
    pub pomodoros: u32,
    pub weight: f64,
    pub record_id: Option<String>,
}

impl DayRecord {
    pub fn new(weight: f64) -> Self {
        Self {
            completed: BTreeSet::new(),
            pomodoros: 0,
            weight,
            record_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: String,
    pub frs: f64,
    pub weight: f64,
    pub pomodoros: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TrackerData {
    pub days: BTreeMap<String, DayRecord>,
    pub history: Vec<HistoryEntry>,
}

/// Decode a JSON-encoded completed-activity set, dropping ids the taxonomy
/// does not know about. Older backend rows store an object of booleans
/// (`{"gym":true,"bed":false}`) instead of an id array; both forms are
/// readable, only the array form is written. Corrupt input degrades to an
/// empty set.
pub fn parse_completed(raw: &str, taxonomy: &Taxonomy) -> BTreeSet<String> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum CompletedForm {
        Ids(BTreeSet<String>),
        Flags(BTreeMap<String, bool>),
    }

    let ids: BTreeSet<String> = match serde_json::from_str(raw) {
        Ok(CompletedForm::Ids(ids)) => ids,
        Ok(CompletedForm::Flags(flags)) => flags
            .into_iter()
            .filter_map(|(id, done)| done.then_some(id))
            .collect(),
        Err(err) => {
            warn!("discarding malformed completed-activity set: {err}");
            return BTreeSet::new();
        }
    };
    ids.into_iter().filter(|id| taxonomy.contains(id)).collect()
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct PomodoroRequest {
    pub count: u32,
}

#[derive(Debug, Deserialize)]
pub struct WeightRequest {
    pub weight: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodayResponse {
    pub date: String,
    pub completed: Vec<String>,
    pub pomodoros: u32,
    pub weight: f64,
    pub daily_frs: f64,
    pub record_id: Option<String>,
    pub sync_status: SyncStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveResponse {
    pub date: String,
    pub daily_frs: f64,
    pub record_id: Option<String>,
    pub history_len: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WeightProgress {
    pub current: f64,
    pub start: f64,
    pub target: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub date: String,
    pub day_number: i64,
    pub days_remaining: i64,
    pub total_days: i64,
    pub daily_frs: f64,
    pub avg_frs: f64,
    pub opponent_frs: f64,
    pub win_probability: f64,
    pub weight: WeightProgress,
    pub history: Vec<HistoryEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_taxonomy;

    #[test]
    fn parse_completed_filters_unknown_ids() {
        let taxonomy = default_taxonomy();
        let set = parse_completed(r#"["gym","nap","protein"]"#, &taxonomy);
        assert_eq!(set.len(), 2);
        assert!(set.contains("gym"));
        assert!(set.contains("protein"));
    }

    #[test]
    fn parse_completed_accepts_object_of_flags() {
        let taxonomy = default_taxonomy();
        let set = parse_completed(r#"{"gym":true,"protein":true,"bed":false,"nap":true}"#, &taxonomy);
        assert_eq!(set.len(), 2);
        assert!(set.contains("gym"));
        assert!(set.contains("protein"));
        assert!(!set.contains("bed"));
    }

    #[test]
    fn parse_completed_recovers_from_corrupt_json() {
        let taxonomy = default_taxonomy();
        assert!(parse_completed("{not json", &taxonomy).is_empty());
    }
}
