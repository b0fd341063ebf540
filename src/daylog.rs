use crate::models::HistoryEntry;
use serde::{Deserialize, Serialize};

/// Where the session stands with respect to the backend. Re-enters `Syncing`
/// on every explicit save and on the initial remote load; the only way out of
/// `Error` is the next user-initiated save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Idle,
    Syncing,
    Synced,
    Error,
}

/// Merge a freshly computed day summary into the history: replace the entry
/// with the same date key in place, otherwise append.
pub fn reconcile(history: &mut Vec<HistoryEntry>, entry: HistoryEntry) {
    match history.iter_mut().find(|existing| existing.date == entry.date) {
        Some(existing) => *existing = entry,
        None => history.push(entry),
    }
}

/// ISO date keys sort lexicographically, so this is chronological order.
pub fn sort_by_date(history: &mut [HistoryEntry]) {
    history.sort_by(|a, b| a.date.cmp(&b.date));
}

/// Mean score across the history. An empty history falls back to the current
/// unsaved score so the UI always has a comparison baseline.
pub fn average_frs(history: &[HistoryEntry], today_frs: f64) -> f64 {
    if history.is_empty() {
        return today_frs;
    }
    history.iter().map(|entry| entry.frs).sum::<f64>() / history.len() as f64
}
