use crate::airtable::{build_history, RecordFields};
use crate::daylog::{self, SyncStatus};
use crate::errors::AppError;
use crate::models::{
    DayRecord, HistoryEntry, PomodoroRequest, SaveResponse, StatsResponse, TodayResponse,
    ToggleRequest, TrackerData, WeightRequest,
};
use crate::score::{compute_score, round2};
use crate::state::AppState;
use crate::stats::build_stats;
use crate::storage::persist_data;
use axum::{extract::State, Json};
use chrono::Local;
use tracing::{error, info};

pub async fn get_today(State(state): State<AppState>) -> Result<Json<TodayResponse>, AppError> {
    let date = today_string();
    let status = state.sync.lock().await.status;
    let data = state.data.lock().await;
    Ok(Json(today_response(&state, &date, &data, status)))
}

pub async fn toggle_activity(
    State(state): State<AppState>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<TodayResponse>, AppError> {
    let id = payload.id.trim();
    if !state.config.taxonomy.contains(id) {
        return Err(AppError::bad_request(format!("unknown activity id '{id}'")));
    }

    let date = today_string();
    let status = state.sync.lock().await.status;
    let mut data = state.data.lock().await;
    let start_weight = state.config.start_weight;
    let entry = data
        .days
        .entry(date.clone())
        .or_insert_with(|| DayRecord::new(start_weight));
    if !entry.completed.remove(id) {
        entry.completed.insert(id.to_string());
    }

    persist_data(&state.data_path, &data).await?;
    Ok(Json(today_response(&state, &date, &data, status)))
}

pub async fn set_pomodoros(
    State(state): State<AppState>,
    Json(payload): Json<PomodoroRequest>,
) -> Result<Json<TodayResponse>, AppError> {
    let date = today_string();
    let status = state.sync.lock().await.status;
    let mut data = state.data.lock().await;
    let start_weight = state.config.start_weight;
    let entry = data
        .days
        .entry(date.clone())
        .or_insert_with(|| DayRecord::new(start_weight));
    entry.pomodoros = payload.count.min(state.config.taxonomy.count_cap);

    persist_data(&state.data_path, &data).await?;
    Ok(Json(today_response(&state, &date, &data, status)))
}

pub async fn set_weight(
    State(state): State<AppState>,
    Json(payload): Json<WeightRequest>,
) -> Result<Json<TodayResponse>, AppError> {
    if !payload.weight.is_finite() || payload.weight <= 0.0 {
        return Err(AppError::bad_request("weight must be a positive number"));
    }

    let date = today_string();
    let status = state.sync.lock().await.status;
    let mut data = state.data.lock().await;
    let start_weight = state.config.start_weight;
    let entry = data
        .days
        .entry(date.clone())
        .or_insert_with(|| DayRecord::new(start_weight));
    entry.weight = payload.weight;

    persist_data(&state.data_path, &data).await?;
    Ok(Json(today_response(&state, &date, &data, status)))
}

/// Explicit save: push today's record to the backend (create once, then
/// update by id), fold the result into the history, and write the data file.
/// A failed push leaves the history and record id untouched; the next save is
/// the only retry path.
pub async fn save_day(State(state): State<AppState>) -> Result<Json<SaveResponse>, AppError> {
    {
        let mut sync = state.sync.lock().await;
        if sync.saving {
            return Err(AppError::conflict("a save is already in flight"));
        }
        sync.saving = true;
        sync.status = SyncStatus::Syncing;
    }

    let result = push_today(&state).await;

    let mut sync = state.sync.lock().await;
    sync.saving = false;
    match result {
        Ok(response) => {
            sync.status = SyncStatus::Synced;
            Ok(Json(response))
        }
        Err(err) => {
            sync.status = SyncStatus::Error;
            error!("save failed: {}", err.message);
            Err(err)
        }
    }
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let data = state.data.lock().await;
    Ok(Json(build_stats(&state.config, &data)))
}

/// One-shot sync with the backend at startup: adopt today's record if one
/// exists and rebuild the history in date order. On failure the session keeps
/// its local state and shows `error` until the next explicit save.
pub async fn initial_load(state: &AppState) {
    let Some(remote) = state.remote.clone() else {
        return;
    };
    state.sync.lock().await.status = SyncStatus::Syncing;

    let date = today_string();
    match remote.fetch_records().await {
        Ok(records) => {
            let mut data = state.data.lock().await;
            if let Some(record) = records
                .iter()
                .find(|record| record.fields.date.as_deref() == Some(date.as_str()))
            {
                data.days.insert(
                    date.clone(),
                    record.day_record(&state.config.taxonomy, state.config.start_weight),
                );
            }
            data.history = build_history(&records);
            if let Err(err) = persist_data(&state.data_path, &data).await {
                error!("failed to persist synced data: {}", err.message);
            }
            drop(data);
            state.sync.lock().await.status = SyncStatus::Synced;
            info!("initial sync complete");
        }
        Err(err) => {
            error!("initial sync failed: {err}");
            state.sync.lock().await.status = SyncStatus::Error;
        }
    }
}

async fn push_today(state: &AppState) -> Result<SaveResponse, AppError> {
    let date = today_string();
    let record = {
        let mut data = state.data.lock().await;
        let start_weight = state.config.start_weight;
        data.days
            .entry(date.clone())
            .or_insert_with(|| DayRecord::new(start_weight))
            .clone()
    };
    let daily_frs = compute_score(&state.config.taxonomy, &record.completed, record.pomodoros);

    let mut record_id = record.record_id.clone();
    if let Some(remote) = &state.remote {
        let fields = RecordFields::for_day(&date, &record, round2(daily_frs))?;
        match record_id.as_deref() {
            Some(id) => remote.update(id, &fields).await?,
            None => record_id = Some(remote.create(&fields).await?),
        }
    }

    let mut data = state.data.lock().await;
    if let Some(entry) = data.days.get_mut(&date) {
        entry.record_id = record_id.clone();
    }
    daylog::reconcile(
        &mut data.history,
        HistoryEntry {
            date: date.clone(),
            frs: daily_frs,
            weight: record.weight,
            pomodoros: record.pomodoros,
        },
    );
    persist_data(&state.data_path, &data).await?;

    Ok(SaveResponse {
        history_len: data.history.len(),
        date,
        daily_frs,
        record_id,
    })
}

fn today_response(
    state: &AppState,
    date: &str,
    data: &TrackerData,
    status: SyncStatus,
) -> TodayResponse {
    let record = data
        .days
        .get(date)
        .cloned()
        .unwrap_or_else(|| DayRecord::new(state.config.start_weight));
    let daily_frs = compute_score(&state.config.taxonomy, &record.completed, record.pomodoros);

    TodayResponse {
        date: date.to_string(),
        completed: record.completed.into_iter().collect(),
        pomodoros: record.pomodoros,
        weight: record.weight,
        daily_frs,
        record_id: record.record_id,
        sync_status: status,
    }
}

fn today_string() -> String {
    Local::now().date_naive().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackerConfig;
    use axum::extract::State;
    use axum::http::StatusCode;
    use std::path::PathBuf;

    fn scratch_path(tag: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "frs_tracker_handlers_{tag}_{}_{}.json",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        path
    }

    fn local_state(tag: &str) -> AppState {
        AppState::new(
            TrackerConfig::default(),
            scratch_path(tag),
            TrackerData::default(),
            None,
        )
    }

    #[tokio::test]
    async fn save_is_rejected_while_one_is_in_flight() {
        let state = local_state("inflight");
        {
            let mut sync = state.sync.lock().await;
            sync.saving = true;
            sync.status = SyncStatus::Syncing;
        }

        let err = save_day(State(state.clone()))
            .await
            .expect_err("overlapping save must be rejected");
        assert_eq!(err.status, StatusCode::CONFLICT);

        let sync = state.sync.lock().await;
        assert!(sync.saving, "rejection must not clear the in-flight flag");
        assert_eq!(sync.status, SyncStatus::Syncing);
        drop(sync);
        assert!(state.data.lock().await.history.is_empty());
    }

    #[tokio::test]
    async fn save_clears_the_flag_and_reconciles_once() {
        let state = local_state("local_save");

        let first = save_day(State(state.clone())).await.unwrap();
        assert_eq!(first.0.history_len, 1);
        let second = save_day(State(state.clone())).await.unwrap();
        assert_eq!(second.0.history_len, 1);

        let sync = state.sync.lock().await;
        assert!(!sync.saving);
        assert_eq!(sync.status, SyncStatus::Synced);
        drop(sync);
        let _ = tokio::fs::remove_file(&state.data_path).await;
    }
}
