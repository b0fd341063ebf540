use crate::config::{RemoteConfig, Taxonomy};
use crate::daylog;
use crate::errors::SyncError;
use crate::models::{parse_completed, DayRecord, HistoryEntry};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Thin client for the record-store REST interface: list all rows in one
/// table, create a row, update a row by id. Bearer-token auth on every call.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    client: Client,
    base_url: String,
    api_key: String,
}

/// The field set written on every save. Names match the backend columns.
#[derive(Debug, Serialize)]
pub struct RecordFields {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Weight")]
    pub weight: f64,
    #[serde(rename = "Pomodoros")]
    pub pomodoros: u32,
    #[serde(rename = "CompletedActivities")]
    pub completed: String,
    #[serde(rename = "DailyFRS")]
    pub daily_frs: f64,
}

impl RecordFields {
    pub fn for_day(date: &str, record: &DayRecord, daily_frs: f64) -> Result<Self, SyncError> {
        Ok(Self {
            date: date.to_string(),
            weight: record.weight,
            pomodoros: record.pomodoros,
            completed: serde_json::to_string(&record.completed)?,
            daily_frs,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RemoteFields {
    #[serde(rename = "Date", default)]
    pub date: Option<String>,
    #[serde(rename = "Weight", default)]
    pub weight: Option<f64>,
    #[serde(rename = "Pomodoros", default)]
    pub pomodoros: Option<u32>,
    #[serde(rename = "CompletedActivities", default)]
    pub completed: Option<String>,
    #[serde(rename = "DailyFRS", default)]
    pub daily_frs: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct RemoteRecord {
    pub id: String,
    #[serde(default)]
    pub fields: RemoteFields,
}

impl RemoteRecord {
    /// Rebuild a local day record from backend fields. A malformed completed
    /// set degrades to empty rather than failing the load.
    pub fn day_record(&self, taxonomy: &Taxonomy, default_weight: f64) -> DayRecord {
        DayRecord {
            completed: self
                .fields
                .completed
                .as_deref()
                .map(|raw| parse_completed(raw, taxonomy))
                .unwrap_or_default(),
            pomodoros: self.fields.pomodoros.unwrap_or(0),
            weight: self.fields.weight.unwrap_or(default_weight),
            record_id: Some(self.id.clone()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RecordsResponse {
    #[serde(default)]
    records: Vec<RemoteRecord>,
}

#[derive(Debug, Deserialize)]
struct CreateResponse {
    id: String,
}

#[derive(Debug, Serialize)]
struct RecordBody<'a> {
    fields: &'a RecordFields,
}

impl RemoteStore {
    pub fn new(config: &RemoteConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: format!(
                "{}/{}/{}",
                config.api_url.trim_end_matches('/'),
                config.base_id,
                config.table_name
            ),
            api_key: config.api_key.clone(),
        }
    }

    pub async fn fetch_records(&self) -> Result<Vec<RemoteRecord>, SyncError> {
        let response: RecordsResponse = self.send(self.client.get(&self.base_url)).await?;
        Ok(response.records)
    }

    pub async fn create(&self, fields: &RecordFields) -> Result<String, SyncError> {
        let response: CreateResponse = self
            .send(self.client.post(&self.base_url).json(&RecordBody { fields }))
            .await?;
        Ok(response.id)
    }

    pub async fn update(&self, record_id: &str, fields: &RecordFields) -> Result<(), SyncError> {
        let url = format!("{}/{record_id}", self.base_url);
        let _: serde_json::Value = self
            .send(self.client.patch(&url).json(&RecordBody { fields }))
            .await?;
        Ok(())
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, SyncError> {
        let response = request.bearer_auth(&self.api_key).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Backend {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        response.json().await.map_err(|err| SyncError::Backend {
            status: status.as_u16(),
            message: format!("undecodable response: {err}"),
        })
    }
}

/// Build the chronological history from a full record listing, skipping rows
/// without a date or score.
pub fn build_history(records: &[RemoteRecord]) -> Vec<HistoryEntry> {
    let mut history: Vec<HistoryEntry> = records
        .iter()
        .filter_map(|record| {
            let date = record.fields.date.clone()?;
            let frs = record.fields.daily_frs?;
            Some(HistoryEntry {
                date,
                frs,
                weight: record.fields.weight.unwrap_or(0.0),
                pomodoros: record.fields.pomodoros.unwrap_or(0),
            })
        })
        .collect();
    daylog::sort_by_date(&mut history);
    history
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_taxonomy;
    use crate::models::DayRecord;

    fn remote_record(id: &str, date: Option<&str>, frs: Option<f64>) -> RemoteRecord {
        RemoteRecord {
            id: id.to_string(),
            fields: RemoteFields {
                date: date.map(str::to_string),
                weight: Some(143.5),
                pomodoros: Some(6),
                completed: Some(r#"["gym","bogus"]"#.to_string()),
                daily_frs: frs,
            },
        }
    }

    #[test]
    fn record_fields_use_backend_column_names() {
        let mut record = DayRecord::new(145.0);
        record.completed.insert("gym".to_string());
        record.pomodoros = 4;
        let fields = RecordFields::for_day("2025-11-25", &record, 4.17).unwrap();
        let value = serde_json::to_value(&fields).unwrap();
        assert_eq!(value["Date"], "2025-11-25");
        assert_eq!(value["Weight"], 145.0);
        assert_eq!(value["Pomodoros"], 4);
        assert_eq!(value["CompletedActivities"], r#"["gym"]"#);
        assert_eq!(value["DailyFRS"], 4.17);
    }

    #[test]
    fn build_history_skips_incomplete_rows_and_sorts() {
        let records = vec![
            remote_record("rec3", Some("2025-11-27"), Some(3.0)),
            remote_record("rec1", Some("2025-11-25"), Some(2.5)),
            remote_record("rec2", None, Some(4.0)),
            remote_record("rec4", Some("2025-11-26"), None),
        ];
        let history = build_history(&records);
        let dates: Vec<_> = history.iter().map(|e| e.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-11-25", "2025-11-27"]);
    }

    #[test]
    fn day_record_adoption_filters_unknown_activities() {
        let taxonomy = default_taxonomy();
        let record = remote_record("rec1", Some("2025-11-25"), Some(2.5));
        let day = record.day_record(&taxonomy, 145.0);
        assert_eq!(day.record_id.as_deref(), Some("rec1"));
        assert_eq!(day.weight, 143.5);
        assert_eq!(day.pomodoros, 6);
        assert!(day.completed.contains("gym"));
        assert!(!day.completed.contains("bogus"));
    }
}
