use crate::config::TrackerConfig;
use crate::daylog::average_frs;
use crate::models::{StatsResponse, TrackerData, WeightProgress};
use crate::score::compute_score;
use chrono::{Local, NaiveDate};
use std::collections::BTreeSet;

pub fn build_stats(config: &TrackerConfig, data: &TrackerData) -> StatsResponse {
    build_stats_at(Local::now().date_naive(), config, data)
}

pub fn build_stats_at(today: NaiveDate, config: &TrackerConfig, data: &TrackerData) -> StatsResponse {
    let date = today.format("%Y-%m-%d").to_string();

    let empty = BTreeSet::new();
    let (completed, pomodoros, weight) = match data.days.get(&date) {
        Some(record) => (&record.completed, record.pomodoros, record.weight),
        None => (&empty, 0, config.start_weight),
    };

    let daily_frs = compute_score(&config.taxonomy, completed, pomodoros);
    let avg_frs = average_frs(&data.history, daily_frs);

    let days_remaining = (config.fight_date - today).num_days();
    let total_days = (config.fight_date - config.camp_start).num_days();
    let day_number = total_days - days_remaining + 1;

    let win_probability =
        ((avg_frs - config.opponent_frs + 2.5) / 5.0 * 100.0).clamp(5.0, 95.0);

    StatsResponse {
        date,
        day_number,
        days_remaining,
        total_days,
        daily_frs,
        avg_frs,
        opponent_frs: config.opponent_frs,
        win_probability,
        weight: WeightProgress {
            current: weight,
            start: config.start_weight,
            target: config.target_weight,
        },
        history: data.history.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DayRecord, HistoryEntry};

    fn day(year: i32, month: u32, dom: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, dom).unwrap()
    }

    #[test]
    fn countdown_on_camp_start() {
        let config = TrackerConfig::default();
        let stats = build_stats_at(day(2025, 11, 25), &config, &TrackerData::default());
        assert_eq!(stats.total_days, 89);
        assert_eq!(stats.days_remaining, 89);
        assert_eq!(stats.day_number, 1);
    }

    #[test]
    fn countdown_on_fight_day() {
        let config = TrackerConfig::default();
        let stats = build_stats_at(day(2026, 2, 22), &config, &TrackerData::default());
        assert_eq!(stats.days_remaining, 0);
        assert_eq!(stats.day_number, 90);
    }

    #[test]
    fn empty_day_scores_zero_and_uses_start_weight() {
        let config = TrackerConfig::default();
        let stats = build_stats_at(day(2025, 12, 1), &config, &TrackerData::default());
        assert_eq!(stats.daily_frs, 0.0);
        assert_eq!(stats.avg_frs, 0.0);
        assert_eq!(stats.weight.current, config.start_weight);
        assert_eq!(stats.win_probability, 5.0);
    }

    #[test]
    fn average_prefers_history_over_today() {
        let config = TrackerConfig::default();
        let mut data = TrackerData::default();
        let mut record = DayRecord::new(144.0);
        record.completed.insert("gym".to_string());
        data.days.insert("2025-12-01".to_string(), record);
        data.history.push(HistoryEntry {
            date: "2025-11-30".to_string(),
            frs: 4.0,
            weight: 144.5,
            pomodoros: 8,
        });

        let stats = build_stats_at(day(2025, 12, 1), &config, &data);
        assert!(stats.daily_frs > 0.0);
        assert_eq!(stats.avg_frs, 4.0);
    }

    #[test]
    fn win_probability_is_clamped() {
        let config = TrackerConfig::default();
        let mut data = TrackerData::default();
        data.history.push(HistoryEntry {
            date: "2025-11-30".to_string(),
            frs: 5.0,
            weight: 140.0,
            pomodoros: 12,
        });
        let stats = build_stats_at(day(2025, 12, 1), &config, &data);
        // (5.0 - 3.8 + 2.5) / 5 * 100 = 74, inside the clamp band.
        assert!((stats.win_probability - 74.0).abs() < 1e-9);
    }
}
