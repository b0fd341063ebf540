use chrono::NaiveDate;
use std::env;

/// One checkable activity. `count_based` activities earn a fraction of their
/// tier weight from a counted quantity instead of a boolean checkmark.
#[derive(Debug, Clone)]
pub struct ActivityDefinition {
    pub id: String,
    pub name: String,
    pub count_based: bool,
}

#[derive(Debug, Clone)]
pub struct Tier {
    pub label: String,
    pub weight: f64,
    pub items: Vec<ActivityDefinition>,
}

/// Ordered priority tiers plus the normalizing target and hard cap for the
/// single count-based activity.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    pub tiers: Vec<Tier>,
    pub count_target: u32,
    pub count_cap: u32,
}

impl Taxonomy {
    pub fn contains(&self, id: &str) -> bool {
        self.tiers
            .iter()
            .any(|tier| tier.items.iter().any(|item| item.id == id))
    }

    pub fn total_weight(&self) -> f64 {
        self.tiers
            .iter()
            .map(|tier| tier.weight * tier.items.len() as f64)
            .sum()
    }
}

/// Immutable camp configuration, built once in main and shared by reference.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub taxonomy: Taxonomy,
    pub fight_date: NaiveDate,
    pub camp_start: NaiveDate,
    pub opponent_frs: f64,
    pub target_weight: f64,
    pub start_weight: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            taxonomy: default_taxonomy(),
            fight_date: NaiveDate::from_ymd_opt(2026, 2, 22).unwrap(),
            camp_start: NaiveDate::from_ymd_opt(2025, 11, 25).unwrap(),
            opponent_frs: 3.8,
            target_weight: 135.0,
            start_weight: 145.0,
        }
    }
}

pub const DEFAULT_API_URL: &str = "https://api.airtable.com/v0";

/// Remote record-store settings, read from the environment. `None` when the
/// base id or API key is missing; the app then runs local-only.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub api_url: String,
    pub base_id: String,
    pub table_name: String,
    pub api_key: String,
}

impl RemoteConfig {
    pub fn from_env() -> Option<Self> {
        let base_id = env::var("AIRTABLE_BASE_ID").ok()?;
        let api_key = env::var("AIRTABLE_API_KEY").ok()?;
        let table_name =
            env::var("AIRTABLE_TABLE_NAME").unwrap_or_else(|_| "Daily Logs".to_string());
        let api_url =
            env::var("AIRTABLE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Some(Self {
            api_url,
            base_id,
            table_name,
            api_key,
        })
    }
}

fn activity(id: &str, name: &str) -> ActivityDefinition {
    ActivityDefinition {
        id: id.to_string(),
        name: name.to_string(),
        count_based: false,
    }
}

fn counted(id: &str, name: &str) -> ActivityDefinition {
    ActivityDefinition {
        id: id.to_string(),
        name: name.to_string(),
        count_based: true,
    }
}

pub fn default_taxonomy() -> Taxonomy {
    Taxonomy {
        tiers: vec![
            Tier {
                label: "CORE PRIORITY".to_string(),
                weight: 3.0,
                items: vec![
                    activity("gym", "Gym Session"),
                    counted("mcat", "MCAT Study (Pomodoros)"),
                    activity("protein", "Make Protein Shake"),
                ],
            },
            Tier {
                label: "SECONDARY PRIORITY".to_string(),
                weight: 2.0,
                items: vec![
                    activity("yoga", "Yoga"),
                    activity("meditation", "Meditation"),
                    activity("bed", "Make Bed"),
                    activity("tea", "Make Tea"),
                    activity("candle", "Light Candle"),
                    activity("extinguish", "Extinguish All Flames"),
                    activity("reading", "Physical Reading"),
                    activity("writing", "Writing (Daughters/Dr. Larry)"),
                    activity("janeuary", "Jane-uary Prep"),
                    activity("french", "Pimsleur French in Bath"),
                ],
            },
            Tier {
                label: "TERTIARY PRIORITY".to_string(),
                weight: 1.0,
                items: vec![
                    activity("podcast", "Podcast Recording"),
                    activity("tiktok", "RavynReads TikTok Promo"),
                    activity("teeth", "Brush Teeth/Wash Face/Cologne"),
                    activity("hair", "Wash Hair"),
                    activity("body", "Wash Body"),
                    activity("dressed", "Get Dressed Intentionally"),
                    activity("bag", "Check Bag"),
                    activity("digital", "Digital Cleaning"),
                    activity("audible", "Audible on Commute"),
                    activity("work", "Settle in to Work"),
                    activity("commute", "Commute Home"),
                ],
            },
        ],
        count_target: 8,
        count_cap: 12,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn default_taxonomy_ids_are_unique() {
        let taxonomy = default_taxonomy();
        let mut seen = BTreeSet::new();
        for tier in &taxonomy.tiers {
            for item in &tier.items {
                assert!(seen.insert(item.id.clone()), "duplicate id {}", item.id);
            }
        }
    }

    #[test]
    fn default_taxonomy_has_one_count_based_activity() {
        let taxonomy = default_taxonomy();
        let counted: Vec<_> = taxonomy
            .tiers
            .iter()
            .flat_map(|tier| tier.items.iter())
            .filter(|item| item.count_based)
            .collect();
        assert_eq!(counted.len(), 1);
        assert_eq!(counted[0].id, "mcat");
    }

    #[test]
    fn default_taxonomy_total_weight() {
        let taxonomy = default_taxonomy();
        assert_eq!(taxonomy.total_weight(), 40.0);
        assert!(taxonomy.contains("gym"));
        assert!(!taxonomy.contains("nap"));
    }
}
