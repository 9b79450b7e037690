//! Budget tracking over free-text activity costs.
//!
//! Costs are model-generated text. Only the first currency-prefixed number is
//! read; anything without one counts as zero, which can understate spend.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::Itinerary;

fn amount_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(?:₹|\brs\.?|\binr|\$|€|£)\s*([0-9][0-9,]*(?:\.[0-9]+)?)")
            .expect("amount pattern is valid")
    })
}

/// `"₹1,500 ($18)"` → 1500.0, `"N/A"` → 0.0.
pub fn extract_amount(cost: &str) -> f64 {
    amount_pattern()
        .captures(cost)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().replace(',', "").parse::<f64>().ok())
        .unwrap_or(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActivityKey {
    pub day: u32,
    pub index: usize,
}

/// Per-activity inclusion toggles. Everything is included until switched off.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetTracker {
    excluded: BTreeSet<ActivityKey>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetSummary {
    pub total: f64,
    pub included_activities: usize,
    pub max_budget: Option<f64>,
    pub remaining: Option<f64>,
    pub over_budget: bool,
}

impl BudgetTracker {
    pub fn from_excluded(excluded: impl IntoIterator<Item = ActivityKey>) -> Self {
        Self {
            excluded: excluded.into_iter().collect(),
        }
    }

    pub fn set_included(&mut self, key: ActivityKey, included: bool) {
        if included {
            self.excluded.remove(&key);
        } else {
            self.excluded.insert(key);
        }
    }

    pub fn is_included(&self, key: ActivityKey) -> bool {
        !self.excluded.contains(&key)
    }

    pub fn reset(&mut self) {
        self.excluded.clear();
    }

    pub fn summarize(&self, itinerary: &Itinerary, max_budget: Option<f64>) -> BudgetSummary {
        let mut total = 0.0;
        let mut included_activities = 0;

        for day in &itinerary.days {
            for (index, activity) in day.activities.iter().enumerate() {
                let key = ActivityKey {
                    day: day.day_number,
                    index,
                };
                if self.is_included(key) {
                    total += extract_amount(&activity.cost);
                    included_activities += 1;
                }
            }
        }

        let remaining = max_budget.map(|cap| cap - total);
        BudgetSummary {
            total,
            included_activities,
            max_budget,
            remaining,
            over_budget: remaining.is_some_and(|r| r < 0.0),
        }
    }
}
