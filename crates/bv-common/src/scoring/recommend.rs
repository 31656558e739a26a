use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::aggregate::CategoryScore;
use super::catalog::{Category, MetricCatalog};

/// Output stays actionable: at most this many items, worst problems first.
pub const MAX_RECOMMENDATIONS: usize = 8;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: Category,
    pub priority: Priority,
    pub score: u8,
    /// Category weight times shortfall below the attention cutoff; used as
    /// the secondary sort key so heavier categories surface first.
    pub expected_impact: f64,
    pub action: String,
}

fn priority_for(score: u8) -> Priority {
    if score < 50 {
        Priority::Critical
    } else if score < 70 {
        Priority::High
    } else {
        Priority::Medium
    }
}

fn action_for(category: Category) -> &'static str {
    match category {
        Category::Financial => {
            "Rebuild financial headroom: review expenses, debt service and pricing against revenue"
        }
        Category::Operational => {
            "Stabilize operations: reduce customer churn and lift delivery reliability"
        }
        Category::Market => {
            "Strengthen market position: improve retention economics and acquisition efficiency"
        }
        Category::Innovation => {
            "Invest in renewal: allocate budget to R&D and digital sales channels"
        }
        Category::Esg => {
            "Close ESG gaps: cut emissions intensity and formalize governance audits"
        }
        Category::Risk => {
            "Reduce risk exposure: lower credit utilization and clear compliance findings"
        }
    }
}

/// Derives prioritized improvement actions from categories scoring below the
/// attention cutoff. One recommendation per category, sorted by priority and
/// then by expected impact, capped at [`MAX_RECOMMENDATIONS`].
pub fn recommend(
    catalog: &MetricCatalog,
    scores: &[CategoryScore],
    attention_cutoff: f64,
) -> Vec<Recommendation> {
    let mut seen: BTreeSet<Category> = BTreeSet::new();
    let mut items: Vec<Recommendation> = Vec::new();

    for score in scores {
        if f64::from(score.score) >= attention_cutoff || !seen.insert(score.category) {
            continue;
        }
        let shortfall = attention_cutoff - f64::from(score.score);
        items.push(Recommendation {
            category: score.category,
            priority: priority_for(score.score),
            score: score.score,
            expected_impact: catalog.category_weight(score.category) * shortfall,
            action: action_for(score.category).to_string(),
        });
    }

    items.sort_by(|a, b| match a.priority.cmp(&b.priority) {
        Ordering::Equal => b
            .expected_impact
            .partial_cmp(&a.expected_impact)
            .unwrap_or(Ordering::Equal),
        other => other,
    });
    items.truncate(MAX_RECOMMENDATIONS);
    items
}
