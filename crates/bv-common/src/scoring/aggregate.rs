use serde::{Deserialize, Serialize};

use super::catalog::{Category, MetricCatalog, MetricKey};
use super::extract::metric_value;
use super::normalize::normalize;
use crate::BusinessRecord;

/// One metric's part in a category score, kept for explainability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricContribution {
    pub metric: MetricKey,
    /// Raw derived value the tier walk saw.
    pub value: f64,
    pub sub_score: u8,
    /// Weight actually applied, after renormalization over available metrics.
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: Category,
    pub score: u8,
    /// False when any catalog metric for this category was unavailable.
    pub complete: bool,
    pub contributions: Vec<MetricContribution>,
    pub missing: Vec<MetricKey>,
}

/// Weighted-sums the category's available metric sub-scores.
///
/// Unavailable metrics are excluded and the remaining weights renormalized,
/// so partial data still yields a valid 0..=100 score; the `complete` flag
/// records the gap for the confidence computation. Returns `None` only when
/// no metric in the category could be derived at all.
pub fn aggregate_category(
    catalog: &MetricCatalog,
    category: Category,
    record: &BusinessRecord,
) -> Option<CategoryScore> {
    let mut available: Vec<(MetricKey, f64, u8, f64)> = Vec::new();
    let mut missing: Vec<MetricKey> = Vec::new();

    for definition in catalog.metrics_in(category) {
        match metric_value(record, definition.key) {
            Some(value) => {
                let sub_score = normalize(value, definition);
                available.push((definition.key, value, sub_score, definition.weight));
            }
            None => missing.push(definition.key),
        }
    }

    if available.is_empty() {
        return None;
    }

    let weight_sum: f64 = available.iter().map(|(_, _, _, w)| w).sum();
    let contributions: Vec<MetricContribution> = available
        .into_iter()
        .map(|(metric, value, sub_score, weight)| MetricContribution {
            metric,
            value,
            sub_score,
            weight: weight / weight_sum,
        })
        .collect();

    let weighted: f64 = contributions
        .iter()
        .map(|c| f64::from(c.sub_score) * c.weight)
        .sum();

    Some(CategoryScore {
        category,
        score: weighted.round() as u8,
        complete: missing.is_empty(),
        contributions,
        missing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_financial_record() -> BusinessRecord {
        BusinessRecord {
            monthly_revenue: Some(130_000.0),
            previous_monthly_revenue: Some(100_000.0),
            monthly_expenses: Some(91_000.0),
            cash_balance: Some(400_000.0),
            outstanding_debt: Some(50_000.0),
            total_assets: Some(500_000.0),
            ..BusinessRecord::default()
        }
    }

    #[test]
    fn complete_category_uses_catalog_weights() {
        let catalog = MetricCatalog::standard();
        let score = aggregate_category(&catalog, Category::Financial, &full_financial_record())
            .expect("financial metrics available");

        // growth 0.30 -> 80, margin 0.30 -> 100, debt 0.10 -> 100,
        // runway 4.4 months -> 80
        assert!(score.complete);
        assert!(score.missing.is_empty());
        assert_eq!(score.contributions.len(), 4);
        assert_eq!(score.score, 90);
    }

    #[test]
    fn partial_category_renormalizes_weights() {
        let catalog = MetricCatalog::standard();
        let record = BusinessRecord {
            monthly_revenue: Some(131_000.0),
            previous_monthly_revenue: Some(100_000.0),
            monthly_expenses: Some(91_700.0),
            ..BusinessRecord::default()
        };

        let score = aggregate_category(&catalog, Category::Financial, &record)
            .expect("two financial metrics available");

        // growth 0.31 -> 80 at weight .35, margin 0.30 -> 100 at weight .30;
        // renormalized: 80 * 35/65 + 100 * 30/65 = 89.23 -> 89
        assert!(!score.complete);
        assert_eq!(score.score, 89);
        assert_eq!(score.missing.len(), 2);

        let applied: f64 = score.contributions.iter().map(|c| c.weight).sum();
        assert!((applied - 1.0).abs() < 1e-9);
    }

    #[test]
    fn single_metric_category_scores_that_metric() {
        let catalog = MetricCatalog::standard();
        let record = BusinessRecord {
            active_customers: Some(100.0),
            ..BusinessRecord::default()
        };

        // only churn derivable (defaults to zero churn) -> sub-score 100
        let score = aggregate_category(&catalog, Category::Operational, &record).unwrap();
        assert_eq!(score.score, 100);
        assert!(!score.complete);
        assert_eq!(score.contributions[0].weight, 1.0);
    }

    #[test]
    fn empty_category_is_uncomputable() {
        let catalog = MetricCatalog::standard();
        let record = BusinessRecord::default();
        assert!(aggregate_category(&catalog, Category::Market, &record).is_none());
    }

    #[test]
    fn score_stays_within_bounds() {
        let catalog = MetricCatalog::standard();
        let record = BusinessRecord {
            monthly_revenue: Some(10_000.0),
            previous_monthly_revenue: Some(50_000.0),
            monthly_expenses: Some(60_000.0),
            outstanding_debt: Some(900_000.0),
            total_assets: Some(100_000.0),
            cash_balance: Some(0.0),
            ..BusinessRecord::default()
        };

        let score = aggregate_category(&catalog, Category::Financial, &record).unwrap();
        assert_eq!(score.score, 20);
    }
}
