use super::aggregate::CategoryScore;
use super::catalog::MetricCatalog;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeScore {
    pub overall: u8,
    /// Weight share of fully-computed categories, 0..=1.
    pub confidence: f64,
}

/// Folds category scores into the overall 0..=100 score.
///
/// Weights are renormalized over the categories that produced a score, so a
/// subject missing a whole category is still comparable. Confidence counts
/// only categories whose every metric was available; a category that was
/// renormalized internally still contributes to the overall score but not to
/// confidence. Returns `None` when no category could be computed; the
/// caller turns that into a hard failure instead of fabricating a score.
pub fn composite(catalog: &MetricCatalog, scores: &[CategoryScore]) -> Option<CompositeScore> {
    if scores.is_empty() {
        return None;
    }

    let total_weight: f64 = catalog.category_weights.iter().map(|(_, w)| w).sum();
    let available_weight: f64 = scores
        .iter()
        .map(|s| catalog.category_weight(s.category))
        .sum();
    if available_weight <= 0.0 || total_weight <= 0.0 {
        return None;
    }

    let weighted: f64 = scores
        .iter()
        .map(|s| f64::from(s.score) * catalog.category_weight(s.category))
        .sum();
    let complete_weight: f64 = scores
        .iter()
        .filter(|s| s.complete)
        .map(|s| catalog.category_weight(s.category))
        .sum();

    Some(CompositeScore {
        overall: (weighted / available_weight).round() as u8,
        confidence: complete_weight / total_weight,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::catalog::{Category, STANDARD_METRICS};

    const EQUAL_WEIGHTS: [(Category, f64); 6] = [
        (Category::Financial, 1.0 / 6.0),
        (Category::Operational, 1.0 / 6.0),
        (Category::Market, 1.0 / 6.0),
        (Category::Innovation, 1.0 / 6.0),
        (Category::Esg, 1.0 / 6.0),
        (Category::Risk, 1.0 / 6.0),
    ];

    fn equal_weight_catalog() -> MetricCatalog {
        MetricCatalog {
            version: "equal",
            metrics: &STANDARD_METRICS,
            category_weights: &EQUAL_WEIGHTS,
        }
    }

    fn complete(category: Category, score: u8) -> CategoryScore {
        CategoryScore {
            category,
            score,
            complete: true,
            contributions: vec![],
            missing: vec![],
        }
    }

    #[test]
    fn one_missing_category_out_of_six_gives_five_sixths_confidence() {
        let catalog = equal_weight_catalog();
        let scores = [
            complete(Category::Operational, 80),
            complete(Category::Market, 80),
            complete(Category::Innovation, 80),
            complete(Category::Esg, 80),
            complete(Category::Risk, 80),
        ];

        let result = composite(&catalog, &scores).unwrap();
        assert_eq!(result.overall, 80);
        assert!((result.confidence - 5.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn standard_weights_produce_expected_overall() {
        let catalog = MetricCatalog::standard();
        let scores = [
            complete(Category::Financial, 90),
            complete(Category::Operational, 100),
            complete(Category::Market, 60),
            complete(Category::Innovation, 40),
            complete(Category::Esg, 80),
            complete(Category::Risk, 70),
        ];

        let result = composite(&catalog, &scores).unwrap();
        assert_eq!(result.overall, 79);
        assert!((result.confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn incomplete_categories_score_but_do_not_count_as_confident() {
        let catalog = equal_weight_catalog();
        let mut partial = complete(Category::Financial, 60);
        partial.complete = false;
        let scores = [partial, complete(Category::Esg, 90)];

        let result = composite(&catalog, &scores).unwrap();
        assert_eq!(result.overall, 75);
        assert!((result.confidence - 1.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn no_computable_category_yields_none() {
        let catalog = MetricCatalog::standard();
        assert!(composite(&catalog, &[]).is_none());
    }

    #[test]
    fn overall_stays_in_bounds_for_extreme_scores() {
        let catalog = MetricCatalog::standard();
        let low: Vec<CategoryScore> = catalog
            .category_weights
            .iter()
            .map(|(c, _)| complete(*c, 0))
            .collect();
        let high: Vec<CategoryScore> = catalog
            .category_weights
            .iter()
            .map(|(c, _)| complete(*c, 100))
            .collect();

        assert_eq!(composite(&catalog, &low).unwrap().overall, 0);
        assert_eq!(composite(&catalog, &high).unwrap().overall, 100);
    }
}
