//! Pairwise factor scores, each bounded to 0..=100 and symmetric in its two
//! arguments so a match reads the same from either side of the pair.

use std::collections::BTreeSet;

use crate::scoring::classify::{performance_band, risk_level};

fn normalize_tags(tags: &[String]) -> BTreeSet<String> {
    tags.iter()
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Set-overlap fit with partial credit: Jaccard similarity scaled to 0..=100.
/// `None` when either side declares nothing, which callers treat as
/// "factor unavailable" rather than a zero.
pub fn set_overlap_score(a: &[String], b: &[String]) -> Option<f64> {
    let a = normalize_tags(a);
    let b = normalize_tags(b);
    if a.is_empty() || b.is_empty() {
        return None;
    }

    let intersection = a.intersection(&b).count();
    let union = a.union(&b).count();
    Some(intersection as f64 / union as f64 * 100.0)
}

/// Exact categorical fit: 100 when the sets share any member, 0 otherwise.
pub fn membership_score(a: &[String], b: &[String]) -> Option<f64> {
    let a = normalize_tags(a);
    let b = normalize_tags(b);
    if a.is_empty() || b.is_empty() {
        return None;
    }

    if a.intersection(&b).next().is_some() {
        Some(100.0)
    } else {
        Some(0.0)
    }
}

/// Numeric-range fit: overlap length over union length, scaled to 0..=100.
/// Disjoint ranges score 0; identical point ranges score 100.
pub fn range_overlap_score(a_min: f64, a_max: f64, b_min: f64, b_max: f64) -> f64 {
    let overlap = a_max.min(b_max) - a_min.max(b_min);
    if overlap < 0.0 {
        return 0.0;
    }

    let union = a_max.max(b_max) - a_min.min(b_min);
    if union <= 0.0 {
        // both ranges collapse to the same point
        return 100.0;
    }

    (overlap / union * 100.0).clamp(0.0, 100.0)
}

/// Risk-appetite alignment on the 0..=1 risk scale. Both values go through
/// the risk classifier; the score falls off linearly with the number of
/// levels separating them.
pub fn risk_alignment_score(a: f64, b: f64) -> f64 {
    let gap = risk_level(a)
        .severity()
        .abs_diff(risk_level(b).severity());
    (1.0 - f64::from(gap) / 3.0) * 100.0
}

/// ESG alignment on the 0..=100 score scale, via the performance bands.
pub fn esg_alignment_score(a: f64, b: f64) -> f64 {
    let gap = performance_band(a.clamp(0.0, 100.0).round() as u8)
        .rank()
        .abs_diff(performance_band(b.clamp(0.0, 100.0).round() as u8).rank());
    (1.0 - f64::from(gap) / 4.0) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn set_overlap_gives_partial_credit() {
        let a = tags(&["Fintech", "AgTech", "Retail"]);
        let b = tags(&["fintech", "agtech"]);

        // 2 shared of 3 distinct
        let score = set_overlap_score(&a, &b).unwrap();
        assert!((score - 2.0 / 3.0 * 100.0).abs() < 1e-9);

        assert_eq!(set_overlap_score(&a, &tags(&["energy"])), Some(0.0));
        assert_eq!(set_overlap_score(&a, &[]), None);
    }

    #[test]
    fn membership_is_all_or_nothing() {
        let countries = tags(&["KE", "NG"]);
        assert_eq!(membership_score(&countries, &tags(&["ng"])), Some(100.0));
        assert_eq!(membership_score(&countries, &tags(&["ZA"])), Some(0.0));
        assert_eq!(membership_score(&[], &tags(&["ZA"])), None);
    }

    #[test]
    fn range_overlap_is_proportional() {
        // [0, 100] vs [50, 150]: overlap 50, union 150
        let score = range_overlap_score(0.0, 100.0, 50.0, 150.0);
        assert!((score - 50.0 / 150.0 * 100.0).abs() < 1e-9);

        assert_eq!(range_overlap_score(0.0, 10.0, 20.0, 30.0), 0.0);
        assert_eq!(range_overlap_score(5.0, 5.0, 5.0, 5.0), 100.0);
        assert_eq!(range_overlap_score(0.0, 50.0, 0.0, 50.0), 100.0);
    }

    #[test]
    fn alignment_scores_fall_off_with_classifier_distance() {
        assert_eq!(risk_alignment_score(0.1, 0.2), 100.0);
        assert!(risk_alignment_score(0.1, 0.5) < 100.0);
        assert_eq!(risk_alignment_score(0.0, 0.9), 0.0);

        assert_eq!(esg_alignment_score(90.0, 86.0), 100.0);
        assert!(esg_alignment_score(90.0, 60.0) < esg_alignment_score(90.0, 75.0));
        assert_eq!(esg_alignment_score(95.0, 10.0), 0.0);
    }

    #[test]
    fn every_factor_is_symmetric() {
        let a = tags(&["fintech", "retail"]);
        let b = tags(&["retail", "health"]);
        assert_eq!(set_overlap_score(&a, &b), set_overlap_score(&b, &a));
        assert_eq!(membership_score(&a, &b), membership_score(&b, &a));

        assert_eq!(
            range_overlap_score(10.0, 80.0, 40.0, 200.0),
            range_overlap_score(40.0, 200.0, 10.0, 80.0)
        );
        assert_eq!(risk_alignment_score(0.2, 0.7), risk_alignment_score(0.7, 0.2));
        assert_eq!(esg_alignment_score(30.0, 88.0), esg_alignment_score(88.0, 30.0));
    }

    #[test]
    fn scores_stay_bounded() {
        for (a, b) in [(0.0, 1.0), (0.5, 0.5), (1.0, 0.0)] {
            let score = risk_alignment_score(a, b);
            assert!((0.0..=100.0).contains(&score));
        }
        let score = range_overlap_score(-5.0, 5.0, -1.0, 1.0);
        assert!((0.0..=100.0).contains(&score));
    }
}
