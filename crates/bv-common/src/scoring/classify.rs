use serde::{Deserialize, Serialize};

/// One rung of a classification table: scores at or above `threshold` earn
/// `label`, unless a higher rung already claimed them.
#[derive(Debug, Clone, Copy)]
pub struct Cutoff<L> {
    pub threshold: f64,
    pub label: L,
}

const fn cutoff<L>(threshold: f64, label: L) -> Cutoff<L> {
    Cutoff { threshold, label }
}

/// The one tiering routine behind every label in the system.
///
/// `cutoffs` are ordered best/worst-first depending on the scale; the first
/// rung whose threshold the score reaches (inclusive) wins, and anything
/// below every rung gets the final label. `None` only for an empty table.
/// Performance bands and risk levels both route through here so boundary
/// semantics cannot drift between them.
pub fn classify<L: Copy>(score: f64, cutoffs: &[Cutoff<L>]) -> Option<L> {
    let (lowest, upper) = cutoffs.split_last()?;
    let label = upper
        .iter()
        .find(|c| score >= c.threshold)
        .map(|c| c.label)
        .unwrap_or(lowest.label);
    Some(label)
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PerformanceBand {
    Excellent,
    Good,
    Fair,
    BelowAverage,
    Poor,
}

impl PerformanceBand {
    /// Distance from the top band; larger is worse.
    pub fn rank(self) -> u8 {
        match self {
            PerformanceBand::Excellent => 0,
            PerformanceBand::Good => 1,
            PerformanceBand::Fair => 2,
            PerformanceBand::BelowAverage => 3,
            PerformanceBand::Poor => 4,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn severity(self) -> u8 {
        match self {
            RiskLevel::Low => 0,
            RiskLevel::Medium => 1,
            RiskLevel::High => 2,
            RiskLevel::Critical => 3,
        }
    }

    /// High and critical assessments go to a human before any action.
    pub fn requires_manual_review(self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::Critical)
    }
}

/// Bands for composite scores on the 0..=100 scale.
pub const PERFORMANCE_CUTOFFS: [Cutoff<PerformanceBand>; 5] = [
    cutoff(85.0, PerformanceBand::Excellent),
    cutoff(70.0, PerformanceBand::Good),
    cutoff(55.0, PerformanceBand::Fair),
    cutoff(40.0, PerformanceBand::BelowAverage),
    cutoff(0.0, PerformanceBand::Poor),
];

/// Levels for risk scores on the 0..=1 scale.
pub const RISK_CUTOFFS: [Cutoff<RiskLevel>; 4] = [
    cutoff(0.85, RiskLevel::Critical),
    cutoff(0.65, RiskLevel::High),
    cutoff(0.4, RiskLevel::Medium),
    cutoff(0.0, RiskLevel::Low),
];

pub fn performance_band(score: u8) -> PerformanceBand {
    classify(f64::from(score), &PERFORMANCE_CUTOFFS).unwrap_or(PerformanceBand::Poor)
}

pub fn risk_level(score: f64) -> RiskLevel {
    classify(score, &RISK_CUTOFFS).unwrap_or(RiskLevel::Low)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_scores_earn_the_higher_label() {
        assert_eq!(performance_band(85), PerformanceBand::Excellent);
        assert_eq!(performance_band(84), PerformanceBand::Good);
        assert_eq!(performance_band(70), PerformanceBand::Good);
        assert_eq!(risk_level(0.65), RiskLevel::High);
        assert_eq!(risk_level(0.649), RiskLevel::Medium);
    }

    #[test]
    fn scores_below_every_rung_get_the_lowest_label() {
        assert_eq!(performance_band(0), PerformanceBand::Poor);
        assert_eq!(risk_level(0.0), RiskLevel::Low);
    }

    #[test]
    fn classification_is_monotone_in_score() {
        let mut previous = performance_band(0).rank();
        for score in 0..=100u8 {
            let rank = performance_band(score).rank();
            assert!(rank <= previous, "band worsened as score rose at {score}");
            previous = rank;
        }

        let mut last_severity = risk_level(0.0).severity();
        for step in 0..=100 {
            let severity = risk_level(f64::from(step) / 100.0).severity();
            assert!(severity >= last_severity);
            last_severity = severity;
        }
    }

    #[test]
    fn manual_review_starts_at_high() {
        assert!(!RiskLevel::Low.requires_manual_review());
        assert!(!RiskLevel::Medium.requires_manual_review());
        assert!(RiskLevel::High.requires_manual_review());
        assert!(RiskLevel::Critical.requires_manual_review());
    }

    #[test]
    fn empty_table_classifies_nothing() {
        let empty: [Cutoff<PerformanceBand>; 0] = [];
        assert!(classify(50.0, &empty).is_none());
    }
}
