use super::catalog::{Direction, MetricDefinition};

/// Maps one raw metric value onto the fixed sub-score scale.
///
/// Walks the tier ladder best-first and returns the first tier the value
/// reaches. Boundaries are inclusive: a value exactly on a threshold earns
/// that tier, not the one below. Values worse than every tier fall through
/// to the floor sub-score of 20.
pub fn normalize(value: f64, definition: &MetricDefinition) -> u8 {
    for (threshold, sub_score) in definition.tiers.ladder() {
        let reached = match definition.direction {
            Direction::HigherIsBetter => value >= threshold,
            Direction::LowerIsBetter => value <= threshold,
        };
        if reached {
            return sub_score;
        }
    }
    20
}
