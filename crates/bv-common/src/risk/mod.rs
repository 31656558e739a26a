pub mod indicators;
pub mod patterns;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::scoring::classify::{risk_level, RiskLevel};
use crate::{run_id, SubjectKind};
use indicators::{standard_evaluators, IndicatorEvaluator, IndicatorId, SignalContext};
use patterns::{IndicatorWeights, PatternId, RiskPattern, STANDARD_PATTERNS};

#[derive(Debug, thiserror::Error)]
pub enum RiskError {
    #[error("risk assessment failed for {kind} {subject_id}: no indicator could be evaluated")]
    ComputationFailure { kind: SubjectKind, subject_id: i64 },
}

/// Review lifecycle of a persisted assessment. The engine only ever emits
/// `Completed`; the two reviewed states are set by a human reviewer through
/// a guarded update, never by recomputation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AssessmentStatus {
    Pending,
    Completed,
    ReviewedApproved,
    ReviewedFalsePositive,
}

impl AssessmentStatus {
    pub fn is_reviewed(self) -> bool {
        matches!(
            self,
            AssessmentStatus::ReviewedApproved | AssessmentStatus::ReviewedFalsePositive
        )
    }

    /// Transitions move strictly forward; reviewed states are terminal.
    pub fn can_transition_to(self, next: AssessmentStatus) -> bool {
        match (self, next) {
            (AssessmentStatus::Pending, AssessmentStatus::Completed) => true,
            (AssessmentStatus::Completed, n) if n.is_reviewed() => true,
            _ => false,
        }
    }
}

/// Reviewer verdict on a completed assessment.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReviewOutcome {
    Approved,
    FalsePositive,
}

impl ReviewOutcome {
    pub fn status(self) -> AssessmentStatus {
        match self {
            ReviewOutcome::Approved => AssessmentStatus::ReviewedApproved,
            ReviewOutcome::FalsePositive => AssessmentStatus::ReviewedFalsePositive,
        }
    }
}

/// One pattern's normalized outcome inside an assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternScore {
    pub pattern: PatternId,
    /// Weighted average over the indicators that could be evaluated.
    pub score: f64,
    pub triggered: bool,
    /// Indicators that produced a score, with their normalized values.
    pub evaluated: BTreeMap<IndicatorId, f64>,
    pub missing: Vec<IndicatorId>,
}

/// One immutable fraud/threat assessment for a subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub computation_id: String,
    pub subject_kind: SubjectKind,
    pub subject_id: i64,
    pub patterns: Vec<PatternScore>,
    /// Weighted average of all pattern scores, triggered or not, 0..=1.
    pub overall: f64,
    pub level: RiskLevel,
    /// Fraction of catalog indicators that could be evaluated, 0..=1.
    pub confidence: f64,
    pub requires_manual_review: bool,
    pub status: AssessmentStatus,
    pub computed_at: DateTime<Utc>,
    pub engine_version: String,
}

pub struct RiskEngine {
    evaluators: Vec<Box<dyn IndicatorEvaluator>>,
    patterns: &'static [RiskPattern],
}

impl RiskEngine {
    pub fn new(
        evaluators: Vec<Box<dyn IndicatorEvaluator>>,
        patterns: &'static [RiskPattern],
    ) -> Self {
        Self {
            evaluators,
            patterns,
        }
    }

    /// Built-in evaluator set over the standard pattern catalog.
    pub fn standard() -> Self {
        Self::new(standard_evaluators(), &STANDARD_PATTERNS)
    }

    /// Assesses one subject against every configured pattern.
    ///
    /// Indicator weights come from the caller's scoring context (login,
    /// transaction, ...); there is no default table. Missing signals shrink
    /// confidence; the only hard failure is a context where not a single
    /// indicator evaluates.
    pub fn assess(
        &self,
        kind: SubjectKind,
        subject_id: i64,
        context: &SignalContext,
        weights: &IndicatorWeights,
    ) -> Result<RiskAssessment, RiskError> {
        let mut signals: BTreeMap<IndicatorId, f64> = BTreeMap::new();
        let mut catalog_size = 0usize;
        for evaluator in &self.evaluators {
            catalog_size += 1;
            if let Some(score) = evaluator.evaluate(context) {
                signals.insert(evaluator.id(), score);
            }
        }

        let mut patterns: Vec<PatternScore> = Vec::with_capacity(self.patterns.len());
        let mut weighted_sum = 0.0;
        let mut weight_sum = 0.0;

        for pattern in self.patterns {
            let Some(score) = score_pattern(pattern, &signals, weights) else {
                debug!(pattern = %pattern.id, subject_id, "no evaluable indicator, pattern skipped");
                continue;
            };
            weighted_sum += score.score * pattern.weight;
            weight_sum += pattern.weight;
            patterns.push(score);
        }

        if patterns.is_empty() || weight_sum <= 0.0 {
            return Err(RiskError::ComputationFailure { kind, subject_id });
        }

        let overall = weighted_sum / weight_sum;
        let level = risk_level(overall);
        let confidence = signals.len() as f64 / catalog_size.max(1) as f64;

        Ok(RiskAssessment {
            computation_id: run_id::generate(),
            subject_kind: kind,
            subject_id,
            patterns,
            overall,
            level,
            confidence,
            requires_manual_review: level.requires_manual_review(),
            status: AssessmentStatus::Completed,
            computed_at: Utc::now(),
            engine_version: crate::scoring::ENGINE_VERSION.to_string(),
        })
    }
}

fn score_pattern(
    pattern: &RiskPattern,
    signals: &BTreeMap<IndicatorId, f64>,
    weights: &IndicatorWeights,
) -> Option<PatternScore> {
    let mut evaluated: BTreeMap<IndicatorId, f64> = BTreeMap::new();
    let mut missing: Vec<IndicatorId> = Vec::new();
    let mut weighted = 0.0;
    let mut weight_sum = 0.0;

    for &indicator in pattern.indicators {
        match signals.get(&indicator) {
            Some(&score) => {
                let weight = weights.weight(indicator);
                weighted += score * weight;
                weight_sum += weight;
                evaluated.insert(indicator, score);
            }
            None => missing.push(indicator),
        }
    }

    if evaluated.is_empty() || weight_sum <= 0.0 {
        return None;
    }

    let score = weighted / weight_sum;
    Some(PatternScore {
        pattern: pattern.id,
        score,
        triggered: score >= pattern.threshold,
        evaluated,
        missing,
    })
}
