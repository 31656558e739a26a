use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::risk::indicators::SignalContext;
use crate::risk::patterns::{
    IndicatorWeights, LOGIN_SIGNAL_WEIGHTS, TRANSACTION_SIGNAL_WEIGHTS,
};
use crate::risk::{AssessmentStatus, PatternScore, ReviewOutcome, RiskAssessment};
use crate::scoring::classify::RiskLevel;
use crate::SubjectKind;

/// Which named weight table to score the signals under. The caller always
/// states the context; the engine has no default mapping.
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
pub enum WeightContext {
    Login,
    Transaction,
}

impl WeightContext {
    pub fn weights(self) -> &'static IndicatorWeights {
        match self {
            WeightContext::Login => &LOGIN_SIGNAL_WEIGHTS,
            WeightContext::Transaction => &TRANSACTION_SIGNAL_WEIGHTS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessRequest {
    pub weight_context: WeightContext,
    #[serde(default)]
    pub context: SignalContext,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessmentDto {
    /// Row id in the assessment store, used for the review transition.
    pub id: i64,
    pub computation_id: String,
    pub subject_kind: SubjectKind,
    pub subject_id: i64,
    pub overall: f64,
    pub level: RiskLevel,
    pub confidence: f64,
    pub requires_manual_review: bool,
    pub status: AssessmentStatus,
    pub patterns: Vec<PatternScore>,
    pub computed_at: DateTime<Utc>,
    pub engine_version: String,
}

impl RiskAssessmentDto {
    pub fn from_assessment(id: i64, assessment: RiskAssessment) -> Self {
        Self {
            id,
            computation_id: assessment.computation_id,
            subject_kind: assessment.subject_kind,
            subject_id: assessment.subject_id,
            overall: assessment.overall,
            level: assessment.level,
            confidence: assessment.confidence,
            requires_manual_review: assessment.requires_manual_review,
            status: assessment.status,
            patterns: assessment.patterns,
            computed_at: assessment.computed_at,
            engine_version: assessment.engine_version,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub outcome: ReviewOutcome,
}
