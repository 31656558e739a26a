use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::StoredScoreProfile;
use crate::scoring::aggregate::CategoryScore;
use crate::scoring::catalog::Category;
use crate::scoring::classify::PerformanceBand;
use crate::scoring::history::{Trend, TrendReport};
use crate::scoring::recommend::Recommendation;
use crate::SubjectKind;

/// One persisted score profile version, as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreProfileDto {
    pub subject_kind: SubjectKind,
    pub subject_id: i64,
    /// Version assigned by the history store; monotonic per subject.
    pub version: i32,
    pub overall: u8,
    pub band: PerformanceBand,
    /// Weight share of fully-computed categories, 0..=1.
    pub confidence: f64,
    /// Per-category scores with metric contributions, for explainability.
    pub categories: BTreeMap<Category, CategoryScore>,
    pub computed_at: DateTime<Utc>,
    pub computation_id: String,
    pub engine_version: String,
    pub catalog_version: String,
    /// Input digest; equal hashes mean an idempotent recompute.
    pub input_hash: String,
}

impl From<StoredScoreProfile> for ScoreProfileDto {
    fn from(stored: StoredScoreProfile) -> Self {
        let profile = stored.profile;
        Self {
            subject_kind: profile.subject_kind,
            subject_id: profile.subject_id,
            version: stored.version,
            overall: profile.overall,
            band: profile.band,
            confidence: profile.confidence,
            categories: profile.categories,
            computed_at: profile.computed_at,
            computation_id: profile.computation_id,
            engine_version: profile.engine_version,
            catalog_version: profile.catalog_version,
            input_hash: profile.input_hash,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendDto {
    pub subject_kind: SubjectKind,
    pub subject_id: i64,
    pub latest_version: i32,
    pub previous_version: i32,
    pub latest_overall: u8,
    pub previous_overall: u8,
    pub delta: i16,
    pub trend: Trend,
}

impl TrendDto {
    pub fn from_report(kind: SubjectKind, subject_id: i64, report: &TrendReport) -> Self {
        Self {
            subject_kind: kind,
            subject_id,
            latest_version: report.latest.version,
            previous_version: report.previous.version,
            latest_overall: report.latest.overall,
            previous_overall: report.previous.overall,
            delta: report.delta,
            trend: report.trend,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsDto {
    pub subject_kind: SubjectKind,
    pub subject_id: i64,
    /// Profile version the recommendations were derived from.
    pub based_on_version: i32,
    pub attention_cutoff: f64,
    pub items: Vec<Recommendation>,
}
