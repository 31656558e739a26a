pub mod aggregate;
pub mod catalog;
pub mod classify;
pub mod composite;
pub mod extract;
pub mod history;
pub mod normalize;
pub mod recommend;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::{run_id, BusinessRecord, SubjectKind};
use aggregate::{aggregate_category, CategoryScore};
use catalog::{Category, MetricCatalog};
use classify::{performance_band, PerformanceBand};
use recommend::Recommendation;

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    #[error("invalid input for {kind} {subject_id}: {field} = {value} is {reason}")]
    InvalidInput {
        kind: SubjectKind,
        subject_id: i64,
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
    #[error("no raw record found for {kind} {subject_id}")]
    MissingSubject { kind: SubjectKind, subject_id: i64 },
    #[error("scoring failed for {kind} {subject_id}: {reason}")]
    ComputationFailure {
        kind: SubjectKind,
        subject_id: i64,
        reason: String,
    },
}

/// One immutable scoring outcome. Versioning is assigned by the history
/// store on insert; everything else is fixed at computation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreProfile {
    pub computation_id: String,
    pub subject_kind: SubjectKind,
    pub subject_id: i64,
    pub categories: BTreeMap<Category, CategoryScore>,
    pub overall: u8,
    pub band: PerformanceBand,
    pub confidence: f64,
    pub computed_at: DateTime<Utc>,
    pub engine_version: String,
    pub catalog_version: String,
    /// Digest of the raw record, so identical recomputations are visible in
    /// stored history without replaying them.
    pub input_hash: String,
}

pub struct ScoreEngine {
    catalog: MetricCatalog,
}

impl ScoreEngine {
    pub fn new(catalog: MetricCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &MetricCatalog {
        &self.catalog
    }

    /// Runs the full pipeline for one subject: validate, derive and tier
    /// each metric, fold categories, fold the composite, classify.
    ///
    /// Missing metrics and whole missing categories degrade confidence
    /// instead of failing; the only hard failure is a record where not a
    /// single category could be computed.
    pub fn compute_profile(
        &self,
        kind: SubjectKind,
        subject_id: i64,
        record: &BusinessRecord,
    ) -> Result<ScoreProfile, ScoreError> {
        extract::validate_record(kind, subject_id, record)?;

        let mut categories: BTreeMap<Category, CategoryScore> = BTreeMap::new();
        for (category, _) in self.catalog.category_weights {
            match aggregate_category(&self.catalog, *category, record) {
                Some(score) => {
                    categories.insert(*category, score);
                }
                None => {
                    debug!(%category, subject_id, "category has no available metrics, skipped");
                }
            }
        }

        let scores: Vec<CategoryScore> = categories.values().cloned().collect();
        let Some(composite) = composite::composite(&self.catalog, &scores) else {
            return Err(ScoreError::ComputationFailure {
                kind,
                subject_id,
                reason: "no category had an available metric".to_string(),
            });
        };

        if composite.confidence < 1.0 {
            debug!(
                subject_id,
                confidence = composite.confidence,
                "partial computation, confidence reduced"
            );
        }

        Ok(ScoreProfile {
            computation_id: run_id::generate(),
            subject_kind: kind,
            subject_id,
            categories,
            overall: composite.overall,
            band: performance_band(composite.overall),
            confidence: composite.confidence,
            computed_at: Utc::now(),
            engine_version: ENGINE_VERSION.to_string(),
            catalog_version: self.catalog.version.to_string(),
            input_hash: calculate_input_hash(record),
        })
    }

    /// Improvement actions for an already-computed profile.
    pub fn recommendations(
        &self,
        profile: &ScoreProfile,
        attention_cutoff: f64,
    ) -> Vec<Recommendation> {
        let scores: Vec<CategoryScore> = profile.categories.values().cloned().collect();
        recommend::recommend(&self.catalog, &scores, attention_cutoff)
    }
}

/// SHA-256 over the canonical record serialization, first 16 hex chars.
pub fn calculate_input_hash(record: &BusinessRecord) -> String {
    let canonical = serde_json::to_vec(record).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    let bytes = hasher.finalize();
    let mut hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    hex.truncate(16);
    hex
}
