use deadpool_postgres::PoolError;
use serde_json::Value;
use tokio_postgres::types::Json;
use tokio_postgres::Error as PgError;
use tracing::instrument;

use crate::db::PgPool;
use crate::risk::{AssessmentStatus, ReviewOutcome, RiskAssessment};

#[derive(Debug, thiserror::Error)]
pub enum RiskStorageError {
    #[error("failed to get postgres connection: {0}")]
    Pool(#[from] PoolError),
    #[error("postgres error: {0}")]
    Postgres(#[from] PgError),
    #[error("failed to serialize assessment: {0}")]
    Mapping(String),
    #[error("assessment {0} not found or not reviewable")]
    NotReviewable(i64),
}

/// Appends one assessment and returns its row id.
#[instrument(skip(pool, assessment))]
pub async fn insert_risk_assessment(
    pool: &PgPool,
    assessment: &RiskAssessment,
) -> Result<i64, RiskStorageError> {
    let client = pool.get().await?;
    let stmt = client
        .prepare_cached(
            "INSERT INTO bvester.risk_assessments (
                computation_id, subject_kind, subject_id, patterns,
                overall, level, confidence, requires_manual_review,
                status, computed_at, engine_version
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id",
        )
        .await?;

    let patterns: Value = serde_json::to_value(&assessment.patterns)
        .map_err(|e| RiskStorageError::Mapping(e.to_string()))?;

    let row = client
        .query_one(
            &stmt,
            &[
                &assessment.computation_id,
                &assessment.subject_kind.to_string(),
                &assessment.subject_id,
                &Json(&patterns),
                &assessment.overall,
                &assessment.level.to_string(),
                &assessment.confidence,
                &assessment.requires_manual_review,
                &assessment.status.to_string(),
                &assessment.computed_at,
                &assessment.engine_version,
            ],
        )
        .await?;

    Ok(row.get("id"))
}

/// Applies a reviewer verdict to a completed assessment. The `WHERE status`
/// guard makes the transition idempotent-safe: a second review, or a review
/// of a pending row, changes nothing and surfaces as `NotReviewable`.
#[instrument(skip(pool))]
pub async fn review_assessment(
    pool: &PgPool,
    assessment_id: i64,
    outcome: ReviewOutcome,
) -> Result<(), RiskStorageError> {
    let client = pool.get().await?;
    let stmt = client
        .prepare_cached(
            "UPDATE bvester.risk_assessments
             SET status = $2, reviewed_at = NOW()
             WHERE id = $1 AND status = $3",
        )
        .await?;

    let updated = client
        .execute(
            &stmt,
            &[
                &assessment_id,
                &outcome.status().to_string(),
                &AssessmentStatus::Completed.to_string(),
            ],
        )
        .await?;

    if updated == 0 {
        return Err(RiskStorageError::NotReviewable(assessment_id));
    }
    Ok(())
}
