use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use bv_common::api::risk::{ReviewRequest, RiskAssessRequest, RiskAssessmentDto};
use bv_common::db::{insert_risk_assessment, review_assessment};
use bv_common::notify::Notification;
use bv_common::SubjectKind;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::SharedState;

/// POST /api/subjects/:kind/:id/risk/assess
///
/// Runs every configured pattern over the supplied signal context under the
/// named weight table and appends the result.
pub async fn assess(
    State(state): State<SharedState>,
    _user: AuthUser,
    Path((kind, subject_id)): Path<(SubjectKind, i64)>,
    Json(request): Json<RiskAssessRequest>,
) -> Result<Json<RiskAssessmentDto>, ApiError> {
    let weights = request.weight_context.weights();
    let assessment = state
        .risk_engine
        .assess(kind, subject_id, &request.context, weights)?;

    let id = insert_risk_assessment(&state.pool, &assessment).await?;

    state.notifier.notify(&Notification::RiskAssessed {
        kind,
        subject_id,
        level: assessment.level,
        score: assessment.overall,
    });
    metrics::counter!("bv_risk_assessments_total").increment(1);
    info!(
        %kind,
        subject_id,
        assessment_id = id,
        level = %assessment.level,
        overall = assessment.overall,
        weight_context = %request.weight_context,
        "risk assessment persisted"
    );

    Ok(Json(RiskAssessmentDto::from_assessment(id, assessment)))
}

/// POST /api/risk/assessments/:id/review
///
/// Reviewer verdict on a completed assessment. A row that is not in the
/// `completed` state surfaces as 409.
pub async fn review(
    State(state): State<SharedState>,
    _user: AuthUser,
    Path(assessment_id): Path<i64>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<Value>, ApiError> {
    review_assessment(&state.pool, assessment_id, request.outcome).await?;

    info!(assessment_id, outcome = %request.outcome, "risk assessment reviewed");

    Ok(Json(json!({
        "id": assessment_id,
        "status": request.outcome.status(),
    })))
}
