use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use bv_common::api::scores::{RecommendationsDto, ScoreProfileDto, TrendDto};
use bv_common::db::{
    fetch_business, fetch_history_points, fetch_latest_profiles, insert_score_profile,
    StoredScoreProfile,
};
use bv_common::notify::Notification;
use bv_common::scoring::{history, ScoreError};
use bv_common::SubjectKind;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::SharedState;

const DEFAULT_HISTORY_LIMIT: i64 = 10;
const MAX_HISTORY_LIMIT: i64 = 50;

async fn load_record(
    state: &SharedState,
    kind: SubjectKind,
    subject_id: i64,
) -> Result<bv_common::BusinessRecord, ApiError> {
    // The metric catalog reads business records; user subjects have no raw
    // record source yet, so they resolve like an absent subject.
    let record = match kind {
        SubjectKind::Business => fetch_business(&state.pool, subject_id).await?,
        SubjectKind::User => None,
    };

    record.ok_or_else(|| ScoreError::MissingSubject { kind, subject_id }.into())
}

/// POST /api/subjects/:kind/:id/scores/compute
///
/// Full recomputation from the raw record. The result is appended to the
/// subject's history; previous versions are never touched.
///
/// The cooldown token is taken only once a profile is ready to persist, so
/// a request that fails on fetch or validation leaves the window free for a
/// retry after the caller refreshes the upstream data.
pub async fn compute(
    State(state): State<SharedState>,
    _user: AuthUser,
    Path((kind, subject_id)): Path<(SubjectKind, i64)>,
) -> Result<Json<ScoreProfileDto>, ApiError> {
    let record = load_record(&state, kind, subject_id).await?;
    let profile = state.score_engine.compute_profile(kind, subject_id, &record)?;

    state.rate_limits.check_cooldown(kind, subject_id)?;
    let version = insert_score_profile(&state.pool, &profile).await?;

    state.notifier.notify(&Notification::ScoreComputed {
        kind,
        subject_id,
        overall: profile.overall,
        version,
    });
    metrics::counter!("bv_score_computations_total").increment(1);
    info!(
        %kind,
        subject_id,
        version,
        overall = profile.overall,
        confidence = profile.confidence,
        "score profile computed"
    );

    Ok(Json(StoredScoreProfile { version, profile }.into()))
}

/// GET /api/subjects/:kind/:id/scores/latest
pub async fn latest(
    State(state): State<SharedState>,
    _user: AuthUser,
    Path((kind, subject_id)): Path<(SubjectKind, i64)>,
) -> Result<Json<ScoreProfileDto>, ApiError> {
    let mut profiles = fetch_latest_profiles(&state.pool, kind, subject_id, 1).await?;

    match profiles.pop() {
        Some(stored) => Ok(Json(stored.into())),
        None => Err(ApiError::NotFound(format!(
            "no score profile for {kind} {subject_id}"
        ))),
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// GET /api/subjects/:kind/:id/scores/history?limit=N
///
/// Stored versions, newest first. An unscored subject yields an empty list
/// rather than 404 so clients can render "no history yet".
pub async fn history(
    State(state): State<SharedState>,
    _user: AuthUser,
    Path((kind, subject_id)): Path<(SubjectKind, i64)>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<ScoreProfileDto>>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);

    let profiles = fetch_latest_profiles(&state.pool, kind, subject_id, limit).await?;
    Ok(Json(profiles.into_iter().map(Into::into).collect()))
}

/// GET /api/subjects/:kind/:id/scores/trend
pub async fn trend(
    State(state): State<SharedState>,
    _user: AuthUser,
    Path((kind, subject_id)): Path<(SubjectKind, i64)>,
) -> Result<Json<TrendDto>, ApiError> {
    let points = fetch_history_points(&state.pool, kind, subject_id, 2).await?;

    match history::trend(&points) {
        Some(report) => Ok(Json(TrendDto::from_report(kind, subject_id, &report))),
        None => Err(ApiError::NotFound(format!(
            "{kind} {subject_id} needs at least two score versions for a trend"
        ))),
    }
}

/// GET /api/subjects/:kind/:id/recommendations
///
/// Derived from the latest stored profile, never from a fresh computation.
pub async fn recommendations(
    State(state): State<SharedState>,
    _user: AuthUser,
    Path((kind, subject_id)): Path<(SubjectKind, i64)>,
) -> Result<Json<RecommendationsDto>, ApiError> {
    let mut profiles = fetch_latest_profiles(&state.pool, kind, subject_id, 1).await?;
    let Some(stored) = profiles.pop() else {
        return Err(ApiError::NotFound(format!(
            "no score profile for {kind} {subject_id}"
        )));
    };

    let cutoff = state.engine_config.attention_cutoff;
    let items = state.score_engine.recommendations(&stored.profile, cutoff);

    Ok(Json(RecommendationsDto {
        subject_kind: kind,
        subject_id,
        based_on_version: stored.version,
        attention_cutoff: cutoff,
        items,
    }))
}
