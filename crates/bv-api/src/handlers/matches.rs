use axum::{extract::State, Json};
use tracing::info;

use bv_common::api::matches::{MatchRankRequest, MatchRankResponse};
use bv_common::db::{fetch_investor, fetch_match_candidates, insert_matches};
use bv_common::matching::{rank, RankOptions, STANDARD_MATCH_WEIGHTS};
use bv_common::notify::Notification;
use bv_common::run_id;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::SharedState;

const MAX_RANK_LIMIT: usize = 100;

/// POST /api/matches/rank
///
/// Scores every eligible candidate for one investor, persists the ranking
/// as a new immutable run and returns it in rank order.
pub async fn rank_matches(
    State(state): State<SharedState>,
    _user: AuthUser,
    Json(request): Json<MatchRankRequest>,
) -> Result<Json<MatchRankResponse>, ApiError> {
    let investor = fetch_investor(&state.pool, request.investor_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("no investor profile for {}", request.investor_id))
        })?;

    if let Some(min_score) = request.min_score {
        if !(0.0..=100.0).contains(&min_score) {
            return Err(ApiError::BadRequest(
                "min_score must be between 0 and 100".into(),
            ));
        }
    }

    let defaults = RankOptions::default();
    let options = RankOptions {
        min_score: request
            .min_score
            .unwrap_or(state.engine_config.default_min_match_score),
        exclude_ids: request.exclude_ids.clone(),
        limit: request
            .limit
            .unwrap_or(defaults.limit)
            .clamp(1, MAX_RANK_LIMIT),
    };

    let candidates = fetch_match_candidates(&state.pool).await?;
    let ranked = rank(&investor, &candidates, &STANDARD_MATCH_WEIGHTS, &options);

    let rank_run_id = run_id::generate();
    let persisted = insert_matches(&state.pool, &rank_run_id, &ranked).await?;

    state.notifier.notify(&Notification::MatchesRanked {
        investor_id: request.investor_id,
        ranked: ranked.len(),
    });
    metrics::counter!("bv_match_rank_runs_total").increment(1);
    info!(
        investor_id = request.investor_id,
        %rank_run_id,
        candidates = candidates.len(),
        ranked = ranked.len(),
        persisted,
        "match ranking run persisted"
    );

    Ok(Json(MatchRankResponse::from_ranked(rank_run_id, ranked)))
}
