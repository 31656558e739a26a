use deadpool_postgres::PoolError;
use serde_json::Value;
use tokio_postgres::types::Json;
use tokio_postgres::Error as PgError;
use tracing::instrument;

use crate::db::PgPool;
use crate::matching::CompatibilityMatch;

#[derive(Debug, thiserror::Error)]
pub enum MatchStorageError {
    #[error("failed to get postgres connection: {0}")]
    Pool(#[from] PoolError),
    #[error("postgres error: {0}")]
    Postgres(#[from] PgError),
    #[error("failed to serialize match breakdown: {0}")]
    Mapping(String),
}

/// Persists one ranking run's results in a single transaction, so a partial
/// run never becomes visible. Returns the number of rows written.
#[instrument(skip(pool, matches))]
pub async fn insert_matches(
    pool: &PgPool,
    rank_run_id: &str,
    matches: &[CompatibilityMatch],
) -> Result<u64, MatchStorageError> {
    if matches.is_empty() {
        return Ok(0);
    }

    let mut client = pool.get().await?;
    let tx = client.transaction().await?;
    let stmt = tx
        .prepare_cached(
            "INSERT INTO bvester.compatibility_matches (
                rank_run_id, investor_id, business_id, score, breakdown, computed_at
            ) VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .await?;

    let mut written = 0u64;
    for matched in matches {
        let breakdown: Value = serde_json::to_value(matched.breakdown)
            .map_err(|e| MatchStorageError::Mapping(e.to_string()))?;
        written += tx
            .execute(
                &stmt,
                &[
                    &rank_run_id,
                    &matched.investor_id,
                    &matched.business_id,
                    &i16::from(matched.score),
                    &Json(&breakdown),
                    &matched.computed_at,
                ],
            )
            .await?;
    }

    tx.commit().await?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::FactorBreakdown;
    use chrono::Utc;

    #[test]
    fn breakdown_serializes_with_stable_field_names() {
        let matched = CompatibilityMatch {
            investor_id: 1,
            business_id: 2,
            score: 88,
            breakdown: FactorBreakdown {
                sector_fit: 100.0,
                funding_fit: 75.0,
                geography_fit: 100.0,
                risk_fit: 66.0,
                esg_fit: 80.0,
            },
            computed_at: Utc::now(),
        };

        let json = serde_json::to_value(matched.breakdown).unwrap();
        assert_eq!(json["sector_fit"], 100.0);
        assert_eq!(json["funding_fit"], 75.0);
        assert_eq!(json["esg_fit"], 80.0);
    }
}
