//! Append-only score profile history. Inserts assign the next version for
//! the subject inside the statement; nothing here ever updates a row.

use std::collections::BTreeMap;

use deadpool_postgres::PoolError;
use serde_json::Value;
use tokio_postgres::types::Json;
use tokio_postgres::{Error as PgError, Row};
use tracing::instrument;

use crate::db::PgPool;
use crate::scoring::aggregate::CategoryScore;
use crate::scoring::catalog::Category;
use crate::scoring::history::HistoryPoint;
use crate::scoring::ScoreProfile;
use crate::SubjectKind;

#[derive(Debug, thiserror::Error)]
pub enum ScoreStorageError {
    #[error("failed to get postgres connection: {0}")]
    Pool(#[from] PoolError),
    #[error("postgres error: {0}")]
    Postgres(#[from] PgError),
    #[error("failed to map stored profile: {0}")]
    Mapping(String),
}

/// A persisted profile plus the version the store assigned to it.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredScoreProfile {
    pub version: i32,
    pub profile: ScoreProfile,
}

fn categories_json(
    categories: &BTreeMap<Category, CategoryScore>,
) -> Result<Value, ScoreStorageError> {
    serde_json::to_value(categories).map_err(|e| ScoreStorageError::Mapping(e.to_string()))
}

fn profile_from_row(row: &Row) -> Result<StoredScoreProfile, ScoreStorageError> {
    let kind: String = row.get("subject_kind");
    let band: String = row.get("band");
    let categories: Value = row.get("categories");
    let overall: i16 = row.get("overall");

    Ok(StoredScoreProfile {
        version: row.get("version"),
        profile: ScoreProfile {
            computation_id: row.get("computation_id"),
            subject_kind: kind
                .parse::<SubjectKind>()
                .map_err(|e| ScoreStorageError::Mapping(e.to_string()))?,
            subject_id: row.get("subject_id"),
            categories: serde_json::from_value(categories)
                .map_err(|e| ScoreStorageError::Mapping(e.to_string()))?,
            overall: overall as u8,
            band: band
                .parse()
                .map_err(|e: strum::ParseError| ScoreStorageError::Mapping(e.to_string()))?,
            confidence: row.get("confidence"),
            computed_at: row.get("computed_at"),
            engine_version: row.get("engine_version"),
            catalog_version: row.get("catalog_version"),
            input_hash: row.get("input_hash"),
        },
    })
}

/// Appends one profile snapshot and returns the version it received.
/// `version = MAX + 1` is computed inside the insert, so concurrent
/// recomputes race on the unique constraint instead of silently colliding.
#[instrument(skip(pool, profile))]
pub async fn insert_score_profile(
    pool: &PgPool,
    profile: &ScoreProfile,
) -> Result<i32, ScoreStorageError> {
    let client = pool.get().await?;
    let stmt = client
        .prepare_cached(
            "INSERT INTO bvester.score_profiles (
                subject_kind, subject_id, version, computation_id, categories,
                overall, band, confidence, computed_at,
                engine_version, catalog_version, input_hash
            ) VALUES (
                $1, $2,
                (SELECT COALESCE(MAX(version), 0) + 1
                   FROM bvester.score_profiles
                  WHERE subject_kind = $1 AND subject_id = $2),
                $3, $4, $5, $6, $7, $8, $9, $10, $11
            )
            RETURNING version",
        )
        .await?;

    let categories = categories_json(&profile.categories)?;
    let row = client
        .query_one(
            &stmt,
            &[
                &profile.subject_kind.to_string(),
                &profile.subject_id,
                &profile.computation_id,
                &Json(&categories),
                &i16::from(profile.overall),
                &profile.band.to_string(),
                &profile.confidence,
                &profile.computed_at,
                &profile.engine_version,
                &profile.catalog_version,
                &profile.input_hash,
            ],
        )
        .await?;

    Ok(row.get("version"))
}

/// Latest N versions for a subject, newest first.
#[instrument(skip(pool))]
pub async fn fetch_latest_profiles(
    pool: &PgPool,
    kind: SubjectKind,
    subject_id: i64,
    limit: i64,
) -> Result<Vec<StoredScoreProfile>, ScoreStorageError> {
    let client = pool.get().await?;
    let stmt = client
        .prepare_cached(
            "SELECT subject_kind, subject_id, version, computation_id, categories,
                    overall, band, confidence, computed_at,
                    engine_version, catalog_version, input_hash
             FROM bvester.score_profiles
             WHERE subject_kind = $1 AND subject_id = $2
             ORDER BY version DESC
             LIMIT $3",
        )
        .await?;
    let rows = client
        .query(&stmt, &[&kind.to_string(), &subject_id, &limit])
        .await?;

    rows.iter().map(profile_from_row).collect()
}

/// The thin slice trend computation needs, newest first.
#[instrument(skip(pool))]
pub async fn fetch_history_points(
    pool: &PgPool,
    kind: SubjectKind,
    subject_id: i64,
    limit: i64,
) -> Result<Vec<HistoryPoint>, ScoreStorageError> {
    let client = pool.get().await?;
    let stmt = client
        .prepare_cached(
            "SELECT version, overall, computed_at
             FROM bvester.score_profiles
             WHERE subject_kind = $1 AND subject_id = $2
             ORDER BY version DESC
             LIMIT $3",
        )
        .await?;
    let rows = client
        .query(&stmt, &[&kind.to_string(), &subject_id, &limit])
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| HistoryPoint {
            version: row.get("version"),
            overall: row.get::<_, i16>("overall") as u8,
            computed_at: row.get("computed_at"),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_map_round_trips_through_json() {
        let mut categories: BTreeMap<Category, CategoryScore> = BTreeMap::new();
        categories.insert(
            Category::Esg,
            CategoryScore {
                category: Category::Esg,
                score: 72,
                complete: true,
                contributions: vec![],
                missing: vec![],
            },
        );

        let json = categories_json(&categories).unwrap();
        assert_eq!(json["esg"]["score"], 72);

        let parsed: BTreeMap<Category, CategoryScore> = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, categories);
    }
}
