pub mod matches;
pub mod migrations;
pub mod pool;
pub mod records;
pub mod risk_assessments;
pub mod score_profiles;

// Keep re-exports unique so downstream crates see a single symbol per helper.
pub use matches::{insert_matches, MatchStorageError};
pub use migrations::{run_migrations, MigrationError};
pub use pool::{create_pool_from_url, create_pool_from_url_checked, DbPoolError, PgPool};
pub use records::{fetch_business, fetch_investor, fetch_match_candidates, RecordFetchError};
pub use risk_assessments::{insert_risk_assessment, review_assessment, RiskStorageError};
pub use score_profiles::{
    fetch_history_points, fetch_latest_profiles, insert_score_profile, ScoreStorageError,
    StoredScoreProfile,
};
