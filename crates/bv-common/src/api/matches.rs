use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::matching::{CompatibilityMatch, FactorBreakdown};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRankRequest {
    pub investor_id: i64,
    /// Floor applied to ranked results; falls back to the service default.
    pub min_score: Option<f64>,
    #[serde(default)]
    pub exclude_ids: Vec<i64>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchDto {
    /// 1-based position in this ranking run.
    pub rank: usize,
    pub investor_id: i64,
    pub business_id: i64,
    pub score: u8,
    pub breakdown: FactorBreakdown,
    pub computed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRankResponse {
    /// Groups the immutable rows this run persisted.
    pub rank_run_id: String,
    pub matches: Vec<MatchDto>,
}

impl MatchRankResponse {
    pub fn from_ranked(rank_run_id: String, ranked: Vec<CompatibilityMatch>) -> Self {
        let matches = ranked
            .into_iter()
            .enumerate()
            .map(|(idx, matched)| MatchDto {
                rank: idx + 1,
                investor_id: matched.investor_id,
                business_id: matched.business_id,
                score: matched.score,
                breakdown: matched.breakdown,
                computed_at: matched.computed_at,
            })
            .collect();

        Self {
            rank_run_id,
            matches,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_positions_are_one_based_and_ordered() {
        let ranked = vec![
            CompatibilityMatch {
                investor_id: 1,
                business_id: 5,
                score: 90,
                breakdown: FactorBreakdown {
                    sector_fit: 100.0,
                    funding_fit: 100.0,
                    geography_fit: 100.0,
                    risk_fit: 66.0,
                    esg_fit: 75.0,
                },
                computed_at: Utc::now(),
            },
            CompatibilityMatch {
                investor_id: 1,
                business_id: 8,
                score: 70,
                breakdown: FactorBreakdown {
                    sector_fit: 50.0,
                    funding_fit: 80.0,
                    geography_fit: 100.0,
                    risk_fit: 66.0,
                    esg_fit: 75.0,
                },
                computed_at: Utc::now(),
            },
        ];

        let response = MatchRankResponse::from_ranked("01TESTRUN".into(), ranked);
        assert_eq!(response.matches[0].rank, 1);
        assert_eq!(response.matches[0].business_id, 5);
        assert_eq!(response.matches[1].rank, 2);
    }

    #[test]
    fn request_defaults_optional_fields() {
        let request: MatchRankRequest = serde_json::from_str(r#"{"investor_id":3}"#).unwrap();
        assert_eq!(request.investor_id, 3);
        assert_eq!(request.min_score, None);
        assert!(request.exclude_ids.is_empty());
        assert_eq!(request.limit, None);
    }
}
