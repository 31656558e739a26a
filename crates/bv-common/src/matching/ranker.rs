use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::factors::{
    esg_alignment_score, membership_score, range_overlap_score, risk_alignment_score,
    set_overlap_score,
};
use super::weights::MatchWeights;
use crate::{BusinessMatchProfile, InvestorProfile};

#[derive(Debug, Clone)]
pub struct RankOptions {
    /// Candidates scoring below this floor are dropped.
    pub min_score: f64,
    /// Already-matched or blocked business ids.
    pub exclude_ids: Vec<i64>,
    pub limit: usize,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            min_score: 0.0,
            exclude_ids: Vec::new(),
            limit: 50,
        }
    }
}

/// Per-factor scores behind one match, each 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorBreakdown {
    pub sector_fit: f64,
    pub funding_fit: f64,
    pub geography_fit: f64,
    pub risk_fit: f64,
    pub esg_fit: f64,
}

/// One immutable investor/business compatibility result. Never updated in
/// place; a recomputation inserts new rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityMatch {
    pub investor_id: i64,
    pub business_id: i64,
    pub score: u8,
    pub breakdown: FactorBreakdown,
    pub computed_at: DateTime<Utc>,
}

/// Scores one investor/business pair.
///
/// Every factor is symmetric in its inputs, so the pair scores identically
/// from either perspective under the same weight table. Returns `None` when
/// either profile lacks a factor's inputs: a compatibility match requires
/// the full breakdown, unlike composite scoring it never degrades.
pub fn score_pair(
    investor: &InvestorProfile,
    business: &BusinessMatchProfile,
    weights: &MatchWeights,
) -> Option<CompatibilityMatch> {
    let investor_id = investor.id?;
    let business_id = business.id?;

    let sector_fit = set_overlap_score(&investor.focus_sectors, &business.sectors)?;
    let funding_fit = range_overlap_score(
        investor.ticket_min?,
        investor.ticket_max?,
        business.funding_min?,
        business.funding_max?,
    );
    let geography_fit = membership_score(
        &investor.countries,
        std::slice::from_ref(business.country.as_ref()?),
    )?;
    let risk_fit = risk_alignment_score(investor.risk_tolerance?, business.risk_score?);
    let esg_fit = esg_alignment_score(investor.esg_priority?, business.esg_score?);

    let breakdown = FactorBreakdown {
        sector_fit,
        funding_fit,
        geography_fit,
        risk_fit,
        esg_fit,
    };

    let weighted = sector_fit * weights.sector
        + funding_fit * weights.funding
        + geography_fit * weights.geography
        + risk_fit * weights.risk
        + esg_fit * weights.esg;
    let score = (weighted / weights.sum()).round() as u8;

    Some(CompatibilityMatch {
        investor_id,
        business_id,
        score,
        breakdown,
        computed_at: Utc::now(),
    })
}

/// Ranks candidate businesses for one investor.
///
/// Excluded and sub-floor candidates are dropped, the rest sorted by score
/// descending with a fixed tie-break: most recently active candidate first,
/// then ascending business id. Input order never decides a rank.
pub fn rank(
    investor: &InvestorProfile,
    candidates: &[BusinessMatchProfile],
    weights: &MatchWeights,
    options: &RankOptions,
) -> Vec<CompatibilityMatch> {
    let mut scored: Vec<(CompatibilityMatch, Option<DateTime<Utc>>)> = candidates
        .iter()
        .filter(|candidate| {
            candidate
                .id
                .map(|id| !options.exclude_ids.contains(&id))
                .unwrap_or(false)
        })
        .filter_map(|candidate| {
            score_pair(investor, candidate, weights)
                .map(|matched| (matched, candidate.last_active_at))
        })
        .filter(|(matched, _)| f64::from(matched.score) >= options.min_score)
        .collect();

    scored.sort_by(|(a, a_active), (b, b_active)| {
        b.score
            .cmp(&a.score)
            .then_with(|| match (b_active, a_active) {
                (Some(b_at), Some(a_at)) => b_at.cmp(a_at),
                (Some(_), None) => Ordering::Greater,
                (None, Some(_)) => Ordering::Less,
                (None, None) => Ordering::Equal,
            })
            .then_with(|| a.business_id.cmp(&b.business_id))
    });

    scored.truncate(options.limit);
    scored.into_iter().map(|(matched, _)| matched).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::weights::STANDARD_MATCH_WEIGHTS;
    use chrono::TimeZone;

    fn investor() -> InvestorProfile {
        InvestorProfile {
            id: Some(1),
            focus_sectors: vec!["fintech".into(), "agtech".into()],
            ticket_min: Some(10_000.0),
            ticket_max: Some(100_000.0),
            countries: vec!["KE".into(), "NG".into()],
            risk_tolerance: Some(0.5),
            esg_priority: Some(75.0),
            last_active_at: None,
        }
    }

    fn business(id: i64) -> BusinessMatchProfile {
        BusinessMatchProfile {
            id: Some(id),
            sectors: vec!["fintech".into(), "agtech".into()],
            funding_min: Some(10_000.0),
            funding_max: Some(100_000.0),
            country: Some("KE".into()),
            risk_score: Some(0.5),
            esg_score: Some(72.0),
            last_active_at: None,
        }
    }

    fn active_at(days: u32) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(2026, 8, days, 12, 0, 0).unwrap())
    }

    #[test]
    fn perfect_pair_scores_one_hundred() {
        let matched = score_pair(&investor(), &business(7), &STANDARD_MATCH_WEIGHTS).unwrap();
        assert_eq!(matched.score, 100);
        assert_eq!(matched.investor_id, 1);
        assert_eq!(matched.business_id, 7);
        assert_eq!(matched.breakdown.funding_fit, 100.0);
    }

    #[test]
    fn missing_factor_inputs_disqualify_the_pair() {
        let mut no_esg = business(2);
        no_esg.esg_score = None;
        assert!(score_pair(&investor(), &no_esg, &STANDARD_MATCH_WEIGHTS).is_none());

        let mut no_range = business(3);
        no_range.funding_min = None;
        assert!(score_pair(&investor(), &no_range, &STANDARD_MATCH_WEIGHTS).is_none());

        let mut no_id = business(4);
        no_id.id = None;
        assert!(score_pair(&investor(), &no_id, &STANDARD_MATCH_WEIGHTS).is_none());
    }

    #[test]
    fn candidates_below_min_score_are_excluded_regardless_of_rank() {
        let mut weak = business(2);
        weak.sectors = vec!["mining".into()];
        weak.country = Some("ZA".into());
        weak.esg_score = Some(20.0);
        weak.risk_score = Some(0.9);
        weak.funding_min = Some(150_000.0);
        weak.funding_max = Some(500_000.0);

        let options = RankOptions {
            min_score: 60.0,
            ..RankOptions::default()
        };
        let ranked = rank(
            &investor(),
            &[weak.clone(), business(1)],
            &STANDARD_MATCH_WEIGHTS,
            &options,
        );

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].business_id, 1);

        // the weak candidate scored something, just not enough
        let weak_score = score_pair(&investor(), &weak, &STANDARD_MATCH_WEIGHTS)
            .unwrap()
            .score;
        assert!(f64::from(weak_score) < 60.0);
    }

    #[test]
    fn excluded_ids_never_rank() {
        let options = RankOptions {
            exclude_ids: vec![2],
            ..RankOptions::default()
        };
        let ranked = rank(
            &investor(),
            &[business(2), business(3)],
            &STANDARD_MATCH_WEIGHTS,
            &options,
        );

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].business_id, 3);
    }

    #[test]
    fn ties_break_on_recency_then_id() {
        let mut older = business(5);
        older.last_active_at = active_at(1);
        let mut newer = business(9);
        newer.last_active_at = active_at(20);
        let mut never_active = business(3);
        never_active.last_active_at = None;

        let ranked = rank(
            &investor(),
            &[older, never_active.clone(), newer],
            &STANDARD_MATCH_WEIGHTS,
            &RankOptions::default(),
        );

        let ids: Vec<i64> = ranked.iter().map(|m| m.business_id).collect();
        assert_eq!(ids, vec![9, 5, 3]);

        // identical scores and recency fall back to ascending id
        let mut twin = never_active.clone();
        twin.id = Some(8);
        let ranked = rank(
            &investor(),
            &[twin, never_active],
            &STANDARD_MATCH_WEIGHTS,
            &RankOptions::default(),
        );
        let ids: Vec<i64> = ranked.iter().map(|m| m.business_id).collect();
        assert_eq!(ids, vec![3, 8]);
    }

    #[test]
    fn limit_truncates_after_sorting() {
        let candidates: Vec<BusinessMatchProfile> = (1..=6).map(business).collect();
        let options = RankOptions {
            limit: 2,
            ..RankOptions::default()
        };
        let ranked = rank(&investor(), &candidates, &STANDARD_MATCH_WEIGHTS, &options);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].business_id, 1);
        assert_eq!(ranked[1].business_id, 2);
    }

    #[test]
    fn score_is_identical_from_either_perspective() {
        let inv = investor();
        let mut biz = business(2);
        biz.sectors = vec!["fintech".into(), "health".into()];
        biz.esg_score = Some(40.0);
        biz.risk_score = Some(0.8);

        let forward = score_pair(&inv, &biz, &STANDARD_MATCH_WEIGHTS).unwrap();

        // mirror the pair: the business's data viewed as the ranking side
        let mirrored_investor = InvestorProfile {
            id: biz.id,
            focus_sectors: biz.sectors.clone(),
            ticket_min: biz.funding_min,
            ticket_max: biz.funding_max,
            countries: vec![biz.country.clone().unwrap()],
            risk_tolerance: biz.risk_score,
            esg_priority: biz.esg_score,
            last_active_at: None,
        };
        let mirrored_business = BusinessMatchProfile {
            id: inv.id,
            sectors: inv.focus_sectors.clone(),
            funding_min: inv.ticket_min,
            funding_max: inv.ticket_max,
            country: Some("KE".into()),
            risk_score: inv.risk_tolerance,
            esg_score: inv.esg_priority,
            last_active_at: None,
        };
        let backward =
            score_pair(&mirrored_investor, &mirrored_business, &STANDARD_MATCH_WEIGHTS).unwrap();

        assert_eq!(forward.score, backward.score);
        assert_eq!(forward.breakdown.sector_fit, backward.breakdown.sector_fit);
        assert_eq!(forward.breakdown.funding_fit, backward.breakdown.funding_fit);
        assert_eq!(forward.breakdown.risk_fit, backward.breakdown.risk_fit);
        assert_eq!(forward.breakdown.esg_fit, backward.breakdown.esg_fit);
    }
}
