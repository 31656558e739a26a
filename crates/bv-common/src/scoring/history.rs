use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

/// Minimal slice of a stored profile version, enough for trend math.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub version: i32,
    pub overall: u8,
    pub computed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    pub latest: HistoryPoint,
    pub previous: HistoryPoint,
    pub delta: i16,
    pub trend: Trend,
}

/// Derives the trend strictly from the two most recent versions. `points`
/// come newest-first, the order the history store returns them in. Returns
/// `None` until a subject has at least two versions.
pub fn trend(points: &[HistoryPoint]) -> Option<TrendReport> {
    let latest = *points.first()?;
    let previous = *points.get(1)?;

    let delta = i16::from(latest.overall) - i16::from(previous.overall);
    let trend = match delta {
        d if d > 0 => Trend::Improving,
        d if d < 0 => Trend::Declining,
        _ => Trend::Stable,
    };

    Some(TrendReport {
        latest,
        previous,
        delta,
        trend,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn point(version: i32, overall: u8) -> HistoryPoint {
        HistoryPoint {
            version,
            overall,
            computed_at: Utc::now(),
        }
    }

    #[test]
    fn rising_score_reads_as_improving() {
        let report = trend(&[point(3, 78), point(2, 70)]).unwrap();
        assert_eq!(report.trend, Trend::Improving);
        assert_eq!(report.delta, 8);
    }

    #[test]
    fn falling_score_reads_as_declining() {
        let report = trend(&[point(5, 40), point(4, 66)]).unwrap();
        assert_eq!(report.trend, Trend::Declining);
        assert_eq!(report.delta, -26);
    }

    #[test]
    fn equal_scores_read_as_stable() {
        let report = trend(&[point(2, 55), point(1, 55)]).unwrap();
        assert_eq!(report.trend, Trend::Stable);
        assert_eq!(report.delta, 0);
    }

    #[test]
    fn needs_two_versions() {
        assert!(trend(&[]).is_none());
        assert!(trend(&[point(1, 60)]).is_none());
    }

    #[test]
    fn older_versions_beyond_the_latest_two_are_ignored() {
        let report = trend(&[point(9, 80), point(8, 80), point(7, 10)]).unwrap();
        assert_eq!(report.trend, Trend::Stable);
        assert_eq!(report.latest.version, 9);
        assert_eq!(report.previous.version, 8);
    }
}
