use serde::{Deserialize, Serialize};

use super::indicators::IndicatorId;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PatternId {
    AccountTakeover,
    IdentityFraud,
    TransactionAnomaly,
}

/// One fraud hypothesis: a set of indicators, the score it must reach to
/// trigger, and its share of the overall risk score.
#[derive(Debug, Clone, Copy)]
pub struct RiskPattern {
    pub id: PatternId,
    pub indicators: &'static [IndicatorId],
    /// Pattern triggers at or above this normalized score.
    pub threshold: f64,
    /// Share of this pattern in the overall risk score.
    pub weight: f64,
}

pub const STANDARD_PATTERNS: [RiskPattern; 3] = [
    RiskPattern {
        id: PatternId::AccountTakeover,
        indicators: &[
            IndicatorId::FailedLogins,
            IndicatorId::NewDevice,
            IndicatorId::IpReputation,
            IndicatorId::GeoDistance,
        ],
        threshold: 0.65,
        weight: 0.4,
    },
    RiskPattern {
        id: PatternId::IdentityFraud,
        indicators: &[
            IndicatorId::DeviceIntegrity,
            IndicatorId::CountryMismatch,
            IndicatorId::ProxyOrVpn,
        ],
        threshold: 0.7,
        weight: 0.35,
    },
    RiskPattern {
        id: PatternId::TransactionAnomaly,
        indicators: &[
            IndicatorId::VelocitySpike,
            IndicatorId::UnusualHour,
            IndicatorId::IpReputation,
        ],
        threshold: 0.6,
        weight: 0.25,
    },
];

/// Relative indicator weights for one scoring context. Patterns normalize by
/// the summed weight of the indicators they could evaluate, so tables carry
/// relative emphasis, not fractions.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorWeights {
    pub failed_logins: f64,
    pub unusual_hour: f64,
    pub velocity_spike: f64,
    pub new_device: f64,
    pub device_integrity: f64,
    pub ip_reputation: f64,
    pub proxy_or_vpn: f64,
    pub geo_distance: f64,
    pub country_mismatch: f64,
}

impl IndicatorWeights {
    pub fn weight(&self, id: IndicatorId) -> f64 {
        match id {
            IndicatorId::FailedLogins => self.failed_logins,
            IndicatorId::UnusualHour => self.unusual_hour,
            IndicatorId::VelocitySpike => self.velocity_spike,
            IndicatorId::NewDevice => self.new_device,
            IndicatorId::DeviceIntegrity => self.device_integrity,
            IndicatorId::IpReputation => self.ip_reputation,
            IndicatorId::ProxyOrVpn => self.proxy_or_vpn,
            IndicatorId::GeoDistance => self.geo_distance,
            IndicatorId::CountryMismatch => self.country_mismatch,
        }
    }
}

/// Login-event weighting: credential and device signals dominate, spending
/// signals stay in the background.
pub static LOGIN_SIGNAL_WEIGHTS: IndicatorWeights = IndicatorWeights {
    failed_logins: 1.5,
    unusual_hour: 1.0,
    velocity_spike: 0.5,
    new_device: 1.5,
    device_integrity: 1.0,
    ip_reputation: 1.25,
    proxy_or_vpn: 0.75,
    geo_distance: 1.0,
    country_mismatch: 1.0,
};

/// Payment-event weighting: spending velocity and cross-border signals
/// dominate, credential signals stay in the background.
pub static TRANSACTION_SIGNAL_WEIGHTS: IndicatorWeights = IndicatorWeights {
    failed_logins: 0.5,
    unusual_hour: 1.25,
    velocity_spike: 1.75,
    new_device: 1.0,
    device_integrity: 1.0,
    ip_reputation: 1.0,
    proxy_or_vpn: 1.0,
    geo_distance: 0.75,
    country_mismatch: 1.25,
};

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn pattern_weights_sum_to_one() {
        let sum: f64 = STANDARD_PATTERNS.iter().map(|p| p.weight).sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn thresholds_are_normalized() {
        for pattern in &STANDARD_PATTERNS {
            assert!((0.0..=1.0).contains(&pattern.threshold), "{}", pattern.id);
            assert!(!pattern.indicators.is_empty());
        }
    }

    #[test]
    fn weight_tables_cover_every_indicator_positively() {
        for table in [LOGIN_SIGNAL_WEIGHTS, TRANSACTION_SIGNAL_WEIGHTS] {
            for id in IndicatorId::iter() {
                assert!(table.weight(id) > 0.0, "missing weight for {id}");
            }
        }
    }

    #[test]
    fn contexts_disagree_on_emphasis() {
        use IndicatorId::{FailedLogins, VelocitySpike};
        assert!(
            LOGIN_SIGNAL_WEIGHTS.weight(FailedLogins)
                > TRANSACTION_SIGNAL_WEIGHTS.weight(FailedLogins)
        );
        assert!(
            TRANSACTION_SIGNAL_WEIGHTS.weight(VelocitySpike)
                > LOGIN_SIGNAL_WEIGHTS.weight(VelocitySpike)
        );
    }
}
