use serde::{Deserialize, Serialize};

/// Raw fraud/threat signals for one subject, as supplied by the caller.
/// All optional: an absent signal (no device fingerprint, no geo fix) lowers
/// assessment confidence but never blocks it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalContext {
    pub failed_login_count: Option<u32>,
    pub unusual_hour: Option<bool>,
    pub transaction_amount: Option<f64>,
    pub avg_transaction_amount: Option<f64>,
    pub known_device: Option<bool>,
    /// Platform attestation result, 1.0 = fully trusted.
    pub device_integrity: Option<f64>,
    /// Reputation feed score, 1.0 = known-bad address.
    pub ip_risk: Option<f64>,
    pub via_proxy: Option<bool>,
    pub distance_from_usual_km: Option<f64>,
    pub country_mismatch: Option<bool>,
}

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
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IndicatorId {
    FailedLogins,
    UnusualHour,
    VelocitySpike,
    NewDevice,
    DeviceIntegrity,
    IpReputation,
    ProxyOrVpn,
    GeoDistance,
    CountryMismatch,
}

/// One fraud indicator. Evaluators are pluggable so deployment contexts can
/// add signals without touching the pattern aggregation.
///
/// `evaluate` returns a risk score in 0..=1, or `None` when the context does
/// not carry the signal this indicator needs.
pub trait IndicatorEvaluator: Send + Sync {
    fn id(&self) -> IndicatorId;
    fn evaluate(&self, context: &SignalContext) -> Option<f64>;
}

struct FailedLogins;

impl IndicatorEvaluator for FailedLogins {
    fn id(&self) -> IndicatorId {
        IndicatorId::FailedLogins
    }

    // 10+ consecutive failures saturate the signal.
    fn evaluate(&self, context: &SignalContext) -> Option<f64> {
        context
            .failed_login_count
            .map(|n| (f64::from(n) / 10.0).min(1.0))
    }
}

struct UnusualHour;

impl IndicatorEvaluator for UnusualHour {
    fn id(&self) -> IndicatorId {
        IndicatorId::UnusualHour
    }

    fn evaluate(&self, context: &SignalContext) -> Option<f64> {
        context.unusual_hour.map(|unusual| f64::from(u8::from(unusual)))
    }
}

struct VelocitySpike;

impl IndicatorEvaluator for VelocitySpike {
    fn id(&self) -> IndicatorId {
        IndicatorId::VelocitySpike
    }

    // Risk rises linearly from the subject's usual amount up to 10x it.
    fn evaluate(&self, context: &SignalContext) -> Option<f64> {
        let amount = context.transaction_amount?;
        let usual = context.avg_transaction_amount?;
        let ratio = crate::scoring::extract::safe_ratio(amount, usual);
        Some(((ratio - 1.0) / 9.0).clamp(0.0, 1.0))
    }
}

struct NewDevice;

impl IndicatorEvaluator for NewDevice {
    fn id(&self) -> IndicatorId {
        IndicatorId::NewDevice
    }

    fn evaluate(&self, context: &SignalContext) -> Option<f64> {
        context.known_device.map(|known| f64::from(u8::from(!known)))
    }
}

struct DeviceIntegrity;

impl IndicatorEvaluator for DeviceIntegrity {
    fn id(&self) -> IndicatorId {
        IndicatorId::DeviceIntegrity
    }

    fn evaluate(&self, context: &SignalContext) -> Option<f64> {
        context
            .device_integrity
            .map(|trust| (1.0 - trust).clamp(0.0, 1.0))
    }
}

struct IpReputation;

impl IndicatorEvaluator for IpReputation {
    fn id(&self) -> IndicatorId {
        IndicatorId::IpReputation
    }

    fn evaluate(&self, context: &SignalContext) -> Option<f64> {
        context.ip_risk.map(|risk| risk.clamp(0.0, 1.0))
    }
}

struct ProxyOrVpn;

impl IndicatorEvaluator for ProxyOrVpn {
    fn id(&self) -> IndicatorId {
        IndicatorId::ProxyOrVpn
    }

    fn evaluate(&self, context: &SignalContext) -> Option<f64> {
        context.via_proxy.map(|proxied| f64::from(u8::from(proxied)))
    }
}

struct GeoDistance;

impl IndicatorEvaluator for GeoDistance {
    fn id(&self) -> IndicatorId {
        IndicatorId::GeoDistance
    }

    // Saturates at 5000km from the subject's usual location.
    fn evaluate(&self, context: &SignalContext) -> Option<f64> {
        context
            .distance_from_usual_km
            .map(|km| (km / 5000.0).clamp(0.0, 1.0))
    }
}

struct CountryMismatch;

impl IndicatorEvaluator for CountryMismatch {
    fn id(&self) -> IndicatorId {
        IndicatorId::CountryMismatch
    }

    fn evaluate(&self, context: &SignalContext) -> Option<f64> {
        context
            .country_mismatch
            .map(|mismatch| f64::from(u8::from(mismatch)))
    }
}

/// The built-in evaluator set covering behavioral, device, network and
/// geographic signals.
pub fn standard_evaluators() -> Vec<Box<dyn IndicatorEvaluator>> {
    vec![
        Box::new(FailedLogins),
        Box::new(UnusualHour),
        Box::new(VelocitySpike),
        Box::new(NewDevice),
        Box::new(DeviceIntegrity),
        Box::new(IpReputation),
        Box::new(ProxyOrVpn),
        Box::new(GeoDistance),
        Box::new(CountryMismatch),
    ]
}
