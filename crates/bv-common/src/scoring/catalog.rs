use serde::{Deserialize, Serialize};

/// Scoring categories, each carrying a share of the overall score.
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
pub enum Category {
    Financial,
    Operational,
    Market,
    Innovation,
    Esg,
    Risk,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MetricKey {
    // financial
    RevenueGrowth,
    ProfitMargin,
    DebtToAssets,
    CashRunwayMonths,
    // operational
    CustomerGrowth,
    ChurnRate,
    OnTimeDeliveryRate,
    // market
    MarketShare,
    RepeatPurchaseRate,
    LtvToCac,
    // innovation
    RdIntensity,
    NewProductRevenueShare,
    DigitalSalesShare,
    // esg
    EmissionsIntensity,
    FemaleLeadershipShare,
    GovernanceAuditScore,
    // risk
    CreditUtilization,
    ComplianceViolations,
    PaymentDelinquencyRate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

/// Five ordered cutoffs converting a raw value into a fixed sub-score.
/// Ordering follows the metric direction: descending for higher-is-better,
/// ascending for lower-is-better.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierThresholds {
    pub excellent: f64,
    pub good: f64,
    pub fair: f64,
    pub poor: f64,
    pub critical: f64,
}

impl TierThresholds {
    /// Tiers best-first, paired with their fixed sub-scores.
    pub fn ladder(&self) -> [(f64, u8); 5] {
        [
            (self.excellent, 100),
            (self.good, 80),
            (self.fair, 60),
            (self.poor, 40),
            (self.critical, 20),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricDefinition {
    pub key: MetricKey,
    pub category: Category,
    pub direction: Direction,
    pub tiers: TierThresholds,
    /// Share of this metric inside its category. Per category they sum to 1.
    pub weight: f64,
}

const fn higher(
    key: MetricKey,
    category: Category,
    tiers: TierThresholds,
    weight: f64,
) -> MetricDefinition {
    MetricDefinition {
        key,
        category,
        direction: Direction::HigherIsBetter,
        tiers,
        weight,
    }
}

const fn lower(
    key: MetricKey,
    category: Category,
    tiers: TierThresholds,
    weight: f64,
) -> MetricDefinition {
    MetricDefinition {
        key,
        category,
        direction: Direction::LowerIsBetter,
        tiers,
        weight,
    }
}

const fn tiers(excellent: f64, good: f64, fair: f64, poor: f64, critical: f64) -> TierThresholds {
    TierThresholds {
        excellent,
        good,
        fair,
        poor,
        critical,
    }
}

/// Category shares of the overall score. Financial health dominates,
/// the rest follows the platform's published scoring methodology.
pub const STANDARD_CATEGORY_WEIGHTS: [(Category, f64); 6] = [
    (Category::Financial, 0.30),
    (Category::Operational, 0.20),
    (Category::Market, 0.15),
    (Category::Innovation, 0.10),
    (Category::Esg, 0.15),
    (Category::Risk, 0.10),
];

pub const STANDARD_METRICS: [MetricDefinition; 19] = [
    // financial
    higher(
        MetricKey::RevenueGrowth,
        Category::Financial,
        tiers(0.5, 0.3, 0.15, 0.05, 0.0),
        0.35,
    ),
    higher(
        MetricKey::ProfitMargin,
        Category::Financial,
        tiers(0.25, 0.15, 0.08, 0.02, -0.05),
        0.30,
    ),
    lower(
        MetricKey::DebtToAssets,
        Category::Financial,
        tiers(0.2, 0.35, 0.5, 0.7, 0.9),
        0.20,
    ),
    higher(
        MetricKey::CashRunwayMonths,
        Category::Financial,
        tiers(6.0, 4.0, 2.0, 1.0, 0.0),
        0.15,
    ),
    // operational
    higher(
        MetricKey::CustomerGrowth,
        Category::Operational,
        tiers(0.2, 0.1, 0.05, 0.0, -0.1),
        0.35,
    ),
    lower(
        MetricKey::ChurnRate,
        Category::Operational,
        tiers(0.02, 0.05, 0.1, 0.2, 0.35),
        0.35,
    ),
    higher(
        MetricKey::OnTimeDeliveryRate,
        Category::Operational,
        tiers(0.98, 0.95, 0.9, 0.8, 0.6),
        0.30,
    ),
    // market
    higher(
        MetricKey::MarketShare,
        Category::Market,
        tiers(0.15, 0.08, 0.04, 0.01, 0.0),
        0.30,
    ),
    higher(
        MetricKey::RepeatPurchaseRate,
        Category::Market,
        tiers(0.6, 0.45, 0.3, 0.15, 0.0),
        0.35,
    ),
    higher(
        MetricKey::LtvToCac,
        Category::Market,
        tiers(4.0, 3.0, 2.0, 1.0, 0.5),
        0.35,
    ),
    // innovation
    higher(
        MetricKey::RdIntensity,
        Category::Innovation,
        tiers(0.1, 0.06, 0.03, 0.01, 0.0),
        0.40,
    ),
    higher(
        MetricKey::NewProductRevenueShare,
        Category::Innovation,
        tiers(0.3, 0.2, 0.1, 0.03, 0.0),
        0.30,
    ),
    higher(
        MetricKey::DigitalSalesShare,
        Category::Innovation,
        tiers(0.6, 0.4, 0.25, 0.1, 0.0),
        0.30,
    ),
    // esg
    lower(
        MetricKey::EmissionsIntensity,
        Category::Esg,
        tiers(0.1, 0.25, 0.5, 0.8, 1.2),
        0.35,
    ),
    higher(
        MetricKey::FemaleLeadershipShare,
        Category::Esg,
        tiers(0.4, 0.3, 0.2, 0.1, 0.0),
        0.30,
    ),
    higher(
        MetricKey::GovernanceAuditScore,
        Category::Esg,
        tiers(0.9, 0.75, 0.6, 0.4, 0.2),
        0.35,
    ),
    // risk
    lower(
        MetricKey::CreditUtilization,
        Category::Risk,
        tiers(0.3, 0.5, 0.7, 0.85, 0.95),
        0.40,
    ),
    lower(
        MetricKey::ComplianceViolations,
        Category::Risk,
        tiers(0.0, 1.0, 2.0, 4.0, 6.0),
        0.30,
    ),
    lower(
        MetricKey::PaymentDelinquencyRate,
        Category::Risk,
        tiers(0.0, 0.01, 0.03, 0.06, 0.1),
        0.30,
    ),
];

/// The versioned metric table injected into every computation. Never a
/// process-global: callers hold one and pass it down, so two catalog
/// versions can coexist during a rollout.
#[derive(Debug, Clone, Copy)]
pub struct MetricCatalog {
    pub version: &'static str,
    pub metrics: &'static [MetricDefinition],
    pub category_weights: &'static [(Category, f64)],
}

impl MetricCatalog {
    pub fn standard() -> Self {
        Self {
            version: "v3",
            metrics: &STANDARD_METRICS,
            category_weights: &STANDARD_CATEGORY_WEIGHTS,
        }
    }

    pub fn metrics_in(&self, category: Category) -> impl Iterator<Item = &MetricDefinition> {
        self.metrics.iter().filter(move |m| m.category == category)
    }

    pub fn definition(&self, key: MetricKey) -> Option<&MetricDefinition> {
        self.metrics.iter().find(|m| m.key == key)
    }

    pub fn category_weight(&self, category: Category) -> f64 {
        self.category_weights
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, w)| *w)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn category_weights_sum_to_one() {
        let sum: f64 = STANDARD_CATEGORY_WEIGHTS.iter().map(|(_, w)| w).sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn metric_weights_sum_to_one_per_category() {
        let catalog = MetricCatalog::standard();
        for category in Category::iter() {
            let sum: f64 = catalog.metrics_in(category).map(|m| m.weight).sum();
            assert!(
                (sum - 1.0).abs() < 1e-6,
                "weights for {category} sum to {sum}"
            );
        }
    }

    #[test]
    fn tiers_are_strictly_ordered_with_direction() {
        for def in &STANDARD_METRICS {
            let t = def.tiers;
            let ordered = match def.direction {
                Direction::HigherIsBetter => {
                    t.excellent > t.good && t.good > t.fair && t.fair > t.poor && t.poor > t.critical
                }
                Direction::LowerIsBetter => {
                    t.excellent < t.good && t.good < t.fair && t.fair < t.poor && t.poor < t.critical
                }
            };
            assert!(ordered, "tiers out of order for {}", def.key);
        }
    }

    #[test]
    fn every_category_has_metrics() {
        let catalog = MetricCatalog::standard();
        for category in Category::iter() {
            assert!(catalog.metrics_in(category).count() >= 3);
            assert!(catalog.category_weight(category) > 0.0);
        }
    }

    #[test]
    fn revenue_growth_uses_published_tiers() {
        let catalog = MetricCatalog::standard();
        let def = catalog.definition(MetricKey::RevenueGrowth).unwrap();
        assert_eq!(def.tiers.excellent, 0.5);
        assert_eq!(def.tiers.good, 0.3);
        assert_eq!(def.tiers.fair, 0.15);
        assert_eq!(def.tiers.poor, 0.05);
        assert_eq!(def.tiers.critical, 0.0);
    }
}
