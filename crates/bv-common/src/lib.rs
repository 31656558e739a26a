pub mod api;
pub mod config;
pub mod db;
pub mod logging;
pub mod matching;
pub mod notify;
pub mod risk;
pub mod run_id;
pub mod schema;
pub mod scoring;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kinds of subjects the engine scores. Businesses carry the full metric
/// catalog; users (investors) go through the risk path.
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
pub enum SubjectKind {
    Business,
    User,
}

// Commonly used data models for scoring functions. Every raw field is
// optional: a missing column means "metric unavailable", never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessRecord {
    pub id: Option<i64>,
    // financial
    pub monthly_revenue: Option<f64>,
    pub previous_monthly_revenue: Option<f64>,
    pub monthly_expenses: Option<f64>,
    pub cash_balance: Option<f64>,
    pub outstanding_debt: Option<f64>,
    pub total_assets: Option<f64>,
    // operational
    pub active_customers: Option<f64>,
    pub previous_active_customers: Option<f64>,
    pub churned_customers: Option<f64>,
    pub on_time_delivery_rate: Option<f64>,
    // market
    pub market_share: Option<f64>,
    pub repeat_purchase_rate: Option<f64>,
    pub customer_lifetime_value: Option<f64>,
    pub customer_acquisition_cost: Option<f64>,
    // innovation
    pub rd_spend: Option<f64>,
    pub new_product_revenue: Option<f64>,
    pub digital_sales_share: Option<f64>,
    // esg
    pub emissions_intensity: Option<f64>,
    pub female_leadership_share: Option<f64>,
    pub governance_audit_score: Option<f64>,
    // risk & compliance
    pub credit_utilization: Option<f64>,
    pub compliance_violations: Option<f64>,
    pub payment_delinquency_rate: Option<f64>,
    // profile
    pub sectors: Vec<String>,
    pub country: Option<String>,
    pub funding_min: Option<f64>,
    pub funding_max: Option<f64>,
    pub last_active_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvestorProfile {
    pub id: Option<i64>,
    pub focus_sectors: Vec<String>,
    pub ticket_min: Option<f64>,
    pub ticket_max: Option<f64>,
    pub countries: Vec<String>,
    /// Risk appetite on the same 0..=1 scale assessments use.
    pub risk_tolerance: Option<f64>,
    /// How much ESG weighs for this investor, on the 0..=100 score scale.
    pub esg_priority: Option<f64>,
    pub last_active_at: Option<DateTime<Utc>>,
}

/// Matching-facing view of a business: its profile fields plus the latest
/// persisted risk/ESG outcomes, denormalized so ranking stays storage-free.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessMatchProfile {
    pub id: Option<i64>,
    pub sectors: Vec<String>,
    pub funding_min: Option<f64>,
    pub funding_max: Option<f64>,
    pub country: Option<String>,
    pub risk_score: Option<f64>,
    pub esg_score: Option<f64>,
    pub last_active_at: Option<DateTime<Utc>>,
}
