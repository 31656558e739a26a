use super::catalog::MetricKey;
use super::ScoreError;
use crate::{BusinessRecord, SubjectKind};

/// Division guard for ratio metrics. A zero or non-finite denominator maps
/// to 0 instead of raising or leaking NaN/Infinity into the tier walk.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() || !numerator.is_finite() {
        return 0.0;
    }
    let ratio = numerator / denominator;
    if ratio.is_finite() {
        ratio
    } else {
        0.0
    }
}

/// Relative change against a baseline; a zero baseline yields 0, not an
/// infinite growth figure.
pub fn growth_rate(current: f64, previous: f64) -> f64 {
    safe_ratio(current - previous, previous)
}

fn both(a: Option<f64>, b: Option<f64>) -> Option<(f64, f64)> {
    Some((a?, b?))
}

/// Derives one metric value from the raw record. `None` means the metric is
/// unavailable for this subject and must be excluded, never scored as zero.
/// Churn is the documented exception: absent churn events mean zero churn.
pub fn metric_value(record: &BusinessRecord, key: MetricKey) -> Option<f64> {
    match key {
        MetricKey::RevenueGrowth => {
            both(record.monthly_revenue, record.previous_monthly_revenue)
                .map(|(current, previous)| growth_rate(current, previous))
        }
        MetricKey::ProfitMargin => both(record.monthly_revenue, record.monthly_expenses)
            .map(|(revenue, expenses)| safe_ratio(revenue - expenses, revenue)),
        MetricKey::DebtToAssets => both(record.outstanding_debt, record.total_assets)
            .map(|(debt, assets)| safe_ratio(debt, assets)),
        MetricKey::CashRunwayMonths => both(record.cash_balance, record.monthly_expenses)
            .map(|(cash, expenses)| safe_ratio(cash, expenses)),
        MetricKey::CustomerGrowth => {
            both(record.active_customers, record.previous_active_customers)
                .map(|(current, previous)| growth_rate(current, previous))
        }
        MetricKey::ChurnRate => record
            .active_customers
            .map(|active| safe_ratio(record.churned_customers.unwrap_or(0.0), active)),
        MetricKey::OnTimeDeliveryRate => record.on_time_delivery_rate,
        MetricKey::MarketShare => record.market_share,
        MetricKey::RepeatPurchaseRate => record.repeat_purchase_rate,
        MetricKey::LtvToCac => both(
            record.customer_lifetime_value,
            record.customer_acquisition_cost,
        )
        .map(|(ltv, cac)| safe_ratio(ltv, cac)),
        MetricKey::RdIntensity => both(record.rd_spend, record.monthly_revenue)
            .map(|(spend, revenue)| safe_ratio(spend, revenue)),
        MetricKey::NewProductRevenueShare => {
            both(record.new_product_revenue, record.monthly_revenue)
                .map(|(new_revenue, revenue)| safe_ratio(new_revenue, revenue))
        }
        MetricKey::DigitalSalesShare => record.digital_sales_share,
        MetricKey::EmissionsIntensity => record.emissions_intensity,
        MetricKey::FemaleLeadershipShare => record.female_leadership_share,
        MetricKey::GovernanceAuditScore => record.governance_audit_score,
        MetricKey::CreditUtilization => record.credit_utilization,
        MetricKey::ComplianceViolations => record.compliance_violations,
        MetricKey::PaymentDelinquencyRate => record.payment_delinquency_rate,
    }
}

/// Rejects malformed raw values before any computation touches them.
pub fn validate_record(
    kind: SubjectKind,
    subject_id: i64,
    record: &BusinessRecord,
) -> Result<(), ScoreError> {
    let non_negative: [(&'static str, Option<f64>); 14] = [
        ("monthly_revenue", record.monthly_revenue),
        ("previous_monthly_revenue", record.previous_monthly_revenue),
        ("monthly_expenses", record.monthly_expenses),
        ("cash_balance", record.cash_balance),
        ("outstanding_debt", record.outstanding_debt),
        ("total_assets", record.total_assets),
        ("active_customers", record.active_customers),
        ("previous_active_customers", record.previous_active_customers),
        ("churned_customers", record.churned_customers),
        ("customer_lifetime_value", record.customer_lifetime_value),
        ("customer_acquisition_cost", record.customer_acquisition_cost),
        ("rd_spend", record.rd_spend),
        ("emissions_intensity", record.emissions_intensity),
        ("compliance_violations", record.compliance_violations),
    ];
    for (field, value) in non_negative {
        if let Some(v) = value {
            check_finite(kind, subject_id, field, v)?;
            if v < 0.0 {
                return Err(ScoreError::InvalidInput {
                    kind,
                    subject_id,
                    field,
                    value: v,
                    reason: "negative",
                });
            }
        }
    }

    let unit_interval: [(&'static str, Option<f64>); 8] = [
        ("on_time_delivery_rate", record.on_time_delivery_rate),
        ("market_share", record.market_share),
        ("repeat_purchase_rate", record.repeat_purchase_rate),
        ("digital_sales_share", record.digital_sales_share),
        ("female_leadership_share", record.female_leadership_share),
        ("governance_audit_score", record.governance_audit_score),
        ("credit_utilization", record.credit_utilization),
        ("payment_delinquency_rate", record.payment_delinquency_rate),
    ];
    for (field, value) in unit_interval {
        if let Some(v) = value {
            check_finite(kind, subject_id, field, v)?;
            if !(0.0..=1.0).contains(&v) {
                return Err(ScoreError::InvalidInput {
                    kind,
                    subject_id,
                    field,
                    value: v,
                    reason: "outside [0, 1]",
                });
            }
        }
    }

    // new_product_revenue may legitimately exceed revenue in a pivot month,
    // so it only gets the finiteness check.
    if let Some(v) = record.new_product_revenue {
        check_finite(kind, subject_id, "new_product_revenue", v)?;
    }

    Ok(())
}

fn check_finite(
    kind: SubjectKind,
    subject_id: i64,
    field: &'static str,
    value: f64,
) -> Result<(), ScoreError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ScoreError::InvalidInput {
            kind,
            subject_id,
            field,
            value,
            reason: "not finite",
        })
    }
}
