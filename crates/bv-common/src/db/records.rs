//! Raw-record reads: the document-store side of the engine boundary.
//! NULL columns map to `None` so missing metrics stay "unavailable".

use deadpool_postgres::PoolError;
use tokio_postgres::{Error as PgError, Row};
use tracing::instrument;

use crate::db::PgPool;
use crate::{BusinessMatchProfile, BusinessRecord, InvestorProfile};

#[derive(Debug, thiserror::Error)]
pub enum RecordFetchError {
    #[error("failed to get postgres connection: {0}")]
    Pool(#[from] PoolError),
    #[error("postgres error: {0}")]
    Postgres(#[from] PgError),
}

fn business_from_row(row: &Row) -> BusinessRecord {
    BusinessRecord {
        id: Some(row.get("id")),
        monthly_revenue: row.get("monthly_revenue"),
        previous_monthly_revenue: row.get("previous_monthly_revenue"),
        monthly_expenses: row.get("monthly_expenses"),
        cash_balance: row.get("cash_balance"),
        outstanding_debt: row.get("outstanding_debt"),
        total_assets: row.get("total_assets"),
        active_customers: row.get("active_customers"),
        previous_active_customers: row.get("previous_active_customers"),
        churned_customers: row.get("churned_customers"),
        on_time_delivery_rate: row.get("on_time_delivery_rate"),
        market_share: row.get("market_share"),
        repeat_purchase_rate: row.get("repeat_purchase_rate"),
        customer_lifetime_value: row.get("customer_lifetime_value"),
        customer_acquisition_cost: row.get("customer_acquisition_cost"),
        rd_spend: row.get("rd_spend"),
        new_product_revenue: row.get("new_product_revenue"),
        digital_sales_share: row.get("digital_sales_share"),
        emissions_intensity: row.get("emissions_intensity"),
        female_leadership_share: row.get("female_leadership_share"),
        governance_audit_score: row.get("governance_audit_score"),
        credit_utilization: row.get("credit_utilization"),
        compliance_violations: row.get("compliance_violations"),
        payment_delinquency_rate: row.get("payment_delinquency_rate"),
        sectors: row.get("sectors"),
        country: row.get("country"),
        funding_min: row.get("funding_min"),
        funding_max: row.get("funding_max"),
        last_active_at: row.get("last_active_at"),
    }
}

#[instrument(skip(pool))]
pub async fn fetch_business(
    pool: &PgPool,
    business_id: i64,
) -> Result<Option<BusinessRecord>, RecordFetchError> {
    let client = pool.get().await?;
    let stmt = client
        .prepare_cached("SELECT * FROM bvester.businesses WHERE id = $1")
        .await?;
    let row = client.query_opt(&stmt, &[&business_id]).await?;
    Ok(row.as_ref().map(business_from_row))
}

#[instrument(skip(pool))]
pub async fn fetch_investor(
    pool: &PgPool,
    investor_id: i64,
) -> Result<Option<InvestorProfile>, RecordFetchError> {
    let client = pool.get().await?;
    let stmt = client
        .prepare_cached(
            "SELECT id, focus_sectors, ticket_min, ticket_max, countries,
                    risk_tolerance, esg_priority, last_active_at
             FROM bvester.investors WHERE id = $1",
        )
        .await?;
    let row = client.query_opt(&stmt, &[&investor_id]).await?;

    Ok(row.map(|row| InvestorProfile {
        id: Some(row.get("id")),
        focus_sectors: row.get("focus_sectors"),
        ticket_min: row.get("ticket_min"),
        ticket_max: row.get("ticket_max"),
        countries: row.get("countries"),
        risk_tolerance: row.get("risk_tolerance"),
        esg_priority: row.get("esg_priority"),
        last_active_at: row.get("last_active_at"),
    }))
}

/// Matching-facing candidate rows: profile fields plus the latest persisted
/// risk and ESG outcomes, denormalized in one query so ranking itself stays
/// storage-free.
#[instrument(skip(pool))]
pub async fn fetch_match_candidates(
    pool: &PgPool,
) -> Result<Vec<BusinessMatchProfile>, RecordFetchError> {
    let client = pool.get().await?;
    let stmt = client
        .prepare_cached(
            "SELECT
                b.id,
                b.sectors,
                b.funding_min,
                b.funding_max,
                b.country,
                b.last_active_at,
                ra.overall AS risk_score,
                (sp.categories #>> '{esg,score}')::DOUBLE PRECISION AS esg_score
             FROM bvester.businesses b
             LEFT JOIN LATERAL (
                SELECT overall FROM bvester.risk_assessments
                WHERE subject_kind = 'business' AND subject_id = b.id
                ORDER BY computed_at DESC LIMIT 1
             ) ra ON true
             LEFT JOIN LATERAL (
                SELECT categories FROM bvester.score_profiles
                WHERE subject_kind = 'business' AND subject_id = b.id
                ORDER BY version DESC LIMIT 1
             ) sp ON true
             ORDER BY b.id",
        )
        .await?;
    let rows = client.query(&stmt, &[]).await?;

    Ok(rows
        .into_iter()
        .map(|row| BusinessMatchProfile {
            id: Some(row.get("id")),
            sectors: row.get("sectors"),
            funding_min: row.get("funding_min"),
            funding_max: row.get("funding_max"),
            country: row.get("country"),
            risk_score: row.get("risk_score"),
            esg_score: row.get("esg_score"),
            last_active_at: row.get("last_active_at"),
        })
        .collect())
}
