//! DDL for the `bvester` schema, applied through `db::migrations`.

/// Raw business records, the document-store side of scoring. NULL columns
/// mean "metric unavailable", never zero.
pub const BUSINESSES_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS bvester.businesses (
    id BIGSERIAL PRIMARY KEY,

    monthly_revenue DOUBLE PRECISION,
    previous_monthly_revenue DOUBLE PRECISION,
    monthly_expenses DOUBLE PRECISION,
    cash_balance DOUBLE PRECISION,
    outstanding_debt DOUBLE PRECISION,
    total_assets DOUBLE PRECISION,

    active_customers DOUBLE PRECISION,
    previous_active_customers DOUBLE PRECISION,
    churned_customers DOUBLE PRECISION,
    on_time_delivery_rate DOUBLE PRECISION,

    market_share DOUBLE PRECISION,
    repeat_purchase_rate DOUBLE PRECISION,
    customer_lifetime_value DOUBLE PRECISION,
    customer_acquisition_cost DOUBLE PRECISION,

    rd_spend DOUBLE PRECISION,
    new_product_revenue DOUBLE PRECISION,
    digital_sales_share DOUBLE PRECISION,

    emissions_intensity DOUBLE PRECISION,
    female_leadership_share DOUBLE PRECISION,
    governance_audit_score DOUBLE PRECISION,

    credit_utilization DOUBLE PRECISION,
    compliance_violations DOUBLE PRECISION,
    payment_delinquency_rate DOUBLE PRECISION,

    sectors TEXT[] NOT NULL DEFAULT '{}',
    country VARCHAR(2),
    funding_min DOUBLE PRECISION,
    funding_max DOUBLE PRECISION,
    last_active_at TIMESTAMPTZ,

    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
"#;

pub const INVESTORS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS bvester.investors (
    id BIGSERIAL PRIMARY KEY,

    focus_sectors TEXT[] NOT NULL DEFAULT '{}',
    ticket_min DOUBLE PRECISION,
    ticket_max DOUBLE PRECISION,
    countries TEXT[] NOT NULL DEFAULT '{}',
    risk_tolerance DOUBLE PRECISION,
    esg_priority DOUBLE PRECISION,
    last_active_at TIMESTAMPTZ,

    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_risk_tolerance_range
        CHECK (risk_tolerance IS NULL OR (risk_tolerance >= 0.0 AND risk_tolerance <= 1.0)),
    CONSTRAINT chk_esg_priority_range
        CHECK (esg_priority IS NULL OR (esg_priority >= 0.0 AND esg_priority <= 100.0))
);
"#;

/// Append-only composite-score snapshots. Versions are assigned on insert
/// and never rewritten; trend reads walk versions newest-first.
pub const SCORE_PROFILES_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS bvester.score_profiles (
    id BIGSERIAL PRIMARY KEY,
    subject_kind VARCHAR(16) NOT NULL,
    subject_id BIGINT NOT NULL,
    version INTEGER NOT NULL,

    computation_id VARCHAR(26) NOT NULL,
    categories JSONB NOT NULL,
    overall SMALLINT NOT NULL,
    band VARCHAR(20) NOT NULL,
    confidence DOUBLE PRECISION NOT NULL,

    computed_at TIMESTAMPTZ NOT NULL,
    engine_version VARCHAR(20) NOT NULL,
    catalog_version VARCHAR(20) NOT NULL,
    input_hash VARCHAR(16) NOT NULL,

    CONSTRAINT uq_score_profiles_version UNIQUE (subject_kind, subject_id, version),
    CONSTRAINT chk_overall_range CHECK (overall >= 0 AND overall <= 100),
    CONSTRAINT chk_confidence_range CHECK (confidence >= 0.0 AND confidence <= 1.0),
    CONSTRAINT chk_version_positive CHECK (version >= 1)
);

CREATE INDEX IF NOT EXISTS idx_score_profiles_subject
    ON bvester.score_profiles(subject_kind, subject_id, version DESC);
"#;

pub const RISK_ASSESSMENTS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS bvester.risk_assessments (
    id BIGSERIAL PRIMARY KEY,
    computation_id VARCHAR(26) NOT NULL,
    subject_kind VARCHAR(16) NOT NULL,
    subject_id BIGINT NOT NULL,

    patterns JSONB NOT NULL,
    overall DOUBLE PRECISION NOT NULL,
    level VARCHAR(10) NOT NULL,
    confidence DOUBLE PRECISION NOT NULL,
    requires_manual_review BOOLEAN NOT NULL DEFAULT false,

    status VARCHAR(30) NOT NULL DEFAULT 'completed',
    computed_at TIMESTAMPTZ NOT NULL,
    reviewed_at TIMESTAMPTZ,
    engine_version VARCHAR(20) NOT NULL,

    CONSTRAINT chk_overall_unit_range CHECK (overall >= 0.0 AND overall <= 1.0),
    CONSTRAINT chk_assessment_status CHECK (
        status IN ('pending', 'completed', 'reviewed_approved', 'reviewed_false_positive')
    )
);

CREATE INDEX IF NOT EXISTS idx_risk_assessments_subject
    ON bvester.risk_assessments(subject_kind, subject_id, computed_at DESC);
CREATE INDEX IF NOT EXISTS idx_risk_assessments_review
    ON bvester.risk_assessments(status) WHERE requires_manual_review;
"#;

/// Immutable ranked-match rows; one ranking run inserts its rows in a single
/// transaction keyed by `rank_run_id`.
pub const COMPATIBILITY_MATCHES_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS bvester.compatibility_matches (
    id BIGSERIAL PRIMARY KEY,
    rank_run_id VARCHAR(26) NOT NULL,
    investor_id BIGINT NOT NULL,
    business_id BIGINT NOT NULL,

    score SMALLINT NOT NULL,
    breakdown JSONB NOT NULL,
    computed_at TIMESTAMPTZ NOT NULL,

    CONSTRAINT chk_match_score_range CHECK (score >= 0 AND score <= 100)
);

CREATE INDEX IF NOT EXISTS idx_compatibility_matches_investor
    ON bvester.compatibility_matches(investor_id, computed_at DESC);
CREATE INDEX IF NOT EXISTS idx_compatibility_matches_run
    ON bvester.compatibility_matches(rank_run_id);
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_table_lives_in_the_bvester_schema() {
        for ddl in [
            BUSINESSES_DDL,
            INVESTORS_DDL,
            SCORE_PROFILES_DDL,
            RISK_ASSESSMENTS_DDL,
            COMPATIBILITY_MATCHES_DDL,
        ] {
            assert!(ddl.contains("bvester."), "table outside bvester schema");
            assert!(ddl.contains("IF NOT EXISTS"));
        }
    }

    #[test]
    fn append_only_tables_carry_their_invariants() {
        assert!(SCORE_PROFILES_DDL.contains("uq_score_profiles_version"));
        assert!(SCORE_PROFILES_DDL.contains("chk_overall_range"));
        assert!(RISK_ASSESSMENTS_DDL.contains("reviewed_false_positive"));
        assert!(COMPATIBILITY_MATCHES_DDL.contains("chk_match_score_range"));
    }
}
