//! Royalty report queries

use async_trait::async_trait;
use sqlx::PgPool;

use super::models::RoyaltyReport;
use super::{RepoError, RepoResult, RoyaltyReportStore};

pub struct PgRoyaltyReportStore {
    pool: PgPool,
}

impl PgRoyaltyReportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoyaltyReportStore for PgRoyaltyReportStore {
    async fn find_by_id(&self, id: &str) -> RepoResult<RoyaltyReport> {
        sqlx::query_as::<_, RoyaltyReport>(
            "SELECT id, merchant_id, currency, period_from, period_to,
                gross_amount, payout_amount, vat_amount, fee_amount,
                transactions_count, status, created_at
             FROM royalty_reports
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("royalty report {id}")))
    }
}
