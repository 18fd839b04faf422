//! VAT report queries

use async_trait::async_trait;
use sqlx::PgPool;

use super::models::VatReport;
use super::{RepoError, RepoResult, VatReportStore};

pub struct PgVatReportStore {
    pool: PgPool,
}

impl PgVatReportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VatReportStore for PgVatReportStore {
    async fn find_by_id(&self, id: &str) -> RepoResult<VatReport> {
        sqlx::query_as::<_, VatReport>(
            "SELECT id, country, currency, date_from, date_to,
                gross_revenue, vat_amount, fees_amount, deduction_amount,
                transactions_count, status, created_at
             FROM vat_reports
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("vat report {id}")))
    }
}
