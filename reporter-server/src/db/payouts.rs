//! Payout document queries

use async_trait::async_trait;
use sqlx::PgPool;

use super::models::Payout;
use super::{PayoutStore, RepoError, RepoResult};

pub struct PgPayoutStore {
    pool: PgPool,
}

impl PgPayoutStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PayoutStore for PgPayoutStore {
    async fn find_by_id(&self, id: &str) -> RepoResult<Payout> {
        sqlx::query_as::<_, Payout>(
            "SELECT id, merchant_id, amount, currency, period_from, period_to,
                arrival_date, status, destination_bank_name,
                destination_account, destination_swift, created_at
             FROM payouts
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("payout {id}")))
    }
}
