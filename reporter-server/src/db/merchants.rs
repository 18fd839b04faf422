//! Merchant record queries

use async_trait::async_trait;
use sqlx::PgPool;

use super::models::Merchant;
use super::{MerchantStore, RepoError, RepoResult};

pub struct PgMerchantStore {
    pool: PgPool,
}

impl PgMerchantStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MerchantStore for PgMerchantStore {
    async fn find_by_id(&self, id: &str) -> RepoResult<Merchant> {
        sqlx::query_as::<_, Merchant>(
            "SELECT id, company_name, company_address, registration_number,
                bank_name, bank_account, bank_swift, created_at
             FROM merchants
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("merchant {id}")))
    }
}
