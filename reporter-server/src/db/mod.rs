//! Database access layer
//!
//! Read-only query adapters over the five logical collections the report
//! pipeline draws from: royalty reports, VAT reports, payouts, merchants and
//! the order/transaction view. Each adapter is a trait so builders can be
//! exercised against in-memory fakes; the Postgres implementations live in
//! the sibling modules.

pub mod merchants;
pub mod models;
pub mod orders;
pub mod payouts;
pub mod royalty_reports;
pub mod vat_reports;

pub use merchants::PgMerchantStore;
pub use orders::{OrderListQuery, PgOrderStore};
pub use payouts::PgPayoutStore;
pub use royalty_reports::PgRoyaltyReportStore;
pub use vat_reports::PgVatReportStore;

use async_trait::async_trait;
use shared::ClosedRange;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use thiserror::Error;

use models::{Merchant, Order, Payout, RoyaltyReport, VatReport};

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

#[async_trait]
pub trait RoyaltyReportStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> RepoResult<RoyaltyReport>;
}

#[async_trait]
pub trait VatReportStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> RepoResult<VatReport>;
}

#[async_trait]
pub trait PayoutStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> RepoResult<Payout>;
}

#[async_trait]
pub trait MerchantStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> RepoResult<Merchant>;
}

/// Order/transaction view queries.
///
/// Period-bounded queries sort ascending by close date; the merchant listing
/// sorts descending (latest first).
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Orders inside a royalty period: inclusive `[from, to]` close-date
    /// range, one merchant, status allow-list.
    async fn find_by_royalty_period(
        &self,
        merchant_id: &str,
        period: ClosedRange,
        statuses: &[String],
    ) -> RepoResult<Vec<Order>>;

    /// Orders inside a VAT window: inclusive day-boundary close-date range
    /// plus exact country match.
    async fn find_by_vat_window(
        &self,
        country: &str,
        window: ClosedRange,
    ) -> RepoResult<Vec<Order>>;

    /// Merchant transaction listing with optional filters; empty lists and
    /// zero bounds mean "no filter".
    async fn find_by_merchant(&self, query: OrderListQuery) -> RepoResult<Vec<Order>>;
}

/// 仓储适配器集合 - 初始化后只读，跨任务并发安全
#[derive(Clone)]
pub struct Repositories {
    pub royalty_reports: Arc<dyn RoyaltyReportStore>,
    pub vat_reports: Arc<dyn VatReportStore>,
    pub payouts: Arc<dyn PayoutStore>,
    pub merchants: Arc<dyn MerchantStore>,
    pub orders: Arc<dyn OrderStore>,
}

impl Repositories {
    /// Postgres-backed adapter set over one shared pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            royalty_reports: Arc::new(PgRoyaltyReportStore::new(pool.clone())),
            vat_reports: Arc::new(PgVatReportStore::new(pool.clone())),
            payouts: Arc::new(PgPayoutStore::new(pool.clone())),
            merchants: Arc::new(PgMerchantStore::new(pool.clone())),
            orders: Arc::new(PgOrderStore::new(pool)),
        }
    }
}

/// 建立 PostgreSQL 连接池
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}
