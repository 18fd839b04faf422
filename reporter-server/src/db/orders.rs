//! Order/transaction view queries

use async_trait::async_trait;
use shared::ClosedRange;
use sqlx::PgPool;

use super::models::Order;
use super::{OrderStore, RepoResult};

const ORDER_COLUMNS: &str = "id, transaction, merchant_id, amount, currency, \
    status, payment_method, country_code, created_at, close_date";

/// Filter set for the merchant transaction listing.
///
/// Empty lists and zero date bounds mean "no filter" — the SQL below checks
/// for that explicitly so one prepared statement serves every combination.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderListQuery {
    pub merchant_id: String,
    pub statuses: Vec<String>,
    pub payment_methods: Vec<String>,
    /// Unix seconds; 0 = unbounded.
    pub date_from: i64,
    pub date_to: i64,
}

impl OrderListQuery {
    pub fn for_merchant(merchant_id: impl Into<String>) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            statuses: Vec::new(),
            payment_methods: Vec::new(),
            date_from: 0,
            date_to: 0,
        }
    }
}

pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn find_by_royalty_period(
        &self,
        merchant_id: &str,
        period: ClosedRange,
        statuses: &[String],
    ) -> RepoResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders
             WHERE merchant_id = $1
               AND close_date >= $2 AND close_date <= $3
               AND status = ANY($4)
             ORDER BY close_date ASC"
        ))
        .bind(merchant_id)
        .bind(period.from)
        .bind(period.to)
        .bind(statuses.to_vec())
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    async fn find_by_vat_window(
        &self,
        country: &str,
        window: ClosedRange,
    ) -> RepoResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders
             WHERE country_code = $1
               AND close_date >= $2 AND close_date <= $3
             ORDER BY close_date ASC"
        ))
        .bind(country)
        .bind(window.from)
        .bind(window.to)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    async fn find_by_merchant(&self, query: OrderListQuery) -> RepoResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders
             WHERE merchant_id = $1
               AND (cardinality($2::text[]) = 0 OR status = ANY($2))
               AND (cardinality($3::text[]) = 0 OR payment_method = ANY($3))
               AND ($4::bigint = 0 OR close_date >= $4)
               AND ($5::bigint = 0 OR close_date <= $5)
             ORDER BY close_date DESC"
        ))
        .bind(query.merchant_id)
        .bind(query.statuses)
        .bind(query.payment_methods)
        .bind(query.date_from)
        .bind(query.date_to)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }
}
