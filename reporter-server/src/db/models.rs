//! Typed records returned by the repository adapters.
//!
//! All timestamps are unix seconds (UTC); monetary amounts are plain f64 and
//! only formatted to fixed decimals at render time.

use serde::{Deserialize, Serialize};

/// 版税报表
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RoyaltyReport {
    pub id: String,
    pub merchant_id: String,
    pub currency: String,
    /// Report period, inclusive both ends (unix seconds).
    pub period_from: i64,
    pub period_to: i64,
    pub gross_amount: f64,
    pub payout_amount: f64,
    pub vat_amount: f64,
    pub fee_amount: f64,
    pub transactions_count: i64,
    pub status: String,
    pub created_at: i64,
}

/// VAT 报表
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VatReport {
    pub id: String,
    pub country: String,
    pub currency: String,
    /// Report window in days (unix seconds at day precision).
    pub date_from: i64,
    pub date_to: i64,
    pub gross_revenue: f64,
    pub vat_amount: f64,
    pub fees_amount: f64,
    pub deduction_amount: f64,
    pub transactions_count: i64,
    pub status: String,
    pub created_at: i64,
}

/// 结算单
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Payout {
    pub id: String,
    pub merchant_id: String,
    pub amount: f64,
    pub currency: String,
    pub period_from: i64,
    pub period_to: i64,
    /// Expected funds arrival date (unix seconds).
    pub arrival_date: i64,
    pub status: String,
    pub destination_bank_name: String,
    pub destination_account: String,
    pub destination_swift: String,
    pub created_at: i64,
}

/// 商户档案
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Merchant {
    pub id: String,
    pub company_name: String,
    pub company_address: String,
    pub registration_number: String,
    pub bank_name: String,
    pub bank_account: String,
    pub bank_swift: String,
    pub created_at: i64,
}

/// 订单/交易只读视图
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: String,
    /// Human-facing transaction number.
    pub transaction: String,
    pub merchant_id: String,
    pub amount: f64,
    pub currency: String,
    pub status: String,
    pub payment_method: String,
    pub country_code: String,
    pub created_at: i64,
    /// Close timestamp every period query filters and sorts on.
    pub close_date: i64,
}
