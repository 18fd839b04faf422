//! In-memory fakes and fixtures for builder tests.

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use shared::{ClosedRange, OutputFormat, ReportRequest, ReportType};
use std::sync::{Arc, Mutex};

use crate::db::models::{Merchant, Order, Payout, RoyaltyReport, VatReport};
use crate::db::{
    MerchantStore, OrderListQuery, OrderStore, PayoutStore, RepoError, RepoResult, Repositories,
    RoyaltyReportStore, VatReportStore,
};
use crate::services::{BillingRpc, OperatingCompany, RpcError};

use super::{BuildContext, BuilderSettings};

pub const TEST_ID: &str = "5daf87cdaa4f13bd268a8c25";
pub const SENTINEL: f64 = 999_999_999.0;

pub struct FakeRoyaltyReports(pub Option<RoyaltyReport>);

#[async_trait]
impl RoyaltyReportStore for FakeRoyaltyReports {
    async fn find_by_id(&self, id: &str) -> RepoResult<RoyaltyReport> {
        self.0
            .clone()
            .ok_or_else(|| RepoError::NotFound(format!("royalty report {id}")))
    }
}

pub struct FakeVatReports(pub Option<VatReport>);

#[async_trait]
impl VatReportStore for FakeVatReports {
    async fn find_by_id(&self, id: &str) -> RepoResult<VatReport> {
        self.0
            .clone()
            .ok_or_else(|| RepoError::NotFound(format!("vat report {id}")))
    }
}

pub struct FakePayouts(pub Option<Payout>);

#[async_trait]
impl PayoutStore for FakePayouts {
    async fn find_by_id(&self, id: &str) -> RepoResult<Payout> {
        self.0
            .clone()
            .ok_or_else(|| RepoError::NotFound(format!("payout {id}")))
    }
}

pub struct FakeMerchants(pub Option<Merchant>);

#[async_trait]
impl MerchantStore for FakeMerchants {
    async fn find_by_id(&self, id: &str) -> RepoResult<Merchant> {
        self.0
            .clone()
            .ok_or_else(|| RepoError::NotFound(format!("merchant {id}")))
    }
}

/// Exact adapter invocations, captured for assertion.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderCall {
    RoyaltyPeriod {
        merchant_id: String,
        period: ClosedRange,
        statuses: Vec<String>,
    },
    VatWindow {
        country: String,
        window: ClosedRange,
    },
    Merchant(OrderListQuery),
}

#[derive(Default)]
pub struct FakeOrders {
    pub orders: Vec<Order>,
    pub calls: Mutex<Vec<OrderCall>>,
}

impl FakeOrders {
    pub fn with_orders(orders: Vec<Order>) -> Self {
        Self {
            orders,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded(&self) -> Vec<OrderCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderStore for FakeOrders {
    async fn find_by_royalty_period(
        &self,
        merchant_id: &str,
        period: ClosedRange,
        statuses: &[String],
    ) -> RepoResult<Vec<Order>> {
        self.calls.lock().unwrap().push(OrderCall::RoyaltyPeriod {
            merchant_id: merchant_id.to_string(),
            period,
            statuses: statuses.to_vec(),
        });
        Ok(self.orders.clone())
    }

    async fn find_by_vat_window(
        &self,
        country: &str,
        window: ClosedRange,
    ) -> RepoResult<Vec<Order>> {
        self.calls.lock().unwrap().push(OrderCall::VatWindow {
            country: country.to_string(),
            window,
        });
        Ok(self.orders.clone())
    }

    async fn find_by_merchant(&self, query: OrderListQuery) -> RepoResult<Vec<Order>> {
        self.calls
            .lock()
            .unwrap()
            .push(OrderCall::Merchant(query));
        Ok(self.orders.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BillingCall {
    OperatingCompany(String),
    ReportComplete { file_id: String, location: String },
    PayoutDocument { payout_id: String, location: String },
    Agreement { merchant_id: String, location: String },
}

#[derive(Default)]
pub struct FakeBilling {
    pub company: Option<OperatingCompany>,
    /// When set, mutation calls come back as business rejections.
    pub reject_with: Option<String>,
    pub calls: Mutex<Vec<BillingCall>>,
}

impl FakeBilling {
    pub fn recorded(&self) -> Vec<BillingCall> {
        self.calls.lock().unwrap().clone()
    }

    fn mutation_result(&self) -> Result<(), RpcError> {
        match &self.reject_with {
            Some(message) => Err(RpcError::Business(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BillingRpc for FakeBilling {
    async fn operating_company(
        &self,
        merchant_id: &str,
    ) -> Result<Option<OperatingCompany>, RpcError> {
        self.calls
            .lock()
            .unwrap()
            .push(BillingCall::OperatingCompany(merchant_id.to_string()));
        Ok(self.company.clone())
    }

    async fn report_file_complete(
        &self,
        file_id: &str,
        location: &str,
        _retention_secs: i64,
    ) -> Result<(), RpcError> {
        self.calls.lock().unwrap().push(BillingCall::ReportComplete {
            file_id: file_id.to_string(),
            location: location.to_string(),
        });
        self.mutation_result()
    }

    async fn set_payout_document(
        &self,
        payout_id: &str,
        location: &str,
        _retention_secs: i64,
    ) -> Result<(), RpcError> {
        self.calls.lock().unwrap().push(BillingCall::PayoutDocument {
            payout_id: payout_id.to_string(),
            location: location.to_string(),
        });
        self.mutation_result()
    }

    async fn attach_agreement(
        &self,
        merchant_id: &str,
        location: &str,
        _retention_secs: i64,
    ) -> Result<(), RpcError> {
        self.calls.lock().unwrap().push(BillingCall::Agreement {
            merchant_id: merchant_id.to_string(),
            location: location.to_string(),
        });
        self.mutation_result()
    }
}

/// Canned stored data the fakes serve.
#[derive(Default)]
pub struct TestData {
    pub orders: Vec<Order>,
    pub royalty: Option<RoyaltyReport>,
    pub vat: Option<VatReport>,
    pub payout: Option<Payout>,
    pub merchant: Option<Merchant>,
    pub company: Option<OperatingCompany>,
}

pub struct TestDeps {
    pub orders: Arc<FakeOrders>,
    pub billing: Arc<FakeBilling>,
    pub repos: Repositories,
}

pub fn deps_with(data: TestData) -> TestDeps {
    let orders = Arc::new(FakeOrders::with_orders(data.orders));
    let billing = Arc::new(FakeBilling {
        company: data.company,
        ..FakeBilling::default()
    });
    let repos = Repositories {
        royalty_reports: Arc::new(FakeRoyaltyReports(data.royalty)),
        vat_reports: Arc::new(FakeVatReports(data.vat)),
        payouts: Arc::new(FakePayouts(data.payout)),
        merchants: Arc::new(FakeMerchants(data.merchant)),
        orders: orders.clone(),
    };
    TestDeps {
        orders,
        billing,
        repos,
    }
}

pub fn deps() -> TestDeps {
    deps_with(TestData::default())
}

pub fn context(deps: &TestDeps, request: ReportRequest) -> BuildContext {
    BuildContext {
        request,
        repos: deps.repos.clone(),
        billing: deps.billing.clone(),
        settings: BuilderSettings {
            tariff_unbounded_sentinel: SENTINEL,
        },
    }
}

pub fn request(kind: ReportType, params: Map<String, Value>) -> ReportRequest {
    ReportRequest {
        id: TEST_ID.to_string(),
        report_type: kind,
        merchant_id: None,
        template_id: Some("tpl-test".to_string()),
        output_format: OutputFormat::Xlsx,
        params,
    }
}

/// Request with minimally-valid parameters for the kind.
pub fn request_for_kind(kind: ReportType) -> ReportRequest {
    let mut req = request(kind, valid_params(kind));
    if kind == ReportType::Transactions || kind == ReportType::Agreement {
        req.merchant_id = Some("merchant-1".to_string());
    }
    req
}

pub fn context_for_kind(kind: ReportType) -> BuildContext {
    context(&deps(), request_for_kind(kind))
}

pub fn valid_params(kind: ReportType) -> Map<String, Value> {
    let value = match kind {
        ReportType::Vat
        | ReportType::VatTransactions
        | ReportType::Royalty
        | ReportType::RoyaltyTransactions
        | ReportType::Payout => json!({ "id": TEST_ID }),
        ReportType::Transactions | ReportType::Tax => json!({}),
        ReportType::Agreement => agreement_params(),
    };
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

pub fn agreement_params() -> Value {
    json!({
        "name": "Roga & Kopyta LLC",
        "address": "Pushkina 7, Moscow",
        "registration_number": "7710140679",
        "home_region": "russia_and_cis",
        "bank_name": "Alpha Bank",
        "bank_account": "40702810400000012345",
        "payout_currency": "USD",
        "payout_cost": 25.0,
        "minimal_payout_limit": 1000.0,
        "tariff_rates": [
            { "min_amount": 0.0, "max_amount": 4999.99, "percent_fee": 5.0, "fixed_fee": 0.35 },
            { "min_amount": 5000.0, "max_amount": SENTINEL, "percent_fee": 2.5, "fixed_fee": 0.2 },
        ],
        "oc_name": "Northwind Processing OU",
        "oc_address": "Tornimae 5, Tallinn",
    })
}

pub fn order(close_date: i64) -> Order {
    Order {
        id: format!("order-{close_date}"),
        transaction: format!("TX-{close_date}"),
        merchant_id: "merchant-1".to_string(),
        amount: 150.0,
        currency: "USD".to_string(),
        status: "processed".to_string(),
        payment_method: "card".to_string(),
        country_code: "FI".to_string(),
        created_at: close_date - 60,
        close_date,
    }
}

pub fn royalty_report() -> RoyaltyReport {
    RoyaltyReport {
        id: TEST_ID.to_string(),
        merchant_id: "merchant-1".to_string(),
        currency: "USD".to_string(),
        period_from: 1_571_225_221,
        period_to: 1_573_817_221,
        gross_amount: 12_500.0,
        payout_amount: 11_800.0,
        vat_amount: 450.0,
        fee_amount: 250.0,
        transactions_count: 83,
        status: "accepted".to_string(),
        created_at: 1_573_900_000,
    }
}

pub fn vat_report() -> VatReport {
    VatReport {
        id: TEST_ID.to_string(),
        country: "FI".to_string(),
        currency: "EUR".to_string(),
        date_from: 1_571_225_221,
        date_to: 1_573_817_221,
        gross_revenue: 9_300.0,
        vat_amount: 2_232.0,
        fees_amount: 180.0,
        deduction_amount: 0.0,
        transactions_count: 61,
        status: "threshold".to_string(),
        created_at: 1_573_900_000,
    }
}

pub fn payout() -> Payout {
    Payout {
        id: TEST_ID.to_string(),
        merchant_id: "merchant-1".to_string(),
        amount: 11_800.556,
        currency: "USD".to_string(),
        period_from: 1_571_225_221,
        period_to: 1_573_817_221,
        arrival_date: 1_574_300_000,
        status: "pending".to_string(),
        destination_bank_name: "Alpha Bank".to_string(),
        destination_account: "40702810400000012345".to_string(),
        destination_swift: "ALFARUMM".to_string(),
        created_at: 1_573_900_000,
    }
}

pub fn merchant() -> Merchant {
    Merchant {
        id: "merchant-1".to_string(),
        company_name: "Roga & Kopyta LLC".to_string(),
        company_address: "Pushkina 7, Moscow".to_string(),
        registration_number: "7710140679".to_string(),
        bank_name: "Alpha Bank".to_string(),
        bank_account: "40702810400000012345".to_string(),
        bank_swift: "ALFARUMM".to_string(),
        created_at: 1_550_000_000,
    }
}

pub fn company() -> OperatingCompany {
    OperatingCompany {
        id: "oc-1".to_string(),
        name: "Northwind Processing OU".to_string(),
        address: "Tornimae 5, Tallinn".to_string(),
        registration_number: "14628288".to_string(),
    }
}
