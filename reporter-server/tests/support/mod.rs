//! Shared in-memory collaborators for integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use reporter_server::broker::{BrokerLink, broker_channel};
use reporter_server::core::{Config, ServerState, TemplateConfig};
use reporter_server::db::models::{Merchant, Order, Payout, RoyaltyReport, VatReport};
use reporter_server::db::{
    MerchantStore, OrderListQuery, OrderStore, PayoutStore, RepoError, RepoResult, Repositories,
    RoyaltyReportStore, VatReportStore,
};
use reporter_server::services::{
    BillingRpc, FileLocation, FileStorage, OperatingCompany, RenderError, Renderer, RpcError,
    StorageError,
};
use shared::{ClosedRange, OutputFormat, RenderPayload};

pub const TEST_ID: &str = "5daf87cdaa4f13bd268a8c25";

/// Stored data the fakes serve.
#[derive(Default)]
pub struct Seed {
    pub royalty: Option<RoyaltyReport>,
    pub vat: Option<VatReport>,
    pub payout: Option<Payout>,
    pub merchant: Option<Merchant>,
    pub company: Option<OperatingCompany>,
    pub orders: Vec<Order>,
}

struct MemRoyalty(Option<RoyaltyReport>);

#[async_trait]
impl RoyaltyReportStore for MemRoyalty {
    async fn find_by_id(&self, id: &str) -> RepoResult<RoyaltyReport> {
        self.0
            .clone()
            .ok_or_else(|| RepoError::NotFound(format!("royalty report {id}")))
    }
}

struct MemVat(Option<VatReport>);

#[async_trait]
impl VatReportStore for MemVat {
    async fn find_by_id(&self, id: &str) -> RepoResult<VatReport> {
        self.0
            .clone()
            .ok_or_else(|| RepoError::NotFound(format!("vat report {id}")))
    }
}

struct MemPayouts(Option<Payout>);

#[async_trait]
impl PayoutStore for MemPayouts {
    async fn find_by_id(&self, id: &str) -> RepoResult<Payout> {
        self.0
            .clone()
            .ok_or_else(|| RepoError::NotFound(format!("payout {id}")))
    }
}

struct MemMerchants(Option<Merchant>);

#[async_trait]
impl MerchantStore for MemMerchants {
    async fn find_by_id(&self, id: &str) -> RepoResult<Merchant> {
        self.0
            .clone()
            .ok_or_else(|| RepoError::NotFound(format!("merchant {id}")))
    }
}

struct MemOrders(Vec<Order>);

#[async_trait]
impl OrderStore for MemOrders {
    async fn find_by_royalty_period(
        &self,
        merchant_id: &str,
        period: ClosedRange,
        statuses: &[String],
    ) -> RepoResult<Vec<Order>> {
        Ok(self
            .0
            .iter()
            .filter(|o| {
                o.merchant_id == merchant_id
                    && period.contains(o.close_date)
                    && statuses.contains(&o.status)
            })
            .cloned()
            .collect())
    }

    async fn find_by_vat_window(
        &self,
        country: &str,
        window: ClosedRange,
    ) -> RepoResult<Vec<Order>> {
        Ok(self
            .0
            .iter()
            .filter(|o| o.country_code == country && window.contains(o.close_date))
            .cloned()
            .collect())
    }

    async fn find_by_merchant(&self, query: OrderListQuery) -> RepoResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .0
            .iter()
            .filter(|o| o.merchant_id == query.merchant_id)
            .cloned()
            .collect();
        orders.sort_by_key(|o| std::cmp::Reverse(o.close_date));
        Ok(orders)
    }
}

/// Renderer stub: records every payload, answers with canned bytes.
pub struct StubRenderer {
    pub bytes: Vec<u8>,
    pub calls: Mutex<Vec<(RenderPayload, OutputFormat)>>,
}

#[async_trait]
impl Renderer for StubRenderer {
    async fn render(
        &self,
        payload: &RenderPayload,
        format: OutputFormat,
    ) -> Result<Vec<u8>, RenderError> {
        self.calls.lock().unwrap().push((payload.clone(), format));
        Ok(self.bytes.clone())
    }
}

/// Bucket stub: keeps uploaded objects in a map.
#[derive(Default)]
pub struct MemStorage {
    pub objects: Mutex<HashMap<String, Vec<u8>>>,
}

#[async_trait]
impl FileStorage for MemStorage {
    async fn put(&self, object_name: &str, bytes: &[u8]) -> Result<FileLocation, StorageError> {
        self.objects
            .lock()
            .unwrap()
            .insert(object_name.to_string(), bytes.to_vec());
        Ok(FileLocation {
            bucket: "test-bucket".to_string(),
            key: object_name.to_string(),
            url: format!("s3://test-bucket/{object_name}"),
        })
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
pub struct RecordingBilling {
    pub company: Option<OperatingCompany>,
    pub calls: Mutex<Vec<BillingCall>>,
}

#[async_trait]
impl BillingRpc for RecordingBilling {
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
        Ok(())
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
        Ok(())
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
        Ok(())
    }
}

pub struct Harness {
    pub state: ServerState,
    pub link: BrokerLink,
    pub renderer: Arc<StubRenderer>,
    pub storage: Arc<MemStorage>,
    pub billing: Arc<RecordingBilling>,
}

pub fn test_config() -> Config {
    Config {
        http_port: 0,
        broker_url: "ws://localhost:4222".to_string(),
        database_url: "postgres://localhost/reporter_test".to_string(),
        renderer_url: "http://localhost:3005".to_string(),
        billing_url: "http://localhost:3010".to_string(),
        s3_bucket: "test-bucket".to_string(),
        document_retention_secs: 604_800,
        environment: "test".to_string(),
        templates: TemplateConfig {
            vat: "tpl-vat".to_string(),
            vat_transactions: "tpl-vat-transactions".to_string(),
            royalty: "tpl-royalty".to_string(),
            royalty_transactions: "tpl-royalty-transactions".to_string(),
            transactions: "tpl-transactions".to_string(),
            payout: "tpl-payout".to_string(),
            agreement: "tpl-agreement".to_string(),
            tax: "tpl-tax".to_string(),
        },
        tariff_unbounded_sentinel: 999_999_999.0,
    }
}

pub fn harness(seed: Seed) -> Harness {
    let renderer = Arc::new(StubRenderer {
        bytes: b"%rendered-document%".to_vec(),
        calls: Mutex::new(Vec::new()),
    });
    let storage = Arc::new(MemStorage::default());
    let billing = Arc::new(RecordingBilling {
        company: seed.company,
        ..RecordingBilling::default()
    });

    let repos = Repositories {
        royalty_reports: Arc::new(MemRoyalty(seed.royalty)),
        vat_reports: Arc::new(MemVat(seed.vat)),
        payouts: Arc::new(MemPayouts(seed.payout)),
        merchants: Arc::new(MemMerchants(seed.merchant)),
        orders: Arc::new(MemOrders(seed.orders)),
    };

    let (publisher, link) = broker_channel();
    let state = ServerState::new(
        test_config(),
        repos,
        billing.clone(),
        renderer.clone(),
        storage.clone(),
        publisher,
    );

    Harness {
        state,
        link,
        renderer,
        storage,
        billing,
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

pub fn order(close_date: i64) -> Order {
    Order {
        id: format!("order-{close_date}"),
        transaction: format!("TX-{close_date}"),
        merchant_id: "merchant-1".to_string(),
        amount: 150.0,
        currency: "EUR".to_string(),
        status: "processed".to_string(),
        payment_method: "card".to_string(),
        country_code: "FI".to_string(),
        created_at: close_date - 60,
        close_date,
    }
}
