//! Billing RPC client
//!
//! One client for the billing-side collaborators the pipeline talks to:
//! operating-company lookup, report-status completion, payout-document and
//! merchant-agreement callbacks. Every call returns a status+message pair;
//! a non-ok status carries a human-readable business error.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("Billing request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Billing accepted the call but rejected it at the business level.
    #[error("Billing rejected: {0}")]
    Business(String),
}

/// Legal entity operating the merchant's payments, fetched via RPC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatingCompany {
    pub id: String,
    pub name: String,
    pub address: String,
    pub registration_number: String,
}

/// Wire envelope every billing endpoint replies with.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct RpcResponse<T> {
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    item: Option<T>,
}

impl<T> RpcResponse<T> {
    fn into_item(self) -> Result<Option<T>, RpcError> {
        if self.status == "ok" {
            Ok(self.item)
        } else {
            Err(RpcError::Business(self.message))
        }
    }
}

#[async_trait]
pub trait BillingRpc: Send + Sync {
    /// Operating company for a merchant; `None` when billing knows of none.
    async fn operating_company(
        &self,
        merchant_id: &str,
    ) -> Result<Option<OperatingCompany>, RpcError>;

    /// Report a finished artifact to the report-status service.
    async fn report_file_complete(
        &self,
        file_id: &str,
        location: &str,
        retention_secs: i64,
    ) -> Result<(), RpcError>;

    /// Attach an uploaded payout document to its payout record.
    async fn set_payout_document(
        &self,
        payout_id: &str,
        location: &str,
        retention_secs: i64,
    ) -> Result<(), RpcError>;

    /// Attach a generated agreement to the merchant record.
    async fn attach_agreement(
        &self,
        merchant_id: &str,
        location: &str,
        retention_secs: i64,
    ) -> Result<(), RpcError>;
}

pub struct HttpBillingRpc {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBillingRpc {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    async fn post_unit(&self, path: &str, body: serde_json::Value) -> Result<(), RpcError> {
        let resp: RpcResponse<serde_json::Value> = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await?
            .json()
            .await?;
        resp.into_item().map(|_| ())
    }
}

#[async_trait]
impl BillingRpc for HttpBillingRpc {
    async fn operating_company(
        &self,
        merchant_id: &str,
    ) -> Result<Option<OperatingCompany>, RpcError> {
        let resp: RpcResponse<OperatingCompany> = self
            .client
            .post(format!("{}/api/v1/operating_company", self.base_url))
            .json(&json!({ "merchant_id": merchant_id }))
            .send()
            .await?
            .json()
            .await?;
        resp.into_item()
    }

    async fn report_file_complete(
        &self,
        file_id: &str,
        location: &str,
        retention_secs: i64,
    ) -> Result<(), RpcError> {
        self.post_unit(
            "/api/v1/report_file/complete",
            json!({
                "file_id": file_id,
                "location": location,
                "retention_secs": retention_secs,
            }),
        )
        .await
    }

    async fn set_payout_document(
        &self,
        payout_id: &str,
        location: &str,
        retention_secs: i64,
    ) -> Result<(), RpcError> {
        self.post_unit(
            "/api/v1/payout_documents/report",
            json!({
                "payout_id": payout_id,
                "location": location,
                "retention_secs": retention_secs,
            }),
        )
        .await
    }

    async fn attach_agreement(
        &self,
        merchant_id: &str,
        location: &str,
        retention_secs: i64,
    ) -> Result<(), RpcError> {
        self.post_unit(
            "/api/v1/merchants/agreement",
            json!({
                "merchant_id": merchant_id,
                "location": location,
                "retention_secs": retention_secs,
            }),
        )
        .await
    }
}
