//! 报表构建管线
//!
//! 注册表把报表类型映射到构建器构造函数；每个构建器实现参数校验、
//! 数据装配，部分类型还有渲染后的回调。新增报表类型 = 在注册表加一行，
//! 不改分发逻辑。

pub mod agreement;
pub mod payout;
pub mod royalty;
pub mod tax;
pub mod transactions;
pub mod vat;

#[cfg(test)]
pub(crate) mod testutil;

use async_trait::async_trait;
use serde_json::{Map, Value};
use shared::{RenderPayload, ReportRequest, ReportType};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::db::{RepoError, Repositories};
use crate::services::{BillingRpc, FileLocation, RpcError};

/// Builder pipeline error.
///
/// Validation failures split into two classes: a required parameter that is
/// absent, and one that is present but empty (empty string, zero where the
/// field is mandatory-nonzero, empty array).
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Handler not found for report type: {0}")]
    HandlerNotFound(String),

    #[error("Required parameter missing: {0}")]
    MissingParam(&'static str),

    #[error("Required parameter empty: {0}")]
    EmptyParam(&'static str),

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParam { name: &'static str, reason: String },

    #[error("No template resolved for request")]
    MissingTemplate,

    #[error("No operating company for merchant {0}")]
    NoOperatingCompany(String),

    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error(transparent)]
    Rpc(#[from] RpcError),
}

/// Knobs builders read from process configuration.
#[derive(Debug, Clone)]
pub struct BuilderSettings {
    /// Tariff upper bound meaning "no upper bound".
    pub tariff_unbounded_sentinel: f64,
}

/// 单次构建的上下文 - 请求 + 共享依赖
///
/// 每次任务独占一个实例，不跨并发任务共享；适配器与计费客户端本身
/// 初始化后只读，可安全并发使用。
#[derive(Clone)]
pub struct BuildContext {
    pub request: ReportRequest,
    pub repos: Repositories,
    pub billing: Arc<dyn BillingRpc>,
    pub settings: BuilderSettings,
}

impl BuildContext {
    fn params(&self) -> &Map<String, Value> {
        &self.request.params
    }

    /// Resolved render template; producers set this before publish.
    pub fn template_id(&self) -> Result<&str, BuildError> {
        self.request
            .template_id
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(BuildError::MissingTemplate)
    }

    /// Required string parameter: present and non-empty.
    pub fn require_str(&self, name: &'static str) -> Result<&str, BuildError> {
        let value = self
            .params()
            .get(name)
            .ok_or(BuildError::MissingParam(name))?;
        match value.as_str() {
            Some("") | None => Err(BuildError::EmptyParam(name)),
            Some(s) => Ok(s),
        }
    }

    /// Required numeric parameter, mandatory-nonzero.
    pub fn require_f64_nonzero(&self, name: &'static str) -> Result<f64, BuildError> {
        let value = self
            .params()
            .get(name)
            .ok_or(BuildError::MissingParam(name))?;
        match value.as_f64() {
            Some(n) if n != 0.0 => Ok(n),
            Some(_) => Err(BuildError::EmptyParam(name)),
            None => Err(BuildError::EmptyParam(name)),
        }
    }

    /// Required array parameter: present and non-empty.
    pub fn require_array(&self, name: &'static str) -> Result<&Vec<Value>, BuildError> {
        let value = self
            .params()
            .get(name)
            .ok_or(BuildError::MissingParam(name))?;
        match value.as_array() {
            Some(items) if !items.is_empty() => Ok(items),
            _ => Err(BuildError::EmptyParam(name)),
        }
    }

    /// Optional string-array parameter; absent means empty.
    pub fn opt_str_array(&self, name: &str) -> Vec<String> {
        self.params()
            .get(name)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Optional integer parameter; absent means zero (= unbounded).
    pub fn opt_i64(&self, name: &str) -> i64 {
        self.params().get(name).and_then(Value::as_i64).unwrap_or(0)
    }

    /// Merchant scope from the request itself (not params).
    pub fn merchant_id(&self) -> Result<&str, BuildError> {
        match self.request.merchant_id.as_deref() {
            None => Err(BuildError::MissingParam("merchant_id")),
            Some("") => Err(BuildError::EmptyParam("merchant_id")),
            Some(id) => Ok(id),
        }
    }
}

/// A finished artifact handed to `post_process`.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub location: FileLocation,
    pub retention_secs: i64,
    pub content: Vec<u8>,
}

/// One report kind's validate + build (+ post-process) unit.
#[async_trait]
pub trait ReportBuilder: Send + Sync {
    /// The kind this builder serves.
    fn kind(&self) -> ReportType;

    /// Pure check over the request parameters; never touches a repository.
    fn validate(&self) -> Result<(), BuildError>;

    /// Assemble the render payload; deterministic given the same stored data.
    async fn build(&self) -> Result<RenderPayload, BuildError>;

    /// Called after successful render + upload; default is a no-op.
    async fn post_process(&self, _upload: &UploadedFile) -> Result<(), BuildError> {
        Ok(())
    }
}

type BuilderCtor = fn(BuildContext) -> Box<dyn ReportBuilder>;

/// 报表类型 -> 构建器构造函数的只读映射，进程启动时构建一次
pub struct BuilderRegistry {
    table: HashMap<ReportType, BuilderCtor>,
}

impl BuilderRegistry {
    pub fn new() -> Self {
        let mut table: HashMap<ReportType, BuilderCtor> = HashMap::new();
        table.insert(ReportType::Vat, vat::VatBuilder::boxed);
        table.insert(
            ReportType::VatTransactions,
            vat::VatTransactionsBuilder::boxed,
        );
        table.insert(ReportType::Royalty, royalty::RoyaltyBuilder::boxed);
        table.insert(
            ReportType::RoyaltyTransactions,
            royalty::RoyaltyTransactionsBuilder::boxed,
        );
        table.insert(
            ReportType::Transactions,
            transactions::TransactionsBuilder::boxed,
        );
        table.insert(ReportType::Payout, payout::PayoutBuilder::boxed);
        table.insert(ReportType::Agreement, agreement::AgreementBuilder::boxed);
        table.insert(ReportType::Tax, tax::TaxBuilder::boxed);
        Self { table }
    }

    /// Builder for the request's kind, or `HandlerNotFound`.
    pub fn resolve(&self, ctx: BuildContext) -> Result<Box<dyn ReportBuilder>, BuildError> {
        let kind = ctx.request.report_type;
        let ctor = self
            .table
            .get(&kind)
            .ok_or_else(|| BuildError::HandlerNotFound(kind.to_string()))?;
        Ok(ctor(ctx))
    }
}

impl Default for BuilderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
