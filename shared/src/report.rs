//! Report request types shared between producers and the reporter worker.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Registered report kinds.
///
/// The builder registry enumerates exactly these kinds; a request carrying
/// anything else is rejected before it is ever queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    Vat,
    VatTransactions,
    Royalty,
    RoyaltyTransactions,
    Transactions,
    Payout,
    Agreement,
    Tax,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Vat => "vat",
            ReportType::VatTransactions => "vat_transactions",
            ReportType::Royalty => "royalty",
            ReportType::RoyaltyTransactions => "royalty_transactions",
            ReportType::Transactions => "transactions",
            ReportType::Payout => "payout",
            ReportType::Agreement => "agreement",
            ReportType::Tax => "tax",
        }
    }

    /// All kinds the registry is expected to serve.
    pub fn all() -> &'static [ReportType] {
        &[
            ReportType::Vat,
            ReportType::VatTransactions,
            ReportType::Royalty,
            ReportType::RoyaltyTransactions,
            ReportType::Transactions,
            ReportType::Payout,
            ReportType::Agreement,
            ReportType::Tax,
        ]
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vat" => Ok(ReportType::Vat),
            "vat_transactions" => Ok(ReportType::VatTransactions),
            "royalty" => Ok(ReportType::Royalty),
            "royalty_transactions" => Ok(ReportType::RoyaltyTransactions),
            "transactions" => Ok(ReportType::Transactions),
            "payout" => Ok(ReportType::Payout),
            "agreement" => Ok(ReportType::Agreement),
            "tax" => Ok(ReportType::Tax),
            _ => Err(()),
        }
    }
}

/// Rendered document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Xlsx,
    Csv,
    Pdf,
}

impl OutputFormat {
    /// File extension used when naming the stored artifact.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
            OutputFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// 队列上的工作单元 - 一次报表构建请求
///
/// 由 CreateFile RPC 在入队前赋予 `id` 与解析后的 `template_id`，
/// worker 每次投递消费一次，不在队列侧保留状态。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    /// Request id, assigned before publish; also names the stored artifact.
    pub id: String,
    /// Report kind, must be one of the registered kinds.
    pub report_type: ReportType,
    /// Merchant scope; required by some kinds (e.g. transactions).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_id: Option<String>,
    /// Render template; resolved to the per-kind default before publish.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    /// Requested document format.
    pub output_format: OutputFormat,
    /// Kind-specific parameters (boolean/number/string/array values).
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl ReportRequest {
    /// Artifact object name: deterministic from id + format.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.id, self.output_format.extension())
    }
}

/// Builder output handed to the external document renderer.
///
/// `data` carries a JSON-serializable mapping or list; no further schema is
/// imposed here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderPayload {
    pub template_id: String,
    pub data: Value,
}

/// Inclusive `[from, to]` range over unix-second timestamps.
///
/// Period-bounded report queries treat both ends as part of the period; an
/// order closing exactly on `from` or `to` belongs to the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosedRange {
    pub from: i64,
    pub to: i64,
}

impl ClosedRange {
    pub fn new(from: i64, to: i64) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, ts: i64) -> bool {
        ts >= self.from && ts <= self.to
    }
}
