//! CreateFile RPC 状态码
//!
//! 同步入口的三种结果，随 `message` 一起返回给调用方。

use serde::{Deserialize, Serialize};

/// Outcome of the synchronous CreateFile entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateFileStatus {
    /// Request accepted and published onto the job queue.
    Ok,
    /// Unknown kind, missing template, or parameter validation failure.
    BadData,
    /// Builder resolution or publish failure.
    SystemError,
}

impl CreateFileStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, CreateFileStatus::Ok)
    }
}
