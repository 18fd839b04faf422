//! 队列协议帧
//!
//! reporter 与 broker 之间的 WebSocket 连接上传输的 JSON 文本帧。
//! 订阅是持久化的：`Sub` 声明 subject + queue group，broker 按组内
//! 至多一次的语义投递 `Msg`。

use serde::{Deserialize, Serialize};

/// Job-creation subject the worker subscribes to.
pub const REPORT_FILE_CREATE_SUBJECT: &str = "report.file.create";

/// Durable queue-group name shared by all worker instances.
pub const REPORT_QUEUE_GROUP: &str = "reporter";

/// One frame on the broker connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueueFrame {
    /// Client -> broker: subscribe `group` to `subject`.
    Sub { subject: String, group: String },
    /// Client -> broker: publish a payload onto `subject`.
    Pub { subject: String, payload: serde_json::Value },
    /// Broker -> client: one delivery from `subject`.
    Msg { subject: String, payload: serde_json::Value },
}
