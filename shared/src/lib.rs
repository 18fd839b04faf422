//! Reporter Shared - 报表服务共享类型库
//!
//! 这些类型在 reporter-server 和报表任务的生产者之间共享：
//!
//! - **报表请求** (`report`): 队列上传输的工作单元与渲染载荷
//! - **队列协议** (`queue`): broker 连接上的 JSON 帧
//! - **错误码** (`error`): CreateFile RPC 的状态码
//! - **工具** (`util`): 时间戳与 id 生成

pub mod error;
pub mod queue;
pub mod report;
pub mod util;

// Re-export 公共类型
pub use error::CreateFileStatus;
pub use queue::{QueueFrame, REPORT_FILE_CREATE_SUBJECT, REPORT_QUEUE_GROUP};
pub use report::{
    ClosedRange, OutputFormat, RenderPayload, ReportRequest, ReportType,
};
