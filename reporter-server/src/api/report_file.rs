//! CreateFile RPC - 报表请求的同步入口
//!
//! 校验在入队前完成：未知类型、缺模板、参数缺失都同步返回 BadData，
//! 不产生队列消息。构建与渲染永远异步，由 worker 消费。

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shared::{
    CreateFileStatus, OutputFormat, REPORT_FILE_CREATE_SUBJECT, ReportRequest, ReportType,
};

use crate::core::ServerState;

#[derive(Debug, Deserialize)]
pub struct CreateFileRequest {
    /// Report kind as published by the caller; unknown values are BadData,
    /// not a decode failure.
    pub report_type: String,
    #[serde(default)]
    pub merchant_id: Option<String>,
    #[serde(default)]
    pub template_id: Option<String>,
    pub output_format: OutputFormat,
    #[serde(default)]
    pub params: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct CreateFileResponse {
    pub status: CreateFileStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
}

impl CreateFileResponse {
    fn ok(file_id: String) -> Self {
        Self {
            status: CreateFileStatus::Ok,
            message: "report file request accepted".to_string(),
            file_id: Some(file_id),
        }
    }

    fn bad_data(message: impl Into<String>) -> Self {
        Self {
            status: CreateFileStatus::BadData,
            message: message.into(),
            file_id: None,
        }
    }

    fn system_error(message: impl Into<String>) -> Self {
        Self {
            status: CreateFileStatus::SystemError,
            message: message.into(),
            file_id: None,
        }
    }
}

pub async fn create_file(
    State(state): State<ServerState>,
    Json(req): Json<CreateFileRequest>,
) -> Json<CreateFileResponse> {
    let Ok(kind) = req.report_type.parse::<ReportType>() else {
        return Json(CreateFileResponse::bad_data(format!(
            "unknown report type: {}",
            req.report_type
        )));
    };

    // Resolve the render template up front; the queue message always carries
    // a concrete template id.
    let template_id = req
        .template_id
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| state.config.templates.default_for(kind).to_string());
    if template_id.is_empty() {
        return Json(CreateFileResponse::bad_data(format!(
            "no template available for report type: {kind}"
        )));
    }

    let request = ReportRequest {
        id: shared::util::request_id(),
        report_type: kind,
        merchant_id: req.merchant_id,
        template_id: Some(template_id),
        output_format: req.output_format,
        params: req.params,
    };

    let builder = match state.registry.resolve(state.build_context(request.clone())) {
        Ok(builder) => builder,
        Err(e) => {
            tracing::error!(kind = %kind, "Builder resolution failed: {e}");
            return Json(CreateFileResponse::system_error(e.to_string()));
        }
    };

    if let Err(e) = builder.validate() {
        return Json(CreateFileResponse::bad_data(e.to_string()));
    }

    let payload = match serde_json::to_value(&request) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!("Serialize report request: {e}");
            return Json(CreateFileResponse::system_error("internal error"));
        }
    };

    match state
        .publisher
        .publish(REPORT_FILE_CREATE_SUBJECT, payload)
        .await
    {
        Ok(()) => {
            tracing::info!(file_id = %request.id, kind = %kind, "Report job published");
            Json(CreateFileResponse::ok(request.id))
        }
        Err(e) => {
            tracing::error!(kind = %kind, "Report job publish failed: {e}");
            Json(CreateFileResponse::system_error(e.to_string()))
        }
    }
}
