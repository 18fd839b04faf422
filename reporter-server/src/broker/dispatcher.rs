//! Job dispatcher — one queue delivery through the build pipeline
//!
//! Fire-and-forget consumer: any failure is logged and the message dropped,
//! there is no negative acknowledgement or redelivery. Past the upload step
//! the artifact already exists in storage, so notification failures degrade
//! to log lines instead of unwinding the job.

use shared::ReportRequest;
use thiserror::Error;

use crate::builder::{BuildError, UploadedFile};
use crate::core::ServerState;
use crate::services::{RenderError, StorageError};

#[derive(Debug, Error)]
enum PipelineError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Decode and run one delivery. Never returns an error — terminal failures
/// are logged here and the message is dropped.
pub async fn dispatch(state: ServerState, payload: serde_json::Value) {
    let request: ReportRequest = match serde_json::from_value(payload) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!("Dropping malformed report request: {e}");
            return;
        }
    };

    let job_id = request.id.clone();
    let kind = request.report_type;
    tracing::info!(job_id = %job_id, kind = %kind, "Report job received");

    match run_pipeline(&state, request).await {
        Ok(()) => tracing::info!(job_id = %job_id, kind = %kind, "Report job finished"),
        Err(e) => tracing::error!(job_id = %job_id, kind = %kind, "Report job failed: {e}"),
    }
}

/// validate -> build -> render -> upload -> notify, strictly in order.
async fn run_pipeline(state: &ServerState, request: ReportRequest) -> Result<(), PipelineError> {
    let file_id = request.id.clone();
    let file_name = request.file_name();
    let format = request.output_format;

    let builder = state.registry.resolve(state.build_context(request))?;
    builder.validate()?;

    let payload = builder.build().await?;
    let bytes = state.renderer.render(&payload, format).await?;
    let location = state.storage.put(&file_name, &bytes).await?;
    tracing::info!(job_id = %file_id, url = %location.url, "Report artifact uploaded");

    let retention = state.config.document_retention_secs;
    if let Err(e) = state
        .billing
        .report_file_complete(&file_id, &location.url, retention)
        .await
    {
        tracing::error!(job_id = %file_id, "Report-status notify failed: {e}");
    }

    let upload = UploadedFile {
        file_name,
        location,
        retention_secs: retention,
        content: bytes,
    };
    if let Err(e) = builder.post_process(&upload).await {
        tracing::error!(job_id = %file_id, "Post-process failed, artifact retained: {e}");
    }

    Ok(())
}
