//! Document renderer client
//!
//! The renderer accepts `{template_id, output_format, data}` and returns the
//! document bytes; a non-2xx reply carries a response body worth logging.

use async_trait::async_trait;
use serde::Serialize;
use shared::{OutputFormat, RenderPayload};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Renderer request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Renderer returned {status}: {body}")]
    Status { status: u16, body: String },
}

#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(
        &self,
        payload: &RenderPayload,
        format: OutputFormat,
    ) -> Result<Vec<u8>, RenderError>;
}

#[derive(Serialize)]
struct RenderRequest<'a> {
    template_id: &'a str,
    output_format: OutputFormat,
    data: &'a serde_json::Value,
}

/// HTTP client for the document rendering service.
pub struct HttpRenderer {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRenderer {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl Renderer for HttpRenderer {
    async fn render(
        &self,
        payload: &RenderPayload,
        format: OutputFormat,
    ) -> Result<Vec<u8>, RenderError> {
        let url = format!("{}/api/v1/render", self.base_url);
        let resp = self
            .client
            .post(&url)
            .timeout(Duration::from_secs(120))
            .json(&RenderRequest {
                template_id: &payload.template_id,
                output_format: format,
                data: &payload.data,
            })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RenderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp.bytes().await?.to_vec())
    }
}
