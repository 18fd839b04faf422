//! Tax report builder — registered placeholder, reserved for a future kind.

use async_trait::async_trait;
use serde_json::json;
use shared::{RenderPayload, ReportType};

use super::{BuildContext, BuildError, ReportBuilder};

pub struct TaxBuilder {
    ctx: BuildContext,
}

impl TaxBuilder {
    pub fn boxed(ctx: BuildContext) -> Box<dyn ReportBuilder> {
        Box::new(Self { ctx })
    }
}

#[async_trait]
impl ReportBuilder for TaxBuilder {
    fn kind(&self) -> ReportType {
        ReportType::Tax
    }

    fn validate(&self) -> Result<(), BuildError> {
        Ok(())
    }

    async fn build(&self) -> Result<RenderPayload, BuildError> {
        Ok(RenderPayload {
            template_id: self.ctx.template_id()?.to_string(),
            data: json!({}),
        })
    }
}
