//! VAT report builders
//!
//! Both kinds share one fetch: the VAT report by id, then its transactions
//! inside the inclusive day-boundary window for the report's country.

use async_trait::async_trait;
use serde_json::json;
use shared::{ClosedRange, RenderPayload, ReportType};

use crate::db::models::{Order, VatReport};
use crate::utils::{day_end, day_start};

use super::{BuildContext, BuildError, ReportBuilder};

async fn load(ctx: &BuildContext) -> Result<(VatReport, Vec<Order>), BuildError> {
    let id = ctx.require_str("id")?;
    let report = ctx.repos.vat_reports.find_by_id(id).await?;

    // Whole-day window: both report dates widen to their day boundaries.
    let window = ClosedRange::new(day_start(report.date_from), day_end(report.date_to));
    let orders = ctx
        .repos
        .orders
        .find_by_vat_window(&report.country, window)
        .await?;

    Ok((report, orders))
}

/// Full VAT report: the report record plus its orders.
pub struct VatBuilder {
    ctx: BuildContext,
}

impl VatBuilder {
    pub fn boxed(ctx: BuildContext) -> Box<dyn ReportBuilder> {
        Box::new(Self { ctx })
    }
}

#[async_trait]
impl ReportBuilder for VatBuilder {
    fn kind(&self) -> ReportType {
        ReportType::Vat
    }

    fn validate(&self) -> Result<(), BuildError> {
        self.ctx.require_str("id").map(|_| ())
    }

    async fn build(&self) -> Result<RenderPayload, BuildError> {
        let (report, orders) = load(&self.ctx).await?;
        Ok(RenderPayload {
            template_id: self.ctx.template_id()?.to_string(),
            data: json!({ "report": report, "orders": orders }),
        })
    }
}

/// Transactions-only variant of the VAT report.
pub struct VatTransactionsBuilder {
    ctx: BuildContext,
}

impl VatTransactionsBuilder {
    pub fn boxed(ctx: BuildContext) -> Box<dyn ReportBuilder> {
        Box::new(Self { ctx })
    }
}

#[async_trait]
impl ReportBuilder for VatTransactionsBuilder {
    fn kind(&self) -> ReportType {
        ReportType::VatTransactions
    }

    fn validate(&self) -> Result<(), BuildError> {
        self.ctx.require_str("id").map(|_| ())
    }

    async fn build(&self) -> Result<RenderPayload, BuildError> {
        let (_, orders) = load(&self.ctx).await?;
        Ok(RenderPayload {
            template_id: self.ctx.template_id()?.to_string(),
            data: json!(orders),
        })
    }
}
