//! Royalty report builders
//!
//! Orders inside the report period, for the report's merchant, restricted to
//! the settled-outcome statuses. The period is inclusive on both ends.

use async_trait::async_trait;
use serde_json::json;
use shared::{ClosedRange, RenderPayload, ReportType};

use crate::db::models::{Order, RoyaltyReport};

use super::{BuildContext, BuildError, ReportBuilder};

/// Statuses that count toward a royalty period.
pub const ROYALTY_ORDER_STATUSES: [&str; 3] = ["processed", "refunded", "chargeback"];

async fn load(ctx: &BuildContext) -> Result<(RoyaltyReport, Vec<Order>), BuildError> {
    let id = ctx.require_str("id")?;
    let report = ctx.repos.royalty_reports.find_by_id(id).await?;

    let statuses: Vec<String> = ROYALTY_ORDER_STATUSES
        .iter()
        .map(|s| s.to_string())
        .collect();
    let orders = ctx
        .repos
        .orders
        .find_by_royalty_period(
            &report.merchant_id,
            ClosedRange::new(report.period_from, report.period_to),
            &statuses,
        )
        .await?;

    Ok((report, orders))
}

/// Full royalty report: the report record plus its orders.
pub struct RoyaltyBuilder {
    ctx: BuildContext,
}

impl RoyaltyBuilder {
    pub fn boxed(ctx: BuildContext) -> Box<dyn ReportBuilder> {
        Box::new(Self { ctx })
    }
}

#[async_trait]
impl ReportBuilder for RoyaltyBuilder {
    fn kind(&self) -> ReportType {
        ReportType::Royalty
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

/// Transactions-only variant of the royalty report.
pub struct RoyaltyTransactionsBuilder {
    ctx: BuildContext,
}

impl RoyaltyTransactionsBuilder {
    pub fn boxed(ctx: BuildContext) -> Box<dyn ReportBuilder> {
        Box::new(Self { ctx })
    }
}

#[async_trait]
impl ReportBuilder for RoyaltyTransactionsBuilder {
    fn kind(&self) -> ReportType {
        ReportType::RoyaltyTransactions
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
