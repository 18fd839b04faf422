//! Merchant transaction listing builder
//!
//! The merchant scope comes from the request itself; everything else is an
//! optional filter. Absent filters reach the adapter as empty lists / zero
//! bounds, and the listing sorts by close date descending.

use async_trait::async_trait;
use serde_json::json;
use shared::{RenderPayload, ReportType};

use crate::db::OrderListQuery;

use super::{BuildContext, BuildError, ReportBuilder};

pub struct TransactionsBuilder {
    ctx: BuildContext,
}

impl TransactionsBuilder {
    pub fn boxed(ctx: BuildContext) -> Box<dyn ReportBuilder> {
        Box::new(Self { ctx })
    }
}

#[async_trait]
impl ReportBuilder for TransactionsBuilder {
    fn kind(&self) -> ReportType {
        ReportType::Transactions
    }

    fn validate(&self) -> Result<(), BuildError> {
        self.ctx.merchant_id().map(|_| ())
    }

    async fn build(&self) -> Result<RenderPayload, BuildError> {
        let query = OrderListQuery {
            merchant_id: self.ctx.merchant_id()?.to_string(),
            statuses: self.ctx.opt_str_array("status"),
            payment_methods: self.ctx.opt_str_array("payment_method"),
            date_from: self.ctx.opt_i64("date_from"),
            date_to: self.ctx.opt_i64("date_to"),
        };
        let orders = self.ctx.repos.orders.find_by_merchant(query).await?;

        Ok(RenderPayload {
            template_id: self.ctx.template_id()?.to_string(),
            data: json!(orders),
        })
    }
}
