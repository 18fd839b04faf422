//! Payout document builder
//!
//! Joins the payout with its owning merchant and the operating company from
//! billing, then flattens everything into template-ready fields: dates as
//! `YYYY-MM-DD`, money at two decimals. After upload the document is reported
//! back to the payout-document service.

use async_trait::async_trait;
use serde_json::json;
use shared::{RenderPayload, ReportType};

use crate::utils::{format_amount, format_ymd};

use super::{BuildContext, BuildError, ReportBuilder, UploadedFile};

pub struct PayoutBuilder {
    ctx: BuildContext,
}

impl PayoutBuilder {
    pub fn boxed(ctx: BuildContext) -> Box<dyn ReportBuilder> {
        Box::new(Self { ctx })
    }

    fn payout_id(&self) -> Result<&str, BuildError> {
        let id = self.ctx.require_str("id")?;
        // 24-hex document identifier
        if id.len() != 24 || !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(BuildError::InvalidParam {
                name: "id",
                reason: format!("not a valid document id: {id}"),
            });
        }
        Ok(id)
    }
}

#[async_trait]
impl ReportBuilder for PayoutBuilder {
    fn kind(&self) -> ReportType {
        ReportType::Payout
    }

    fn validate(&self) -> Result<(), BuildError> {
        self.payout_id().map(|_| ())
    }

    async fn build(&self) -> Result<RenderPayload, BuildError> {
        let id = self.payout_id()?;
        let payout = self.ctx.repos.payouts.find_by_id(id).await?;
        let merchant = self
            .ctx
            .repos
            .merchants
            .find_by_id(&payout.merchant_id)
            .await?;
        let company = self
            .ctx
            .billing
            .operating_company(&merchant.id)
            .await?
            .ok_or_else(|| BuildError::NoOperatingCompany(merchant.id.clone()))?;

        // Flat field mapping for direct template consumption.
        let data = json!({
            "id": payout.id,
            "date": format_ymd(payout.created_at),
            "status": payout.status,
            "period_from": format_ymd(payout.period_from),
            "period_to": format_ymd(payout.period_to),
            "arrival_date": format_ymd(payout.arrival_date),
            "amount": format_amount(payout.amount),
            "currency": payout.currency,
            "merchant_legal_name": merchant.company_name,
            "merchant_address": merchant.company_address,
            "merchant_registration_number": merchant.registration_number,
            "merchant_bank_name": merchant.bank_name,
            "merchant_bank_account": merchant.bank_account,
            "merchant_bank_swift": merchant.bank_swift,
            "destination_bank_name": payout.destination_bank_name,
            "destination_account": payout.destination_account,
            "destination_swift": payout.destination_swift,
            "oc_name": company.name,
            "oc_address": company.address,
            "oc_registration_number": company.registration_number,
        });

        Ok(RenderPayload {
            template_id: self.ctx.template_id()?.to_string(),
            data,
        })
    }

    async fn post_process(&self, upload: &UploadedFile) -> Result<(), BuildError> {
        let id = self.payout_id()?;
        self.ctx
            .billing
            .set_payout_document(id, &upload.location.url, upload.retention_secs)
            .await?;
        Ok(())
    }
}
