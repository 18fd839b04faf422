//! Merchant agreement builder
//!
//! Everything the agreement template needs arrives in the request parameters;
//! the builder's job is shape, not storage: check the twelve required fields,
//! turn the tariff-rate array into a printable table, translate the region
//! code, and format every monetary field to two decimals.

use async_trait::async_trait;
use serde_json::{Value, json};
use shared::{RenderPayload, ReportType};

use crate::utils::format_amount;

use super::{BuildContext, BuildError, ReportBuilder, UploadedFile};

/// Label substituted for a tariff upper bound equal to the sentinel.
pub const OPEN_ENDED_LABEL: &str = "and more";

/// String parameters that must be present and non-empty.
const REQUIRED_TEXT_PARAMS: [&str; 9] = [
    "name",
    "address",
    "registration_number",
    "home_region",
    "bank_name",
    "bank_account",
    "payout_currency",
    "oc_name",
    "oc_address",
];

/// Numeric parameters that must be present and non-zero.
const REQUIRED_AMOUNT_PARAMS: [&str; 2] = ["payout_cost", "minimal_payout_limit"];

/// Region codes the agreement template knows how to print.
fn region_name(code: &str) -> Option<&'static str> {
    match code {
        "europe" => Some("Europe"),
        "russia_and_cis" => Some("Russia and CIS"),
        "asia" => Some("Asia"),
        "latin_america" => Some("Latin America"),
        "worldwide" => Some("Worldwide"),
        _ => None,
    }
}

pub struct AgreementBuilder {
    ctx: BuildContext,
}

impl AgreementBuilder {
    pub fn boxed(ctx: BuildContext) -> Box<dyn ReportBuilder> {
        Box::new(Self { ctx })
    }

    /// One printable row per tariff rate; the sentinel upper bound renders as
    /// an open-ended range.
    fn tariff_table(&self, rates: &[Value]) -> Result<Vec<Value>, BuildError> {
        let sentinel = self.ctx.settings.tariff_unbounded_sentinel;
        let mut rows = Vec::with_capacity(rates.len());

        for rate in rates {
            let min = rate.get("min_amount").and_then(Value::as_f64);
            let max = rate.get("max_amount").and_then(Value::as_f64);
            let percent = rate.get("percent_fee").and_then(Value::as_f64);
            let fixed = rate.get("fixed_fee").and_then(Value::as_f64);

            let (Some(min), Some(max), Some(percent), Some(fixed)) = (min, max, percent, fixed)
            else {
                return Err(BuildError::InvalidParam {
                    name: "tariff_rates",
                    reason: format!("malformed rate entry: {rate}"),
                });
            };

            let range = if max == sentinel {
                format!("{} {}", format_amount(min), OPEN_ENDED_LABEL)
            } else {
                format!("{} - {}", format_amount(min), format_amount(max))
            };

            rows.push(json!({
                "amount_range": range,
                "percent_fee": format!("{}%", format_amount(percent)),
                "fixed_fee": format_amount(fixed),
            }));
        }

        Ok(rows)
    }
}

#[async_trait]
impl ReportBuilder for AgreementBuilder {
    fn kind(&self) -> ReportType {
        ReportType::Agreement
    }

    fn validate(&self) -> Result<(), BuildError> {
        for name in REQUIRED_TEXT_PARAMS {
            self.ctx.require_str(name)?;
        }
        for name in REQUIRED_AMOUNT_PARAMS {
            self.ctx.require_f64_nonzero(name)?;
        }
        self.ctx.require_array("tariff_rates").map(|_| ())
    }

    async fn build(&self) -> Result<RenderPayload, BuildError> {
        let region_code = self.ctx.require_str("home_region")?;
        let region = region_name(region_code).ok_or_else(|| BuildError::InvalidParam {
            name: "home_region",
            reason: format!("unknown region: {region_code}"),
        })?;

        let rates = self.ctx.require_array("tariff_rates")?;
        let tariffs = self.tariff_table(rates)?;

        let data = json!({
            "merchant": {
                "name": self.ctx.require_str("name")?,
                "address": self.ctx.require_str("address")?,
                "registration_number": self.ctx.require_str("registration_number")?,
                "home_region": region,
            },
            "payout": {
                "bank_name": self.ctx.require_str("bank_name")?,
                "bank_account": self.ctx.require_str("bank_account")?,
                "currency": self.ctx.require_str("payout_currency")?,
                "cost": format_amount(self.ctx.require_f64_nonzero("payout_cost")?),
                "minimal_limit": format_amount(self.ctx.require_f64_nonzero("minimal_payout_limit")?),
            },
            "tariffs": tariffs,
            "operating_company": {
                "name": self.ctx.require_str("oc_name")?,
                "address": self.ctx.require_str("oc_address")?,
            },
        });

        Ok(RenderPayload {
            template_id: self.ctx.template_id()?.to_string(),
            data,
        })
    }

    /// Attach the generated agreement to the merchant record; a business-level
    /// rejection from billing surfaces as an error.
    async fn post_process(&self, upload: &UploadedFile) -> Result<(), BuildError> {
        let merchant_id = self.ctx.merchant_id()?;
        self.ctx
            .billing
            .attach_agreement(merchant_id, &upload.location.url, upload.retention_secs)
            .await?;
        Ok(())
    }
}
