use shared::ReportType;

/// 服务器配置 - 报表 worker 的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3000 | HTTP API 端口 |
/// | BROKER_URL | ws://localhost:4222 | broker 地址 |
/// | DATABASE_URL | postgres://localhost/reporter | PostgreSQL 连接串 |
/// | RENDERER_URL | http://localhost:3005 | 文档渲染服务地址 |
/// | BILLING_URL | http://localhost:3010 | 计费 RPC 服务地址 |
/// | S3_BUCKET | reporter-files | 文档存储桶 |
/// | DOCUMENT_RETENTION_SECS | 604800 | 生成文档的保留时长（秒） |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// BROKER_URL=ws://broker:4222 HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// broker WebSocket 地址
    pub broker_url: String,
    /// PostgreSQL 连接串
    pub database_url: String,
    /// 文档渲染服务地址
    pub renderer_url: String,
    /// 计费 RPC 服务地址
    pub billing_url: String,
    /// 文档存储桶
    pub s3_bucket: String,
    /// 生成文档的保留时长（秒）
    pub document_retention_secs: i64,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 各报表类型的默认模板
    pub templates: TemplateConfig,
    /// 费率表中"无上限"档位的哨兵值
    ///
    /// tariff 档位的 max_amount 等于该值时按开放区间渲染。
    pub tariff_unbounded_sentinel: f64,
}

/// Per-kind default render templates.
///
/// CreateFile falls back to these when the request carries no template id.
#[derive(Debug, Clone)]
pub struct TemplateConfig {
    pub vat: String,
    pub vat_transactions: String,
    pub royalty: String,
    pub royalty_transactions: String,
    pub transactions: String,
    pub payout: String,
    pub agreement: String,
    pub tax: String,
}

impl TemplateConfig {
    fn from_env() -> Self {
        Self {
            vat: env_or("TEMPLATE_VAT", "tpl-vat"),
            vat_transactions: env_or("TEMPLATE_VAT_TRANSACTIONS", "tpl-vat-transactions"),
            royalty: env_or("TEMPLATE_ROYALTY", "tpl-royalty"),
            royalty_transactions: env_or(
                "TEMPLATE_ROYALTY_TRANSACTIONS",
                "tpl-royalty-transactions",
            ),
            transactions: env_or("TEMPLATE_TRANSACTIONS", "tpl-transactions"),
            payout: env_or("TEMPLATE_PAYOUT", "tpl-payout"),
            agreement: env_or("TEMPLATE_AGREEMENT", "tpl-agreement"),
            tax: env_or("TEMPLATE_TAX", "tpl-tax"),
        }
    }

    /// Default template for a report kind.
    pub fn default_for(&self, kind: ReportType) -> &str {
        match kind {
            ReportType::Vat => &self.vat,
            ReportType::VatTransactions => &self.vat_transactions,
            ReportType::Royalty => &self.royalty,
            ReportType::RoyaltyTransactions => &self.royalty_transactions,
            ReportType::Transactions => &self.transactions,
            ReportType::Payout => &self.payout,
            ReportType::Agreement => &self.agreement,
            ReportType::Tax => &self.tax,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            broker_url: env_or("BROKER_URL", "ws://localhost:4222"),
            database_url: env_or("DATABASE_URL", "postgres://localhost/reporter"),
            renderer_url: env_or("RENDERER_URL", "http://localhost:3005"),
            billing_url: env_or("BILLING_URL", "http://localhost:3010"),
            s3_bucket: env_or("S3_BUCKET", "reporter-files"),
            document_retention_secs: std::env::var("DOCUMENT_RETENTION_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(604_800),
            environment: env_or("ENVIRONMENT", "development"),
            templates: TemplateConfig::from_env(),
            tariff_unbounded_sentinel: std::env::var("TARIFF_UNBOUNDED_SENTINEL")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(999_999_999.0),
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
