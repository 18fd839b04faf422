use std::sync::Arc;

use shared::ReportRequest;

use crate::broker::{BrokerLink, BrokerPublisher, broker_channel};
use crate::builder::{BuildContext, BuilderRegistry, BuilderSettings};
use crate::core::Config;
use crate::db::{self, Repositories};
use crate::services::{BillingRpc, FileStorage, HttpBillingRpc, HttpRenderer, Renderer, S3Storage};

/// 服务器状态 - 持有所有共享依赖的单例引用
///
/// 初始化后全部只读：仓储适配器、注册表与外部服务客户端可跨并发任务
/// 安全使用。使用 Arc 实现浅拷贝，所有权成本极低。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | repositories | 五个逻辑集合的只读查询适配器 |
/// | billing | 计费 RPC 客户端 |
/// | renderer | 文档渲染客户端 |
/// | storage | 对象存储客户端 |
/// | registry | 报表类型 -> 构建器映射 |
/// | publisher | broker 发布句柄 (CreateFile 入队用) |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub repositories: Repositories,
    pub billing: Arc<dyn BillingRpc>,
    pub renderer: Arc<dyn Renderer>,
    pub storage: Arc<dyn FileStorage>,
    pub registry: Arc<BuilderRegistry>,
    pub publisher: BrokerPublisher,
}

impl ServerState {
    /// 手动构造 (测试场景直接注入 fake 依赖)
    pub fn new(
        config: Config,
        repositories: Repositories,
        billing: Arc<dyn BillingRpc>,
        renderer: Arc<dyn Renderer>,
        storage: Arc<dyn FileStorage>,
        publisher: BrokerPublisher,
    ) -> Self {
        Self {
            config,
            repositories,
            billing,
            renderer,
            storage,
            registry: Arc::new(BuilderRegistry::new()),
            publisher,
        }
    }

    /// 初始化生产依赖：数据库连接池、S3、HTTP 客户端、注册表
    ///
    /// 返回的 [`BrokerLink`] 交给 [`crate::broker::ConnectionManager`]。
    pub async fn initialize(config: &Config) -> anyhow::Result<(Self, BrokerLink)> {
        let pool = db::connect(&config.database_url).await?;
        tracing::info!("Database pool ready");

        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let s3 = aws_sdk_s3::Client::new(&aws_config);

        let (publisher, link) = broker_channel();

        let state = Self::new(
            config.clone(),
            Repositories::postgres(pool),
            Arc::new(HttpBillingRpc::new(config.billing_url.clone())),
            Arc::new(HttpRenderer::new(config.renderer_url.clone())),
            Arc::new(S3Storage::new(s3, config.s3_bucket.clone())),
            publisher,
        );
        Ok((state, link))
    }

    /// Per-job context handed to one builder invocation.
    pub fn build_context(&self, request: ReportRequest) -> BuildContext {
        BuildContext {
            request,
            repos: self.repositories.clone(),
            billing: self.billing.clone(),
            settings: BuilderSettings {
                tariff_unbounded_sentinel: self.config.tariff_unbounded_sentinel,
            },
        }
    }
}
