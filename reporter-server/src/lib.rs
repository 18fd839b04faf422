//! Reporter Server - 商户报表生成服务
//!
//! # 架构概述
//!
//! 队列驱动的 worker：从 broker 订阅报表任务，构建数据载荷，交给外部
//! 渲染服务生成文档，上传到对象存储并回调计费服务。
//!
//! - **broker** (`broker`): 持久订阅 + 指数退避重连 + 任务分发
//! - **构建管线** (`builder`): 报表类型 -> builder 注册表与各类报表的参数校验/数据装配
//! - **数据层** (`db`): PostgreSQL 上五个逻辑集合的只读查询适配器
//! - **外部服务** (`services`): 渲染、对象存储、计费 RPC 客户端
//! - **HTTP API** (`api`): 健康检查 + CreateFile 同步入口
//!
//! # 模块结构
//!
//! ```text
//! reporter-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── broker/        # 连接管理、退避、任务分发
//! ├── builder/       # 报表构建器注册表与实现
//! ├── db/            # 仓储适配器
//! ├── services/      # 渲染/存储/计费客户端
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 日志、时间、金额格式化
//! ```

pub mod api;
pub mod broker;
pub mod builder;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use broker::{Backoff, BrokerPublisher, ConnectionManager};
pub use builder::{BuildContext, BuildError, BuilderRegistry, ReportBuilder};
pub use db::Repositories;
pub use self::core::{Config, Server, ServerState};

pub fn print_banner() {
    println!(
        r#"
    ____                        __
   / __ \___  ____  ____  _____/ /____  _____
  / /_/ / _ \/ __ \/ __ \/ ___/ __/ _ \/ ___/
 / _, _/  __/ /_/ / /_/ / /  / /_/  __/ /
/_/ |_|\___/ .___/\____/_/   \__/\___/_/
          /_/
    "#
    );
}

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    // .env 缺失不是错误，生产环境直接用进程环境变量
    let _ = dotenvy::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    utils::logger::init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}
