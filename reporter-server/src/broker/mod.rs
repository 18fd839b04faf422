//! Broker 连接层
//!
//! 队列本身是持久层：worker 不在内存里排队任务，连接断开重连后从
//! broker 继续消费即可。重试只存在于这一层，管线内部的失败一律丢弃。

pub mod backoff;
pub mod connection;
pub mod dispatcher;

pub use backoff::Backoff;
pub use connection::{
    BrokerError, BrokerLink, BrokerPublisher, ConnectionManager, SessionEnd, broker_channel,
};
