//! External collaborators
//!
//! Thin clients with narrow contracts: the document renderer (HTTP), the
//! storage bucket (S3) and the billing RPC service. The worker coordinates
//! these — it never renders, stores or bills anything itself.

pub mod billing;
pub mod renderer;
pub mod storage;

pub use billing::{BillingRpc, HttpBillingRpc, OperatingCompany, RpcError};
pub use renderer::{HttpRenderer, RenderError, Renderer};
pub use storage::{FileLocation, FileStorage, S3Storage, StorageError};
