//! Request/response boundary for the catalog core.
//!
//! Callers hand in plain data payloads and get back plain data payloads or a
//! structured failure; nothing crossing this boundary panics.

pub mod api;
pub mod config;

pub use api::{CatalogRequest, CatalogRpc, FailureKind, RpcFailure, RpcResponse};
pub use config::RpcConfig;
