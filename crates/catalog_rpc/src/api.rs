//! Catalog request dispatch and failure translation.
//!
//! # Responsibility
//! - Decode typed requests for the five catalog operations.
//! - Run field validation before the core is called.
//! - Translate `CatalogError` into `{kind, message, status}` failures.
//! - Own the store connection for the lifetime of the serving process.
//!
//! # Invariants
//! - `handle_json` never panics and always returns one JSON envelope.
//! - Only the request `id` selects the product; identity and availability
//!   cannot be changed by an update payload.

use catalog_core::db::{close_db, open_db, open_db_in_memory, DbResult};
use catalog_core::{
    CatalogError, CatalogService, ErrorKind, NewProduct, PaginationQuery, ProductId,
    ProductPatch, ProductValidationError, RepoError, SqliteProductRepository,
    STATUS_BAD_REQUEST, STATUS_INTERNAL_ERROR,
};
use log::{debug, info, warn};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::RpcConfig;

const ENCODE_FAILURE_RESPONSE: &str = r#"{"ok":false,"error":{"kind":"internal","message":"failed to encode response","status":"internal error"}}"#;

/// One catalog call, tagged by `cmd` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum CatalogRequest {
    CreateProduct(NewProduct),
    FindAllProducts(PaginationQuery),
    FindOneProduct {
        id: ProductId,
    },
    UpdateProduct {
        id: ProductId,
        #[serde(flatten)]
        patch: ProductPatch,
    },
    DeleteProduct {
        id: ProductId,
    },
}

impl CatalogRequest {
    /// Wire name of the command, used in log events.
    pub fn command(&self) -> &'static str {
        match self {
            Self::CreateProduct(_) => "create_product",
            Self::FindAllProducts(_) => "find_all_products",
            Self::FindOneProduct { .. } => "find_one_product",
            Self::UpdateProduct { .. } => "update_product",
            Self::DeleteProduct { .. } => "delete_product",
        }
    }
}

/// Failure category reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NotFound,
    Validation,
    StorageFault,
    BadPayload,
    Internal,
}

/// Structured failure returned instead of an exception.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcFailure {
    pub kind: FailureKind,
    pub message: String,
    /// Transport-neutral status hint, e.g. `bad request`.
    pub status: String,
}

impl RpcFailure {
    fn new(kind: FailureKind, message: impl Into<String>, status: &str) -> Self {
        Self {
            kind,
            message: message.into(),
            status: status.to_string(),
        }
    }

    fn bad_payload(message: impl Into<String>) -> Self {
        Self::new(FailureKind::BadPayload, message, STATUS_BAD_REQUEST)
    }
}

impl From<CatalogError> for RpcFailure {
    fn from(value: CatalogError) -> Self {
        let kind = match value.kind() {
            ErrorKind::NotFound => FailureKind::NotFound,
            ErrorKind::StorageFault => FailureKind::StorageFault,
        };
        Self::new(kind, value.to_string(), value.status_hint())
    }
}

impl From<ProductValidationError> for RpcFailure {
    fn from(value: ProductValidationError) -> Self {
        Self::new(FailureKind::Validation, value.to_string(), STATUS_BAD_REQUEST)
    }
}

/// Response envelope written back to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcFailure>,
}

impl RpcResponse {
    fn success(data: Value) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    fn failure(error: RpcFailure) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error),
        }
    }
}

impl From<Result<Value, RpcFailure>> for RpcResponse {
    fn from(value: Result<Value, RpcFailure>) -> Self {
        match value {
            Ok(data) => Self::success(data),
            Err(error) => Self::failure(error),
        }
    }
}

/// Catalog endpoint owning one store connection.
pub struct CatalogRpc {
    conn: Connection,
}

impl CatalogRpc {
    /// Opens the configured database file and verifies its schema.
    pub fn open(config: &RpcConfig) -> Result<Self, RepoError> {
        Self::from_connection(open_db(&config.db_path)?)
    }

    /// Opens a fresh in-memory store.
    pub fn open_in_memory() -> Result<Self, RepoError> {
        Self::from_connection(open_db_in_memory()?)
    }

    /// Wraps an already opened connection after checking its schema.
    pub fn from_connection(conn: Connection) -> Result<Self, RepoError> {
        SqliteProductRepository::try_new(&conn)?;
        Ok(Self { conn })
    }

    /// Closes the underlying store connection.
    pub fn close(self) -> DbResult<()> {
        close_db(self.conn)
    }

    /// Executes one request and returns its JSON payload.
    pub fn handle(&self, request: CatalogRequest) -> Result<Value, RpcFailure> {
        let command = request.command();
        debug!("event=rpc_request module=rpc status=start cmd={command}");

        let result = self.dispatch(request);
        match &result {
            Ok(_) => debug!("event=rpc_request module=rpc status=ok cmd={command}"),
            Err(failure) if failure.kind == FailureKind::StorageFault => warn!(
                "event=rpc_request module=rpc status=error cmd={} kind={:?}",
                command, failure.kind
            ),
            Err(failure) => info!(
                "event=rpc_request module=rpc status=rejected cmd={} kind={:?}",
                command, failure.kind
            ),
        }
        result
    }

    /// Decodes, executes and encodes one JSON request.
    pub fn handle_json(&self, raw: &str) -> String {
        let result = serde_json::from_str::<CatalogRequest>(raw)
            .map_err(|err| RpcFailure::bad_payload(format!("invalid request: {err}")))
            .and_then(|request| self.handle(request));
        encode_response(&RpcResponse::from(result))
    }

    fn dispatch(&self, request: CatalogRequest) -> Result<Value, RpcFailure> {
        let service = CatalogService::new(SqliteProductRepository::new(&self.conn));

        match request {
            CatalogRequest::CreateProduct(input) => {
                input.validate()?;
                to_payload(&service.create(&input)?)
            }
            CatalogRequest::FindAllProducts(query) => to_payload(&service.find_all(&query)?),
            CatalogRequest::FindOneProduct { id } => to_payload(&service.find_one(id)?),
            CatalogRequest::UpdateProduct { id, patch } => {
                patch.validate()?;
                to_payload(&service.update(id, &patch)?)
            }
            CatalogRequest::DeleteProduct { id } => to_payload(&service.remove(id)?),
        }
    }
}

fn to_payload<T: Serialize>(value: &T) -> Result<Value, RpcFailure> {
    serde_json::to_value(value).map_err(|err| {
        RpcFailure::new(
            FailureKind::Internal,
            format!("failed to encode response: {err}"),
            STATUS_INTERNAL_ERROR,
        )
    })
}

fn encode_response(response: &RpcResponse) -> String {
    serde_json::to_string(response).unwrap_or_else(|err| {
        warn!("event=rpc_encode module=rpc status=error error={err}");
        ENCODE_FAILURE_RESPONSE.to_string()
    })
}
