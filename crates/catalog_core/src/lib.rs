//! Core catalog logic: product records, soft delete and pagination.
//! This crate is the single source of truth for catalog invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::page::{last_page, Page, PageMetadata, PaginationQuery};
pub use model::product::{
    to_price_scale, validate_name, validate_price, NewProduct, Product, ProductId, ProductPatch,
    ProductValidationError, MIN_PRICE, PRICE_SCALE,
};
pub use repo::product_repo::{ProductRepository, RepoError, RepoResult, SqliteProductRepository};
pub use service::catalog_service::{
    CatalogError, CatalogResult, CatalogService, ErrorKind, STATUS_BAD_REQUEST,
    STATUS_INTERNAL_ERROR,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
