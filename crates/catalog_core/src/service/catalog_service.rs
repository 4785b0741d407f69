//! Catalog use-case service.
//!
//! # Responsibility
//! - Provide create, paginated list, lookup, update and soft-delete entry
//!   points over any `ProductRepository`.
//! - Translate store outcomes into typed `CatalogError` values.
//!
//! # Invariants
//! - Soft-deleted products are invisible: `find_one`, `update` and `remove`
//!   report `NotFound` for them exactly as for ids that never existed.
//! - `update` and `remove` run the `find_one` existence gate first and do not
//!   write when it fails.
//! - Input fields are assumed already validated by the caller.
//! - No retries; a failed store call fails the operation.
//!
//! The gate and the following write are separate store calls. A product
//! soft-deleted between them can still receive the write; this window is
//! accepted and not locked against. The same holds for the count and the page
//! fetch in `find_all`.

use crate::model::page::{last_page, Page, PageMetadata, PaginationQuery};
use crate::model::product::{NewProduct, Product, ProductId, ProductPatch};
use crate::repo::product_repo::{ProductRepository, RepoError};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Status hint attached to `NotFound` for transport layers.
pub const STATUS_BAD_REQUEST: &str = "bad request";
/// Status hint attached to storage faults for transport layers.
pub const STATUS_INTERNAL_ERROR: &str = "internal error";

/// Coarse error category exposed to boundary layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    StorageFault,
}

/// Service error for catalog operations.
#[derive(Debug)]
pub enum CatalogError {
    /// No available product has this id.
    NotFound(ProductId),
    /// Persistence-layer failure, propagated unchanged.
    Storage(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Storage(_) | Self::InconsistentState(_) => ErrorKind::StorageFault,
        }
    }

    /// Informational status for the transport layer to map onto its own
    /// status vocabulary.
    pub fn status_hint(&self) -> &'static str {
        match self.kind() {
            ErrorKind::NotFound => STATUS_BAD_REQUEST,
            ErrorKind::StorageFault => STATUS_INTERNAL_ERROR,
        }
    }
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "Product with id {id} not found"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent product state: {details}")
            }
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CatalogError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Storage(other),
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog facade over a product repository.
pub struct CatalogService<R: ProductRepository> {
    repo: R,
}

impl<R: ProductRepository> CatalogService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Inserts a new available product and returns it with its assigned id.
    pub fn create(&self, input: &NewProduct) -> CatalogResult<Product> {
        let id = self.repo.insert_product(input)?;
        debug!("event=product_create module=catalog status=ok product_id={id}");

        self.repo
            .find_product(id, true)?
            .ok_or(CatalogError::InconsistentState(
                "created product not found in read-back",
            ))
    }

    /// Returns one page of available products plus listing metadata.
    ///
    /// A page past `last_page` yields empty `data` with the same metadata.
    pub fn find_all(&self, query: &PaginationQuery) -> CatalogResult<Page<Product>> {
        let total = self.repo.count_available()?;
        let last_page = last_page(total, query.limit);
        let data = self.repo.list_available(query.offset(), query.limit.get())?;

        debug!(
            "event=product_list module=catalog status=ok page={} limit={} total={} returned={}",
            query.page,
            query.limit,
            total,
            data.len()
        );

        Ok(Page {
            data,
            metadata: PageMetadata {
                total,
                last_page,
                page: query.page.get(),
            },
        })
    }

    /// Looks up an available product by id.
    ///
    /// # Errors
    /// - `NotFound` when the id never existed or the product was removed.
    pub fn find_one(&self, id: ProductId) -> CatalogResult<Product> {
        match self.repo.find_product(id, false)? {
            Some(product) => Ok(product),
            None => {
                info!("event=product_lookup module=catalog status=not_found product_id={id}");
                Err(CatalogError::NotFound(id))
            }
        }
    }

    /// Applies the present patch fields to an available product.
    ///
    /// An empty patch performs no write and returns the product unchanged.
    pub fn update(&self, id: ProductId, patch: &ProductPatch) -> CatalogResult<Product> {
        let current = self.find_one(id)?;
        if patch.is_empty() {
            return Ok(current);
        }

        self.repo.update_product(id, patch)?;
        debug!(
            "event=product_update module=catalog status=ok product_id={id} name_changed={} price_changed={}",
            patch.name.is_some(),
            patch.price.is_some()
        );

        self.read_back(id, "updated product not found in read-back")
    }

    /// Soft-deletes an available product and returns it with
    /// `available = false`.
    ///
    /// Removing an already removed product fails with `NotFound`.
    pub fn remove(&self, id: ProductId) -> CatalogResult<Product> {
        self.find_one(id)?;

        self.repo.set_available(id, false)?;
        debug!("event=product_remove module=catalog status=ok product_id={id}");

        self.read_back(id, "removed product not found in read-back")
    }

    fn read_back(&self, id: ProductId, details: &'static str) -> CatalogResult<Product> {
        self.repo
            .find_product(id, true)?
            .ok_or(CatalogError::InconsistentState(details))
    }
}
