//! Catalog domain model.
//!
//! # Responsibility
//! - Define the product record and the inputs that create or patch it.
//! - Define pagination request/response shapes for listing.
//!
//! # Invariants
//! - Every product is identified by a store-assigned, never reused `ProductId`.
//! - Deletion is represented by `available = false`, not hard delete.

pub mod page;
pub mod product;
