//! Store contract and persistence implementation.
//!
//! # Responsibility
//! - Define the primitive product store operations the catalog core needs.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.
//! - Repository writes never physically delete product rows.

pub mod product_repo;
