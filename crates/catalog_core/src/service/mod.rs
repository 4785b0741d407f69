//! Catalog use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the catalog operations.
//! - Keep boundary layers decoupled from storage details.

pub mod catalog_service;
