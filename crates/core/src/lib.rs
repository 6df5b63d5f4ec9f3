//! Core types and shared functionality for gridview.
//!
//! This crate provides:
//! - Filter compilation from typed request parameters to bound SQL predicates
//! - Deterministic cache key derivation and a SQLite-backed look-aside cache
//! - The account store (search, distinct values, export)
//! - Unified error types and layered configuration

pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod migrations;
pub mod store;

pub use cache::{CacheDb, CacheStats};
pub use config::AppConfig;
pub use error::Error;
pub use filter::{FilterClause, FilterRequest, TextFilter, TextOp};
pub use store::{Account, SearchResult, StoreDb};
