//! The account store: the primary relational dataset behind the grid.
//!
//! All queries are parameter-bound; filter values never reach the SQL
//! string. Correctness never depends on the cache layer.

pub mod accounts;
pub mod connection;

pub use accounts::{Account, COLUMNS, DISTINCT_FIELDS, SearchResult};
pub use connection::StoreDb;
