//! wayedge database layer: SurrealDB connection management, schema
//! migrations, and repository implementations.
//!
//! Every multi-row write (website creation, reconciliation, origin
//! replacement, website deletion) runs as a single SurrealQL
//! transaction; a failing statement rolls the whole unit back.

mod connection;
mod error;
pub mod repository;
mod schema;
mod store;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::run_migrations;
pub use store::SurrealStore;
