//! PostgreSQL adapter.

mod match_store;

pub use match_store::PostgresMatchStore;
