pub mod api_key_store_postgres;
mod database;
pub mod project_store_postgres;
pub mod session_store_postgres;

pub use database::PostgresDatabase;
