pub mod api_key_store;
pub mod project_store;
pub mod session_store;
