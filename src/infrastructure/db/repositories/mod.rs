pub mod api_key_repository;
pub mod factory;
pub mod project_repository;
pub mod session_repository;

pub use factory::Repositories;
