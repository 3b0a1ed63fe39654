pub mod api_key;
pub mod project;
pub mod session;

pub use api_key::ApiKeyRow;
pub use project::ProjectRow;
pub use session::SessionRow;
