pub mod api_key_helpers;
pub mod api_key_types;
