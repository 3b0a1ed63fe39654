pub mod consume_quota;
pub mod delete_account;
pub mod get_api_key;
pub mod issue_api_key;
pub mod list_projects;
pub mod resolve_api_key;
pub mod revoke_owner_keys;
