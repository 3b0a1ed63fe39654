use crate::domain::entities::api_key::ApiKeyRecord;
use serde::Serialize;
use time::format_description::well_known::Rfc3339;

/// Body of a successful issuance; the only response that carries the raw key.
#[derive(Debug, Serialize)]
pub struct IssuedApiKeyResponse {
    pub success: bool,
    pub api_key: String,
    pub key_prefix: String,
    pub created_at: String,
}

/// Dashboard view of the owner's key.
#[derive(Debug, Serialize)]
pub struct ApiKeyMetadataResponse {
    pub key_prefix: String,
    pub requests_today: u32,
    pub daily_limit: u32,
    pub last_request_date: String,
    pub created_at: String,
}

impl ApiKeyMetadataResponse {
    pub fn from_record(record: &ApiKeyRecord, daily_limit: u32) -> Self {
        Self {
            key_prefix: record.key_prefix.clone(),
            requests_today: record.requests_today,
            daily_limit,
            last_request_date: record.last_request_date.to_string(),
            created_at: format_rfc3339(record.created_at.as_inner()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RevokeApiKeysResponse {
    pub revoked: u64,
}

#[derive(Debug, Serialize)]
pub struct DeleteAccountResponse {
    pub success: bool,
    pub revoked_keys: u64,
    pub deleted_projects: u64,
}

pub fn format_rfc3339(value: time::OffsetDateTime) -> String {
    value.format(&Rfc3339).unwrap_or_default()
}
