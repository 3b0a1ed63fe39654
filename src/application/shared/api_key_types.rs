use crate::domain::entities::api_key::ApiKeyRecord;

/// A freshly issued key. `api_key` is the only time the raw token is exposed.
#[derive(Debug, Clone)]
pub struct IssuedApiKey {
    pub api_key: String,
    pub record: ApiKeyRecord,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKeyUseCaseError {
    NotFound,
    Storage(String),
}
