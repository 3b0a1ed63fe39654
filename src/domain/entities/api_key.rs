use crate::domain::value_objects::ids::OwnerId;
use crate::domain::value_objects::timestamps::Timestamp;
use time::Date;

/// Usage counters of a key for a single UTC day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyUsage {
    pub requests_today: u32,
    pub last_request_date: Date,
}

/// One issued API credential.
///
/// `key_hash` is the lookup identity; the raw token is only ever seen by its owner at
/// issue time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeyRecord {
    pub key_hash: String,
    pub key_prefix: String,
    pub owner_id: OwnerId,
    pub requests_today: u32,
    pub last_request_date: Date,
    pub created_at: Timestamp,
}

impl ApiKeyRecord {
    /// A fresh record with an empty counter dated on the creation day.
    pub fn new(key_hash: String, key_prefix: String, owner_id: OwnerId, now: Timestamp) -> Self {
        Self {
            key_hash,
            key_prefix,
            owner_id,
            requests_today: 0,
            last_request_date: now.utc_date(),
            created_at: now,
        }
    }

    pub fn usage(&self) -> DailyUsage {
        DailyUsage {
            requests_today: self.requests_today,
            last_request_date: self.last_request_date,
        }
    }

    /// Copy of this record carrying the given counters.
    pub fn with_usage(&self, usage: DailyUsage) -> Self {
        Self {
            requests_today: usage.requests_today,
            last_request_date: usage.last_request_date,
            ..self.clone()
        }
    }
}
