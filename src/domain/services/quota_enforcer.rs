use crate::domain::entities::api_key::{ApiKeyRecord, DailyUsage};
use time::Date;

pub const DEFAULT_DAILY_LIMIT: u32 = 100;

/// Outcome of evaluating one request against a key's daily quota.
///
/// Both variants carry the record as it must be persisted: on `Reject` the counter may
/// have rolled over to the new day but is never incremented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotaDecision {
    Admit { record: ApiKeyRecord },
    Reject { record: ApiKeyRecord },
}

impl QuotaDecision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, QuotaDecision::Admit { .. })
    }

    pub fn record(&self) -> &ApiKeyRecord {
        match self {
            QuotaDecision::Admit { record } | QuotaDecision::Reject { record } => record,
        }
    }

    pub fn into_record(self) -> ApiKeyRecord {
        match self {
            QuotaDecision::Admit { record } | QuotaDecision::Reject { record } => record,
        }
    }
}

/// Fixed daily request quota per API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaEnforcer {
    daily_limit: u32,
}

impl QuotaEnforcer {
    pub fn new(daily_limit: u32) -> Self {
        Self { daily_limit }
    }

    pub fn daily_limit(&self) -> u32 {
        self.daily_limit
    }

    /// Decide admit/reject for one request observed on `today`.
    ///
    /// The counter is reset relative to the caller's `today`, never a separately read
    /// clock, so a record evaluated on a later day resets exactly once.
    pub fn evaluate(&self, record: &ApiKeyRecord, today: Date) -> QuotaDecision {
        // Step 1: Roll the counter over when the stored day is not today.
        let effective = if record.last_request_date == today {
            record.requests_today
        } else {
            0
        };

        // Step 2: Reject at the limit, keeping the rollover but not counting the request.
        // A counter above a since-lowered limit is pulled back to the limit.
        if effective >= self.daily_limit {
            let record = record.with_usage(DailyUsage {
                requests_today: effective.min(self.daily_limit),
                last_request_date: today,
            });
            return QuotaDecision::Reject { record };
        }

        // Step 3: Count the admitted request.
        let record = record.with_usage(DailyUsage {
            requests_today: effective + 1,
            last_request_date: today,
        });
        QuotaDecision::Admit { record }
    }

    /// Requests still available today for a record as last persisted.
    pub fn remaining(&self, record: &ApiKeyRecord, today: Date) -> u32 {
        let used = if record.last_request_date == today {
            record.requests_today
        } else {
            0
        };
        self.daily_limit.saturating_sub(used)
    }
}

impl Default for QuotaEnforcer {
    fn default() -> Self {
        Self::new(DEFAULT_DAILY_LIMIT)
    }
}
