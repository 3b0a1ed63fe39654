use crate::domain::services::quota_enforcer::QuotaEnforcer;
use crate::infrastructure::db::repositories::Repositories;

/// Shared application resources used by use cases.
pub struct AppContext {
    pub repos: Repositories,
    pub quota: QuotaEnforcer,
    /// Compare-and-set attempts per quota evaluation before failing closed.
    pub quota_update_attempts: u32,
}

impl AppContext {
    /// Build a new application context with shared repositories and the quota policy.
    pub fn new(repos: Repositories, quota: QuotaEnforcer, quota_update_attempts: u32) -> Self {
        Self {
            repos,
            quota,
            quota_update_attempts: quota_update_attempts.max(1),
        }
    }
}
