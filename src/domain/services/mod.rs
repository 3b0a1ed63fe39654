pub mod quota_enforcer;
