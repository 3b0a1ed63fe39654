use time::PrimitiveDateTime;

/// Row of the shared `session` table written by the login front.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionRow {
    pub sid: String,
    pub sess: serde_json::Value,
    pub expire: PrimitiveDateTime,
}

impl SessionRow {
    /// Owner id serialized by the login front under `passport.user`.
    pub fn owner_id(&self) -> Option<&str> {
        self.sess
            .get("passport")
            .and_then(|p| p.get("user"))
            .and_then(|u| u.as_str())
            .filter(|u| !u.is_empty())
    }
}
