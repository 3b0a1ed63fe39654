use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: Server,
    pub db: Db,
    pub quota: Quota,
    pub session: Session,
    pub public: Public,
    pub cors: Cors,
    pub log: Log,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Db {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_ms: u64,
}

/// Daily per-key quota.
#[derive(Debug, Deserialize, Clone)]
pub struct Quota {
    pub daily_limit: u32,
    /// Compare-and-set attempts before a contended request fails closed.
    pub max_update_attempts: u32,
}

/// Signed session cookie issued by the login front (OAuth handled upstream).
#[derive(Debug, Deserialize, Clone)]
pub struct Session {
    pub secret: String,
    pub cookie_name: String,
}

/// Public API-key endpoints.
#[derive(Debug, Deserialize, Clone)]
pub struct Public {
    pub default_limit: u32,
    pub max_limit: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Cors {
    pub allowed_origin: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Log {
    pub filter: String,
    pub json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: Server {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            db: Db {
                url: "postgres://localhost/devprofiles".to_string(),
                max_connections: 10,
                acquire_timeout_ms: 5_000,
            },
            quota: Quota {
                daily_limit: 100,
                max_update_attempts: 3,
            },
            session: Session {
                secret: String::new(),
                cookie_name: "connect.sid".to_string(),
            },
            public: Public {
                default_limit: 10,
                max_limit: 50,
            },
            cors: Cors {
                allowed_origin: "https://dev-profiles.netlify.app".to_string(),
            },
            log: Log {
                filter: "info".to_string(),
                json: false,
            },
        }
    }
}

/// Load settings from `config/default.toml`, `config/<env>.toml`, and env overrides.
pub fn load() -> Result<Settings, config::ConfigError> {
    let env_name = std::env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());
    config::Config::builder()
        .add_source(config::File::with_name("config/default"))
        .add_source(config::File::with_name(&format!("config/{env_name}")).required(false))
        .add_source(config::Environment::with_prefix("DEVPROFILES").separator("__"))
        .build()?
        .try_deserialize()
}
