use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub environment: String,
    pub port: u16,
    /// PostgreSQL connection string; in-memory storage is used when absent
    pub database_url: Option<String>,
    pub jwt_secret: String,
    /// Token lifetime in seconds
    pub jwt_expiration: i64,
    pub max_connections: u32,
    /// Request timeout in seconds
    pub request_timeout: u64,
    pub log_level: String,
    pub log_json: bool,
    /// Tenant registered at startup unless its domain already exists.
    /// `DEFAULT_TENANT_DOMAIN=""` disables seeding.
    pub default_tenant: Option<TenantSeedConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantSeedConfig {
    pub name: String,
    pub domain: String,
}

impl Default for TenantSeedConfig {
    fn default() -> Self {
        Self {
            name: "Demo".to_string(),
            domain: "demo".to_string(),
        }
    }
}

impl TenantSeedConfig {
    /// Seed from `DEFAULT_TENANT_DOMAIN` / `DEFAULT_TENANT_NAME` values.
    ///
    /// An unset domain falls back to the demo tenant, a blank one disables seeding.
    pub fn from_vars(domain: Option<String>, name: Option<String>) -> Option<Self> {
        let Some(domain) = domain else {
            let seed = Self::default();
            return Some(Self {
                name: name.unwrap_or(seed.name),
                domain: seed.domain,
            });
        };

        let domain = domain.trim().to_lowercase();
        if domain.is_empty() {
            return None;
        }
        Some(Self {
            name: name.unwrap_or_else(|| domain.clone()),
            domain,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            database_url: None,
            jwt_secret: "development-secret-change-me".to_string(),
            jwt_expiration: 86400,
            max_connections: 10,
            request_timeout: 30,
            log_level: "info".to_string(),
            log_json: false,
            default_tenant: Some(TenantSeedConfig::default()),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let default_tenant = TenantSeedConfig::from_vars(
            env::var("DEFAULT_TENANT_DOMAIN").ok(),
            env::var("DEFAULT_TENANT_NAME").ok(),
        );

        Ok(Config {
            environment: env::var("ENVIRONMENT")
                .map_err(|_| anyhow::anyhow!("ENVIRONMENT environment variable is required"))?,
            port: env::var("PORT")
                .map_err(|_| anyhow::anyhow!("PORT environment variable is required"))?
                .parse()?,
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?,
            jwt_expiration: env::var("JWT_EXPIRATION")
                .unwrap_or_else(|_| "86400".to_string())
                .parse()
                .unwrap_or(86400),
            max_connections: env::var("MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,
            request_timeout: env::var("REQUEST_TIMEOUT")
                .unwrap_or_else(|_| "30".to_string())
                .parse()?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_json: env::var("LOG_JSON")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            default_tenant,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn uses_database(&self) -> bool {
        self.database_url.is_some()
    }
}
