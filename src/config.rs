// config.rs
// Environment-driven settings (a .env file is honoured via dotenvy in main).

use std::{env, net::SocketAddr};

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mongodb_uri: String,
    pub mongodb_db: String,
    pub bind_addr: SocketAddr,
    pub default_currency: String,
    pub companies_file: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let bind = var_or("BIND_ADDR", "0.0.0.0:8080");
        let bind_addr = bind
            .parse::<SocketAddr>()
            .with_context(|| format!("invalid BIND_ADDR: {bind}"))?;

        Ok(Self {
            mongodb_uri: var_or("MONGODB_URI", "mongodb://localhost:27017"),
            mongodb_db: var_or("MONGODB_DB", "inmocrm"),
            bind_addr,
            default_currency: var_or("DEFAULT_CURRENCY", "USD").to_uppercase(),
            companies_file: var_or("COMPANIES_FILE", "./data/companies.json"),
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
