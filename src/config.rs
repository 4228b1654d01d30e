use std::env;

use anyhow::{Context, anyhow};

use crate::models::CheckoutStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    /// Process-local store; data is lost on restart.
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailConfig {
    /// Render refund confirmations into the log instead of delivering them.
    Log { from: String },
    /// POST rendered messages to an HTTP mail relay.
    Http {
        endpoint: String,
        api_key: String,
        from: String,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub store: StoreKind,
    pub mail: MailConfig,
    pub net_revenue_statuses: Option<Vec<CheckoutStatus>>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let store = match env::var("APP_STORE").as_deref() {
            Ok("memory") => StoreKind::Memory,
            Ok("postgres") | Err(_) => StoreKind::Postgres,
            Ok(other) => return Err(anyhow!("APP_STORE must be `postgres` or `memory`, got `{other}`")),
        };
        let database_url = match store {
            StoreKind::Postgres => Some(env::var("DATABASE_URL").context("DATABASE_URL is not set")?),
            StoreKind::Memory => env::var("DATABASE_URL").ok(),
        };
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let net_revenue_statuses = env::var("NET_REVENUE_STATUSES")
            .ok()
            .map(|raw| parse_status_list(&raw))
            .transpose()?;

        Ok(Self {
            database_url,
            host,
            port,
            store,
            mail: mail_from_env()?,
            net_revenue_statuses,
        })
    }

    /// Connection string for stores that need one.
    pub fn require_database_url(&self) -> anyhow::Result<&str> {
        self.database_url
            .as_deref()
            .ok_or_else(|| anyhow!("DATABASE_URL is not set"))
    }
}

fn mail_from_env() -> anyhow::Result<MailConfig> {
    let from = env::var("MAIL_FROM").unwrap_or_else(|_| "no-reply@localhost".to_string());
    match env::var("MAIL_TRANSPORT").as_deref() {
        Ok("log") | Err(_) => Ok(MailConfig::Log { from }),
        Ok("http") => Ok(MailConfig::Http {
            endpoint: env::var("MAIL_API_URL").context("MAIL_API_URL is required for the http mail transport")?,
            api_key: env::var("MAIL_API_KEY").context("MAIL_API_KEY is required for the http mail transport")?,
            from: env::var("MAIL_FROM").context("MAIL_FROM is required for the http mail transport")?,
        }),
        Ok(other) => Err(anyhow!("MAIL_TRANSPORT must be `log` or `http`, got `{other}`")),
    }
}

pub fn parse_status_list(raw: &str) -> anyhow::Result<Vec<CheckoutStatus>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<CheckoutStatus>().map_err(anyhow::Error::from))
        .collect()
}
