use crate::database::DEFAULT_DATABASE_URL;
use anyhow::{Context, Result};
use std::env;

const DEFAULT_PORT: u16 = 8080;

/// Server settings read from the environment (after `.env` is loaded)
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
    pub environment: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("Invalid PORT value: {}", raw))?,
            Err(_) => DEFAULT_PORT,
        };

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        Ok(Self {
            database_url,
            port,
            environment,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
