//! Client configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::credentials::CredentialPaths;
use crate::error::{Error, Result};

const PRODUCTION_HOST: &str = "https://gateway.95516.com";
const TEST_HOST: &str = "https://101.231.204.80:5000";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Production,
    Test,
}

impl Environment {
    pub fn host(&self) -> &'static str {
        match self {
            Environment::Production => PRODUCTION_HOST,
            Environment::Test => TEST_HOST,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Merchant code assigned by the gateway (`merId`).
    pub merchant_id: String,
    #[serde(default)]
    pub environment: Environment,
    /// Overrides the environment's host, e.g. for a local mock gateway.
    #[serde(default)]
    pub host: Option<String>,
    /// Skip TLS certificate verification. Only meant for the gateway's test
    /// environment, which serves a certificate for a bare IP address.
    #[serde(default)]
    pub accept_invalid_certs: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub credentials: Option<CredentialPaths>,
}

fn default_timeout_secs() -> u64 {
    30
}

impl GatewayConfig {
    pub fn new(merchant_id: impl Into<String>, environment: Environment) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            environment,
            host: None,
            accept_invalid_certs: false,
            timeout_secs: default_timeout_secs(),
            credentials: None,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &[u8]) -> Result<Self> {
        let config: Self =
            serde_json::from_slice(data).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.merchant_id.trim().is_empty() {
            return Err(Error::Config("merchant_id must not be empty".into()));
        }
        if let Some(host) = &self.host {
            if !(host.starts_with("https://") || host.starts_with("http://")) {
                return Err(Error::Config(format!("host {host:?} must be an http(s) URL")));
            }
        }
        Ok(())
    }

    /// Base URL requests are sent to, without a trailing slash.
    pub fn host(&self) -> &str {
        self.host
            .as_deref()
            .unwrap_or_else(|| self.environment.host())
            .trim_end_matches('/')
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}
