//! Configuration management for the genealogy grapher
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "https://www.mathgenealogy.org";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub resolver: ResolverSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 30,
            user_agent: format!("genealogy-grapher/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    /// Load configuration from environment variables
    pub fn load_from_env() -> Result<Self> {
        let mut config = Config::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Override fields from environment variables if present
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(base_url) = std::env::var("GENEALOGY_BASE_URL") {
            self.resolver.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("GENEALOGY_TIMEOUT_SECONDS") {
            self.resolver.timeout_seconds = timeout
                .parse()
                .with_context(|| format!("Invalid GENEALOGY_TIMEOUT_SECONDS: '{}'", timeout))?;
        }

        if let Ok(user_agent) = std::env::var("GENEALOGY_USER_AGENT") {
            self.resolver.user_agent = user_agent;
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let base_url = self.resolver.base_url.trim();
        if base_url.is_empty() {
            return Err(anyhow::anyhow!("Resolver base URL must not be empty"));
        }

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "Resolver base URL must use http or https, got '{}'",
                base_url
            ));
        }

        if self.resolver.timeout_seconds == 0 {
            return Err(anyhow::anyhow!("Resolver timeout must be greater than 0"));
        }

        Ok(())
    }
}
