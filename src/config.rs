use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::poll::PollSettings;

/// Main configuration structure for tag-provision
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TagProvisionConfig {
    /// Platform endpoints and credentials
    pub platform: PlatformConfig,
    /// Convergence polling settings
    pub poll: PollConfig,
    /// Observability settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlatformConfig {
    /// Base URL of the instance store API
    pub store_url: String,
    /// Base URL of the managed-element gateway API
    pub gateway_url: String,
    /// API token (can be set via env var)
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PollConfig {
    /// Fixed delay between probe attempts, in seconds
    pub delay_seconds: u64,
    /// Wall-clock budget for one polling run, in seconds
    pub timeout_seconds: u64,
}

impl PollConfig {
    pub fn settings(&self) -> PollSettings {
        PollSettings {
            delay: Duration::from_secs(self.delay_seconds),
            timeout: Duration::from_secs(self.timeout_seconds),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level
    pub log_level: String,
}

impl Default for TagProvisionConfig {
    fn default() -> Self {
        Self {
            platform: PlatformConfig {
                store_url: "http://localhost:8080/api/process-automation".to_string(),
                gateway_url: "http://localhost:8080/api/elements".to_string(),
                token: None, // Read from env var when not configured
            },
            poll: PollConfig {
                delay_seconds: 3,
                timeout_seconds: 300, // 5 minutes
            },
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
            },
        }
    }
}

impl TagProvisionConfig {
    /// Load configuration with precedence:
    /// 1. Default values
    /// 2. Configuration file (tag-provision.toml)
    /// 3. Environment variables (prefixed with TAG_PROVISION_)
    pub fn load() -> Result<Self> {
        let defaults = Config::try_from(&TagProvisionConfig::default())?;
        let mut builder = Config::builder().add_source(defaults);

        if Path::new("tag-provision.toml").exists() {
            builder = builder.add_source(File::with_name("tag-provision"));
        }

        builder = builder.add_source(
            Environment::with_prefix("TAG_PROVISION")
                .separator("_")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let mut tag_provision_config: TagProvisionConfig = config.try_deserialize()?;

        // Token can come from a dedicated env var as well
        if tag_provision_config.platform.token.is_none() {
            if let Ok(token) = std::env::var("TAG_PROVISION_API_TOKEN") {
                tag_provision_config.platform.token = Some(token);
            }
        }

        Ok(tag_provision_config)
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<TagProvisionConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        let _ = TagProvisionConfig::load_env_file();
        TagProvisionConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static TagProvisionConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

/// Initialize configuration (called at startup)
pub fn init_config() -> Result<()> {
    let _config = config()?;
    tracing::info!("Configuration loaded successfully");
    Ok(())
}
