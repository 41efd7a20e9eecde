use crate::error::{CrmError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub generation: GenerationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub listen_addr: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_hours: u64,
}

/// Where drafts come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Call an OpenAI-compatible provider directly
    Openai,
    /// Call a deployed generation endpoint
    Remote,
    /// Scripted local generator, no network
    Mock,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationConfig {
    pub mode: GenerationMode,
    /// `POST /generate-message` URL, used in remote mode
    pub endpoint_url: Option<String>,
    pub api_base: Option<String>,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    /// "pretty" or "json"
    pub format: String,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| CrmError::Config(e.to_string()))?;

        toml::from_str(&content).map_err(|e| CrmError::Config(e.to_string()))
    }

    /// Load `path` when it exists, defaults otherwise, then apply the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(path)?,
            Some(path) => {
                return Err(CrmError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )))
            }
            None if Path::new("crm.toml").exists() => Self::from_file("crm.toml")?,
            None => Self::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Override secrets and endpoints from the environment
    pub fn apply_env_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("CRM_DATABASE_URL") {
            self.storage.database_url = url;
        }
        if let Some(secret) = var("CRM_JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(key) = var("OPENAI_API_KEY") {
            self.generation.api_key = Some(key);
        }
        if let Some(url) = var("GENERATION_ENDPOINT_URL") {
            self.generation.endpoint_url = Some(url);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(CrmError::Config("auth.jwt_secret must not be empty".into()));
        }
        match self.generation.mode {
            GenerationMode::Remote if self.generation.endpoint_url.is_none() => Err(
                CrmError::Config("generation.endpoint_url is required in remote mode".into()),
            ),
            GenerationMode::Openai if self.generation.api_key.is_none() => Err(CrmError::Config(
                "generation.api_key (or OPENAI_API_KEY) is required in openai mode".into(),
            )),
            _ => Ok(()),
        }
    }

    pub fn default() -> Self {
        Self {
            server: ServerConfig {
                listen_addr: "0.0.0.0:8080".to_string(),
            },
            storage: StorageConfig {
                database_url: "sqlite://crm.db".to_string(),
            },
            auth: AuthConfig {
                jwt_secret: "change-me-in-production".to_string(),
                token_hours: 24,
            },
            generation: GenerationConfig {
                mode: GenerationMode::Mock,
                endpoint_url: None,
                api_base: None,
                api_key: None,
                model: "gpt-4o-mini".to_string(),
                temperature: 0.7,
                max_tokens: 500,
                timeout_seconds: 30,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}
