//! Configuration loading and management for linkdigest.
//!
//! Loads settings from `linkdigest.toml` with an environment variable override
//! for the inference credential. Every field has a default, so a missing or
//! partial file is still a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the inference endpoint credential
pub const API_TOKEN_ENV: &str = "HF_API_TOKEN";

/// Name of the configuration file searched for on startup
const CONFIG_FILE_NAME: &str = "linkdigest.toml";

/// A desktop Chrome identification, presented to article hosts that block
/// obvious bots.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Content retrieval settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// User-Agent header sent with every outbound fetch
    pub user_agent: String,
    /// Timeout for article page requests, in seconds
    pub article_timeout_secs: u64,
    /// Timeout for PDF downloads, in seconds
    pub pdf_timeout_secs: u64,
    /// Timeout for caption track requests, in seconds
    pub transcript_timeout_secs: u64,
    /// Caption track service, queried with `v` and `lang` parameters
    pub transcript_endpoint: String,
    /// Caption language requested from the caption service
    pub transcript_lang: String,
}

/// Inference endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    pub endpoint: String,
    /// Bearer credential; overridden by `HF_API_TOKEN`
    pub api_token: Option<String>,
    pub timeout_secs: u64,
    pub min_length: u32,
    pub max_length: u32,
    /// Maximum number of characters of extracted text sent for summarization
    pub max_input_chars: usize,
    /// Instruction placed ahead of the text
    pub prompt: String,
}

/// HTTP boundary settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub summarizer: SummarizerConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from the default location (linkdigest.toml in cwd or home),
    /// falling back to built-in defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::find_config_file() {
            Some(path) => Self::parse_file(&path)?,
            None => Config::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::parse_file(path)?;
        config.apply_env();
        Ok(config)
    }

    fn parse_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Override the credential from the environment
    fn apply_env(&mut self) {
        if let Ok(token) = std::env::var(API_TOKEN_ENV) {
            if !token.trim().is_empty() {
                self.summarizer.api_token = Some(token);
            }
        }
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let local_config = PathBuf::from(CONFIG_FILE_NAME);
        if local_config.exists() {
            return Some(local_config);
        }

        let home_config = dirs::home_dir()?
            .join(".config")
            .join("linkdigest")
            .join(CONFIG_FILE_NAME);
        home_config.exists().then_some(home_config)
    }
}

impl FetchConfig {
    pub fn article_timeout(&self) -> Duration {
        Duration::from_secs(self.article_timeout_secs)
    }

    pub fn pdf_timeout(&self) -> Duration {
        Duration::from_secs(self.pdf_timeout_secs)
    }

    pub fn transcript_timeout(&self) -> Duration {
        Duration::from_secs(self.transcript_timeout_secs)
    }
}

impl SummarizerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: BROWSER_USER_AGENT.to_string(),
            article_timeout_secs: 10,
            pdf_timeout_secs: 20,
            transcript_timeout_secs: 10,
            transcript_endpoint: "https://video.google.com/timedtext".to_string(),
            transcript_lang: "en".to_string(),
        }
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api-inference.huggingface.co/models/facebook/bart-large-cnn"
                .to_string(),
            api_token: None,
            timeout_secs: 60,
            min_length: 30,
            max_length: 150,
            max_input_chars: 4096,
            prompt: "Summarize the following text in a detailed and structured way:".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}
