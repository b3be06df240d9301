//! Configuration management for InsightPulse.
//!
//! Loads configuration from ${INSIGHTPULSE_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default config template with comments, embedded at compile time.
const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("default_config.toml");

pub mod paths {
    //! Path resolution for InsightPulse configuration.
    //!
    //! Home resolution order:
    //! 1. INSIGHTPULSE_HOME environment variable (if set)
    //! 2. ~/.config/insightpulse (default)

    use std::path::PathBuf;

    /// Returns the InsightPulse home directory.
    pub fn insightpulse_home() -> PathBuf {
        if let Ok(home) = std::env::var("INSIGHTPULSE_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("insightpulse"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        insightpulse_home().join("config.toml")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The Gemini model to use
    pub model: String,

    /// Maximum tokens per model response
    pub max_output_tokens: u32,

    /// Dataset rows embedded in the insight prompt
    pub summary_sample_rows: usize,

    /// Dataset rows embedded in each chat prompt
    pub chat_sample_rows: usize,

    /// Only export a report when the chat transcript is non-empty
    pub export_requires_chat: bool,

    /// Label used for model answers in the terminal and the report
    pub responder_label: String,

    /// Optional Gemini API base URL (for test rigs or proxies)
    pub gemini_base_url: Option<String>,
}

impl Config {
    const DEFAULT_MODEL: &str = "gemini-1.5-flash";
    const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1024;
    const DEFAULT_SUMMARY_SAMPLE_ROWS: usize = 10;
    const DEFAULT_CHAT_SAMPLE_ROWS: usize = 15;
    const DEFAULT_RESPONDER_LABEL: &str = "Gemini";

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Saves only the model field to a specific config file path.
    ///
    /// Creates the file with the default template if it doesn't exist.
    /// Preserves existing fields and comments using toml_edit.
    pub fn save_model_to(path: &Path, model: &str) -> Result<()> {
        use toml_edit::{DocumentMut, value};

        let contents = if path.exists() {
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?
        } else {
            DEFAULT_CONFIG_TEMPLATE.to_string()
        };

        let mut doc: DocumentMut = contents
            .parse()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        doc["model"] = value(model);

        Self::write_config(path, &doc.to_string())
    }

    /// Returns the effective Gemini base URL from config, if set.
    /// Empty strings are treated as unset.
    pub fn effective_gemini_base_url(&self) -> Option<&str> {
        self.gemini_base_url
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, DEFAULT_CONFIG_TEMPLATE)
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: Self::DEFAULT_MODEL.to_string(),
            max_output_tokens: Self::DEFAULT_MAX_OUTPUT_TOKENS,
            summary_sample_rows: Self::DEFAULT_SUMMARY_SAMPLE_ROWS,
            chat_sample_rows: Self::DEFAULT_CHAT_SAMPLE_ROWS,
            export_requires_chat: false,
            responder_label: Self::DEFAULT_RESPONDER_LABEL.to_string(),
            gemini_base_url: None,
        }
    }
}
