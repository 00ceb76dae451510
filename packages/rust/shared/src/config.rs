//! Application configuration for the résumé wizard.
//!
//! User config lives at `~/.cvwizard/cvwizard.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CvWizardError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "cvwizard.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".cvwizard";

// ---------------------------------------------------------------------------
// Config structs (matching cvwizard.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend connection settings.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Document download settings.
    #[serde(default)]
    pub download: DownloadConfig,

    /// Job search defaults.
    #[serde(default)]
    pub search: SearchConfig,
}

/// `[backend]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL the `/api/*` routes hang off.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".into()
}
fn default_timeout_secs() -> u64 {
    15
}

/// `[download]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Directory downloaded documents are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Style preselected in the template view.
    #[serde(default = "default_style")]
    pub default_style: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            default_style: default_style(),
        }
    }
}

fn default_output_dir() -> String {
    "~/cvwizard-downloads".into()
}
fn default_style() -> String {
    "classic".into()
}

/// `[search]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Location prefilled in the job search inputs.
    #[serde(default)]
    pub default_location: String,
}

// ---------------------------------------------------------------------------
// Gateway config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime gateway configuration, merged from the config file and CLI flags.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Backend base URL as written; parsed by [`GatewayConfig::base_url`].
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Parse the base URL, rejecting anything that cannot carry a path.
    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            CvWizardError::config(format!("invalid backend URL '{}': {e}", self.base_url))
        })?;
        if url.cannot_be_a_base() {
            return Err(CvWizardError::config(format!(
                "backend URL '{}' cannot be a base",
                self.base_url
            )));
        }
        Ok(url)
    }

    /// Replace the base URL (used for the `--backend` CLI flag).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl From<&AppConfig> for GatewayConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.backend.base_url.clone(),
            timeout: Duration::from_secs(config.backend.timeout_secs),
        }
    }
}

impl DownloadConfig {
    /// Resolve `output_dir`, expanding a leading `~/` to the home directory.
    pub fn resolved_output_dir(&self) -> Result<PathBuf> {
        match self.output_dir.strip_prefix("~/") {
            Some(rest) => {
                let home = dirs::home_dir().ok_or_else(|| {
                    CvWizardError::config("could not determine home directory")
                })?;
                Ok(home.join(rest))
            }
            None => Ok(PathBuf::from(&self.output_dir)),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.cvwizard/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CvWizardError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.cvwizard/cvwizard.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CvWizardError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| CvWizardError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| CvWizardError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| CvWizardError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| CvWizardError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("base_url"));
        assert!(toml_str.contains("classic"));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[backend]
base_url = "https://cv.example.com"

[search]
default_location = "Santiago"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.backend.base_url, "https://cv.example.com");
        assert_eq!(config.backend.timeout_secs, 15);
        assert_eq!(config.download.default_style, "classic");
        assert_eq!(config.search.default_location, "Santiago");
    }

    #[test]
    fn gateway_config_from_app_config() {
        let app = AppConfig::default();
        let gateway = GatewayConfig::from(&app);
        assert_eq!(gateway.timeout, Duration::from_secs(15));
        assert_eq!(
            gateway.base_url().expect("valid url").as_str(),
            "http://127.0.0.1:5000/"
        );
    }

    #[test]
    fn gateway_config_rejects_bad_url() {
        let gateway = GatewayConfig::from(&AppConfig::default()).with_base_url("not a url");
        let err = gateway.base_url().unwrap_err();
        assert!(err.to_string().contains("invalid backend URL"));

        let gateway = gateway.with_base_url("mailto:someone@example.com");
        assert!(gateway.base_url().is_err());
    }

    #[test]
    fn absolute_output_dir_is_kept() {
        let download = DownloadConfig {
            output_dir: "/tmp/cvs".into(),
            default_style: default_style(),
        };
        assert_eq!(
            download.resolved_output_dir().expect("resolve"),
            PathBuf::from("/tmp/cvs")
        );
    }
}
