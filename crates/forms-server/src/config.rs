//! Configuration for the form service

use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

// =============================================================================
// File-based Configuration (config.toml)
// =============================================================================

/// Configuration loaded from config.toml
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub templates: TemplateSection,
    #[serde(default)]
    pub email: Option<EmailSection>,
}

/// HTTP listener settings
#[derive(Debug, Deserialize)]
pub struct ServerSection {
    /// Bind address, host:port
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self { listen: default_listen() }
    }
}

fn default_listen() -> String {
    "127.0.0.1:8080".to_string()
}

/// Template and fill-tool settings
#[derive(Debug, Deserialize)]
pub struct TemplateSection {
    /// Directory holding the blank PDF templates
    #[serde(default = "default_template_dir")]
    pub dir: PathBuf,
    /// pdftk binary, resolved via PATH when bare
    #[serde(default = "default_pdftk")]
    pub pdftk: PathBuf,
}

impl Default for TemplateSection {
    fn default() -> Self {
        Self {
            dir: default_template_dir(),
            pdftk: default_pdftk(),
        }
    }
}

fn default_template_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_pdftk() -> PathBuf {
    PathBuf::from("pdftk")
}

/// Outbound email provider. Absent means simulated delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailSection {
    /// Provider endpoint that accepts the send request as JSON
    pub provider_url: String,
    /// Bearer token for the provider
    pub api_key: String,
    /// Sender address
    pub from: String,
}

impl FileConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content).with_context(|| {
            "Failed to parse config.toml. Check for:\n\
             - Invalid TOML syntax (missing quotes, brackets, etc.)\n\
             - Incorrect data types (strings vs numbers)\n\n\
             See config.toml.example for the expected format."
        })
    }
}

// =============================================================================
// Runtime Configuration
// =============================================================================

/// Main configuration struct with parsed values
pub struct Config {
    /// Socket the HTTP server binds
    pub listen_addr: SocketAddr,
    /// Directory holding the blank PDF templates
    pub template_dir: PathBuf,
    /// pdftk binary
    pub pdftk_bin: PathBuf,
    /// Email provider, None for simulated delivery
    pub email: Option<EmailSection>,
}

impl Config {
    /// Create config from file config, with CLI overrides applied first
    pub fn from_file(file_config: &FileConfig, listen_override: Option<String>) -> Result<Self> {
        let listen = listen_override.unwrap_or_else(|| file_config.server.listen.clone());
        let listen_addr = listen
            .parse()
            .with_context(|| format!("Invalid listen address: {listen}"))?;

        Ok(Self {
            listen_addr,
            template_dir: file_config.templates.dir.clone(),
            pdftk_bin: file_config.templates.pdftk.clone(),
            email: file_config.email.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_sections_are_missing() {
        let file: FileConfig = toml::from_str("").unwrap();
        let config = Config::from_file(&file, None).unwrap();
        assert_eq!(config.listen_addr.port(), 8080);
        assert_eq!(config.template_dir, PathBuf::from("templates"));
        assert!(config.email.is_none());
    }

    #[test]
    fn listen_override_wins_over_file_value() {
        let file: FileConfig = toml::from_str("[server]\nlisten = \"0.0.0.0:9000\"").unwrap();
        let config = Config::from_file(&file, Some("127.0.0.1:7000".to_string())).unwrap();
        assert_eq!(config.listen_addr.port(), 7000);
    }

    #[test]
    fn email_section_parses() {
        let file: FileConfig = toml::from_str(
            "[email]\nprovider_url = \"https://mail.example/send\"\napi_key = \"k\"\nfrom = \"noreply@example.org\"",
        )
        .unwrap();
        let email = file.email.unwrap();
        assert_eq!(email.from, "noreply@example.org");
    }

    #[test]
    fn bad_listen_address_is_rejected() {
        let file: FileConfig = toml::from_str("[server]\nlisten = \"not-an-addr\"").unwrap();
        assert!(Config::from_file(&file, None).is_err());
    }
}
