//! Configuration parsing.
//!
//! Reads `~/.movekit/config.toml`. Every field has a default, so a missing
//! file yields a fully working configuration; an explicitly passed path
//! that does not exist is an error.

use movekit_protocol::FormSource;
use movekit_selection::{CatalogItem, ItemCatalog};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Error type for config operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Config not found at: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MoveKitConfig {
    #[serde(default)]
    pub endpoints: EndpointConfig,

    #[serde(default)]
    pub business: BusinessConfig,

    /// Item catalog override; empty means the built-in removals list.
    #[serde(default)]
    pub catalog: Vec<CatalogItem>,

    /// Delay between showing the confirmation and opening WhatsApp.
    #[serde(default = "default_handoff_delay_ms")]
    pub handoff_delay_ms: u64,
}

impl Default for MoveKitConfig {
    fn default() -> Self {
        Self {
            endpoints: EndpointConfig::default(),
            business: BusinessConfig::default(),
            catalog: Vec::new(),
            handoff_delay_ms: default_handoff_delay_ms(),
        }
    }
}

impl MoveKitConfig {
    /// Load from `path` if given (must exist), else from the default
    /// location (missing file falls back to defaults).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(explicit) => {
                if !explicit.exists() {
                    return Err(ConfigError::NotFound(explicit.display().to_string()));
                }
                Self::from_file(explicit)
            }
            None => {
                let default_path = default_config_path();
                if default_path.exists() {
                    Self::from_file(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// The session's item catalog.
    pub fn catalog(&self) -> ItemCatalog {
        if self.catalog.is_empty() {
            ItemCatalog::default()
        } else {
            ItemCatalog::new(self.catalog.clone())
        }
    }
}

/// Where the default config file lives: `~/.movekit/config.toml`.
pub fn default_config_path() -> PathBuf {
    movekit_logging::movekit_home().join("config.toml")
}

/// Webhook endpoint URLs, one per form kind.
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_lead_url")]
    pub lead_url: String,

    #[serde(default = "default_contact_url")]
    pub contact_url: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            lead_url: default_lead_url(),
            contact_url: default_contact_url(),
        }
    }
}

impl EndpointConfig {
    /// Endpoint routing: contact forms go to the contact URL, everything
    /// else to the lead URL.
    pub fn url_for(&self, source: FormSource) -> &str {
        match source {
            FormSource::Contact => &self.contact_url,
            FormSource::Lead => &self.lead_url,
        }
    }
}

/// Business identity used in the handoff message and confirmation screen.
#[derive(Debug, Clone, Deserialize)]
pub struct BusinessConfig {
    #[serde(default = "default_business_name")]
    pub name: String,

    /// Business WhatsApp number; non-digits are stripped at link time.
    #[serde(default = "default_whatsapp_phone")]
    pub whatsapp_phone: String,
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            name: default_business_name(),
            whatsapp_phone: default_whatsapp_phone(),
        }
    }
}

fn default_handoff_delay_ms() -> u64 {
    2000
}

fn default_lead_url() -> String {
    "https://script.google.com/macros/s/AKfycbzK-o07KdWFkpC-2qvOnObRcgjsLx1pAFdgrR9DOZ7VCFelZSnThzgy8XnuqgZ6F7Vvfw/exec".to_string()
}

fn default_contact_url() -> String {
    default_lead_url()
}

fn default_business_name() -> String {
    "Boxit Logistics and Storage".to_string()
}

fn default_whatsapp_phone() -> String {
    "447497460219".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_complete() {
        let config = MoveKitConfig::default();
        assert_eq!(config.handoff_delay_ms, 2000);
        assert!(!config.endpoints.lead_url.is_empty());
        assert!(!config.business.whatsapp_phone.is_empty());
        assert!(!config.catalog().is_empty());
    }

    #[test]
    fn test_partial_toml_fills_in_defaults() {
        let config: MoveKitConfig = toml::from_str(
            r#"
            handoff_delay_ms = 500

            [endpoints]
            lead_url = "http://localhost:9999/lead"
            "#,
        )
        .unwrap();
        assert_eq!(config.handoff_delay_ms, 500);
        assert_eq!(config.endpoints.lead_url, "http://localhost:9999/lead");
        assert_eq!(config.endpoints.contact_url, default_contact_url());
        assert_eq!(config.business.name, "Boxit Logistics and Storage");
    }

    #[test]
    fn test_catalog_override_replaces_builtin_list() {
        let config: MoveKitConfig = toml::from_str(
            r#"
            [[catalog]]
            name = "Piano"
            icon = "music"

            [[catalog]]
            name = "Safe"
            "#,
        )
        .unwrap();
        let catalog = config.catalog();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.items()[0].name, "Piano");
        assert_eq!(catalog.items()[1].icon, "");
    }

    #[test]
    fn test_endpoint_routing_by_source() {
        let endpoints = EndpointConfig {
            lead_url: "http://a".to_string(),
            contact_url: "http://b".to_string(),
        };
        assert_eq!(endpoints.url_for(FormSource::Lead), "http://a");
        assert_eq!(endpoints.url_for(FormSource::Contact), "http://b");
    }

    #[test]
    fn test_explicit_missing_path_is_an_error() {
        let missing = Path::new("/definitely/not/here/config.toml");
        let err = MoveKitConfig::load(Some(missing)).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[business]\nname = \"Acme Removals\"\n").unwrap();
        let config = MoveKitConfig::load(Some(&path)).unwrap();
        assert_eq!(config.business.name, "Acme Removals");
    }
}
