use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::identity::DEFAULT_IDENTITY_HEADER;
use crate::preview::{RelayConfig, DEFAULT_MAX_LOG_ENTRIES};
use crate::util::paths::config_path;

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server: ServerSettings,
    pub preview: PreviewSettings,
    pub identity: IdentitySettings,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Enable CORS for any origin
    pub cors_permissive: bool,
}

/// Live preview settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewSettings {
    /// Console entries kept per sandbox
    pub max_log_entries: usize,
    /// Show the console panel on the first entry after a reload
    pub auto_reveal_console: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentitySettings {
    /// Request header carrying the signed-in user id
    pub header: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 3000,
                cors_permissive: true,
            },
            preview: PreviewSettings {
                max_log_entries: DEFAULT_MAX_LOG_ENTRIES,
                auto_reveal_console: true,
            },
            identity: IdentitySettings {
                header: DEFAULT_IDENTITY_HEADER.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub cors_permissive: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlPreviewConfig {
    pub max_log_entries: Option<usize>,
    pub auto_reveal_console: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlIdentityConfig {
    pub header: Option<String>,
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub server: Option<TomlServerConfig>,
    pub preview: Option<TomlPreviewConfig>,
    pub identity: Option<TomlIdentityConfig>,
}

impl Config {
    /// Load configuration from file, merging with defaults
    pub fn load() -> Self {
        let config_file = config_path();

        // Create example config on first run
        if !config_file.exists() {
            Self::create_default_config(&config_file);
        }

        match fs::read_to_string(&config_file) {
            Ok(contents) => Self::from_toml_str(&contents).unwrap_or_else(|e| {
                tracing::warn!(
                    path = %config_file.display(),
                    error = %e,
                    "Invalid config file, using defaults"
                );
                Config::default()
            }),
            Err(_) => Config::default(),
        }
    }

    /// Parse a config file body and merge it over the defaults
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        let toml_config = toml::from_str::<TomlConfig>(contents)?;
        let mut config = Config::default();
        config.merge(toml_config);
        Ok(config)
    }

    fn merge(&mut self, toml_config: TomlConfig) {
        if let Some(server) = toml_config.server {
            if let Some(host) = server.host {
                self.server.host = host;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(cors) = server.cors_permissive {
                self.server.cors_permissive = cors;
            }
        }

        if let Some(preview) = toml_config.preview {
            if let Some(max) = preview.max_log_entries {
                self.preview.max_log_entries = max.max(1);
            }
            if let Some(auto_reveal) = preview.auto_reveal_console {
                self.preview.auto_reveal_console = auto_reveal;
            }
        }

        if let Some(identity) = toml_config.identity {
            if let Some(header) = identity.header.filter(|h| !h.trim().is_empty()) {
                self.identity.header = header;
            }
        }
    }

    /// Create the default config file from the bundled example
    fn create_default_config(path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                tracing::warn!(error = %e, "Failed to create config directory");
                return;
            }
        }

        if let Err(e) = fs::write(path, EXAMPLE_CONFIG) {
            tracing::warn!(error = %e, "Failed to write default config");
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.server.port = port;
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.server.host = host.into();
        self
    }

    /// Relay settings derived from `[preview]`
    pub fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            max_entries: self.preview.max_log_entries,
            auto_reveal: self.preview.auto_reveal_console,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_config_parses_to_defaults() {
        let config = Config::from_toml_str(EXAMPLE_CONFIG).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_override() {
        let config = Config::from_toml_str(
            r#"
            [server]
            port = 8080

            [preview]
            max_log_entries = 50
            auto_reveal_console = false

            [identity]
            header = "x-forwarded-user"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(
            config.relay_config(),
            RelayConfig {
                max_entries: 50,
                auto_reveal: false
            }
        );
        assert_eq!(config.identity.header, "x-forwarded-user");
    }

    #[test]
    fn test_invalid_values_are_rejected_or_clamped() {
        assert!(Config::from_toml_str("[server]\nport = \"eighty\"").is_err());

        let config = Config::from_toml_str("[preview]\nmax_log_entries = 0\n[identity]\nheader = \" \"").unwrap();
        assert_eq!(config.preview.max_log_entries, 1);
        assert_eq!(config.identity.header, DEFAULT_IDENTITY_HEADER);
    }

    #[test]
    fn test_builders() {
        let config = Config::default().with_host("0.0.0.0").with_port(9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
    }
}
