//! Service configuration.
//!
//! Settings are read from a TOML file and then overridden by a handful of
//! environment variables. Every field has a default, so an empty file (or no
//! file at all) parses. The server additionally needs
//! `humandesign.dignity_table`, which has no built-in fallback.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::render::RasterizerOptions;

pub const CONFIG_ENV: &str = "CARTOGRAPHER_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value for {key}: {value}")]
    InvalidEnv { key: &'static str, value: String },
    #[error("Missing required setting {key}")]
    Missing { key: &'static str },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub ephemeris: EphemerisSettings,
    #[serde(default)]
    pub render: RenderSettings,
    #[serde(default)]
    pub humandesign: HumanDesignSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// When set, every route except `/` and `/health` requires `x-api-token`.
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_token: None,
            body_limit_bytes: default_body_limit(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EphemerisSettings {
    /// Directory holding the Swiss Ephemeris `.se1` files
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    #[serde(default = "default_png_scale")]
    pub png_scale: f32,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_true")]
    pub load_system_fonts: bool,
    #[serde(default)]
    pub font_dirs: Vec<PathBuf>,
    /// JSON bodygraph layout replacing the built-in coordinates
    #[serde(default)]
    pub layout_file: Option<PathBuf>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            png_scale: default_png_scale(),
            font_family: default_font_family(),
            load_system_fonts: true,
            font_dirs: Vec::new(),
            layout_file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HumanDesignSettings {
    /// JSON line-dignity table (`gate -> line -> planets`), 384 lines when complete
    #[serde(default)]
    pub dignity_table: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_body_limit() -> usize {
    64 * 1024
}

fn default_png_scale() -> f32 {
    2.0
}

fn default_font_family() -> String {
    "DejaVu Sans".to_string()
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Locate the configuration file.
    ///
    /// `CARTOGRAPHER_CONFIG` wins when set. Otherwise `cartographer.toml` is
    /// looked up in the current directory and in `backend/`. Defaults are
    /// used when nothing is found.
    pub fn from_default_location() -> Result<Self, ConfigError> {
        if let Ok(path) = env::var(CONFIG_ENV) {
            return Self::from_file(path);
        }

        let search_paths = [
            PathBuf::from("cartographer.toml"),
            PathBuf::from("backend/cartographer.toml"),
        ];
        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        warn!("No cartographer.toml found, using defaults");
        Ok(Self::default())
    }

    /// Full start-up resolution: file (or defaults) plus environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_default_location()?;
        config.apply_env()?;
        Ok(config)
    }

    /// Apply `HOST`, `PORT`, `HD_API_TOKEN`, `SWISS_EPHEMERIS_PATH` and
    /// `HD_DIGNITY_TABLE`.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(host) = env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
                key: "PORT",
                value: port.clone(),
            })?;
        }
        if let Ok(token) = env::var("HD_API_TOKEN") {
            // An empty token disables authentication
            self.server.api_token = Some(token).filter(|t| !t.is_empty());
        }
        if let Ok(path) = env::var("SWISS_EPHEMERIS_PATH") {
            self.ephemeris.path = Some(PathBuf::from(path));
        }
        if let Ok(path) = env::var("HD_DIGNITY_TABLE") {
            self.humandesign.dignity_table = Some(path)
                .filter(|p| !p.is_empty())
                .map(PathBuf::from);
        }
        Ok(())
    }

    /// Path of the dignity table the server must load.
    pub fn dignity_table_path(&self) -> Result<&Path, ConfigError> {
        self.humandesign
            .dignity_table
            .as_deref()
            .ok_or(ConfigError::Missing {
                key: "humandesign.dignity_table",
            })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn rasterizer_options(&self) -> RasterizerOptions {
        RasterizerOptions {
            png_scale: self.render.png_scale,
            font_family: self.render.font_family.clone(),
            load_system_fonts: self.render.load_system_fonts,
            font_dirs: self.render.font_dirs.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.render.png_scale, 2.0);
        assert!(config.render.load_system_fonts);
        assert!(config.server.api_token.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9100
api_token = "secret"
body_limit_bytes = 1024

[ephemeris]
path = "/usr/share/ephe"

[render]
png_scale = 1.5
font_family = "Noto Sans"
load_system_fonts = false
font_dirs = ["fonts"]
layout_file = "layout.json"

[humandesign]
dignity_table = "dignities.json"
"#;

        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:9100");
        assert_eq!(config.server.api_token.as_deref(), Some("secret"));
        assert_eq!(config.server.body_limit_bytes, 1024);
        assert_eq!(config.ephemeris.path, Some(PathBuf::from("/usr/share/ephe")));
        assert_eq!(config.render.layout_file, Some(PathBuf::from("layout.json")));
        assert_eq!(
            config.humandesign.dignity_table,
            Some(PathBuf::from("dignities.json"))
        );

        let opts = config.rasterizer_options();
        assert_eq!(opts.png_scale, 1.5);
        assert_eq!(opts.font_family, "Noto Sans");
        assert!(!opts.load_system_fonts);
        assert_eq!(opts.font_dirs, vec![PathBuf::from("fonts")]);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: AppConfig = toml::from_str("[server]\nport = 1234\n").unwrap();
        assert_eq!(config.server.port, 1234);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.render, RenderSettings::default());
    }

    #[test]
    fn test_malformed_config_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cartographer.toml");
        fs::write(&path, "[server\nport = ").unwrap();
        assert!(matches!(
            AppConfig::from_file(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_dignity_table_is_required() {
        let config = AppConfig::default();
        assert!(matches!(
            config.dignity_table_path(),
            Err(ConfigError::Missing {
                key: "humandesign.dignity_table"
            })
        ));

        let config: AppConfig =
            toml::from_str("[humandesign]\ndignity_table = \"data/dignities.json\"\n").unwrap();
        assert_eq!(
            config.dignity_table_path().unwrap(),
            Path::new("data/dignities.json")
        );
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let err = AppConfig::from_file("/nonexistent/cartographer.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
