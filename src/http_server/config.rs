//! HTTP Server Configuration
//!
//! Loaded from a JSON file. Only `schema_path` is required:
//!
//! ```json
//! { "schema_path": "./schema.json", "port": 8080, "udp_port": 5000 }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::form::FieldGroup;

use super::errors::{ServerError, ServerResult};

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Schema document; relative paths resolve against the config file
    pub schema_path: PathBuf,

    /// Schema section served (default: "config")
    #[serde(default = "default_section")]
    pub section: String,

    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Default UDP target host (default: "localhost")
    #[serde(default = "default_udp_host")]
    pub udp_host: String,

    /// Default UDP target port (default: 5000)
    #[serde(default = "default_udp_port")]
    pub udp_port: u16,

    /// CORS allowed origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Display groups, matched by field name prefix
    #[serde(default = "FieldGroup::defaults")]
    pub field_groups: Vec<FieldGroup>,
}

fn default_section() -> String {
    "config".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_udp_host() -> String {
    "localhost".to_string()
}

fn default_udp_port() -> u16 {
    5000
}

impl ServerConfig {
    /// Config with defaults for everything but the schema path
    pub fn with_schema(schema_path: impl Into<PathBuf>) -> Self {
        Self {
            schema_path: schema_path.into(),
            section: default_section(),
            host: default_host(),
            port: default_port(),
            udp_host: default_udp_host(),
            udp_port: default_udp_port(),
            cors_origins: Vec::new(),
            field_groups: FieldGroup::defaults(),
        }
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> ServerResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("Failed to read config {}: {}", path.display(), e)))?;

        let mut config: ServerConfig = serde_json::from_str(&content)
            .map_err(|e| ServerError::Config(format!("Invalid config JSON: {}", e)))?;

        if config.schema_path.is_relative() {
            if let Some(dir) = path.parent() {
                config.schema_path = dir.join(&config.schema_path);
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ServerResult<()> {
        if self.port == 0 {
            return Err(ServerError::Config("port must be > 0".into()));
        }
        if self.udp_port == 0 {
            return Err(ServerError::Config("udp_port must be > 0".into()));
        }
        if self.section.trim().is_empty() {
            return Err(ServerError::Config("section must not be empty".into()));
        }
        Ok(())
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
