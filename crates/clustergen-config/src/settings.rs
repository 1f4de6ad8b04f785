use clustergen_cluster::SynthesisOptions;
use clustergen_error::ClusterGenError;
use clustergen_types::cluster::ConnectTimeout;
use serde::{Deserialize, Serialize};
use std::{path::Path, str::FromStr, time::Duration};

pub const HTTP_CONNECTION_MANAGER: &str = "envoy.filters.network.http_connection_manager";
pub const STRING_VALUE_TYPE: &str = "type.googleapis.com/google.protobuf.StringValue";

fn default_plugin_name() -> String {
    "wasmdemo".to_string()
}

fn default_http_connection_manager() -> String {
    HTTP_CONNECTION_MANAGER.to_string()
}

fn default_payload_type() -> String {
    STRING_VALUE_TYPE.to_string()
}

fn default_service_port() -> u16 {
    80
}

fn default_connect_timeout() -> ConnectTimeout {
    ConnectTimeout(Duration::from_secs(30))
}

/// Every default the generator relies on, resolved once per run.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Name of the http filter that carries the endpoint
    #[serde(default = "default_plugin_name")]
    pub plugin_name: String,

    /// Network filter whose `http_filters` are searched
    #[serde(default = "default_http_connection_manager")]
    pub http_connection_manager: String,

    /// Required `@type` of the embedded plugin configuration
    #[serde(default = "default_payload_type")]
    pub payload_type: String,

    /// Used when the endpoint omits `service_port`
    #[serde(default = "default_service_port")]
    pub default_service_port: u16,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: ConnectTimeout,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            plugin_name: default_plugin_name(),
            http_connection_manager: default_http_connection_manager(),
            payload_type: default_payload_type(),
            default_service_port: default_service_port(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

impl FromStr for GeneratorConfig {
    type Err = ClusterGenError;

    /// Parse generator settings from YAML. Missing keys take their defaults.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(s).map_err(|e| ClusterGenError::ConfigError(e.to_string()))
    }
}

impl GeneratorConfig {
    /// Load settings from a YAML file
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the settings file
    ///
    /// # Returns
    ///
    /// * `Result<Self, ClusterGenError>` - The result of the operation
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ClusterGenError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClusterGenError::ConfigError(format!("{}: {}", path.display(), e))
        })?;
        Self::from_str(&content)
    }

    pub fn with_plugin_name(mut self, plugin_name: impl Into<String>) -> Self {
        self.plugin_name = plugin_name.into();
        self
    }

    pub fn synthesis_options(&self) -> SynthesisOptions {
        SynthesisOptions {
            connect_timeout: self.connect_timeout.0,
        }
    }
}
