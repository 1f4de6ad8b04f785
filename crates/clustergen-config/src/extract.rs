//! Locating the plugin endpoint inside a proxy configuration document.
//!
//! The endpoint is encoded twice: the plugin's configuration is a JSON
//! document stored as a string inside the YAML document. Both layers are
//! walked with a [`Cursor`], which remembers the dotted path it took so a
//! failure names the exact node that was missing or had the wrong shape.

use crate::settings::GeneratorConfig;
use clustergen_error::{ClusterGenError, ExtractionError};
use clustergen_types::{ConfigTree, EndpointDescriptor};
use tracing::debug;

const PAYLOAD_ROOT: &str = "payload";

/// A tree the extractor can walk.
pub trait Node: Sized {
    fn child(&self, key: &str) -> Option<&Self>;
    fn items(&self) -> Option<&[Self]>;
    fn text(&self) -> Option<&str>;
    fn unsigned(&self) -> Option<u64>;
    fn is_nothing(&self) -> bool;
    fn kind(&self) -> &'static str;
}

impl Node for serde_yaml_ng::Value {
    fn child(&self, key: &str) -> Option<&Self> {
        self.get(key)
    }

    fn items(&self) -> Option<&[Self]> {
        self.as_sequence().map(|s| s.as_slice())
    }

    fn text(&self) -> Option<&str> {
        self.as_str()
    }

    fn unsigned(&self) -> Option<u64> {
        self.as_u64()
    }

    fn is_nothing(&self) -> bool {
        self.is_null()
    }

    fn kind(&self) -> &'static str {
        use serde_yaml_ng::Value;
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
            Value::Tagged(_) => "tagged value",
        }
    }
}

impl Node for serde_json::Value {
    fn child(&self, key: &str) -> Option<&Self> {
        self.get(key)
    }

    fn items(&self) -> Option<&[Self]> {
        self.as_array().map(|a| a.as_slice())
    }

    fn text(&self) -> Option<&str> {
        self.as_str()
    }

    fn unsigned(&self) -> Option<u64> {
        self.as_u64()
    }

    fn is_nothing(&self) -> bool {
        self.is_null()
    }

    fn kind(&self) -> &'static str {
        use serde_json::Value;
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

/// A node together with the path used to reach it.
#[derive(Debug, Clone)]
pub struct Cursor<'a, N> {
    node: &'a N,
    path: String,
}

impl<'a, N: Node> Cursor<'a, N> {
    pub fn root(node: &'a N, path: impl Into<String>) -> Self {
        Self {
            node,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn join(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    /// Step into `key`. Absent and null children are both missing.
    pub fn get(&self, key: &str) -> Result<Cursor<'a, N>, ExtractionError> {
        self.optional(key)
            .ok_or_else(|| ExtractionError::missing(self.join(key)))
    }

    pub fn optional(&self, key: &str) -> Option<Cursor<'a, N>> {
        match self.node.child(key) {
            Some(node) if !node.is_nothing() => Some(Cursor {
                node,
                path: self.join(key),
            }),
            _ => None,
        }
    }

    /// Elements of this node, which must be a sequence.
    pub fn elements(&self) -> Result<Vec<Cursor<'a, N>>, ExtractionError> {
        let items = self.node.items().ok_or_else(|| {
            ExtractionError::mismatch(&self.path, "a sequence", self.node.kind())
        })?;
        Ok(self.index(items))
    }

    /// Elements of the sequence under `key`; anything else counts as empty.
    pub fn each(&self, key: &str) -> Vec<Cursor<'a, N>> {
        match self.optional(key) {
            Some(child) => child.node.items().map(|i| child.index(i)).unwrap_or_default(),
            None => Vec::new(),
        }
    }

    fn index(&self, items: &'a [N]) -> Vec<Cursor<'a, N>> {
        items
            .iter()
            .enumerate()
            .map(|(i, node)| Cursor {
                node,
                path: format!("{}[{}]", self.path, i),
            })
            .collect()
    }

    pub fn str(&self) -> Result<&'a str, ExtractionError> {
        self.node
            .text()
            .ok_or_else(|| ExtractionError::mismatch(&self.path, "a string", self.node.kind()))
    }

    pub fn u64(&self) -> Result<u64, ExtractionError> {
        self.node.unsigned().ok_or_else(|| {
            ExtractionError::mismatch(&self.path, "an unsigned integer", self.node.kind())
        })
    }

    fn has_name(&self, name: &str) -> bool {
        self.node.child("name").and_then(N::text) == Some(name)
    }
}

/// The `configuration` node of a plugin filter, provided its `@type` is the
/// expected payload marker.
fn plugin_configuration<'a>(
    plugin: &Cursor<'a, ConfigTree>,
    config: &GeneratorConfig,
) -> Result<Cursor<'a, ConfigTree>, ExtractionError> {
    let configuration = plugin
        .get("typed_config")?
        .get("value")?
        .get("config")?
        .get("configuration")?;

    let type_url = configuration.get("@type")?;
    let found = type_url.str()?;
    if found != config.payload_type {
        return Err(ExtractionError::mismatch(
            type_url.path(),
            &config.payload_type,
            found,
        ));
    }
    Ok(configuration)
}

/// Find the first http filter named `config.plugin_name`, inside any
/// connection manager filter, whose configuration carries the payload marker.
/// Listeners, filter chains and filters are scanned in document order.
///
/// Instances with a missing configuration or a different `@type` are skipped.
/// When none qualifies, the rejection of the first instance is returned.
pub fn locate_plugin<'a>(
    tree: &'a ConfigTree,
    config: &GeneratorConfig,
) -> Result<Cursor<'a, ConfigTree>, ExtractionError> {
    let root = Cursor::root(tree, "");
    let listeners = root.get("static_resources")?.get("listeners")?;
    let mut first_rejection = None;

    for listener in listeners.elements()? {
        for chain in listener.each("filter_chains") {
            for filter in chain.each("filters") {
                if !filter.has_name(&config.http_connection_manager) {
                    continue;
                }
                let Some(typed_config) = filter.optional("typed_config") else {
                    continue;
                };
                for plugin in typed_config.each("http_filters") {
                    if !plugin.has_name(&config.plugin_name) {
                        continue;
                    }
                    match plugin_configuration(&plugin, config) {
                        Ok(configuration) => {
                            debug!("Found plugin {} at {}", config.plugin_name, plugin.path());
                            return Ok(configuration);
                        }
                        Err(e) => {
                            debug!("Skipping plugin at {}: {}", plugin.path(), e);
                            if first_rejection.is_none() {
                                first_rejection = Some(e);
                            }
                        }
                    }
                }
            }
        }
    }

    Err(first_rejection.unwrap_or_else(|| ExtractionError::PluginNotFound {
        plugin: config.plugin_name.clone(),
        manager: config.http_connection_manager.clone(),
    }))
}

/// Peel the outer layer: decode the JSON text held by the plugin's
/// `configuration.value`.
pub fn decode_payload(
    configuration: &Cursor<'_, ConfigTree>,
) -> Result<serde_json::Value, ClusterGenError> {
    let raw = configuration.get("value")?.str()?;
    serde_json::from_str(raw).map_err(|e| {
        ClusterGenError::PayloadDecodeError(format!("{}.value: {}", configuration.path(), e))
    })
}

/// Peel the inner layer: read `http_service.endpoint` from the decoded payload.
pub fn read_endpoint(
    payload: &serde_json::Value,
    config: &GeneratorConfig,
) -> Result<EndpointDescriptor, ExtractionError> {
    let endpoint = Cursor::root(payload, PAYLOAD_ROOT)
        .get("http_service")?
        .get("endpoint")?;

    let name = endpoint.get("service_name")?;
    let service_name = name.str()?;
    if service_name.is_empty() {
        return Err(ExtractionError::mismatch(
            name.path(),
            "a non-empty string",
            "an empty string",
        ));
    }

    let service_port = match endpoint.optional("service_port") {
        Some(port) => {
            let value = port.u64()?;
            match u16::try_from(value) {
                Ok(p) if p > 0 => p,
                _ => {
                    return Err(ExtractionError::mismatch(
                        port.path(),
                        "a port between 1 and 65535",
                        value.to_string(),
                    ));
                }
            }
        }
        None => config.default_service_port,
    };

    let service_host = endpoint
        .optional("service_host")
        .map(|h| h.str().map(str::to_string))
        .transpose()?;

    Ok(EndpointDescriptor::new(
        service_name.to_string(),
        service_port,
        service_host,
    ))
}

/// Find the plugin and return the endpoint it is configured to call.
pub fn extract(
    tree: &ConfigTree,
    config: &GeneratorConfig,
) -> Result<EndpointDescriptor, ClusterGenError> {
    let configuration = locate_plugin(tree, config)?;
    let payload = decode_payload(&configuration)?;
    Ok(read_endpoint(&payload, config)?)
}
