/// Whole proxy configuration document. Mapping keys keep their insertion order.
pub type ConfigTree = serde_yaml_ng::Value;

/// Contents of `static_resources.clusters`.
pub type ClusterCollection = serde_yaml_ng::Sequence;
