use clustergen_error::ClusterGenError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, time::Duration};

pub const TLS_TRANSPORT_SOCKET: &str = "envoy.transport_sockets.tls";
pub const UPSTREAM_TLS_CONTEXT_TYPE: &str =
    "type.googleapis.com/envoy.extensions.transport_sockets.tls.v3.UpstreamTlsContext";

/// A static cluster entry as it appears under `static_resources.clusters`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ClusterDefinition {
    pub name: String,
    pub connect_timeout: ConnectTimeout,
    #[serde(rename = "type")]
    pub discovery_type: DiscoveryType,
    pub dns_lookup_family: DnsLookupFamily,
    pub lb_policy: LbPolicy,
    pub load_assignment: LoadAssignment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport_socket: Option<TransportSocket>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscoveryType {
    Static,
    LogicalDns,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DnsLookupFamily {
    V4Only,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LbPolicy {
    RoundRobin,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LoadAssignment {
    pub cluster_name: String,
    pub endpoints: Vec<LocalityLbEndpoints>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LocalityLbEndpoints {
    pub lb_endpoints: Vec<LbEndpoint>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LbEndpoint {
    pub endpoint: Endpoint,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub address: Address,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Address {
    pub socket_address: SocketAddress,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SocketAddress {
    pub address: String,
    pub port_value: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TransportSocket {
    pub name: String,
    pub typed_config: UpstreamTlsContext,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UpstreamTlsContext {
    #[serde(rename = "@type")]
    pub type_url: String,
    pub sni: String,
}

impl LoadAssignment {
    /// Assignment holding one locality with one endpoint.
    pub fn single(cluster_name: &str, address: &str, port: u16) -> Self {
        Self {
            cluster_name: cluster_name.to_string(),
            endpoints: vec![LocalityLbEndpoints {
                lb_endpoints: vec![LbEndpoint {
                    endpoint: Endpoint {
                        address: Address {
                            socket_address: SocketAddress {
                                address: address.to_string(),
                                port_value: port,
                            },
                        },
                    },
                }],
            }],
        }
    }
}

impl TransportSocket {
    pub fn upstream_tls(sni: &str) -> Self {
        Self {
            name: TLS_TRANSPORT_SOCKET.to_string(),
            typed_config: UpstreamTlsContext {
                type_url: UPSTREAM_TLS_CONTEXT_TYPE.to_string(),
                sni: sni.to_string(),
            },
        }
    }
}

impl ClusterDefinition {
    /// Every socket address across all localities.
    pub fn socket_addresses(&self) -> impl Iterator<Item = &SocketAddress> {
        self.load_assignment
            .endpoints
            .iter()
            .flat_map(|l| l.lb_endpoints.iter())
            .map(|e| &e.endpoint.address.socket_address)
    }

    pub fn sni(&self) -> Option<&str> {
        self.transport_socket
            .as_ref()
            .map(|t| t.typed_config.sni.as_str())
    }

    /// Convert into a generic document node so it can sit next to
    /// hand-written clusters.
    pub fn to_value(&self) -> Result<serde_yaml_ng::Value, ClusterGenError> {
        serde_yaml_ng::to_value(self).map_err(|e| {
            ClusterGenError::SerializeError(format!("cluster {}: {}", self.name, e))
        })
    }
}

/// Connection timeout rendered as a protobuf duration literal, e.g. `30s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConnectTimeout(pub Duration);

impl fmt::Display for ConnectTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.subsec_nanos() == 0 {
            write!(f, "{}s", self.0.as_secs())
        } else {
            write!(f, "{}s", self.0.as_secs_f64())
        }
    }
}

impl FromStr for ConnectTimeout {
    type Err = ClusterGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_suffix('s')
            .and_then(|v| v.parse::<f64>().ok())
            .and_then(|v| Duration::try_from_secs_f64(v).ok())
            .map(Self)
            .ok_or_else(|| ClusterGenError::ConfigError(format!("invalid duration: {s:?}")))
    }
}

impl TryFrom<String> for ConnectTimeout {
    type Error = ClusterGenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ConnectTimeout> for String {
    fn from(value: ConnectTimeout) -> Self {
        value.to_string()
    }
}

/// Result of merging a synthesized cluster into the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Inserted,
    AlreadyPresent,
}

impl fmt::Display for MergeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeOutcome::Inserted => write!(f, "inserted"),
            MergeOutcome::AlreadyPresent => write!(f, "already present"),
        }
    }
}
