use crate::{classify, naming::build_name};
use clustergen_types::{
    AddressKind, ClusterDefinition,
    cluster::{
        ConnectTimeout, DiscoveryType, DnsLookupFamily, LbPolicy, LoadAssignment, TransportSocket,
    },
};
use std::time::Duration;
use tracing::debug;

/// Hostname endpoints on exactly this port get an upstream TLS socket.
pub const TLS_PORT: u16 = 443;

/// Knobs that shape every synthesized cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthesisOptions {
    pub connect_timeout: Duration,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
        }
    }
}

/// Build the cluster that lets the plugin reach `service_name:port`.
///
/// Literal IPv4 addresses become `STATIC` clusters and never carry TLS, since
/// SNI needs a name. Hostnames become `LOGICAL_DNS` clusters and get an
/// upstream TLS socket with `sni = service_name` when `port` is 443. No other
/// port gets TLS.
///
/// `_host` is accepted so callers can pass the endpoint's `service_host`; it is
/// not used when building the address.
pub fn synthesize(
    service_name: &str,
    port: u16,
    _host: &str,
    options: &SynthesisOptions,
) -> ClusterDefinition {
    let kind = classify(service_name);
    let name = build_name(service_name, port, kind);

    let (discovery_type, transport_socket) = match kind {
        AddressKind::LiteralIPv4 => (DiscoveryType::Static, None),
        AddressKind::Hostname => {
            let tls = (port == TLS_PORT).then(|| TransportSocket::upstream_tls(service_name));
            (DiscoveryType::LogicalDns, tls)
        }
    };

    let cluster = ClusterDefinition {
        load_assignment: LoadAssignment::single(&name, service_name, port),
        name,
        connect_timeout: ConnectTimeout(options.connect_timeout),
        discovery_type,
        dns_lookup_family: DnsLookupFamily::V4Only,
        lb_policy: LbPolicy::RoundRobin,
        transport_socket,
    };
    for addr in cluster.socket_addresses() {
        debug!(
            "Synthesized cluster {} ({}) -> {}:{}",
            cluster.name, kind, addr.address, addr.port_value
        );
    }
    cluster
}
