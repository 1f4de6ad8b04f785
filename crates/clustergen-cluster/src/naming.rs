use clustergen_types::AddressKind;

const STATIC_SUFFIX: &str = ".static";

/// Cluster name the plugin SDK looks up for an outbound call:
/// `outbound|{port}||{name}`, with `.static` appended for IP literals.
pub fn build_name(service_name: &str, port: u16, kind: AddressKind) -> String {
    match kind {
        AddressKind::Hostname => format!("outbound|{port}||{service_name}"),
        AddressKind::LiteralIPv4 => format!("outbound|{port}||{service_name}{STATIC_SUFFIX}"),
    }
}
