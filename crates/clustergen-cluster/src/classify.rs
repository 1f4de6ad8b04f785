use clustergen_types::AddressKind;
use once_cell::sync::Lazy;
use regex::Regex;

// Octets are not range checked, so `999.1.1.1` still counts as a literal.
static IPV4_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[0-9]{1,3}\.){3}[0-9]{1,3}$").unwrap());

/// Decide whether `address` is a dotted-decimal IPv4 literal or a name.
pub fn classify(address: &str) -> AddressKind {
    if IPV4_LITERAL.is_match(address) {
        AddressKind::LiteralIPv4
    } else {
        AddressKind::Hostname
    }
}
