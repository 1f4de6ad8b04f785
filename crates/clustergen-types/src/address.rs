use std::fmt;

/// How an upstream address has to be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressKind {
    /// Dotted-decimal IPv4 literal, used as-is.
    LiteralIPv4,
    /// Anything else; resolved by name when the proxy connects.
    Hostname,
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressKind::LiteralIPv4 => write!(f, "literal-ipv4"),
            AddressKind::Hostname => write!(f, "hostname"),
        }
    }
}
