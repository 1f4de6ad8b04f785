pub mod address;
pub mod cluster;
pub mod endpoint;
pub mod tree;

pub use address::AddressKind;
pub use cluster::{ClusterDefinition, MergeOutcome};
pub use endpoint::EndpointDescriptor;
pub use tree::{ClusterCollection, ConfigTree};
