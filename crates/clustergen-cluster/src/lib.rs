//! Turning an upstream endpoint into a proxy cluster and merging it into an
//! existing cluster list.

pub mod classify;
pub mod merge;
pub mod naming;
pub mod synthesize;

pub use classify::classify;
pub use merge::{find_cluster, merge};
pub use naming::build_name;
pub use synthesize::{SynthesisOptions, TLS_PORT, synthesize};
