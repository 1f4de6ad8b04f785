use clustergen_error::ClusterGenError;
use clustergen_types::{ClusterCollection, ClusterDefinition, MergeOutcome};
use tracing::info;

/// Index of the first entry whose `name` equals `name`.
pub fn find_cluster(clusters: &ClusterCollection, name: &str) -> Option<usize> {
    clusters
        .iter()
        .position(|c| c.get("name").and_then(|n| n.as_str()) == Some(name))
}

/// Append `candidate` unless a cluster with the same name is already listed.
///
/// An existing entry is left exactly as it is, even if its content differs
/// from `candidate`.
pub fn merge(
    clusters: &mut ClusterCollection,
    candidate: &ClusterDefinition,
) -> Result<MergeOutcome, ClusterGenError> {
    if let Some(index) = find_cluster(clusters, &candidate.name) {
        info!(
            "Cluster '{}' already exists at index {}, skipping",
            candidate.name, index
        );
        return Ok(MergeOutcome::AlreadyPresent);
    }

    clusters.push(candidate.to_value()?);
    info!("Added new cluster: {}", candidate.name);
    Ok(MergeOutcome::Inserted)
}
