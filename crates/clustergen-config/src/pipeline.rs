use crate::{extract::extract, settings::GeneratorConfig};
use clustergen_cluster::{merge, synthesize};
use clustergen_error::ClusterGenError;
use clustergen_types::{
    ClusterCollection, ClusterDefinition, ConfigTree, EndpointDescriptor, MergeOutcome,
};
use serde_yaml_ng::Value;
use tracing::info;

/// What a single run did to the document.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    pub endpoint: EndpointDescriptor,
    pub cluster: ClusterDefinition,
    pub outcome: MergeOutcome,
}

/// Derive the plugin's outbound cluster and merge it into
/// `static_resources.clusters`, creating the list when it is absent.
///
/// Nothing in `tree` changes unless extraction succeeds.
pub fn apply(
    tree: &mut ConfigTree,
    config: &GeneratorConfig,
) -> Result<PipelineReport, ClusterGenError> {
    let endpoint = extract(tree, config)?;
    info!(
        "Plugin {} calls {}:{}",
        config.plugin_name, endpoint.service_name, endpoint.service_port
    );

    let cluster = synthesize(
        &endpoint.service_name,
        endpoint.service_port,
        &endpoint.service_host,
        &config.synthesis_options(),
    );

    let static_resources = tree
        .get_mut("static_resources")
        .and_then(Value::as_mapping_mut)
        .ok_or_else(|| {
            ClusterGenError::MalformedDocument("static_resources must be a mapping".to_string())
        })?;

    let outcome = match static_resources.get_mut("clusters") {
        Some(Value::Sequence(clusters)) => merge(clusters, &cluster)?,
        Some(Value::Null) | None => {
            let mut clusters = ClusterCollection::new();
            let outcome = merge(&mut clusters, &cluster)?;
            static_resources.insert(
                Value::String("clusters".to_string()),
                Value::Sequence(clusters),
            );
            outcome
        }
        Some(_) => {
            return Err(ClusterGenError::MalformedDocument(
                "static_resources.clusters must be a sequence".to_string(),
            ));
        }
    };

    Ok(PipelineReport {
        endpoint,
        cluster,
        outcome,
    })
}

/// Owned variant of [`apply`]: hands the tree back with the merge outcome.
pub fn run(
    mut tree: ConfigTree,
    config: &GeneratorConfig,
) -> Result<(ConfigTree, MergeOutcome), ClusterGenError> {
    let report = apply(&mut tree, config)?;
    Ok((tree, report.outcome))
}
