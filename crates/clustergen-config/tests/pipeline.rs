use clustergen_config::{GeneratorConfig, apply, document, run};
use clustergen_error::{ClusterGenError, ExtractionError};
use clustergen_types::{ClusterDefinition, ConfigTree, MergeOutcome, cluster::DiscoveryType};

fn envoy_yaml(endpoint: &str, clusters: &str) -> String {
    format!(
        r#"static_resources:
  listeners:
  - name: listener_0
    address:
      socket_address:
        address: 0.0.0.0
        port_value: 10000
    filter_chains:
    - filters:
      - name: envoy.filters.network.tcp_proxy
      - name: envoy.filters.network.http_connection_manager
        typed_config:
          '@type': type.googleapis.com/envoy.extensions.filters.network.http_connection_manager.v3.HttpConnectionManager
          stat_prefix: ingress_http
          http_filters:
          - name: wasmdemo
            typed_config:
              '@type': type.googleapis.com/udpa.type.v1.TypedStruct
              type_url: type.googleapis.com/envoy.extensions.filters.http.wasm.v3.Wasm
              value:
                config:
                  configuration:
                    '@type': type.googleapis.com/google.protobuf.StringValue
                    value: '{{"http_service": {{"endpoint": {endpoint}}}}}'
          - name: envoy.filters.http.router
{clusters}"#
    )
}

fn load(endpoint: &str, clusters: &str) -> ConfigTree {
    document::parse(&envoy_yaml(endpoint, clusters)).unwrap()
}

fn clusters(tree: &ConfigTree) -> Vec<ClusterDefinition> {
    tree["static_resources"]["clusters"]
        .as_sequence()
        .unwrap()
        .iter()
        .filter(|c| c.get("load_assignment").is_some())
        .map(|c| serde_yaml_ng::from_value(c.clone()).unwrap())
        .collect()
}

const LOCAL_CLUSTER: &str = r#"  clusters:
  - name: local_service
    connect_timeout: 0.25s
    type: STATIC
    lb_policy: ROUND_ROBIN
    custom: untouched
"#;

#[test]
fn test_hostname_endpoint_without_clusters() {
    let tree = load(r#"{"service_name": "backend.svc", "service_port": 9000}"#, "");
    let (tree, outcome) = run(tree, &GeneratorConfig::default()).unwrap();
    assert_eq!(outcome, MergeOutcome::Inserted);

    let list = clusters(&tree);
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].name, "outbound|9000||backend.svc");
    assert_eq!(list[0].discovery_type, DiscoveryType::LogicalDns);
    assert!(list[0].transport_socket.is_none());
}

#[test]
fn test_literal_endpoint_is_static() {
    let tree = load(r#"{"service_name": "203.0.113.5", "service_port": 80}"#, "");
    let (tree, _) = run(tree, &GeneratorConfig::default()).unwrap();

    let list = clusters(&tree);
    assert_eq!(list[0].name, "outbound|80||203.0.113.5.static");
    assert_eq!(list[0].discovery_type, DiscoveryType::Static);
}

#[test]
fn test_tls_endpoint() {
    let tree = load(r#"{"service_name": "api.example.com", "service_port": 443}"#, "");
    let (tree, _) = run(tree, &GeneratorConfig::default()).unwrap();
    assert_eq!(clusters(&tree)[0].sni(), Some("api.example.com"));
}

#[test]
fn test_default_port() {
    let mut tree = load(r#"{"service_name": "backend.svc"}"#, "");
    let report = apply(&mut tree, &GeneratorConfig::default()).unwrap();
    assert_eq!(report.endpoint.service_port, 80);
    assert_eq!(report.cluster.name, "outbound|80||backend.svc");
}

#[test]
fn test_appends_after_existing_clusters() {
    let tree = load(
        r#"{"service_name": "backend.svc", "service_port": 9000}"#,
        LOCAL_CLUSTER,
    );
    let (tree, outcome) = run(tree, &GeneratorConfig::default()).unwrap();
    assert_eq!(outcome, MergeOutcome::Inserted);

    let raw = tree["static_resources"]["clusters"].as_sequence().unwrap();
    assert_eq!(raw.len(), 2);
    assert_eq!(raw[0]["name"].as_str(), Some("local_service"));
    assert_eq!(raw[0]["custom"].as_str(), Some("untouched"));
    assert_eq!(raw[1]["name"].as_str(), Some("outbound|9000||backend.svc"));
}

#[test]
fn test_second_run_is_a_no_op() {
    let config = GeneratorConfig::default();
    let tree = load(
        r#"{"service_name": "api.example.com", "service_port": 443}"#,
        LOCAL_CLUSTER,
    );
    let (first, outcome) = run(tree, &config).unwrap();
    assert_eq!(outcome, MergeOutcome::Inserted);
    let first_yaml = document::to_string(&first).unwrap();

    let reparsed = document::parse(&first_yaml).unwrap();
    let (second, outcome) = run(reparsed, &config).unwrap();
    assert_eq!(outcome, MergeOutcome::AlreadyPresent);
    assert_eq!(document::to_string(&second).unwrap(), first_yaml);
}

#[test]
fn test_existing_cluster_is_not_overwritten() {
    let existing = r#"  clusters:
  - name: outbound|80||svc.example.com
    connect_timeout: 1s
    type: STRICT_DNS
    extra: manual-edit
"#;
    let tree = load(r#"{"service_name": "svc.example.com"}"#, existing);
    let before = tree["static_resources"]["clusters"].clone();

    let (tree, outcome) = run(tree, &GeneratorConfig::default()).unwrap();
    assert_eq!(outcome, MergeOutcome::AlreadyPresent);
    assert_eq!(tree["static_resources"]["clusters"], before);
}

#[test]
fn test_missing_service_name_leaves_tree_unchanged() {
    let mut tree = load(r#"{"service_port": 8080}"#, LOCAL_CLUSTER);
    let before = tree.clone();

    let err = apply(&mut tree, &GeneratorConfig::default()).unwrap_err();
    assert_eq!(
        err,
        ClusterGenError::ExtractionError(ExtractionError::missing(
            "payload.http_service.endpoint.service_name"
        ))
    );
    assert_eq!(tree, before);
}

#[test]
fn test_wrong_type_marker() {
    let yaml = envoy_yaml(r#"{"service_name": "backend.svc"}"#, "").replace(
        "type.googleapis.com/google.protobuf.StringValue",
        "type.googleapis.com/google.protobuf.Struct",
    );
    let mut tree = document::parse(&yaml).unwrap();
    let before = tree.clone();

    let err = apply(&mut tree, &GeneratorConfig::default()).unwrap_err();
    match err {
        ClusterGenError::ExtractionError(ExtractionError::Mismatch { step, found, .. }) => {
            assert!(step.ends_with("configuration.@type"));
            assert_eq!(found, "type.googleapis.com/google.protobuf.Struct");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(tree, before);
}

#[test]
fn test_null_cluster_list_is_replaced() {
    let tree = load(r#"{"service_name": "backend.svc"}"#, "  clusters:\n");
    let (tree, outcome) = run(tree, &GeneratorConfig::default()).unwrap();
    assert_eq!(outcome, MergeOutcome::Inserted);
    assert_eq!(clusters(&tree).len(), 1);
}

#[test]
fn test_cluster_list_with_wrong_shape() {
    let tree = load(r#"{"service_name": "backend.svc"}"#, "  clusters: nope\n");
    let err = run(tree, &GeneratorConfig::default()).unwrap_err();
    assert!(matches!(err, ClusterGenError::MalformedDocument(_)));
}

#[test]
fn test_first_matching_plugin_wins() {
    let yaml = r#"
static_resources:
  listeners:
  - name: no_chains
  - filter_chains:
    - filters:
      - name: envoy.filters.network.http_connection_manager
        typed_config:
          http_filters:
          - name: envoy.filters.http.router
  - filter_chains:
    - filters:
      - name: envoy.filters.network.http_connection_manager
        typed_config:
          http_filters:
          - name: wasmdemo
            typed_config:
              value:
                config:
                  configuration:
                    '@type': type.googleapis.com/google.protobuf.StringValue
                    value: '{"http_service": {"endpoint": {"service_name": "first.svc"}}}'
          - name: wasmdemo
            typed_config:
              value:
                config:
                  configuration:
                    '@type': type.googleapis.com/google.protobuf.StringValue
                    value: '{"http_service": {"endpoint": {"service_name": "second.svc"}}}'
"#;
    let mut tree = document::parse(yaml).unwrap();
    let report = apply(&mut tree, &GeneratorConfig::default()).unwrap();
    assert_eq!(report.endpoint.service_name, "first.svc");
    assert_eq!(clusters(&tree).len(), 1);
}

#[test]
fn test_plugin_with_wrong_marker_falls_through_to_next_listener() {
    let yaml = r#"
static_resources:
  listeners:
  - filter_chains:
    - filters:
      - name: envoy.filters.network.http_connection_manager
        typed_config:
          http_filters:
          - name: wasmdemo
            typed_config:
              value:
                config:
                  configuration:
                    '@type': type.googleapis.com/google.protobuf.Struct
                    value: '{"http_service": {"endpoint": {"service_name": "bad.svc"}}}'
  - filter_chains:
    - filters:
      - name: envoy.filters.network.http_connection_manager
        typed_config:
          http_filters:
          - name: wasmdemo
            typed_config:
              value:
                config:
                  configuration:
                    '@type': type.googleapis.com/google.protobuf.StringValue
                    value: '{"http_service": {"endpoint": {"service_name": "good.svc"}}}'
"#;
    let mut tree = document::parse(yaml).unwrap();
    let report = apply(&mut tree, &GeneratorConfig::default()).unwrap();
    assert_eq!(report.endpoint.service_name, "good.svc");
    assert_eq!(report.outcome, MergeOutcome::Inserted);

    let list = clusters(&tree);
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].name, "outbound|80||good.svc");
}

#[test]
fn test_key_order_is_preserved() {
    let tree = load(r#"{"service_name": "backend.svc"}"#, LOCAL_CLUSTER);
    let (tree, _) = run(tree, &GeneratorConfig::default()).unwrap();
    let out = document::to_string(&tree).unwrap();

    let listeners = out.find("listeners:").unwrap();
    let clusters = out.find("clusters:").unwrap();
    assert!(listeners < clusters);
    let stat_prefix = out.find("stat_prefix").unwrap();
    let http_filters = out.find("http_filters").unwrap();
    assert!(stat_prefix < http_filters);
}
