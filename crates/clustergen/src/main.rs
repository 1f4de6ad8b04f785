//! clustergen - derive the outbound cluster a proxy plugin calls and add it to
//! the proxy configuration.

use clustergen_command::{Cli, RunPlan};
use clustergen_config::{GeneratorConfig, PipelineReport, apply, document};
use clustergen_error::ClusterGenError;
use clustergen_types::MergeOutcome;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    let args = clustergen_command::parse();
    init_tracing(args.verbose);

    if let Err(e) = handle_run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

/// Log to stderr so `--dry-run` output on stdout stays clean. `RUST_LOG`
/// wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolve generator settings: settings file first, then CLI overrides.
fn load_settings(args: &Cli) -> Result<GeneratorConfig, ClusterGenError> {
    let mut config = match &args.settings {
        Some(path) => {
            info!("Loading generator settings from: {}", path.display());
            GeneratorConfig::from_file(path)?
        }
        None => GeneratorConfig::default(),
    };
    if let Some(plugin) = &args.plugin {
        config = config.with_plugin_name(plugin.clone());
    }
    debug!("Generator settings: {:#?}", config);
    Ok(config)
}

/// Handle a single run
///
/// # Arguments
///
/// * `args` - Parsed command line arguments
///
/// # Returns
///
/// * `Result<(), ClusterGenError>` - The result of the operation
fn handle_run(args: &Cli) -> Result<(), ClusterGenError> {
    let plan = RunPlan::from(args);
    let config = load_settings(args)?;

    if !plan.input.exists() {
        return Err(ClusterGenError::IoError(format!(
            "file does not exist: {}",
            plan.input.display()
        )));
    }

    info!("Loading proxy configuration from: {}", plan.input.display());
    let mut tree = document::from_file(&plan.input)?;

    let PipelineReport {
        cluster, outcome, ..
    } = apply(&mut tree, &config)?;
    info!("Cluster '{}': {}", cluster.name, outcome);
    if outcome == MergeOutcome::AlreadyPresent {
        debug!("Existing cluster kept as-is");
    }

    if plan.dry_run {
        print!("{}", document::to_string(&tree)?);
        return Ok(());
    }

    if plan.overwrites_input() {
        debug!("Rewriting input in place");
    }
    document::write_atomic(&plan.output, &tree)?;
    info!("Config updated: {}", plan.output.display());
    Ok(())
}
