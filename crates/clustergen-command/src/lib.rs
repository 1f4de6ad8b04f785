mod plan;

use clap::Parser;
use std::path::PathBuf;

pub use plan::RunPlan;

#[derive(Parser, Debug)]
#[command(version, long_about = None)]
#[command(about = "Add the outbound cluster a proxy plugin needs to reach its endpoint")]
pub struct Cli {
    #[arg(help = "Path to the proxy config file example: deploy_dev/envoy.yaml")]
    pub input: PathBuf,

    #[arg(help = "Where to write the updated config (defaults to overwriting the input)")]
    pub output: Option<PathBuf>,

    #[arg(long, short = 'p')]
    #[arg(help = "Name of the http filter carrying the endpoint [default: wasmdemo]")]
    pub plugin: Option<String>,

    #[arg(long, short = 's')]
    #[arg(help = "YAML file overriding generator defaults")]
    pub settings: Option<PathBuf>,

    #[arg(long)]
    #[arg(help = "Print the updated config to stdout instead of writing it")]
    pub dry_run: bool,

    #[arg(long, short = 'v')]
    #[arg(help = "Enable debug logging")]
    pub verbose: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}
