use crate::Cli;
use std::path::PathBuf;

/// Where to read from and where the result goes, resolved once from the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    pub input: PathBuf,
    pub output: PathBuf,
    pub dry_run: bool,
}

impl From<&Cli> for RunPlan {
    fn from(cli: &Cli) -> Self {
        Self {
            input: cli.input.clone(),
            output: cli.output.clone().unwrap_or_else(|| cli.input.clone()),
            dry_run: cli.dry_run,
        }
    }
}

impl RunPlan {
    pub fn overwrites_input(&self) -> bool {
        self.input == self.output
    }
}
