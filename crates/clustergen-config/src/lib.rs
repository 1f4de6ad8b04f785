pub mod document;
pub mod extract;
pub mod pipeline;
pub mod settings;

pub use extract::extract;
pub use pipeline::{PipelineReport, apply, run};
pub use settings::GeneratorConfig;
