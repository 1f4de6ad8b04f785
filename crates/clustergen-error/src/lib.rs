use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClusterGenError {
    #[error("Failed to load generator settings: {0}")]
    ConfigError(String),

    #[error("I/O failure: {0}")]
    IoError(String),

    #[error("Input document is not well-formed: {0}")]
    ParseError(String),

    #[error("Embedded plugin configuration could not be decoded: {0}")]
    PayloadDecodeError(String),

    #[error("Unable to extract plugin endpoint: {0}")]
    ExtractionError(#[from] ExtractionError),

    #[error("Unable to serialize document: {0}")]
    SerializeError(String),

    #[error("Document has an unexpected shape: {0}")]
    MalformedDocument(String),
}

/// Why the plugin endpoint could not be located.
///
/// `step` is the dotted path of the node that was being read, e.g.
/// `static_resources.listeners` or `http_service.endpoint.service_name`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("missing `{step}`")]
    Missing { step: String },

    #[error("`{step}` expected {expected}, found {found}")]
    Mismatch {
        step: String,
        expected: String,
        found: String,
    },

    #[error("no http filter named `{plugin}` under any `{manager}` filter")]
    PluginNotFound { plugin: String, manager: String },
}

impl ExtractionError {
    pub fn missing(step: impl Into<String>) -> Self {
        Self::Missing { step: step.into() }
    }

    pub fn mismatch(
        step: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::Mismatch {
            step: step.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// The path of the node the extraction stopped at, if any.
    pub fn step(&self) -> Option<&str> {
        match self {
            Self::Missing { step } | Self::Mismatch { step, .. } => Some(step),
            Self::PluginNotFound { .. } => None,
        }
    }
}
