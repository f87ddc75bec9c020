use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// A source item left with zero or several reference candidates after
/// structural disambiguation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousMatch {
    pub source: usize,
    pub candidates: Vec<usize>,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(
        "matches are not unique; number of matches differ for {} source item(s){}",
        .0.len(),
        describe_first(.0)
    )]
    Ambiguous(Vec<AmbiguousMatch>),

    #[error("matches are not unique; weight vectors differ: source {source_index} vs reference {reference_index}")]
    VectorMismatch {
        source_index: usize,
        reference_index: usize,
    },

    #[error("index map is not injective; reference indices matched more than once: {duplicates:?}")]
    NotInjective { duplicates: Vec<usize> },

    #[error("{artifact} not found. Please obtain it first with `{step}`")]
    MissingPrerequisite { artifact: String, step: String },

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Node not found: {0}")]
    NodeNotFound(usize),

    #[error("Node already exists: {0}")]
    NodeExists(String),

    #[error("Length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid index map: {0}")]
    InvalidIndexMap(String),

    #[error("No time available for node '{0}'")]
    MissingTime(String),

    #[error("Unknown class label: {0}")]
    UnknownLabel(i64),

    #[error("built dataset does not match the reference: {0}")]
    DatasetMismatch(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    #[inline]
    pub fn missing(artifact: impl Into<String>, step: impl Into<String>) -> Self {
        Error::MissingPrerequisite {
            artifact: artifact.into(),
            step: step.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

fn describe_first(unresolved: &[AmbiguousMatch]) -> String {
    match unresolved.first() {
        Some(m) => format!(
            " (first: source {} -> candidates {:?})",
            m.source, m.candidates
        ),
        None => String::new(),
    }
}
