use std::path::PathBuf;

use thiserror::Error;

use crate::types::PipelineId;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required input: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },

    #[error("Failed to read tool step file {}: {source}", path.display())]
    ToolStepRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse tool step file {}: {source}", path.display())]
    ToolStepParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("HTTP error occurred: {method} {url} returned {status}: {body}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
        body: String,
    },

    #[error("Other error occurred: {method} {url}: {message}")]
    Transport {
        method: &'static str,
        url: String,
        message: String,
    },
}

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Response to {context} is missing field '{field}'")]
    MissingField {
        context: &'static str,
        field: &'static str,
    },

    #[error("Response to {context} is not valid JSON: {message}")]
    InvalidBody {
        context: &'static str,
        message: String,
    },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MalformedReportError {
    #[error("Report is missing required key '{0}'")]
    MissingKey(String),

    #[error("Report key '{path}' should be {expected}")]
    UnexpectedType { path: String, expected: &'static str },
}

#[derive(Error, Debug)]
pub enum DriverError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("Pipeline {pipeline_id} still not completed after {polls} status polls")]
    PollLimitExceeded { pipeline_id: PipelineId, polls: u32 },
}

/// Top-level failure of a run. Each variant maps to a distinct exit code.
#[derive(Error, Debug)]
pub enum AssessError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error("Malformed report: {0}")]
    MalformedReport(#[from] MalformedReportError),
}

impl AssessError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Driver(DriverError::Remote(RemoteError::Status { .. })) => 101,
            Self::Driver(DriverError::Remote(RemoteError::Transport { .. })) => 102,
            Self::Driver(DriverError::Protocol(_)) => 3,
            Self::Driver(DriverError::PollLimitExceeded { .. }) => 4,
            Self::MalformedReport(_) => 3,
        }
    }
}
