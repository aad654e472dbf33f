//! Run configuration, read once at startup from the process environment.
//! Nothing below the binary's `main` looks at environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::ConfigError;
use crate::request::{AssessmentRequest, ToolStepDefinition};
use crate::types::CriterionId;

pub const DEFAULT_ENDPOINT: &str = "https://api-staging.sqaaas.eosc-synergy.eu/v1";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 120;

pub const REPO_ENV: &str = "INPUT_REPO";
pub const BRANCH_ENV: &str = "INPUT_BRANCH";
pub const QC_UNI_STEPS_ENV: &str = "INPUT_QC_UNI_STEPS";
pub const ENDPOINT_ENV: &str = "SQAAAS_ENDPOINT";
pub const POLL_INTERVAL_ENV: &str = "SQAAAS_POLL_INTERVAL_SECS";
pub const MAX_POLLS_ENV: &str = "SQAAAS_MAX_POLLS";
pub const STEP_SUMMARY_ENV: &str = "GITHUB_STEP_SUMMARY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// Upper bound on STATUS polls. `None` keeps polling until the pipeline
    /// completes or the process is killed.
    pub max_polls: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            max_polls: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub endpoint: String,
    pub request: AssessmentRequest,
    pub poll: PollPolicy,
    pub http_timeout: Duration,
    pub step_summary_path: Option<PathBuf>,
}

impl RunConfig {
    /// Load `.env` (if any) and read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let repository_url = get(REPO_ENV).ok_or(ConfigError::Missing(REPO_ENV))?;
        let mut request =
            AssessmentRequest::new(repository_url.trim()).with_branch(get(BRANCH_ENV));

        if let Some(paths) = get(QC_UNI_STEPS_ENV) {
            let steps = load_tool_steps(&split_paths(&paths))?;
            if !steps.is_empty() {
                request = request.with_tool_steps(CriterionId::unit_testing(), steps);
            }
        }

        let endpoint = get(ENDPOINT_ENV).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let mut poll = PollPolicy::default();
        if let Some(raw) = get(POLL_INTERVAL_ENV) {
            poll.interval = Duration::from_secs(parse_number(POLL_INTERVAL_ENV, &raw)?);
        }
        if let Some(raw) = get(MAX_POLLS_ENV) {
            poll.max_polls = Some(parse_number(MAX_POLLS_ENV, &raw)?);
        }

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            request,
            poll,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            step_summary_path: get(STEP_SUMMARY_ENV).map(PathBuf::from),
        })
    }
}

pub(crate) fn parse_number<T: std::str::FromStr>(
    key: &'static str,
    raw: &str,
) -> Result<T, ConfigError> {
    raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.to_string(),
    })
}

fn split_paths(raw: &str) -> Vec<PathBuf> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Read tool-step definitions. Each file holds either one step or a list of
/// steps, in YAML or JSON.
pub fn load_tool_steps(paths: &[PathBuf]) -> Result<Vec<ToolStepDefinition>, ConfigError> {
    let mut steps = Vec::new();
    for path in paths {
        steps.extend(load_tool_step_file(path)?);
    }
    Ok(steps)
}

fn load_tool_step_file(path: &Path) -> Result<Vec<ToolStepDefinition>, ConfigError> {
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum StepFile {
        Many(Vec<ToolStepDefinition>),
        One(ToolStepDefinition),
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ToolStepRead {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: StepFile =
        serde_yaml::from_str(&content).map_err(|source| ConfigError::ToolStepParse {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(match parsed {
        StepFile::Many(steps) => steps,
        StepFile::One(step) => vec![step],
    })
}
