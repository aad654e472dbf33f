pub mod client;
pub mod clock;
pub mod config;
pub mod driver;
pub mod errors;
pub mod render;
pub mod report;
pub mod request;
pub mod sanitize;
mod session;
pub mod step_summary;
pub mod types;
pub mod ui;

pub use crate::client::{AssessmentApi, HttpAssessmentClient};
pub use crate::clock::{Sleeper, TokioSleeper};
pub use crate::config::{PollPolicy, RunConfig};
pub use crate::driver::{AssessmentOutcome, PipelineDriver, PipelineHandle, PipelineState};
pub use crate::errors::{
    AssessError, ConfigError, DriverError, MalformedReportError, ProtocolError, RemoteError,
};
pub use crate::render::{Assertion, BadgeResolution, SummaryResult, render, render_value};
pub use crate::report::{AssessmentReport, BadgeSourceKind, BadgeTier};
pub use crate::request::{AssessmentRequest, ToolStepDefinition};
pub use crate::session::{SessionReport, bootstrap_driver, run_session};
pub use crate::types::{BuildStatus, CriterionId, PipelineId, SubcriterionId};
