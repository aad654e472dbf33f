//! Pipeline driver: CREATE → RUN → STATUS (repeated) → OUTPUT.
//!
//! Every state entry issues exactly one call against [`AssessmentApi`]. The
//! only repeated state is STATUS, which waits one poll interval between
//! visits until the remote pipeline reports a completed build status.

use serde_json::Value;

use crate::client::AssessmentApi;
use crate::clock::Sleeper;
use crate::config::PollPolicy;
use crate::errors::{DriverError, ProtocolError};
use crate::request::AssessmentRequest;
use crate::types::{BuildStatus, PipelineId};

/// A submitted pipeline, owned by the driver until the loop finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineHandle {
    pub id: PipelineId,
    /// STATUS requests issued so far.
    pub polls: u32,
}

impl PipelineHandle {
    fn new(id: PipelineId) -> Self {
        Self { id, polls: 0 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineState {
    Create,
    Run(PipelineHandle),
    Status(PipelineHandle),
    Output(PipelineHandle, BuildStatus),
    Done(AssessmentOutcome),
}

impl PipelineState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Run(_) => "run",
            Self::Status(_) => "status",
            Self::Output(..) => "output",
            Self::Done(_) => "done",
        }
    }
}

/// What a finished pipeline hands back: the raw report plus the build status
/// STATUS observed before OUTPUT was fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentOutcome {
    pub pipeline_id: PipelineId,
    pub build_status: BuildStatus,
    pub report: Value,
}

pub struct PipelineDriver<A, S> {
    api: A,
    sleeper: S,
    poll: PollPolicy,
}

impl<A: AssessmentApi, S: Sleeper> PipelineDriver<A, S> {
    pub fn new(api: A, sleeper: S, poll: PollPolicy) -> Self {
        Self {
            api,
            sleeper,
            poll,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// Drive a pipeline from submission until its output has been fetched.
    pub async fn run_assessment(
        &self,
        request: &AssessmentRequest,
    ) -> Result<AssessmentOutcome, DriverError> {
        let mut state = PipelineState::Create;
        loop {
            state = match state {
                PipelineState::Done(outcome) => return Ok(outcome),
                other => self.transition(other, request).await?,
            };
        }
    }

    /// Run the entry action of `state` and return the state that follows.
    pub async fn transition(
        &self,
        state: PipelineState,
        request: &AssessmentRequest,
    ) -> Result<PipelineState, DriverError> {
        match state {
            PipelineState::Create => {
                let body = self.api.create_pipeline(&request.to_payload()).await?;
                let json = parse_body("create", &body)?;
                let id = json
                    .get("id")
                    .and_then(|v| v.as_str())
                    .filter(|s| !s.is_empty())
                    .ok_or(ProtocolError::MissingField {
                        context: "create",
                        field: "id",
                    })?;
                log::info!("Created pipeline {id} for {}", request.repository_url());
                Ok(PipelineState::Run(PipelineHandle::new(PipelineId::new(id))))
            }
            PipelineState::Run(handle) => {
                self.api.run_pipeline(&handle.id).await?;
                log::info!("Pipeline {} started", handle.id);
                Ok(PipelineState::Status(handle))
            }
            PipelineState::Status(mut handle) => {
                let body = self.api.pipeline_status(&handle.id).await?;
                handle.polls += 1;
                let json = parse_body("status", &body)?;
                let status = match json.get("build_status") {
                    Some(Value::String(raw)) => BuildStatus::parse(raw),
                    // Not yet picked up by the build backend.
                    Some(other) => BuildStatus::Pending(other.to_string()),
                    None => {
                        return Err(ProtocolError::MissingField {
                            context: "status",
                            field: "build_status",
                        }
                        .into());
                    }
                };

                if status.is_completed() {
                    log::info!("Pipeline {} finished with status {status}", handle.id);
                    return Ok(PipelineState::Output(handle, status));
                }

                if self.poll.max_polls.is_some_and(|max| handle.polls >= max) {
                    return Err(DriverError::PollLimitExceeded {
                        pipeline_id: handle.id,
                        polls: handle.polls,
                    });
                }

                log::info!(
                    "Current status is {status}. Waiting {} seconds..",
                    self.poll.interval.as_secs()
                );
                self.sleeper.sleep(self.poll.interval).await;
                Ok(PipelineState::Status(handle))
            }
            PipelineState::Output(handle, build_status) => {
                let body = self.api.pipeline_output(&handle.id).await?;
                let report = parse_body("output", &body)?;
                if !report.is_object() {
                    return Err(ProtocolError::InvalidBody {
                        context: "output",
                        message: "expected a JSON object".to_string(),
                    }
                    .into());
                }
                Ok(PipelineState::Done(AssessmentOutcome {
                    pipeline_id: handle.id,
                    build_status,
                    report,
                }))
            }
            done @ PipelineState::Done(_) => Ok(done),
        }
    }
}

fn parse_body(context: &'static str, body: &str) -> Result<Value, ProtocolError> {
    serde_json::from_str(body).map_err(|e| ProtocolError::InvalidBody {
        context,
        message: e.to_string(),
    })
}
