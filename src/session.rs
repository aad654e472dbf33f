use crate::client::{AssessmentApi, HttpAssessmentClient};
use crate::clock::{Sleeper, TokioSleeper};
use crate::config::RunConfig;
use crate::driver::{AssessmentOutcome, PipelineDriver};
use crate::errors::{AssessError, ConfigError};
use crate::render::{self, SummaryResult};
use crate::request::AssessmentRequest;

/// Everything a finished run produces. Only built when every stage succeeded.
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub outcome: AssessmentOutcome,
    pub summary: SummaryResult,
    pub markdown: String,
}

/// Driver wired to the real HTTP client and wall-clock sleeps.
pub fn bootstrap_driver(
    config: &RunConfig,
) -> Result<PipelineDriver<HttpAssessmentClient, TokioSleeper>, ConfigError> {
    let client = HttpAssessmentClient::new(&config.endpoint, config.http_timeout)?;
    Ok(PipelineDriver::new(client, TokioSleeper, config.poll))
}

/// Submit, wait, fetch and render.
pub async fn run_session<A: AssessmentApi, S: Sleeper>(
    driver: &PipelineDriver<A, S>,
    request: &AssessmentRequest,
) -> Result<SessionReport, AssessError> {
    let outcome = driver.run_assessment(request).await?;
    let summary = render::render_value(&outcome.report)?;
    let markdown = render::markdown::to_markdown(&summary);
    Ok(SessionReport {
        outcome,
        summary,
        markdown,
    })
}
