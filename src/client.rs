use std::time::Duration;

use reqwest::Client;
use serde_json::{Value, json};

use crate::errors::{ConfigError, RemoteError};
use crate::types::PipelineId;

/// The four SQAaaS calls the pipeline driver needs. Each returns the raw
/// response body; interpreting it is the driver's job.
#[async_trait::async_trait]
pub trait AssessmentApi: Send + Sync {
    /// `POST /pipeline/assessment`
    async fn create_pipeline(&self, payload: &Value) -> Result<String, RemoteError>;

    /// `POST /pipeline/{id}/run`
    async fn run_pipeline(&self, id: &PipelineId) -> Result<String, RemoteError>;

    /// `GET /pipeline/{id}/status`
    async fn pipeline_status(&self, id: &PipelineId) -> Result<String, RemoteError>;

    /// `GET /pipeline/assessment/{id}/output`
    async fn pipeline_output(&self, id: &PipelineId) -> Result<String, RemoteError>;
}

#[derive(Debug, Clone, Copy)]
enum Method {
    Get,
    Post,
}

impl Method {
    fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

pub struct HttpAssessmentClient {
    client: Client,
    endpoint: String,
}

impl HttpAssessmentClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ConfigError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Value>,
    ) -> Result<String, RemoteError> {
        let url = format!("{}/{}", self.endpoint, path);
        let builder = match method {
            Method::Get => self.client.get(&url).header("Content-Type", "application/json"),
            Method::Post => self.client.post(&url).json(payload.unwrap_or(&json!({}))),
        };

        let transport = |e: reqwest::Error| RemoteError::Transport {
            method: method.as_str(),
            url: url.clone(),
            message: e.to_string(),
        };

        let res = builder.send().await.map_err(transport)?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            log::info!("{} {url} failed with {status}", method.as_str());
            return Err(RemoteError::Status {
                method: method.as_str(),
                url,
                status: status.as_u16(),
                body,
            });
        }

        log::debug!("{} {url} -> {status}", method.as_str());
        res.text().await.map_err(transport)
    }
}

#[async_trait::async_trait]
impl AssessmentApi for HttpAssessmentClient {
    async fn create_pipeline(&self, payload: &Value) -> Result<String, RemoteError> {
        self.send(Method::Post, "pipeline/assessment", Some(payload)).await
    }

    async fn run_pipeline(&self, id: &PipelineId) -> Result<String, RemoteError> {
        self.send(Method::Post, &format!("pipeline/{id}/run"), None).await
    }

    async fn pipeline_status(&self, id: &PipelineId) -> Result<String, RemoteError> {
        self.send(Method::Get, &format!("pipeline/{id}/status"), None).await
    }

    async fn pipeline_output(&self, id: &PipelineId) -> Result<String, RemoteError> {
        self.send(Method::Get, &format!("pipeline/assessment/{id}/output"), None).await
    }
}
