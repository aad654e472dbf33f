#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::{Value, json};
use sqaaas_assess::{AssessmentApi, PipelineId, RemoteError, Sleeper};

/// Calls observed by [`ScriptedApi`], in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create,
    Run(String),
    Status(String),
    Output(String),
}

/// Fake SQAaaS API answering from a fixed script.
pub struct ScriptedApi {
    create_body: String,
    statuses: Mutex<VecDeque<Result<String, RemoteError>>>,
    output_body: String,
    calls: Mutex<Vec<Call>>,
    payloads: Mutex<Vec<Value>>,
}

impl ScriptedApi {
    pub fn new(statuses: &[&str], report: Value) -> Self {
        Self {
            create_body: json!({"id": "pipe-42"}).to_string(),
            statuses: Mutex::new(
                statuses
                    .iter()
                    .map(|s| Ok(json!({"build_status": s}).to_string()))
                    .collect(),
            ),
            output_body: report.to_string(),
            calls: Mutex::new(Vec::new()),
            payloads: Mutex::new(Vec::new()),
        }
    }

    pub fn with_create_body(mut self, body: Value) -> Self {
        self.create_body = body.to_string();
        self
    }

    pub fn with_raw_output(mut self, body: &str) -> Self {
        self.output_body = body.to_string();
        self
    }

    pub fn with_status_body(self, body: Value) -> Self {
        self.statuses.lock().unwrap().push_back(Ok(body.to_string()));
        self
    }

    pub fn with_status_error(self, err: RemoteError) -> Self {
        self.statuses.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn payloads(&self) -> Vec<Value> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl AssessmentApi for ScriptedApi {
    async fn create_pipeline(&self, payload: &Value) -> Result<String, RemoteError> {
        self.calls.lock().unwrap().push(Call::Create);
        self.payloads.lock().unwrap().push(payload.clone());
        Ok(self.create_body.clone())
    }

    async fn run_pipeline(&self, id: &PipelineId) -> Result<String, RemoteError> {
        self.calls.lock().unwrap().push(Call::Run(id.to_string()));
        Ok(String::new())
    }

    async fn pipeline_status(&self, id: &PipelineId) -> Result<String, RemoteError> {
        self.calls.lock().unwrap().push(Call::Status(id.to_string()));
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .expect("status script exhausted")
    }

    async fn pipeline_output(&self, id: &PipelineId) -> Result<String, RemoteError> {
        self.calls.lock().unwrap().push(Call::Output(id.to_string()));
        Ok(self.output_body.clone())
    }
}

/// Sleeper that records requested delays instead of waiting.
#[derive(Default)]
pub struct RecordingSleeper {
    slept: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn slept(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
    }
}

/// Report from the silver-badge scenario: one passing evidence item, gold
/// blocked by `QC.Sec`.
pub fn silver_report() -> Value {
    json!({
        "report": {
            "QC.Uni": {"subcriteria": {"QC.Uni.1": {"evidence": [
                {"valid": true, "message": "ok"}
            ]}}}
        },
        "badge": {"software": {
            "data": {"openBadgeId": "badge-1"},
            "criteria": {
                "gold": {"missing": ["QC.Sec"]},
                "silver": {"missing": []},
                "bronze": {"missing": []}
            }
        }},
        "repository": [{"name": "https://github.com/org/repo", "tag": "main"}],
        "meta": {"report_json_url": "https://example.org/assessment_output.json"}
    })
}
