//! Assessment submission: what gets sent to `POST /pipeline/assessment`.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::types::CriterionId;

/// One custom tool invocation the service should run for a criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolStepDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<String>,
    /// Tool-specific arguments passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CriterionToolSteps {
    pub criterion: CriterionId,
    pub steps: Vec<ToolStepDefinition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentRequest {
    repository_url: String,
    branch: Option<String>,
    custom_tool_steps: Vec<CriterionToolSteps>,
}

impl AssessmentRequest {
    pub fn new(repository_url: impl Into<String>) -> Self {
        Self {
            repository_url: repository_url.into(),
            branch: None,
            custom_tool_steps: Vec::new(),
        }
    }

    pub fn with_branch(mut self, branch: Option<String>) -> Self {
        self.branch = branch.filter(|b| !b.trim().is_empty());
        self
    }

    pub fn with_tool_steps(
        mut self,
        criterion: CriterionId,
        steps: Vec<ToolStepDefinition>,
    ) -> Self {
        self.custom_tool_steps.push(CriterionToolSteps { criterion, steps });
        self
    }

    pub fn repository_url(&self) -> &str {
        &self.repository_url
    }

    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    pub fn custom_tool_steps(&self) -> &[CriterionToolSteps] {
        &self.custom_tool_steps
    }

    /// Body for the submission call. Only the first custom tool-step override
    /// is sent; the service accepts a single criterion workflow per request.
    pub fn to_payload(&self) -> Value {
        let repo = json!({
            "repo": self.repository_url,
            "branch": self.branch,
        });
        let mut payload = json!({
            "repo_code": repo.clone(),
            "repo_docs": repo,
        });

        if self.custom_tool_steps.len() > 1 {
            log::warn!(
                "{} custom tool-step overrides given; only {} is submitted",
                self.custom_tool_steps.len(),
                self.custom_tool_steps[0].criterion
            );
        }

        if let Some(first) = self.custom_tool_steps.first() {
            payload["criteria_workflow"] = json!([{
                "id": first.criterion,
                "tools": first.steps,
            }]);
        }

        payload
    }
}
