//! Report → summary. Pure: no I/O besides the occasional log line.

use serde::Serialize;
use serde_json::Value;

pub mod badge;
pub mod markdown;

pub use badge::{BadgeResolution, PLATFORM_REPORT_BASE, ShareableMarkup, resolve_badge};

use crate::errors::MalformedReportError;
use crate::report::AssessmentReport;
use crate::sanitize::sanitize_message;
use crate::types::{CriterionId, SubcriterionId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assertion {
    pub passed: bool,
    pub text: String,
    pub subcriterion_id: SubcriterionId,
    pub criterion_id: CriterionId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryResult {
    pub assertions: Vec<Assertion>,
    pub badge: BadgeResolution,
    pub report_url: String,
}

impl SummaryResult {
    pub fn passed_count(&self) -> usize {
        self.assertions.iter().filter(|a| a.passed).count()
    }
}

/// Parse a raw output document and render it.
pub fn render_value(value: &Value) -> Result<SummaryResult, MalformedReportError> {
    let report = AssessmentReport::from_value(value)?;
    Ok(render(&report))
}

pub fn render(report: &AssessmentReport) -> SummaryResult {
    SummaryResult {
        assertions: flatten_assertions(report),
        badge: resolve_badge(report.software_badge.as_ref()),
        report_url: report_url(&report.report_json_url),
    }
}

/// One assertion per evidence item, in report order.
pub fn flatten_assertions(report: &AssessmentReport) -> Vec<Assertion> {
    let mut assertions = Vec::with_capacity(report.evidence_count());
    for criterion in &report.criteria {
        for subcriterion in &criterion.subcriteria {
            for evidence in &subcriterion.evidence {
                assertions.push(Assertion {
                    passed: evidence.valid,
                    text: sanitize_message(&evidence.message),
                    subcriterion_id: subcriterion.id.clone(),
                    criterion_id: criterion.id.clone(),
                });
            }
        }
    }
    assertions
}

pub fn report_url(report_json_url: &str) -> String {
    format!("{PLATFORM_REPORT_BASE}{report_json_url}")
}
