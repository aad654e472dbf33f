//! Typed view over the SQAaaS output document.
//!
//! Criteria, subcriteria and evidence keep the order in which the service
//! wrote them (`serde_json` is built with `preserve_order`).

use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::MalformedReportError;
use crate::types::{CriterionId, SubcriterionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceItem {
    pub valid: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subcriterion {
    pub id: SubcriterionId,
    pub evidence: Vec<EvidenceItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criterion {
    pub id: CriterionId,
    pub subcriteria: Vec<Subcriterion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTier {
    Gold,
    Silver,
    Bronze,
}

impl BadgeTier {
    /// Highest tier first.
    pub const PRIORITY: [BadgeTier; 3] = [BadgeTier::Gold, BadgeTier::Silver, BadgeTier::Bronze];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gold => "gold",
            Self::Silver => "silver",
            Self::Bronze => "bronze",
        }
    }
}

impl std::fmt::Display for BadgeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a badge link points. The two report schemas disagree on this, so it
/// is settled once while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BadgeSourceKind {
    /// Issued badge with an Open Badges assertion id.
    ByAssertion { open_badge_id: String },
    /// Older reports: link built from the assessed repository.
    ByRepoRef { name: String, branch: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierRequirement {
    pub tier: BadgeTier,
    pub missing: Vec<CriterionId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SoftwareBadge {
    pub data: Value,
    /// Always in [`BadgeTier::PRIORITY`] order.
    pub tiers: Vec<TierRequirement>,
    pub source: Option<BadgeSourceKind>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub name: String,
    pub branch: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentReport {
    pub criteria: Vec<Criterion>,
    pub software_badge: Option<SoftwareBadge>,
    pub repositories: Vec<RepoRef>,
    pub report_json_url: String,
}

impl AssessmentReport {
    pub fn from_value(value: &Value) -> Result<Self, MalformedReportError> {
        let root = as_object(value, "")?;

        let (criteria_key, criteria_value) = ["report", "criteria"]
            .into_iter()
            .find_map(|key| root.get(key).map(|value| (key, value)))
            .ok_or_else(|| MalformedReportError::MissingKey("report".to_string()))?;
        let criteria = parse_criteria(criteria_value, criteria_key)?;

        let repositories = match root.get("repository") {
            Some(value) => parse_repositories(value)?,
            None => Vec::new(),
        };

        let software_badge = match root.get("badge").and_then(|b| b.get("software")) {
            Some(Value::Null) | None => None,
            Some(value) => Some(parse_software_badge(value, &repositories)?),
        };

        let meta = as_object(required(root, "meta", "")?, "meta")?;
        let report_json_url = as_str(
            required(meta, "report_json_url", "meta")?,
            "meta.report_json_url",
        )?;

        Ok(Self {
            criteria,
            software_badge,
            repositories,
            report_json_url: report_json_url.to_string(),
        })
    }

    pub fn evidence_count(&self) -> usize {
        self.criteria
            .iter()
            .flat_map(|c| &c.subcriteria)
            .map(|s| s.evidence.len())
            .sum()
    }
}

fn parse_criteria(value: &Value, key: &str) -> Result<Vec<Criterion>, MalformedReportError> {
    let mut criteria = Vec::new();
    for (criterion_id, criterion_value) in as_object(value, key)? {
        let path = format!("{key}.{criterion_id}");
        let criterion = as_object(criterion_value, &path)?;
        let subcriteria_value = required(criterion, "subcriteria", &path)?;
        let subcriteria_path = format!("{path}.subcriteria");

        let mut subcriteria = Vec::new();
        for (sub_id, sub_value) in as_object(subcriteria_value, &subcriteria_path)? {
            let sub_path = format!("{subcriteria_path}.{sub_id}");
            let sub = as_object(sub_value, &sub_path)?;
            let evidence_path = format!("{sub_path}.evidence");
            let evidence = as_array(required(sub, "evidence", &sub_path)?, &evidence_path)?
                .iter()
                .enumerate()
                .map(|(i, item)| parse_evidence(item, &format!("{evidence_path}[{i}]")))
                .collect::<Result<Vec<_>, _>>()?;
            subcriteria.push(Subcriterion {
                id: SubcriterionId::new(sub_id.as_str()),
                evidence,
            });
        }

        criteria.push(Criterion {
            id: CriterionId::new(criterion_id.as_str()),
            subcriteria,
        });
    }
    Ok(criteria)
}

fn parse_evidence(value: &Value, path: &str) -> Result<EvidenceItem, MalformedReportError> {
    let item = as_object(value, path)?;
    let valid = required(item, "valid", path)?
        .as_bool()
        .ok_or_else(|| unexpected(&format!("{path}.valid"), "a boolean"))?;
    let message = match item.get("message") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    Ok(EvidenceItem { valid, message })
}

fn parse_repositories(value: &Value) -> Result<Vec<RepoRef>, MalformedReportError> {
    as_array(value, "repository")?
        .iter()
        .enumerate()
        .map(|(i, repo)| {
            let path = format!("repository[{i}]");
            let obj = as_object(repo, &path)?;
            let name = as_str(required(obj, "name", &path)?, &format!("{path}.name"))?;
            let branch = obj
                .get("tag")
                .or_else(|| obj.get("branch"))
                .and_then(Value::as_str)
                .map(str::to_string);
            Ok(RepoRef {
                name: name.to_string(),
                branch,
            })
        })
        .collect()
}

fn parse_software_badge(
    value: &Value,
    repositories: &[RepoRef],
) -> Result<SoftwareBadge, MalformedReportError> {
    let path = "badge.software";
    let software = as_object(value, path)?;
    let criteria_path = format!("{path}.criteria");
    let criteria = as_object(required(software, "criteria", path)?, &criteria_path)?;

    let mut tiers = Vec::with_capacity(BadgeTier::PRIORITY.len());
    for tier in BadgeTier::PRIORITY {
        let tier_path = format!("{criteria_path}.{tier}");
        let tier_obj = as_object(
            required(criteria, tier.as_str(), &criteria_path)?,
            &tier_path,
        )?;
        let missing_path = format!("{tier_path}.missing");
        let missing = as_array(required(tier_obj, "missing", &tier_path)?, &missing_path)?
            .iter()
            .map(|v| {
                v.as_str()
                    .map(CriterionId::new)
                    .ok_or_else(|| unexpected(&missing_path, "a list of criterion ids"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        tiers.push(TierRequirement { tier, missing });
    }

    let data = software.get("data").cloned().unwrap_or(Value::Null);
    let source = match data.get("openBadgeId").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => Some(BadgeSourceKind::ByAssertion {
            open_badge_id: id.to_string(),
        }),
        _ => repositories.first().map(|repo| BadgeSourceKind::ByRepoRef {
            name: repo.name.clone(),
            branch: repo.branch.clone(),
        }),
    };

    Ok(SoftwareBadge {
        data,
        tiers,
        source,
    })
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn required<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<&'a Value, MalformedReportError> {
    obj.get(key)
        .ok_or_else(|| MalformedReportError::MissingKey(join(path, key)))
}

fn unexpected(path: &str, expected: &'static str) -> MalformedReportError {
    MalformedReportError::UnexpectedType {
        path: if path.is_empty() {
            "<root>".to_string()
        } else {
            path.to_string()
        },
        expected,
    }
}

fn as_object<'a>(
    value: &'a Value,
    path: &str,
) -> Result<&'a Map<String, Value>, MalformedReportError> {
    value.as_object().ok_or_else(|| unexpected(path, "an object"))
}

fn as_array<'a>(value: &'a Value, path: &str) -> Result<&'a Vec<Value>, MalformedReportError> {
    value.as_array().ok_or_else(|| unexpected(path, "a list"))
}

fn as_str<'a>(value: &'a Value, path: &str) -> Result<&'a str, MalformedReportError> {
    value.as_str().ok_or_else(|| unexpected(path, "a string"))
}
