use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::report::{BadgeSourceKind, BadgeTier, SoftwareBadge};
use crate::types::CriterionId;

pub const PLATFORM_REPORT_BASE: &str = "https://sqaaas.eosc-synergy.eu/#/full-assessment/report/";
const BADGE_IMAGE_BASE: &str =
    "https://github.com/EOSC-synergy/SQAaaS/raw/master/badges/badges_150x116";
const ASSERTION_BASE: &str = "https://api.eu.badgr.io/public/assertions";
const ASSESSMENT_REPO_BASE: &str = "https://raw.githubusercontent.com/EOSC-synergy";
/// Branch of the assessment repository when the report names none.
const DEFAULT_BRANCH: &str = "main";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareableMarkup {
    pub platform_badge: String,
    pub shields_badge: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeResolution {
    /// `None` when no tier has an empty missing list.
    pub tier: Option<BadgeTier>,
    pub missing_criteria: Vec<CriterionId>,
    pub shareable_markup: Option<ShareableMarkup>,
}

impl BadgeResolution {
    pub fn none() -> Self {
        Self {
            tier: None,
            missing_criteria: Vec::new(),
            shareable_markup: None,
        }
    }
}

/// Pick the highest tier with nothing missing.
///
/// Every tier examined without success replaces the remembered missing list,
/// so the result carries the list of the last tier looked at before the
/// achieved one (or of bronze when nothing was achieved).
pub fn resolve_badge(software: Option<&SoftwareBadge>) -> BadgeResolution {
    let Some(software) = software else {
        return BadgeResolution::none();
    };

    let mut tier = None;
    let mut missing_criteria = Vec::new();
    for requirement in &software.tiers {
        if requirement.missing.is_empty() {
            tier = Some(requirement.tier);
            break;
        }
        missing_criteria = requirement.missing.clone();
    }

    let shareable_markup = match (tier, &software.source) {
        (Some(tier), Some(source)) => Some(shareable_markup(tier, source)),
        (Some(tier), None) => {
            log::warn!("{tier} badge achieved but the report names no badge source");
            None
        }
        (None, _) => None,
    };

    BadgeResolution {
        tier,
        missing_criteria,
        shareable_markup,
    }
}

pub fn shareable_markup(tier: BadgeTier, source: &BadgeSourceKind) -> ShareableMarkup {
    let target = badge_target(source);
    let title = format!("SQAaaS {tier} badge achieved");
    ShareableMarkup {
        platform_badge: format!(
            "[![SQAaaS badge]({BADGE_IMAGE_BASE}/badge_software_{tier}.png)]({target} \"{title}\")"
        ),
        shields_badge: format!(
            "[![SQAaaS badge shields.io](https://img.shields.io/badge/{tier}-SQAaaS%20software-{color}?style=flat)]({target} \"{title}\")",
            color = shield_color(tier)
        ),
    }
}

fn badge_target(source: &BadgeSourceKind) -> String {
    match source {
        BadgeSourceKind::ByAssertion { open_badge_id } => {
            format!("{ASSERTION_BASE}/{open_badge_id}")
        }
        BadgeSourceKind::ByRepoRef { name, branch } => {
            let branch = branch.as_deref().unwrap_or(DEFAULT_BRANCH);
            format!(
                "{PLATFORM_REPORT_BASE}{ASSESSMENT_REPO_BASE}/{}.assess.sqaaas/{branch}/.report/assessment_output.json",
                repo_name(name)
            )
        }
    }
}

fn shield_color(tier: BadgeTier) -> &'static str {
    match tier {
        BadgeTier::Gold => "ffd700",
        BadgeTier::Silver => "c0c0c0",
        BadgeTier::Bronze => "cd7f32",
    }
}

/// Last path segment of a repository URL, without a trailing `.git`.
pub fn repo_name(url: &str) -> &str {
    static NAME_RE: OnceLock<Regex> = OnceLock::new();
    let re = NAME_RE.get_or_init(|| Regex::new(r"([^/:]+?)(?:\.git)?/*$").expect("repo name regex"));
    re.captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(url)
}
