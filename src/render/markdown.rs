use super::{BadgeResolution, SummaryResult};

const TITLE: &str = "## SQAaaS summary :bellhop_bell:";
const TABLE_HEADER: &str = "| Result | Assertion | Subcriterion ID | Criterion ID |\n\
                            | ------ | --------- | --------------- | ------------ |";
const PASSED: &str = ":heavy_check_mark:";
const FAILED: &str = ":red_circle:";

/// Markdown table with one row per assertion.
pub fn assertions_table(summary: &SummaryResult) -> String {
    let mut out = String::from(TABLE_HEADER);
    for assertion in &summary.assertions {
        out.push_str(&format!(
            "\n| {} | {} | {} | {} |",
            if assertion.passed { PASSED } else { FAILED },
            assertion.text,
            assertion.subcriterion_id,
            assertion.criterion_id
        ));
    }
    out
}

pub fn badge_section(badge: &BadgeResolution) -> String {
    let mut lines = Vec::new();
    match (&badge.tier, &badge.shareable_markup) {
        (Some(_), Some(markup)) => {
            lines.push(markup.platform_badge.clone());
            lines.push(String::new());
            lines.push(markup.shields_badge.clone());
        }
        (Some(tier), None) => lines.push(format!(":medal_sports: _{tier} badge achieved_")),
        (None, _) => lines.push(":no_entry_sign: _No badge achieved_".to_string()),
    }

    if !badge.missing_criteria.is_empty() {
        let missing = badge
            .missing_criteria
            .iter()
            .map(|c| format!("`{c}`"))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(String::new());
        lines.push(format!("Missing criteria: {missing}"));
    }

    lines.join("\n")
}

/// Full step-summary document.
pub fn to_markdown(summary: &SummaryResult) -> String {
    format!(
        "{TITLE}\n\n{}\n\n{}\n\n:clipboard: _View full report at_ ___{}___\n",
        assertions_table(summary),
        badge_section(&summary.badge),
        summary.report_url
    )
}
