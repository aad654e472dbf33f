use colored::*;

use crate::render::SummaryResult;
use crate::types::BuildStatus;

/// Environment variable that enables machine-readable JSON events on stderr.
const MACHINE_LOG_ENV: &str = "SQAAAS_MACHINE_LOG";

pub fn init_logging() {
    // Diagnostics go through `log`; default to info so CI logs show progress.
    let mut builder = env_logger::Builder::from_default_env();
    if std::env::var("RUST_LOG").is_err() {
        builder.filter_level(log::LevelFilter::Info);
    }
    let _ = builder.try_init();
}

fn machine_log_enabled() -> bool {
    matches!(
        std::env::var(MACHINE_LOG_ENV)
            .ok()
            .as_deref()
            .map(str::to_ascii_lowercase)
            .as_deref(),
        Some("1") | Some("true")
    )
}

fn emit_machine_event(kind: &str, data: serde_json::Value) {
    if !machine_log_enabled() {
        return;
    }

    let event = serde_json::json!({
        "kind": kind,
        "data": data,
    });

    if let Ok(line) = serde_json::to_string(&event) {
        eprintln!("{line}");
    }
}

pub fn header(repo: &str, branch: Option<&str>, endpoint: &str) {
    let target = match branch {
        Some(branch) => format!("{repo}@{branch}"),
        None => repo.to_string(),
    };
    eprintln!(
        "{} {} | {} | {}",
        ">>".bold(),
        "sqaaas-assess".bold(),
        target.cyan(),
        endpoint.dimmed()
    );
    emit_machine_event(
        "header",
        serde_json::json!({ "repo": repo, "branch": branch, "endpoint": endpoint }),
    );
}

pub fn pipeline_finished(pipeline_id: &str, status: &BuildStatus) {
    let line = format!("Pipeline {pipeline_id} finished with status {status}");
    if status.is_successful() {
        eprintln!("{} {}", "●".green().bold(), line.green());
    } else {
        eprintln!("{} {}", "●".yellow().bold(), line.yellow());
    }
    emit_machine_event(
        "pipeline_finished",
        serde_json::json!({
            "pipeline_id": pipeline_id,
            "status": status.as_str(),
            "successful": status.is_successful(),
        }),
    );
}

pub fn summary_stats(summary: &SummaryResult) {
    let tier = summary
        .badge
        .tier
        .map(|t| t.to_string())
        .unwrap_or_else(|| "none".to_string());
    eprintln!(
        "{} {}/{} assertions passed | badge: {}",
        "●".blue().bold(),
        summary.passed_count(),
        summary.assertions.len(),
        tier.bold()
    );
    emit_machine_event(
        "summary",
        serde_json::json!({
            "passed": summary.passed_count(),
            "total": summary.assertions.len(),
            "tier": tier,
        }),
    );
}

pub fn warn(msg: impl AsRef<str>) {
    let raw = msg.as_ref();
    eprintln!("{} {}", "!".yellow().bold(), raw.yellow());
    emit_machine_event("warn", serde_json::json!({ "message": raw }));
}

pub fn error(msg: impl AsRef<str>) {
    let raw = msg.as_ref();
    eprintln!("{} {}", "✗".red().bold(), raw.red());
    emit_machine_event("error", serde_json::json!({ "message": raw }));
}
