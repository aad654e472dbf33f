mod common;

use std::time::Duration;

use common::{Call, RecordingSleeper, ScriptedApi, silver_report};
use serde_json::json;
use sqaaas_assess::{
    AssessError, AssessmentRequest, BadgeTier, BuildStatus, CriterionId, DriverError,
    PipelineDriver, PollPolicy, ProtocolError, RemoteError, ToolStepDefinition, run_session,
};

fn request() -> AssessmentRequest {
    AssessmentRequest::new("https://github.com/org/repo").with_branch(Some("main".to_string()))
}

fn driver(api: ScriptedApi) -> PipelineDriver<ScriptedApi, RecordingSleeper> {
    PipelineDriver::new(api, RecordingSleeper::default(), PollPolicy::default())
}

#[tokio::test]
async fn polls_until_completed_then_fetches_output_once() {
    let driver = driver(ScriptedApi::new(
        &["RUNNING", "RUNNING", "SUCCESS"],
        silver_report(),
    ));

    let outcome = driver.run_assessment(&request()).await.unwrap();

    assert_eq!(outcome.pipeline_id.as_str(), "pipe-42");
    assert_eq!(outcome.build_status, BuildStatus::Success);
    assert_eq!(outcome.report, silver_report());

    let id = "pipe-42".to_string();
    assert_eq!(
        driver.api().calls(),
        vec![
            Call::Create,
            Call::Run(id.clone()),
            Call::Status(id.clone()),
            Call::Status(id.clone()),
            Call::Status(id.clone()),
            Call::Output(id),
        ]
    );
    assert_eq!(
        driver.sleeper().slept(),
        vec![Duration::from_secs(5), Duration::from_secs(5)]
    );
}

#[tokio::test]
async fn completed_on_first_poll_never_sleeps() {
    let driver = driver(ScriptedApi::new(&["UNSTABLE"], silver_report()));
    let outcome = driver.run_assessment(&request()).await.unwrap();
    assert!(outcome.build_status.is_successful());
    assert!(driver.sleeper().slept().is_empty());
}

#[tokio::test]
async fn failed_pipeline_still_fetches_output() {
    for terminal in ["FAILURE", "ABORTED"] {
        let driver = driver(ScriptedApi::new(&["QUEUED", terminal], silver_report()));
        let outcome = driver.run_assessment(&request()).await.unwrap();
        assert_eq!(outcome.build_status.as_str(), terminal);
        assert!(!outcome.build_status.is_successful());
        assert!(matches!(driver.api().calls().last(), Some(Call::Output(_))));
    }
}

#[tokio::test]
async fn missing_pipeline_id_fails_before_run() {
    let api = ScriptedApi::new(&["SUCCESS"], silver_report())
        .with_create_body(json!({"message": "created"}));
    let driver = driver(api);

    let err = driver.run_assessment(&request()).await.unwrap_err();

    assert!(matches!(
        err,
        DriverError::Protocol(ProtocolError::MissingField {
            context: "create",
            field: "id"
        })
    ));
    assert_eq!(driver.api().calls(), vec![Call::Create]);
}

#[tokio::test]
async fn status_http_error_is_fatal() {
    let api = ScriptedApi::new(&[], silver_report()).with_status_error(RemoteError::Status {
        method: "GET",
        url: "http://sqaaas/pipeline/pipe-42/status".to_string(),
        status: 502,
        body: "bad gateway".to_string(),
    });
    let driver = driver(api);

    let err = driver.run_assessment(&request()).await.unwrap_err();
    assert!(matches!(
        err,
        DriverError::Remote(RemoteError::Status { status: 502, .. })
    ));
    assert_eq!(AssessError::from(err).exit_code(), 101);
    assert!(
        !driver
            .api()
            .calls()
            .iter()
            .any(|c| matches!(c, Call::Output(_)))
    );
}

#[tokio::test]
async fn status_without_build_status_is_protocol_error() {
    let api = ScriptedApi::new(&[], silver_report()).with_status_body(json!({"state": "RUNNING"}));
    let driver = driver(api);

    let err = driver.run_assessment(&request()).await.unwrap_err();
    assert!(matches!(
        err,
        DriverError::Protocol(ProtocolError::MissingField {
            context: "status",
            field: "build_status"
        })
    ));
}

#[tokio::test]
async fn null_build_status_keeps_polling() {
    let api = ScriptedApi::new(&[], silver_report())
        .with_status_body(json!({"build_status": null}))
        .with_status_body(json!({"build_status": "SUCCESS"}));
    let driver = driver(api);

    let outcome = driver.run_assessment(&request()).await.unwrap();

    assert_eq!(outcome.build_status, BuildStatus::Success);
    assert_eq!(driver.sleeper().slept(), vec![Duration::from_secs(5)]);
    assert!(matches!(driver.api().calls().last(), Some(Call::Output(_))));
}

#[tokio::test]
async fn poll_limit_stops_the_loop() {
    let api = ScriptedApi::new(&["RUNNING", "RUNNING", "RUNNING"], silver_report());
    let driver = PipelineDriver::new(
        api,
        RecordingSleeper::default(),
        PollPolicy {
            interval: Duration::from_secs(1),
            max_polls: Some(2),
        },
    );

    let err = driver.run_assessment(&request()).await.unwrap_err();

    match &err {
        DriverError::PollLimitExceeded { pipeline_id, polls } => {
            assert_eq!(pipeline_id.as_str(), "pipe-42");
            assert_eq!(*polls, 2);
        }
        other => panic!("expected poll limit, got {other:?}"),
    }
    assert_eq!(driver.sleeper().slept(), vec![Duration::from_secs(1)]);
    assert_eq!(AssessError::from(err).exit_code(), 4);
}

#[tokio::test]
async fn submission_carries_first_tool_step_override() {
    let step: ToolStepDefinition = serde_json::from_value(json!({
        "name": "cargo-test",
        "tool": "commands",
        "commands": ["cargo test --all"]
    }))
    .unwrap();
    let req = request().with_tool_steps(CriterionId::unit_testing(), vec![step]);
    let driver = driver(ScriptedApi::new(&["SUCCESS"], silver_report()));

    driver.run_assessment(&req).await.unwrap();

    let payloads = driver.api().payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0]["repo_code"]["branch"], "main");
    assert_eq!(payloads[0]["criteria_workflow"][0]["id"], "QC.Uni");
    assert_eq!(
        payloads[0]["criteria_workflow"][0]["tools"][0]["commands"][0],
        "cargo test --all"
    );
}

#[tokio::test]
async fn non_object_output_is_protocol_error() {
    let api = ScriptedApi::new(&["SUCCESS"], silver_report()).with_raw_output("[]");
    let err = driver(api).run_assessment(&request()).await.unwrap_err();
    assert!(matches!(
        err,
        DriverError::Protocol(ProtocolError::InvalidBody {
            context: "output",
            ..
        })
    ));
}

#[tokio::test]
async fn session_renders_silver_scenario() {
    let driver = driver(ScriptedApi::new(&["RUNNING", "SUCCESS"], silver_report()));

    let session = run_session(&driver, &request()).await.unwrap();

    assert_eq!(session.summary.badge.tier, Some(BadgeTier::Silver));
    assert_eq!(
        session.summary.badge.missing_criteria,
        vec![CriterionId::new("QC.Sec")]
    );
    assert_eq!(session.summary.assertions.len(), 1);
    assert!(session.summary.assertions[0].passed);
    assert_eq!(session.summary.assertions[0].text, "ok");
    assert!(session.markdown.contains("| :heavy_check_mark: | ok | QC.Uni.1 | QC.Uni |"));
    assert!(session.markdown.contains("badge_software_silver.png"));
}

#[tokio::test]
async fn session_with_malformed_report_emits_nothing() {
    let api = ScriptedApi::new(&["SUCCESS"], json!({"meta": {"report_json_url": "u"}}));
    let err = run_session(&driver(api), &request()).await.unwrap_err();
    assert!(matches!(err, AssessError::MalformedReport(_)));
    assert_eq!(err.exit_code(), 3);
}
