use std::process::ExitCode;

use sqaaas_assess::{AssessError, RunConfig, bootstrap_driver, run_session, step_summary, ui};

mod args;
use args::{CliArgs, USAGE};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    ui::init_logging();

    let args = match CliArgs::parse() {
        Ok(args) => args,
        Err(e) => {
            ui::error(e.to_string());
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    if args.help {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            ui::error(err.to_string());
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(args: &CliArgs) -> Result<(), AssessError> {
    let _ = dotenvy::dotenv();
    let config =
        RunConfig::from_lookup(|key| args.lookup(key).or_else(|| std::env::var(key).ok()))?;

    ui::header(
        config.request.repository_url(),
        config.request.branch(),
        &config.endpoint,
    );

    let driver = bootstrap_driver(&config)?;
    let session = run_session(&driver, &config.request).await?;

    ui::pipeline_finished(
        session.outcome.pipeline_id.as_str(),
        &session.outcome.build_status,
    );
    ui::summary_stats(&session.summary);

    if args.json_output {
        match serde_json::to_string_pretty(&session.summary) {
            Ok(json) => println!("{json}"),
            Err(e) => ui::warn(format!("Could not serialise summary: {e}")),
        }
    } else {
        println!("{}", session.markdown);
    }

    if args.no_summary_file {
        return Ok(());
    }
    if let Err(e) = step_summary::publish(config.step_summary_path.as_deref(), &session.markdown)
    {
        ui::warn(format!("Could not write step summary: {e}"));
    }

    Ok(())
}
