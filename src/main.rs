mod aggregate;
mod api;
mod cli;
mod config;
mod error;
mod ui;
mod waiter;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::api::{JobId, SentioClient, StatusSource, SubmitRequest};
use crate::cli::{Cli, Command};
use crate::config::SentioConfig;
use crate::error::SentioError;
use crate::ui::JobProgress;
use crate::waiter::{JobOutcome, JobWaiter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = SentioConfig::load().map_err(|e| SentioError::Config(e.to_string()))?;
    if let Some(secs) = cli.timeout {
        config.timeout_secs = secs;
    }
    if let Some(granularity) = cli.granularity {
        config.granularity = granularity.as_wire().to_string();
    }

    match cli.command {
        Command::Analyze { text, file } => analyze(&config, text, file).await?,
        Command::Status { job_id } => status(&config, &job_id).await?,
        Command::Demo => demo()?,
    }

    Ok(())
}

/// Submit text, wait for the job and render the reduced emotion scores.
async fn analyze(
    config: &SentioConfig,
    text: Option<String>,
    file: Option<String>,
) -> Result<(), SentioError> {
    let text = match (text, file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => return Err(SentioError::NoInput),
    };
    // Blank input is rejected before any network traffic.
    if text.trim().is_empty() {
        return Err(SentioError::NoInput);
    }

    let client = build_client(config)?;
    let request = SubmitRequest {
        text: vec![text.clone()],
        granularity: config.granularity.clone(),
    };
    let job_id = client.submit(&request).await?;
    tracing::info!(job_id = %job_id, "job submitted");

    let progress = JobProgress::start(&text);
    let waiter = JobWaiter::with_config(&client, config.poll_config());

    // Ctrl-C tears the session down through the waiter's cancellation token.
    let cancel = waiter.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let outcome = waiter.run(&job_id, &progress).await;
    progress.complete(&outcome);

    match outcome {
        JobOutcome::Completed(payload) => {
            let reduction = aggregate::reduce(&text, &payload)?;
            ui::print_reduction(&reduction);
            Ok(())
        }
        JobOutcome::Failed(_) | JobOutcome::TimedOut(_) => std::process::exit(1),
    }
}

/// One-shot status query for an existing job.
async fn status(config: &SentioConfig, job_id: &str) -> Result<(), SentioError> {
    let client = build_client(config)?;
    let state = client.job_state(&JobId::from(job_id)).await?;
    ui::print_job_state(job_id, &state);
    Ok(())
}

/// Run the aggregator over an embedded sample payload; needs no API key.
fn demo() -> Result<(), SentioError> {
    let payload: serde_json::Value = serde_json::from_str(DEMO_PAYLOAD)?;
    let reduction = aggregate::reduce("demo", &payload)?;
    ui::print_reduction(&reduction);
    Ok(())
}

fn build_client(config: &SentioConfig) -> Result<SentioClient, SentioError> {
    if config.api_key.is_empty() {
        return Err(SentioError::Config(
            "no API key configured; set SENTIO_API_KEY or api_key in sentio.toml".into(),
        ));
    }
    Ok(SentioClient::with_base_url(
        config.api_key.clone(),
        config.base_url.clone(),
    ))
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "sentio=debug" } else { "sentio=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // Logs go to stderr; the spinner owns stdout.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Two sentences' worth of predictions, in the service's wire shape.
const DEMO_PAYLOAD: &str = r#"[{
    "predictions": [{
        "grouped_predictions": [{
            "predictions": [
                {
                    "text": "What a bright morning this is.",
                    "emotions": [
                        {"name": "joy", "score": 0.71},
                        {"name": "calmness", "score": 0.48},
                        {"name": "surprise", "score": 0.12}
                    ]
                },
                {
                    "text": "I only wish it could last.",
                    "emotions": [
                        {"name": "joy", "score": 0.22},
                        {"name": "sadness", "score": 0.54},
                        {"name": "calmness", "score": 0.31}
                    ]
                }
            ]
        }]
    }]
}]"#;
