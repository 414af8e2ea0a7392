mod cli;
mod config;
mod credits;
mod error;
mod image;
mod pipeline;
mod provider;
mod service;
mod ui;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use config::RecolorConfig;
use credits::{CreditLedger, InMemoryLedger};
use pipeline::{InstructionPolicy, Outcome};
use provider::{FluxClient, GenerationRequest, MockOcrProvider};
use service::JobService;
use ui::JobProgress;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = RecolorConfig::load().context("failed to load recolor.toml")?;
    if let Some(max_attempts) = cli.max_attempts {
        config.max_attempts = max_attempts;
    }

    // Demo ledger: seeded with the free trial, gone when the process exits.
    let ledger = InMemoryLedger::with_free_trial(&cli.user, config.free_trial_credits);

    match cli.command {
        Command::Colorize {
            image,
            prompt,
            aspect_ratio,
            output_format,
        } => {
            if config.api_key.is_empty() {
                bail!("no API key configured; set BFL_API_KEY or api_key in recolor.toml");
            }
            let input_image = image::load_data_uri(&image)?;
            let req = GenerationRequest {
                prompt: prompt.unwrap_or_else(|| config.default_prompt.clone()),
                input_image,
                aspect_ratio: Some(aspect_ratio.unwrap_or_else(|| config.aspect_ratio.clone())),
                output_format: Some(output_format.unwrap_or_else(|| config.output_format.clone())),
                safety_tolerance: None,
            };
            let service = JobService::new(
                FluxClient::with_submit_url(config.api_key.clone(), config.submit_url.clone()),
                ledger,
                config.poll_config()?,
                InstructionPolicy::Required,
            );
            run_and_report(&service, &cli.user, &req, cli.verbose, "colorizing image").await
        }
        Command::Scan { image } => {
            let input_image = image::load_data_uri(&image)?;
            let req = GenerationRequest::new("", input_image);
            let service = JobService::new(
                MockOcrProvider::default(),
                ledger,
                config.poll_config()?,
                InstructionPolicy::Optional,
            );
            run_and_report(&service, &cli.user, &req, cli.verbose, "scanning document").await
        }
        Command::Credits => {
            println!("{}: {} credits", cli.user, ledger.balance(&cli.user));
            Ok(())
        }
    }
}

async fn run_and_report<P, L>(
    service: &JobService<P, L>,
    user: &str,
    req: &GenerationRequest,
    verbose: bool,
    description: &str,
) -> Result<()>
where
    P: provider::ImageProvider,
    L: CreditLedger,
{
    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_cancel.cancel();
        }
    });

    let progress = JobProgress::start(description);
    let record = service.run(user, req, &cancel).await;
    progress.complete(&record.outcome);
    if verbose && let Some(report) = &record.report {
        progress.print_report(report);
    }

    match record.outcome {
        Outcome::Success { .. } => Ok(()),
        Outcome::Failure { kind, message } => bail!("{kind:?}: {message}"),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "recolor=debug" } else { "recolor=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
