use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use std::path::Path;
use tracing::{info, warn};

mod cli;
mod clipboard;
mod config;
mod errors;
mod log;
mod orchestrator;
mod service;
mod session;
mod state;
mod template;
mod ux;
mod wire;

fn setup_logging(debug: bool) {
    let default = if debug { "promptgen=debug" } else { "promptgen=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    setup_logging(args.debug);

    let mut cfg = config::Config::load(args.config.as_deref())?;
    cfg.apply_env(|k| std::env::var(k).ok())?;
    cfg.apply_args(&args);
    cfg.validate().context("invalid configuration")?;
    info!(
        categories = %cfg.endpoints.categories_url,
        generate = %cfg.endpoints.generate_url,
        "configured endpoints"
    );

    let service = service::make_service(&cfg)?;
    let clip = clipboard::SystemClipboard::detect();
    if !clip.is_available() {
        info!("no clipboard tool found; copy will report failure");
    }

    let mut orch = orchestrator::Orchestrator::new(service, std::sync::Arc::new(clip));
    if args.save_transcript {
        let transcript = log::Transcript::new(Path::new(&cfg.transcript_dir));
        if args.debug {
            eprintln!("debug: session {} transcripts go to {}", transcript.session(), transcript.dir().display());
        }
        orch = orch.with_transcript(transcript);
    }

    let spinner = if args.no_progress { None } else { Some(ux::spawn_spinner(orch.subscribe())) };

    let result = if args.is_scripted() {
        let script = session::Script {
            category: args.category.clone().unwrap_or_default(),
            prompt: args.prompt.clone().unwrap_or_default(),
            vars: args.vars.clone(),
            copy: args.copy,
            email: args.email.clone(),
        };
        session::run_scripted(&mut orch, &script).await.map(|out| {
            println!("{}", out.response);
            for n in out.notices {
                eprintln!("{}", n.green());
            }
        })
    } else {
        session::run_interactive(&mut orch).await
    };

    // Dropping the orchestrator closes the state channel and ends the spinner.
    drop(orch);
    if let Some(handle) = spinner {
        if let Err(e) = handle.await {
            warn!(error = %e, "progress spinner task failed");
        }
    }
    result
}
