use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use yggdrasil_keyminer::report::summary_line;
use yggdrasil_keyminer::{CliArgs, ConsoleReporter, Coordinator, Settings};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse();
    setup_logging(args.verbose);

    let settings = Settings::from_args(args).context("Invalid configuration")?;
    println!("Threads: {}", settings.worker_count);

    let mut coordinator = Coordinator::new(settings.clone());

    let stop = coordinator.stop_handle();
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupt received, shutting down...");
        stop.request_stop();
    })
    .context("Failed to set signal handler")?;

    let mut reporter = ConsoleReporter::stdout(settings.verbose);
    let outcome = coordinator.run(&mut reporter).context("Search failed")?;

    info!("{}", summary_line(&outcome));
    if outcome.best.is_none() {
        info!("No key was published before the search stopped");
    }

    Ok(())
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("yggdrasil_keyminer=debug,warn")
    } else {
        EnvFilter::new("yggdrasil_keyminer=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
