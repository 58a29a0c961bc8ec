mod config;
mod error;
mod launcher;
mod process;
mod prompt;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use config::ConfigStore;
use launcher::Outcome;
use process::{RunOutcome, ServerProcess};
use prompt::Prompter;

#[tokio::main]
async fn main() -> ExitCode {
    // Warnings only by default: stdout and stderr share the terminal with
    // the prompts.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("An error occurred: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let store = ConfigStore::default_location();
    let config = store.load();

    let outcome = tokio::task::spawn_blocking(move || {
        let mut prompter = Prompter::new(std::io::stdin().lock(), std::io::stdout());
        launcher::run(config, &mut prompter, &store)
    })
    .await??;

    let config = match outcome {
        Outcome::Exit => return Ok(()),
        Outcome::Start(config) => config,
    };

    let server = ServerProcess::locate();
    let port = config.port_or_default();
    let child = server.spawn(&config.env_vars())?;
    println!("Server started: http://localhost:{port}");

    match child.wait().await? {
        RunOutcome::Interrupted => {
            println!("\nServer stopped.");
            Ok(())
        }
        RunOutcome::Exited(status) if status.success() => Ok(()),
        RunOutcome::Exited(status) => {
            anyhow::bail!("{} exited with {status}", server.program().display())
        }
    }
}
