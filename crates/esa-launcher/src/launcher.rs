use std::io::{BufRead, Write};

use tracing::info;

use crate::config::{ConfigStore, LauncherConfig};
use crate::error::LauncherError;
use crate::prompt::{Action, Prompter};

/// How the interactive flow ended.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    Start(LauncherConfig),
    Exit,
}

/// Returns `config` unchanged when both credentials are present. Otherwise
/// prompts for all three settings, saves them and returns the new config.
pub fn ensure_config<R: BufRead, W: Write>(
    config: LauncherConfig,
    prompter: &mut Prompter<R, W>,
    store: &ConfigStore,
) -> Result<LauncherConfig, LauncherError> {
    if config.is_complete() {
        return Ok(config);
    }

    let api_key = prompter.ask(
        "Enter your esa.io API key:",
        config.api_key.as_deref().unwrap_or_default(),
    )?;
    let team_name = prompter.ask(
        "Enter your esa.io team name:",
        config.team_name.as_deref().unwrap_or_default(),
    )?;
    let port = prompter.ask_port("Enter the server port:", config.port_or_default())?;

    let config = LauncherConfig {
        api_key: Some(api_key),
        team_name: Some(team_name),
        port: Some(port),
    };
    store.save(&config)?;
    info!(path = %store.path().display(), "configuration saved");
    prompter.say("Configuration saved.")?;
    Ok(config)
}

/// Top-level interactive loop. Choosing `config` discards the current
/// settings and prompts again from scratch.
pub fn run<R: BufRead, W: Write>(
    config: LauncherConfig,
    prompter: &mut Prompter<R, W>,
    store: &ConfigStore,
) -> Result<Outcome, LauncherError> {
    let mut config = ensure_config(config, prompter, store)?;
    loop {
        match prompter.select_action()? {
            Action::Start => return Ok(Outcome::Start(config)),
            Action::Config => {
                config = ensure_config(LauncherConfig::default(), prompter, store)?;
            }
            Action::Exit => {
                prompter.say("Exiting.")?;
                return Ok(Outcome::Exit);
            }
        }
    }
}
