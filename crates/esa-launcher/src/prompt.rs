//! Line-based interactive prompts.
//!
//! Generic over the reader and writer so the launcher flow can be driven
//! from a script in tests and from the terminal in `main`.
use std::io::{BufRead, Write};

use crate::error::LauncherError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Config,
    Exit,
}

impl Action {
    const MENU: [(Action, &'static str, &'static str); 3] = [
        (Action::Start, "start", "Start the server"),
        (Action::Config, "config", "Change the configuration"),
        (Action::Exit, "exit", "Exit"),
    ];

    /// Accepts the menu number or the action name, ignoring case.
    pub fn parse(answer: &str) -> Option<Self> {
        let answer = answer.trim();
        Self::MENU
            .iter()
            .enumerate()
            .find(|(i, (_, name, _))| {
                answer == (i + 1).to_string() || answer.eq_ignore_ascii_case(name)
            })
            .map(|(_, (action, _, _))| *action)
    }
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, message: &str) -> Result<(), LauncherError> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    /// Asks for a line of text; an empty answer selects `default`.
    pub fn ask(&mut self, message: &str, default: &str) -> Result<String, LauncherError> {
        if default.is_empty() {
            write!(self.output, "? {message} ")?;
        } else {
            write!(self.output, "? {message} ({default}) ")?;
        }
        self.output.flush()?;

        let answer = self.read_answer()?;
        if answer.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer)
        }
    }

    pub fn ask_port(&mut self, message: &str, default: u16) -> Result<u16, LauncherError> {
        loop {
            let answer = self.ask(message, &default.to_string())?;
            match answer.parse::<u16>() {
                Ok(port) => return Ok(port),
                Err(_) => self.say(&format!("  {answer:?} is not a valid port number"))?,
            }
        }
    }

    pub fn select_action(&mut self) -> Result<Action, LauncherError> {
        loop {
            writeln!(self.output, "? What would you like to do?")?;
            for (i, (_, name, label)) in Action::MENU.iter().enumerate() {
                writeln!(self.output, "  {}) {label} [{name}]", i + 1)?;
            }
            write!(self.output, "> ")?;
            self.output.flush()?;

            let answer = self.read_answer()?;
            if let Some(action) = Action::parse(&answer) {
                return Ok(action);
            }
            self.say(&format!("  unknown choice {answer:?}"))?;
        }
    }

    fn read_answer(&mut self) -> Result<String, LauncherError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(LauncherError::InputClosed);
        }
        Ok(line.trim().to_string())
    }
}
