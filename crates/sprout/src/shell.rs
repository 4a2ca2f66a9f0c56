// SPDX-FileCopyrightText: 2026 Sprout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sprout shell` command implementation.
//!
//! An interactive REPL over the three areas of the app: plant lookup
//! (`/identify`), the garden (`/add`, `/garden`, `/show`, `/remove`), and
//! the gardening chat (any other text).

use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use sprout_agent::{ChatSession, IdentificationWorkflow, IdentifyState, RejectReason, SendOutcome};
use sprout_config::SproutConfig;
use sprout_core::{ProviderAdapter, SproutError};
use sprout_garden::GardenCollection;
use tracing::{debug, warn};

use crate::render;

const HELP: &str = "\
/identify <path>         identify the plant in an image
/add                     add the last identified plant to your garden
/garden                  list your garden
/show <n>                show care details for plant n
/remove <scientific name> remove a plant from your garden
/help                    show this help
/quit                    exit
anything else            ask the gardening assistant";

/// One parsed line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Identify(PathBuf),
    Add,
    Garden,
    Show(usize),
    Remove(String),
    Help,
    Quit,
    Chat(String),
    Empty,
    Invalid(String),
}

/// Parses a line of input. Lines not starting with `/` go to the chat.
pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }
    if !trimmed.starts_with('/') {
        return Command::Chat(line.to_string());
    }

    let (name, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (trimmed, ""),
    };

    match (name, arg) {
        ("/identify", "") => Command::Invalid("usage: /identify <path>".into()),
        ("/identify", path) => Command::Identify(PathBuf::from(path)),
        ("/add", _) => Command::Add,
        ("/garden", _) => Command::Garden,
        ("/show", n) => match n.parse::<usize>() {
            Ok(n) if n > 0 => Command::Show(n),
            _ => Command::Invalid("usage: /show <n> (n starts at 1)".into()),
        },
        ("/remove", "") => Command::Invalid("usage: /remove <scientific name>".into()),
        ("/remove", name) => Command::Remove(name.to_string()),
        ("/help", _) => Command::Help,
        ("/quit" | "/exit", _) => Command::Quit,
        (other, _) => Command::Invalid(format!("unknown command {other}; try /help")),
    }
}

/// Shell state: one workflow, one garden, one chat.
pub struct Shell {
    workflow: IdentificationWorkflow,
    garden: GardenCollection,
    chat: ChatSession,
}

impl Shell {
    pub async fn new(
        provider: Arc<dyn ProviderAdapter>,
        config: &SproutConfig,
    ) -> Result<Self, SproutError> {
        let chat = ChatSession::start(
            provider.clone(),
            &config.chat.system_instruction,
            &config.chat.greeting,
        )
        .await?;
        Ok(Self {
            workflow: IdentificationWorkflow::new(provider),
            garden: GardenCollection::new(),
            chat,
        })
    }

    /// Ends the chat's remote session.
    pub async fn close(&self) {
        if let Err(e) = self.chat.close().await {
            warn!(error = %e, "failed to close chat session");
        }
    }

    pub fn garden(&self) -> &GardenCollection {
        &self.garden
    }

    /// Opening lines: the chat greeting.
    pub async fn greeting(&self) -> String {
        self.chat
            .transcript()
            .await
            .iter()
            .map(render::chat_turn)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Executes one command and returns the text to print, or `None` to exit.
    pub async fn handle(&mut self, command: Command) -> Option<String> {
        debug!(?command, "shell command");
        let output = match command {
            Command::Quit => return None,
            Command::Empty => String::new(),
            Command::Help => HELP.to_string(),
            Command::Invalid(message) => message.yellow().to_string(),
            Command::Identify(path) => self.identify(path).await,
            Command::Add => self.add().await,
            Command::Garden => render::garden_list(&self.garden),
            Command::Show(n) => match n.checked_sub(1).and_then(|i| self.garden.list().get(i)) {
                Some(plant) => render::plant_card(plant),
                None => format!("No plant #{n}; your garden has {}.", self.garden.len())
                    .yellow()
                    .to_string(),
            },
            Command::Remove(name) => {
                if self.garden.remove(&name) {
                    format!("Removed {name}. {}", render::garden_header(&self.garden))
                } else {
                    format!("No plant named {name} in your garden.").yellow().to_string()
                }
            }
            Command::Chat(text) => self.chat(&text).await,
        };
        Some(output)
    }

    async fn identify(&self, path: PathBuf) -> String {
        match self.workflow.identify_file(&path).await {
            Ok(Some(IdentifyState::Success(record))) => format!(
                "{}\n{}",
                render::plant_card(&record),
                "Use /add to keep it in your garden.".dimmed()
            ),
            Ok(Some(state)) => state.message().unwrap_or_default().yellow().to_string(),
            Ok(None) => String::new(),
            Err(e) => format!("{}: {e}", "error".red()),
        }
    }

    async fn add(&mut self) -> String {
        let Some(record) = self.workflow.state().await.record().cloned() else {
            return "Identify a plant first with /identify <path>.".yellow().to_string();
        };
        let name = record.common_name.clone();
        match self.garden.add(record) {
            Ok(()) => format!("Added {name}. {}", render::garden_header(&self.garden)),
            Err(duplicate) => duplicate.to_string().yellow().to_string(),
        }
    }

    async fn chat(&self, text: &str) -> String {
        match self.chat.send(text).await {
            SendOutcome::Replied(_) | SendOutcome::Failed => self
                .chat
                .transcript()
                .await
                .last()
                .map(render::chat_turn)
                .unwrap_or_default(),
            SendOutcome::Rejected(RejectReason::Pending) => {
                "Still waiting for the last reply.".yellow().to_string()
            }
            SendOutcome::Rejected(RejectReason::Empty) => String::new(),
        }
    }
}

/// Runs the `sprout shell` interactive REPL.
pub async fn run_shell(
    config: &SproutConfig,
    provider: Arc<dyn ProviderAdapter>,
) -> Result<(), SproutError> {
    let mut shell = Shell::new(provider, config).await?;

    let mut rl = DefaultEditor::new()
        .map_err(|e| SproutError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "sprout".bold().green());
    println!("Type {} for commands, {} to exit.\n", "/help".yellow(), "/quit".yellow());
    println!("{}\n", shell.greeting().await);

    let prompt = format!("{}> ", "sprout".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let command = parse_command(&line);
                if command != Command::Empty {
                    let _ = rl.add_history_entry(&line);
                }
                match shell.handle(command).await {
                    Some(output) if output.is_empty() => {}
                    Some(output) => println!("{output}"),
                    None => break,
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    shell.close().await;
    Ok(())
}
