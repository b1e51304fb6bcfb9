// SPDX-FileCopyrightText: 2026 MultiGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `multigpt chat` command implementation.
//!
//! Launches an interactive REPL with colored prompt, streaming output,
//! and readline history. Conversations are kept in a process-local store.

use std::io::Write;
use std::sync::Arc;

use colored::Colorize;
use multigpt_agent::{ChatSession, TurnOutcome};
use multigpt_config::MultigptConfig;
use multigpt_core::{
    ConversationStore, ModelCatalog, ModelSelection, MultigptError, Role, Session,
};
use multigpt_openrouter::OpenRouterProvider;
use multigpt_router::QueryRouter;
use multigpt_storage::MemoryStore;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::commands;

/// A line typed at the prompt.
#[derive(Debug, PartialEq, Eq)]
enum ShellCommand<'a> {
    Quit,
    Help,
    Models,
    /// `/model` with no argument shows the current selection.
    Model(Option<&'a str>),
    New,
    Chats,
    Open(&'a str),
    Unknown(&'a str),
    Message(&'a str),
    Empty,
}

fn parse_command(line: &str) -> ShellCommand<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ShellCommand::Empty;
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return ShellCommand::Message(trimmed);
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
        None => (rest, None),
    };
    match (name, arg) {
        ("quit" | "exit", _) => ShellCommand::Quit,
        ("help", _) => ShellCommand::Help,
        ("models", _) => ShellCommand::Models,
        ("model", arg) => ShellCommand::Model(arg),
        ("new", _) => ShellCommand::New,
        ("chats", _) => ShellCommand::Chats,
        ("open", Some(arg)) => ShellCommand::Open(arg),
        _ => ShellCommand::Unknown(trimmed),
    }
}

/// Runs the `multigpt chat` interactive REPL.
pub async fn run_shell(
    config: MultigptConfig,
    model: Option<String>,
) -> Result<(), MultigptError> {
    let provider = Arc::new(OpenRouterProvider::new(&config)?);
    if !provider.has_credential() {
        eprintln!(
            "{}",
            "warning: no OpenRouter API key configured. Set openrouter.api_key or OPENROUTER_API_KEY."
                .yellow()
        );
    }

    let store = Arc::new(MemoryStore::new());
    let router = Arc::new(QueryRouter::from_config(&config.routing, provider.clone()));
    let mut session = ChatSession::new(provider, router, store.clone(), &config.chat);
    if let Some(model) = model {
        session.set_selection(ModelSelection::parse(&model));
    }

    let user = Session::Anonymous;

    let mut rl = DefaultEditor::new()
        .map_err(|e| MultigptError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "multigpt chat".bold().green());
    println!(
        "Signed in as {} (local-only mode). Model: {}",
        user.display_name(),
        session.selection().as_str().cyan()
    );
    println!("Type {} for commands, {} to exit.\n", "/help".yellow(), "/quit".yellow());

    let prompt = format!("{}> ", "multigpt".green());
    loop {
        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        };

        let command = parse_command(&line);
        if command != ShellCommand::Empty {
            let _ = rl.add_history_entry(line.as_str());
        }

        let handled = match command {
            ShellCommand::Empty => Ok(()),
            ShellCommand::Quit => break,
            ShellCommand::Help => {
                print_help();
                Ok(())
            }
            ShellCommand::Models => {
                commands::print_models();
                Ok(())
            }
            ShellCommand::Model(None) => {
                println!("model: {}", session.selection().as_str().cyan());
                Ok(())
            }
            ShellCommand::Model(Some(id)) => {
                select_model(&mut session, id);
                Ok(())
            }
            ShellCommand::New => {
                session.new_chat();
                println!("{}", "started a new chat".dimmed());
                Ok(())
            }
            ShellCommand::Chats => list_chats(store.as_ref()).await,
            ShellCommand::Open(target) => open_chat(&mut session, store.as_ref(), target).await,
            ShellCommand::Unknown(input) => {
                eprintln!("{} {input} (try /help)", "unknown command:".yellow());
                Ok(())
            }
            ShellCommand::Message(text) => send_message(&mut session, text).await,
        };

        if let Err(e) = handled {
            eprintln!("{}: {e}", "error".red());
        }
    }

    println!("{}", "goodbye".dimmed());
    Ok(())
}

fn print_help() {
    println!("  {}          list models", "/models".yellow());
    println!("  {}  show or change the model", "/model [id|auto]".yellow());
    println!("  {}             start a new chat", "/new".yellow());
    println!("  {}           list chats", "/chats".yellow());
    println!("  {}      open a chat by number or id", "/open <n|id>".yellow());
    println!("  {}            exit", "/quit".yellow());
}

fn select_model(session: &mut ChatSession, id: &str) {
    let selection = ModelSelection::parse(id);
    if let ModelSelection::Fixed(model) = &selection
        && !ModelCatalog::builtin().contains(model)
    {
        eprintln!(
            "{}",
            format!("warning: {model} is not in the catalog; sending anyway").yellow()
        );
    }
    println!("model: {}", selection.as_str().cyan());
    session.set_selection(selection);
}

async fn send_message(session: &mut ChatSession, text: &str) -> Result<(), MultigptError> {
    let mut stdout = std::io::stdout();
    let mut print_chunk = |chunk: &str| {
        print!("{chunk}");
        stdout.flush().ok();
    };

    let outcome = session.send(text, Some(&mut print_chunk)).await?;
    if let Some(outcome) = outcome {
        print_outcome(&outcome);
    }
    Ok(())
}

fn print_outcome(outcome: &TurnOutcome) {
    if outcome.failed {
        println!("{}", outcome.reply.red());
        println!("{}", "Try a different model with /model.".dimmed());
        return;
    }

    println!();
    let name = ModelCatalog::builtin().display_name(&outcome.model);
    match &outcome.routing {
        Some(decision) => println!(
            "{}",
            format!("(auto: {name} - {})", decision.reason).dimmed()
        ),
        None => println!("{}", format!("({name})").dimmed()),
    }
}

async fn list_chats(store: &dyn ConversationStore) -> Result<(), MultigptError> {
    let chats = store.list_chats().await?;
    if chats.is_empty() {
        println!("{}", "no chats yet".dimmed());
    }
    for (index, chat) in chats.iter().enumerate() {
        println!(
            "{:>3}. {}  {}",
            index + 1,
            chat.title,
            chat.updated_at.format("%Y-%m-%d %H:%M").to_string().dimmed()
        );
    }
    Ok(())
}

async fn open_chat(
    session: &mut ChatSession,
    store: &dyn ConversationStore,
    target: &str,
) -> Result<(), MultigptError> {
    let chat_id = match target.parse::<usize>() {
        Ok(n) if n > 0 => {
            let chats = store.list_chats().await?;
            match chats.get(n - 1) {
                Some(chat) => chat.id.clone(),
                None => {
                    return Err(MultigptError::Storage {
                        message: format!("no chat numbered {n}"),
                    });
                }
            }
        }
        _ => target.to_string(),
    };

    session.open_chat(&chat_id).await?;
    debug!(chat_id = %chat_id, "chat opened from shell");

    for turn in session.transcript() {
        let speaker = match turn.role {
            Role::User => "You".bold(),
            _ => ModelCatalog::builtin().display_name(&turn.model).cyan().bold(),
        };
        println!("{speaker}: {}", turn.content);
    }
    Ok(())
}
