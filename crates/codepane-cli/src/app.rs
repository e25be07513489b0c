use anyhow::{anyhow, Result};
use codepane_core::llm::{format_model_name, LocalDiscovery};
use codepane_core::{NotificationLevel, OllamaClient, Session, SessionEvent, Settings};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

use crate::commands::{handle_command, CommandResult};
use crate::input::{ctrl_c, next_input, ReplInput};
use crate::render::{render_change, render_notification, render_rows};

/// Build the Ollama client, with `url` taking precedence over settings
/// and the environment.
pub fn build_client(settings: &Settings, url: Option<&str>) -> Result<OllamaClient> {
    let client = OllamaClient::from_settings(settings)?;
    let client = match url {
        Some(url) => client.with_base_url(url),
        None => client,
    };
    debug!(url = %client.base_url(), model = %settings.ollama.model, "using Ollama");
    Ok(client)
}

// ── One-shot commands ───────────────────────────────────────────────────

pub async fn list_models(client: &OllamaClient) -> Result<()> {
    if !LocalDiscovery::ollama_available(client.base_url()).await {
        return Err(anyhow!(
            "Ollama is not reachable at {}. Is `ollama serve` running?",
            client.base_url()
        ));
    }
    let models = client.list_local_models().await?;
    if models.is_empty() {
        println!("No models installed. Try `ollama pull llama3`.");
    }
    for model in &models {
        println!("{}", format_model_name(model));
    }
    Ok(())
}

pub fn print_tree(settings: &Settings) {
    let session = Session::new(settings);
    print!("{}", render_rows(&session.explorer_rows(), None));
}

pub fn print_run(settings: &Settings) {
    let mut session = Session::new(settings);
    session.run_project();
    print_notifications(&mut session);
}

/// Send one prompt against the starter project and report what changed.
pub async fn run_single_prompt(
    settings: &Settings,
    client: &OllamaClient,
    prompt: &str,
) -> Result<()> {
    let mut session = Session::new(settings);
    if !run_turn(&mut session, client, prompt).await {
        return Err(anyhow!("the reply did not complete"));
    }
    println!();
    let active = session.active_file().map(|f| f.id.clone());
    print!("{}", render_rows(&session.explorer_rows(), active.as_deref()));
    Ok(())
}

// ── Interactive loop ────────────────────────────────────────────────────

pub async fn run_repl(settings: &Settings, client: &OllamaClient) -> Result<()> {
    let mut session = Session::new(settings);
    println!(
        "Codepane · model {} · {} · /help for commands",
        session.selected_model(),
        client.base_url()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let line = match next_input(&mut lines, ctrl_c()).await? {
            ReplInput::Line(line) => line,
            ReplInput::Interrupted => {
                println!();
                break;
            }
            ReplInput::Eof => break,
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match handle_command(input) {
            CommandResult::NotACommand => {
                run_turn(&mut session, client, input).await;
            }
            CommandResult::Quit => break,
            result => apply_command(&mut session, client, result).await,
        }
    }

    session.cancel_turn();
    Ok(())
}

async fn apply_command(session: &mut Session, client: &OllamaClient, result: CommandResult) {
    match result {
        CommandResult::Message(msg) => println!("{msg}"),
        CommandResult::Clear => {
            session.clear_chat();
            println!("Chat cleared.");
        }
        CommandResult::ModelChanged(model) => {
            session.set_model(&model);
            println!("Model set to {model}.");
        }
        CommandResult::ListModels => {
            if let Ok(models) = session.refresh_models(client).await {
                for model in models {
                    let mark = if model == session.selected_model() { "*" } else { " " };
                    println!("{mark} {model}");
                }
            }
        }
        CommandResult::ShowTree => {
            let active = session.active_file().map(|f| f.id.clone());
            print!("{}", render_rows(&session.explorer_rows(), active.as_deref()));
        }
        CommandResult::ShowFile => match session.active_file() {
            Some(file) => println!(
                "── {} ({})\n{}",
                file.name,
                file.editor_language(),
                file.content
            ),
            None => println!("No file selected."),
        },
        CommandResult::OpenFile(name) => {
            let id = session.files().find_by_name(&name).map(|f| f.id.clone());
            match id {
                Some(id) => {
                    session.select_file(&id);
                    println!("Opened {name}.");
                }
                None => println!("No file named {name}."),
            }
        }
        CommandResult::NewFile(name, file_type) => {
            let _ = session.create_file(&name, file_type.as_deref());
        }
        CommandResult::Filter(query) => {
            session.explorer_mut().set_query(query);
            let active = session.active_file().map(|f| f.id.clone());
            print!("{}", render_rows(&session.explorer_rows(), active.as_deref()));
        }
        CommandResult::ToggleFolder(folder) => {
            let open = session.explorer_mut().toggle(&folder);
            println!("{folder} {}", if open { "expanded" } else { "collapsed" });
        }
        CommandResult::Run => {
            session.run_project();
        }
        CommandResult::Preview => match session.preview() {
            Some(doc) => println!("── preview of {}\n{}", doc.entry, doc.html),
            None => println!("No HTML file to preview."),
        },
        CommandResult::ShowStatus => {
            println!("Model:    {}", session.selected_model());
            println!("Server:   {}", client.base_url());
            println!("Files:    {}", session.files().len());
            println!("Messages: {}", session.messages().len());
            if let Some(file) = session.active_file() {
                println!("Active:   {}", file.name);
            }
        }
        CommandResult::NotACommand | CommandResult::Quit => {}
    }
    print_notifications(session);
}

/// Stream one turn to stdout. Ctrl-C stops the reply. Returns whether the
/// turn completed.
async fn run_turn(session: &mut Session, client: &OllamaClient, prompt: &str) -> bool {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<SessionEvent>();

    let printer = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match event {
                SessionEvent::TextDelta(text) => {
                    print!("{text}");
                    let _ = std::io::stdout().flush();
                }
                SessionEvent::FilesChanged(changes) => {
                    println!();
                    for change in &changes {
                        eprintln!("[{}]", render_change(change));
                    }
                }
                SessionEvent::BlockReady(_) => {}
                // Failures arrive as notifications after the turn.
                SessionEvent::Complete | SessionEvent::Cancelled | SessionEvent::Error(_) => {
                    println!()
                }
            }
        }
    });

    let handle = session.cancel_handle();
    let interrupt = tokio::spawn(async move {
        ctrl_c().await;
        handle.cancel();
    });

    // Failures are reported through events and notifications.
    let completed = session
        .send_message_with_events(client, prompt, event_tx)
        .await
        .is_ok();
    interrupt.abort();
    let _ = printer.await;

    // File changes were already listed from the event stream.
    for note in session.drain_notifications() {
        if note.level != NotificationLevel::Success {
            eprintln!("{}", render_notification(&note));
        }
    }
    completed
}

fn print_notifications(session: &mut Session) {
    for note in session.drain_notifications() {
        eprintln!("{}", render_notification(&note));
    }
}
