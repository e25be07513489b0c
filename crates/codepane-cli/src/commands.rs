/// Result of processing a slash command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// Display a message to the user.
    Message(String),
    /// Clear the chat.
    Clear,
    /// Quit the application.
    Quit,
    /// Change the model.
    ModelChanged(String),
    /// List installed models.
    ListModels,
    /// Print the explorer tree.
    ShowTree,
    /// Print the active file.
    ShowFile,
    /// Select a file by name.
    OpenFile(String),
    /// Create a file: name, optional default type.
    NewFile(String, Option<String>),
    /// Filter the explorer by a name substring. Empty clears it.
    Filter(String),
    /// Expand or collapse a folder.
    ToggleFolder(String),
    /// Guess a run command for the project.
    Run,
    /// Print the composed preview document.
    Preview,
    /// Show status (model, files, messages).
    ShowStatus,
    /// Not a command - treat as a chat prompt.
    NotACommand,
}

pub fn handle_command(input: &str) -> CommandResult {
    let parts: Vec<&str> = input.splitn(2, ' ').collect();
    let cmd = parts[0];
    let arg = parts.get(1).map(|s| s.trim()).unwrap_or("");

    match cmd {
        "/help" | "/h" => show_help(),
        "/exit" | "/quit" | "/q" => CommandResult::Quit,
        "/clear" => CommandResult::Clear,

        // Model commands
        "/model" => {
            if arg.is_empty() {
                CommandResult::Message("Usage: /model <model-name>".into())
            } else {
                CommandResult::ModelChanged(arg.to_string())
            }
        }
        "/models" => CommandResult::ListModels,

        // Project commands
        "/tree" | "/files" => CommandResult::ShowTree,
        "/cat" | "/show" => CommandResult::ShowFile,
        "/open" => {
            if arg.is_empty() {
                CommandResult::Message("Usage: /open <file-name>".into())
            } else {
                CommandResult::OpenFile(arg.to_string())
            }
        }
        "/new" => {
            let mut words = arg.split_whitespace();
            match (words.next(), words.next()) {
                (Some(name), file_type) => {
                    CommandResult::NewFile(name.to_string(), file_type.map(str::to_string))
                }
                (None, _) => CommandResult::Message(
                    "Usage: /new <file-name> [type]\nExample: /new utils js".into(),
                ),
            }
        }
        "/filter" => CommandResult::Filter(arg.to_string()),
        "/toggle" => {
            if arg.is_empty() {
                CommandResult::Message("Usage: /toggle <folder-name>".into())
            } else {
                CommandResult::ToggleFolder(arg.to_string())
            }
        }
        "/run" => CommandResult::Run,
        "/preview" => CommandResult::Preview,
        "/status" => CommandResult::ShowStatus,
        "/version" => {
            CommandResult::Message(format!("Codepane CLI v{}", env!("CARGO_PKG_VERSION")))
        }

        // Unknown command
        _ => {
            if input.starts_with('/') {
                CommandResult::Message(format!("Unknown command: {cmd}. Type /help for commands."))
            } else {
                CommandResult::NotACommand
            }
        }
    }
}

fn show_help() -> CommandResult {
    let help_text = "\
╭─ Codepane CLI Commands ────────────────────────────────────────╮

  CHAT
    <text>                    Send a prompt (Ctrl-C stops the reply)
    /clear                    Clear chat history

  MODEL
    /model <name>             Change model
    /models                   List installed Ollama models

  PROJECT
    /tree, /files             Show the explorer tree
    /cat, /show               Print the active file
    /open <name>              Select a file
    /new <name> [type]        Create an empty file
    /filter [query]           Filter the explorer (empty clears)
    /toggle <folder>          Expand or collapse a folder
    /run                      Suggest a command to run the project
    /preview                  Print the composed preview document
    /status                   Show model, files and messages

  OTHER
    /help, /h                 Show this help message
    /version                  Show version information
    /exit, /quit, /q          Quit the application

╰────────────────────────────────────────────────────────────────╯";

    CommandResult::Message(help_text.into())
}
