use anyhow::Result;
use clap::{Parser, Subcommand};

mod app;
mod commands;
mod input;
mod render;

#[derive(Parser)]
#[command(name = "codepane")]
#[command(about = "Codepane - chat with a local model and watch the project take shape")]
#[command(version)]
struct Cli {
    /// Ollama base URL (overrides config and CODEPANE_OLLAMA_URL)
    #[arg(long)]
    url: Option<String>,

    /// Model to chat with
    #[arg(short, long)]
    model: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive chat (the default)
    Chat,
    /// Send a single prompt, then print the resulting explorer tree
    Ask { prompt: String },
    /// List installed Ollama models
    Models,
    /// Print the starter project's explorer tree
    Tree,
    /// Suggest a command to run the starter project
    Run,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = codepane_core::Settings::load();
    if let Some(ref model) = cli.model {
        settings.ollama.model = model.clone();
    }
    let client = app::build_client(&settings, cli.url.as_deref())?;

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => app::run_repl(&settings, &client).await?,
        Command::Ask { prompt } => app::run_single_prompt(&settings, &client, &prompt).await?,
        Command::Models => app::list_models(&client).await?,
        Command::Tree => app::print_tree(&settings),
        Command::Run => app::print_run(&settings),
    }

    Ok(())
}
