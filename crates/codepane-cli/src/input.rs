use std::future::Future;
use tokio::io::{AsyncBufRead, Lines};

/// What the REPL got while waiting at the prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplInput {
    Line(String),
    /// Stdin closed.
    Eof,
    /// Ctrl-C at the idle prompt.
    Interrupted,
}

/// Wait for the next line, or for `interrupt` to fire first.
///
/// Once a Ctrl-C listener has been installed the process no longer exits on
/// SIGINT, so the idle prompt has to listen for it as well.
pub async fn next_input<R, F>(lines: &mut Lines<R>, interrupt: F) -> std::io::Result<ReplInput>
where
    R: AsyncBufRead + Unpin,
    F: Future<Output = ()>,
{
    tokio::select! {
        line = lines.next_line() => Ok(match line? {
            Some(line) => ReplInput::Line(line),
            None => ReplInput::Eof,
        }),
        _ = interrupt => Ok(ReplInput::Interrupted),
    }
}

/// Resolves on Ctrl-C. A listener that fails to install never resolves.
pub async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
