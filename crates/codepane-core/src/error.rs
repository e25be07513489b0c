use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodepaneError {
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("A file named {0} already exists")]
    DuplicateFile(String),

    #[error("File name cannot be empty")]
    EmptyFileName,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Message cannot be empty")]
    EmptyPrompt,

    #[error("Chat turn cancelled")]
    Cancelled,
}

impl CodepaneError {
    /// Transport failures are the ones surfaced as "is Ollama running?" notices.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Llm(_) | Self::Http(_))
    }
}

pub type Result<T> = std::result::Result<T, CodepaneError>;
