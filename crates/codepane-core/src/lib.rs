pub mod error;
pub mod constants;
pub mod config;
pub mod llm;
pub mod project;
pub mod chat;
pub mod preview;
pub mod session;

// Re-export key types
pub use error::CodepaneError;
pub use config::Settings;
pub use llm::{ChatRequest, LlmClient, Message, OllamaClient, Role, StreamEvent};
pub use project::{
    build_tree, parse_code_blocks, reconcile, CodeBlock, FileRecord, FileSet, FolderNode,
    IdSource, RandomIds,
};
pub use chat::{ChatMessage, ChatRole, ConversationHistory};
pub use preview::{compose_preview, ConsoleEntry, ConsoleLog, PreviewDocument};
pub use session::{
    CancelHandle, Notification, NotificationLevel, Session, SessionEvent, TurnOutcome,
};
