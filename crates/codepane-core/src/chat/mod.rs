pub mod accumulator;
pub mod history;
pub mod message;

pub use accumulator::{accumulate, finalize};
pub use history::ConversationHistory;
pub use message::{ChatMessage, ChatRole};
