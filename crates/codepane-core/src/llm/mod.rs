mod traits;
mod ollama;
pub mod discovery;

pub use traits::*;
pub use ollama::{decode_stream_line, ModelSummary, OllamaClient};
pub use discovery::{format_model_name, LocalDiscovery};
