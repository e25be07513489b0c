use crate::constants::project::DEFAULT_LANGUAGE;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A fenced code region pulled out of an assistant reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Lowercased fence tag, or `"text"` when the fence had none.
    pub language: String,
    /// Fence body with surrounding whitespace trimmed. Never empty.
    pub code: String,
}

// The tag only counts when the newline follows it directly; the body is
// non-greedy so adjacent fences stay separate.
fn fence() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"```(?:(\w+)\n)?((?s:.*?))```").expect("valid fence pattern"))
}

fn block_from(caps: &Captures<'_>) -> Option<CodeBlock> {
    let code = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
    if code.is_empty() {
        return None;
    }
    let language = caps
        .get(1)
        .map(|m| m.as_str().to_lowercase())
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
    Some(CodeBlock {
        language,
        code: code.to_string(),
    })
}

/// Extract every terminated fenced block from `text`, in source order.
///
/// Unterminated fences and blocks with only whitespace produce nothing.
pub fn parse_code_blocks(text: &str) -> Vec<CodeBlock> {
    fence()
        .captures_iter(text)
        .filter_map(|caps| block_from(&caps))
        .collect()
}

/// Incremental extractor for text that arrives in chunks.
///
/// A block is yielded once its closing fence has been seen. Feeding a
/// text in any chunking yields the same blocks as [`parse_code_blocks`].
#[derive(Debug, Default)]
pub struct FenceScanner {
    buffer: String,
}

impl FenceScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &str) -> Vec<CodeBlock> {
        self.buffer.push_str(chunk);

        let mut blocks = Vec::new();
        let mut consumed = 0;
        for caps in fence().captures_iter(&self.buffer) {
            if let Some(whole) = caps.get(0) {
                consumed = whole.end();
            }
            if let Some(block) = block_from(&caps) {
                blocks.push(block);
            }
        }
        if consumed > 0 {
            self.buffer.drain(..consumed);
        }
        blocks
    }

    /// Text held back waiting for a closing fence.
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    /// End of stream: whatever is still buffered is an unterminated fence
    /// or trailing prose, and is discarded. Returns how many bytes were dropped.
    pub fn finish(self) -> usize {
        self.buffer.len()
    }
}
