use crate::chat::message::ChatMessage;
use crate::project::IdSource;

/// Fold one streamed chunk into the message list.
///
/// A trailing assistant message is the in-flight reply: it keeps its id
/// and grows by `chunk`. Otherwise a new assistant message is started.
/// The list is taken and returned whole.
pub fn accumulate(
    mut messages: Vec<ChatMessage>,
    chunk: &str,
    ids: &mut impl IdSource,
) -> Vec<ChatMessage> {
    match messages.last_mut().filter(|m| m.is_assistant()) {
        Some(last) => last.content.push_str(chunk),
        None => messages.push(ChatMessage::assistant(ids, chunk)),
    }
    messages
}

/// Close a streaming turn with its canonical content.
///
/// The trailing assistant message takes `content`, and any other entry
/// carrying the same id is dropped, so the turn is represented exactly
/// once. A turn that produced no chunks and has no content adds nothing.
pub fn finalize(
    mut messages: Vec<ChatMessage>,
    content: &str,
    ids: &mut impl IdSource,
) -> Vec<ChatMessage> {
    let turn_id = match messages.last_mut().filter(|m| m.is_assistant()) {
        Some(last) => {
            last.content = content.to_string();
            last.id.clone()
        }
        None if content.is_empty() => return messages,
        None => {
            let message = ChatMessage::assistant(ids, content);
            let id = message.id.clone();
            messages.push(message);
            id
        }
    };

    let last = messages.len() - 1;
    let mut index = 0;
    messages.retain(|m| {
        let keep = m.id != turn_id || index == last;
        index += 1;
        keep
    });
    messages
}
