use codepane_core::chat::{accumulate, finalize};
use codepane_core::config::Settings;
use codepane_core::project::{ChangeKind, RandomIds};
use codepane_core::*;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

// ========================================================================
// Settings Tests (config/mod.rs)
// ========================================================================

#[test]
fn test_settings_default_values() {
    let settings = Settings::default();

    assert_eq!(settings.ollama.base_url, "http://localhost:11434");
    assert_eq!(settings.ollama.model, "llama3");
    assert_eq!(settings.ollama.connect_timeout_secs, 10);

    assert!(settings.chat.system_prompt.is_none());
    assert_eq!(settings.chat.max_messages, 200);
    assert!(settings.chat.apply_code_blocks);

    assert_eq!(settings.explorer.default_file_type, "js");
}

#[test]
fn test_settings_save_and_reload_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut settings = Settings::default();
    settings.ollama.model = "codellama".to_string();
    settings.chat.system_prompt = Some("Answer with code.".to_string());
    settings.explorer.default_file_type = "ts".to_string();

    settings.save_to(&config_path).unwrap();
    let loaded = Settings::load_from(&config_path).unwrap();

    assert_eq!(loaded.ollama.model, "codellama");
    assert_eq!(loaded.chat.system_prompt.as_deref(), Some("Answer with code."));
    assert_eq!(loaded.explorer.default_file_type, "ts");
}

#[test]
fn test_settings_partial_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "[ollama]\nmodel = \"mistral\"\n").unwrap();

    let loaded = Settings::load_from(&config_path).unwrap();
    assert_eq!(loaded.ollama.model, "mistral");
    assert_eq!(loaded.ollama.base_url, "http://localhost:11434");
    assert_eq!(loaded.chat.max_messages, 200);
}

#[test]
fn test_settings_invalid_toml_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "[ollama\nmodel = ").unwrap();

    let err = Settings::load_from(&config_path).unwrap_err();
    assert!(matches!(err, CodepaneError::Config(_)));
}

// ========================================================================
// Reconciliation scenarios
// ========================================================================

#[test]
fn test_html_reply_into_empty_project() {
    let blocks = parse_code_blocks("Here:\n```html\n<p>hi</p>\n```");
    assert_eq!(
        blocks,
        vec![CodeBlock {
            language: "html".into(),
            code: "<p>hi</p>".into(),
        }]
    );

    let result = reconcile(&blocks, &FileSet::new(), &mut RandomIds);
    assert_eq!(result.files.len(), 1);
    assert_eq!(result.changes[0].kind, ChangeKind::Created);
    let file = &result.files.records()[0];
    assert_eq!(file.name, "index.html");
    assert_eq!(file.content, "<p>hi</p>");
    assert_eq!(result.active_file.as_deref(), Some(file.id.as_str()));
}

#[test]
fn test_blocks_in_source_order_between_prose() {
    let text = "Intro\n```rust\nfn main() {}\n```\nthen\n```css\n  a {}  \n```\nand\n```\nplain\n```";
    let blocks = parse_code_blocks(text);
    let summary: Vec<(&str, &str)> = blocks
        .iter()
        .map(|b| (b.language.as_str(), b.code.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![("rust", "fn main() {}"), ("css", "a {}"), ("text", "plain")]
    );
    assert_eq!(parse_code_blocks(text), blocks);
}

#[test]
fn test_duplicate_create_keeps_existing_content() {
    let mut ids = RandomIds;
    let mut files = FileSet::new();
    files.create("notes.txt", "js", &mut ids).unwrap();
    let id = files.find_by_name("notes.txt").unwrap().id.clone();
    files.set_content(&id, "keep me");

    let err = files.create("notes.txt", "js", &mut ids).unwrap_err();
    assert!(matches!(err, CodepaneError::DuplicateFile(ref name) if name == "notes.txt"));
    assert_eq!(files.len(), 1);
    assert_eq!(files.get(&id).unwrap().content, "keep me");
}

#[test]
fn test_streamed_chunks_become_one_message() {
    let mut ids = RandomIds;
    let mut messages = Vec::new();
    for chunk in ["Hel", "lo"] {
        messages = accumulate(messages, chunk, &mut ids);
        assert_eq!(messages.iter().filter(|m| m.is_assistant()).count(), 1);
    }
    let messages = finalize(messages, "Hello", &mut ids);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, ChatRole::Assistant);
    assert_eq!(messages[0].content, "Hello");
}

#[test]
fn test_tree_always_has_public_and_src() {
    let root = build_tree(&FileSet::new());
    assert!(root.folder_named("public").is_some());
    assert!(root.folder_named("src").is_some());
    assert_eq!(root.file_count(), 0);
}

#[test]
fn test_reconciled_files_show_up_in_tree() {
    let blocks = parse_code_blocks("```tsx\nexport {}\n```");
    let result = reconcile(&blocks, &FileSet::starter(&mut RandomIds), &mut RandomIds);
    let root = build_tree(&result.files);
    assert_eq!(root.file_count(), 4);
    let created = &result.changes[0].file;
    assert!(created.name.starts_with("code-") && created.name.ends_with(".tsx"));
    assert!(root.file_named(&created.name).is_some());
}

// ========================================================================
// Ollama over a loopback server
// ========================================================================

/// Serve one HTTP request with `body`, returning the raw request body.
async fn serve_once(content_type: &'static str, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];

        let header_end = loop {
            let n = socket.read(&mut buf).await.unwrap();
            assert!(n > 0, "client closed before sending headers");
            request.extend_from_slice(&buf[..n]);
            if let Some(pos) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };
        let headers = String::from_utf8_lossy(&request[..header_end]).to_lowercase();
        let content_length = headers
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .map(|v| v.trim().parse::<usize>().unwrap())
            .unwrap_or(0);
        while request.len() < header_end + content_length {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: {content_type}\r\nConnection: close\r\n\r\n{body}"
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();

        String::from_utf8_lossy(&request[header_end..]).to_string()
    });

    (url, handle)
}

fn ndjson(chunks: &[&str]) -> String {
    let mut body = String::new();
    for chunk in chunks {
        let line = serde_json::json!({
            "model": "llama3",
            "message": {"role": "assistant", "content": chunk},
            "done": false
        });
        body.push_str(&line.to_string());
        body.push('\n');
    }
    body.push_str("this line is not json\n");
    body.push_str(r#"{"model":"llama3","message":{"role":"assistant","content":""},"done":true}"#);
    body.push('\n');
    body
}

#[tokio::test]
async fn test_end_to_end_turn_over_http() {
    let body = ndjson(&["Sure!\n```css\nh1 {", " color: teal; }\n```\n", "Done."]);
    let (url, server) = serve_once("application/x-ndjson", body).await;

    let client = OllamaClient::new().with_base_url(url);
    let mut session = Session::new(&Settings::default());
    let outcome = session.send_message(&client, "color the title").await.unwrap();

    assert_eq!(outcome.reply, "Sure!\n```css\nh1 { color: teal; }\n```\nDone.");
    assert_eq!(outcome.changes.len(), 1);
    assert_eq!(
        session.files().find_by_name("styles.css").unwrap().content,
        "h1 { color: teal; }"
    );
    assert_eq!(session.refresh_counter(), 1);

    let request: serde_json::Value = serde_json::from_str(&server.await.unwrap()).unwrap();
    assert_eq!(request["model"], "llama3");
    assert_eq!(request["stream"], true);
    assert_eq!(request["messages"][0]["role"], "user");
    assert_eq!(request["messages"][0]["content"], "color the title");
}

#[tokio::test]
async fn test_non_streaming_chat_over_http() {
    let body = r#"{"model":"llama3","created_at":"2024-05-01T10:00:00Z","message":{"role":"assistant","content":"Hi there"},"done":true}"#.to_string();
    let (url, server) = serve_once("application/json", body).await;

    let client = OllamaClient::new().with_base_url(url);
    let request = ChatRequest::new("llama3", vec![Message::user("hello")]);
    let response = client.chat(request).await.unwrap();

    assert_eq!(response.message.role, Role::Assistant);
    assert_eq!(response.message.content, "Hi there");
    assert!(response.done);

    let sent: serde_json::Value = serde_json::from_str(&server.await.unwrap()).unwrap();
    assert_eq!(sent["stream"], false);
}

#[tokio::test]
async fn test_list_models_over_http() {
    let body = r#"{"models":[{"name":"llama3:8b","size":4661224676},{"name":"mistral"}]}"#.to_string();
    let (url, _server) = serve_once("application/json", body).await;

    let client = OllamaClient::new().with_base_url(url);
    let models = client.list_models().await.unwrap();
    assert_eq!(models, vec!["llama3:8b".to_string(), "mistral".to_string()]);
}

#[tokio::test]
async fn test_unreachable_server_notifies_and_clears_loading() {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = OllamaClient::new().with_base_url(url);
    let mut session = Session::new(&Settings::default());
    let before = session.files().clone();

    let err = session.send_message(&client, "hello").await.unwrap_err();
    assert!(err.is_transport());
    assert!(!session.is_loading());
    assert_eq!(session.files(), &before);

    let notes = session.drain_notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Error);
}

#[tokio::test]
async fn test_cancel_before_response_arrives() {
    // A server that accepts but never answers.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let _server = tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        std::future::pending::<()>().await;
    });

    let client = OllamaClient::new().with_base_url(url);
    let mut session = Session::new(&Settings::default());
    let handle = session.cancel_handle();
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        handle.cancel();
    });

    let err = session.send_message(&client, "hello").await.unwrap_err();
    assert!(matches!(err, CodepaneError::Cancelled));
    assert!(!session.is_loading());
    assert_eq!(session.messages().len(), 1);
}
