use crate::chat::{ChatMessage, ConversationHistory};
use crate::config::Settings;
use crate::error::CodepaneError;
use crate::llm::{ChatRequest, LlmClient, StreamEvent};
use crate::preview::{compose_preview, PreviewDocument};
use crate::project::{
    build_tree, guess_run_command, parse_code_blocks, reconcile, ChangeKind, CodeBlock,
    ExplorerRow, ExplorerView, FenceScanner, FileChange, FileRecord, FileSet, FolderNode, IdSource,
    RandomIds, Reconciliation, RunCommand,
};
use futures::StreamExt;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A user-visible notice, the terminal equivalent of a toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
}

impl Notification {
    fn new(level: NotificationLevel, title: &str, description: impl Into<String>) -> Self {
        Self {
            level,
            title: title.to_string(),
            description: description.into(),
        }
    }
}

/// Events emitted while a chat turn runs.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    TextDelta(String),
    /// A fenced block closed mid-stream. Files change only once the turn completes.
    BlockReady(CodeBlock),
    FilesChanged(Vec<FileChange>),
    Complete,
    Cancelled,
    Error(String),
}

/// Result of a completed chat turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: String,
    pub changes: Vec<FileChange>,
}

/// Cancels whichever chat turn is in flight.
///
/// Cloneable and usable from another task while the session itself is
/// borrowed by `send_message`.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    current: Arc<Mutex<CancellationToken>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.lock().cancel();
    }

    /// Cancel the previous turn and install a fresh token for the next one.
    fn supersede(&self) -> CancellationToken {
        let mut current = self.lock();
        current.cancel();
        *current = CancellationToken::new();
        current.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CancellationToken> {
        self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// The single owner of the application state: files, selection,
/// conversation and the flags the view renders from.
///
/// All file set updates are whole-value swaps; reconciliation runs over an
/// immutable snapshot and the result replaces the live set.
pub struct Session<I: IdSource = RandomIds> {
    files: FileSet,
    active_file: Option<String>,
    history: ConversationHistory,
    explorer: ExplorerView,
    is_loading: bool,
    refresh_counter: u64,
    selected_model: String,
    running_command: Option<RunCommand>,
    notifications: Vec<Notification>,
    default_file_type: String,
    apply_code_blocks: bool,
    turn: CancelHandle,
    ids: I,
}

impl Session<RandomIds> {
    pub fn new(settings: &Settings) -> Self {
        Self::with_ids(settings, RandomIds)
    }
}

impl<I: IdSource> Session<I> {
    /// Start from the starter project with its first file selected.
    pub fn with_ids(settings: &Settings, mut ids: I) -> Self {
        let files = FileSet::starter(&mut ids);
        let active_file = files.records().first().map(|f| f.id.clone());
        let mut history = ConversationHistory::new().with_max_messages(settings.chat.max_messages);
        history.set_system_prompt(settings.chat.system_prompt.clone());

        Self {
            files,
            active_file,
            history,
            explorer: ExplorerView::new(),
            is_loading: false,
            refresh_counter: 0,
            selected_model: settings.ollama.model.clone(),
            running_command: None,
            notifications: Vec::new(),
            default_file_type: settings.explorer.default_file_type.clone(),
            apply_code_blocks: settings.chat.apply_code_blocks,
            turn: CancelHandle::default(),
            ids,
        }
    }

    /// Replace the starting file set, e.g. to resume from a fixture.
    pub fn with_files(mut self, files: FileSet) -> Self {
        self.active_file = files.records().first().map(|f| f.id.clone());
        self.files = files;
        self
    }

    pub fn files(&self) -> &FileSet {
        &self.files
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.history.messages()
    }

    /// Stop any reply in flight and forget the conversation. Files stay.
    pub fn clear_chat(&mut self) {
        self.turn.cancel();
        self.history.clear();
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Bumped once per applied batch of code blocks and per run request.
    pub fn refresh_counter(&self) -> u64 {
        self.refresh_counter
    }

    pub fn selected_model(&self) -> &str {
        &self.selected_model
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.selected_model = model.into();
    }

    pub fn running_command(&self) -> Option<&RunCommand> {
        self.running_command.as_ref()
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Take the pending notifications, leaving none behind.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    fn notify(&mut self, level: NotificationLevel, title: &str, description: impl Into<String>) {
        self.notifications.push(Notification::new(level, title, description));
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.turn.clone()
    }

    pub fn cancel_turn(&self) {
        self.turn.cancel();
    }

    // ─── Files ────────────────────────────────────────────────────────────────

    pub fn active_file(&self) -> Option<&FileRecord> {
        self.active_file.as_deref().and_then(|id| self.files.get(id))
    }

    /// Select a file by id. Unknown ids leave the selection unchanged.
    pub fn select_file(&mut self, id: &str) -> bool {
        if self.files.get(id).is_none() {
            return false;
        }
        self.active_file = Some(id.to_string());
        true
    }

    /// Create an empty file from the explorer form and select it. A taken
    /// name is rejected with an error notification and nothing changes.
    pub fn create_file(
        &mut self,
        name: &str,
        file_type: Option<&str>,
    ) -> Result<String, CodepaneError> {
        let default_type = file_type.unwrap_or(&self.default_file_type).to_string();
        let mut next = self.files.clone();
        match next.create(name, &default_type, &mut self.ids) {
            Ok(record) => {
                let (id, name) = (record.id.clone(), record.name.clone());
                self.files = next;
                self.active_file = Some(id.clone());
                self.notify(
                    NotificationLevel::Success,
                    "File created",
                    format!("{name} was created."),
                );
                Ok(id)
            }
            Err(e) => {
                self.notify(NotificationLevel::Error, "Error", e.to_string());
                Err(e)
            }
        }
    }

    /// Editor change: replace the active file's content.
    pub fn update_active_content(&mut self, content: impl Into<String>) -> bool {
        let Some(id) = self.active_file.clone() else {
            return false;
        };
        let mut next = self.files.clone();
        if !next.set_content(&id, content) {
            return false;
        }
        self.files = next;
        true
    }

    pub fn tree(&self) -> FolderNode {
        build_tree(&self.files)
    }

    pub fn explorer_mut(&mut self) -> &mut ExplorerView {
        &mut self.explorer
    }

    /// Explorer rows for the current files, query and expand state.
    pub fn explorer_rows(&self) -> Vec<ExplorerRow> {
        self.explorer.rows(&self.tree())
    }

    // ─── Preview & run ────────────────────────────────────────────────────────

    pub fn preview(&self) -> Option<PreviewDocument> {
        compose_preview(&self.files)
    }

    pub fn refresh_preview(&mut self) {
        self.refresh_counter += 1;
    }

    /// Guess a run command for the project and refresh the preview.
    /// Nothing is executed.
    pub fn run_project(&mut self) -> Option<RunCommand> {
        match guess_run_command(&self.files) {
            Some(command) => {
                info!(command = %command.command, "project run requested");
                self.notify(
                    NotificationLevel::Success,
                    "Project started",
                    format!("Command: {}", command.command),
                );
                self.running_command = Some(command.clone());
                self.refresh_preview();
                Some(command)
            }
            None => {
                self.notify(
                    NotificationLevel::Error,
                    "Error",
                    "Could not work out how to run this project.",
                );
                None
            }
        }
    }

    pub fn clear_running_command(&mut self) {
        self.running_command = None;
    }

    // ─── Models ───────────────────────────────────────────────────────────────

    /// Fetch installed models. When the selected model is not among them
    /// the first one is selected instead.
    pub async fn refresh_models(
        &mut self,
        client: &dyn LlmClient,
    ) -> Result<Vec<String>, CodepaneError> {
        match client.list_models().await {
            Ok(models) => {
                if let Some(first) = models.first() {
                    if !models.contains(&self.selected_model) {
                        info!(
                            from = %self.selected_model,
                            to = %first,
                            "selected model not installed"
                        );
                        self.selected_model = first.clone();
                    }
                }
                Ok(models)
            }
            Err(e) => {
                warn!("listing models failed: {e}");
                self.notify(
                    NotificationLevel::Error,
                    "Error",
                    "Could not list Ollama models. Make sure the Ollama API is running.",
                );
                Err(e)
            }
        }
    }

    // ─── Chat ─────────────────────────────────────────────────────────────────

    pub async fn send_message(
        &mut self,
        client: &dyn LlmClient,
        prompt: &str,
    ) -> Result<TurnOutcome, CodepaneError> {
        let (tx, _rx) = unbounded_channel();
        self.send_message_with_events(client, prompt, tx).await
    }

    /// Run one chat turn: stream the reply into the conversation, then
    /// reconcile its code blocks into the file set.
    ///
    /// Starting a turn cancels any previous one. On failure or cancellation
    /// the partial reply is dropped, a notification is queued and the
    /// loading flag is cleared; files are only touched after a complete reply.
    pub async fn send_message_with_events(
        &mut self,
        client: &dyn LlmClient,
        prompt: &str,
        events: UnboundedSender<SessionEvent>,
    ) -> Result<TurnOutcome, CodepaneError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            self.notify(NotificationLevel::Error, "Message cannot be empty", "");
            return Err(CodepaneError::EmptyPrompt);
        }

        let cancel = self.turn.supersede();
        self.history.add_user_message(&mut self.ids, prompt);
        self.is_loading = true;

        let result = self.stream_reply(client, prompt, &cancel, &events).await;
        self.is_loading = false;

        match result {
            Ok(reply) => {
                self.history.finish_turn(&mut self.ids, &reply);
                let changes = self.apply_reply(&reply);
                if !changes.is_empty() {
                    let _ = events.send(SessionEvent::FilesChanged(changes.clone()));
                }
                let _ = events.send(SessionEvent::Complete);
                Ok(TurnOutcome { reply, changes })
            }
            Err(CodepaneError::Cancelled) => {
                self.history.discard_in_flight();
                debug!("chat turn cancelled");
                self.notify(NotificationLevel::Info, "Cancelled", "The reply was stopped.");
                let _ = events.send(SessionEvent::Cancelled);
                Err(CodepaneError::Cancelled)
            }
            Err(e) => {
                self.history.discard_in_flight();
                warn!("chat turn failed: {e}");
                self.notify(
                    NotificationLevel::Error,
                    "Error",
                    format!("Talking to the API failed. Make sure the Ollama API is running. ({e})"),
                );
                let _ = events.send(SessionEvent::Error(e.to_string()));
                Err(e)
            }
        }
    }

    async fn stream_reply(
        &mut self,
        client: &dyn LlmClient,
        prompt: &str,
        cancel: &CancellationToken,
        events: &UnboundedSender<SessionEvent>,
    ) -> Result<String, CodepaneError> {
        let request = ChatRequest::new(
            self.selected_model.clone(),
            self.history.request_messages(prompt),
        );
        let mut stream = client.chat_stream(request.streaming(), cancel.clone()).await?;
        let mut reply = String::new();
        let mut scanner = FenceScanner::new();

        loop {
            let event = tokio::select! {
                _ = cancel.cancelled() => return Err(CodepaneError::Cancelled),
                event = stream.next() => event,
            };
            match event {
                Some(StreamEvent::TextDelta(delta)) => {
                    self.history.push_chunk(&mut self.ids, &delta);
                    reply.push_str(&delta);
                    let blocks = scanner.push(&delta);
                    let _ = events.send(SessionEvent::TextDelta(delta));
                    for block in blocks {
                        debug!(language = %block.language, "code block closed");
                        let _ = events.send(SessionEvent::BlockReady(block));
                    }
                }
                Some(StreamEvent::Done) => break,
                Some(StreamEvent::Error(err)) => return Err(CodepaneError::Llm(err)),
                None if cancel.is_cancelled() => return Err(CodepaneError::Cancelled),
                None => break,
            }
        }

        let tail = scanner.finish();
        if tail > 0 {
            debug!(bytes = tail, "reply ended outside a closed block");
        }
        Ok(reply)
    }

    /// Reconcile the reply's code blocks and swap the result in.
    fn apply_reply(&mut self, reply: &str) -> Vec<FileChange> {
        if !self.apply_code_blocks {
            return Vec::new();
        }
        let blocks = parse_code_blocks(reply);
        if blocks.is_empty() {
            return Vec::new();
        }

        let Reconciliation {
            files,
            changes,
            active_file,
        } = reconcile(&blocks, &self.files, &mut self.ids);
        self.files = files;
        if active_file.is_some() {
            self.active_file = active_file;
        }
        self.refresh_counter += 1;

        for change in &changes {
            let (title, verb) = match change.kind {
                ChangeKind::Updated => ("File updated", "updated"),
                ChangeKind::Created => ("New file", "created"),
            };
            self.notify(
                NotificationLevel::Success,
                title,
                format!("{} was {verb}.", change.file.name),
            );
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatRole;
    use crate::llm::ChatResponse;
    use futures::channel::mpsc;

    struct Seq(u32);

    impl IdSource for Seq {
        fn next_id(&mut self) -> String {
            self.0 += 1;
            format!("id{}", self.0)
        }

        fn short_id(&mut self) -> String {
            self.0 += 1;
            format!("s{}", self.0)
        }
    }

    /// Replies with fixed events. `hang` keeps the stream open afterwards.
    struct Scripted {
        events: Vec<StreamEvent>,
        hang: bool,
    }

    impl Scripted {
        fn chunks(chunks: &[&str]) -> Self {
            let mut events: Vec<StreamEvent> =
                chunks.iter().map(|c| StreamEvent::TextDelta(c.to_string())).collect();
            events.push(StreamEvent::Done);
            Self { events, hang: false }
        }
    }

    #[async_trait::async_trait]
    impl LlmClient for Scripted {
        async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse, CodepaneError> {
            Err(CodepaneError::Llm("not scripted".into()))
        }

        async fn chat_stream(
            &self,
            _request: ChatRequest,
            cancel: CancellationToken,
        ) -> Result<mpsc::UnboundedReceiver<StreamEvent>, CodepaneError> {
            let (tx, rx) = mpsc::unbounded();
            for event in self.events.clone() {
                let _ = tx.unbounded_send(event);
            }
            if self.hang {
                tokio::spawn(async move {
                    cancel.cancelled().await;
                    drop(tx);
                });
            }
            Ok(rx)
        }

        async fn list_models(&self) -> Result<Vec<String>, CodepaneError> {
            Ok(vec!["mistral".into(), "codellama".into()])
        }
    }

    struct Unreachable;

    #[async_trait::async_trait]
    impl LlmClient for Unreachable {
        async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse, CodepaneError> {
            Err(CodepaneError::Llm("connection refused".into()))
        }

        async fn chat_stream(
            &self,
            _request: ChatRequest,
            _cancel: CancellationToken,
        ) -> Result<mpsc::UnboundedReceiver<StreamEvent>, CodepaneError> {
            Err(CodepaneError::Llm("connection refused".into()))
        }

        async fn list_models(&self) -> Result<Vec<String>, CodepaneError> {
            Err(CodepaneError::Llm("connection refused".into()))
        }
    }

    fn session() -> Session<Seq> {
        Session::with_ids(&Settings::default(), Seq(0))
    }

    #[test]
    fn test_starts_with_first_starter_file_active() {
        let session = session();
        assert_eq!(session.files().len(), 3);
        assert_eq!(session.active_file().unwrap().name, "index.html");
        assert!(!session.is_loading());
        assert_eq!(session.refresh_counter(), 0);
        assert_eq!(session.selected_model(), "llama3");
    }

    #[test]
    fn test_create_file_selects_it() {
        let mut session = session();
        let id = session.create_file("utils", None).unwrap();
        assert_eq!(session.active_file().unwrap().id, id);
        assert_eq!(session.active_file().unwrap().name, "utils.js");
        assert_eq!(session.drain_notifications()[0].level, NotificationLevel::Success);
        assert!(session.notifications().is_empty());
    }

    #[test]
    fn test_duplicate_file_is_rejected_without_change() {
        let mut session = session();
        let before = session.files().clone();
        let active = session.active_file().map(|f| f.id.clone());

        let err = session.create_file("styles.css", None).unwrap_err();
        assert!(matches!(err, CodepaneError::DuplicateFile(_)));
        assert_eq!(session.files(), &before);
        assert_eq!(session.active_file().map(|f| f.id.clone()), active);
        assert_eq!(session.notifications()[0].level, NotificationLevel::Error);
    }

    #[test]
    fn test_blank_file_name_is_rejected_without_change() {
        let mut session = session();
        let before = session.files().clone();

        for name in ["", "   "] {
            let err = session.create_file(name, None).unwrap_err();
            assert!(matches!(err, CodepaneError::EmptyFileName));
        }
        assert_eq!(session.files(), &before);
        let notes = session.drain_notifications();
        assert_eq!(notes.len(), 2);
        assert!(notes.iter().all(|n| n.level == NotificationLevel::Error));
        assert_eq!(notes[0].description, "File name cannot be empty");
    }

    #[test]
    fn test_update_active_content() {
        let mut session = session();
        assert!(session.update_active_content("<h1>hi</h1>"));
        assert_eq!(session.active_file().unwrap().content, "<h1>hi</h1>");
    }

    #[tokio::test]
    async fn test_turn_reconciles_reply_into_files() {
        let mut session = session();
        let client = Scripted::chunks(&["Here:\n```css\nbody", " { margin: 0; }\n```\n"]);

        let outcome = session.send_message(&client, "make it flush").await.unwrap();

        assert_eq!(outcome.changes.len(), 1);
        assert_eq!(outcome.changes[0].kind, ChangeKind::Updated);
        let css = session.files().find_by_name("styles.css").unwrap();
        assert_eq!(css.content, "body { margin: 0; }");
        assert_eq!(session.active_file().unwrap().name, "styles.css");
        assert_eq!(session.refresh_counter(), 1);
        assert!(!session.is_loading());

        let messages = session.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::User);
        assert_eq!(messages[1].role, ChatRole::Assistant);
        assert_eq!(messages[1].content, outcome.reply);
    }

    #[tokio::test]
    async fn test_reply_without_code_leaves_files_alone() {
        let mut session = session();
        let before = session.files().clone();
        let client = Scripted::chunks(&["Just ", "prose."]);

        let outcome = session.send_message(&client, "hello").await.unwrap();
        assert!(outcome.changes.is_empty());
        assert_eq!(session.files(), &before);
        assert_eq!(session.refresh_counter(), 0);
    }

    #[tokio::test]
    async fn test_events_follow_chunk_order() {
        let mut session = session();
        let client = Scripted::chunks(&["a", "b", "c"]);
        let (tx, mut rx) = unbounded_channel();

        session.send_message_with_events(&client, "go", tx).await.unwrap();

        let mut deltas = String::new();
        while let Ok(event) = rx.try_recv() {
            match event {
                SessionEvent::TextDelta(d) => deltas.push_str(&d),
                SessionEvent::Complete => break,
                other => panic!("unexpected event {other:?}"),
            }
        }
        assert_eq!(deltas, "abc");
    }

    #[tokio::test]
    async fn test_blocks_reported_as_they_close() {
        let mut session = session();
        let client = Scripted::chunks(&["```html\n<p>", "x</p>\n```", " and ```css\np{}"]);
        let (tx, mut rx) = unbounded_channel();

        session.send_message_with_events(&client, "go", tx).await.unwrap();

        let mut ready = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let SessionEvent::BlockReady(block) = event {
                ready.push(block.language);
            }
        }
        // The css fence never closes.
        assert_eq!(ready, vec!["html".to_string()]);
    }

    #[tokio::test]
    async fn test_first_matching_file_wins() {
        let mut ids = Seq(100);
        let files = FileSet::from_records(vec![
            FileRecord::new(&mut ids, "theme.css", "css", "old theme"),
            FileRecord::new(&mut ids, "styles.css", "css", "old styles"),
        ])
        .unwrap();
        let mut session = session().with_files(files);
        assert_eq!(session.active_file().unwrap().name, "theme.css");

        let client = Scripted::chunks(&["```css\nbody{}\n```"]);
        session.send_message(&client, "restyle").await.unwrap();

        assert_eq!(session.files().find_by_name("theme.css").unwrap().content, "body{}");
        assert_eq!(session.files().find_by_name("styles.css").unwrap().content, "old styles");
    }

    #[tokio::test]
    async fn test_transport_error_restores_state() {
        let mut session = session();
        let before = session.files().clone();

        let err = session.send_message(&Unreachable, "hi").await.unwrap_err();
        assert!(err.is_transport());
        assert!(!session.is_loading());
        assert_eq!(session.files(), &before);
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.notifications().last().unwrap().level, NotificationLevel::Error);
    }

    #[tokio::test]
    async fn test_stream_error_drops_partial_reply() {
        let mut session = session();
        let client = Scripted {
            events: vec![
                StreamEvent::TextDelta("```html\n<p>half".into()),
                StreamEvent::Error("model crashed".into()),
            ],
            hang: false,
        };

        let err = session.send_message(&client, "hi").await.unwrap_err();
        assert!(matches!(err, CodepaneError::Llm(_)));
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].role, ChatRole::User);
        assert_eq!(session.refresh_counter(), 0);
    }

    #[tokio::test]
    async fn test_cancel_handle_stops_turn() {
        let mut session = session();
        let before = session.files().clone();
        let client = Scripted {
            events: vec![StreamEvent::TextDelta("```css\nbody{".into())],
            hang: true,
        };
        let handle = session.cancel_handle();
        let (tx, mut rx) = unbounded_channel();

        let canceller = tokio::spawn(async move {
            // Wait until the first chunk has been applied.
            if let Some(SessionEvent::TextDelta(_)) = rx.recv().await {
                handle.cancel();
            }
            rx
        });

        let err = session.send_message_with_events(&client, "hi", tx).await.unwrap_err();
        assert!(matches!(err, CodepaneError::Cancelled));
        assert!(!session.is_loading());
        assert_eq!(session.files(), &before);
        assert_eq!(session.messages().len(), 1);

        let mut rx = canceller.await.unwrap();
        assert_eq!(rx.recv().await, Some(SessionEvent::Cancelled));
    }

    #[tokio::test]
    async fn test_empty_prompt_is_rejected() {
        let mut session = session();
        let client = Scripted::chunks(&["never"]);
        let err = session.send_message(&client, "   ").await.unwrap_err();
        assert!(matches!(err, CodepaneError::EmptyPrompt));
        assert!(session.messages().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_models_falls_back_to_first() {
        let mut session = session();
        let models = session.refresh_models(&Scripted::chunks(&[])).await.unwrap();
        assert_eq!(models.len(), 2);
        assert_eq!(session.selected_model(), "mistral");

        session.set_model("codellama");
        session.refresh_models(&Scripted::chunks(&[])).await.unwrap();
        assert_eq!(session.selected_model(), "codellama");
    }

    #[test]
    fn test_run_project_guesses_and_refreshes() {
        let mut session = session();
        let command = session.run_project().unwrap();
        assert_eq!(session.running_command(), Some(&command));
        assert_eq!(session.refresh_counter(), 1);

        session.clear_running_command();
        assert!(session.running_command().is_none());
    }
}
