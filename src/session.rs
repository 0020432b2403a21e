//! Session state and action dispatch
//!
//! Every user event and every background completion becomes an [`Action`].
//! [`Session::dispatch`] applies it to the state and hands back the side
//! effects the runtime has to perform. Nothing in here touches the terminal,
//! the network, or the clock.

use crate::identity::UserHandle;
use crate::llm::prompts::COMMAND_SYSTEM;
use crate::llm::{segment, RemoteError, RemoteRequest, SegmentKind};
use crate::tree::{build_tree, render_rows, Expansion, FileTree, RowAction, TreeRow};
use crate::upload::{UploadBatch, UploadError};
use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

pub const DEFAULT_PLACEHOLDER: &str = "Natural Language Command Center...";
pub const PROCESSING_PLACEHOLDER: &str = "Processing command... please wait.";
pub const COMMAND_ERROR_PLACEHOLDER: &str = "Error executing command. See console for details.";
pub const RUN_PLACEHOLDER: &str = "Code execution triggered. See console for logs.";
pub const FOLDER_PROMPT_PLACEHOLDER: &str = "Folder to open (Enter to load, Esc to cancel)";
pub const CHAT_ERROR_MESSAGE: &str = "An error occurred while connecting to the AI assistant.";

pub const NO_FOLDER_STATUS: &str = "No folder selected.";
pub const READING_STATUS: &str = "Reading file contents...";
pub const READ_ERROR_STATUS: &str = "Error reading file content. See console.";

pub const EDITOR_IDLE_TITLE: &str = "Select a file to view its content.";
pub const EDITOR_IDLE_BODY: &str =
    "// Code content will appear here when a file is clicked in the Project Knowledge Map.";
pub const EDITOR_MISSING_TITLE: &str = "Error loading file.";

pub const COMMAND_SUCCESS_RESET: Duration = Duration::from_secs(4);
pub const COMMAND_ERROR_RESET: Duration = Duration::from_secs(5);
pub const RUN_RESET: Duration = Duration::from_secs(3);

/// Characters of a command reply shown in the placeholder
const COMMAND_PREVIEW_CHARS: usize = 50;

/// Which main view is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Chat,
    Editor,
}

impl ViewMode {
    pub const ALL: [ViewMode; 2] = [ViewMode::Chat, ViewMode::Editor];

    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Chat => "Chat",
            ViewMode::Editor => "Editor",
        }
    }
}

/// Where key presses go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    Tree,
}

/// What the input line is collecting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Prompt,
    FolderPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    Developer,
    Assistant,
}

impl Sender {
    pub fn label(&self) -> &'static str {
        match self {
            Sender::Developer => "Developer",
            Sender::Assistant => "AI Assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    Text(String),
    Code {
        language: Option<String>,
        content: String,
    },
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub sender: Sender,
    pub body: MessageBody,
    pub at: DateTime<Local>,
}

impl ChatMessage {
    fn new(sender: Sender, body: MessageBody) -> Self {
        Self {
            sender,
            body,
            at: Local::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    pub title: String,
    pub content: String,
    /// Path of the file on display, if one was found
    pub path: Option<String>,
    pub scroll: usize,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            title: EDITOR_IDLE_TITLE.to_string(),
            content: EDITOR_IDLE_BODY.to_string(),
            path: None,
            scroll: 0,
        }
    }
}

/// Measurements from the last drawn frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    /// Rows available to the chat or editor pane
    pub height: usize,
    /// Wrapped transcript length, only known when the chat pane was drawn
    pub chat_lines: Option<usize>,
}

/// Which profile a remote call was made with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPurpose {
    Chat,
    Command,
}

#[derive(Debug)]
pub enum Action {
    InsertChar(char),
    Backspace,
    /// Enter on the input line
    Submit,
    ApplyCommand,
    Run,
    SetView(ViewMode),
    CycleFocus,
    PromptFolder,
    CancelPrompt,
    OpenFolder(PathBuf),
    MoveCursor(isize),
    ActivateRow,
    ToggleFolder(String),
    OpenFile {
        path: String,
        name: String,
    },
    Scroll(isize),
    RemoteReplied {
        purpose: CallPurpose,
        result: Result<String, RemoteError>,
    },
    FolderLoaded(Result<UploadBatch, UploadError>),
    IdentityResolved(Option<UserHandle>),
    RestorePlaceholder {
        placeholder: String,
        unlock: bool,
    },
}

/// Work the runtime performs on behalf of the session
#[derive(Debug)]
pub enum Effect {
    CallRemote {
        purpose: CallPurpose,
        request: RemoteRequest,
    },
    ReadFolder(PathBuf),
    /// Dispatch `action` after `after` has elapsed
    Schedule { after: Duration, action: Action },
}

#[derive(Debug, Default)]
pub struct Session {
    pub view: ViewMode,
    pub focus: Focus,
    pub input_mode: InputMode,
    pub input: String,
    pub folder_input: String,
    /// Set while a command-center call is in flight
    pub input_locked: bool,
    pub placeholder: String,
    /// Placeholder in effect when the running command was issued
    saved_placeholder: Option<String>,
    pub messages: Vec<ChatMessage>,
    /// Chat sends still waiting for a reply
    pub pending_replies: usize,
    /// Lines scrolled up from the newest message
    pub chat_scroll: usize,
    viewport_height: usize,
    chat_lines: usize,
    files: HashMap<String, String>,
    pub root_name: Option<String>,
    pub tree: FileTree,
    pub expansion: Expansion,
    pub rows: Vec<TreeRow>,
    pub tree_cursor: usize,
    pub tree_status: Option<String>,
    pub editor: EditorState,
    pub user_badge: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            tree_status: Some(NO_FOLDER_STATUS.to_string()),
            ..Default::default()
        }
    }

    /// Show `mode` and mark its tab active. Idempotent.
    pub fn set_view(&mut self, mode: ViewMode) {
        self.view = mode;
    }

    pub fn is_view_active(&self, mode: ViewMode) -> bool {
        self.view == mode
    }

    /// Record what the last frame measured and pull scroll offsets back in range
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport_height = viewport.height;
        if let Some(lines) = viewport.chat_lines {
            self.chat_lines = lines;
        }
        self.clamp_scroll();
    }

    fn clamp_scroll(&mut self) {
        let height = self.viewport_height.max(1);
        self.chat_scroll = self.chat_scroll.min(self.chat_lines.saturating_sub(height));
        let editor_lines = self.editor.content.lines().count();
        self.editor.scroll = self.editor.scroll.min(editor_lines.saturating_sub(height));
    }

    pub fn file_content(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn stored_file_count(&self) -> usize {
        self.files.len()
    }

    pub fn selected_row(&self) -> Option<&TreeRow> {
        self.rows.get(self.tree_cursor)
    }

    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::InsertChar(c) => {
                match self.input_mode {
                    InputMode::FolderPath => self.folder_input.push(c),
                    InputMode::Prompt if !self.input_locked => self.input.push(c),
                    InputMode::Prompt => {}
                }
                Vec::new()
            }
            Action::Backspace => {
                match self.input_mode {
                    InputMode::FolderPath => {
                        self.folder_input.pop();
                    }
                    InputMode::Prompt if !self.input_locked => {
                        self.input.pop();
                    }
                    InputMode::Prompt => {}
                }
                Vec::new()
            }
            Action::Submit => match self.input_mode {
                InputMode::Prompt => self.send_message(),
                InputMode::FolderPath => self.submit_folder_path(),
            },
            Action::ApplyCommand => self.apply_command(),
            Action::Run => {
                info!("Running commands...");
                self.placeholder = RUN_PLACEHOLDER.to_string();
                vec![Effect::Schedule {
                    after: RUN_RESET,
                    action: Action::RestorePlaceholder {
                        placeholder: DEFAULT_PLACEHOLDER.to_string(),
                        unlock: false,
                    },
                }]
            }
            Action::SetView(mode) => {
                self.set_view(mode);
                Vec::new()
            }
            Action::CycleFocus => {
                self.focus = match self.focus {
                    Focus::Input => Focus::Tree,
                    Focus::Tree => Focus::Input,
                };
                Vec::new()
            }
            Action::PromptFolder => {
                self.input_mode = InputMode::FolderPath;
                self.folder_input.clear();
                self.focus = Focus::Input;
                Vec::new()
            }
            Action::CancelPrompt => {
                self.input_mode = InputMode::Prompt;
                self.folder_input.clear();
                Vec::new()
            }
            Action::OpenFolder(path) => {
                self.files.clear();
                self.tree = FileTree::default();
                self.rows.clear();
                self.tree_cursor = 0;
                self.root_name = None;
                self.tree_status = Some(READING_STATUS.to_string());
                vec![Effect::ReadFolder(path)]
            }
            Action::MoveCursor(delta) => {
                if !self.rows.is_empty() {
                    let last = self.rows.len() - 1;
                    let next = self.tree_cursor as isize + delta;
                    self.tree_cursor = next.clamp(0, last as isize) as usize;
                }
                Vec::new()
            }
            Action::ActivateRow => {
                let row_action = self.selected_row().map(TreeRow::action);
                match row_action {
                    Some(RowAction::ToggleFolder(path)) => {
                        self.dispatch(Action::ToggleFolder(path))
                    }
                    Some(RowAction::OpenFile { path, name }) => {
                        self.dispatch(Action::OpenFile { path, name })
                    }
                    Some(RowAction::None) | None => Vec::new(),
                }
            }
            Action::ToggleFolder(path) => {
                self.expansion.toggle(&path);
                self.refresh_rows();
                Vec::new()
            }
            Action::OpenFile { path, name } => {
                self.open_file(&path, &name);
                Vec::new()
            }
            Action::Scroll(delta) => {
                // Negative scrolls toward the top; chat counts up from the newest line
                match self.view {
                    ViewMode::Chat => {
                        self.chat_scroll = self.chat_scroll.saturating_add_signed(-delta)
                    }
                    ViewMode::Editor => {
                        self.editor.scroll = self.editor.scroll.saturating_add_signed(delta)
                    }
                }
                self.clamp_scroll();
                Vec::new()
            }
            Action::RemoteReplied { purpose, result } => match purpose {
                CallPurpose::Chat => {
                    self.receive_chat_reply(result);
                    Vec::new()
                }
                CallPurpose::Command => self.receive_command_reply(result),
            },
            Action::FolderLoaded(result) => {
                self.receive_folder(result);
                Vec::new()
            }
            Action::IdentityResolved(handle) => {
                self.user_badge = handle.map(|h| h.badge());
                Vec::new()
            }
            Action::RestorePlaceholder {
                placeholder,
                unlock,
            } => {
                self.placeholder = placeholder;
                if unlock {
                    self.input.clear();
                    self.input_locked = false;
                }
                Vec::new()
            }
        }
    }

    fn send_message(&mut self) -> Vec<Effect> {
        if self.input_locked {
            return Vec::new();
        }
        let prompt = self.input.trim().to_string();
        if prompt.is_empty() {
            return Vec::new();
        }

        self.set_view(ViewMode::Chat);
        self.messages.push(ChatMessage::new(
            Sender::Developer,
            MessageBody::Text(prompt.clone()),
        ));
        self.input.clear();
        self.pending_replies += 1;
        self.chat_scroll = 0;

        vec![Effect::CallRemote {
            purpose: CallPurpose::Chat,
            request: RemoteRequest::new(prompt, None),
        }]
    }

    fn apply_command(&mut self) -> Vec<Effect> {
        let command = self.input.trim().to_string();
        if command.is_empty() || self.input_locked || self.input_mode != InputMode::Prompt {
            return Vec::new();
        }

        self.input_locked = true;
        self.input.clear();
        self.saved_placeholder = Some(std::mem::replace(
            &mut self.placeholder,
            PROCESSING_PLACEHOLDER.to_string(),
        ));

        vec![Effect::CallRemote {
            purpose: CallPurpose::Command,
            request: RemoteRequest::new(command, Some(COMMAND_SYSTEM)),
        }]
    }

    fn submit_folder_path(&mut self) -> Vec<Effect> {
        let raw = self.folder_input.trim().to_string();
        self.input_mode = InputMode::Prompt;
        self.folder_input.clear();

        if raw.is_empty() {
            self.tree_status = Some(NO_FOLDER_STATUS.to_string());
            return Vec::new();
        }
        self.dispatch(Action::OpenFolder(expand_home(&raw)))
    }

    fn receive_chat_reply(&mut self, result: Result<String, RemoteError>) {
        self.pending_replies = self.pending_replies.saturating_sub(1);
        self.chat_scroll = 0;

        match result {
            Ok(text) => {
                for seg in segment(&text) {
                    let body = match seg.kind {
                        SegmentKind::Text => MessageBody::Text(seg.content),
                        SegmentKind::Code => MessageBody::Code {
                            language: seg.language,
                            content: seg.content,
                        },
                    };
                    self.messages
                        .push(ChatMessage::new(Sender::Assistant, body));
                }
            }
            Err(e) => {
                error!(error = %e, "Assistant reply failed");
                self.messages.push(ChatMessage::new(
                    Sender::Assistant,
                    MessageBody::Text(CHAT_ERROR_MESSAGE.to_string()),
                ));
            }
        }
    }

    fn receive_command_reply(&mut self, result: Result<String, RemoteError>) -> Vec<Effect> {
        let (placeholder, after) = match result {
            Ok(text) => {
                info!(output = %text, "Command Center Output");
                let preview: String = text.chars().take(COMMAND_PREVIEW_CHARS).collect();
                (format!("Command Complete: {}...", preview), COMMAND_SUCCESS_RESET)
            }
            Err(e) => {
                error!(error = %e, "Command Center Error");
                (COMMAND_ERROR_PLACEHOLDER.to_string(), COMMAND_ERROR_RESET)
            }
        };
        self.placeholder = placeholder;
        let original = self
            .saved_placeholder
            .take()
            .unwrap_or_else(|| DEFAULT_PLACEHOLDER.to_string());

        vec![Effect::Schedule {
            after,
            action: Action::RestorePlaceholder {
                placeholder: original,
                unlock: true,
            },
        }]
    }

    fn receive_folder(&mut self, result: Result<UploadBatch, UploadError>) {
        let batch = match result {
            Ok(batch) => batch,
            Err(e) => {
                error!(error = %e, "Error reading one or more files");
                self.tree_status = Some(READ_ERROR_STATUS.to_string());
                return;
            }
        };

        if batch.is_empty() {
            self.tree_status = Some(NO_FOLDER_STATUS.to_string());
            return;
        }

        self.files = batch
            .entries
            .into_iter()
            .map(|e| (e.relative_path, e.content))
            .collect();
        self.tree = build_tree(batch.paths.iter().map(String::as_str));
        self.expansion.clear();
        self.tree_cursor = 0;
        self.refresh_rows();
        self.root_name = Some(batch.root_name);
        self.tree_status = None;
        self.editor = EditorState::default();
        self.focus = Focus::Tree;
    }

    fn open_file(&mut self, path: &str, name: &str) {
        self.editor = match self.files.get(path) {
            Some(content) => EditorState {
                title: name.to_string(),
                content: content.clone(),
                path: Some(path.to_string()),
                scroll: 0,
            },
            None => EditorState {
                title: EDITOR_MISSING_TITLE.to_string(),
                content: format!("Could not find content for path: {}", path),
                path: None,
                scroll: 0,
            },
        };
        self.set_view(ViewMode::Editor);
    }

    fn refresh_rows(&mut self) {
        self.rows = render_rows(&self.tree, &self.expansion);
        if self.tree_cursor >= self.rows.len() {
            self.tree_cursor = self.rows.len().saturating_sub(1);
        }
    }
}

/// `~/x` to the home directory
fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::FileEntry;

    fn type_text(session: &mut Session, text: &str) {
        for c in text.chars() {
            session.dispatch(Action::InsertChar(c));
        }
    }

    fn batch() -> UploadBatch {
        UploadBatch {
            root_name: "demo".to_string(),
            paths: vec![
                "demo/README.md".to_string(),
                "demo/src/main.rs".to_string(),
                "demo/src/empty.rs".to_string(),
            ],
            entries: vec![
                FileEntry {
                    relative_path: "README.md".to_string(),
                    content: "# Demo".to_string(),
                },
                FileEntry {
                    relative_path: "src/main.rs".to_string(),
                    content: "fn main() {}".to_string(),
                },
            ],
        }
    }

    fn loaded_session() -> Session {
        let mut session = Session::new();
        session.dispatch(Action::FolderLoaded(Ok(batch())));
        session
    }

    fn exhausted() -> RemoteError {
        RemoteError::ExhaustedRetries {
            attempts: 5,
            last_error: "API returned status 500".to_string(),
        }
    }

    #[test]
    fn test_empty_send_is_ignored() {
        let mut session = Session::new();
        type_text(&mut session, "   ");
        assert!(session.dispatch(Action::Submit).is_empty());
        assert!(session.messages.is_empty());
    }

    #[test]
    fn test_send_switches_to_chat_and_calls_remote() {
        let mut session = Session::new();
        session.set_view(ViewMode::Editor);
        type_text(&mut session, "  how do I sort?  ");

        let effects = session.dispatch(Action::Submit);

        assert_eq!(session.view, ViewMode::Chat);
        assert!(session.input.is_empty());
        assert_eq!(session.pending_replies, 1);
        assert_eq!(
            session.messages[0].body,
            MessageBody::Text("how do I sort?".to_string())
        );
        match effects.as_slice() {
            [Effect::CallRemote { purpose, request }] => {
                assert_eq!(*purpose, CallPurpose::Chat);
                assert_eq!(request.prompt, "how do I sort?");
            }
            other => panic!("unexpected effects: {:?}", other),
        }
    }

    #[test]
    fn test_chat_reply_is_segmented() {
        let mut session = Session::new();
        type_text(&mut session, "example?");
        session.dispatch(Action::Submit);

        session.dispatch(Action::RemoteReplied {
            purpose: CallPurpose::Chat,
            result: Ok("Try this:\n```rust\nv.sort();\n```\nDone.".to_string()),
        });

        assert_eq!(session.pending_replies, 0);
        let bodies: Vec<&MessageBody> = session.messages[1..].iter().map(|m| &m.body).collect();
        assert_eq!(
            bodies,
            vec![
                &MessageBody::Text("Try this:".to_string()),
                &MessageBody::Code {
                    language: Some("rust".to_string()),
                    content: "v.sort();".to_string()
                },
                &MessageBody::Text("Done.".to_string()),
            ]
        );
        assert!(session.messages[1..]
            .iter()
            .all(|m| m.sender == Sender::Assistant));
    }

    #[test]
    fn test_chat_failure_shows_generic_message() {
        let mut session = Session::new();
        type_text(&mut session, "hello");
        session.dispatch(Action::Submit);
        session.dispatch(Action::RemoteReplied {
            purpose: CallPurpose::Chat,
            result: Err(exhausted()),
        });

        let last = session.messages.last().unwrap();
        assert_eq!(last.sender, Sender::Assistant);
        assert_eq!(last.body, MessageBody::Text(CHAT_ERROR_MESSAGE.to_string()));
    }

    #[test]
    fn test_command_locks_input_until_restored() {
        let mut session = Session::new();
        type_text(&mut session, "deploy staging");

        let effects = session.dispatch(Action::ApplyCommand);
        assert!(session.input_locked);
        assert!(session.input.is_empty());
        assert_eq!(session.placeholder, PROCESSING_PLACEHOLDER);
        match effects.as_slice() {
            [Effect::CallRemote { purpose, request }] => {
                assert_eq!(*purpose, CallPurpose::Command);
                assert_eq!(request.system_instruction, COMMAND_SYSTEM);
            }
            other => panic!("unexpected effects: {:?}", other),
        }

        // Locked input ignores typing and a second command
        type_text(&mut session, "again");
        assert!(session.input.is_empty());
        assert!(session.dispatch(Action::ApplyCommand).is_empty());

        let long_reply = "x".repeat(80);
        let effects = session.dispatch(Action::RemoteReplied {
            purpose: CallPurpose::Command,
            result: Ok(long_reply),
        });
        assert_eq!(
            session.placeholder,
            format!("Command Complete: {}...", "x".repeat(50))
        );
        let Some(Effect::Schedule { after, action }) = effects.into_iter().next() else {
            panic!("expected a scheduled restore");
        };
        assert_eq!(after, COMMAND_SUCCESS_RESET);

        session.dispatch(action);
        assert!(!session.input_locked);
        assert_eq!(session.placeholder, DEFAULT_PLACEHOLDER);
    }

    #[test]
    fn test_command_failure_restores_after_five_seconds() {
        let mut session = Session::new();
        type_text(&mut session, "status");
        session.dispatch(Action::ApplyCommand);

        let effects = session.dispatch(Action::RemoteReplied {
            purpose: CallPurpose::Command,
            result: Err(exhausted()),
        });

        assert_eq!(session.placeholder, COMMAND_ERROR_PLACEHOLDER);
        assert!(matches!(
            effects.as_slice(),
            [Effect::Schedule { after, .. }] if *after == COMMAND_ERROR_RESET
        ));
        assert!(session.input_locked);
    }

    #[test]
    fn test_command_restores_placeholder_it_replaced() {
        let mut session = Session::new();
        session.dispatch(Action::Run);
        type_text(&mut session, "build");
        session.dispatch(Action::ApplyCommand);

        let effects = session.dispatch(Action::RemoteReplied {
            purpose: CallPurpose::Command,
            result: Ok("ok".to_string()),
        });
        assert!(matches!(
            effects.as_slice(),
            [Effect::Schedule {
                action: Action::RestorePlaceholder { placeholder, unlock: true },
                ..
            }] if placeholder == RUN_PLACEHOLDER
        ));
    }

    #[test]
    fn test_run_only_touches_placeholder() {
        let mut session = Session::new();
        type_text(&mut session, "keep me");

        let effects = session.dispatch(Action::Run);
        assert_eq!(session.placeholder, RUN_PLACEHOLDER);
        let Some(Effect::Schedule { after, action }) = effects.into_iter().next() else {
            panic!("expected a scheduled restore");
        };
        assert_eq!(after, RUN_RESET);

        session.dispatch(action);
        assert_eq!(session.placeholder, DEFAULT_PLACEHOLDER);
        assert_eq!(session.input, "keep me");
    }

    #[test]
    fn test_open_file_shows_content_and_switches_view() {
        let mut session = loaded_session();
        assert_eq!(session.view, ViewMode::Chat);

        session.dispatch(Action::OpenFile {
            path: "src/main.rs".to_string(),
            name: "main.rs".to_string(),
        });
        assert_eq!(session.view, ViewMode::Editor);
        assert_eq!(session.editor.title, "main.rs");
        assert_eq!(session.editor.content, "fn main() {}");

        session.dispatch(Action::OpenFile {
            path: "README.md".to_string(),
            name: "README.md".to_string(),
        });
        assert_eq!(session.view, ViewMode::Editor);
        assert_eq!(session.editor.content, "# Demo");
    }

    #[test]
    fn test_open_file_without_content_reports_missing() {
        let mut session = loaded_session();
        session.dispatch(Action::OpenFile {
            path: "src/empty.rs".to_string(),
            name: "empty.rs".to_string(),
        });

        assert_eq!(session.view, ViewMode::Editor);
        assert_eq!(session.editor.title, EDITOR_MISSING_TITLE);
        assert_eq!(
            session.editor.content,
            "Could not find content for path: src/empty.rs"
        );
    }

    #[test]
    fn test_tree_navigation_and_activation() {
        let mut session = loaded_session();
        let names: Vec<&str> = session.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["src", "empty.rs", "main.rs", "README.md"]);
        assert_eq!(session.focus, Focus::Tree);

        // Collapse src
        session.dispatch(Action::ActivateRow);
        assert_eq!(session.rows.len(), 2);

        session.dispatch(Action::MoveCursor(5));
        assert_eq!(session.tree_cursor, 1);
        session.dispatch(Action::ActivateRow);
        assert_eq!(session.editor.title, "README.md");
        assert_eq!(session.view, ViewMode::Editor);

        session.dispatch(Action::MoveCursor(-9));
        assert_eq!(session.tree_cursor, 0);
    }

    #[test]
    fn test_folder_lifecycle() {
        let mut session = loaded_session();
        assert_eq!(session.root_name.as_deref(), Some("demo"));
        assert_eq!(session.stored_file_count(), 2);

        let effects = session.dispatch(Action::OpenFolder(PathBuf::from("/elsewhere")));
        assert!(matches!(effects.as_slice(), [Effect::ReadFolder(_)]));
        assert_eq!(session.stored_file_count(), 0);
        assert!(session.rows.is_empty());
        assert_eq!(session.tree_status.as_deref(), Some(READING_STATUS));

        session.dispatch(Action::FolderLoaded(Err(UploadError::NotAFolder(
            PathBuf::from("/elsewhere"),
        ))));
        assert_eq!(session.tree_status.as_deref(), Some(READ_ERROR_STATUS));
        assert!(session.tree.is_empty());

        session.dispatch(Action::FolderLoaded(Ok(UploadBatch::default())));
        assert_eq!(session.tree_status.as_deref(), Some(NO_FOLDER_STATUS));
    }

    #[test]
    fn test_folder_prompt_submits_path() {
        let mut session = Session::new();
        type_text(&mut session, "draft");
        session.dispatch(Action::PromptFolder);
        type_text(&mut session, "/tmp/project");

        let effects = session.dispatch(Action::Submit);
        assert_eq!(session.input_mode, InputMode::Prompt);
        assert_eq!(session.input, "draft");
        match effects.as_slice() {
            [Effect::ReadFolder(path)] => assert_eq!(path, &PathBuf::from("/tmp/project")),
            other => panic!("unexpected effects: {:?}", other),
        }
    }

    #[test]
    fn test_set_view_is_idempotent() {
        let mut session = Session::new();
        session.set_view(ViewMode::Editor);
        session.set_view(ViewMode::Editor);
        assert!(session.is_view_active(ViewMode::Editor));
        assert!(!session.is_view_active(ViewMode::Chat));
    }

    #[test]
    fn test_editor_scroll_stops_at_last_page() {
        let content: String = (1..=30).map(|i| format!("line {i}\n")).collect();
        let mut session = Session::new();
        session.dispatch(Action::FolderLoaded(Ok(UploadBatch {
            root_name: "demo".to_string(),
            paths: vec!["demo/long.rs".to_string()],
            entries: vec![FileEntry {
                relative_path: "long.rs".to_string(),
                content,
            }],
        })));
        session.dispatch(Action::OpenFile {
            path: "long.rs".to_string(),
            name: "long.rs".to_string(),
        });
        session.set_viewport(Viewport {
            height: 10,
            chat_lines: None,
        });

        session.dispatch(Action::Scroll(100));
        assert_eq!(session.editor.scroll, 20);

        // Scrolling back moves right away
        session.dispatch(Action::Scroll(-5));
        assert_eq!(session.editor.scroll, 15);

        session.dispatch(Action::Scroll(-100));
        assert_eq!(session.editor.scroll, 0);
    }

    #[test]
    fn test_chat_scroll_stops_at_first_line() {
        let mut session = Session::new();
        session.set_viewport(Viewport {
            height: 10,
            chat_lines: Some(25),
        });

        session.dispatch(Action::Scroll(-100));
        assert_eq!(session.chat_scroll, 15);

        session.dispatch(Action::Scroll(5));
        assert_eq!(session.chat_scroll, 10);

        // A shorter transcript or a taller pane pulls the offset back in
        session.set_viewport(Viewport {
            height: 10,
            chat_lines: Some(12),
        });
        assert_eq!(session.chat_scroll, 2);

        // An editor frame keeps the last transcript length
        session.set_viewport(Viewport {
            height: 11,
            chat_lines: None,
        });
        assert_eq!(session.chat_scroll, 1);
    }

    #[test]
    fn test_scroll_without_a_drawn_frame_stays_put() {
        let mut session = Session::new();
        session.dispatch(Action::Scroll(-20));
        assert_eq!(session.chat_scroll, 0);
    }

    #[test]
    fn test_identity_badge() {
        let mut session = Session::new();
        session.dispatch(Action::IdentityResolved(Some(UserHandle::new(
            "0123456789abcdef",
        ))));
        assert_eq!(session.user_badge.as_deref(), Some("User ID: 01234567..."));

        session.dispatch(Action::IdentityResolved(None));
        assert!(session.user_badge.is_none());
    }
}
