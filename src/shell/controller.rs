use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::functions::FunctionPanel;
use super::output::OutputPanel;
use crate::bridge::{BridgeClient, FileOpenResult, SaveTarget, WriteOutcome, host};
use crate::editor::Editor;
use crate::language::LanguageRegistry;
use crate::service::{Executor, FunctionDirectory, RunResult, ServiceError};
use crate::theme;

/// Text shown in a fresh session
pub const WELCOME_TEXT: &str = "# Welcome to OpenCode IDE\nprint hi";

/// Shell-level commands produced by key handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellAction {
    Run,
    NewFile,
    Open,
    Save,
    SaveAs,
    ToggleTheme,
    InsertFunction,
    Quit,
}

/// Results delivered back to the event loop by background tasks
#[derive(Debug)]
pub enum ShellEvent {
    RunFinished { id: u64, result: RunResult },
    FunctionsLoaded(Result<Vec<String>, ServiceError>),
}

/// Where a save is in its round trips
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveState {
    #[default]
    Idle,
    AwaitingTarget,
    AwaitingWrite { path: PathBuf },
}

/// Collaborators reached across process or trust boundaries
pub struct Services {
    pub executor: Arc<dyn Executor>,
    pub directory: Arc<dyn FunctionDirectory>,
    pub bridge: BridgeClient,
}

struct ActiveRun {
    id: u64,
    handle: JoinHandle<()>,
}

/// Owns the document and every panel; the only writer of either
pub struct Shell {
    pub editor: Editor,
    pub output: OutputPanel,
    pub functions: FunctionPanel,
    pub registry: LanguageRegistry,
    theme: String,
    save_state: SaveState,
    services: Services,
    events: mpsc::UnboundedSender<ShellEvent>,
    run_seq: u64,
    active_run: Option<ActiveRun>,
    running: bool,
}

impl Shell {
    pub fn new(
        services: Services,
        registry: LanguageRegistry,
        theme: &str,
    ) -> (Self, mpsc::UnboundedReceiver<ShellEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let mut shell = Self {
            editor: Editor::new(),
            output: OutputPanel::default(),
            functions: FunctionPanel::default(),
            registry,
            theme: theme.to_string(),
            save_state: SaveState::default(),
            services,
            events,
            run_seq: 0,
            active_run: None,
            running: true,
        };
        let language = shell.language_for(Path::new(&host::untitled_name()));
        shell.editor.set_document(WELCOME_TEXT, None, language);
        (shell, rx)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// `Ln X, Col Y` for the status line
    pub fn cursor_status(&self) -> String {
        self.editor.cursor_status()
    }

    /// File name shown for the document, `untitled.oc` until saved
    pub fn document_name(&self) -> String {
        self.editor
            .path()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(host::untitled_name)
    }

    fn language_for(&self, path: &Path) -> Option<String> {
        self.registry.language_for_path(path).map(str::to_string)
    }

    fn notice(&mut self, msg: impl Into<String>) {
        self.output = OutputPanel::Notice(msg.into());
    }

    /// Whether `action` will show a file picker and so needs the terminal.
    /// A plain save of a document that already has a path writes directly.
    pub fn needs_terminal(&self, action: ShellAction) -> bool {
        match action {
            ShellAction::Open | ShellAction::SaveAs => true,
            ShellAction::Save => self.editor.path().is_none(),
            _ => false,
        }
    }

    pub async fn perform(&mut self, action: ShellAction) {
        tracing::debug!(?action, save_state = ?self.save_state, "shell action");
        match action {
            ShellAction::Run => {
                self.begin_run();
            }
            ShellAction::NewFile => self.new_file(),
            ShellAction::Open => self.open().await,
            ShellAction::Save => self.save().await,
            ShellAction::SaveAs => self.save_as().await,
            ShellAction::ToggleTheme => self.toggle_theme(),
            ShellAction::InsertFunction => self.insert_selected_function(),
            ShellAction::Quit => self.quit(),
        }
    }

    pub fn handle_event(&mut self, event: ShellEvent) {
        match event {
            ShellEvent::RunFinished { id, result } => self.finish_run(id, result),
            ShellEvent::FunctionsLoaded(result) => self.apply_functions(result),
        }
    }

    pub fn quit(&mut self) {
        if let Some(run) = self.active_run.take() {
            run.handle.abort();
        }
        self.running = false;
    }

    pub fn new_file(&mut self) {
        let language = self.language_for(Path::new(&host::untitled_name()));
        self.editor.set_document("", None, language);
        self.notice("New file ready.");
    }

    pub fn toggle_theme(&mut self) {
        self.theme = theme::toggled(&self.theme).to_string();
        tracing::debug!(theme = %self.theme, "theme toggled");
    }

    pub async fn open(&mut self) {
        match self.services.bridge.open_file().await {
            Ok(FileOpenResult::Opened { path, content }) => {
                let language = self.language_for(&path);
                self.editor.set_document(&content, Some(path.clone()), language);
                self.notice(format!("Opened: {}", path.display()));
            }
            Ok(FileOpenResult::Canceled) => self.notice("Open canceled."),
            Ok(FileOpenResult::Failed { error }) => self.output = OutputPanel::Error(error),
            Err(e) => self.output = OutputPanel::Error(e.to_string()),
        }
    }

    /// Write to the known path, or ask for one if the document was never saved
    pub async fn save(&mut self) {
        match self.editor.path().map(Path::to_path_buf) {
            Some(path) => self.write_to(path, false).await,
            None => self.save_as().await,
        }
    }

    pub async fn save_as(&mut self) {
        self.save_state = SaveState::AwaitingTarget;
        let default_name = self.document_name();

        match self.services.bridge.choose_save_target(&default_name).await {
            Ok(SaveTarget::Chosen { file_path }) => self.write_to(file_path, true).await,
            Ok(SaveTarget::Canceled) => {
                self.save_state = SaveState::Idle;
                self.notice("Save canceled.");
            }
            Ok(SaveTarget::Failed { error }) => {
                self.save_state = SaveState::Idle;
                self.output = OutputPanel::Error(error);
            }
            Err(e) => {
                self.save_state = SaveState::Idle;
                self.output = OutputPanel::Error(e.to_string());
            }
        }
    }

    async fn write_to(&mut self, path: PathBuf, save_as: bool) {
        self.save_state = SaveState::AwaitingWrite { path: path.clone() };
        let content = self.editor.text();
        let outcome = self.services.bridge.write_file(&path, &content).await;
        self.save_state = SaveState::Idle;

        match outcome {
            Ok(WriteOutcome::Written { path }) => {
                let language = self.language_for(&path);
                let shown = path.display().to_string();
                self.editor.mark_saved(path, language);
                if save_as {
                    self.notice(format!("Saved as {}", shown));
                } else {
                    self.notice(format!("Saved {}", shown));
                }
            }
            Ok(WriteOutcome::Failed { error }) => self.output = OutputPanel::Error(error),
            Err(e) => self.output = OutputPanel::Error(e.to_string()),
        }
    }

    /// Send the buffer to the execution service. A run already in flight is
    /// aborted and its result, should it still arrive, is ignored.
    pub fn begin_run(&mut self) -> u64 {
        self.run_seq += 1;
        let id = self.run_seq;

        if let Some(previous) = self.active_run.take() {
            previous.handle.abort();
            tracing::debug!(run_id = previous.id, "superseded run aborted");
        }

        let code = self.editor.text();
        tracing::info!(run_id = id, bytes = code.len(), "run started");

        let executor = Arc::clone(&self.services.executor);
        let events = self.events.clone();
        let handle = tokio::spawn(async move {
            let result = executor.run(&code).await;
            let _ = events.send(ShellEvent::RunFinished { id, result });
        });

        self.active_run = Some(ActiveRun { id, handle });
        self.output = OutputPanel::Running;
        id
    }

    pub fn finish_run(&mut self, id: u64, result: RunResult) {
        if self.active_run.as_ref().map(|run| run.id) != Some(id) {
            tracing::debug!(run_id = id, "stale run result ignored");
            return;
        }
        self.active_run = None;

        self.output = match result {
            Ok(output) => {
                tracing::info!(run_id = id, bytes = output.len(), "run finished");
                OutputPanel::Program(output)
            }
            Err(e) => {
                tracing::warn!(run_id = id, error = %e, "run failed");
                OutputPanel::Error(e.to_string())
            }
        };
    }

    /// Fetch the function list once in the background
    pub fn load_functions(&mut self) {
        self.functions = FunctionPanel::Loading;
        let directory = Arc::clone(&self.services.directory);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = directory.list_functions().await;
            let _ = events.send(ShellEvent::FunctionsLoaded(result));
        });
    }

    pub fn apply_functions(&mut self, result: Result<Vec<String>, ServiceError>) {
        self.functions = match result {
            Ok(names) => {
                tracing::info!(count = names.len(), "functions loaded");
                FunctionPanel::loaded(names)
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load functions");
                FunctionPanel::Failed
            }
        };
    }

    /// Report the startup health check unless something else is already shown
    pub fn apply_ping(&mut self, service_url: &str, result: Result<String, ServiceError>) {
        match &result {
            Ok(reply) => tracing::info!(url = service_url, reply = %reply, "execution service reachable"),
            Err(e) => tracing::warn!(url = service_url, error = %e, "execution service unreachable"),
        }
        if self.output != OutputPanel::Empty {
            return;
        }
        self.output = match result {
            Ok(_) => OutputPanel::Notice(format!("Execution service ready at {}", service_url)),
            Err(e) => OutputPanel::Error(format!("execution service unavailable: {}", e)),
        };
    }

    /// Append the selected function on a new line
    pub fn insert_selected_function(&mut self) {
        let Some(name) = self.functions.selected_name().map(str::to_string) else {
            return;
        };
        self.editor.append_text(&format!("\n{} ", name));
    }
}
