use crate::commands::dispatcher::CommandDispatcher;
use crate::config::Config;
use crate::core::error::ChatError;

use console::style;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::FileHistory;
use rustyline::validate::Validator;
use rustyline::{
    Cmd, CompletionType, Config as EditorConfig, Context, EditMode, Editor, EventHandler,
    ExternalPrinter, Helper, KeyCode, KeyEvent, Modifiers,
};
use std::borrow::Cow;
use std::thread::{self, JoinHandle};
use tokio::sync::mpsc;

type ChatEditor = Editor<ChatHelper, FileHistory>;

/// Completes slash commands; everything else is free text.
pub struct ChatHelper {
    commands: CommandDispatcher,
    history_hinter: HistoryHinter,
}

impl ChatHelper {
    pub fn new(commands: CommandDispatcher) -> Self {
        Self {
            commands,
            history_hinter: HistoryHinter {},
        }
    }

    fn complete_command(&self, line: &str, pos: usize) -> Vec<Pair> {
        let Some(typed) = line.get(1..pos) else {
            return Vec::new();
        };
        if !line.starts_with('/') || typed.contains(char::is_whitespace) {
            return Vec::new();
        }
        self.commands
            .get_command_names()
            .into_iter()
            .filter(|cmd| cmd.starts_with(typed))
            .map(|cmd| Pair {
                display: format!("/{}", cmd),
                replacement: cmd,
            })
            .collect()
    }
}

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        // Replacement starts after the '/'.
        Ok((1, self.complete_command(line, pos)))
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        // History only holds commands.
        if !line.starts_with('/') {
            return None;
        }
        self.history_hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for ChatHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(style(hint).dim().to_string())
    }
}

impl Validator for ChatHelper {}

/// Creates the line editor. Enter submits; Alt-Enter puts a newline into the
/// draft instead.
pub fn create_editor(commands: CommandDispatcher) -> Result<ChatEditor, ChatError> {
    let config = EditorConfig::builder()
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .edit_mode(EditMode::Emacs)
        .build();

    let mut editor = Editor::with_config(config)
        .map_err(|e| ChatError::Input(format!("Failed to create line editor: {}", e)))?;
    editor.set_helper(Some(ChatHelper::new(commands)));
    editor.bind_sequence(
        KeyEvent(KeyCode::Enter, Modifiers::ALT),
        EventHandler::Simple(Cmd::Newline),
    );

    let _ = editor.load_history(&Config::history_path());
    Ok(editor)
}

fn prompt() -> String {
    if cfg!(windows) && std::env::var("PSModulePath").is_ok() {
        "> ".to_string()
    } else {
        style("> ").bold().cyan().to_string()
    }
}

/// Saves the editor history
fn save_history(editor: &mut ChatEditor) -> Result<(), ChatError> {
    let history_path = Config::history_path();

    if let Some(parent) = history_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    editor
        .save_history(&history_path)
        .map_err(|e| ChatError::Input(format!("Failed to save history: {}", e)))
}

#[derive(Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// A line the user submitted with Enter.
    Line(String),
    /// Ctrl-C, Ctrl-D or a terminal error ended input.
    Closed,
}

/// The loop's end of the editor thread.
///
/// Every `Line` must be answered with [`InputHandle::answer`] before the
/// editor shows the next prompt. Passing back text pre-fills the next prompt
/// with it, which is how a rejected draft survives.
pub struct InputHandle {
    events: mpsc::Receiver<InputEvent>,
    answers: mpsc::Sender<Option<String>>,
    thread: JoinHandle<()>,
}

impl InputHandle {
    /// Starts the editor on its own thread. Returns the handle and a printer
    /// that writes above the live prompt.
    pub fn spawn(
        commands: CommandDispatcher,
    ) -> Result<(Self, Box<dyn ExternalPrinter + Send>), ChatError> {
        let (event_tx, events) = mpsc::channel(1);
        let (answers, answer_rx) = mpsc::channel(1);
        let (printer_tx, printer_rx) = std::sync::mpsc::channel();

        let thread = thread::Builder::new()
            .name("shopchat-input".to_string())
            .spawn(move || {
                let mut editor = match create_editor(commands) {
                    Ok(editor) => editor,
                    Err(e) => {
                        let _ = printer_tx.send(Err(e));
                        return;
                    }
                };
                match editor.create_external_printer() {
                    Ok(printer) => {
                        let printer: Box<dyn ExternalPrinter + Send> = Box::new(printer);
                        let _ = printer_tx.send(Ok(printer));
                    }
                    Err(e) => {
                        let _ = printer_tx.send(Err(ChatError::from(e)));
                        return;
                    }
                }
                run_editor(editor, event_tx, answer_rx);
            })?;

        let printer = printer_rx
            .recv()
            .map_err(|_| ChatError::Input("Input thread exited during startup".to_string()))??;

        Ok((
            Self {
                events,
                answers,
                thread,
            },
            printer,
        ))
    }

    pub async fn next(&mut self) -> InputEvent {
        self.events.recv().await.unwrap_or(InputEvent::Closed)
    }

    pub async fn answer(&self, keep: Option<String>) {
        if self.answers.send(keep).await.is_err() {
            tracing::debug!("input thread already gone");
        }
    }

    /// Lets the editor thread save its history and exit. Only call while the
    /// thread is waiting for an answer or has already closed.
    pub fn shutdown(self) {
        let Self {
            events,
            answers,
            thread,
        } = self;
        drop(answers);
        drop(events);
        if thread.join().is_err() {
            tracing::warn!("input thread panicked");
        }
    }
}

fn run_editor(
    mut editor: ChatEditor,
    events: mpsc::Sender<InputEvent>,
    mut answers: mpsc::Receiver<Option<String>>,
) {
    let mut initial = String::new();
    loop {
        let line = match editor.readline_with_initial(&prompt(), (initial.as_str(), "")) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                tracing::warn!(error = %e, "line editor failed");
                break;
            }
        };

        if line.trim_start().starts_with('/') {
            let _ = editor.add_history_entry(line.as_str());
        }

        if events.blocking_send(InputEvent::Line(line)).is_err() {
            break;
        }
        match answers.blocking_recv() {
            Some(keep) => initial = keep.unwrap_or_default(),
            None => break,
        }
    }

    if let Err(e) = save_history(&mut editor) {
        tracing::debug!(error = %e, "could not save input history");
    }
    let _ = events.blocking_send(InputEvent::Closed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create_command_registry;

    fn replacements(line: &str) -> Vec<String> {
        ChatHelper::new(create_command_registry())
            .complete_command(line, line.len())
            .into_iter()
            .map(|p| p.replacement)
            .collect()
    }

    #[test]
    fn completes_command_prefixes() {
        assert_eq!(replacements("/"), vec!["help", "model", "quit", "search"]);
        assert_eq!(replacements("/mo"), vec!["model"]);
        assert!(replacements("/zzz").is_empty());
    }

    #[test]
    fn alt_enter_inserts_newline_and_enter_submits() {
        let mut editor = create_editor(create_command_registry()).unwrap();

        let alt_enter = editor.unbind_sequence(KeyEvent(KeyCode::Enter, Modifiers::ALT));
        assert!(matches!(alt_enter, Some(EventHandler::Simple(Cmd::Newline))));

        // Plain Enter keeps the default accept-line binding.
        assert!(editor
            .unbind_sequence(KeyEvent(KeyCode::Enter, Modifiers::NONE))
            .is_none());
    }

    #[test]
    fn leaves_free_text_alone() {
        assert!(replacements("").is_empty());
        assert!(replacements("cheap headphones").is_empty());
        assert!(replacements("/model extra").is_empty());
    }
}
