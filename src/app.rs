use crate::cli::Args;
use crate::commands::{SessionState, dispatcher::CommandDispatcher, dispatcher::parse_command};
use crate::core::error::ChatError;
use crate::display::{self, Surface};
use crate::input::{InputEvent, InputHandle};
use crate::providers::InferenceClient;
use crate::widget::controller::Rejection;
use crate::widget::transcript::RowKind;
use crate::widget::{ChatWidget, PendingReply};
use futures::future::OptionFuture;
use is_terminal::IsTerminal;
use std::io::{self, Read};
use std::sync::Arc;

pub struct Application {
    pub args: Args,
    pub widget: ChatWidget,
    pub session: SessionState,
    pub command_dispatcher: CommandDispatcher,
}

/// What the editor should do after a line has been handled.
#[derive(Debug, PartialEq, Eq)]
enum Next {
    /// Show the prompt again, pre-filled with the given text.
    Prompt(Option<String>),
    Quit,
}

impl Application {
    pub fn new(
        args: Args,
        client: Arc<dyn InferenceClient>,
        session: SessionState,
        command_dispatcher: CommandDispatcher,
    ) -> Self {
        Self {
            args,
            widget: ChatWidget::new(client),
            session,
            command_dispatcher,
        }
    }

    pub async fn run(&mut self) -> Result<(), ChatError> {
        let context = if !io::stdin().is_terminal() {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| ChatError::Input(format!("Failed to read from stdin: {}", e)))?;
            Some(buffer).filter(|b| !b.trim().is_empty())
        } else {
            None
        };

        if self.args.query.is_some() || context.is_some() {
            self.handle_one_shot(context).await
        } else {
            self.handle_interactive().await
        }
    }

    async fn handle_one_shot(&mut self, context: Option<String>) -> Result<(), ChatError> {
        let query = compose_query(self.args.query.as_deref(), context)
            .ok_or_else(|| ChatError::Input("No query provided".to_string()))?;

        let mut transcript = self.widget.transcript();
        self.widget.set_draft(query);
        if let Err(reason) = self.widget.submit().await {
            return Err(ChatError::Input(match reason {
                Rejection::EmptyDraft => "Query is empty".to_string(),
                Rejection::Busy => "A request is already in flight".to_string(),
            }));
        }

        let mut rows = transcript.reveal(self.widget.conversation().messages());
        rows.retain(|row| row.kind == RowKind::Assistant);
        Surface::Stdout.emit(&rows);
        Ok(())
    }

    async fn handle_interactive(&mut self) -> Result<(), ChatError> {
        display::display_banner(&self.session.model);

        let (mut input, printer) = InputHandle::spawn(self.command_dispatcher.clone())?;
        let mut surface = Surface::Printer(printer);
        let mut transcript = self.widget.transcript();
        let mut pending: Option<PendingReply> = None;
        let mut observing = true;

        loop {
            tokio::select! {
                event = input.next() => match event {
                    InputEvent::Line(line) => match self.handle_line(line, &mut pending, &mut surface) {
                        Next::Prompt(keep) => input.answer(keep).await,
                        Next::Quit => break,
                    },
                    InputEvent::Closed => break,
                },
                Some(reply) = OptionFuture::from(pending.as_mut()), if pending.is_some() => {
                    pending = None;
                    self.widget.settle(reply);
                }
                alive = transcript.changed(), if observing => {
                    if alive {
                        surface.emit(&transcript.reveal(self.widget.conversation().messages()));
                    } else {
                        observing = false;
                    }
                }
            }
        }

        if self.widget.is_busy() {
            tracing::debug!("exiting with a request in flight");
        }
        input.shutdown();
        Ok(())
    }

    fn handle_line(
        &mut self,
        line: String,
        pending: &mut Option<PendingReply>,
        surface: &mut Surface,
    ) -> Next {
        if let Some((name, args)) = parse_command(&line) {
            match self
                .command_dispatcher
                .execute(name, &args, &mut self.session)
            {
                Ok(Some(output)) => surface.notice(&output),
                Ok(None) => {}
                Err(e) => surface.error(&e.to_string()),
            }
            return if self.session.should_continue {
                Next::Prompt(None)
            } else {
                Next::Quit
            };
        }

        self.widget.set_draft(line);
        match self.widget.dispatch() {
            Ok(request) => {
                *pending = Some(request);
                Next::Prompt(None)
            }
            Err(Rejection::Busy) => Next::Prompt(Some(self.widget.draft().to_string())),
            Err(Rejection::EmptyDraft) => Next::Prompt(None),
        }
    }
}

/// Joins an explicit query with piped stdin, the way the prompt is sent.
fn compose_query(query: Option<&str>, context: Option<String>) -> Option<String> {
    match (query, context) {
        (Some(q), Some(ctx)) => Some(format!("<pipe>{}</pipe>\n\n{}", ctx, q)),
        (None, Some(ctx)) => Some(format!("<pipe>{}</pipe>", ctx)),
        (Some(q), None) => Some(q.to_string()),
        (None, None) => None,
    }
}
