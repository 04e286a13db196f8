use super::SessionState;
use crate::core::error::ChatError;
use crate::shopping::{SearchReport, SearchRequest, demo_listings};

use console::style;

pub trait CommandHandler: Send + Sync {
    fn execute(&self, state: &mut SessionState, args: &[&str])
    -> Result<Option<String>, ChatError>;
    fn help(&self) -> &'static str;
}

pub struct QuitCommand;
pub struct HelpCommand;
pub struct ModelCommand;
pub struct SearchCommand;

impl CommandHandler for QuitCommand {
    fn execute(
        &self,
        state: &mut SessionState,
        _args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        state.should_continue = false;
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/quit - Exit the chat"
    }
}

impl CommandHandler for HelpCommand {
    fn execute(
        &self,
        _state: &mut SessionState,
        _args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        let title = style("Available Commands").bold().underlined();
        let help_text = [
            title.to_string(),
            HelpCommand.help().to_string(),
            ModelCommand.help().to_string(),
            SearchCommand.help().to_string(),
            QuitCommand.help().to_string(),
            "Anything else is sent to the assistant as a new question.".to_string(),
        ]
        .join("\n");

        Ok(Some(help_text))
    }

    fn help(&self) -> &'static str {
        "/help - Show available commands"
    }
}

impl CommandHandler for ModelCommand {
    fn execute(
        &self,
        state: &mut SessionState,
        _args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        Ok(Some(format!("Model: {} ({})", state.model, state.host)))
    }

    fn help(&self) -> &'static str {
        "/model - Show the model and endpoint in use"
    }
}

impl CommandHandler for SearchCommand {
    fn execute(
        &self,
        _state: &mut SessionState,
        args: &[&str],
    ) -> Result<Option<String>, ChatError> {
        let request = SearchRequest::parse(args)?;
        tracing::debug!(query = %request.query, max = request.max_results, "demo search");
        let report = SearchReport::build(&request, demo_listings(&request.query));
        Ok(Some(report.render()))
    }

    fn help(&self) -> &'static str {
        "/search <product> [--max N] - Compare demo prices for a product"
    }
}
