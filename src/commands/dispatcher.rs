use super::{
    SessionState,
    handler::{HelpCommand, ModelCommand, QuitCommand, SearchCommand},
    registry::CommandRegistry,
};
use crate::core::error::ChatError;
use std::sync::Arc;

#[derive(Clone)]
pub struct CommandDispatcher {
    registry: Arc<CommandRegistry>,
}

impl CommandDispatcher {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    pub fn execute(
        &self,
        command: &str,
        args: &[&str],
        state: &mut SessionState,
    ) -> Result<Option<String>, ChatError> {
        self.registry.execute(command, args, state)
    }

    pub fn get_command_names(&self) -> Vec<String> {
        self.registry.get_command_names()
    }
}

/// Splits `/name arg1 arg2` into its parts. Lines not starting with `/`, and a
/// bare `/`, are not commands.
pub fn parse_command(line: &str) -> Option<(&str, Vec<&str>)> {
    let rest = line.trim().strip_prefix('/')?;
    let mut parts = rest.split_whitespace();
    let name = parts.next()?;
    Some((name, parts.collect()))
}

pub fn create_command_registry() -> CommandDispatcher {
    let mut registry = CommandRegistry::new();

    registry.register("quit", QuitCommand);
    registry.register("help", HelpCommand);
    registry.register("model", ModelCommand);
    registry.register("search", SearchCommand);

    CommandDispatcher::new(Arc::new(registry))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_only() {
        assert_eq!(parse_command("/model"), Some(("model", vec![])));
        assert_eq!(parse_command("  /help me now "), Some(("help", vec!["me", "now"])));
        assert_eq!(parse_command("/"), None);
        assert_eq!(parse_command("price of /dev/null"), None);
    }

    #[test]
    fn quit_stops_the_session() {
        let dispatcher = create_command_registry();
        let mut state = SessionState::new("gemini-2.0-flash", "example.com");

        assert_eq!(dispatcher.execute("quit", &[], &mut state).unwrap(), None);
        assert!(!state.should_continue);
    }

    #[test]
    fn model_reports_without_credential() {
        let dispatcher = create_command_registry();
        let mut state = SessionState::new("gemini-2.0-flash", "generativelanguage.googleapis.com");

        let out = dispatcher.execute("model", &[], &mut state).unwrap().unwrap();
        assert_eq!(out, "Model: gemini-2.0-flash (generativelanguage.googleapis.com)");
        assert!(state.should_continue);
    }

    #[test]
    fn unknown_command_is_an_input_error() {
        let dispatcher = create_command_registry();
        let mut state = SessionState::new("m", "h");

        let err = dispatcher.execute("clear", &[], &mut state).unwrap_err();
        assert!(matches!(err, ChatError::Input(ref msg) if msg.contains("/clear")));
    }

    #[test]
    fn names_are_sorted_for_completion() {
        assert_eq!(
            create_command_registry().get_command_names(),
            vec!["help", "model", "quit", "search"]
        );
    }

    #[test]
    fn search_reports_demo_prices() {
        let dispatcher = create_command_registry();
        let mut state = SessionState::new("m", "h");

        let out = dispatcher
            .execute("search", &["wireless", "mouse"], &mut state)
            .unwrap()
            .unwrap();
        assert!(out.contains("Results for \"wireless mouse\""));
        assert!(out.contains("Best deal: Amazon ₹1999.00"));

        let err = dispatcher.execute("search", &[], &mut state).unwrap_err();
        assert!(matches!(err, ChatError::Input(_)));
        assert!(state.should_continue);
    }
}
