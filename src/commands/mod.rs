pub mod dispatcher;
pub mod handler;
pub mod registry;

pub use dispatcher::create_command_registry;

/// What slash commands may look at or change. Commands never touch the
/// conversation.
pub struct SessionState {
    pub model: String,
    pub host: String,
    pub should_continue: bool,
}

impl SessionState {
    pub fn new(model: &str, host: &str) -> Self {
        Self {
            model: model.to_string(),
            host: host.to_string(),
            should_continue: true,
        }
    }
}
