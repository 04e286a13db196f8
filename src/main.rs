use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;

mod app;
mod cli;
mod commands;
mod config;
mod conversation;
mod core;
mod display;
mod input;
mod providers;
mod shopping;
mod telemetry;
mod widget;

use crate::app::Application;
use crate::cli::Args;
use crate::commands::{SessionState, create_command_registry};
use crate::config::{Config, Overrides};
use crate::core::error::ChatError;
use crate::providers::{base_client::HttpClient, gemini::GeminiClient};

async fn run(args: Args) -> Result<(), ChatError> {
    let config = Config::load(args.config.as_deref())?;
    let overrides = Overrides {
        base_url: args.base_url.clone(),
        model: args.model.clone(),
    };
    let settings = config.resolve(&overrides, |key| std::env::var(key).ok());
    if settings.api_key.is_none() {
        tracing::debug!("no API key configured; replies will explain how to set one");
    }

    let transport = Arc::new(HttpClient::new()?);
    let client = GeminiClient::new(settings, transport)?;
    let session = SessionState::new(&client.model, client.host());

    let mut app = Application::new(
        args,
        Arc::new(client),
        session,
        create_command_registry(),
    );
    app.run().await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    telemetry::init(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            display::display_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
