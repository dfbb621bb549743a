use crumb_assistant::{AssistantPipeline, HttpGenerativeClient};
use crumb_backend::HttpBackend;
use crumb_core::config::{AppConfig, LoadOptions};
use crumb_core::domain::Session;

use crate::commands::CommandResult;

/// Runs one message through the full pipeline against the configured
/// backend and generative endpoints. Exit code mirrors
/// `PipelineResult.success` so scripts can branch on it.
pub async fn run(text: &str, auth_token: Option<String>) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return CommandResult::failure(format!("config validation failed: {error}"), 2),
    };
    crate::init_logging(&config);

    let session = match auth_token {
        Some(token) => Session::authenticated(token),
        None => Session::anonymous(),
    };

    let backend = HttpBackend::new(&config.backend);
    let generative = HttpGenerativeClient::new(&config.llm);
    let pipeline = AssistantPipeline::new(backend, generative);

    let result = pipeline.send_message(text, &session).await;
    if result.success {
        CommandResult::success(result.message)
    } else {
        CommandResult::failure(result.message, 1)
    }
}
