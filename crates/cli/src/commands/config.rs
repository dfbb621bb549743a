use crumb_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let api_key = match &config.llm.api_key {
        Some(key) => redact_secret(key.expose_secret()),
        None => "<not set - generative fallback disabled>".to_string(),
    };

    let lines = vec![
        "effective config (source precedence: overrides > env > file > default):".to_string(),
        format!("backend.base_url      = {}", config.backend.base_url),
        format!("backend.timeout_secs  = {}", config.backend.timeout_secs),
        format!("llm.api_key           = {api_key}"),
        format!("llm.base_url          = {}", config.llm.base_url),
        format!("llm.model             = {}", config.llm.model),
        format!("llm.temperature       = {}", config.llm.temperature),
        format!("llm.max_tokens        = {}", config.llm.max_tokens),
        format!("llm.timeout_secs      = {}", config.llm.timeout_secs),
        format!("logging.level         = {}", config.logging.level),
        format!("logging.format        = {:?}", config.logging.format),
    ];

    lines.join("\n")
}

fn redact_secret(secret: &str) -> String {
    let trimmed = secret.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Some((prefix, _)) = trimmed.split_once('-') {
        return format!("{prefix}-***");
    }

    "<redacted>".to_string()
}
