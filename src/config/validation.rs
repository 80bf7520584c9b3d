use crate::config::types::{Config, FetcherConfig, LeadsConfig, OutputConfig, SessionConfig};
use crate::url::ensure_scheme;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_session_config(&config.session)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_output_config(&config.output)?;
    validate_targets(&config.targets)?;
    if let Some(leads) = &config.leads {
        validate_leads_config(leads)?;
    }
    Ok(())
}

/// Validates session budgets and concurrency
fn validate_session_config(config: &SessionConfig) -> Result<(), ConfigError> {
    if config.concurrency < 1 || config.concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and 100, got {}",
            config.concurrency
        )));
    }

    if config.chunk_size < 1 {
        return Err(ConfigError::Validation(
            "chunk-size must be >= 1".to_string(),
        ));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(
            "max-pages must be >= 1".to_string(),
        ));
    }

    if config.max_emails < 1 {
        return Err(ConfigError::Validation(
            "max-emails must be >= 1".to_string(),
        ));
    }

    if config.fetch_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "fetch-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates the fetcher's browser identity
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.accept_language.trim().is_empty() {
        return Err(ConfigError::Validation(
            "accept-language cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates sink file paths
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.log_path.is_empty() {
        return Err(ConfigError::Validation(
            "log-path cannot be empty".to_string(),
        ));
    }

    if config.results_path.is_empty() {
        return Err(ConfigError::Validation(
            "results-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates explicit target websites
///
/// Targets may be written without a scheme ("example.com"); validation
/// applies the same scheme defaulting the run loop applies.
fn validate_targets(targets: &[String]) -> Result<(), ConfigError> {
    for target in targets {
        let with_scheme = ensure_scheme(target);
        Url::parse(&with_scheme).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid target URL '{}': {}", target, e))
        })?;
    }
    Ok(())
}

/// Validates the lead-source section
fn validate_leads_config(config: &LeadsConfig) -> Result<(), ConfigError> {
    Url::parse(&config.api_base)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid leads api-base: {}", e)))?;

    if config.auth_token.is_empty() {
        return Err(ConfigError::Validation(
            "leads auth-token cannot be empty".to_string(),
        ));
    }

    if config.user_id.is_empty() {
        return Err(ConfigError::Validation(
            "leads user-id cannot be empty".to_string(),
        ));
    }

    if config.saved_item_id.is_empty() {
        return Err(ConfigError::Validation(
            "leads saved-item-id cannot be empty".to_string(),
        ));
    }

    if config.company_count < 1 {
        return Err(ConfigError::Validation(
            "leads company-count must be >= 1".to_string(),
        ));
    }

    if config.poll_interval_secs < 1 {
        return Err(ConfigError::Validation(
            "leads poll-interval-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}
