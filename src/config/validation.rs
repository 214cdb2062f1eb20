use crate::config::types::{Config, FetcherConfig, OutputConfig, PaginationConfig, SelectorConfig};
use crate::crawler::CompiledSelectors;
use crate::url::PageTemplate;
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_pagination_config(&config.pagination)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_selector_config(&config.selectors)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates pagination settings and the URL template
fn validate_pagination_config(config: &PaginationConfig) -> Result<(), ConfigError> {
    PageTemplate::new(&config.url_template).map_err(|e| {
        ConfigError::InvalidUrl(format!(
            "Invalid url_template '{}': {}",
            config.url_template, e
        ))
    })?;

    if config.start_page < 1 {
        return Err(ConfigError::Validation(
            "start_page must be >= 1, got 0".to_string(),
        ));
    }

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1 when set".to_string(),
        ));
    }

    if config.max_pages.is_none() && !config.stop_on_empty_page {
        return Err(ConfigError::Validation(
            "at least one stopping condition is required: set max_pages or enable stop_on_empty_page"
                .to_string(),
        ));
    }

    if config.max_consecutive_failures < 1 {
        return Err(ConfigError::Validation(format!(
            "max_consecutive_failures must be >= 1, got {}",
            config.max_consecutive_failures
        )));
    }

    Ok(())
}

/// Validates HTTP client settings
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates that every selector is non-empty and compiles
fn validate_selector_config(config: &SelectorConfig) -> Result<(), ConfigError> {
    if config.image_attribute.trim().is_empty() {
        return Err(ConfigError::Validation(
            "image_attribute cannot be empty".to_string(),
        ));
    }

    CompiledSelectors::compile(config)?;
    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "directory cannot be empty".to_string(),
        ));
    }

    if config.file_stem.trim().is_empty() {
        return Err(ConfigError::Validation(
            "file_stem cannot be empty".to_string(),
        ));
    }

    if config
        .file_stem
        .chars()
        .any(|c| matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
    {
        return Err(ConfigError::Validation(format!(
            "file_stem contains characters not allowed in file names: '{}'",
            config.file_stem
        )));
    }

    if config.formats.is_empty() {
        return Err(ConfigError::Validation(
            "at least one export format is required".to_string(),
        ));
    }

    if matches!(&config.report_path, Some(path) if path.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "report_path cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}
