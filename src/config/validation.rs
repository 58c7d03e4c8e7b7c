use crate::config::types::{Config, HttpConfig, OutputConfig, ViewerConfig};
use crate::ConfigError;
use scraper::Selector;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_output_config(&config.output)?;
    validate_http_config(&config.http)?;
    validate_viewer_config(&config.viewer)?;
    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    validate_quality(config.quality)?;

    if config.document_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "document_name cannot be empty".to_string(),
        ));
    }

    if config.document_name.contains('/') || config.document_name.contains('\\') {
        return Err(ConfigError::Validation(format!(
            "document_name must be a plain file name, got '{}'",
            config.document_name
        )));
    }

    Ok(())
}

/// Validates the page resolution used when assembling documents
pub fn validate_quality(quality: f32) -> Result<(), ConfigError> {
    if !quality.is_finite() || quality <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "quality must be a positive number, got {}",
            quality
        )));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect_timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates viewer markup configuration
fn validate_viewer_config(config: &ViewerConfig) -> Result<(), ConfigError> {
    if config.page_param.is_empty() {
        return Err(ConfigError::Validation(
            "page_param cannot be empty".to_string(),
        ));
    }

    for selector in [
        &config.total_pages_selector,
        &config.page_image_selector,
        &config.next_page_selector,
    ] {
        parse_selector(selector)?;
    }

    Ok(())
}

/// Parses a CSS selector, mapping failures to a configuration error
pub fn parse_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}
