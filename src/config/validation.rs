//! Configuration validation
//!
//! Validates configuration and reports issues.

use super::types::Config;

/// Result of configuration validation
#[derive(Debug, Clone)]
pub struct ConfigValidationResult {
    /// Whether the config is valid
    pub valid: bool,
    /// Validation errors (critical)
    pub errors: Vec<ValidationIssue>,
    /// Validation warnings (non-critical)
    pub warnings: Vec<ValidationIssue>,
}

impl ConfigValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        ConfigValidationResult {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Add an error
    pub fn with_error(mut self, issue: ValidationIssue) -> Self {
        self.valid = false;
        self.errors.push(issue);
        self
    }

    /// Add a warning
    pub fn with_warning(mut self, issue: ValidationIssue) -> Self {
        self.warnings.push(issue);
        self
    }
}

/// A validation issue
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Path to the config field
    pub path: String,
    /// Issue message
    pub message: String,
    /// Suggested fix
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    /// Create a new issue
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationIssue {
            path: path.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " ({})", s)?;
        }
        Ok(())
    }
}

/// Validate the configuration
pub fn validate_config(config: &Config) -> ConfigValidationResult {
    let mut result = ConfigValidationResult::valid();

    result = validate_search_config(config, result);
    result = validate_fetch_config(config, result);
    result = validate_stt_config(config, result);

    result
}

fn validate_search_config(config: &Config, mut result: ConfigValidationResult) -> ConfigValidationResult {
    match config.search.searxng_host.as_deref() {
        None => {
            result = result.with_error(
                ValidationIssue::new("search.searxng_host", "No SearxNG host configured")
                    .with_suggestion("Set SEARXNG_HOST environment variable or search.searxng_host in config"),
            );
        }
        Some(host) if url::Url::parse(host).is_err() => {
            result = result.with_error(
                ValidationIssue::new("search.searxng_host", format!("Not a valid URL: {}", host))
                    .with_suggestion("Use an absolute URL such as http://searxng:8080"),
            );
        }
        Some(_) => {}
    }

    if config.search.default_general_results > config.search.max_general_results {
        result = result.with_warning(ValidationIssue::new(
            "search.default_general_results",
            "Default result count exceeds the maximum and will be capped",
        ));
    }

    result
}

fn validate_fetch_config(config: &Config, mut result: ConfigValidationResult) -> ConfigValidationResult {
    if let Some(ref proxy) = config.fetch.proxy_url {
        if reqwest::Proxy::all(proxy.as_str()).is_err() {
            result = result.with_error(
                ValidationIssue::new("fetch.proxy_url", format!("Invalid proxy URL: {}", proxy))
                    .with_suggestion("Use an http:// or https:// proxy URL"),
            );
        }
    }

    result
}

fn validate_stt_config(config: &Config, mut result: ConfigValidationResult) -> ConfigValidationResult {
    if config.stt.endpoint.is_none() || config.stt.model.is_none() {
        result = result.with_warning(
            ValidationIssue::new(
                "stt",
                "Speech-to-text not configured. fetch_youtube_content will fail.",
            )
            .with_suggestion("Set STT_ENDPOINT and STT_MODEL (and STT_API_KEY if required)"),
        );
    }

    result
}
