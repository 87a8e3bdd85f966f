use crate::config::types::{Config, DumpConfig, SolrConfig, TransformOverrides};
use crate::ConfigError;
use regex::Regex;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_solr_config(&config.solr)?;
    validate_dump_config(&config.dump)?;
    validate_transform_overrides(&config.transform)?;
    Ok(())
}

/// Validates the source index configuration
fn validate_solr_config(config: &SolrConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid solr url '{}': {}", config.url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "solr url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if config.rows < 1 {
        return Err(ConfigError::Validation(format!(
            "rows must be >= 1, got {}",
            config.rows
        )));
    }

    if config.limit == Some(0) {
        return Err(ConfigError::Validation(
            "limit must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
pub(crate) fn validate_dump_config(config: &DumpConfig) -> Result<(), ConfigError> {
    if config.filename.trim().is_empty() {
        return Err(ConfigError::Validation(
            "dump filename cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the transform table overrides
fn validate_transform_overrides(overrides: &TransformOverrides) -> Result<(), ConfigError> {
    if let Some(pattern) = &overrides.metadata_pattern {
        validate_metadata_pattern(pattern)?;
    }

    if let Some(mapping) = &overrides.mapping {
        if let Some((from, _)) = mapping.iter().find(|(_, to)| to.is_empty()) {
            return Err(ConfigError::Validation(format!(
                "mapping for '{}' has an empty destination field",
                from
            )));
        }
    }

    Ok(())
}

/// Checks that a metadata pattern compiles and captures a base name
pub(crate) fn validate_metadata_pattern(pattern: &str) -> Result<Regex, ConfigError> {
    let regex = Regex::new(pattern)
        .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", pattern, e)))?;

    if regex.captures_len() < 2 {
        return Err(ConfigError::InvalidPattern(format!(
            "'{}' must capture the base field name in a group",
            pattern
        )));
    }

    Ok(regex)
}
