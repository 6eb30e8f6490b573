use crate::config::types::{Config, CrawlerConfig, ListingFilter, OutputConfig, PriceRange};
use crate::ConfigError;
use url::Url;

/// Upper bound on concurrent page fetches
const MAX_WORKERS: usize = 32;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_filter(&config.filter)?;
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the listing filter
fn validate_filter(filter: &ListingFilter) -> Result<(), ConfigError> {
    validate_price_range(&filter.price)
}

fn validate_price_range(range: &PriceRange) -> Result<(), ConfigError> {
    for (name, bound) in [("price_from", range.from), ("price_to", range.to)] {
        if let Some(value) = bound {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
    }

    if let (Some(from), Some(to)) = (range.from, range.to) {
        if from > to {
            return Err(ConfigError::Validation(format!(
                "price_from ({}) must not exceed price_to ({})",
                from, to
            )));
        }
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be >= 1, got {}",
            config.max_attempts
        )));
    }

    if config.min_delay_ms > config.max_delay_ms {
        return Err(ConfigError::Validation(format!(
            "min_delay_ms ({}) must not exceed max_delay_ms ({})",
            config.min_delay_ms, config.max_delay_ms
        )));
    }

    let origin = Url::parse(&config.origin)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid origin '{}': {}", config.origin, e)))?;

    if origin.scheme() != "http" && origin.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Origin '{}' must use http or https",
            config.origin
        )));
    }

    if origin.path() != "/" || origin.query().is_some() {
        return Err(ConfigError::InvalidUrl(format!(
            "Origin '{}' must not carry a path or query",
            config.origin
        )));
    }

    if config.language.is_empty() || !config.language.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ConfigError::Validation(format!(
            "language must be a non-empty alphabetic code, got '{}'",
            config.language
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.report_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "report_path cannot be empty".to_string(),
        ));
    }

    if let Some(json_path) = &config.json_path {
        if json_path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "json_path cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}
