use crate::config::types::{Config, CrawlerConfig, HttpConfig, SitemapConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
///
/// The sitemap URL is optional here since the command line may provide it.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_sitemap_config(&config.sitemap)?;
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    Ok(())
}

/// Validates the sitemap section
fn validate_sitemap_config(config: &SitemapConfig) -> Result<(), ConfigError> {
    if let Some(sitemap_url) = &config.url {
        validate_sitemap_url(sitemap_url)?;
    }
    Ok(())
}

/// Validates a sitemap URL: must parse and use HTTP or HTTPS
pub fn validate_sitemap_url(sitemap_url: &str) -> Result<(), ConfigError> {
    let url = Url::parse(sitemap_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid sitemap URL '{}': {}", sitemap_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Sitemap URL '{}' must use HTTP or HTTPS",
            sitemap_url
        )));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // throttle <= 0 is corrected when the crawl starts, not rejected

    if let Some(host) = &config.host {
        if host.trim().is_empty() {
            return Err(ConfigError::Validation(
                "host override cannot be empty".to_string(),
            ));
        }

        if host.contains('/') {
            return Err(ConfigError::Validation(format!(
                "host override must be a bare host name, got '{}'",
                host
            )));
        }
    }

    Ok(())
}

/// Validates HTTP configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.password.is_some() && config.user.is_none() {
        return Err(ConfigError::Validation(
            "password given without a user".to_string(),
        ));
    }

    Ok(())
}
