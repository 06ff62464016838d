use crate::config::limit::RecordLimit;
use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Longest delay accepted between fetches (milliseconds)
const MAX_REQUEST_DELAY_MS: u64 = 60_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawl loop configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let start = parse_http_url("start-url", &config.start_url)?;
    if start.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "start-url '{}' has no host",
            config.start_url
        )));
    }

    validate_base_origin(&config.base_origin)?;

    if config.request_delay > MAX_REQUEST_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "request-delay must be <= {}ms, got {}ms",
            MAX_REQUEST_DELAY_MS, config.request_delay
        )));
    }

    Ok(())
}

/// Checks the `record-limit` written in a config file
///
/// A zero limit is only reachable from the command line, where it means
/// "store nothing"; in a file it is treated as a mistake.
pub(crate) fn validate_file_record_limit(limit: RecordLimit) -> Result<(), ConfigError> {
    if limit == RecordLimit::Max(0) {
        return Err(ConfigError::Validation(
            "record-limit must be at least 1 (use \"ALL\" or -1 for no limit)".to_string(),
        ));
    }
    Ok(())
}

/// The origin is concatenated with path-only links, so it must be bare
fn validate_base_origin(origin: &str) -> Result<(), ConfigError> {
    let url = parse_http_url("base-origin", origin)?;

    if origin.ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "base-origin '{}' must not end with '/'",
            origin
        )));
    }

    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::Validation(format!(
            "base-origin '{}' must be scheme and host only",
            origin
        )));
    }

    Ok(())
}

fn parse_http_url(field: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(url)
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    if config.summary_path.is_empty() {
        return Err(ConfigError::Validation(
            "summary_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config::with_start_url(
            "https://search.sunbiz.org/Inquiry/CorporationSearch/SearchResultDetail",
        )
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_rejects_bad_start_url() {
        let mut config = valid_config();
        config.crawler.start_url = "not a url".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));

        config.crawler.start_url = "ftp://search.sunbiz.org/file".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_validate_base_origin() {
        assert!(validate_base_origin("https://search.sunbiz.org").is_ok());
        assert!(validate_base_origin("http://127.0.0.1:8080").is_ok());

        assert!(validate_base_origin("https://search.sunbiz.org/").is_err());
        assert!(validate_base_origin("https://search.sunbiz.org/Inquiry").is_err());
        assert!(validate_base_origin("search.sunbiz.org").is_err());
    }

    #[test]
    fn test_zero_limit_valid_as_override() {
        let mut config = valid_config();
        config.crawler.record_limit = RecordLimit::Max(0);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_file_record_limit_rejects_zero() {
        assert!(matches!(
            validate_file_record_limit(RecordLimit::Max(0)),
            Err(ConfigError::Validation(_))
        ));
        assert!(validate_file_record_limit(RecordLimit::Max(1)).is_ok());
        assert!(validate_file_record_limit(RecordLimit::Unlimited).is_ok());
    }

    #[test]
    fn test_rejects_huge_delay() {
        let mut config = valid_config();
        config.crawler.request_delay = MAX_REQUEST_DELAY_MS + 1;
        assert!(validate(&config).is_err());

        config.crawler.request_delay = 0;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_rejects_bad_crawler_name() {
        let mut config = valid_config();
        config.user_agent.crawler_name = "bad name!".to_string();
        assert!(validate(&config).is_err());

        config.user_agent.crawler_name = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_rejects_empty_database_path() {
        let mut config = valid_config();
        config.output.database_path = String::new();
        assert!(validate(&config).is_err());
    }
}
