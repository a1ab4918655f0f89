// src/config/validation.rs

use super::ConfigBuilder;
use crate::errors::{ConfigError, Result};
use url::Url;

/// Validates combinations of options on the `ConfigBuilder`.
pub(super) fn validate_builder_options(builder: &ConfigBuilder) -> Result<()> {
    if builder.password.is_some() && builder.token.is_some() {
        return Err(ConfigError::Conflict {
            option1: "--password".to_string(),
            option2: "--token".to_string(),
        }
        .into());
    }
    if builder.password.is_some() && builder.username.is_none() {
        return Err(ConfigError::MissingDependency {
            option: "--password".to_string(),
            required: "--username".to_string(),
        }
        .into());
    }
    if builder.timeout_secs == Some(0) {
        return Err(ConfigError::InvalidValue {
            option: "--timeout".to_string(),
            reason: "must be greater than 0".to_string(),
        }
        .into());
    }
    Ok(())
}

/// Parses the API base URL, requiring an http(s) scheme, and ensures a trailing `/`.
pub(super) fn parse_base_url(raw: &str) -> Result<String> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidValue {
        option: "--base-url".to_string(),
        reason: format!("is not a valid URL ({})", e),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidValue {
            option: "--base-url".to_string(),
            reason: format!("must use http or https, got '{}'", url.scheme()),
        }
        .into());
    }

    let mut base = url.to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    #[test]
    fn test_zero_timeout_rejected() {
        let builder = ConfigBuilder::new().timeout_secs(0);
        let result = validate_builder_options(&builder);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue { option, .. })) if option == "--timeout"
        ));
    }

    #[test]
    fn test_valid_options_pass() -> Result<()> {
        validate_builder_options(&ConfigBuilder::new())?;
        validate_builder_options(&ConfigBuilder::new().username("a").password("b"))?;
        validate_builder_options(&ConfigBuilder::new().token("t").timeout_secs(10))?;
        Ok(())
    }

    #[test]
    fn test_parse_base_url() -> Result<()> {
        assert_eq!(
            parse_base_url("https://api.bitbucket.org/2.0")?,
            "https://api.bitbucket.org/2.0/"
        );
        assert_eq!(parse_base_url("http://localhost:7990/")?, "http://localhost:7990/");
        Ok(())
    }

    #[test]
    fn test_parse_base_url_rejects_garbage() {
        assert!(parse_base_url("not a url").is_err());
        let err = parse_base_url("ftp://example.com/").unwrap_err();
        assert!(err.to_string().contains("must use http or https"));
    }
}
