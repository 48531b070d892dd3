//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to load or accept `storefront.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file `{}`", .0.display())]
    Read(PathBuf, #[source] std::io::Error),

    #[error("config file is not valid TOML")]
    Toml(#[from] toml::de::Error),

    /// An origin or endpoint that the storefront builds absolute URLs from.
    #[error("[{field}] must be an http:// or https:// URL, got `{value}`")]
    NotHttp { field: &'static str, value: String },

    #[error("[{field}] must be greater than zero")]
    Zero { field: &'static str },

    #[error("[{field}] must not be empty")]
    Empty { field: &'static str },
}

impl ConfigError {
    /// Check that `value` is an absolute http(s) URL.
    pub fn check_http(field: &'static str, value: &str) -> Result<(), Self> {
        let scheme_ok = ["http://", "https://"]
            .iter()
            .any(|scheme| value.strip_prefix(scheme).is_some_and(|rest| !rest.is_empty()));
        if scheme_ok {
            Ok(())
        } else {
            Err(Self::NotHttp {
                field,
                value: value.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_read_error_names_file() {
        let err = ConfigError::Read(
            PathBuf::from("storefront.toml"),
            Error::new(ErrorKind::NotFound, "file not found"),
        );
        assert_eq!(err.to_string(), "cannot read config file `storefront.toml`");
    }

    #[test]
    fn test_check_http() {
        assert!(ConfigError::check_http("site.url", "https://shop.example.com").is_ok());
        assert!(ConfigError::check_http("site.url", "http://localhost:3000").is_ok());

        let err = ConfigError::check_http("site.url", "shop.example.com").unwrap_err();
        assert_eq!(
            err.to_string(),
            "[site.url] must be an http:// or https:// URL, got `shop.example.com`"
        );
        assert!(ConfigError::check_http("cms.endpoint", "https://").is_err());
        assert!(ConfigError::check_http("cms.endpoint", "httpx://cms").is_err());
    }

    #[test]
    fn test_field_errors() {
        let zero = ConfigError::Zero { field: "cms.page_size" };
        assert_eq!(zero.to_string(), "[cms.page_size] must be greater than zero");

        let empty = ConfigError::Empty { field: "cms.preview_cookie" };
        assert_eq!(empty.to_string(), "[cms.preview_cookie] must not be empty");
    }
}
