use crate::utils::error::{Result, VatError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Checks a rate source endpoint: http(s), with a host, and no query string or fragment.
/// Query parameters are configured on their own and appended at request time.
pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    let invalid = |reason: String| VatError::InvalidConfigValue {
        field: field_name.to_string(),
        value: url_str.to_string(),
        reason,
    };

    if url_str.trim().is_empty() {
        return Err(invalid("URL cannot be empty".to_string()));
    }

    let url = Url::parse(url_str).map_err(|e| invalid(format!("Invalid URL format: {}", e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("Unsupported URL scheme: {}", url.scheme())));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("URL has no host".to_string()));
    }
    if url.query().is_some() {
        return Err(invalid(
            "Put query parameters in --query / [source.parameters], not in the URL".to_string(),
        ));
    }
    if url.fragment().is_some() {
        return Err(invalid("URL cannot carry a fragment".to_string()));
    }

    Ok(())
}

/// Store file path: non-empty, no NUL bytes, and not an existing directory.
pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    let reason = if path.trim().is_empty() {
        "Path cannot be empty"
    } else if path.contains('\0') {
        "Path contains null bytes"
    } else if std::path::Path::new(path).is_dir() {
        "Path points to a directory, expected a file"
    } else {
        return Ok(());
    };

    Err(VatError::InvalidConfigValue {
        field: field_name.to_string(),
        value: path.to_string(),
        reason: reason.to_string(),
    })
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(VatError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("api_endpoint", "https://example.com/api/rate_list").is_ok());
        assert!(validate_url("api_endpoint", "http://example.com").is_ok());
        assert!(validate_url("api_endpoint", "").is_err());
        assert!(validate_url("api_endpoint", "invalid-url").is_err());
        assert!(validate_url("api_endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_url_rejects_query_and_fragment() {
        let err = validate_url("api_endpoint", "https://example.com/api/rate_list?format=1")
            .unwrap_err();
        assert!(err.to_string().contains("--query"));
        assert!(validate_url("api_endpoint", "https://example.com/api#rates").is_err());
        assert!(validate_url("api_endpoint", "http://").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("store_path", "./vat_rates.json").is_ok());
        assert!(validate_path("store_path", "  ").is_err());
        assert!(validate_path("store_path", "a\0b").is_err());
        assert!(validate_path("store_path", &std::env::temp_dir().to_string_lossy()).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("timeout_seconds", 30, 1, 300).is_ok());
        assert!(validate_range("timeout_seconds", 0, 1, 300).is_err());
    }
}
