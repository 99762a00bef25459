//! Utility functions and helpers

use crate::error::{PageReqError, Result};
use url::Url;

/// URL validation and parsing utilities
pub struct UrlUtils;

impl UrlUtils {
    /// Validate and normalize a built URL
    pub fn validate_url(input: &str) -> Result<Url> {
        let input = input.trim();
        // Add http:// if no scheme is provided
        let url_str = if input.contains("://") {
            input.to_string()
        } else {
            format!("http://{}", input)
        };

        Url::parse(&url_str)
            .map_err(|e| PageReqError::InvalidUrl(format!("Invalid URL '{}': {}", input, e)))
    }
}
