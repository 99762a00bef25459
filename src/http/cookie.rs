//! Cookies attached to outgoing requests

/// A request cookie.
///
/// Only `name` and `value` go on the wire; the remaining attributes are
/// carried for callers that source cookies from a browser or a jar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
    pub expires: Option<i64>,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Self::default()
        }
    }
}

/// Convert cookies to HTTP header format
pub fn cookies_to_header(cookies: &[Cookie]) -> String {
    cookies
        .iter()
        .map(|c| format!("{}={}", c.name, c.value))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::{cookies_to_header, Cookie};

    #[test]
    fn header_joins_name_value_pairs() {
        let cookies = vec![Cookie::new("sid", "abc"), Cookie::new("lang", "en")];
        assert_eq!(cookies_to_header(&cookies), "sid=abc; lang=en");
    }

    #[test]
    fn header_ignores_attributes() {
        let cookie = Cookie {
            domain: ".example.com".to_string(),
            path: "/".to_string(),
            secure: true,
            ..Cookie::new("token", "x")
        };
        assert_eq!(cookies_to_header(&[cookie]), "token=x");
        assert_eq!(cookies_to_header(&[]), "");
    }
}
