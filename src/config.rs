//! Configuration for paged requests and the default transport

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use reqwest::Method;

/// HTTP method a paged request is configured with.
///
/// Parsing is exact and case-sensitive. Anything outside the six supported
/// verbs is kept as `Other` and dispatched as GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Other(String),
}

impl HttpMethod {
    pub fn parse(s: &str) -> Self {
        match s {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "DELETE" => HttpMethod::Delete,
            "PATCH" => HttpMethod::Patch,
            "HEAD" => HttpMethod::Head,
            other => HttpMethod::Other(other.to_string()),
        }
    }

    /// Verb actually sent on the wire.
    pub fn dispatch_method(&self) -> Method {
        match self {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Other(_) => Method::GET,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Other(raw) => raw.as_str(),
        };
        write!(f, "{}", method)
    }
}

impl From<&str> for HttpMethod {
    fn from(s: &str) -> Self {
        HttpMethod::parse(s)
    }
}

impl From<String> for HttpMethod {
    fn from(s: String) -> Self {
        HttpMethod::parse(&s)
    }
}

/// Proxy configuration
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Settings for the default reqwest-backed transport
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub headers: HashMap<String, String>,
    pub user_agent: Option<String>,
    pub follow_redirects: bool,
    pub max_redirects: u32,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub proxy: Option<ProxyConfig>,
    pub accept_invalid_certs: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            headers: HashMap::new(),
            user_agent: Some(format!("pagereq/{}", crate::VERSION)),
            follow_redirects: true,
            max_redirects: 10,
            timeout: Duration::from_secs(300),
            connect_timeout: Duration::from_secs(30),
            proxy: None,
            accept_invalid_certs: false,
        }
    }
}
