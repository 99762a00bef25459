//! HTTP transport module
//!
//! This module provides the boundary between a paged request and the network:
//! the [`Transport`] trait and its reqwest-backed implementation.

use std::collections::HashMap;

use crate::config::ClientConfig;
use crate::error::{PageReqError, Result};
use crate::utils::UrlUtils;
use async_trait::async_trait;
use log::{debug, log_enabled, trace, Level};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, COOKIE, USER_AGENT};
use reqwest::{Client, ClientBuilder, Method};
use url::Url;

pub mod cookie;
pub mod options;
pub mod response;

pub use cookie::Cookie;
pub use options::RequestOptions;
pub use response::Response;

/// Sends a fully prepared request.
///
/// Implementations return transport failures as-is; callers get no retries
/// or status checks from this layer.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, method: Method, url: &str, options: RequestOptions) -> Result<Response>;
}

/// Default transport backed by a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a new transport with the given configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(config.max_redirects as usize)
            } else {
                reqwest::redirect::Policy::none()
            });

        // Configure proxy if specified
        if let Some(proxy_config) = &config.proxy {
            let proxy = reqwest::Proxy::all(&proxy_config.url)
                .map_err(|e| PageReqError::Proxy(format!("Invalid proxy: {}", e)))?;

            let proxy = if let (Some(username), Some(password)) =
                (&proxy_config.username, &proxy_config.password)
            {
                proxy.basic_auth(username, password)
            } else {
                proxy
            };

            builder = builder.proxy(proxy);
        }

        if config.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent);
        }

        if !config.headers.is_empty() {
            builder = builder.default_headers(default_headers(&config.headers)?);
        }

        let client = builder.build().map_err(PageReqError::Http)?;

        Ok(Self { client })
    }

    /// Wrap an already configured client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Translate options into a reqwest request without sending it
    pub fn build_request(
        &self,
        method: Method,
        url: &str,
        options: &RequestOptions,
    ) -> Result<reqwest::Request> {
        let url = UrlUtils::validate_url(url)?;
        let mut request = self.client.request(method, url);

        if !options.params.is_empty() {
            request = request.query(&options.params);
        }

        let cookie_header = merged_cookie_header(options);
        for (key, value) in &options.headers {
            if cookie_header.is_some() && key.eq_ignore_ascii_case(COOKIE.as_str()) {
                continue;
            }
            if options.user_agent.is_some() && key.eq_ignore_ascii_case(USER_AGENT.as_str()) {
                continue;
            }
            request = request.header(key, value);
        }

        if let Some(header_value) = cookie_header {
            request = request.header(COOKIE, header_value);
        }

        if let Some(user_agent) = &options.user_agent {
            request = request.header(USER_AGENT, user_agent);
        }

        if let Some((username, password)) = &options.basic_auth {
            request = request.basic_auth(username, password.as_ref());
        }

        if let Some(timeout) = options.timeout {
            request = request.timeout(timeout);
        }

        if let Some(json) = &options.json {
            request = request.json(json);
        } else if let Some(form) = &options.form {
            request = request.form(form);
        } else if let Some(body) = &options.body {
            request = request.body(body.clone());
        }

        request.build().map_err(PageReqError::Http)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, method: Method, url: &str, options: RequestOptions) -> Result<Response> {
        let request = self.build_request(method, url, &options)?;

        debug!("Sending {} {}", request.method(), request.url());
        if log_enabled!(Level::Trace) {
            trace_request_headers(&request);
        }

        let response = self
            .client
            .execute(request)
            .await
            .map_err(PageReqError::Http)?;
        debug!("Received {} from {}", response.status(), response.url());

        Response::from_reqwest(response).await
    }
}

/// Cookie header built from `options.cookies`, appended to any Cookie
/// header already present in `options.headers`.
fn merged_cookie_header(options: &RequestOptions) -> Option<String> {
    if options.cookies.is_empty() {
        return None;
    }

    let mut header_value = cookie::cookies_to_header(&options.cookies);
    if let Some(existing) = find_cookie_header(&options.headers) {
        header_value = format!("{}; {}", existing, header_value);
    }
    Some(header_value)
}

fn find_cookie_header(headers: &HashMap<String, String>) -> Option<&str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(COOKIE.as_str()))
        .map(|(_, value)| value.as_str())
}

fn default_headers(headers: &HashMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| PageReqError::Config(format!("Invalid header name '{}': {}", key, e)))?;
        let value = HeaderValue::from_str(value).map_err(|e| {
            PageReqError::Config(format!("Invalid value for header '{}': {}", key, e))
        })?;
        map.insert(name, value);
    }
    Ok(map)
}

fn trace_request_headers(request: &reqwest::Request) {
    trace!("> {} {}", request.method(), request_path(request.url()));

    if let Some(host) = request.url().host_str() {
        match request.url().port() {
            Some(port) => trace!("> Host: {}:{}", host, port),
            None => trace!("> Host: {}", host),
        }
    }

    for (name, value) in request.headers().iter() {
        let value = value.to_str().unwrap_or("<non-utf8>");
        trace!("> {}: {}", name, value);
    }
}

fn request_path(url: &Url) -> String {
    match url[url::Position::BeforePath..].trim() {
        "" => "/".to_string(),
        path => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{ReqwestTransport, RequestOptions};
    use crate::config::{ClientConfig, ProxyConfig};
    use crate::error::PageReqError;
    use crate::http::Cookie;
    use reqwest::header::{HeaderName, AUTHORIZATION, CONTENT_TYPE, COOKIE, REFERER, USER_AGENT};
    use reqwest::{Client, Method};
    use serde_json::{json, Value};

    fn transport() -> ReqwestTransport {
        ReqwestTransport::with_client(Client::new())
    }

    fn header(request: &reqwest::Request, name: HeaderName) -> Vec<&str> {
        request
            .headers()
            .get_all(name)
            .iter()
            .map(|value| value.to_str().expect("ascii header"))
            .collect()
    }

    #[test]
    fn cookies_render_as_single_header() {
        let options = RequestOptions::new()
            .cookie(Cookie::new("sid", "abc"))
            .cookie(Cookie::new("lang", "en"));
        let request = transport()
            .build_request(Method::GET, "https://example.com/items", &options)
            .expect("request");

        assert_eq!(header(&request, COOKIE), vec!["sid=abc; lang=en"]);
    }

    #[test]
    fn cookies_extend_existing_cookie_header() {
        let options = RequestOptions::new()
            .header("cookie", "theme=dark")
            .cookie(Cookie::new("sid", "abc"));
        let request = transport()
            .build_request(Method::GET, "https://example.com/items", &options)
            .expect("request");

        assert_eq!(header(&request, COOKIE), vec!["theme=dark; sid=abc"]);
    }

    #[test]
    fn params_are_appended_to_query() {
        let options = RequestOptions::new().param("page", "2").param("q", "a b");
        let request = transport()
            .build_request(Method::GET, "https://example.com/search?lang=en", &options)
            .expect("request");

        assert_eq!(request.url().query(), Some("lang=en&page=2&q=a+b"));
    }

    #[test]
    fn json_body_wins_over_form_and_raw_body() {
        let options = RequestOptions {
            json: Some(json!({"name": "widget"})),
            body: Some("raw".to_string()),
            ..RequestOptions::default()
        };
        let request = transport()
            .build_request(Method::POST, "https://example.com/items", &options)
            .expect("request");

        let bytes = request.body().and_then(|b| b.as_bytes()).expect("buffered body");
        let sent: Value = serde_json::from_slice(bytes).expect("json body");
        assert_eq!(sent, json!({"name": "widget"}));
        assert_eq!(header(&request, CONTENT_TYPE), vec!["application/json"]);
    }

    #[test]
    fn form_body_is_url_encoded() {
        let options = RequestOptions {
            form: Some([("a".to_string(), "1".to_string())].into_iter().collect()),
            ..RequestOptions::default()
        };
        let request = transport()
            .build_request(Method::POST, "https://example.com/form", &options)
            .expect("request");

        let bytes = request.body().and_then(|b| b.as_bytes()).expect("buffered body");
        assert_eq!(bytes, b"a=1");
        assert_eq!(
            header(&request, CONTENT_TYPE),
            vec!["application/x-www-form-urlencoded"]
        );
    }

    #[test]
    fn headers_user_agent_and_auth_are_applied() {
        let options = RequestOptions::new()
            .header("Referer", "https://example.com/list")
            .header("User-Agent", "ignored")
            .user_agent("crawler/1.0");
        let options = RequestOptions {
            basic_auth: Some(("user".to_string(), Some("pass".to_string()))),
            ..options
        };
        let request = transport()
            .build_request(Method::GET, "example.com/items", &options)
            .expect("request");

        assert_eq!(request.url().as_str(), "http://example.com/items");
        assert_eq!(header(&request, REFERER), vec!["https://example.com/list"]);
        assert_eq!(header(&request, USER_AGENT), vec!["crawler/1.0"]);
        assert_eq!(header(&request, AUTHORIZATION), vec!["Basic dXNlcjpwYXNz"]);
    }

    #[test]
    fn invalid_url_is_rejected_before_sending() {
        let err = transport()
            .build_request(Method::GET, "http://", &RequestOptions::default())
            .expect_err("invalid url");
        assert!(matches!(err, PageReqError::InvalidUrl(_)));
    }

    #[test]
    fn new_rejects_bad_default_header() {
        let mut config = ClientConfig::default();
        config
            .headers
            .insert("Bad Header".to_string(), "value".to_string());
        let err = ReqwestTransport::new(config).expect_err("invalid header name");
        assert!(matches!(err, PageReqError::Config(_)));
    }

    #[test]
    fn new_rejects_bad_proxy() {
        let config = ClientConfig {
            proxy: Some(ProxyConfig {
                url: "http://proxy.example.com:99999".to_string(),
                username: None,
                password: None,
            }),
            ..ClientConfig::default()
        };
        let err = ReqwestTransport::new(config).expect_err("invalid proxy");
        assert!(matches!(err, PageReqError::Proxy(_)));
    }
}
