//! Per-request options handed to a transport

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;

use super::cookie::Cookie;

pub const REFERER: &str = "Referer";

/// Everything a transport needs besides the method and URL.
///
/// The zero value is a valid bare request. When more than one body field is
/// set the transport sends `json`, then `form`, then `body`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub headers: HashMap<String, String>,
    pub cookies: Vec<Cookie>,
    pub params: Vec<(String, String)>,
    pub json: Option<Value>,
    pub form: Option<HashMap<String, String>>,
    pub body: Option<String>,
    pub user_agent: Option<String>,
    pub basic_auth: Option<(String, Option<String>)>,
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn cookie(mut self, cookie: Cookie) -> Self {
        self.cookies.push(cookie);
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the Referer header, replacing any existing one regardless of case.
    pub fn set_referer(&mut self, referer: String) {
        self.headers.retain(|key, _| !key.eq_ignore_ascii_case(REFERER));
        self.headers.insert(REFERER.to_string(), referer);
    }

    /// Make `json` the request body, dropping any form or raw body.
    pub fn set_json(&mut self, json: Value) {
        self.form = None;
        self.body = None;
        self.json = Some(json);
    }

    pub fn referer(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(REFERER))
            .map(|(_, value)| value.as_str())
    }
}
