//! Page-parameterized requests
//!
//! A [`PagedRequest`] is configured once with a method and a set of builder
//! functions. Every call to [`PagedRequest::execute`] runs one page context
//! through those builders to derive the URL, query parameters, headers,
//! cookies and body of a single outgoing request, then hands the result to a
//! [`Transport`].
//!
//! ```no_run
//! use pagereq::{Cookie, PagedRequest};
//! use serde_json::json;
//!
//! struct Page {
//!     name: String,
//! }
//!
//! # async fn run() -> pagereq::Result<()> {
//! let request = PagedRequest::<Page>::builder("POST")
//!     .url(|_| "https://api.example.com/items".to_string())
//!     .body(|page| json!({ "name": page.name }))
//!     .cookies(|_| vec![Cookie::new("sid", "abc")])
//!     .build()?;
//!
//! let response = request
//!     .execute(&Page {
//!         name: "widget".to_string(),
//!     })
//!     .await?;
//! println!("{}", response.status());
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::{ClientConfig, HttpMethod};
use crate::error::{PageReqError, Result};
use crate::http::{Cookie, ReqwestTransport, RequestOptions, Response, Transport};
use crate::logging::{NoopLog, RequestLog};

const MISSING_URL_MESSAGE: &str = "Do get request failed. Missing url.";

pub type OptionsBuilder<P> = Arc<dyn Fn(&P) -> RequestOptions + Send + Sync>;
pub type UrlBuilder<P> = Arc<dyn Fn(&P) -> String + Send + Sync>;
pub type ParamsBuilder<P> = Arc<dyn Fn(&P) -> Vec<(String, String)> + Send + Sync>;
pub type RefererBuilder<P> = Arc<dyn Fn(&P) -> String + Send + Sync>;
pub type CookieBuilder<P> = Arc<dyn Fn(&P) -> Vec<Cookie> + Send + Sync>;
pub type BodyBuilder<P> = Arc<dyn Fn(&P) -> Value + Send + Sync>;

/// Method, URL and options derived for one page, not yet sent.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub options: RequestOptions,
}

/// Request template evaluated against a page context `P`.
///
/// Immutable once built. Clones share the same builder functions, so a
/// single instance can serve concurrent callers as long as the builders
/// themselves do not mutate shared state.
pub struct PagedRequest<P: ?Sized> {
    method: HttpMethod,
    options: Option<OptionsBuilder<P>>,
    url: Option<UrlBuilder<P>>,
    params: Option<ParamsBuilder<P>>,
    referer: Option<RefererBuilder<P>>,
    cookies: Option<CookieBuilder<P>>,
    body: Option<BodyBuilder<P>>,
    log: Arc<dyn RequestLog>,
    transport: Arc<dyn Transport>,
}

impl<P: ?Sized> PagedRequest<P> {
    pub fn builder(method: impl Into<HttpMethod>) -> PagedRequestBuilder<P> {
        PagedRequestBuilder::new(method.into())
    }

    /// A request with no builders configured, sent through `transport`.
    pub fn new(method: impl Into<HttpMethod>, transport: Arc<dyn Transport>) -> Self {
        Self {
            method: method.into(),
            options: None,
            url: None,
            params: None,
            referer: None,
            cookies: None,
            body: None,
            log: Arc::new(NoopLog),
            transport,
        }
    }

    pub fn method(&self) -> &HttpMethod {
        &self.method
    }

    /// Run every configured builder against `page` without sending anything.
    pub fn prepare(&self, page: &P) -> Result<PreparedRequest> {
        let url_builder = match &self.url {
            Some(url_builder) => url_builder,
            None => {
                self.log.error(MISSING_URL_MESSAGE);
                return Err(PageReqError::MissingUrl);
            }
        };

        let url = url_builder(page);
        self.log.debug(&format!("Do {} request.", self.method), &url);

        let mut options = match &self.options {
            Some(options_builder) => options_builder(page),
            None => RequestOptions::default(),
        };

        if let Some(cookies) = &self.cookies {
            options.cookies = cookies(page);
        }

        if let Some(params) = &self.params {
            options.params = params(page);
        }

        if let Some(referer) = &self.referer {
            options.set_referer(referer(page));
        }

        if let Some(body) = &self.body {
            options.set_json(body(page));
        }

        Ok(PreparedRequest {
            method: self.method.clone(),
            url,
            options,
        })
    }

    /// Build the request for `page` and send it.
    ///
    /// The transport's response or error is returned untouched; non-2xx
    /// statuses are not treated as errors.
    pub async fn execute(&self, page: &P) -> Result<Response> {
        let PreparedRequest {
            method,
            url,
            options,
        } = self.prepare(page)?;

        self.transport
            .send(method.dispatch_method(), &url, options)
            .await
    }

    /// Send the request for `page` and decode the JSON response body.
    pub async fn execute_into<T: DeserializeOwned>(&self, page: &P) -> Result<T> {
        let response = self.execute(page).await?;
        response.json()
    }

    /// Blocking variant of [`execute`](Self::execute).
    ///
    /// Drives the call on a private current-thread runtime, so it must not be
    /// called from within an async context.
    pub fn execute_blocking(&self, page: &P) -> Result<Response> {
        let runtime = blocking_runtime()?;
        runtime.block_on(self.execute(page))
    }

    /// Blocking variant of [`execute_into`](Self::execute_into).
    pub fn execute_into_blocking<T: DeserializeOwned>(&self, page: &P) -> Result<T> {
        let runtime = blocking_runtime()?;
        runtime.block_on(self.execute_into(page))
    }
}

fn blocking_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

impl<P: ?Sized> Clone for PagedRequest<P> {
    fn clone(&self) -> Self {
        Self {
            method: self.method.clone(),
            options: self.options.clone(),
            url: self.url.clone(),
            params: self.params.clone(),
            referer: self.referer.clone(),
            cookies: self.cookies.clone(),
            body: self.body.clone(),
            log: Arc::clone(&self.log),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<P: ?Sized> fmt::Debug for PagedRequest<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagedRequest")
            .field("method", &self.method)
            .field("options", &self.options.is_some())
            .field("url", &self.url.is_some())
            .field("params", &self.params.is_some())
            .field("referer", &self.referer.is_some())
            .field("cookies", &self.cookies.is_some())
            .field("body", &self.body.is_some())
            .finish_non_exhaustive()
    }
}

/// Collects the builder functions of a [`PagedRequest`].
///
/// No builder is required here; a missing URL builder is only reported when
/// the request is prepared.
pub struct PagedRequestBuilder<P: ?Sized> {
    method: HttpMethod,
    options: Option<OptionsBuilder<P>>,
    url: Option<UrlBuilder<P>>,
    params: Option<ParamsBuilder<P>>,
    referer: Option<RefererBuilder<P>>,
    cookies: Option<CookieBuilder<P>>,
    body: Option<BodyBuilder<P>>,
    log: Option<Arc<dyn RequestLog>>,
    transport: Option<Arc<dyn Transport>>,
    client_config: Option<ClientConfig>,
}

impl<P: ?Sized> PagedRequestBuilder<P> {
    fn new(method: HttpMethod) -> Self {
        Self {
            method,
            options: None,
            url: None,
            params: None,
            referer: None,
            cookies: None,
            body: None,
            log: None,
            transport: None,
            client_config: None,
        }
    }

    /// Base options; every other builder is layered on top of these.
    pub fn options<F>(mut self, f: F) -> Self
    where
        F: Fn(&P) -> RequestOptions + Send + Sync + 'static,
    {
        self.options = Some(Arc::new(f));
        self
    }

    pub fn url<F>(mut self, f: F) -> Self
    where
        F: Fn(&P) -> String + Send + Sync + 'static,
    {
        self.url = Some(Arc::new(f));
        self
    }

    /// Query parameters; replaces any set by the options builder.
    pub fn params<F>(mut self, f: F) -> Self
    where
        F: Fn(&P) -> Vec<(String, String)> + Send + Sync + 'static,
    {
        self.params = Some(Arc::new(f));
        self
    }

    pub fn referer<F>(mut self, f: F) -> Self
    where
        F: Fn(&P) -> String + Send + Sync + 'static,
    {
        self.referer = Some(Arc::new(f));
        self
    }

    /// Cookies; replaces any set by the options builder.
    pub fn cookies<F>(mut self, f: F) -> Self
    where
        F: Fn(&P) -> Vec<Cookie> + Send + Sync + 'static,
    {
        self.cookies = Some(Arc::new(f));
        self
    }

    /// JSON body; replaces any body set by the options builder.
    pub fn body<F>(mut self, f: F) -> Self
    where
        F: Fn(&P) -> Value + Send + Sync + 'static,
    {
        self.body = Some(Arc::new(f));
        self
    }

    pub fn log(mut self, log: Arc<dyn RequestLog>) -> Self {
        self.log = Some(log);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Configuration for the default transport. Ignored when a transport is
    /// supplied explicitly.
    pub fn client_config(mut self, config: ClientConfig) -> Self {
        self.client_config = Some(config);
        self
    }

    pub fn build(self) -> Result<PagedRequest<P>> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(self.client_config.unwrap_or_default())?),
        };
        let log: Arc<dyn RequestLog> = match self.log {
            Some(log) => log,
            None => Arc::new(NoopLog),
        };

        Ok(PagedRequest {
            method: self.method,
            options: self.options,
            url: self.url,
            params: self.params,
            referer: self.referer,
            cookies: self.cookies,
            body: self.body,
            log,
            transport,
        })
    }
}
