//! pagereq - page-parameterized HTTP requests for scrapers and crawlers
//!
//! A [`PagedRequest`] is configured once with an HTTP method and a set of
//! builder functions, then executed for each page context a crawler visits.
//! The builders derive the URL, query parameters, cookies, Referer header and
//! JSON body of every request from that context.

pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod paged;
pub mod utils;

pub use config::{ClientConfig, HttpMethod, ProxyConfig};
pub use error::{PageReqError, Result};
pub use http::{Cookie, RequestOptions, ReqwestTransport, Response, Transport};
pub use logging::{FacadeLog, NoopLog, RequestLog};
pub use paged::{PagedRequest, PagedRequestBuilder, PreparedRequest};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
