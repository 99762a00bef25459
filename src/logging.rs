//! Logging initialization and the request log capability.

use env_logger::Env;

/// Log target used by [`FacadeLog`].
pub const TARGET: &str = "pagereq";

/// Initialize env_logger with a default filter level.
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    let env = Env::default().default_filter_or("info");
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Sink for the events a paged request reports while preparing a call.
pub trait RequestLog: Send + Sync {
    fn error(&self, message: &str);
    fn debug(&self, message: &str, url: &str);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLog;

impl RequestLog for NoopLog {
    fn error(&self, _message: &str) {}
    fn debug(&self, _message: &str, _url: &str) {}
}

/// Forwards events to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct FacadeLog;

impl RequestLog for FacadeLog {
    fn error(&self, message: &str) {
        log::error!(target: TARGET, "{}", message);
    }

    fn debug(&self, message: &str, url: &str) {
        log::debug!(target: TARGET, "{} Url={}", message, url);
    }
}
