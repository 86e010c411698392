//! Bridge from `tracing` events to the system log.
//!
//! Each event becomes one syslog record under the `LOG_USER` facility. The
//! record text is the event message, followed by any extra fields as
//! ` key=value`. The `component` tag is not repeated in the record.

use std::ffi::CString;
use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// Syslog severities used by this tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Error,
    Warning,
    Info,
    Debug,
}

impl Priority {
    pub fn as_raw(self) -> libc::c_int {
        match self {
            Priority::Error => libc::LOG_ERR,
            Priority::Warning => libc::LOG_WARNING,
            Priority::Info => libc::LOG_INFO,
            Priority::Debug => libc::LOG_DEBUG,
        }
    }
}

impl From<&Level> for Priority {
    fn from(level: &Level) -> Self {
        match *level {
            Level::ERROR => Priority::Error,
            Level::WARN => Priority::Warning,
            Level::INFO => Priority::Info,
            _ => Priority::Debug,
        }
    }
}

/// Destination for rendered syslog records
pub trait SyslogSink: Send + Sync + 'static {
    fn send(&self, priority: Priority, message: &str);
}

/// The process-wide syslog connection (`openlog`/`syslog`/`closelog`).
pub struct LibcSyslog {
    // openlog keeps the pointer, so the ident must outlive the connection
    ident: Option<CString>,
}

impl LibcSyslog {
    /// Open the system log for `LOG_USER`. With no ident, syslog uses the
    /// program name. An ident containing NUL is ignored.
    pub fn open(ident: Option<&str>) -> Self {
        let ident = ident.and_then(|s| CString::new(s).ok());
        let ptr = ident.as_ref().map_or(std::ptr::null(), |s| s.as_ptr());
        // SAFETY: `ptr` is null or points into `ident`, which lives until
        // Drop has called closelog.
        unsafe { libc::openlog(ptr, libc::LOG_ODELAY, libc::LOG_USER) };
        Self { ident }
    }

    pub fn ident(&self) -> Option<&str> {
        self.ident.as_ref().and_then(|s| s.to_str().ok())
    }
}

impl SyslogSink for LibcSyslog {
    fn send(&self, priority: Priority, message: &str) {
        let Ok(message) = CString::new(message.replace('\0', "")) else {
            return;
        };
        // SAFETY: both pointers are valid NUL-terminated strings, and the
        // "%s" format consumes exactly one of them.
        unsafe { libc::syslog(priority.as_raw(), c"%s".as_ptr(), message.as_ptr()) };
    }
}

impl Drop for LibcSyslog {
    fn drop(&mut self) {
        // SAFETY: closelog has no preconditions.
        unsafe { libc::closelog() };
    }
}

/// `tracing_subscriber` layer that renders events and hands them to a sink
pub struct SyslogLayer<K> {
    sink: K,
}

impl<K: SyslogSink> SyslogLayer<K> {
    pub fn new(sink: K) -> Self {
        Self { sink }
    }
}

impl<S, K> Layer<S> for SyslogLayer<K>
where
    S: Subscriber,
    K: SyslogSink,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);
        self.sink
            .send(Priority::from(event.metadata().level()), &visitor.finish());
    }
}

#[derive(Default)]
struct RecordVisitor {
    message: String,
    fields: String,
}

impl RecordVisitor {
    fn finish(mut self) -> String {
        if self.message.is_empty() {
            return self.fields.trim_start().to_string();
        }
        self.message.push_str(&self.fields);
        self.message
    }
}

impl Visit for RecordVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message.push_str(value),
            "component" => {}
            name => {
                let _ = write!(self.fields, " {name}={value}");
            }
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => {
                let _ = write!(self.message, "{value:?}");
            }
            "component" => {}
            name => {
                let _ = write!(self.fields, " {name}={value:?}");
            }
        }
    }
}
