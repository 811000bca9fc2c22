use crate::error::{Error, Result};

/// One call site's log event. Borrowed for the duration of `Sink::log` only.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LogEvent<'a> {
  pub severity_bit: u8,
  pub tag: &'a str,
  pub file: &'a str,
  pub function: &'a str,
  pub line: u32,
  pub message: &'a str,
}

impl<'a> LogEvent<'a> {
  #[inline(always)]
  pub fn new(severity_bit: u8, tag: &'a str, file: &'a str, function: &'a str, line: u32, message: &'a str) -> Self {
    Self {
      severity_bit,
      tag,
      file,
      function,
      line,
      message,
    }
  }
}

/// A named destination for log events.
///
/// `log` is fire-and-forget: it never fails and never panics outward. Dropped
/// events only show up in a sink's lost-log count.
pub trait Sink: Send + Sync {
  fn name(&self) -> &str;

  fn log(&self, event: &LogEvent<'_>);
}

/// Write primitive of a leaf sink: `message` is already formatted and
/// newline-terminated. Returns `false` if the bytes did not reach the target.
///
/// Called from the logging thread in sync mode and from the worker thread in
/// async mode.
pub trait RawSink: Send + Sync + 'static {
  fn write(&self, severity_bit: u8, message: &str) -> bool;
}

pub(crate) fn validate_name(name: impl Into<String>) -> Result<String> {
  let name = name.into();
  if name.is_empty() {
    return Err(Error::EmptyName);
  }
  Ok(name)
}
