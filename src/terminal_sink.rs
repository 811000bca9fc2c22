use std::fmt;
use std::io::{self, Write};
use std::ops::{Deref, DerefMut};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::severity::Severity;
use crate::sink::RawSink;
use crate::sink_base::{SinkBase, SinkBaseConfig};

/// Restores the terminal's default color.
pub const COLOR_RESET: &str = "\x1b[1;0m";

/// Console streams a terminal sink may write to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Stream {
  #[default]
  Stdout = 0,
  Stderr = 1,
}

impl Stream {
  fn from_u8(raw: u8) -> Self {
    match raw {
      1 => Stream::Stderr,
      _ => Stream::Stdout,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Stream::Stdout => "stdout",
      Stream::Stderr => "stderr",
    }
  }
}

impl FromStr for Stream {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "stdout" => Ok(Stream::Stdout),
      "stderr" => Ok(Stream::Stderr),
      other => Err(Error::InvalidStream(other.to_string())),
    }
  }
}

impl fmt::Display for Stream {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalSinkConfig {
  #[serde(flatten)]
  pub base: SinkBaseConfig,
  pub stream: Stream,
  /// Color each message by severity.
  pub color: bool,
}

impl Default for TerminalSinkConfig {
  fn default() -> Self {
    Self {
      base: SinkBaseConfig::default(),
      stream: Stream::Stdout,
      color: true,
    }
  }
}

/// Escape sequence emitted before a message of the given severity.
#[inline(always)]
pub fn color_code(severity_bit: u8) -> &'static str {
  match Severity::from_bit(severity_bit) {
    Some(Severity::Fatal) => "\x1b[1;31m",
    Some(Severity::Error) => "\x1b[0;91m",
    Some(Severity::Warn) => "\x1b[0;93m",
    Some(Severity::Info) => "\x1b[1;32m",
    Some(Severity::Debug) => "\x1b[1;36m",
    Some(Severity::Trace) => "\x1b[0;90m",
    None => COLOR_RESET,
  }
}

/// Switches the output color for its lifetime. The reset is written on drop, so
/// it goes out even when the write in between fails.
pub struct ColorGuard<'a, W: Write> {
  out: &'a mut W,
  enabled: bool,
}

impl<'a, W: Write> ColorGuard<'a, W> {
  pub fn new(out: &'a mut W, enabled: bool, severity_bit: u8) -> Self {
    if enabled {
      if let Err(err) = out.write_all(color_code(severity_bit).as_bytes()) {
        tracing::debug!(error = %err, "could not change the terminal color");
      }
    }
    Self { out, enabled }
  }
}

impl<W: Write> Deref for ColorGuard<'_, W> {
  type Target = W;

  fn deref(&self) -> &W {
    &*self.out
  }
}

impl<W: Write> DerefMut for ColorGuard<'_, W> {
  fn deref_mut(&mut self) -> &mut W {
    &mut *self.out
  }
}

impl<W: Write> Drop for ColorGuard<'_, W> {
  fn drop(&mut self) {
    if !self.enabled {
      return;
    }
    if let Err(err) = self.out.write_all(COLOR_RESET.as_bytes()) {
      tracing::debug!(error = %err, "could not restore the terminal color");
    }
  }
}

/// Writes `message` wrapped in the severity color (when `color` is set) and
/// flushes.
pub fn write_colored<W: Write>(out: &mut W, color: bool, severity_bit: u8, message: &str) -> io::Result<()> {
  {
    let mut guard = ColorGuard::new(out, color, severity_bit);
    guard.write_all(message.as_bytes())?;
  }
  out.flush()
}

/// Write primitive behind [`TerminalSink`].
#[derive(Debug)]
pub struct TerminalWriter {
  stream: AtomicU8,
  color: AtomicBool,
}

impl TerminalWriter {
  pub fn new(stream: Stream, color: bool) -> Self {
    Self {
      stream: AtomicU8::new(stream as u8),
      color: AtomicBool::new(color),
    }
  }

  pub fn stream(&self) -> Stream {
    Stream::from_u8(self.stream.load(Ordering::Relaxed))
  }

  pub fn color(&self) -> bool {
    self.color.load(Ordering::Relaxed)
  }
}

impl RawSink for TerminalWriter {
  fn write(&self, severity_bit: u8, message: &str) -> bool {
    let color = self.color();
    let result = match self.stream() {
      Stream::Stdout => write_colored(&mut io::stdout().lock(), color, severity_bit, message),
      Stream::Stderr => write_colored(&mut io::stderr().lock(), color, severity_bit, message),
    };
    match result {
      Ok(()) => true,
      Err(err) => {
        tracing::debug!(error = %err, "could not print to the terminal");
        false
      }
    }
  }
}

/// Leaf sink printing to stdout or stderr.
pub type TerminalSink = SinkBase<TerminalWriter>;

impl SinkBase<TerminalWriter> {
  pub fn new(name: impl Into<String>, config: &TerminalSinkConfig) -> Result<Self> {
    SinkBase::with_writer(name, &config.base, TerminalWriter::new(config.stream, config.color))
  }

  pub fn stream(&self) -> Stream {
    self.writer().stream()
  }

  pub fn set_stream(&mut self, stream: Stream) {
    self.writer().stream.store(stream as u8, Ordering::Relaxed);
  }

  pub fn color(&self) -> bool {
    self.writer().color()
  }

  pub fn set_color(&mut self, color: bool) {
    self.writer().color.store(color, Ordering::Relaxed);
  }

  pub fn config(&self) -> TerminalSinkConfig {
    TerminalSinkConfig {
      base: self.base_config(),
      stream: self.stream(),
      color: self.color(),
    }
  }
}
