use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::format::{self, MESSAGE_PLACEHOLDER};
use crate::lost_logs::LostLogs;
use crate::severity::{validate_severity_level, MAX_SEVERITY_LEVEL};
use crate::sink::{validate_name, LogEvent, RawSink, Sink};
use crate::worker::{Worker, WorkerOptions};

pub const DEFAULT_FORMAT: &str = "[{TIME}] [{TAG}] {MESSAGE}";
pub const DEFAULT_TIME_FORMAT: &str = "{HOUR:24}:{MINUTE}:{SECOND}.{MILLISECOND}";

/// Settings shared by every leaf sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkBaseConfig {
  /// Must contain `{MESSAGE}`.
  pub format: String,
  /// Expanded into `{TIME}`. May be empty.
  pub time_format: String,
  /// Severity bitmask in `[0, 63]`.
  pub severity_level: u8,
  /// Write from a dedicated worker thread.
  pub async_mode: bool,
  /// Core the worker thread is pinned to, if any.
  pub worker_core: Option<usize>,
}

impl Default for SinkBaseConfig {
  fn default() -> Self {
    Self {
      format: DEFAULT_FORMAT.to_string(),
      time_format: DEFAULT_TIME_FORMAT.to_string(),
      severity_level: MAX_SEVERITY_LEVEL,
      async_mode: false,
      worker_core: None,
    }
  }
}

/// Filtering, formatting, optional async dispatch and lost-log accounting on top
/// of a [`RawSink`] write primitive.
///
/// Setters take `&mut self`: configuration changes cannot race with `log`.
/// Dropping a sink in async mode joins its worker before the writer goes away,
/// so every queued message is written first.
pub struct SinkBase<W: RawSink> {
  worker: Option<Worker>,
  writer: Arc<W>,
  name: String,
  format: String,
  time_format: String,
  severity_level: u8,
  worker_core: Option<usize>,
  lost_logs: LostLogs,
}

impl<W: RawSink> SinkBase<W> {
  pub fn with_writer(name: impl Into<String>, config: &SinkBaseConfig, writer: W) -> Result<Self> {
    let mut sink = Self {
      worker: None,
      writer: Arc::new(writer),
      name: validate_name(name)?,
      format: String::new(),
      time_format: String::new(),
      severity_level: 0,
      worker_core: config.worker_core,
      lost_logs: LostLogs::new(),
    };
    sink.set_format(config.format.as_str())?;
    sink.set_time_format(config.time_format.as_str());
    sink.set_severity_level(config.severity_level)?;
    sink.set_async_mode(config.async_mode)?;
    Ok(sink)
  }

  /// Logs accepted by the severity filter that never reached the target.
  pub fn lost_logs(&self) -> u64 {
    self.lost_logs.get()
  }

  pub fn format(&self) -> &str {
    &self.format
  }

  pub fn set_format(&mut self, format: impl Into<String>) -> Result<()> {
    let format = format.into();
    if !format.contains(MESSAGE_PLACEHOLDER) {
      return Err(Error::MissingMessage);
    }
    self.format = format;
    Ok(())
  }

  pub fn time_format(&self) -> &str {
    &self.time_format
  }

  pub fn set_time_format(&mut self, time_format: impl Into<String>) {
    self.time_format = time_format.into();
  }

  pub fn severity_level(&self) -> u8 {
    self.severity_level
  }

  pub fn set_severity_level(&mut self, severity_level: u8) -> Result<()> {
    self.severity_level = validate_severity_level(severity_level)?;
    Ok(())
  }

  pub fn async_mode(&self) -> bool {
    self.worker.is_some()
  }

  /// Starts or joins the worker thread. A no-op when already in the requested
  /// mode. Turning async off writes out everything still queued.
  pub fn set_async_mode(&mut self, async_mode: bool) -> Result<()> {
    match (async_mode, self.worker.is_some()) {
      (true, false) => {
        let writer = self.writer.clone();
        let options = WorkerOptions {
          thread_name: Some(format!("hob-log:{}", self.name)),
          core: self.worker_core,
        };
        let worker = Worker::spawn(
          move |severity_bit, message| writer.write(severity_bit, &message),
          self.lost_logs.clone(),
          options,
        )?;
        self.worker = Some(worker);
      }
      (false, true) => {
        self.worker = None;
      }
      _ => {}
    }
    Ok(())
  }

  pub fn worker_core(&self) -> Option<usize> {
    self.worker_core
  }

  /// Takes effect the next time async mode is switched on.
  pub fn set_worker_core(&mut self, core: Option<usize>) {
    self.worker_core = core;
  }

  pub fn writer(&self) -> &W {
    &self.writer
  }

  /// Current settings, e.g. for persisting them.
  pub fn base_config(&self) -> SinkBaseConfig {
    SinkBaseConfig {
      format: self.format.clone(),
      time_format: self.time_format.clone(),
      severity_level: self.severity_level,
      async_mode: self.async_mode(),
      worker_core: self.worker_core,
    }
  }
}

impl<W: RawSink> Sink for SinkBase<W> {
  fn name(&self) -> &str {
    &self.name
  }

  fn log(&self, event: &LogEvent<'_>) {
    if event.severity_bit & self.severity_level == 0 {
      return;
    }

    let message = match format::format_message(&self.format, &self.time_format, event) {
      Ok(message) => message,
      Err(err) => {
        tracing::debug!(sink = %self.name, error = %err, "could not format log message");
        self.lost_logs.record();
        return;
      }
    };

    let delivered = match &self.worker {
      Some(worker) => worker.log(event.severity_bit, message),
      None => self.writer.write(event.severity_bit, &message),
    };
    if !delivered {
      self.lost_logs.record();
    }
  }
}

impl<W: RawSink> Drop for SinkBase<W> {
  fn drop(&mut self) {
    // Join before the writer (file/stream handle) is released.
    self.worker = None;
  }
}

impl<W: RawSink> std::fmt::Debug for SinkBase<W> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SinkBase")
      .field("name", &self.name)
      .field("format", &self.format)
      .field("time_format", &self.time_format)
      .field("severity_level", &self.severity_level)
      .field("async_mode", &self.async_mode())
      .field("lost_logs", &self.lost_logs.get())
      .finish_non_exhaustive()
  }
}
