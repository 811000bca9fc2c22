//! Asynchronous multi-sink logging core.
//!
//! A [`Sink`] receives structured [`LogEvent`]s. Leaf sinks ([`TerminalSink`],
//! [`FileSink`], or any [`SinkBase`] over a custom [`RawSink`]) filter by severity
//! bitmask, expand a placeholder format and either write directly or hand the
//! formatted line to a background [`Worker`]. [`ComposedSink`] fans events out to
//! other sinks.

pub mod composed_sink;
pub mod error;
pub mod file_sink;
pub mod format;
pub mod lost_logs;
mod macros;
pub mod message_queue;
pub mod severity;
pub mod sink;
pub mod sink_base;
pub mod terminal_sink;
pub mod worker;

pub use composed_sink::ComposedSink;
pub use error::{Error, Result};
pub use file_sink::{FileSink, FileSinkConfig, FileWriter};
pub use lost_logs::LostLogs;
pub use message_queue::{MessageQueue, Payload};
pub use severity::{Severity, MAX_SEVERITY_LEVEL};
pub use sink::{LogEvent, RawSink, Sink};
pub use sink_base::{SinkBase, SinkBaseConfig};
pub use terminal_sink::{Stream, TerminalSink, TerminalSinkConfig, TerminalWriter};
pub use worker::{Worker, WorkerOptions};
