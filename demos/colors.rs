use std::sync::Arc;

use hob_log::{
  log_debug, log_error, log_fatal, log_info, log_trace, log_warn, ComposedSink, FileSink, FileSinkConfig, Sink,
  SinkBaseConfig, Stream, TerminalSink, TerminalSinkConfig,
};

fn main() -> hob_log::Result<()> {
  let console = TerminalSink::new(
    "console",
    &TerminalSinkConfig {
      base: SinkBaseConfig {
        format: "{TIME} {TAG} [{FILE:short}:{LINE}] {MESSAGE}".to_string(),
        time_format: "{DAY_WEEK:short} {DAY_MONTH} {MONTH:short} {HOUR:12}:{MINUTE}:{SECOND}.{MILLISECOND} {MERIDIEM}"
          .to_string(),
        async_mode: true,
        ..SinkBaseConfig::default()
      },
      stream: Stream::Stdout,
      color: true,
    },
  )?;

  let path = std::env::temp_dir().join("hob-log-colors.log");
  let file = FileSink::new(
    "file",
    &FileSinkConfig {
      base: SinkBaseConfig {
        format: "{TIME} {HOST} {PID}/{THREAD} {FUNCTION} {TAG}: {MESSAGE}".to_string(),
        time_format: "{YEAR}-{MONTH:numeric}-{DAY_MONTH} {HOUR:24}:{MINUTE}:{SECOND}".to_string(),
        ..SinkBaseConfig::default()
      },
      path: path.clone(),
      append: false,
    },
  )?;

  let console = Arc::new(console);
  let both = ComposedSink::new("both", vec![console.clone() as Arc<dyn Sink>, Arc::new(file) as Arc<dyn Sink>])?;

  for id in 10..16 {
    log_fatal!(both, "curr {} u {}", id, id * 100);
    log_error!(both, "curr {} u {}", id, id * 100);
    log_warn!(both, "curr {} u {}", id, id * 100);
    log_info!(both, "curr {} u {}", id, id * 100);
    log_debug!(both, "curr {} u {}", id, id * 100);
    log_trace!(both, "curr {} u {}", id, id * 100);
  }

  drop(both);
  println!("lost={} file={}", console.lost_logs(), path.display());
  Ok(())
}
