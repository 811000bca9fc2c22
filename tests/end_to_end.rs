use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use hob_log::{
  log_error, log_warn, ComposedSink, FileSink, FileSinkConfig, LogEvent, RawSink, Severity, Sink, SinkBase,
  SinkBaseConfig,
};

#[derive(Default)]
struct Recorder {
  writes: Mutex<Vec<String>>,
  calls: AtomicUsize,
}

impl RawSink for Recorder {
  fn write(&self, _severity_bit: u8, message: &str) -> bool {
    self.calls.fetch_add(1, Ordering::Relaxed);
    self.writes.lock().unwrap().push(message.to_string());
    true
  }
}

fn base(format: &str, severity_level: u8) -> SinkBaseConfig {
  SinkBaseConfig {
    format: format.to_string(),
    time_format: String::new(),
    severity_level,
    ..SinkBaseConfig::default()
  }
}

#[cfg(not(any(feature = "strip-error", feature = "strip-warn")))]
#[test]
fn error_only_sink_through_macros() {
  let sink = SinkBase::with_writer("errors", &base("[{TAG}] {MESSAGE}", 0b000010), Recorder::default()).unwrap();

  log_error!(sink, "boom");
  log_warn!(sink, "not written");

  assert_eq!(*sink.writer().writes.lock().unwrap(), vec!["[error] boom\n".to_string()]);
  assert_eq!(sink.writer().calls.load(Ordering::Relaxed), 1);
}

#[test]
fn composed_sink_forwards_even_when_child_filters() {
  let quiet = Arc::new(SinkBase::with_writer("quiet", &base("{MESSAGE}", 0), Recorder::default()).unwrap());
  let loud = Arc::new(SinkBase::with_writer("loud", &base("{TAG}: {MESSAGE}", 63), Recorder::default()).unwrap());
  let composed = ComposedSink::new(
    "all",
    vec![quiet.clone() as Arc<dyn Sink>, loud.clone() as Arc<dyn Sink>],
  )
  .unwrap();

  composed.log(&LogEvent::new(Severity::Warn.bit(), "warn", file!(), "e2e", line!(), "E"));

  assert!(quiet.writer().writes.lock().unwrap().is_empty());
  assert_eq!(*loud.writer().writes.lock().unwrap(), vec!["warn: E\n".to_string()]);
}

#[test]
fn async_file_sink_shared_by_threads() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("threads.log");
  let config = FileSinkConfig {
    base: SinkBaseConfig {
      async_mode: true,
      ..base("{THREAD} {MESSAGE}", 63)
    },
    path: path.clone(),
    append: false,
  };
  let sink = Arc::new(FileSink::new("threads", &config).unwrap());

  let producers: Vec<_> = (0..4)
    .map(|id| {
      let sink = sink.clone();
      thread::spawn(move || {
        for n in 0..100 {
          sink.log(&LogEvent::new(Severity::Info.bit(), "info", file!(), "e2e", line!(), &format!("{id}:{n}")));
        }
      })
    })
    .collect();
  for producer in producers {
    producer.join().unwrap();
  }
  let lost = sink.lost_logs();
  drop(Arc::try_unwrap(sink).ok().unwrap());

  let content = fs::read_to_string(&path).unwrap();
  assert_eq!(content.lines().count(), 400);
  assert_eq!(lost, 0);

  // Each producer's lines keep their relative order.
  for id in 0..4 {
    let ours: Vec<u32> = content
      .lines()
      .filter_map(|line| line.split_once(' ').map(|(_, msg)| msg))
      .filter_map(|msg| msg.split_once(':'))
      .filter(|(producer, _)| *producer == id.to_string())
      .map(|(_, n)| n.parse().unwrap())
      .collect();
    assert_eq!(ours, (0..100).collect::<Vec<_>>());
  }
}

#[test]
fn terminal_and_file_in_one_composition() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("mixed.log");
  let file: Arc<dyn Sink> = Arc::new(
    FileSink::new(
      "file",
      &FileSinkConfig {
        base: base("{FILE:short}:{LINE} {MESSAGE}", Severity::Fatal.bit()),
        path: path.clone(),
        append: true,
      },
    )
    .unwrap(),
  );
  let composed = ComposedSink::new("mixed", vec![file]).unwrap();

  composed.log(&LogEvent::new(Severity::Fatal.bit(), "fatal", "/a/b/c.rs", "f", 9, "down"));
  composed.log(&LogEvent::new(Severity::Trace.bit(), "trace", "/a/b/c.rs", "f", 10, "noise"));
  drop(composed);

  assert_eq!(fs::read_to_string(&path).unwrap(), "c.rs:9 down\n");
}
