use hob_log::{FileSinkConfig, SinkBaseConfig, Stream, TerminalSink, TerminalSinkConfig, MAX_SEVERITY_LEVEL};

#[test]
fn terminal_config_from_json() {
  let config: TerminalSinkConfig = serde_json::from_str(
    r#"{
      "format": "{TAG} {MESSAGE}",
      "time_format": "",
      "severity_level": 3,
      "async_mode": false,
      "stream": "stderr",
      "color": false
    }"#,
  )
  .unwrap();

  assert_eq!(config.base.format, "{TAG} {MESSAGE}");
  assert_eq!(config.base.severity_level, 3);
  assert_eq!(config.stream, Stream::Stderr);
  assert!(!config.color);

  let sink = TerminalSink::new("json", &config).unwrap();
  assert_eq!(sink.config(), config);
}

#[test]
fn missing_fields_take_defaults() {
  let config: FileSinkConfig = serde_json::from_str(r#"{ "path": "app.log" }"#).unwrap();
  assert_eq!(config.base, SinkBaseConfig::default());
  assert_eq!(config.base.severity_level, MAX_SEVERITY_LEVEL);
  assert!(config.append);
  assert_eq!(config.path.to_str(), Some("app.log"));
}

#[test]
fn unknown_stream_is_rejected() {
  let parsed = serde_json::from_str::<TerminalSinkConfig>(r#"{ "stream": "stdin" }"#);
  assert!(parsed.is_err());
}

#[test]
fn invalid_values_fail_at_construction() {
  let config: TerminalSinkConfig = serde_json::from_str(r#"{ "format": "{TAG}" }"#).unwrap();
  assert!(TerminalSink::new("bad", &config).is_err());

  let config: TerminalSinkConfig = serde_json::from_str(r#"{ "severity_level": 64 }"#).unwrap();
  assert!(TerminalSink::new("bad", &config).is_err());
}
