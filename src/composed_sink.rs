use std::sync::Arc;

use crate::error::{Error, Result};
use crate::sink::{validate_name, LogEvent, Sink};

/// Fans every event out to its children, in order. No formatting, filtering or
/// async mode of its own: each child applies its own.
pub struct ComposedSink {
  name: String,
  sinks: Vec<Arc<dyn Sink>>,
}

impl ComposedSink {
  pub fn new(name: impl Into<String>, sinks: Vec<Arc<dyn Sink>>) -> Result<Self> {
    let name = validate_name(name)?;
    if sinks.is_empty() {
      return Err(Error::NoChildren(name));
    }
    Ok(Self { name, sinks })
  }

  pub fn sinks(&self) -> &[Arc<dyn Sink>] {
    &self.sinks
  }
}

impl Sink for ComposedSink {
  fn name(&self) -> &str {
    &self.name
  }

  #[inline]
  fn log(&self, event: &LogEvent<'_>) {
    for sink in &self.sinks {
      sink.log(event);
    }
  }
}

impl std::fmt::Debug for ComposedSink {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let children: Vec<&str> = self.sinks.iter().map(|sink| sink.name()).collect();
    f.debug_struct("ComposedSink")
      .field("name", &self.name)
      .field("sinks", &children)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Mutex;

  struct Probe {
    name: &'static str,
    calls: Arc<Mutex<Vec<(&'static str, String)>>>,
  }

  impl Sink for Probe {
    fn name(&self) -> &str {
      self.name
    }

    fn log(&self, event: &LogEvent<'_>) {
      self.calls.lock().unwrap().push((self.name, event.message.to_string()));
    }
  }

  #[test]
  fn forwards_to_every_child_in_order() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let a: Arc<dyn Sink> = Arc::new(Probe { name: "a", calls: calls.clone() });
    let b: Arc<dyn Sink> = Arc::new(Probe { name: "b", calls: calls.clone() });
    let composed = ComposedSink::new("both", vec![a, b]).unwrap();

    composed.log(&LogEvent::new(1, "fatal", "f.rs", "f", 1, "E"));

    assert_eq!(
      *calls.lock().unwrap(),
      vec![("a", "E".to_string()), ("b", "E".to_string())]
    );
    assert_eq!(composed.name(), "both");
    assert_eq!(composed.sinks().len(), 2);
  }

  #[test]
  fn rejects_empty_children_and_name() {
    assert!(matches!(ComposedSink::new("none", Vec::new()), Err(Error::NoChildren(name)) if name == "none"));

    let calls = Arc::new(Mutex::new(Vec::new()));
    let a: Arc<dyn Sink> = Arc::new(Probe { name: "a", calls });
    assert!(matches!(ComposedSink::new("", vec![a]), Err(Error::EmptyName)));
  }

  #[test]
  fn nests() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let a: Arc<dyn Sink> = Arc::new(Probe { name: "a", calls: calls.clone() });
    let inner: Arc<dyn Sink> = Arc::new(ComposedSink::new("inner", vec![a.clone()]).unwrap());
    let outer = ComposedSink::new("outer", vec![inner, a]).unwrap();

    outer.log(&LogEvent::new(4, "warn", "f.rs", "f", 1, "twice"));
    assert_eq!(calls.lock().unwrap().len(), 2);
  }
}
