use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::error::{Error, Result};
use crate::lost_logs::LostLogs;
use crate::message_queue::MessageQueue;

/// Thread setup for a [`Worker`].
#[derive(Debug, Clone, Default)]
pub struct WorkerOptions {
  pub thread_name: Option<String>,
  /// Pin the consumer thread to this core.
  pub core: Option<usize>,
}

struct Shared {
  queue: MessageQueue,
  running: AtomicBool,
}

/// Owns one consumer thread draining a [`MessageQueue`] into a write callback.
///
/// Dropping the worker clears the running flag, interrupts the wait and joins the
/// thread. Everything already queued is handed to the callback before the join
/// returns.
pub struct Worker {
  shared: Arc<Shared>,
  thread: Option<JoinHandle<()>>,
}

impl Worker {
  /// Spawns the consumer thread. Every `false` returned by `callback` (or panic
  /// raised from it) bumps `lost_logs`.
  pub fn spawn<F>(callback: F, lost_logs: LostLogs, options: WorkerOptions) -> Result<Self>
  where
    F: FnMut(u8, String) -> bool + Send + 'static,
  {
    let shared = Arc::new(Shared {
      queue: MessageQueue::new(),
      running: AtomicBool::new(true),
    });

    let mut builder = thread::Builder::new();
    if let Some(name) = options.thread_name.clone() {
      builder = builder.name(name);
    }
    let thread = {
      let shared = shared.clone();
      builder
        .spawn(move || {
          if let Some(id) = options.core {
            if !core_affinity::set_for_current(core_affinity::CoreId { id }) {
              tracing::warn!(core = id, "could not pin log worker thread");
            }
          }
          run(&shared, callback, &lost_logs);
        })
        .map_err(Error::Spawn)?
    };
    tracing::debug!(thread = ?options.thread_name, "log worker started");

    Ok(Self {
      shared,
      thread: Some(thread),
    })
  }

  /// Queues a payload for the consumer thread. `false` means the log is lost.
  #[inline]
  pub fn log(&self, severity_bit: u8, message: String) -> bool {
    debug_assert!(self.shared.running.load(Ordering::Relaxed));
    self.shared.queue.emplace(severity_bit, message)
  }

  /// Payloads queued but not yet handed to the callback.
  pub fn pending(&self) -> usize {
    self.shared.queue.len()
  }
}

impl Drop for Worker {
  fn drop(&mut self) {
    self.shared.running.store(false, Ordering::Release);
    self.shared.queue.interrupt_wait();
    if let Some(thread) = self.thread.take() {
      if thread.join().is_err() {
        tracing::debug!("log worker thread panicked");
      }
    }
    tracing::debug!("log worker joined");
  }
}

fn run<F>(shared: &Shared, mut callback: F, lost_logs: &LostLogs)
where
  F: FnMut(u8, String) -> bool,
{
  while shared.running.load(Ordering::Acquire) || !shared.queue.is_empty() {
    let Some((severity_bit, message)) = shared.queue.pop() else {
      continue;
    };
    let written = panic::catch_unwind(AssertUnwindSafe(|| callback(severity_bit, message)))
      .unwrap_or_else(|_| {
        tracing::debug!("log write callback panicked");
        false
      });
    if !written {
      lost_logs.record();
    }
  }
}
