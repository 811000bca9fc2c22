//! Blocking FIFO handing formatted payloads from any number of producers to
//! exactly one consumer.
//!
//! ```text
//!  producer ─┐
//!  producer ─┼─ emplace ──► Mutex<VecDeque<Payload>> ──► pop (Condvar wait) ─► worker
//!  producer ─┘                                   ▲
//!                                 interrupt_wait ┘ (wake without data)
//! ```
//!
//! `pop` waits at most once. If it wakes up and the queue is still empty (spurious
//! wake-up or `interrupt_wait`) it returns `None` and the caller decides whether
//! to try again.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard};

/// `(severity_bit, formatted_message)`
pub type Payload = (u8, String);

#[derive(Default)]
struct State {
  queue: VecDeque<Payload>,
  // Set by `interrupt_wait`, consumed by the next `pop`. Keeps a wake-up that
  // lands before the consumer starts waiting from being lost.
  interrupted: bool,
}

#[derive(Default)]
pub struct MessageQueue {
  state: Mutex<State>,
  condition: Condvar,
}

impl MessageQueue {
  pub fn new() -> Self {
    Self::default()
  }

  #[inline]
  fn lock(&self) -> MutexGuard<'_, State> {
    // The state is a plain deque; a panic elsewhere cannot leave it half-updated.
    self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }

  /// Snapshot only. Another thread may change the answer right after it is read.
  pub fn is_empty(&self) -> bool {
    self.lock().queue.is_empty()
  }

  pub fn len(&self) -> usize {
    self.lock().queue.len()
  }

  /// Appends a payload and wakes the consumer. Returns `false` (the log is lost)
  /// when the queue cannot grow.
  pub fn emplace(&self, severity_bit: u8, message: String) -> bool {
    let reserved = {
      let mut state = self.lock();
      let reserved = state.queue.try_reserve(1);
      if reserved.is_ok() {
        state.queue.push_back((severity_bit, message));
        self.condition.notify_one();
      }
      reserved
    };
    // Never log while holding the lock.
    if let Err(err) = reserved {
      tracing::debug!(error = %err, "could not grow the message queue, dropping payload");
      return false;
    }
    true
  }

  /// Removes the oldest payload, waiting once if the queue is empty.
  ///
  /// Not safe for more than one consumer: two consumers can both observe a
  /// payload and race for it.
  pub fn pop(&self) -> Option<Payload> {
    let mut state = self.lock();
    if state.queue.is_empty() {
      if state.interrupted {
        state.interrupted = false;
        return None;
      }
      state = self
        .condition
        .wait(state)
        .unwrap_or_else(|poisoned| poisoned.into_inner());
      if state.queue.is_empty() {
        state.interrupted = false;
        return None;
      }
    }
    state.queue.pop_front()
  }

  /// Wakes a consumer blocked in `pop` without adding data.
  pub fn interrupt_wait(&self) {
    let mut state = self.lock();
    state.interrupted = true;
    self.condition.notify_one();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Arc;
  use std::thread;
  use std::time::Duration;

  #[test]
  fn fifo_for_single_producer() {
    let queue = MessageQueue::new();
    assert!(queue.emplace(1, "p1".to_string()));
    assert!(queue.emplace(2, "p2".to_string()));
    assert!(queue.emplace(4, "p3".to_string()));
    assert_eq!(queue.len(), 3);

    assert_eq!(queue.pop(), Some((1, "p1".to_string())));
    assert_eq!(queue.pop(), Some((2, "p2".to_string())));
    assert_eq!(queue.pop(), Some((4, "p3".to_string())));
    assert!(queue.is_empty());
  }

  #[test]
  fn pop_wakes_up_on_emplace() {
    let queue = Arc::new(MessageQueue::new());
    let consumer = {
      let queue = queue.clone();
      thread::spawn(move || loop {
        if let Some(payload) = queue.pop() {
          return payload;
        }
      })
    };
    thread::sleep(Duration::from_millis(20));
    assert!(queue.emplace(8, "late".to_string()));
    assert_eq!(consumer.join().unwrap(), (8, "late".to_string()));
  }

  #[test]
  fn interrupt_unblocks_without_data() {
    let queue = Arc::new(MessageQueue::new());
    let consumer = {
      let queue = queue.clone();
      thread::spawn(move || queue.pop())
    };
    thread::sleep(Duration::from_millis(20));
    queue.interrupt_wait();
    assert_eq!(consumer.join().unwrap(), None);
  }

  #[test]
  fn interrupt_before_pop_is_not_lost() {
    let queue = MessageQueue::new();
    queue.interrupt_wait();
    assert_eq!(queue.pop(), None);
  }

  #[test]
  fn interrupt_does_not_hide_queued_data() {
    let queue = MessageQueue::new();
    assert!(queue.emplace(16, "kept".to_string()));
    queue.interrupt_wait();
    assert_eq!(queue.pop(), Some((16, "kept".to_string())));
  }

  #[test]
  fn many_producers_one_consumer() {
    let queue = Arc::new(MessageQueue::new());
    let producers: Vec<_> = (0..4u8)
      .map(|id| {
        let queue = queue.clone();
        thread::spawn(move || {
          for n in 0..250 {
            assert!(queue.emplace(id, format!("{id}-{n}")));
          }
        })
      })
      .collect();
    for producer in producers {
      producer.join().unwrap();
    }

    let mut last_seen = [None::<usize>; 4];
    let mut total = 0;
    while !queue.is_empty() {
      let (id, message) = queue.pop().unwrap();
      let n: usize = message.split('-').nth(1).unwrap().parse().unwrap();
      let slot = &mut last_seen[id as usize];
      assert!(slot.map_or(true, |prev| prev < n), "per-producer order broken");
      *slot = Some(n);
      total += 1;
    }
    assert_eq!(total, 1000);
  }
}
