use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_utils::CachePadded;

/// Saturating count of accepted logs that never reached their destination.
///
/// Cloning shares the counter: the producing side (formatting failures) and the
/// worker thread (write failures) bump the same atomic. Padded to its own cache
/// line because both threads touch it.
#[derive(Clone, Default)]
pub struct LostLogs {
  count: Arc<CachePadded<AtomicU64>>,
}

impl LostLogs {
  pub fn new() -> Self {
    Self::default()
  }

  #[cfg(test)]
  pub(crate) fn starting_at(count: u64) -> Self {
    Self {
      count: Arc::new(CachePadded::new(AtomicU64::new(count))),
    }
  }

  /// Adds one lost log, sticking at `u64::MAX`.
  #[inline]
  pub fn record(&self) {
    let _ = self
      .count
      .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |count| count.checked_add(1));
  }

  #[inline]
  pub fn get(&self) -> u64 {
    self.count.load(Ordering::Relaxed)
  }
}

impl std::fmt::Debug for LostLogs {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_tuple("LostLogs").field(&self.get()).finish()
  }
}
