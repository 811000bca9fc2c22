use crate::error::{Error, Result};

/// Highest valid severity mask: all six bits set.
pub const MAX_SEVERITY_LEVEL: u8 = 0b11_1111;

/// One-hot severity bits. Severities are independent flags, not an ordered scale.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Severity {
  Fatal = 1 << 0,
  Error = 1 << 1,
  Warn = 1 << 2,
  Info = 1 << 3,
  Debug = 1 << 4,
  Trace = 1 << 5,
}

impl Severity {
  pub const ALL: [Severity; 6] = [
    Severity::Fatal,
    Severity::Error,
    Severity::Warn,
    Severity::Info,
    Severity::Debug,
    Severity::Trace,
  ];

  #[inline(always)]
  pub const fn bit(self) -> u8 {
    self as u8
  }

  /// Tag attached by the call-site macros, e.g. `"error"`.
  #[inline(always)]
  pub const fn tag(self) -> &'static str {
    match self {
      Severity::Fatal => "fatal",
      Severity::Error => "error",
      Severity::Warn => "warn",
      Severity::Info => "info",
      Severity::Debug => "debug",
      Severity::Trace => "trace",
    }
  }

  pub fn from_bit(bit: u8) -> Option<Self> {
    Self::ALL.into_iter().find(|severity| severity.bit() == bit)
  }

  #[inline(always)]
  pub const fn is_enabled_in(self, severity_level: u8) -> bool {
    self as u8 & severity_level != 0
  }
}

pub(crate) fn validate_severity_level(severity_level: u8) -> Result<u8> {
  if severity_level > MAX_SEVERITY_LEVEL {
    return Err(Error::SeverityOutOfRange(severity_level));
  }
  Ok(severity_level)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bits_are_one_hot_and_cover_the_mask() {
    let mut all = 0u8;
    for severity in Severity::ALL {
      assert_eq!(severity.bit().count_ones(), 1);
      all |= severity.bit();
    }
    assert_eq!(all, MAX_SEVERITY_LEVEL);
  }

  #[test]
  fn from_bit_rejects_combined_bits() {
    assert_eq!(Severity::from_bit(2), Some(Severity::Error));
    assert_eq!(Severity::from_bit(3), None);
    assert_eq!(Severity::from_bit(0), None);
  }

  #[test]
  fn severities_are_not_hierarchical() {
    let errors_and_traces = Severity::Error.bit() | Severity::Trace.bit();
    assert!(Severity::Error.is_enabled_in(errors_and_traces));
    assert!(Severity::Trace.is_enabled_in(errors_and_traces));
    assert!(!Severity::Fatal.is_enabled_in(errors_and_traces));
    assert!(!Severity::Warn.is_enabled_in(errors_and_traces));
  }

  #[test]
  fn severity_level_range() {
    assert!(validate_severity_level(0).is_ok());
    assert!(validate_severity_level(63).is_ok());
    assert!(matches!(validate_severity_level(64), Err(Error::SeverityOutOfRange(64))));
    assert!(validate_severity_level(u8::MAX).is_err());
  }
}
