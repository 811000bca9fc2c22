//! Call-site macros.
//!
//! `log_error!(sink, "x={} y={}", x, y)` formats the message, captures the file,
//! enclosing function and line, and hands the event to `sink`. `sink` can be any
//! expression that auto-derefs to a [`Sink`](crate::Sink): a sink value, a
//! reference or an `Arc<dyn Sink>`.
//!
//! Cargo features `strip-fatal` .. `strip-trace` (or `strip-all`) compile the
//! matching macro away; its arguments are then not evaluated.

#[doc(hidden)]
#[macro_export]
macro_rules! __function_name {
  () => {{
    fn __f() {}
    fn __type_name_of<T>(_: T) -> &'static str {
      ::std::any::type_name::<T>()
    }
    let name = __type_name_of(__f);
    name.strip_suffix("::__f").unwrap_or(name)
  }};
}

/// Logs with an explicit [`Severity`](crate::Severity).
#[macro_export]
macro_rules! log_with {
  ($sink:expr, $severity:expr, $($arg:tt)+) => {{
    use $crate::Sink as _;
    let __severity: $crate::Severity = $severity;
    let __message = ::std::format!($($arg)+);
    ($sink).log(&$crate::LogEvent::new(
      __severity.bit(),
      __severity.tag(),
      ::std::file!(),
      $crate::__function_name!(),
      ::std::line!(),
      &__message,
    ));
  }};
}

#[cfg(not(feature = "strip-fatal"))]
#[macro_export]
macro_rules! log_fatal { ($sink:expr, $($arg:tt)+) => { $crate::log_with!($sink, $crate::Severity::Fatal, $($arg)+) } }
#[cfg(feature = "strip-fatal")]
#[macro_export]
macro_rules! log_fatal { ($($arg:tt)*) => { () } }

#[cfg(not(feature = "strip-error"))]
#[macro_export]
macro_rules! log_error { ($sink:expr, $($arg:tt)+) => { $crate::log_with!($sink, $crate::Severity::Error, $($arg)+) } }
#[cfg(feature = "strip-error")]
#[macro_export]
macro_rules! log_error { ($($arg:tt)*) => { () } }

#[cfg(not(feature = "strip-warn"))]
#[macro_export]
macro_rules! log_warn { ($sink:expr, $($arg:tt)+) => { $crate::log_with!($sink, $crate::Severity::Warn, $($arg)+) } }
#[cfg(feature = "strip-warn")]
#[macro_export]
macro_rules! log_warn { ($($arg:tt)*) => { () } }

#[cfg(not(feature = "strip-info"))]
#[macro_export]
macro_rules! log_info { ($sink:expr, $($arg:tt)+) => { $crate::log_with!($sink, $crate::Severity::Info, $($arg)+) } }
#[cfg(feature = "strip-info")]
#[macro_export]
macro_rules! log_info { ($($arg:tt)*) => { () } }

#[cfg(not(feature = "strip-debug"))]
#[macro_export]
macro_rules! log_debug { ($sink:expr, $($arg:tt)+) => { $crate::log_with!($sink, $crate::Severity::Debug, $($arg)+) } }
#[cfg(feature = "strip-debug")]
#[macro_export]
macro_rules! log_debug { ($($arg:tt)*) => { () } }

#[cfg(not(feature = "strip-trace"))]
#[macro_export]
macro_rules! log_trace { ($sink:expr, $($arg:tt)+) => { $crate::log_with!($sink, $crate::Severity::Trace, $($arg)+) } }
#[cfg(feature = "strip-trace")]
#[macro_export]
macro_rules! log_trace { ($($arg:tt)*) => { () } }
