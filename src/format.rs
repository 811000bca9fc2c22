//! Placeholder substitution for message and time formats.
//!
//! Message format placeholders: `{TIME}` `{TAG}` `{FILE:long}` `{FILE:short}`
//! `{FUNCTION}` `{LINE}` `{HOST}` `{PID}` `{THREAD}` `{MESSAGE}`.
//!
//! Time format placeholders: `{YEAR}` `{MONTH:numeric|long|short}` `{DAY_YEAR}`
//! `{DAY_MONTH}` `{DAY_WEEK:numeric|long|short}` `{HOUR:24|12}` `{MERIDIEM}`
//! `{MINUTE}` `{SECOND}` `{MILLISECOND}`.
//!
//! Unknown placeholders stay in the output untouched. Message text is inserted
//! last and never expanded. Values inserted earlier (`{TAG}`, `{FILE:*}`,
//! `{FUNCTION}`) are still scanned by the later passes, so a tag of
//! `{MESSAGE}` turns into the message.

use std::collections::TryReserveError;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::sink::LogEvent;

pub const MESSAGE_PLACEHOLDER: &str = "{MESSAGE}";

/// Written in place of `{TIME}` when the local time cannot be resolved.
pub const TIME_ERROR: &str = "TIME_ERROR";

/// Written in place of `{HOST}` when the host name cannot be resolved.
pub const UNKNOWN_HOST: &str = "Unknown";

const MONTHS_LONG: [&str; 12] = [
  "January", "February", "March", "April", "May", "June",
  "July", "August", "September", "October", "November", "December",
];
const MONTHS_SHORT: [&str; 12] = [
  "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const DAYS_LONG: [&str; 7] = ["Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"];
const DAYS_SHORT: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Replaces every non-overlapping `placeholder` in `destination`.
///
/// Scanning resumes after each inserted replacement, so a replacement that
/// contains the placeholder is never expanded again.
pub fn replace_placeholder(destination: &mut String, placeholder: &str, replacement: &str) -> Result<(), TryReserveError> {
  if placeholder.is_empty() {
    return Ok(());
  }
  let mut position = 0;
  while let Some(found) = destination[position..].find(placeholder) {
    let start = position + found;
    if replacement.len() > placeholder.len() {
      destination.try_reserve(replacement.len() - placeholder.len())?;
    }
    destination.replace_range(start..start + placeholder.len(), replacement);
    position = start + replacement.len();
  }
  Ok(())
}

/// Like [`replace_placeholder`], but the replacement is only built when the
/// placeholder actually occurs.
#[inline]
fn replace_placeholder_with<R, F>(destination: &mut String, placeholder: &str, replacement: F) -> Result<(), TryReserveError>
where
  R: AsRef<str>,
  F: FnOnce() -> R,
{
  if !destination.contains(placeholder) {
    return Ok(());
  }
  replace_placeholder(destination, placeholder, replacement().as_ref())
}

/// Broken-down local time.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LocalTime {
  pub year: i32,
  /// 0..=11
  pub month: u32,
  /// 0..=365
  pub day_year: u32,
  /// 1..=31
  pub day_month: u32,
  /// 0..=6, Sunday = 0
  pub day_week: u32,
  pub hour: u32,
  pub minute: u32,
  pub second: u32,
  pub millisecond: u32,
}

impl LocalTime {
  pub fn now() -> Option<Self> {
    let since_epoch = SystemTime::now().duration_since(UNIX_EPOCH).ok()?;
    Self::from_unix(since_epoch.as_secs() as i64, since_epoch.subsec_millis())
  }

  #[cfg(unix)]
  pub fn from_unix(secs: i64, millisecond: u32) -> Option<Self> {
    let t = unsafe {
      let mut t: libc::tm = std::mem::zeroed();
      let tt: libc::time_t = secs as libc::time_t;
      if libc::localtime_r(&tt as *const libc::time_t, &mut t as *mut libc::tm).is_null() {
        return None;
      }
      t
    };
    Some(LocalTime {
      year: t.tm_year + 1900,
      month: t.tm_mon as u32,
      day_year: t.tm_yday as u32,
      day_month: t.tm_mday as u32,
      day_week: t.tm_wday as u32,
      hour: t.tm_hour as u32,
      minute: t.tm_min as u32,
      // leap second
      second: (t.tm_sec as u32).min(59),
      millisecond: millisecond.min(999),
    })
  }

  #[cfg(not(unix))]
  pub fn from_unix(_secs: i64, _millisecond: u32) -> Option<Self> {
    None
  }
}

/// Expands `time_format` for the current local time.
///
/// An empty format yields an empty string; an unresolvable clock yields
/// [`TIME_ERROR`].
pub fn format_time(time_format: &str) -> Result<String, TryReserveError> {
  format_time_at(time_format, LocalTime::now)
}

fn format_time_at<C>(time_format: &str, clock: C) -> Result<String, TryReserveError>
where
  C: FnOnce() -> Option<LocalTime>,
{
  if time_format.is_empty() {
    return Ok(String::new());
  }
  match clock() {
    Some(time) => expand_time(time_format, &time),
    None => Ok(TIME_ERROR.to_string()),
  }
}

pub fn expand_time(time_format: &str, time: &LocalTime) -> Result<String, TryReserveError> {
  let mut out = copy_of(time_format)?;
  let month = time.month as usize % 12;
  let day_week = time.day_week as usize % 7;
  let hour_12 = if time.hour % 12 == 0 { 12 } else { time.hour % 12 };

  replace_placeholder_with(&mut out, "{YEAR}", || format!("{:04}", time.year))?;
  replace_placeholder_with(&mut out, "{MONTH:numeric}", || two_digits(time.month + 1))?;
  replace_placeholder(&mut out, "{MONTH:long}", MONTHS_LONG[month])?;
  replace_placeholder(&mut out, "{MONTH:short}", MONTHS_SHORT[month])?;
  replace_placeholder_with(&mut out, "{DAY_YEAR}", || three_digits(time.day_year + 1))?;
  replace_placeholder_with(&mut out, "{DAY_MONTH}", || two_digits(time.day_month))?;
  replace_placeholder_with(&mut out, "{DAY_WEEK:numeric}", || time.day_week.to_string())?;
  replace_placeholder(&mut out, "{DAY_WEEK:long}", DAYS_LONG[day_week])?;
  replace_placeholder(&mut out, "{DAY_WEEK:short}", DAYS_SHORT[day_week])?;
  replace_placeholder_with(&mut out, "{HOUR:24}", || two_digits(time.hour))?;
  replace_placeholder_with(&mut out, "{HOUR:12}", || two_digits(hour_12))?;
  replace_placeholder(&mut out, "{MERIDIEM}", if time.hour < 12 { "AM" } else { "PM" })?;
  replace_placeholder_with(&mut out, "{MINUTE}", || two_digits(time.minute))?;
  replace_placeholder_with(&mut out, "{SECOND}", || two_digits(time.second))?;
  replace_placeholder_with(&mut out, "{MILLISECOND}", || three_digits(time.millisecond))?;
  Ok(out)
}

/// Expands the message `format` for one event and appends the trailing newline.
pub fn format_message(format: &str, time_format: &str, event: &LogEvent<'_>) -> Result<String, TryReserveError> {
  format_message_at(format, time_format, event, LocalTime::now)
}

fn format_message_at<C>(
  format: &str,
  time_format: &str,
  event: &LogEvent<'_>,
  clock: C,
) -> Result<String, TryReserveError>
where
  C: FnOnce() -> Option<LocalTime>,
{
  let mut out = copy_of(format)?;

  if out.contains("{TIME}") {
    let time = format_time_at(time_format, clock)?;
    replace_placeholder(&mut out, "{TIME}", &time)?;
  }
  replace_placeholder(&mut out, "{TAG}", event.tag)?;
  replace_placeholder(&mut out, "{FILE:long}", event.file)?;
  replace_placeholder(&mut out, "{FILE:short}", short_file_name(event.file))?;
  replace_placeholder(&mut out, "{FUNCTION}", event.function)?;
  replace_placeholder_with(&mut out, "{LINE}", || event.line.to_string())?;
  replace_placeholder_with(&mut out, "{HOST}", host_name)?;
  replace_placeholder_with(&mut out, "{PID}", || std::process::id().to_string())?;
  replace_placeholder_with(&mut out, "{THREAD}", thread_id)?;
  replace_placeholder(&mut out, MESSAGE_PLACEHOLDER, event.message)?;

  out.try_reserve(1)?;
  out.push('\n');
  Ok(out)
}

#[inline]
fn copy_of(s: &str) -> Result<String, TryReserveError> {
  let mut out = String::new();
  out.try_reserve(s.len() + 1)?;
  out.push_str(s);
  Ok(out)
}

pub fn short_file_name(file: &str) -> &str {
  Path::new(file)
    .file_name()
    .and_then(|name| name.to_str())
    .unwrap_or(file)
}

#[cfg(unix)]
pub fn host_name() -> String {
  let mut buf = [0u8; 256];
  let rc = unsafe { libc::gethostname(buf.as_mut_ptr() as *mut libc::c_char, buf.len()) };
  host_name_from(rc, &buf)
}

/// Decodes a `gethostname` result: a non-zero status, an empty name or a name
/// that is not UTF-8 all give [`UNKNOWN_HOST`].
#[cfg_attr(not(unix), allow(dead_code))]
fn host_name_from(status: i32, buf: &[u8]) -> String {
  if status != 0 {
    return UNKNOWN_HOST.to_string();
  }
  let len = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
  match std::str::from_utf8(&buf[..len]) {
    Ok(name) if !name.is_empty() => name.to_string(),
    _ => UNKNOWN_HOST.to_string(),
  }
}

#[cfg(not(unix))]
pub fn host_name() -> String {
  UNKNOWN_HOST.to_string()
}

#[cfg(target_os = "linux")]
pub fn thread_id() -> String {
  let tid = unsafe { libc::syscall(libc::SYS_gettid) };
  tid.to_string()
}

#[cfg(not(target_os = "linux"))]
pub fn thread_id() -> String {
  format!("{:?}", std::thread::current().id())
}

#[inline(always)]
fn push_two_digits(out: &mut String, x: u32) {
  let offset = ((x % 100) << 1) as usize;
  out.push(DEC_2DIGITS_LUT[offset] as char);
  out.push(DEC_2DIGITS_LUT[offset + 1] as char);
}

#[inline(always)]
fn two_digits(x: u32) -> String {
  let mut s = String::with_capacity(2);
  push_two_digits(&mut s, x);
  s
}

#[inline(always)]
fn three_digits(x: u32) -> String {
  let mut s = String::with_capacity(3);
  s.push((b'0' + ((x / 100) % 10) as u8) as char);
  push_two_digits(&mut s, x);
  s
}

const DEC_2DIGITS_LUT: [u8; 100 * 2] = *b"\
      0001020304050607080910111213141516171819\
      2021222324252627282930313233343536373839\
      4041424344454647484950515253545556575859\
      6061626364656667686970717273747576777879\
      8081828384858687888990919293949596979899";
