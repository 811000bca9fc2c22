use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sink::RawSink;
use crate::sink_base::{SinkBase, SinkBaseConfig};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSinkConfig {
  #[serde(flatten)]
  pub base: SinkBaseConfig,
  pub path: PathBuf,
  /// Append to an existing file instead of truncating it.
  pub append: bool,
}

impl Default for FileSinkConfig {
  fn default() -> Self {
    Self {
      base: SinkBaseConfig::default(),
      path: PathBuf::new(),
      append: true,
    }
  }
}

#[derive(Debug)]
struct Target {
  path: PathBuf,
  append: bool,
  file: Option<BufWriter<File>>,
}

impl Target {
  fn reopen(&mut self) -> Result<()> {
    // Flushes and closes the previous handle first.
    self.file = None;

    let mut options = OpenOptions::new();
    options.create(true);
    if self.append {
      options.append(true);
    } else {
      options.write(true).truncate(true);
    }
    let file = options.open(&self.path).map_err(|source| Error::Open {
      path: self.path.clone(),
      source,
    })?;
    self.file = Some(BufWriter::new(file));
    Ok(())
  }
}

fn opened(path: &Path, append: bool) {
  tracing::info!(path = %path.display(), append, "opened log file");
}

/// Write primitive behind [`FileSink`]. Flushes after every message.
#[derive(Debug)]
pub struct FileWriter {
  target: Mutex<Target>,
}

impl FileWriter {
  pub fn open(path: impl Into<PathBuf>, append: bool) -> Result<Self> {
    let path = path.into();
    if path.as_os_str().is_empty() {
      return Err(Error::EmptyPath);
    }
    let mut target = Target {
      path,
      append,
      file: None,
    };
    target.reopen()?;
    opened(&target.path, append);
    Ok(Self {
      target: Mutex::new(target),
    })
  }

  #[inline]
  fn lock(&self) -> MutexGuard<'_, Target> {
    self.target.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }

  pub fn path(&self) -> PathBuf {
    self.lock().path.clone()
  }

  pub fn append(&self) -> bool {
    self.lock().append
  }

  pub fn is_open(&self) -> bool {
    self.lock().file.is_some()
  }

  fn set_path(&self, path: PathBuf) -> Result<()> {
    if path.as_os_str().is_empty() {
      return Err(Error::EmptyPath);
    }
    let append = {
      let mut target = self.lock();
      target.path = path.clone();
      target.reopen()?;
      target.append
    };
    opened(&path, append);
    Ok(())
  }

  fn set_append(&self, append: bool) -> Result<()> {
    let path = {
      let mut target = self.lock();
      if target.append == append {
        return Ok(());
      }
      target.append = append;
      target.reopen()?;
      target.path.clone()
    };
    opened(&path, append);
    Ok(())
  }
}

impl RawSink for FileWriter {
  fn write(&self, _severity_bit: u8, message: &str) -> bool {
    let written = {
      let mut target = self.lock();
      let Some(file) = target.file.as_mut() else {
        return false;
      };
      file.write_all(message.as_bytes()).and_then(|()| file.flush())
    };
    match written {
      Ok(()) => true,
      Err(err) => {
        tracing::debug!(error = %err, "could not write to the log file");
        false
      }
    }
  }
}

/// Leaf sink appending to (or truncating) a file.
pub type FileSink = SinkBase<FileWriter>;

impl SinkBase<FileWriter> {
  pub fn new(name: impl Into<String>, config: &FileSinkConfig) -> Result<Self> {
    SinkBase::with_writer(name, &config.base, FileWriter::open(&config.path, config.append)?)
  }

  pub fn file(&self) -> PathBuf {
    self.writer().path()
  }

  /// Switches to another file. On failure the sink is left without a target and
  /// every write is a lost log until a later call succeeds.
  pub fn set_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
    self.writer().set_path(path.as_ref().to_path_buf())
  }

  pub fn append_mode(&self) -> bool {
    self.writer().append()
  }

  /// Reopens the current file when the mode changes.
  pub fn set_append_mode(&mut self, append: bool) -> Result<()> {
    self.writer().set_append(append)
  }

  pub fn config(&self) -> FileSinkConfig {
    FileSinkConfig {
      base: self.base_config(),
      path: self.file(),
      append: self.append_mode(),
    }
  }
}
