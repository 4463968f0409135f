//! File-based locking of a repo root.
//!
//! Two simultaneous pipeline runs against the same root would race on
//! directory creation and cloning, so an exclusive advisory lock is held for
//! the duration of a run. Metadata about the holder is written into the lock
//! file so contention errors can name the process that is in the way.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const LOCK_FILENAME: &str = ".buildprep.lock";

#[derive(Debug, Serialize, Deserialize)]
pub struct LockMetadata {
  pub version: u32,
  pub pid: u32,
  pub started_at_unix: u64,
  pub command: String,
  pub root: PathBuf,
}

#[derive(Debug, Error)]
pub enum LockError {
  #[error(
    "Repo root is locked by another process: {command} (PID {pid}, started {started_at})\n\
         If you're sure no buildprep process is running, remove the lock file:\n  {lock_path}"
  )]
  Contention {
    command: String,
    pid: u32,
    started_at: String,
    lock_path: PathBuf,
  },

  #[error(
    "Repo root is locked (could not read lock metadata)\n\
         If you're sure no buildprep process is running, remove the lock file:\n  {lock_path}"
  )]
  ContentionUnknown { lock_path: PathBuf },

  #[error("Failed to open lock file: {0}")]
  OpenFile(#[source] io::Error),

  #[error("Failed to write lock metadata: {0}")]
  WriteMetadata(#[source] io::Error),

  #[error("Failed to acquire lock: {0}")]
  LockFailed(#[source] io::Error),
}

/// An exclusive advisory lock on a repo root, released on drop.
#[derive(Debug)]
pub struct RootLock {
  _file: File,
  lock_path: PathBuf,
}

impl RootLock {
  pub fn acquire(root: &Path, command: &str) -> Result<Self, LockError> {
    let lock_path = root.join(LOCK_FILENAME);

    let file = OpenOptions::new()
      .read(true)
      .write(true)
      .create(true)
      .truncate(false)
      .open(&lock_path)
      .map_err(LockError::OpenFile)?;

    if let Err(err) = try_lock(&file) {
      if err.kind() == io::ErrorKind::WouldBlock {
        return Err(Self::read_contention_error(&lock_path));
      }
      return Err(LockError::LockFailed(err));
    }

    Self::write_metadata(&file, command, root)?;

    Ok(RootLock { _file: file, lock_path })
  }

  /// Reads the lock metadata from the held file handle.
  ///
  /// Useful for tests and diagnostics where the caller already holds the lock
  /// and opening a second handle would fail on Windows.
  pub fn read_metadata(&self) -> io::Result<LockMetadata> {
    use std::io::{Seek, SeekFrom};

    let mut file = &self._file;
    file.seek(SeekFrom::Start(0))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    serde_json::from_str(&contents).map_err(io::Error::other)
  }

  pub fn lock_path(&self) -> &Path {
    &self.lock_path
  }

  fn write_metadata(file: &File, command: &str, root: &Path) -> Result<(), LockError> {
    let metadata = LockMetadata {
      version: 1,
      pid: std::process::id(),
      started_at_unix: SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs(),
      command: command.to_string(),
      root: root.to_path_buf(),
    };

    file.set_len(0).map_err(LockError::WriteMetadata)?;
    let mut writer = io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &metadata)
      .map_err(|e| LockError::WriteMetadata(io::Error::other(e)))?;
    writer.flush().map_err(LockError::WriteMetadata)?;

    Ok(())
  }

  fn read_contention_error(lock_path: &Path) -> LockError {
    if let Ok(mut file) = File::open(lock_path) {
      let mut contents = String::new();
      if file.read_to_string(&mut contents).is_ok()
        && let Ok(metadata) = serde_json::from_str::<LockMetadata>(&contents)
      {
        return LockError::Contention {
          command: metadata.command,
          pid: metadata.pid,
          started_at: format!("Unix timestamp {}", metadata.started_at_unix),
          lock_path: lock_path.to_path_buf(),
        };
      }
    }

    LockError::ContentionUnknown {
      lock_path: lock_path.to_path_buf(),
    }
  }
}

#[cfg(unix)]
fn try_lock(file: &File) -> io::Result<()> {
  use rustix::fs::{FlockOperation, flock};
  use std::os::unix::io::AsFd;

  flock(file.as_fd(), FlockOperation::NonBlockingLockExclusive)
    .map_err(|e| io::Error::from_raw_os_error(e.raw_os_error()))
}

#[cfg(windows)]
fn try_lock(file: &File) -> io::Result<()> {
  use std::os::windows::io::AsRawHandle;
  use windows_sys::Win32::Foundation::HANDLE;
  use windows_sys::Win32::Storage::FileSystem::{
    LOCKFILE_EXCLUSIVE_LOCK, LOCKFILE_FAIL_IMMEDIATELY, LockFileEx,
  };

  let handle = file.as_raw_handle() as HANDLE;
  let flags = LOCKFILE_FAIL_IMMEDIATELY | LOCKFILE_EXCLUSIVE_LOCK;

  // SAFETY: OVERLAPPED is a plain data struct that is valid when zero-initialized.
  // LockFileEx is safe to call with a valid file handle and zeroed OVERLAPPED.
  let result = unsafe {
    let mut overlapped = std::mem::zeroed();
    LockFileEx(handle, flags, 0, 1, 0, &mut overlapped)
  };

  if result == 0 {
    Err(io::Error::last_os_error())
  } else {
    Ok(())
  }
}
