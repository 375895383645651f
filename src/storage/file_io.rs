//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't leave a partial backup behind on
//! failure. Errors are returned as plain `io::Error`; callers wrap them in the
//! `SaveBackupError` variant that fits their context.

use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Create a directory and every missing parent
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

/// Write text to a file atomically (write to temp, then rename)
///
/// The destination is either completely written or not modified at all. An
/// existing destination is replaced.
pub fn write_text_atomic(path: &Path, text: &str) -> io::Result<()> {
    let temp_path = temp_sibling(path);

    if let Err(e) = write_temp(&temp_path, text) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    fs::rename(&temp_path, path).map_err(|e| {
        // Try to clean up temp file if rename fails
        let _ = fs::remove_file(&temp_path);
        e
    })
}

fn write_temp(temp_path: &Path, text: &str) -> io::Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)?;

    let mut writer = BufWriter::new(file);
    writer.write_all(text.as_bytes())?;
    writer.flush()?;

    // Sync to disk before rename
    writer.get_ref().sync_all()
}

/// Temp file in the same directory (important for atomic rename)
fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Create a file holding `text` only if nothing exists at `path` yet
///
/// Returns `Ok(false)` without touching the file when it already exists.
pub fn create_text_new(path: &Path, text: &str) -> io::Result<bool> {
    let file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(e),
    };

    let mut writer = BufWriter::new(file);
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    Ok(true)
}

/// Append text to a file, creating the file if absent
///
/// Each call is flushed immediately.
pub fn append_text(path: &Path, text: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(text.as_bytes())?;
    file.flush()
}
