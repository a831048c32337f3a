//! Rotating log file writer with size-based rotation and backup retention.
//!
//! [`FileWriter`] is the sink behind the `fmt` layer installed by
//! [`init_tracing`](super::init_tracing). It implements
//! [`MakeWriter`], so every formatted event is appended to the log file,
//! which is rotated once it grows past the size threshold.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::MakeWriter;

const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// Rotated files kept next to the live log.
const MAX_BACKUP_FILES: usize = 3;

/// Appending log sink shared by every thread that logs.
///
/// A write that finds the live file over `max_bytes` first moves it aside as
/// `<name>.<nanos>` and drops all but the newest [`MAX_BACKUP_FILES`] of
/// those; the write then goes to a fresh file.
pub struct FileWriter {
    file_path: PathBuf,
    max_bytes: u64,
    /// `None` until the first write, and again right after a rotation.
    writer: Mutex<Option<fs::File>>,
}

impl FileWriter {
    /// Creates a writer for `file_path`. The file is not opened until the
    /// first write.
    #[must_use]
    pub const fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            max_bytes: DEFAULT_MAX_BYTES,
            writer: Mutex::new(None),
        }
    }

    /// Overrides the rotation threshold.
    #[must_use]
    pub const fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Appends `bytes` to the file, rotating first if it is over the limit.
    ///
    /// # Errors
    ///
    /// Fails on file system errors or if another thread panicked while
    /// holding the lock.
    pub fn write_bytes(&self, bytes: &[u8]) -> io::Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| io::Error::other(format!("Mutex poisoned: {e}")))?;

        self.check_and_rotate(&mut writer)?;

        if writer.is_none() {
            *writer = Some(OpenOptions::new().create(true).append(true).open(&self.file_path)?);
        }
        let file = writer.as_mut().ok_or_else(|| io::Error::other("No file available"))?;

        file.write_all(bytes)?;
        file.flush()
    }

    fn check_and_rotate(&self, writer: &mut Option<fs::File>) -> io::Result<()> {
        if let Ok(metadata) = fs::metadata(&self.file_path) {
            if metadata.len() > self.max_bytes {
                *writer = None;
                self.rotate_files()?;
            }
        }
        Ok(())
    }

    /// Renames the current file to `<name>.<unix_timestamp_nanos>` and prunes
    /// old backups.
    fn rotate_files(&self) -> io::Result<()> {
        let timestamp = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let file_name = self.file_name()?;
        let backup_path = self.file_path.with_file_name(format!("{file_name}.{timestamp}"));

        if self.file_path.exists() {
            fs::rename(&self.file_path, &backup_path)?;
        }

        self.cleanup_old_backups()
    }

    fn file_name(&self) -> io::Result<String> {
        self.file_path
            .file_name()
            .and_then(|s| s.to_str())
            .map(str::to_string)
            .ok_or_else(|| io::Error::other("Invalid file name"))
    }

    /// Removes backups beyond the retention limit, newest kept. Individual
    /// deletion errors are ignored.
    fn cleanup_old_backups(&self) -> io::Result<()> {
        let parent_dir = self
            .file_path
            .parent()
            .ok_or_else(|| io::Error::other("No parent directory"))?;
        let prefix = format!("{}.", self.file_name()?);

        let mut backups: Vec<PathBuf> = fs::read_dir(parent_dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(&prefix))
            })
            .collect();

        // Names end in a timestamp, so lexical order is age order.
        backups.sort_by(|a, b| b.cmp(a));

        for old_backup in backups.iter().skip(MAX_BACKUP_FILES) {
            let _ = fs::remove_file(old_backup);
        }

        Ok(())
    }
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("file_path", &self.file_path)
            .field("max_bytes", &self.max_bytes)
            .finish_non_exhaustive()
    }
}

/// Per-event handle returned by [`FileWriter::make_writer`].
#[derive(Debug)]
pub struct FileWriterGuard<'a>(&'a FileWriter);

impl Write for FileWriterGuard<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for FileWriter {
    type Writer = FileWriterGuard<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        FileWriterGuard(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotates_and_keeps_three_backups() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flashdeck.log");
        let writer = FileWriter::new(path.clone()).with_max_bytes(16);

        for i in 0..6 {
            writer.write_bytes(format!("line number {i:02} of the log\n").as_bytes()).unwrap();
        }

        let backups = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with("flashdeck.log."))
            .count();
        assert_eq!(backups, MAX_BACKUP_FILES);
        assert_eq!(fs::read_to_string(&path).unwrap(), "line number 05 of the log\n");
    }

    #[test]
    fn make_writer_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flashdeck.log");
        let writer = FileWriter::new(path.clone());

        writer.make_writer().write_all(b"first\n").unwrap();
        writer.make_writer().write_all(b"second\n").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "first\nsecond\n");
    }
}
