//! Output sinks for extracted entries
//!
//! A sink owns its destination for the lifetime of a crawl. The crawler
//! appends one key's entries at a time, so whatever has been appended
//! survives an aborted run.

use crate::index::Entry;
use crate::{HarvestError, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Destination for extracted entries
///
/// Appends are never interleaved: the crawler holds the only `&mut` to the
/// sink and appends from a single flow.
pub trait OutputSink {
    /// Appends entries in order, one per line
    fn append(&mut self, entries: &[Entry]) -> Result<()>;

    /// Flushes and releases the destination; further appends fail
    fn close(&mut self) -> Result<()>;
}

/// Writes entries to a plain UTF-8 text file, one per line
///
/// Lines are newline-joined across every append with no trailing newline,
/// so reading the file back and splitting on `\n` yields one line per
/// entry appended. Line breaks inside an entry are written as spaces. The file is flushed after every append and again when
/// the sink is dropped.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    entries_written: u64,
}

impl FileSink {
    /// Creates (or truncates) the file, creating parent directories as needed
    ///
    /// # Errors
    ///
    /// Returns `HarvestError::Output` if the directory or file cannot be
    /// created.
    pub fn create(path: &Path) -> Result<Self> {
        let output_error = |source: std::io::Error| HarvestError::Output {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(output_error)?;
        }

        let file = File::create(path).map_err(output_error)?;
        tracing::debug!("Opened output file {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            writer: Some(BufWriter::new(file)),
            entries_written: 0,
        })
    }

    /// Number of entries written so far
    pub fn entries_written(&self) -> u64 {
        self.entries_written
    }

    fn output_error(&self, source: std::io::Error) -> HarvestError {
        HarvestError::Output {
            path: self.path.clone(),
            source,
        }
    }
}

impl OutputSink for FileSink {
    fn append(&mut self, entries: &[Entry]) -> Result<()> {
        let Some(writer) = self.writer.as_mut() else {
            return Err(self.output_error(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "output sink is closed",
            )));
        };

        let mut written = self.entries_written;
        let result = entries
            .iter()
            .try_for_each(|entry| {
                if written > 0 {
                    writer.write_all(b"\n")?;
                }
                write_single_line(writer, entry)?;
                written += 1;
                Ok::<(), std::io::Error>(())
            })
            .and_then(|()| writer.flush());
        self.entries_written = written;

        result.map_err(|e| self.output_error(e))
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| self.output_error(e))?;
            tracing::debug!(
                "Closed output file {} after {} entries",
                self.path.display(),
                self.entries_written
            );
        }
        Ok(())
    }
}

/// Writes `entry` with any `\r` or `\n` replaced by a space
fn write_single_line(writer: &mut impl Write, entry: &str) -> std::io::Result<()> {
    if !entry.contains(['\r', '\n']) {
        return writer.write_all(entry.as_bytes());
    }
    writer.write_all(entry.replace(['\r', '\n'], " ").as_bytes())
}

/// Collects entries in memory; handy for previews and tests
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    entries: Vec<Entry>,
    appends: usize,
    closed: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything appended so far, in order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of append calls received
    pub fn appends(&self) -> usize {
        self.appends
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl OutputSink for MemorySink {
    fn append(&mut self, entries: &[Entry]) -> Result<()> {
        if self.closed {
            return Err(HarvestError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "output sink is closed",
            )));
        }
        self.entries.extend_from_slice(entries);
        self.appends += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn words(list: &[&str]) -> Vec<Entry> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_appends_are_newline_joined_across_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("words.tsv");

        let mut sink = FileSink::create(&path).unwrap();
        sink.append(&words(&["apple", "ant", "azure"])).unwrap();
        sink.append(&[]).unwrap();
        sink.append(&words(&["banana"])).unwrap();
        sink.close().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "apple\nant\nazure\nbanana");
        assert_eq!(sink.entries_written(), 4);
    }

    #[test]
    fn test_line_breaks_inside_an_entry_never_split_it() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("words.tsv");

        let entries = words(&["\n  apple\n", "ant", "sickle\r\ncell"]);
        let mut sink = FileSink::create(&path).unwrap();
        sink.append(&entries).unwrap();
        sink.close().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.split('\n').collect();
        assert_eq!(lines.len(), entries.len());
        assert_eq!(lines, vec!["   apple ", "ant", "sickle  cell"]);
    }

    #[test]
    fn test_creates_parent_directories_and_truncates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/words.tsv");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "stale content").unwrap();

        let mut sink = FileSink::create(&path).unwrap();
        sink.close().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_entries_are_visible_before_close() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("partial.tsv");

        let mut sink = FileSink::create(&path).unwrap();
        sink.append(&words(&["first"])).unwrap();

        // Flushed per append, so a crash here would still leave this on disk
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first");
        drop(sink);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first");
    }

    #[test]
    fn test_append_after_close_fails() {
        let dir = TempDir::new().unwrap();
        let mut sink = FileSink::create(&dir.path().join("closed.tsv")).unwrap();
        sink.close().unwrap();
        assert!(matches!(
            sink.append(&words(&["late"])),
            Err(HarvestError::Output { .. })
        ));
    }

    #[test]
    fn test_unwritable_destination_is_output_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "file in the way").unwrap();

        let result = FileSink::create(&blocker.join("words.tsv"));
        assert!(matches!(result, Err(HarvestError::Output { .. })));
    }

    #[test]
    fn test_memory_sink() {
        let mut sink = MemorySink::new();
        sink.append(&words(&["a", "b"])).unwrap();
        sink.append(&words(&["c"])).unwrap();
        sink.close().unwrap();

        assert_eq!(sink.entries(), &words(&["a", "b", "c"])[..]);
        assert_eq!(sink.appends(), 2);
        assert!(sink.is_closed());
        assert!(sink.append(&words(&["d"])).is_err());
    }
}
