//! Sinks: where reducer output goes.
//!
//! Every sink stages its output and only makes it visible on
//! [`Sink::commit`]. A run that fails never calls `commit`, so nothing is
//! left at the destination: a file sink writes to a temporary file next to
//! the target and renames it into place, the stdout sink buffers until
//! commit.
//!
//! Formatting follows [`OutputRecord::render`]: one `key<TAB>value` line per
//! record, the non-null side alone when the other is the null-marker, and
//! multi-line values (markup documents) verbatim.

use crate::error::{PipelineError, PipelineResult};
use crate::record::OutputRecord;
use std::fs::create_dir_all;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// Destination for output records, in group order.
pub trait Sink {
    /// Stage one record.
    fn write(&mut self, record: &OutputRecord) -> PipelineResult<()>;

    /// Publish everything staged so far. Called once, after the last record.
    fn commit(self: Box<Self>) -> PipelineResult<()>;

    /// Number of records written so far (null/null records are not counted).
    fn records_written(&self) -> u64;
}

/// Stage a record into `w`, returning whether a line was produced.
fn write_rendered<W: Write>(w: &mut W, record: &OutputRecord) -> io::Result<bool> {
    match record.render() {
        Some(line) => {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/* ===================== FileSink ===================== */

/// Writes to a file, committed atomically by rename.
pub struct FileSink {
    path: PathBuf,
    staged: BufWriter<NamedTempFile>,
    written: u64,
}

impl FileSink {
    /// Create the staging file. Parent directories of `path` are created.
    pub fn create(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let path = path.as_ref().to_path_buf();
        let unavailable = |source: io::Error| PipelineError::SinkUnavailable {
            path: path.clone(),
            source,
        };
        if path.is_dir() {
            return Err(unavailable(io::Error::new(
                io::ErrorKind::IsADirectory,
                "output path is a directory",
            )));
        }
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        create_dir_all(&parent).map_err(unavailable)?;
        let tmp = NamedTempFile::new_in(&parent).map_err(unavailable)?;
        Ok(Self {
            path,
            staged: BufWriter::new(tmp),
            written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, source: io::Error) -> PipelineError {
        PipelineError::SinkUnavailable {
            path: self.path.clone(),
            source,
        }
    }
}

impl Sink for FileSink {
    fn write(&mut self, record: &OutputRecord) -> PipelineResult<()> {
        if write_rendered(&mut self.staged, record).map_err(|e| self.unavailable(e))? {
            self.written += 1;
        }
        Ok(())
    }

    fn commit(self: Box<Self>) -> PipelineResult<()> {
        let FileSink { path, staged, .. } = *self;
        let unavailable = |source: io::Error| PipelineError::SinkUnavailable {
            path: path.clone(),
            source,
        };
        let tmp = staged.into_inner().map_err(|e| unavailable(e.into_error()))?;
        tmp.as_file().sync_all().map_err(unavailable)?;
        tmp.persist(&path).map_err(|e| unavailable(e.error))?;
        tracing::debug!(path = %path.display(), "output committed");
        Ok(())
    }

    fn records_written(&self) -> u64 {
        self.written
    }
}

/* ===================== StdoutSink ===================== */

/// Buffers output in memory and prints it on commit.
#[derive(Default)]
pub struct StdoutSink {
    buf: Vec<u8>,
    written: u64,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sink for StdoutSink {
    fn write(&mut self, record: &OutputRecord) -> PipelineResult<()> {
        // Writing into a Vec cannot fail.
        if write_rendered(&mut self.buf, record).unwrap_or(false) {
            self.written += 1;
        }
        Ok(())
    }

    fn commit(self: Box<Self>) -> PipelineResult<()> {
        let unavailable = |source: io::Error| PipelineError::SinkUnavailable {
            path: PathBuf::from("-"),
            source,
        };
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        lock.write_all(&self.buf).map_err(unavailable)?;
        lock.flush().map_err(unavailable)
    }

    fn records_written(&self) -> u64 {
        self.written
    }
}

/* ===================== MemorySink ===================== */

/// Collects rendered lines in memory; committed lines are visible through
/// the [`MemorySinkHandle`] returned by [`MemorySink::new`].
pub struct MemorySink {
    staged: Vec<u8>,
    records: Vec<OutputRecord>,
    target: Arc<Mutex<Option<Committed>>>,
}

#[derive(Clone, Debug, Default)]
struct Committed {
    text: String,
    records: Vec<OutputRecord>,
}

/// Read side of a [`MemorySink`].
#[derive(Clone, Default)]
pub struct MemorySinkHandle {
    target: Arc<Mutex<Option<Committed>>>,
}

impl MemorySink {
    /// Create a sink plus the handle that observes what it commits.
    pub fn new() -> (Self, MemorySinkHandle) {
        let target = Arc::new(Mutex::new(None));
        (
            Self {
                staged: Vec::new(),
                records: Vec::new(),
                target: Arc::clone(&target),
            },
            MemorySinkHandle { target },
        )
    }
}

impl Sink for MemorySink {
    fn write(&mut self, record: &OutputRecord) -> PipelineResult<()> {
        if write_rendered(&mut self.staged, record).unwrap_or(false) {
            self.records.push(record.clone());
        }
        Ok(())
    }

    fn commit(self: Box<Self>) -> PipelineResult<()> {
        let MemorySink {
            staged,
            records,
            target,
        } = *self;
        let text = String::from_utf8(staged).map_err(|e| PipelineError::Other(e.into()))?;
        let mut slot = target.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(Committed { text, records });
        Ok(())
    }

    fn records_written(&self) -> u64 {
        self.records.len() as u64
    }
}

impl MemorySinkHandle {
    /// Whether the sink was committed.
    pub fn is_committed(&self) -> bool {
        self.target
            .lock()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }

    /// The committed output text, or `None` if the run never committed.
    pub fn text(&self) -> Option<String> {
        let slot = self.target.lock().ok()?;
        slot.as_ref().map(|c| c.text.clone())
    }

    /// The committed output split into lines (empty if not committed).
    pub fn lines(&self) -> Vec<String> {
        self.text()
            .map(|t| t.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// The committed records, in write order.
    pub fn records(&self) -> Vec<OutputRecord> {
        self.target
            .lock()
            .ok()
            .and_then(|slot| slot.as_ref().map(|c| c.records.clone()))
            .unwrap_or_default()
    }
}

/// Open the sink named by a command-line argument: `-` for stdout,
/// anything else is a file path.
pub fn open_sink(dest: &str) -> PipelineResult<Box<dyn Sink>> {
    if dest == "-" {
        Ok(Box::new(StdoutSink::new()))
    } else {
        Ok(Box::new(FileSink::create(dest)?))
    }
}
