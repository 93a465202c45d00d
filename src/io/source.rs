//! Record source: a lazy sequence of [`Line`]s over one or more inputs.
//!
//! Inputs are opened one at a time, in order, when the iterator reaches
//! them. Each line is tagged with the input's index and the byte offset of
//! its first byte, which is the same key Hadoop's text input hands to a
//! mapper. Offsets count bytes of the decoded stream, so compressed inputs
//! get offsets into the uncompressed text.

use crate::error::{PipelineError, PipelineResult};
use crate::io::compression::decoding_reader;
use crate::io::glob::expand_inputs;
use crate::record::Line;
use std::fs::File;
use std::io::{self, BufRead, Cursor};
use std::path::{Path, PathBuf};

/// One input of a [`RecordSource`].
#[derive(Clone, Debug)]
pub enum Input {
    /// A file on disk, decompressed transparently when needed.
    File(PathBuf),
    /// Standard input (`-` on the command line).
    Stdin,
    /// In-memory text, mainly for tests and embedding.
    Memory { name: String, text: String },
}

impl Input {
    /// Path-like label used in logs and errors.
    pub fn label(&self) -> PathBuf {
        match self {
            Self::File(p) => p.clone(),
            Self::Stdin => PathBuf::from("-"),
            Self::Memory { name, .. } => PathBuf::from(name),
        }
    }

    fn open(&self) -> PipelineResult<Box<dyn BufRead + Send>> {
        let unavailable = |source: io::Error| PipelineError::SourceUnavailable {
            path: self.label(),
            source,
        };
        match self {
            Self::File(path) => {
                let f = File::open(path).map_err(unavailable)?;
                decoding_reader(f, path).map_err(unavailable)
            }
            Self::Stdin => decoding_reader(io::stdin(), "-").map_err(unavailable),
            Self::Memory { text, .. } => Ok(Box::new(Cursor::new(text.clone().into_bytes()))),
        }
    }
}

/// An ordered list of inputs that yields their lines lazily.
#[derive(Clone, Debug, Default)]
pub struct RecordSource {
    inputs: Vec<Input>,
}

impl RecordSource {
    /// Build a source from command-line style arguments: files,
    /// directories, glob patterns, or `-` for standard input.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> PipelineResult<Self> {
        if args.is_empty() {
            return Err(PipelineError::config("no input paths given"));
        }
        let mut inputs = Vec::new();
        for arg in args {
            let arg = arg.as_ref();
            if arg == "-" {
                inputs.push(Input::Stdin);
            } else {
                inputs.extend(expand_inputs(&[arg])?.into_iter().map(Input::File));
            }
        }
        Ok(Self { inputs })
    }

    /// Build a source over concrete files, in the given order.
    pub fn from_files<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>) -> Self {
        Self {
            inputs: paths
                .into_iter()
                .map(|p| Input::File(p.as_ref().to_path_buf()))
                .collect(),
        }
    }

    /// Build a single-input source over in-memory text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::default().with_text("memory", text)
    }

    /// Build a single-input source from individual lines.
    pub fn from_lines<S: AsRef<str>>(lines: impl IntoIterator<Item = S>) -> Self {
        let mut text = String::new();
        for line in lines {
            text.push_str(line.as_ref());
            text.push('\n');
        }
        Self::from_text(text)
    }

    /// Append another in-memory input.
    pub fn with_text(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.inputs.push(Input::Memory {
            name: name.into(),
            text: text.into(),
        });
        self
    }

    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Iterate over every line of every input.
    pub fn lines(&self) -> Lines<'_> {
        Lines {
            inputs: &self.inputs,
            next_input: 0,
            current: None,
            buf: Vec::new(),
            done: false,
        }
    }
}

struct OpenInput {
    index: usize,
    label: PathBuf,
    reader: Box<dyn BufRead + Send>,
    offset: u64,
}

/// Lazy line iterator returned by [`RecordSource::lines`].
///
/// Yields `Err` at most once: after an I/O failure the iterator is fused.
pub struct Lines<'a> {
    inputs: &'a [Input],
    next_input: usize,
    current: Option<OpenInput>,
    buf: Vec<u8>,
    done: bool,
}

impl Lines<'_> {
    fn advance_input(&mut self) -> PipelineResult<bool> {
        let Some(input) = self.inputs.get(self.next_input) else {
            return Ok(false);
        };
        let index = self.next_input;
        self.next_input += 1;
        tracing::debug!(input = %input.label().display(), index, "opening input");
        self.current = Some(OpenInput {
            index,
            label: input.label(),
            reader: input.open()?,
            offset: 0,
        });
        Ok(true)
    }
}

impl Iterator for Lines<'_> {
    type Item = PipelineResult<Line>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            if self.current.is_none() {
                match self.advance_input() {
                    Ok(true) => {}
                    Ok(false) => {
                        self.done = true;
                        return None;
                    }
                    Err(e) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                }
            }
            let Some(open) = self.current.as_mut() else {
                continue;
            };

            self.buf.clear();
            match open.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => {
                    self.current = None;
                }
                Ok(n) => {
                    let start = open.offset;
                    open.offset += n as u64;
                    let mut end = self.buf.len();
                    if end > 0 && self.buf[end - 1] == b'\n' {
                        end -= 1;
                        if end > 0 && self.buf[end - 1] == b'\r' {
                            end -= 1;
                        }
                    }
                    let text = String::from_utf8_lossy(&self.buf[..end]).into_owned();
                    return Some(Ok(Line::new(open.index, start, text)));
                }
                Err(source) => {
                    self.done = true;
                    return Some(Err(PipelineError::SourceUnavailable {
                        path: open.label.clone(),
                        source,
                    }));
                }
            }
        }
    }
}
