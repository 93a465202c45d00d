//! Input and output plumbing: input expansion, decompression, the lazy
//! record source and the committing sinks.

pub mod compression;
pub mod glob;
pub mod sink;
pub mod source;

pub use sink::{FileSink, MemorySink, MemorySinkHandle, Sink, StdoutSink, open_sink};
pub use source::{Input, Lines, RecordSource};
