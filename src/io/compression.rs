//! Transparent decompression of inputs.
//!
//! An input is decoded by the first registered [`Decompressor`] that claims
//! its file name; failing that, by the first one that recognizes the
//! stream's leading bytes. Anything else is read as plain text.
//!
//! Built in (each behind a default feature):
//!
//! - gzip, `.gz` / `.gzip` (`compression-gzip`, via `flate2`)
//! - bzip2, `.bz2` / `.bzip2` (`compression-bzip2`, via `bzip2`)
//!
//! Both decode multi-member streams, so concatenated archives read through
//! to the end. More formats can be plugged in with [`register_decompressor`].

use std::io::{self, BufRead, BufReader, Cursor, Read};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Bytes read from the head of an input before picking a format.
const PEEK_LEN: u64 = 16;

type Registry = Vec<Arc<dyn Decompressor>>;

static DECOMPRESSORS: RwLock<Option<Registry>> = RwLock::new(None);

fn builtin() -> Registry {
    let mut all: Registry = Vec::new();
    #[cfg(feature = "compression-gzip")]
    all.push(Arc::new(Gzip));
    #[cfg(feature = "compression-bzip2")]
    all.push(Arc::new(Bzip2));
    all
}

fn decompressors() -> Registry {
    let mut slot = DECOMPRESSORS.write().unwrap_or_else(PoisonError::into_inner);
    slot.get_or_insert_with(builtin).clone()
}

/// Add a format. Later registrations are consulted after the built-ins.
pub fn register_decompressor(codec: Arc<dyn Decompressor>) {
    let mut slot = DECOMPRESSORS.write().unwrap_or_else(PoisonError::into_inner);
    slot.get_or_insert_with(builtin).push(codec);
}

/// A compressed input format.
pub trait Decompressor: Send + Sync {
    /// Format name for logs.
    fn name(&self) -> &'static str;

    /// File name suffixes (lowercase, with the dot) that select this format.
    fn suffixes(&self) -> &'static [&'static str];

    /// Leading bytes of every stream in this format.
    fn signature(&self) -> &'static [u8];

    /// Whether `head` (at most 16 bytes) starts a stream in this format.
    fn sniff(&self, head: &[u8]) -> bool {
        let sig = self.signature();
        !sig.is_empty() && head.starts_with(sig)
    }

    /// Wrap `raw` so that reads yield decompressed bytes.
    fn decode(&self, raw: Box<dyn Read + Send>) -> Box<dyn Read + Send>;
}

fn by_suffix(path: &Path) -> Option<Arc<dyn Decompressor>> {
    let name = path.to_string_lossy().to_lowercase();
    decompressors()
        .into_iter()
        .find(|d| d.suffixes().iter().any(|s| name.ends_with(s)))
}

fn by_signature(head: &[u8]) -> Option<Arc<dyn Decompressor>> {
    decompressors().into_iter().find(|d| d.sniff(head))
}

/// Buffered reader over the decoded contents of `reader`.
///
/// `path_hint` is only used to pick a format by suffix and for logging.
pub fn decoding_reader<R: Read + Send + 'static>(
    mut reader: R,
    path_hint: impl AsRef<Path>,
) -> io::Result<Box<dyn BufRead + Send>> {
    let path = path_hint.as_ref();
    if let Some(d) = by_suffix(path) {
        debug!(format = d.name(), path = %path.display(), "decompressing by suffix");
        return Ok(Box::new(BufReader::new(d.decode(Box::new(reader)))));
    }

    // A single read may come back short (pipes), so fill the peek window.
    let mut head = Vec::with_capacity(PEEK_LEN as usize);
    (&mut reader).take(PEEK_LEN).read_to_end(&mut head)?;
    let found = by_signature(&head);
    let stream = Cursor::new(head).chain(reader);
    match found {
        Some(d) => {
            debug!(format = d.name(), path = %path.display(), "decompressing by signature");
            Ok(Box::new(BufReader::new(d.decode(Box::new(stream)))))
        }
        None => Ok(Box::new(BufReader::new(stream))),
    }
}

/* ===================== gzip ===================== */

#[cfg(feature = "compression-gzip")]
struct Gzip;

#[cfg(feature = "compression-gzip")]
impl Decompressor for Gzip {
    fn name(&self) -> &'static str {
        "gzip"
    }

    fn suffixes(&self) -> &'static [&'static str] {
        &[".gz", ".gzip"]
    }

    fn signature(&self) -> &'static [u8] {
        &[0x1f, 0x8b]
    }

    fn decode(&self, raw: Box<dyn Read + Send>) -> Box<dyn Read + Send> {
        Box::new(flate2::read::MultiGzDecoder::new(raw))
    }
}

/* ===================== bzip2 ===================== */

#[cfg(feature = "compression-bzip2")]
struct Bzip2;

#[cfg(feature = "compression-bzip2")]
impl Decompressor for Bzip2 {
    fn name(&self) -> &'static str {
        "bzip2"
    }

    fn suffixes(&self) -> &'static [&'static str] {
        &[".bz2", ".bzip2"]
    }

    fn signature(&self) -> &'static [u8] {
        b"BZh"
    }

    /// `BZh`, a block size digit, then the block (or end-of-stream) magic.
    fn sniff(&self, head: &[u8]) -> bool {
        const BLOCK: [u8; 6] = [0x31, 0x41, 0x59, 0x26, 0x53, 0x59];
        const END: [u8; 6] = [0x17, 0x72, 0x45, 0x38, 0x50, 0x90];
        match head {
            [b'B', b'Z', b'h', level, magic @ ..] if (b'1'..=b'9').contains(level) => {
                magic.starts_with(&BLOCK) || magic.starts_with(&END)
            }
            _ => false,
        }
    }

    fn decode(&self, raw: Box<dyn Read + Send>) -> Box<dyn Read + Send> {
        Box::new(bzip2::read::MultiBzDecoder::new(raw))
    }
}
