//! Record sources.
//!
//! A source opens a named stream of [`Record`]s. It yields one record per
//! line in source order, at most one terminal `Record::Failed` on I/O
//! failure, and then closes.

use futures::stream::{self, BoxStream, StreamExt};
use profiling_core::{Record, SourceError};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing::debug;

/// Longest accepted line, excluding its terminator.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Produces record streams by name.
pub trait RecordSource: Send + Sync {
    /// Opens the stream called `name`.
    fn open(&self, name: &str) -> BoxStream<'static, Record>;
}

/// Reads newline-delimited JSON files below a root directory.
#[derive(Debug, Clone)]
pub struct JsonLinesSource {
    root: PathBuf,
}

impl JsonLinesSource {
    /// Creates a source resolving stream names relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl RecordSource for JsonLinesSource {
    fn open(&self, name: &str) -> BoxStream<'static, Record> {
        let path = self.root.join(name);
        let label = path.display().to_string();
        debug!("Opening record stream {}", label);

        stream::once(async move { tokio::fs::File::open(&path).await })
            .flat_map(move |opened| match opened {
                Ok(file) => lines(BufReader::new(file), label.clone()),
                Err(source) => stream::iter([Record::Failed(SourceError::Open {
                    path: label.clone(),
                    source,
                })])
                .boxed(),
            })
            .boxed()
    }
}

struct LineState<R> {
    reader: R,
    label: String,
    max_line: usize,
}

/// Streams the non-blank lines of `reader` as records.
///
/// Line terminators (`\n` or `\r\n`) are stripped. A read error, or a line
/// longer than [`MAX_LINE_BYTES`], ends the stream with a single
/// `Record::Failed` labelled with `label`.
pub fn lines<R>(reader: R, label: impl Into<String>) -> BoxStream<'static, Record>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    lines_with_limit(reader, label, MAX_LINE_BYTES)
}

/// Like [`lines`], with an explicit maximum line length in bytes.
pub fn lines_with_limit<R>(
    reader: R,
    label: impl Into<String>,
    max_line: usize,
) -> BoxStream<'static, Record>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let state = LineState {
        reader,
        label: label.into(),
        max_line,
    };

    stream::unfold(Some(state), |state| async move {
        let mut state = state?;
        loop {
            let mut buf = Vec::new();
            // One byte for the terminator, one more to detect overlong lines.
            let limit = state.max_line as u64 + 2;
            let read = (&mut state.reader)
                .take(limit)
                .read_until(b'\n', &mut buf)
                .await;
            match read {
                Ok(0) => return None,
                Ok(_) if exceeds(&buf, state.max_line) => {
                    let err = SourceError::Read {
                        path: state.label,
                        source: std::io::Error::new(
                            std::io::ErrorKind::InvalidData,
                            format!("line exceeds {} bytes", state.max_line),
                        ),
                    };
                    return Some((Record::Failed(err), None));
                }
                Ok(_) => {
                    trim_line_end(&mut buf);
                    if buf.iter().all(u8::is_ascii_whitespace) {
                        continue;
                    }
                    return Some((Record::Body(buf), Some(state)));
                }
                Err(source) => {
                    let err = SourceError::Read {
                        path: state.label,
                        source,
                    };
                    return Some((Record::Failed(err), None));
                }
            }
        }
    })
    .boxed()
}

fn exceeds(buf: &[u8], max_line: usize) -> bool {
    let content = match buf {
        [rest @ .., b'\r', b'\n'] => rest,
        [rest @ .., b'\n'] => rest,
        rest => rest,
    };
    content.len() > max_line
}

fn trim_line_end(buf: &mut Vec<u8>) {
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }
}

/// Serves named in-memory queues of records.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    queues: HashMap<String, Vec<Vec<u8>>>,
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a queue called `name` holding `records`.
    pub fn with_queue<I, B>(mut self, name: impl Into<String>, records: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Vec<u8>>,
    {
        self.queues
            .insert(name.into(), records.into_iter().map(Into::into).collect());
        self
    }
}

impl RecordSource for MemorySource {
    fn open(&self, name: &str) -> BoxStream<'static, Record> {
        match self.queues.get(name) {
            Some(records) => stream::iter(records.clone().into_iter().map(Record::Body)).boxed(),
            None => stream::iter([Record::Failed(SourceError::Open {
                path: name.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such queue"),
            })])
            .boxed(),
        }
    }
}
