//! Bounded capture of child output streams
//!
//! Each pipe is drained to EOF on its own thread. The reader keeps at most
//! `limit` bytes but keeps counting past the limit, so the final
//! [`CapturedStream`] reports the true size alongside the truncated view.

use std::io::Read;
use std::thread::{self, JoinHandle};

use serde::Serialize;

const READ_CHUNK_BYTES: usize = 8192;

/// Raw bytes drained from one pipe: the retained prefix plus the true total
#[derive(Debug, Default)]
pub struct RawCapture {
    pub prefix: Vec<u8>,
    pub total_bytes: usize,
}

/// Final, truncated view of one output stream
#[derive(Debug, Clone, Serialize)]
pub struct CapturedStream {
    /// First `limit` bytes, decoded with lossy replacement of invalid
    /// sequences
    pub content: String,
    /// Total bytes the process produced on this stream, truncated or not
    pub raw_bytes: usize,
    pub truncated: bool,
    pub limit: usize,
}

impl CapturedStream {
    pub fn from_raw(raw: RawCapture, limit: usize) -> Self {
        Self {
            content: String::from_utf8_lossy(&raw.prefix).into_owned(),
            raw_bytes: raw.total_bytes,
            truncated: raw.total_bytes > limit,
            limit,
        }
    }

    /// Stream that produced nothing, or whose reader was lost
    pub fn empty(limit: usize) -> Self {
        Self::from_raw(RawCapture::default(), limit)
    }
}

/// Drain `reader` to EOF on a dedicated thread, retaining at most `limit`
/// bytes while counting everything the child writes.
pub fn spawn_reader<R>(reader: R, limit: usize) -> JoinHandle<RawCapture>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || drain(reader, limit))
}

fn drain(mut reader: impl Read, limit: usize) -> RawCapture {
    let mut capture = RawCapture::default();
    let mut chunk = [0u8; READ_CHUNK_BYTES];

    loop {
        match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                capture.total_bytes += n;
                if capture.prefix.len() < limit {
                    let take = (limit - capture.prefix.len()).min(n);
                    capture.prefix.extend_from_slice(&chunk[..take]);
                }
            }
            // A broken pipe still yields whatever arrived before it broke
            Err(_) => break,
        }
    }

    capture
}
