//! # Multiplexed Stream Demultiplexer
//!
//! File: cli/src/api/frames.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/dockhand
//!
//! ## Overview
//!
//! When a container runs without a TTY, the daemon interleaves its stdout and
//! stderr into one byte stream (logs, attach). Each chunk is prefixed with an
//! 8-byte header:
//!
//! ```text
//! +--------+---------+---------+---------+----------------------------+
//! | byte 0 | byte 1  | byte 2  | byte 3  | bytes 4..8                 |
//! | stream | reserved| reserved| reserved| payload length (u32, BE)   |
//! +--------+---------+---------+---------+----------------------------+
//! ```
//!
//! [`Frames`] walks such a buffer lazily and yields one [`Frame`] per header,
//! in stream order. Decoding stops as soon as fewer than 8 bytes remain, so a
//! partial trailing header is dropped. A final payload shorter than its
//! declared length is yielded as-is.
//!
//! [`demultiplex`] concatenates the payloads, which is what the logs
//! operation returns: interleaving order is preserved, the origin stream is not.
//!

/// Size of a frame header in bytes.
pub const HEADER_LEN: usize = 8;

/// Origin of a frame, taken from header byte 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdin,
    Stdout,
    Stderr,
    Unknown(u8),
}

impl From<u8> for StreamKind {
    fn from(byte: u8) -> Self {
        match byte {
            0 => StreamKind::Stdin,
            1 => StreamKind::Stdout,
            2 => StreamKind::Stderr,
            other => StreamKind::Unknown(other),
        }
    }
}

/// One decoded chunk of a multiplexed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    pub stream: StreamKind,
    pub payload: &'a [u8],
}

/// Lazy iterator over the frames of a multiplexed buffer.
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    buf: &'a [u8],
    cursor: usize,
}

impl<'a> Frames<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, cursor: 0 }
    }
}

impl<'a> Iterator for Frames<'a> {
    type Item = Frame<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let remaining = self.buf.get(self.cursor..)?;
        if remaining.len() < HEADER_LEN {
            return None;
        }
        let stream = StreamKind::from(remaining[0]);
        let length = u32::from_be_bytes([remaining[4], remaining[5], remaining[6], remaining[7]]);

        let start = self.cursor + HEADER_LEN;
        let end = start.saturating_add(length as usize).min(self.buf.len());
        self.cursor = end;

        Some(Frame {
            stream,
            payload: &self.buf[start..end],
        })
    }
}

/// Returns a lazy iterator over the frames in `buf`.
pub fn frames(buf: &[u8]) -> Frames<'_> {
    Frames::new(buf)
}

/// Concatenates every frame payload in `buf`, dropping the headers.
pub fn demultiplex(buf: &[u8]) -> Vec<u8> {
    frames(buf).fold(Vec::with_capacity(buf.len()), |mut out, frame| {
        out.extend_from_slice(frame.payload);
        out
    })
}

/// Heuristic check that `buf` starts with a frame header: a known stream byte
/// followed by three zero bytes. Logs of TTY containers are not framed and
/// fail this check.
pub fn looks_multiplexed(buf: &[u8]) -> bool {
    match buf.get(..HEADER_LEN) {
        Some(header) => header[0] <= 2 && header[1..4] == [0, 0, 0],
        None => false,
    }
}
