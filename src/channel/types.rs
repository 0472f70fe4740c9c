//! Byte Channel Types
//!
//! The file-channel contract the execution host expects from every open
//! handle, local or remote.

use thiserror::Error;

/// Channel errors
#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("connection to '{url}' failed: {message}")]
    Connection { url: String, message: String },

    #[error("channel is closed")]
    Closed,

    #[error("offset {offset} does not fit the in-memory window")]
    InvalidOffset { offset: u64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Outcome of a channel read.
///
/// End-of-data is a sentinel, not an error: the host's loader consumes it to
/// detect file end and must be able to tell it apart from a short read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Number of bytes copied into the caller's buffer (may be short).
    Bytes(usize),
    /// No bytes available and the underlying source is exhausted.
    EndOfData,
}

/// A random-access byte channel.
///
/// The host's loader assumes every open handle supports arbitrary seeking
/// and re-reading, whether it is backed by a real file or a network stream.
/// All operations are synchronous and may block.
pub trait SeekableChannel: Send {
    /// Read up to `buf.len()` bytes at the current cursor.
    fn read(&mut self, buf: &mut [u8]) -> Result<ReadOutcome, ChannelError>;

    /// Write `buf` at the current cursor, returning the bytes accepted.
    fn write(&mut self, buf: &[u8]) -> Result<usize, ChannelError>;

    /// Set the cursor unconditionally; seeking past the end is allowed.
    fn seek(&mut self, offset: u64) -> Result<(), ChannelError>;

    /// Current cursor position.
    fn position(&self) -> u64;

    /// Currently known size of the resource.
    fn size(&mut self) -> Result<u64, ChannelError>;

    /// Cut the resource down to `new_len` bytes.
    fn truncate(&mut self, new_len: u64) -> Result<(), ChannelError>;

    /// Release the underlying resource. Calling twice is an error.
    fn close(&mut self) -> Result<(), ChannelError>;
}

impl std::fmt::Debug for dyn SeekableChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeekableChannel")
            .field("position", &self.position())
            .finish()
    }
}
