//! Remote Seekable Channel
//!
//! Presents a streaming HTTP(S) download as a random-access byte channel.
//! The host's loader assumes files can be sought in any order; a network
//! stream only yields strictly-increasing forward reads. A growable buffer
//! reconciles the two: every byte pulled so far stays addressable, and any
//! offset at or beyond the fetched length forces another drain attempt.

use std::io::Read;

use crate::codec::RemoteUri;

use super::types::{ChannelError, ReadOutcome, SeekableChannel};

/// Conventional client identity sent with every request. Some origin
/// servers send special text-only output to curl-identified clients.
pub const CLIENT_IDENTITY: &str = "curl/8.9.1";

const INITIAL_CAPACITY: usize = 8192;
const DRAIN_CHUNK: usize = 8192;

/// A seekable channel backed by a one-way network stream.
///
/// Invariants: bytes at `[0, filled)` are valid fetched data; `filled` only
/// decreases through `truncate`; the cursor moves independently of `filled`.
pub struct RemoteChannel {
    stream: Option<Box<dyn Read + Send>>,
    buffer: Vec<u8>,
    filled: usize,
    cursor: usize,
    exhausted: bool,
}

impl RemoteChannel {
    /// Open a connection to `uri` and wrap the response body.
    ///
    /// Connecting is synchronous and may block until the peer accepts.
    pub fn connect(uri: &RemoteUri, client_identity: &str) -> Result<Self, ChannelError> {
        let url = uri.to_string();
        tracing::debug!(url = %url, "opening remote channel");
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| ChannelError::Connection {
                url: url.clone(),
                message: e.to_string(),
            })?;
        let response = client
            .get(&url)
            .header(reqwest::header::USER_AGENT, client_identity)
            .send()
            .map_err(|e| ChannelError::Connection {
                url: url.clone(),
                message: e.to_string(),
            })?;
        Ok(Self::from_stream(Box::new(response)))
    }

    /// Wrap an already-open byte stream.
    ///
    /// Lets callers substitute the transport; tests feed mock streams here.
    pub fn from_stream(stream: Box<dyn Read + Send>) -> Self {
        Self {
            stream: Some(stream),
            buffer: vec![0; INITIAL_CAPACITY],
            filled: 0,
            cursor: 0,
            exhausted: false,
        }
    }

    /// Grow the buffer (at least doubling) until it holds `capacity` bytes.
    fn ensure(&mut self, capacity: usize) {
        while self.buffer.len() < capacity {
            let new_len = (self.buffer.len() * 2).max(INITIAL_CAPACITY).max(capacity);
            self.buffer.resize(new_len, 0);
        }
    }

    /// Pull the next batch of bytes from the stream into the buffer.
    ///
    /// One blocking read per attempt; returns the bytes gained. A zero-byte
    /// read marks the stream exhausted.
    fn drain(&mut self) -> Result<usize, ChannelError> {
        if self.exhausted {
            return Ok(0);
        }
        self.ensure(self.filled + DRAIN_CHUNK);
        let stream = self.stream.as_mut().ok_or(ChannelError::Closed)?;
        let n = stream.read(&mut self.buffer[self.filled..self.filled + DRAIN_CHUNK])?;
        if n == 0 {
            self.exhausted = true;
            tracing::trace!(filled = self.filled, "stream exhausted");
        } else {
            self.filled += n;
            tracing::trace!(gained = n, filled = self.filled, "drained stream");
        }
        Ok(n)
    }
}

impl SeekableChannel for RemoteChannel {
    fn read(&mut self, buf: &mut [u8]) -> Result<ReadOutcome, ChannelError> {
        if buf.is_empty() {
            return Ok(ReadOutcome::Bytes(0));
        }
        // The requested range extends past the fetched window: drain until
        // it is covered or the stream runs dry.
        while self.cursor.saturating_add(buf.len()) > self.filled && !self.exhausted {
            if self.drain()? == 0 {
                break;
            }
        }
        let available = self.filled.saturating_sub(self.cursor);
        let n = buf.len().min(available);
        if n == 0 {
            return Ok(ReadOutcome::EndOfData);
        }
        buf[..n].copy_from_slice(&self.buffer[self.cursor..self.cursor + n]);
        self.cursor += n;
        Ok(ReadOutcome::Bytes(n))
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize, ChannelError> {
        // Writes only ever touch the in-memory buffer, never the network.
        let end = self.cursor + buf.len();
        self.ensure(end);
        self.buffer[self.cursor..end].copy_from_slice(buf);
        if end > self.filled {
            self.filled = end;
        }
        self.cursor = end;
        Ok(buf.len())
    }

    fn seek(&mut self, offset: u64) -> Result<(), ChannelError> {
        // Unconditional: callers may seek ahead of fetched data; the next
        // read triggers a drain.
        self.cursor = usize::try_from(offset).map_err(|_| ChannelError::InvalidOffset { offset })?;
        Ok(())
    }

    fn position(&self) -> u64 {
        self.cursor as u64
    }

    fn size(&mut self) -> Result<u64, ChannelError> {
        // The loader calls size() to decide whether more data might still
        // arrive; answering from a stale fetched length makes it treat a
        // still-streaming resource as complete.
        if self.cursor == self.filled {
            self.drain()?;
        }
        Ok(self.filled as u64)
    }

    fn truncate(&mut self, new_len: u64) -> Result<(), ChannelError> {
        let new_len =
            usize::try_from(new_len).map_err(|_| ChannelError::InvalidOffset { offset: new_len })?;
        self.ensure(new_len);
        self.filled = new_len;
        if self.cursor > self.filled {
            self.cursor = self.filled;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), ChannelError> {
        match self.stream.take() {
            Some(stream) => {
                drop(stream);
                Ok(())
            }
            None => Err(ChannelError::Closed),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// A stream that yields at most `chunk` bytes per read call, simulating
    /// a slow origin that trickles data.
    struct ChunkedReader {
        data: Vec<u8>,
        pos: usize,
        chunk: usize,
    }

    impl ChunkedReader {
        fn new(data: &[u8], chunk: usize) -> Self {
            Self {
                data: data.to_vec(),
                pos: 0,
                chunk,
            }
        }
    }

    impl Read for ChunkedReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = buf.len().min(self.chunk).min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    fn channel(data: &[u8], chunk: usize) -> RemoteChannel {
        RemoteChannel::from_stream(Box::new(ChunkedReader::new(data, chunk)))
    }

    #[test]
    fn test_small_body_first_read_and_size() {
        // 10-byte body: a 4-byte read returns 4 bytes and advances the
        // cursor; size() after the stream is fully drained reports 10.
        let mut ch = channel(b"0123456789", 64);
        let mut buf = [0u8; 4];
        assert_eq!(ch.read(&mut buf).unwrap(), ReadOutcome::Bytes(4));
        assert_eq!(&buf, b"0123");
        assert_eq!(ch.position(), 4);

        let mut rest = [0u8; 16];
        assert_eq!(ch.read(&mut rest).unwrap(), ReadOutcome::Bytes(6));
        assert_eq!(&rest[..6], b"456789");
        assert_eq!(ch.size().unwrap(), 10);
    }

    #[test]
    fn test_end_of_data_sentinel() {
        let mut ch = channel(b"abc", 64);
        let mut buf = [0u8; 8];
        assert_eq!(ch.read(&mut buf).unwrap(), ReadOutcome::Bytes(3));
        // Stream exhausted and cursor at the end: a sentinel, not Bytes(0).
        assert_eq!(ch.read(&mut buf).unwrap(), ReadOutcome::EndOfData);
        assert_eq!(ch.read(&mut buf).unwrap(), ReadOutcome::EndOfData);
    }

    #[test]
    fn test_sequential_read_matches_source() {
        // Byte-for-byte identical to a direct sequential download, even when
        // the origin trickles 3 bytes at a time and reads straddle chunks.
        let data: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        let mut ch = channel(&data, 3);
        let mut out = Vec::new();
        let mut buf = [0u8; 7];
        loop {
            match ch.read(&mut buf).unwrap() {
                ReadOutcome::Bytes(n) => out.extend_from_slice(&buf[..n]),
                ReadOutcome::EndOfData => break,
            }
        }
        assert_eq!(out, data);
    }

    #[test]
    fn test_seek_then_reread() {
        let mut ch = channel(b"0123456789", 2);
        let mut buf = [0u8; 10];
        assert_eq!(ch.read(&mut buf).unwrap(), ReadOutcome::Bytes(10));
        ch.seek(2).unwrap();
        let mut again = [0u8; 4];
        assert_eq!(ch.read(&mut again).unwrap(), ReadOutcome::Bytes(4));
        assert_eq!(&again, b"2345");
    }

    #[test]
    fn test_seek_ahead_of_fetched_data() {
        // Seeking past the fetched window is allowed; the next read drains.
        let mut ch = channel(b"0123456789", 3);
        ch.seek(8).unwrap();
        let mut buf = [0u8; 2];
        assert_eq!(ch.read(&mut buf).unwrap(), ReadOutcome::Bytes(2));
        assert_eq!(&buf, b"89");
    }

    #[test]
    fn test_seek_past_end_reads_end_of_data() {
        let mut ch = channel(b"abc", 64);
        ch.seek(100).unwrap();
        let mut buf = [0u8; 4];
        assert_eq!(ch.read(&mut buf).unwrap(), ReadOutcome::EndOfData);
    }

    #[test]
    fn test_size_drains_when_cursor_at_fetched_end() {
        let mut ch = channel(b"0123456789", 4);
        // Nothing fetched yet and cursor == filled == 0: size() must attempt
        // a drain rather than answer 0 from the stale window.
        assert_eq!(ch.size().unwrap(), 4);
        let mut buf = [0u8; 4];
        assert_eq!(ch.read(&mut buf).unwrap(), ReadOutcome::Bytes(4));
        // Cursor caught up with the window again.
        assert_eq!(ch.size().unwrap(), 8);
    }

    #[test]
    fn test_drain_monotonicity() {
        let mut ch = channel(b"0123456789abcdef", 5);
        let mut last_filled = 0;
        let mut buf = [0u8; 3];
        while ch.read(&mut buf).unwrap() != ReadOutcome::EndOfData {
            assert!(ch.filled >= last_filled);
            last_filled = ch.filled;
        }
        assert_eq!(last_filled, 16);
    }

    #[test]
    fn test_write_extends_window() {
        let mut ch = channel(b"0123", 64);
        let mut buf = [0u8; 4];
        assert_eq!(ch.read(&mut buf).unwrap(), ReadOutcome::Bytes(4));
        assert_eq!(ch.write(b"XY").unwrap(), 2);
        assert_eq!(ch.position(), 6);
        assert_eq!(ch.size().unwrap(), 6);
        ch.seek(0).unwrap();
        let mut all = [0u8; 6];
        assert_eq!(ch.read(&mut all).unwrap(), ReadOutcome::Bytes(6));
        assert_eq!(&all, b"0123XY");
    }

    #[test]
    fn test_write_overwrites_at_cursor() {
        let mut ch = channel(b"0123456789", 64);
        let mut buf = [0u8; 10];
        assert_eq!(ch.read(&mut buf).unwrap(), ReadOutcome::Bytes(10));
        ch.seek(2).unwrap();
        ch.write(b"..").unwrap();
        ch.seek(0).unwrap();
        let mut all = [0u8; 10];
        assert_eq!(ch.read(&mut all).unwrap(), ReadOutcome::Bytes(10));
        assert_eq!(&all, b"01..456789");
    }

    #[test]
    fn test_truncate_shrinks_and_repositions_cursor() {
        let mut ch = channel(b"0123456789", 64);
        let mut buf = [0u8; 10];
        assert_eq!(ch.read(&mut buf).unwrap(), ReadOutcome::Bytes(10));
        assert_eq!(ch.position(), 10);
        ch.truncate(4).unwrap();
        assert_eq!(ch.position(), 4);
        ch.seek(0).unwrap();
        let mut out = [0u8; 8];
        assert_eq!(ch.read(&mut out).unwrap(), ReadOutcome::Bytes(4));
        assert_eq!(&out[..4], b"0123");
    }

    #[test]
    fn test_buffer_growth_beyond_initial_capacity() {
        let data: Vec<u8> = (0..20_000).map(|i| (i % 251) as u8).collect();
        let mut ch = channel(&data, 1024);
        let mut out = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            match ch.read(&mut buf).unwrap() {
                ReadOutcome::Bytes(n) => out.extend_from_slice(&buf[..n]),
                ReadOutcome::EndOfData => break,
            }
        }
        assert_eq!(out, data);
        assert_eq!(ch.size().unwrap(), 20_000);
    }

    #[test]
    fn test_close_is_single_shot() {
        let mut ch = channel(b"abc", 64);
        assert!(ch.close().is_ok());
        assert!(matches!(ch.close(), Err(ChannelError::Closed)));
    }

    #[test]
    fn test_read_needing_drain_after_close_fails() {
        let mut ch = channel(b"abcdef", 64);
        ch.close().unwrap();
        let mut buf = [0u8; 4];
        assert!(matches!(ch.read(&mut buf), Err(ChannelError::Closed)));
    }

    #[test]
    fn test_empty_body() {
        let mut ch = channel(b"", 64);
        assert_eq!(ch.size().unwrap(), 0);
        let mut buf = [0u8; 4];
        assert_eq!(ch.read(&mut buf).unwrap(), ReadOutcome::EndOfData);
    }

    #[test]
    fn test_zero_length_read_is_not_end_of_data() {
        let mut ch = channel(b"abc", 64);
        let mut empty = [0u8; 0];
        assert_eq!(ch.read(&mut empty).unwrap(), ReadOutcome::Bytes(0));
    }
}
