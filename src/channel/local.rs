//! Local File Channel
//!
//! Thin wrapper over a real file so local and remote opens hand the host
//! the same channel type. Behavior and errors pass through to the
//! underlying filesystem.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};

use super::types::{ChannelError, ReadOutcome, SeekableChannel};

/// A seekable channel backed by a real file.
pub struct LocalChannel {
    file: Option<File>,
    cursor: u64,
}

impl LocalChannel {
    pub fn new(file: File) -> Self {
        Self {
            file: Some(file),
            cursor: 0,
        }
    }

    fn file_mut(&mut self) -> Result<&mut File, ChannelError> {
        self.file.as_mut().ok_or(ChannelError::Closed)
    }
}

impl SeekableChannel for LocalChannel {
    fn read(&mut self, buf: &mut [u8]) -> Result<ReadOutcome, ChannelError> {
        let file = self.file_mut()?;
        let n = file.read(buf)?;
        self.cursor += n as u64;
        if n == 0 && !buf.is_empty() {
            return Ok(ReadOutcome::EndOfData);
        }
        Ok(ReadOutcome::Bytes(n))
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize, ChannelError> {
        let file = self.file_mut()?;
        let n = file.write(buf)?;
        self.cursor += n as u64;
        Ok(n)
    }

    fn seek(&mut self, offset: u64) -> Result<(), ChannelError> {
        let file = self.file_mut()?;
        file.seek(SeekFrom::Start(offset))?;
        self.cursor = offset;
        Ok(())
    }

    fn position(&self) -> u64 {
        self.cursor
    }

    fn size(&mut self) -> Result<u64, ChannelError> {
        let file = self.file_mut()?;
        Ok(file.metadata()?.len())
    }

    fn truncate(&mut self, new_len: u64) -> Result<(), ChannelError> {
        let cursor = self.cursor;
        let file = self.file_mut()?;
        file.set_len(new_len)?;
        if cursor > new_len {
            file.seek(SeekFrom::Start(new_len))?;
            self.cursor = new_len;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), ChannelError> {
        match self.file.take() {
            Some(file) => {
                drop(file);
                Ok(())
            }
            None => Err(ChannelError::Closed),
        }
    }
}
