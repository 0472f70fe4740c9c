//! Virtual Filesystem Types
//!
//! Error taxonomy and the capability contract the execution host consumes.
//! Omitting any operation here breaks host module loading outright, not
//! just remote imports.

use std::time::SystemTime;

use thiserror::Error;

use crate::channel::{ChannelError, SeekableChannel};
use crate::codec::CodecError;

/// Virtual filesystem errors
#[derive(Error, Debug)]
pub enum VfsError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error("unsupported operation '{operation}' on remote path '{path}'")]
    UnsupportedOperation { operation: String, path: String },

    #[error("access denied: {mode:?} '{path}'")]
    AccessDenied { path: String, mode: AccessMode },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Access modes the host may probe for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
    Execute,
}

/// Open flags passed through the host's open-channel entry point.
///
/// Local opens honor them via the real filesystem. Remote opens ignore
/// them: the remote channel is always read-write in memory.
#[derive(Debug, Clone, Default)]
pub struct OpenOptions {
    pub read: bool,
    pub write: bool,
    pub create: bool,
    pub truncate: bool,
    pub append: bool,
}

impl OpenOptions {
    /// Plain read-only open, the common case for module loading.
    pub fn read_only() -> Self {
        Self {
            read: true,
            ..Default::default()
        }
    }
}

/// File status information surfaced to the host.
#[derive(Debug, Clone)]
pub struct FileAttributes {
    pub is_file: bool,
    pub is_directory: bool,
    pub is_symlink: bool,
    pub size: u64,
    /// Unix permission bits; 0 on platforms without them.
    pub mode: u32,
    pub modified: SystemTime,
}

/// The filesystem capability contract the execution host's interception
/// point requires.
///
/// Paths are host-visible strings: either real filesystem locations or
/// reserved-prefix remote encodings. All operations are synchronous and
/// execute to completion on the calling thread.
pub trait FileSystemOps {
    /// Turn a bare URI reference (e.g. from an import specifier) into a
    /// host-visible path. Absolute filesystem paths pass through unchanged.
    fn parse_path_from_uri(&self, uri: &str) -> Result<String, VfsError>;

    /// Turn a raw path string into a host-visible path.
    fn parse_path_from_string(&self, raw: &str) -> String;

    /// Check that `path` grants every mode in `modes`.
    fn check_access(&self, path: &str, modes: &[AccessMode]) -> Result<(), VfsError>;

    /// Create a directory.
    fn create_directory(&self, path: &str) -> Result<(), VfsError>;

    /// Delete a file or directory. A no-op for remote paths: the host may
    /// issue speculative cleanup calls.
    fn delete(&self, path: &str) -> Result<(), VfsError>;

    /// Open a seekable byte channel on `path`.
    fn open_channel(
        &self,
        path: &str,
        options: &OpenOptions,
    ) -> Result<Box<dyn SeekableChannel>, VfsError>;

    /// List directory entry names.
    fn read_directory(&self, path: &str) -> Result<Vec<String>, VfsError>;

    /// Resolve `path` to an absolute path.
    fn to_absolute_path(&self, path: &str) -> Result<String, VfsError>;

    /// Resolve `path` to its canonical physical form.
    fn to_real_path(&self, path: &str) -> Result<String, VfsError>;

    /// Read file attributes.
    fn read_attributes(&self, path: &str) -> Result<FileAttributes, VfsError>;
}
