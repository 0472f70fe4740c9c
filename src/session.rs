//! Execution Session
//!
//! An explicitly constructed session value owning the virtual filesystem
//! and its codec namespace. Multiple independent sessions may coexist; no
//! ambient global state is involved.

use crate::channel::{ReadOutcome, CLIENT_IDENTITY};
use crate::codec::{PathCodec, DEFAULT_RESERVED_PREFIX};
use crate::host::Language;
use crate::vfs::{FileSystemOps, OpenOptions, VfsError, VirtualFs};

/// Options for creating an execution session.
#[derive(Default)]
pub struct SessionOptions {
    /// Reserved virtual-path prefix (defaults to "/.polyfs/")
    pub reserved_prefix: Option<String>,
    /// Outbound client identity header (defaults to the curl-style identity)
    pub client_identity: Option<String>,
}

/// A module fully loaded through the virtual filesystem.
#[derive(Debug, Clone)]
pub struct LoadedModule {
    /// Host-visible path the specifier resolved to
    pub path: String,
    /// Guest language detected from the extension, if any
    pub language: Option<Language>,
    pub bytes: Vec<u8>,
}

/// One execution context's view of the import machinery.
pub struct ExecutionSession {
    vfs: VirtualFs,
}

impl ExecutionSession {
    /// Create a session.
    pub fn new(options: SessionOptions) -> Self {
        let prefix = options
            .reserved_prefix
            .unwrap_or_else(|| DEFAULT_RESERVED_PREFIX.to_string());
        let identity = options
            .client_identity
            .unwrap_or_else(|| CLIENT_IDENTITY.to_string());
        let vfs = VirtualFs::with_client_identity(PathCodec::with_prefix(&prefix), &identity);
        Self { vfs }
    }

    /// The virtual filesystem this session hands to the host.
    pub fn fs(&self) -> &VirtualFs {
        &self.vfs
    }

    /// Resolve a specifier (bare URI or filesystem path), open it, and
    /// drain the channel to completion.
    ///
    /// Convenience for callers outside the host's own loader; the loader
    /// drives the channel itself through `FileSystemOps::open_channel`.
    pub fn load_module(&self, specifier: &str) -> Result<LoadedModule, VfsError> {
        let path = if specifier.contains("://") {
            self.vfs.parse_path_from_uri(specifier)?
        } else {
            self.vfs.parse_path_from_string(specifier)
        };
        tracing::debug!(specifier = %specifier, path = %path, "loading module");

        let mut channel = self.vfs.open_channel(&path, &OpenOptions::read_only())?;
        let mut bytes = Vec::new();
        let mut buf = [0u8; 8192];
        loop {
            match channel.read(&mut buf)? {
                ReadOutcome::Bytes(n) => bytes.extend_from_slice(&buf[..n]),
                ReadOutcome::EndOfData => break,
            }
        }
        channel.close()?;

        Ok(LoadedModule {
            language: Language::from_path(&path),
            path,
            bytes,
        })
    }
}

impl Default for ExecutionSession {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}
