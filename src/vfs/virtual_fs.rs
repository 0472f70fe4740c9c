//! Virtual Filesystem Implementation
//!
//! Dispatches every host operation by classification: local paths delegate
//! verbatim to the real filesystem, remote paths go through the remote
//! seekable channel. A remote resource models a regular file with no
//! directory semantics.

use std::fs;

use crate::channel::{LocalChannel, RemoteChannel, SeekableChannel, CLIENT_IDENTITY};
use crate::codec::{PathClass, PathCodec, RemoteUri};

use super::types::{AccessMode, FileAttributes, FileSystemOps, OpenOptions, VfsError};

/// The virtual filesystem serving one execution context.
///
/// Holds no mutable state; channels are recreated per open and owned by
/// their callers.
pub struct VirtualFs {
    codec: PathCodec,
    client_identity: String,
}

impl VirtualFs {
    /// Create a virtual filesystem with the default client identity.
    pub fn new(codec: PathCodec) -> Self {
        Self::with_client_identity(codec, CLIENT_IDENTITY)
    }

    /// Create a virtual filesystem with a custom outbound client identity.
    pub fn with_client_identity(codec: PathCodec, client_identity: &str) -> Self {
        Self {
            codec,
            client_identity: client_identity.to_string(),
        }
    }

    pub fn codec(&self) -> &PathCodec {
        &self.codec
    }

    fn classify(&self, path: &str) -> Result<PathClass, VfsError> {
        Ok(self.codec.classify(path)?)
    }

    fn unsupported(operation: &str, uri: &RemoteUri) -> VfsError {
        VfsError::UnsupportedOperation {
            operation: operation.to_string(),
            path: uri.to_string(),
        }
    }
}

impl FileSystemOps for VirtualFs {
    fn parse_path_from_uri(&self, uri: &str) -> Result<String, VfsError> {
        // Absolute paths arrive here when the host resolves a file-based
        // import through its URI entry point.
        if uri.starts_with('/') {
            return Ok(uri.to_string());
        }
        Ok(self.codec.encode(uri))
    }

    fn parse_path_from_string(&self, raw: &str) -> String {
        raw.to_string()
    }

    fn check_access(&self, path: &str, modes: &[AccessMode]) -> Result<(), VfsError> {
        match self.classify(path)? {
            PathClass::Local(local) => {
                let meta = fs::metadata(&local)?;
                for mode in modes {
                    match mode {
                        AccessMode::Read => {}
                        AccessMode::Write => {
                            if meta.permissions().readonly() {
                                return Err(VfsError::AccessDenied {
                                    path: local,
                                    mode: AccessMode::Write,
                                });
                            }
                        }
                        AccessMode::Execute => {
                            if !is_executable(&meta) {
                                return Err(VfsError::AccessDenied {
                                    path: local,
                                    mode: AccessMode::Execute,
                                });
                            }
                        }
                    }
                }
                Ok(())
            }
            PathClass::Remote(uri) => {
                // The remote channel contract is read-write; execute has no
                // meaning for a network resource.
                if modes.contains(&AccessMode::Execute) {
                    return Err(Self::unsupported("check-access(execute)", &uri));
                }
                Ok(())
            }
        }
    }

    fn create_directory(&self, path: &str) -> Result<(), VfsError> {
        match self.classify(path)? {
            PathClass::Local(local) => Ok(fs::create_dir(local)?),
            PathClass::Remote(uri) => Err(Self::unsupported("create-directory", &uri)),
        }
    }

    fn delete(&self, path: &str) -> Result<(), VfsError> {
        match self.classify(path)? {
            PathClass::Local(local) => {
                if fs::metadata(&local)?.is_dir() {
                    Ok(fs::remove_dir(local)?)
                } else {
                    Ok(fs::remove_file(local)?)
                }
            }
            PathClass::Remote(uri) => {
                // Speculative cleanup from the host; nothing to remove.
                tracing::debug!(uri = %uri, "ignoring delete of remote path");
                Ok(())
            }
        }
    }

    fn open_channel(
        &self,
        path: &str,
        options: &OpenOptions,
    ) -> Result<Box<dyn SeekableChannel>, VfsError> {
        match self.classify(path)? {
            PathClass::Local(local) => {
                tracing::debug!(path = %local, "opening local channel");
                let mut open = fs::OpenOptions::new();
                open.read(options.read || !options.write)
                    .write(options.write)
                    .create(options.create)
                    .truncate(options.truncate)
                    .append(options.append);
                let file = open.open(&local)?;
                Ok(Box::new(LocalChannel::new(file)))
            }
            PathClass::Remote(uri) => {
                let channel = RemoteChannel::connect(&uri, &self.client_identity)?;
                Ok(Box::new(channel))
            }
        }
    }

    fn read_directory(&self, path: &str) -> Result<Vec<String>, VfsError> {
        match self.classify(path)? {
            PathClass::Local(local) => {
                let mut names = Vec::new();
                for entry in fs::read_dir(local)? {
                    names.push(entry?.file_name().to_string_lossy().into_owned());
                }
                names.sort();
                Ok(names)
            }
            PathClass::Remote(uri) => Err(Self::unsupported("read-directory", &uri)),
        }
    }

    fn to_absolute_path(&self, path: &str) -> Result<String, VfsError> {
        match self.classify(path)? {
            PathClass::Local(local) => {
                let absolute = std::path::absolute(&local)?;
                Ok(absolute.to_string_lossy().into_owned())
            }
            // Reserved-prefix paths are absolute already.
            PathClass::Remote(_) => Ok(path.to_string()),
        }
    }

    fn to_real_path(&self, path: &str) -> Result<String, VfsError> {
        match self.classify(path)? {
            PathClass::Local(local) => {
                let real = fs::canonicalize(&local)?;
                Ok(real.to_string_lossy().into_owned())
            }
            // A remote encoding is its own canonical form.
            PathClass::Remote(_) => Ok(path.to_string()),
        }
    }

    fn read_attributes(&self, path: &str) -> Result<FileAttributes, VfsError> {
        match self.classify(path)? {
            PathClass::Local(local) => {
                let meta = fs::symlink_metadata(&local)?;
                Ok(FileAttributes {
                    is_file: meta.is_file(),
                    is_directory: meta.is_dir(),
                    is_symlink: meta.file_type().is_symlink(),
                    size: meta.len(),
                    mode: unix_mode(&meta),
                    modified: meta.modified()?,
                })
            }
            PathClass::Remote(uri) => Err(Self::unsupported("read-attributes", &uri)),
        }
    }
}

#[cfg(unix)]
fn unix_mode(meta: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode()
}

#[cfg(not(unix))]
fn unix_mode(_meta: &fs::Metadata) -> u32 {
    0
}

#[cfg(unix)]
fn is_executable(meta: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(meta: &fs::Metadata) -> bool {
    meta.is_file()
}

// ============================================================================
// Tests
// ============================================================================
