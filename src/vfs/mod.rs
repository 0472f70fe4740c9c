//! Virtual Filesystem Module
//!
//! The capability surface the execution host's file-access interception
//! point requires. Local paths pass through to the real filesystem; remote
//! paths route through the path codec to a remote seekable channel.

pub mod types;
pub mod virtual_fs;

pub use types::{AccessMode, FileAttributes, FileSystemOps, OpenOptions, VfsError};
pub use virtual_fs::VirtualFs;
