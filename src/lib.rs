//! polyfs - remote imports as ordinary files
//!
//! A virtual-filesystem interception layer for a multi-language execution
//! host: paths under a reserved prefix decode to HTTP(S) URIs and open as
//! seekable byte channels backed by a lazily-drained download, so the
//! host's module loader can treat remote imports like local files.

pub mod channel;
pub mod codec;
pub mod host;
pub mod session;
pub mod vfs;

pub use channel::{ChannelError, LocalChannel, ReadOutcome, RemoteChannel, SeekableChannel};
pub use codec::{CodecError, PathClass, PathCodec, RemoteUri, Scheme};
pub use host::Language;
pub use session::{ExecutionSession, LoadedModule, SessionOptions};
pub use vfs::{AccessMode, FileAttributes, FileSystemOps, OpenOptions, VfsError, VirtualFs};
