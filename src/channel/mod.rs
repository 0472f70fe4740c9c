//! Byte Channel Module
//!
//! Seekable byte channels behind the virtual filesystem's open entry point.
//! Local paths get a thin wrapper over a real file; remote paths get an
//! in-memory buffer lazily drained from a streaming HTTP download.

pub mod local;
pub mod remote;
pub mod types;

pub use local::LocalChannel;
pub use remote::{RemoteChannel, CLIENT_IDENTITY};
pub use types::{ChannelError, ReadOutcome, SeekableChannel};
