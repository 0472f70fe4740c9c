//! Path Codec Module
//!
//! Bidirectional mapping between host-visible virtual paths and origin URIs.
//! Remote URIs are encoded under a reserved prefix so the rest of the system
//! can route them through ordinary path-based APIs.

pub mod path_codec;
pub mod types;

pub use path_codec::{PathCodec, DEFAULT_RESERVED_PREFIX};
pub use types::{CodecError, PathClass, RemoteUri, Scheme};
