//! Execution Host Adapter Boundary
//!
//! Types shared with the multi-language execution host. The host itself
//! (parsing, evaluation, guest-language semantics) lives outside this crate.

pub mod language;

pub use language::Language;
