//! Path Codec Types
//!
//! Core types for classifying virtual paths and representing remote URIs.

use std::fmt;

use thiserror::Error;

/// Path codec errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("malformed remote path '{path}': {reason}")]
    MalformedRemotePath { path: String, reason: String },

    #[error("unsupported scheme '{scheme}' (supported: http, https)")]
    UnsupportedScheme { scheme: String },
}

/// URI schemes the remote side of the codec accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "http" => Some(Self::Http),
            "https" => Some(Self::Https),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parsed remote URI: scheme + authority + path remainder.
///
/// The path component keeps any query string or fragment verbatim so that
/// re-serializing the URI reproduces the original string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteUri {
    pub scheme: Scheme,
    /// Host and optional port, e.g. "example.test" or "localhost:8080"
    pub authority: String,
    /// Path remainder including the leading '/', empty if the URI had none
    pub path: String,
}

impl RemoteUri {
    /// Parse a URI string of the form `scheme://authority[/path]`.
    pub fn parse(uri: &str) -> Result<Self, CodecError> {
        let scheme_end = uri.find("://").ok_or_else(|| CodecError::MalformedRemotePath {
            path: uri.to_string(),
            reason: "missing scheme separator".to_string(),
        })?;
        let scheme_str = &uri[..scheme_end];
        let scheme = Scheme::from_str(scheme_str).ok_or_else(|| CodecError::UnsupportedScheme {
            scheme: scheme_str.to_string(),
        })?;

        let after_scheme = &uri[scheme_end + 3..];
        let (authority, path) = match after_scheme.find('/') {
            Some(slash_pos) => (&after_scheme[..slash_pos], &after_scheme[slash_pos..]),
            None => (after_scheme, ""),
        };
        if authority.is_empty() {
            return Err(CodecError::MalformedRemotePath {
                path: uri.to_string(),
                reason: "empty authority".to_string(),
            });
        }

        Ok(Self {
            scheme,
            authority: authority.to_string(),
            path: path.to_string(),
        })
    }
}

impl fmt::Display for RemoteUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.authority, self.path)
    }
}

/// Result of classifying a host-visible path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathClass {
    /// Maps 1:1 to a real filesystem location.
    Local(String),
    /// Encoded under the reserved prefix; carries the decoded origin URI.
    Remote(RemoteUri),
}

impl PathClass {
    pub fn is_remote(&self) -> bool {
        matches!(self, PathClass::Remote(_))
    }
}
