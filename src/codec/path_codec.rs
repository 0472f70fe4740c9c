//! Path Codec Implementation
//!
//! Encodes origin URIs as virtual paths under a reserved prefix and decodes
//! them back. Encoding collapses the scheme separator (`://` becomes `:/`)
//! so the result contains no double slash a path normalizer would swallow;
//! decoding repairs it. `decode(encode(uri)) == uri` for every supported URI.

use super::types::{CodecError, PathClass, RemoteUri};

/// Default reserved prefix marking a path as remote-encoded.
///
/// A hidden-directory-style token; must never exist as a real filesystem
/// entry on the host.
pub const DEFAULT_RESERVED_PREFIX: &str = "/.polyfs/";

/// Bidirectional mapping between virtual paths and origin URIs.
#[derive(Debug, Clone)]
pub struct PathCodec {
    prefix: String,
}

impl PathCodec {
    /// Create a codec with the default reserved prefix.
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_RESERVED_PREFIX)
    }

    /// Create a codec with a custom reserved prefix.
    /// The prefix is normalized to start and end with '/'.
    pub fn with_prefix(prefix: &str) -> Self {
        let mut prefix = prefix.to_string();
        if !prefix.starts_with('/') {
            prefix.insert(0, '/');
        }
        if !prefix.ends_with('/') {
            prefix.push('/');
        }
        Self { prefix }
    }

    /// The reserved prefix, always of the form "/<token>/".
    pub fn reserved_prefix(&self) -> &str {
        &self.prefix
    }

    /// Classify a host-visible path as Local or Remote.
    ///
    /// Any path not under the reserved prefix is Local. A path under the
    /// prefix either decodes to a supported URI or fails classification;
    /// it is never silently routed to the real filesystem.
    pub fn classify(&self, path: &str) -> Result<PathClass, CodecError> {
        if !path.starts_with(&self.prefix) {
            return Ok(PathClass::Local(path.to_string()));
        }
        self.decode(path).map(PathClass::Remote)
    }

    /// Encode a bare URI reference as a reserved-prefix virtual path.
    ///
    /// The URI is not validated here; an unsupported scheme surfaces later,
    /// when the path is classified for opening.
    pub fn encode(&self, uri: &str) -> String {
        let collapsed = match uri.find("://") {
            Some(pos) => format!("{}:/{}", &uri[..pos], &uri[pos + 3..]),
            None => uri.to_string(),
        };
        format!("{}{}", self.prefix, escape(&collapsed))
    }

    /// Decode a reserved-prefix virtual path back to its origin URI.
    pub fn decode(&self, path: &str) -> Result<RemoteUri, CodecError> {
        let remainder = path.strip_prefix(&self.prefix).ok_or_else(|| {
            CodecError::MalformedRemotePath {
                path: path.to_string(),
                reason: "missing reserved prefix".to_string(),
            }
        })?;
        let unescaped = unescape(remainder).ok_or_else(|| CodecError::MalformedRemotePath {
            path: path.to_string(),
            reason: "invalid percent escape".to_string(),
        })?;
        RemoteUri::parse(&repair_scheme_separator(&unescaped))
    }
}

impl Default for PathCodec {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Escaping helpers
// ============================================================================

/// Expand a single `:/` back to `://` (the encoded form carries one slash so
/// the path never contains an empty segment).
fn repair_scheme_separator(s: &str) -> String {
    if let Some(pos) = s.find(":/") {
        if !s[pos..].starts_with("://") {
            return format!("{}://{}", &s[..pos], &s[pos + 2..]);
        }
    }
    s.to_string()
}

/// Bytes that pass through the escaper unchanged: URI characters that are
/// also safe inside a path segment. '%' itself is always escaped so that
/// unescaping is an exact inverse.
fn is_path_safe(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'-' | b'.' | b'_' | b'~' | b'/' | b':' | b'?' | b'#' | b'['
                | b']' | b'@' | b'!' | b'$' | b'&' | b'\'' | b'(' | b')'
                | b'*' | b'+' | b',' | b';' | b'='
        )
}

fn escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for &b in s.as_bytes() {
        if is_path_safe(b) {
            result.push(b as char);
        } else {
            result.push_str(&format!("%{:02X}", b));
        }
    }
    result
}

fn unescape(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = s.get(i + 1..i + 3)?;
            let byte = u8::from_str_radix(hex, 16).ok()?;
            result.push(byte);
            i += 3;
        } else {
            result.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(result).ok()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::types::Scheme;

    fn codec() -> PathCodec {
        PathCodec::new()
    }

    #[test]
    fn test_encode_collapses_scheme_separator() {
        let path = codec().encode("https://example.test/a.py");
        assert_eq!(path, "/.polyfs/https:/example.test/a.py");
        assert!(!path[DEFAULT_RESERVED_PREFIX.len()..].contains("//"));
    }

    #[test]
    fn test_decode_repairs_scheme_separator() {
        // A loader may hand back the single-slash form directly.
        let uri = codec().decode("/.polyfs/https:/example.test/a.py").unwrap();
        assert_eq!(uri.to_string(), "https://example.test/a.py");
        assert_eq!(uri.scheme, Scheme::Https);
    }

    #[test]
    fn test_round_trip() {
        let uris = [
            "http://example.test/mod.js",
            "https://example.test/a.py",
            "https://example.test",
            "http://localhost:8080/deep/path/mod.mjs?v=2#frag",
            "https://example.test/with%20escape",
            "https://example.test/spaced path",
            "https://example.test/uni\u{e9}code",
        ];
        let codec = codec();
        for uri in uris {
            let decoded = codec.decode(&codec.encode(uri)).unwrap();
            assert_eq!(decoded.to_string(), uri, "round trip failed for {uri}");
        }
    }

    #[test]
    fn test_classify_local() {
        let class = codec().classify("/home/user/mod.js").unwrap();
        assert_eq!(class, PathClass::Local("/home/user/mod.js".to_string()));
        // Paths merely resembling the prefix stay local.
        assert!(!codec().classify("/.polyfs-other/x").unwrap().is_remote());
        assert!(!codec().classify("relative/path").unwrap().is_remote());
    }

    #[test]
    fn test_classify_remote() {
        let class = codec()
            .classify("/.polyfs/http:/example.test/mod.js")
            .unwrap();
        match class {
            PathClass::Remote(uri) => assert_eq!(uri.to_string(), "http://example.test/mod.js"),
            other => panic!("expected remote, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_never_misroutes_bad_remote() {
        // Under the prefix but not a URI: an error, never Local.
        assert!(matches!(
            codec().classify("/.polyfs/garbage"),
            Err(CodecError::MalformedRemotePath { .. })
        ));
    }

    #[test]
    fn test_classify_unsupported_scheme() {
        assert_eq!(
            codec().classify("/.polyfs/ftp:/example.test/file"),
            Err(CodecError::UnsupportedScheme {
                scheme: "ftp".to_string()
            })
        );
    }

    #[test]
    fn test_custom_prefix_normalized() {
        let codec = PathCodec::with_prefix(".imports");
        assert_eq!(codec.reserved_prefix(), "/.imports/");
        let path = codec.encode("http://example.test/x");
        assert!(path.starts_with("/.imports/"));
        assert_eq!(
            codec.decode(&path).unwrap().to_string(),
            "http://example.test/x"
        );
    }

    #[test]
    fn test_unescape_rejects_truncated_escape() {
        assert!(codec().decode("/.polyfs/http:/example.test/%4").is_err());
        assert!(codec().decode("/.polyfs/http:/example.test/%zz").is_err());
    }

    #[test]
    fn test_escape_percent_is_exact_inverse() {
        // A literal "%2F" in the origin URI must survive the trip without
        // turning into a slash.
        let codec = codec();
        let uri = "https://example.test/a%2Fb";
        let decoded = codec.decode(&codec.encode(uri)).unwrap();
        assert_eq!(decoded.to_string(), uri);
    }
}
