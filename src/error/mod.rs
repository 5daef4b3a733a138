//! Error types for etagrs.

use std::path::PathBuf;

/// Convenience alias used throughout the crate.
pub type Result<T, E = EtagError> = std::result::Result<T, E>;

/// Errors that can occur while fingerprinting or verifying a source.
///
/// No variant ever accompanies a partial fingerprint: a caller receiving an
/// error must treat the fingerprint as undefined.
#[derive(Debug, thiserror::Error)]
pub enum EtagError {
    /// The byte source could not be opened.
    #[error("cannot open {}: {source}", .path.display())]
    SourceOpen {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A read from an open source failed for a reason other than exhaustion.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A caller-supplied parameter is out of range.
    #[error("invalid parameter: {message}")]
    InvalidParameter {
        /// Description of what was invalid.
        message: &'static str,
    },

    /// An ETag string reported by a store could not be parsed.
    #[error("malformed etag {value:?}: {reason}")]
    MalformedEtag {
        /// The offending input.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// An object URL could not be split into bucket and key.
    #[error("invalid object url {url:?}: {reason}")]
    InvalidUrl {
        /// The offending input.
        url: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}

impl EtagError {
    pub(crate) fn invalid(message: &'static str) -> Self {
        EtagError::InvalidParameter { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "test");
        let err: EtagError = io_err.into();
        assert!(matches!(err, EtagError::Io(_)));
    }

    #[test]
    fn test_source_open_display_names_path() {
        let err = EtagError::SourceOpen {
            path: PathBuf::from("/no/such/file"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/no/such/file"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_display() {
        let err = EtagError::invalid("chunk size must be positive");
        assert!(err.to_string().contains("chunk size must be positive"));
    }
}
