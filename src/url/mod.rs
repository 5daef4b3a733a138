//! Object URLs of the form `s3://bucket/path/to/key`.

use std::fmt;
use std::str::FromStr;

use crate::error::{EtagError, Result};

/// URL scheme prefix for chunk-stored objects.
pub(crate) const SCHEME: &str = "s3://";

/// A bucket and key pair parsed from an object URL.
///
/// # Example
///
/// ```
/// use etagrs::ObjectUrl;
///
/// let url = ObjectUrl::parse("s3://archive/2024/01/db.tar.gz")?;
/// assert_eq!(url.bucket(), "archive");
/// assert_eq!(url.key(), "2024/01/db.tar.gz");
/// assert_eq!(url.file_name(), "db.tar.gz");
/// # Ok::<(), etagrs::EtagError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectUrl {
    bucket: String,
    key: String,
}

impl ObjectUrl {
    /// Parses `[s3://]bucket/key`.
    ///
    /// # Errors
    ///
    /// Returns [`EtagError::InvalidUrl`] if the bucket or the key is empty.
    pub fn parse(url: &str) -> Result<Self> {
        let invalid = |reason| EtagError::InvalidUrl {
            url: url.to_string(),
            reason,
        };

        let rest = url.strip_prefix(SCHEME).unwrap_or(url);
        let (bucket, key) = rest.split_once('/').ok_or_else(|| invalid("missing key"))?;
        if bucket.is_empty() {
            return Err(invalid("missing bucket"));
        }
        if key.is_empty() {
            return Err(invalid("missing key"));
        }

        Ok(Self {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }

    /// Returns the bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Returns the object key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the last non-empty segment of the key.
    pub fn file_name(&self) -> &str {
        self.key
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or(&self.key)
    }
}

impl FromStr for ObjectUrl {
    type Err = EtagError;

    fn from_str(s: &str) -> Result<Self> {
        ObjectUrl::parse(s)
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}/{}", SCHEME, self.bucket, self.key)
    }
}
