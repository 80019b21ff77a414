//! Logical paths of archive members.

use std::borrow::Borrow;
use std::fmt;
use std::path::{Component, Path};

/// Maximum length for entry paths written by this crate (in bytes).
///
/// Longer names are emitted as GNU long-name or PAX records by the tar
/// encoder; this bound only rejects absurd inputs.
const MAX_PATH_LENGTH: usize = 32768;

/// A `/`-separated logical path of an archive member.
///
/// Paths read from an archive are kept verbatim, exactly as the header
/// stores them (non-UTF-8 bytes are replaced). Paths used for writing are
/// checked before they reach the tar encoder. They must be non-empty, must
/// be relative, must have no `..` component, must not contain a NUL byte and
/// must not exceed 32 KiB. The check does not depend on whether the name
/// fits the header or needs a long-name record.
///
/// Equality is byte-wise; lookups by path compare against the stored
/// string, so `"a/b"` and `"./a/b"` are distinct paths.
///
/// # Examples
///
/// ```
/// use tarkit::ArchivePath;
///
/// let path = ArchivePath::new("docs/guide/intro.md");
/// assert_eq!(path.file_name(), "intro.md");
/// assert_eq!(path.parent().unwrap().as_str(), "docs/guide");
/// assert_eq!(path.segments().count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArchivePath(String);

impl ArchivePath {
    /// Creates a path from a string without validating it.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Returns the path as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the path and returns the inner string.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns an iterator over the non-empty `/`-separated segments.
    ///
    /// ```
    /// use tarkit::ArchivePath;
    ///
    /// let path = ArchivePath::new("dir//sub/file.txt");
    /// let segments: Vec<_> = path.segments().collect();
    /// assert_eq!(segments, ["dir", "sub", "file.txt"]);
    /// ```
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Returns the last segment of the path.
    ///
    /// A trailing slash is ignored, so `"dir/"` has the file name `"dir"`.
    pub fn file_name(&self) -> &str {
        self.0
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
    }

    /// Returns the parent directory of this path, if any.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.0.trim_end_matches('/');
        let idx = trimmed.rfind('/')?;
        let parent = trimmed[..idx].trim_end_matches('/');
        if parent.is_empty() {
            None
        } else {
            Some(Self(parent.to_string()))
        }
    }

    /// Returns true if this path may be written to an archive.
    pub fn is_writable(&self) -> bool {
        self.check_writable().is_ok()
    }

    /// Checks the constraints applied before a path reaches the encoder.
    pub(crate) fn check_writable(&self) -> std::result::Result<(), String> {
        if self.0.is_empty() {
            return Err("entry path is empty".into());
        }
        if self.0.contains('\0') {
            return Err(format!("entry path {:?} contains a NUL byte", self.0));
        }
        if self.0.len() > MAX_PATH_LENGTH {
            return Err(format!(
                "entry path exceeds maximum length of {MAX_PATH_LENGTH} bytes"
            ));
        }
        for component in Path::new(&self.0).components() {
            match component {
                Component::ParentDir => {
                    return Err(format!("entry path {:?} contains a `..` component", self.0));
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(format!("entry path {:?} is absolute", self.0));
                }
                Component::CurDir | Component::Normal(_) => {}
            }
        }
        Ok(())
    }
}

impl AsRef<str> for ArchivePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ArchivePath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ArchivePath {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ArchivePath {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for ArchivePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArchivePath {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ArchivePath {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<ArchivePath> for String {
    fn from(path: ArchivePath) -> Self {
        path.0
    }
}
