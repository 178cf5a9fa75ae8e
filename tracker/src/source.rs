//! Validated, immutable source files.
//!
//! A [`Source`] can only be obtained through [`Source::load`] or
//! [`Source::load_with`], which validate the path and read the file in one
//! step. There is no way to construct a partially valid `Source`, so everything
//! downstream can treat it as trusted.
//!
//! # Validation Order
//!
//! 1. The file extension is one of the recognized extensions (case-sensitive).
//! 2. The path resolves to an existing entry.
//! 3. The entry is a regular file.
//! 4. The whole file is readable as UTF-8 text.
//!
//! # Example
//!
//! ```no_run
//! use lineage_tracker::source::Source;
//!
//! let source = Source::load("boot.asm").expect("boot.asm should load");
//! println!("{} bytes from {}", source.content().len(), source.path().display());
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Extensions recognized when no configuration is supplied.
pub const DEFAULT_EXTENSIONS: &[&str] = &["asm", "inc"];

/// Errors that can occur when loading a source file.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The path does not carry a recognized extension.
    #[error("invalid extension for {}: expected one of [{}]", .path.display(), .expected.join(", "))]
    InvalidExtension { path: PathBuf, expected: Vec<String> },

    /// Nothing exists at the path.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The path exists but may not be inspected.
    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    /// Looking up the path failed for another reason.
    #[error("cannot access {}: {source}", .path.display())]
    Inaccessible {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The path names a directory.
    #[error("path is a directory: {}", .0.display())]
    IsDirectory(PathBuf),

    /// The path names something other than a regular file or directory.
    #[error("not a regular file: {}", .0.display())]
    NotRegularFile(PathBuf),

    /// The file could not be read completely, or is not valid UTF-8.
    #[error("failed to read {}: {source}", .path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Options controlling which files the loader accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOptions {
    /// Recognized extensions, without the leading dot.
    pub extensions: Vec<String>,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SourceOptions {
    /// Returns `true` if `path` ends in one of the recognized extensions.
    #[must_use]
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|allowed| allowed == ext))
    }
}

/// A loaded source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    path: PathBuf,
    #[serde(skip)]
    content: String,
}

impl Source {
    /// Loads and validates a source file using [`SourceOptions::default`].
    ///
    /// # Errors
    ///
    /// See [`Source::load_with`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        Self::load_with(path, &SourceOptions::default())
    }

    /// Loads and validates a source file.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] describing the first failed check, in the
    /// order given in the module documentation. I/O failures other than
    /// "not found" and "permission denied" are carried verbatim.
    pub fn load_with(path: impl AsRef<Path>, options: &SourceOptions) -> Result<Self, SourceError> {
        let path = path.as_ref();

        if !options.accepts(path) {
            return Err(SourceError::InvalidExtension {
                path: path.to_path_buf(),
                expected: options.extensions.clone(),
            });
        }

        let metadata = fs::metadata(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => SourceError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => SourceError::PermissionDenied(path.to_path_buf()),
            _ => SourceError::Inaccessible {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        if metadata.is_dir() {
            return Err(SourceError::IsDirectory(path.to_path_buf()));
        }
        if !metadata.is_file() {
            return Err(SourceError::NotRegularFile(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| SourceError::ReadFailure {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), bytes = content.len(), "Loaded source file");

        Ok(Self {
            path: path.to_path_buf(),
            content,
        })
    }

    /// Path the source was loaded from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Text of the file at load time.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}
