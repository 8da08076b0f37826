//! HTML file reader module
//!
//! Resolves a route's file reference against the site root and reads it.
//! Any reference that is absolute or resolves outside the root is refused.

use chrono::{DateTime, Utc};
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

use crate::error::{PathRejection, RouterError, RouterResult};
use crate::logger;

/// Basic metadata for a file under the root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub size: u64,
    pub is_file: bool,
    pub modified: Option<DateTime<Utc>>,
}

/// Reads HTML files from a single root directory
#[derive(Debug, Clone)]
pub struct HtmlReader {
    root: PathBuf,
}

impl HtmlReader {
    /// Create a reader rooted at `root`; relative roots are taken from the current directory
    pub fn new(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref();
        let absolute = if root.is_absolute() {
            root.to_path_buf()
        } else {
            std::env::current_dir()?.join(root)
        };
        Ok(Self {
            root: fold_components(&absolute),
        })
    }

    /// The resolved root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read the whole file as UTF-8 text
    pub async fn read(&self, file: &str) -> RouterResult<String> {
        let path = self.locate(file).await?;
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(RouterError::FileNotFound {
                file: file.to_string(),
            }),
            Err(e) => Err(RouterError::Internal(format!(
                "Failed to read '{}': {e}",
                path.display()
            ))),
        }
    }

    /// Whether the reference points at something readable under the root.
    /// Never fails; rejected references report `false`.
    pub async fn exists(&self, file: &str) -> bool {
        self.locate(file).await.is_ok()
    }

    /// Metadata for a file under the root
    pub async fn stat(&self, file: &str) -> RouterResult<FileInfo> {
        let path = self.locate(file).await?;
        let meta = fs::metadata(&path).await?;
        Ok(FileInfo {
            size: meta.len(),
            is_file: meta.is_file(),
            modified: meta.modified().ok().map(DateTime::<Utc>::from),
        })
    }

    /// Lexical containment check without touching the filesystem
    pub fn resolve(&self, file: &str) -> RouterResult<PathBuf> {
        if Path::new(file).is_absolute() {
            logger::log_warning(&format!("Absolute file path rejected: {file}"));
            return Err(RouterError::InvalidPath(PathRejection::Absolute));
        }

        let candidate = fold_components(&self.root.join(file));
        // component-wise, so "/data/html-private" is not inside "/data/html"
        if !candidate.starts_with(&self.root) {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {} -> {}",
                file,
                candidate.display()
            ));
            return Err(RouterError::InvalidPath(PathRejection::Traversal));
        }
        Ok(candidate)
    }

    /// Resolve lexically, then repeat the check on canonical paths to catch symlinks
    async fn locate(&self, file: &str) -> RouterResult<PathBuf> {
        let candidate = self.resolve(file)?;

        let canonical = match fs::canonicalize(&candidate).await {
            Ok(p) => p,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(RouterError::FileNotFound {
                    file: file.to_string(),
                })
            }
            Err(e) => return Err(e.into()),
        };
        let root = fs::canonicalize(&self.root).await?;

        if !canonical.starts_with(&root) {
            logger::log_warning(&format!(
                "Symlink escape blocked: {} -> {}",
                file,
                canonical.display()
            ));
            return Err(RouterError::InvalidPath(PathRejection::Traversal));
        }
        Ok(canonical)
    }
}

/// Fold `.` and `..` components without consulting the filesystem
fn fold_components(path: &Path) -> PathBuf {
    let mut folded = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                folded.pop();
            }
            other => folded.push(other.as_os_str()),
        }
    }
    folded
}
