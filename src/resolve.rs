//! Safe resolution of user-supplied relative paths under the plot root
//!
//! Every filesystem access in the crate goes through [`PlotRoot`], which
//! canonicalizes the requested path and verifies it stays underneath the
//! root. A path that escapes (via `..` or symlinks) resolves to NotFound,
//! the same answer a missing file gets.

use std::io;
use std::path::{Path, PathBuf};

/// Extensions recognized as plot files. Everything else is ignored.
pub const PLOT_EXTENSIONS: [&str; 2] = ["html", "json"];

/// Returns true when `name` ends in a recognized plot extension.
pub fn is_plot_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| PLOT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// The base directory under which all browsable chart content lives.
#[derive(Debug, Clone)]
pub struct PlotRoot {
    root: PathBuf,
}

impl PlotRoot {
    /// Open a plot root. The directory must exist; the stored path is
    /// canonical so descendant checks are symlink-proof.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let root = path.as_ref().canonicalize()?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("not a directory: {}", root.display()),
            ));
        }
        Ok(Self { root })
    }

    /// The canonical root path.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative path to an absolute one, requiring it to exist
    /// and to stay under the root.
    pub fn resolve(&self, rel: &str) -> io::Result<PathBuf> {
        let joined = self.root.join(rel.trim_start_matches('/'));
        let resolved = joined.canonicalize()?;
        if !resolved.starts_with(&self.root) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("path escapes plot root: {}", rel),
            ));
        }
        Ok(resolved)
    }

    /// Resolve a relative path that must be a directory.
    pub fn resolve_dir(&self, rel: &str) -> io::Result<PathBuf> {
        let resolved = self.resolve(rel)?;
        if !resolved.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("not a directory: {}", rel),
            ));
        }
        Ok(resolved)
    }

    /// Resolve a relative path that must be a regular file.
    pub fn resolve_file(&self, rel: &str) -> io::Result<PathBuf> {
        let resolved = self.resolve(rel)?;
        if !resolved.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("not a file: {}", rel),
            ));
        }
        Ok(resolved)
    }

    /// Express an absolute path as a root-relative one with forward
    /// slashes, or None when it lies outside the root.
    pub fn relative(&self, abs: &Path) -> Option<String> {
        let rel = abs.strip_prefix(&self.root).ok()?;
        let mut out = String::new();
        for part in rel.components() {
            if !out.is_empty() {
                out.push('/');
            }
            out.push_str(&part.as_os_str().to_string_lossy());
        }
        Some(out)
    }
}
