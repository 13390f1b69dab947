//! Mapping of request resources onto the web root.
//!
//! This is the security boundary of the server: a [`ResolvedPath`] is only
//! ever constructed for locations inside the canonical web root.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use log::error;

use crate::server::Error;

/// A filesystem path that has been checked to lie inside the web root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath(PathBuf);

impl ResolvedPath {
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for ResolvedPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

/// Splits the resource into path segments relative to the web root.
///
/// The query string is dropped first. `.` and empty segments are skipped and
/// `..` removes the previous segment; climbing above the root is an error.
fn relative_segments(resource: &str) -> Result<PathBuf, Error> {
    let path = resource.split_once('?').map_or(resource, |(path, _)| path);

    let mut relative = PathBuf::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if !relative.pop() {
                    return Err(Error::SecurityViolation(resource.to_string()));
                }
            }
            segment => relative.push(segment),
        }
    }
    Ok(relative)
}

/// Resolves a request resource against the web root.
///
/// # Errors
///
/// * [`Error::SecurityViolation`] if the resource climbs out of the web root
///   with `..` segments, or if a symbolic link inside the root points outside
///   of it. The lexical check runs before any filesystem access, so the
///   outcome does not depend on whether the target exists.
/// * [`Error::NotFound`] if the web root or the target's parent directory
///   does not exist.
///
/// A missing target file inside an existing directory is not an error here;
/// reading it fails later.
pub async fn resolve(resource: &str, web_root: &Path) -> Result<ResolvedPath, Error> {
    let relative = relative_segments(resource)?;

    let root = tokio::fs::canonicalize(web_root).await.map_err(|e| {
        error!("Web root {} is not accessible: {e}", web_root.display());
        Error::NotFound(resource.to_string())
    })?;

    let Some(file_name) = relative.file_name().map(OsString::from) else {
        return Ok(ResolvedPath(root));
    };
    let parent = relative.parent().unwrap_or_else(|| Path::new(""));

    let parent = tokio::fs::canonicalize(root.join(parent))
        .await
        .map_err(|_| Error::NotFound(resource.to_string()))?;
    if !parent.starts_with(&root) {
        return Err(Error::SecurityViolation(resource.to_string()));
    }

    let candidate = parent.join(file_name);
    match tokio::fs::canonicalize(&candidate).await {
        Ok(target) if !target.starts_with(&root) => {
            Err(Error::SecurityViolation(resource.to_string()))
        }
        Ok(target) => Ok(ResolvedPath(target)),
        Err(_) => Ok(ResolvedPath(candidate)),
    }
}
