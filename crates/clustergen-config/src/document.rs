use clustergen_error::ClusterGenError;
use clustergen_types::ConfigTree;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Parse a proxy configuration document.
pub fn parse(content: &str) -> Result<ConfigTree, ClusterGenError> {
    serde_yaml_ng::from_str(content).map_err(|e| ClusterGenError::ParseError(e.to_string()))
}

/// Read and parse a proxy configuration document from disk.
pub fn from_file(path: impl AsRef<Path>) -> Result<ConfigTree, ClusterGenError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| ClusterGenError::IoError(format!("{}: {}", path.display(), e)))?;
    parse(&content)
}

/// Render the document as YAML, keeping mapping key order.
pub fn to_string(tree: &ConfigTree) -> Result<String, ClusterGenError> {
    serde_yaml_ng::to_string(tree).map_err(|e| ClusterGenError::SerializeError(e.to_string()))
}

/// Write the document next to `path` first, then rename it into place, so a
/// failed write never leaves a truncated file behind.
///
/// A symlinked `path` is resolved first so the link itself survives, and the
/// existing file's permissions are carried over to the replacement.
pub fn write_atomic(path: impl AsRef<Path>, tree: &ConfigTree) -> Result<(), ClusterGenError> {
    let path = path.as_ref();
    let content = to_string(tree)?;
    let target = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let tmp = temp_path(&target);
    debug!("Writing {} via {}", target.display(), tmp.display());

    std::fs::write(&tmp, content)
        .map_err(|e| ClusterGenError::IoError(format!("{}: {}", tmp.display(), e)))?;
    if let Err(e) = keep_permissions(&target, &tmp).and_then(|_| std::fs::rename(&tmp, &target)) {
        let _ = std::fs::remove_file(&tmp);
        return Err(ClusterGenError::IoError(format!(
            "{}: {}",
            target.display(),
            e
        )));
    }
    Ok(())
}

fn keep_permissions(target: &Path, tmp: &Path) -> std::io::Result<()> {
    match std::fs::metadata(target) {
        Ok(meta) => std::fs::set_permissions(tmp, meta.permissions()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
