use super::*;
use super::path_utils::{probe, Probe};

/// Document served for directories and, in SPA mode, for unmatched routes.
pub const INDEX_DOCUMENT: &str = "index.html";

/// Canonical `dir/index.html`, when it is a regular file that resolves
/// inside `root`. `root` must be canonical.
pub fn index_document(root: &Path, dir: &Path) -> Option<PathBuf> {
    let index = dir.join(INDEX_DOCUMENT);
    if probe(&index) != Probe::File {
        return None;
    }

    match fs::canonicalize(&index) {
        Ok(path) if path.starts_with(root) => Some(path),
        Ok(path) => {
            log::warn!("Index document escapes base directory: {}", path.display());
            None
        }
        Err(e) => {
            log::warn!("Failed to canonicalize {}: {}", index.display(), e);
            None
        }
    }
}

/// The root index used for history-mode fallback, if the root has one.
pub fn fallback_document(root: &Path) -> Option<PathBuf> {
    let index = index_document(root, root);
    if index.is_none() {
        log::debug!(
            "SPA fallback requested but {} has no usable {}",
            root.display(),
            INDEX_DOCUMENT
        );
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn canonical_tempdir() -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let root = fs::canonicalize(dir.path()).unwrap();
        (dir, root)
    }

    #[test]
    fn finds_index_file() {
        let (_dir, root) = canonical_tempdir();
        fs::write(root.join("index.html"), "<h1>app</h1>").unwrap();

        assert_eq!(fallback_document(&root), Some(root.join("index.html")));
    }

    #[test]
    fn index_directory_does_not_count() {
        let (_dir, root) = canonical_tempdir();
        fs::create_dir(root.join("index.html")).unwrap();

        assert_eq!(index_document(&root, &root), None);
    }

    #[test]
    fn missing_index() {
        let (_dir, root) = canonical_tempdir();
        assert_eq!(fallback_document(&root), None);
    }

    #[cfg(unix)]
    #[test]
    fn index_symlinked_outside_root_is_ignored() {
        let (_dir, root) = canonical_tempdir();
        let outside = tempdir().unwrap();
        fs::write(outside.path().join("secret.txt"), "nope").unwrap();
        std::os::unix::fs::symlink(outside.path().join("secret.txt"), root.join("index.html"))
            .unwrap();

        assert_eq!(index_document(&root, &root), None);
        assert_eq!(fallback_document(&root), None);
    }

    #[cfg(unix)]
    #[test]
    fn index_symlinked_inside_root_resolves_to_target() {
        let (_dir, root) = canonical_tempdir();
        fs::write(root.join("app.html"), "<h1>app</h1>").unwrap();
        std::os::unix::fs::symlink(root.join("app.html"), root.join("index.html")).unwrap();

        assert_eq!(fallback_document(&root), Some(root.join("app.html")));
    }
}
