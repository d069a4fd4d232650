//! Document storage.

use std::io;
use std::path::{Path, PathBuf};

/// A resolved document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    /// Display name (used as the remote page title).
    pub name: String,
    /// Full source text.
    pub content: String,
}

/// Resolves and persists document sources by path.
///
/// `load` returning `Ok(None)` is the "unresolvable path" sentinel, not an
/// error: the orchestrator maps it to a "no link" result.
pub trait Vault: Sync {
    fn load(&self, path: &Path) -> io::Result<Option<Document>>;
    fn save(&self, path: &Path, content: &str) -> io::Result<()>;
}

/// Filesystem-backed vault rooted at a directory.
#[derive(Clone, Debug)]
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    /// Create a vault rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl Vault for FsVault {
    fn load(&self, path: &Path) -> io::Result<Option<Document>> {
        let full = self.resolve(path);
        if !full.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&full)?;
        let name = full
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Some(Document { name, content }))
    }

    fn save(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(self.resolve(path), content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn loads_existing_document() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.md"), "# Notes\n").unwrap();

        let vault = FsVault::new(dir.path());
        let doc = vault.load(Path::new("notes.md")).unwrap().unwrap();
        assert_eq!(doc.name, "notes");
        assert_eq!(doc.content, "# Notes\n");
    }

    #[test]
    fn missing_document_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let vault = FsVault::new(dir.path());
        assert!(vault.load(Path::new("absent.md")).unwrap().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let vault = FsVault::new(dir.path());
        vault.save(Path::new("doc.md"), "content").unwrap();
        let doc = vault.load(Path::new("doc.md")).unwrap().unwrap();
        assert_eq!(doc.content, "content");
    }
}
