//! Object storage collaborators. The engine only ever needs `put`;
//! durability and serving are the store's problem.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;

use crate::error::{ThumbError, ThumbResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    pub url: String,
}

pub trait ObjectStore {
    /// Stores `bytes` under `path_hint`. Re-putting the same hint may
    /// overwrite. Failures propagate; the render never absorbs them.
    fn put(&self, path_hint: &str, bytes: &[u8], content_type: &str) -> ThumbResult<StoredObject>;
}

/// Hints are store-relative: no absolute paths, no traversal, no empty
/// segments.
fn validate_hint(hint: &str) -> ThumbResult<()> {
    let bad = hint.is_empty()
        || hint.starts_with('/')
        || hint.contains('\\')
        || hint
            .split('/')
            .any(|seg| seg.is_empty() || seg == "." || seg == "..");
    if bad {
        return Err(ThumbError::storage(format!("invalid path hint '{hint}'")));
    }
    Ok(())
}

/// Writes objects under a root directory; URLs use the `file` scheme.
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ObjectStore for FsObjectStore {
    fn put(&self, path_hint: &str, bytes: &[u8], _content_type: &str) -> ThumbResult<StoredObject> {
        validate_hint(path_hint)?;
        let path = self.root.join(path_hint);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create object dir '{}'", parent.display()))?;
        }
        std::fs::write(&path, bytes)
            .with_context(|| format!("write object '{}'", path.display()))?;
        let abs = path
            .canonicalize()
            .with_context(|| format!("canonicalize object path '{}'", path.display()))?;
        Ok(StoredObject {
            url: format!("file://{}", abs.display()),
        })
    }
}

/// In-memory store for tests and previews; URLs use a `mem` scheme.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<String, (String, Vec<u8>)>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path_hint: &str) -> Option<(String, Vec<u8>)> {
        self.objects
            .lock()
            .ok()
            .and_then(|map| map.get(path_hint).cloned())
    }

    pub fn len(&self) -> usize {
        self.objects.lock().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ObjectStore for MemoryObjectStore {
    fn put(&self, path_hint: &str, bytes: &[u8], content_type: &str) -> ThumbResult<StoredObject> {
        validate_hint(path_hint)?;
        let mut map = self
            .objects
            .lock()
            .map_err(|_| ThumbError::storage("memory store lock poisoned"))?;
        map.insert(
            path_hint.to_string(),
            (content_type.to_string(), bytes.to_vec()),
        );
        Ok(StoredObject {
            url: format!("mem://{path_hint}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_store_writes_and_reports_file_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());
        let stored = store
            .put("thumbnails/abc-main.png", b"png bytes", "image/png")
            .unwrap();
        assert!(stored.url.starts_with("file://"));
        let written = std::fs::read(dir.path().join("thumbnails/abc-main.png")).unwrap();
        assert_eq!(written, b"png bytes");
    }

    #[test]
    fn hints_cannot_escape_the_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());
        assert!(store.put("../escape.png", b"x", "image/png").is_err());
        assert!(store.put("/abs.png", b"x", "image/png").is_err());
        assert!(store.put("a//b.png", b"x", "image/png").is_err());
        assert!(store.put("", b"x", "image/png").is_err());
    }

    #[test]
    fn memory_store_roundtrips_and_overwrites() {
        let store = MemoryObjectStore::new();
        let first = store.put("t/main.png", b"one", "image/png").unwrap();
        assert_eq!(first.url, "mem://t/main.png");
        store.put("t/main.png", b"two", "image/png").unwrap();

        let (content_type, bytes) = store.get("t/main.png").unwrap();
        assert_eq!(content_type, "image/png");
        assert_eq!(bytes, b"two");
        assert_eq!(store.len(), 1);
    }
}
