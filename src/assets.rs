use crate::error::MapError;
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

/// Locates JSON resources by name (no extension), the way a bundle lookup would.
pub trait AssetSource {
    /// Returns the document text, or [`MapError::NotFound`] when no such resource exists.
    fn read(&self, name: &str) -> Result<String, MapError>;
}

/// Resources under a directory: `name` resolves to `<root>/<name>.json`.
#[derive(Debug, Clone)]
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.json"))
    }
}

impl AssetSource for DirAssets {
    fn read(&self, name: &str) -> Result<String, MapError> {
        let path = self.path_for(name);
        std::fs::read_to_string(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => MapError::NotFound {
                name: name.to_owned(),
            },
            _ => MapError::Io { path, source },
        })
    }
}

/// In-memory resources, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    docs: HashMap<String, String>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, json: impl Into<String>) -> Self {
        self.insert(name, json);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, json: impl Into<String>) {
        self.docs.insert(name.into(), json.into());
    }
}

impl AssetSource for MemoryAssets {
    fn read(&self, name: &str) -> Result<String, MapError> {
        self.docs.get(name).cloned().ok_or_else(|| MapError::NotFound {
            name: name.to_owned(),
        })
    }
}
