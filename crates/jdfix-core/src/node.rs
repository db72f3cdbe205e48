use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::IndexError;

/// A snapshot of one entry in the tree: its name, the directory that
/// contains it, and its depth below the root (root itself sits at -1,
/// areas at 0).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub name: String,
    dir_path: PathBuf,
    pub level: i32,
}

impl Node {
    pub fn from_name_and_path(
        name: impl Into<String>,
        dir_path: impl Into<PathBuf>,
        level: i32,
    ) -> Result<Self, IndexError> {
        let node = Self {
            name: name.into(),
            dir_path: dir_path.into(),
            level,
        };
        if !node.abs_path().is_absolute() {
            return Err(IndexError::Path {
                message: format!("'{}' is not an absolute path", node.abs_path().display()),
            });
        }
        Ok(node)
    }

    pub fn from_abs_path(path: &Path, level: i32) -> Result<Self, IndexError> {
        if !path.is_absolute() {
            return Err(IndexError::Path {
                message: format!("'{}' is not an absolute path", path.display()),
            });
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dir_path = path.parent().unwrap_or(Path::new("/")).to_path_buf();
        Ok(Self {
            name,
            dir_path,
            level,
        })
    }

    pub fn abs_path(&self) -> PathBuf {
        self.dir_path.join(&self.name)
    }

    /// A copy of this node carrying a different name, same location.
    pub fn with_name(&self, name: impl Into<String>) -> Node {
        Node {
            name: name.into(),
            dir_path: self.dir_path.clone(),
            level: self.level,
        }
    }

    pub fn parent(&self) -> Node {
        let name = self
            .dir_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dir_path = self
            .dir_path
            .parent()
            .unwrap_or(Path::new("/"))
            .to_path_buf();
        Node {
            name,
            dir_path,
            level: self.level - 1,
        }
    }

    pub fn child(&self, name: impl Into<String>) -> Node {
        Node {
            name: name.into(),
            dir_path: self.abs_path(),
            level: self.level + 1,
        }
    }

    /// Direct children, sorted by name.
    pub fn children(&self) -> Result<Vec<Node>, IndexError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(self.abs_path())? {
            let entry = entry?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names.into_iter().map(|name| self.child(name)).collect())
    }

    /// All entries sharing this node's directory, including the node itself.
    pub fn siblings(&self) -> Result<Vec<Node>, IndexError> {
        self.parent().children()
    }

    pub fn exists(&self) -> bool {
        self.abs_path().exists()
    }

    pub fn is_dir(&self) -> bool {
        self.abs_path().is_dir()
    }

    pub fn is_file(&self) -> bool {
        self.abs_path().is_file()
    }

    /// Creation timestamp, where the platform records one.
    pub fn creation_time(&self) -> Option<SystemTime> {
        fs::metadata(self.abs_path()).ok()?.created().ok()
    }

    /// File extension including the dot, or an empty string.
    pub fn extension(&self) -> String {
        Path::new(&self.name)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default()
    }

    pub fn name_without_extension(&self) -> String {
        Path::new(&self.name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.clone())
    }

    /// Physically rename this entry to the new node's path.
    pub fn rename_to(&self, new: &Node) -> Result<(), IndexError> {
        fs::rename(self.abs_path(), new.abs_path())?;
        Ok(())
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
