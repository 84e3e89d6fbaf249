//! Tree snapshot DTOs.
//!
//! - `FileDescriptor`: a file found by a tree or working directory walk
//! - `EntryKind`: what a tree entry points at, derived from its file mode

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// Repository-relative path, `/` separated
    pub path: String,
    pub name: String,
    /// Blob id; absent when the file was found on disk rather than in a tree
    pub oid: Option<String>,
    pub kind: EntryKind,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Executable,
    Symlink,
    Directory,
    Submodule,
}

impl EntryKind {
    pub fn from_mode(mode: i32) -> Option<Self> {
        match mode {
            m if m == i32::from(git2::FileMode::Blob)
                || m == i32::from(git2::FileMode::BlobGroupWritable) =>
            {
                Some(EntryKind::File)
            }
            m if m == i32::from(git2::FileMode::BlobExecutable) => Some(EntryKind::Executable),
            m if m == i32::from(git2::FileMode::Link) => Some(EntryKind::Symlink),
            m if m == i32::from(git2::FileMode::Tree) => Some(EntryKind::Directory),
            m if m == i32::from(git2::FileMode::Commit) => Some(EntryKind::Submodule),
            _ => None,
        }
    }

    /// Only plain file blobs count as trackable content.
    pub fn is_content_file(self) -> bool {
        self == EntryKind::File
    }
}
