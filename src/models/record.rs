//! Result rows handed back to the caller.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{CommitRef, FileStatus};

/// What a sync did to the file a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordAction {
    Update,
}

/// One row of an engine result: a file, optionally tied to a commit or blob,
/// plus where its materialized copy lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Repository-relative path
    pub item_path: String,
    /// Absolute path of the working file
    pub internal_filename: PathBuf,
    /// Commit id, or blob id for index entries
    pub oid: Option<String>,
    pub short_oid: Option<String>,
    pub author: Option<String>,
    pub message: Option<String>,
    pub summary: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<u32>,
    pub status: FileStatus,
    /// Materialized copy on disk, if one was written
    pub artifact_path: Option<PathBuf>,
    pub action: Option<RecordAction>,
}

impl HistoryRecord {
    pub fn new(item_path: impl Into<String>, internal_filename: impl Into<PathBuf>) -> Self {
        Self {
            item_path: item_path.into(),
            internal_filename: internal_filename.into(),
            oid: None,
            short_oid: None,
            author: None,
            message: None,
            summary: None,
            date: None,
            time: None,
            status: FileStatus::default(),
            artifact_path: None,
            action: None,
        }
    }

    /// Stamp the record with commit metadata.
    pub fn with_commit(mut self, commit: &CommitRef) -> Self {
        self.oid = Some(commit.oid.clone());
        self.short_oid = Some(commit.short_oid.clone());
        self.author = Some(commit.author.to_string());
        self.message = Some(commit.message.clone());
        self.summary = Some(commit.summary.clone());
        self.date = Some(commit.date);
        self.time = Some(commit.time);
        self
    }

    /// Stamp the record with a bare object id (commit tip or blob).
    pub fn with_oid(mut self, oid: &str) -> Self {
        self.oid = Some(oid.to_string());
        self.short_oid = Some(short_id(oid));
        self
    }

    pub fn with_status(mut self, status: FileStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_artifact(mut self, artifact_path: impl Into<PathBuf>) -> Self {
        self.artifact_path = Some(artifact_path.into());
        self
    }

    pub fn with_action(mut self, action: RecordAction) -> Self {
        self.action = Some(action);
        self
    }
}

/// Abbreviated object id as shown to users.
pub fn short_id(oid: &str) -> String {
    oid.chars().take(7).collect()
}
