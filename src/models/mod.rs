//! Data transfer objects returned by the engine.
//!
//! Everything here is an owned snapshot, safe to keep after the repository
//! handle that produced it has been dropped. Serialized to JSON for the HTTP
//! API and the CLI.
//! - `commit`: CommitRef, AuthorInfo
//! - `record`: HistoryRecord, RecordAction
//! - `status`: FileStatus
//! - `tree`: FileDescriptor, EntryKind

pub mod commit;
pub mod record;
pub mod status;
pub mod tree;

pub use commit::*;
pub use record::*;
pub use status::*;
pub use tree::*;
