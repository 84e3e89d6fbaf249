//! GitAx - file-level version history over a git working tree.
//!
//! Answers, for a single tracked file: which commits changed it, what it
//! looked like at a given commit, what its working-tree status is, and how to
//! force it back to a committed version. Also syncs a folder to the HEAD tip
//! and lists every dirty file in the index.
//!
//! The engine lives in `git`; `routes` exposes it over HTTP and `models`
//! holds the records both hand back.

pub mod config;
pub mod error;
pub mod git;
pub mod models;
pub mod routes;

pub use config::{EnumerationStrategy, Settings};
pub use error::{AppError, Result};
pub use git::{version, GitRepository};
