pub mod history;
pub mod materialize;
pub mod path;
pub mod repository;
pub mod status;
pub mod sync;
pub mod tree;

pub use repository::{version, GitRepository};
