use serde::{Deserialize, Serialize};

/// Application-facing status of a single working file.
///
/// Exactly one value per query. `NonExistent` doubles as the fallback for any
/// backend status the mapping does not recognise, including combinations of
/// several flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FileStatus {
    Unaltered,
    Added,
    Staged,
    Removed,
    RenamedInIndex,
    StagedTypeChange,
    Untracked,
    Modified,
    Missing,
    TypeChanged,
    RenamedInWorkDir,
    Ignored,
    #[default]
    NonExistent,
}

