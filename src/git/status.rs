//! Backend status flags to `FileStatus`, and the per-file status query.

use git2::{Repository, Status};
use std::path::Path;

use crate::error::Result;
use crate::git::path::normalize;
use crate::git::repository::{workdir, GitRepository};
use crate::models::FileStatus;

/// Single-flag statuses the application knows about. Anything that is not
/// exactly one of these, including several flags at once, is `NonExistent`.
const STATUS_TABLE: [(Status, FileStatus); 12] = [
    (Status::CURRENT, FileStatus::Unaltered),
    (Status::INDEX_NEW, FileStatus::Added),
    (Status::INDEX_MODIFIED, FileStatus::Staged),
    (Status::INDEX_DELETED, FileStatus::Removed),
    (Status::INDEX_RENAMED, FileStatus::RenamedInIndex),
    (Status::INDEX_TYPECHANGE, FileStatus::StagedTypeChange),
    (Status::WT_NEW, FileStatus::Untracked),
    (Status::WT_MODIFIED, FileStatus::Modified),
    (Status::WT_DELETED, FileStatus::Missing),
    (Status::WT_TYPECHANGE, FileStatus::TypeChanged),
    (Status::WT_RENAMED, FileStatus::RenamedInWorkDir),
    (Status::IGNORED, FileStatus::Ignored),
];

impl From<Status> for FileStatus {
    fn from(status: Status) -> Self {
        STATUS_TABLE
            .iter()
            .find(|(flag, _)| *flag == status)
            .map(|(_, mapped)| *mapped)
            .unwrap_or(FileStatus::NonExistent)
    }
}

impl FileStatus {
    /// Map a raw backend status code. Bits the backend does not define make
    /// the whole code unknown.
    pub fn from_bits(code: u32) -> Self {
        Status::from_bits(code)
            .map(FileStatus::from)
            .unwrap_or(FileStatus::NonExistent)
    }
}

/// Status of one path against an open repository.
///
/// Lookup failures (path outside the repository, ambiguous spec) are reported
/// as `NonExistent` rather than as errors.
pub fn file_status(repo: &Repository, path: &Path) -> FileStatus {
    match repo.status_file(path) {
        Ok(status) => FileStatus::from(status),
        Err(e) => {
            tracing::debug!("No status for {}: {}", path.display(), e);
            FileStatus::NonExistent
        }
    }
}

impl GitRepository {
    pub fn get_file_status<P: AsRef<Path>>(&self, file: P) -> Result<FileStatus> {
        let file = file.as_ref();
        self.with_repo(|repo| {
            let relative = normalize(workdir(repo)?, file);
            Ok(file_status(repo, &relative))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn single_flags_map_one_to_one() {
        assert_eq!(FileStatus::from_bits(0), FileStatus::Unaltered);
        assert_eq!(FileStatus::from_bits(1 << 0), FileStatus::Added);
        assert_eq!(FileStatus::from_bits(1 << 1), FileStatus::Staged);
        assert_eq!(FileStatus::from_bits(1 << 2), FileStatus::Removed);
        assert_eq!(FileStatus::from_bits(1 << 3), FileStatus::RenamedInIndex);
        assert_eq!(FileStatus::from_bits(1 << 4), FileStatus::StagedTypeChange);
        assert_eq!(FileStatus::from_bits(1 << 7), FileStatus::Untracked);
        assert_eq!(FileStatus::from_bits(1 << 8), FileStatus::Modified);
        assert_eq!(FileStatus::from_bits(1 << 9), FileStatus::Missing);
        assert_eq!(FileStatus::from_bits(1 << 10), FileStatus::TypeChanged);
        assert_eq!(FileStatus::from_bits(1 << 11), FileStatus::RenamedInWorkDir);
        assert_eq!(FileStatus::from_bits(1 << 14), FileStatus::Ignored);
    }

    #[test]
    fn composite_flags_are_unknown() {
        let staged_and_modified = Status::INDEX_MODIFIED | Status::WT_MODIFIED;
        assert_eq!(FileStatus::from(staged_and_modified), FileStatus::NonExistent);
        assert_eq!(FileStatus::from(Status::CONFLICTED), FileStatus::NonExistent);
    }

    #[test]
    fn undefined_bits_are_unknown() {
        assert_eq!(FileStatus::from_bits(1 << 31), FileStatus::NonExistent);
        assert_eq!(FileStatus::from_bits(u32::MAX), FileStatus::NonExistent);
    }

    proptest! {
        #[test]
        fn multi_bit_codes_are_nonexistent(code in any::<u32>()) {
            prop_assume!(code.count_ones() > 1);
            prop_assert_eq!(FileStatus::from_bits(code), FileStatus::NonExistent);
        }

        #[test]
        fn mapping_is_total(code in any::<u32>()) {
            let mapped = FileStatus::from_bits(code);
            let known = STATUS_TABLE.iter().any(|(flag, _)| flag.bits() == code);
            prop_assert_eq!(mapped == FileStatus::NonExistent, !known);
        }
    }
}
