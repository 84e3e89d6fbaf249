//! Shared fixture: a real repository in a temp dir, built with git2 so that
//! commit times and parent lists are fully controlled.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use git2::{Oid, Repository, Signature, Time};
use tempfile::TempDir;

use gitax::{GitRepository, Settings};

pub struct TestRepo {
    pub dir: TempDir,
    pub artifacts: TempDir,
    pub repo: Repository,
    clock: i64,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let artifacts = TempDir::new().expect("failed to create artifact dir");
        let repo = Repository::init(dir.path()).expect("failed to init repo");

        Self {
            dir,
            artifacts,
            repo,
            clock: 1_700_000_000,
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of a file in the working tree.
    pub fn file(&self, relative: &str) -> PathBuf {
        self.path().join(relative)
    }

    /// Engine handle writing artifacts to this fixture's artifact dir.
    pub fn git(&self) -> GitRepository {
        self.git_with(Settings::default())
    }

    pub fn git_with(&self, settings: Settings) -> GitRepository {
        let settings = Settings {
            artifact_dir: Some(self.artifacts.path().to_path_buf()),
            ..settings
        };
        GitRepository::with_settings(self.path(), &settings)
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.file(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    pub fn read(&self, relative: &str) -> String {
        std::fs::read_to_string(self.file(relative)).unwrap()
    }

    pub fn stage(&self, relative: &str) {
        let mut index = self.repo.index().unwrap();
        index.read(false).unwrap();
        index.add_path(Path::new(relative)).unwrap();
        index.write().unwrap();
    }

    pub fn unstage_and_delete(&self, relative: &str) {
        let mut index = self.repo.index().unwrap();
        index.read(false).unwrap();
        index.remove_path(Path::new(relative)).unwrap();
        index.write().unwrap();
        std::fs::remove_file(self.file(relative)).unwrap();
    }

    /// Write, stage and commit files on HEAD.
    pub fn commit_files(&mut self, files: &[(&str, &str)], message: &str) -> Oid {
        for (path, content) in files {
            self.write(path, content);
            self.stage(path);
        }
        let parents = self.head().into_iter().collect::<Vec<_>>();
        self.commit_index(Some("HEAD"), &parents, message)
    }

    /// Commit the current index with explicit parents, optionally moving a ref.
    pub fn commit_index(&mut self, update_ref: Option<&str>, parents: &[Oid], message: &str) -> Oid {
        self.clock += 60;
        let sig = Signature::new("Test User", "test@example.com", &Time::new(self.clock, 0)).unwrap();

        let mut index = self.repo.index().unwrap();
        index.read(false).unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();
        let parents = parents
            .iter()
            .map(|oid| self.repo.find_commit(*oid).unwrap())
            .collect::<Vec<_>>();
        let parent_refs = parents.iter().collect::<Vec<_>>();

        self.repo
            .commit(update_ref, &sig, &sig, message, &tree, &parent_refs)
            .unwrap()
    }

    pub fn head(&self) -> Option<Oid> {
        self.repo.head().ok().and_then(|h| h.target())
    }
}
