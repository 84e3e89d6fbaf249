//! Lazy depth-first walk over a tree snapshot.
//!
//! Yields only plain file blobs: directories are descended into (when
//! recursive) but never yielded, and executables, symlinks and submodule
//! links are skipped outright. A predicate picks which files come out.

use git2::{Repository, Tree};
use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::{EntryKind, FileDescriptor};

pub struct TreeWalk<'r, F> {
    repo: &'r Repository,
    stack: Vec<Frame<'r>>,
    recursive: bool,
    predicate: F,
}

struct Frame<'r> {
    tree: Tree<'r>,
    prefix: String,
    next: usize,
}

/// Walk `tree`, whose entries live under `prefix` in the repository.
pub fn walk<'r, F>(
    repo: &'r Repository,
    tree: Tree<'r>,
    prefix: &str,
    recursive: bool,
    predicate: F,
) -> TreeWalk<'r, F>
where
    F: FnMut(&FileDescriptor) -> bool,
{
    TreeWalk {
        repo,
        stack: vec![Frame {
            tree,
            prefix: prefix.trim_matches('/').to_string(),
            next: 0,
        }],
        recursive,
        predicate,
    }
}

impl<'r, F> Iterator for TreeWalk<'r, F>
where
    F: FnMut(&FileDescriptor) -> bool,
{
    type Item = Result<FileDescriptor>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            let entry = frame.tree.get(frame.next).map(|entry| {
                (
                    String::from_utf8_lossy(entry.name_bytes()).to_string(),
                    entry.id(),
                    entry.filemode(),
                )
            });
            frame.next += 1;

            let Some((name, oid, mode)) = entry else {
                self.stack.pop();
                continue;
            };
            let path = if frame.prefix.is_empty() {
                name.clone()
            } else {
                format!("{}/{}", frame.prefix, name)
            };

            match EntryKind::from_mode(mode) {
                Some(EntryKind::Directory) if self.recursive => {
                    match self.repo.find_tree(oid) {
                        Ok(subtree) => self.stack.push(Frame {
                            tree: subtree,
                            prefix: path,
                            next: 0,
                        }),
                        Err(e) => return Some(Err(e.into())),
                    }
                }
                Some(kind) if kind.is_content_file() => {
                    let descriptor = FileDescriptor {
                        path,
                        name,
                        oid: Some(oid.to_string()),
                        kind,
                    };
                    if (self.predicate)(&descriptor) {
                        return Some(Ok(descriptor));
                    }
                }
                _ => {}
            }
        }
    }
}

/// Predicate matching file names that end in `.ext`, ignoring case.
pub fn has_extension(ext: &str) -> impl Fn(&FileDescriptor) -> bool + use<> {
    let ext = ext.trim_start_matches('.').to_string();
    move |file: &FileDescriptor| {
        Path::new(&file.name)
            .extension()
            .is_some_and(|e| e.to_string_lossy().eq_ignore_ascii_case(&ext))
    }
}

/// The tree at `path` inside `root`; an empty path is `root` itself.
pub fn subtree<'r>(repo: &'r Repository, root: Tree<'r>, path: &str) -> Result<Tree<'r>> {
    let path = path.trim_matches('/');
    if path.is_empty() {
        return Ok(root);
    }

    let entry = root
        .get_path(Path::new(path))
        .map_err(|_| AppError::PathNotFound(path.to_string()))?;
    let obj = entry.to_object(repo)?;
    obj.peel_to_tree()
        .map_err(|_| AppError::InvalidPath(format!("{} is not a directory", path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{FileMode, Oid};
    use tempfile::TempDir;

    fn tree_with(repo: &Repository, entries: &[(&str, Oid, FileMode)]) -> Oid {
        let mut builder = repo.treebuilder(None).unwrap();
        for (name, oid, mode) in entries {
            builder.insert(name, *oid, (*mode).into()).unwrap();
        }
        builder.write().unwrap()
    }

    fn fixture() -> (TempDir, Repository, Oid) {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let blob = repo.blob(b"content").unwrap();

        let sig = git2::Signature::now("Test", "test@example.com").unwrap();
        let empty = repo.find_tree(tree_with(&repo, &[])).unwrap();
        let module = repo.commit(None, &sig, &sig, "module", &empty, &[]).unwrap();
        drop(empty);

        let nested = tree_with(&repo, &[("deep.xpo", blob, FileMode::Blob)]);
        let src = tree_with(
            &repo,
            &[
                ("a.xpo", blob, FileMode::Blob),
                ("b.txt", blob, FileMode::Blob),
                ("run.xpo", blob, FileMode::BlobExecutable),
                ("link.xpo", blob, FileMode::Link),
                ("module.xpo", module, FileMode::Commit),
                ("nested", nested, FileMode::Tree),
            ],
        );
        let root = tree_with(
            &repo,
            &[("top.XPO", blob, FileMode::Blob), ("src", src, FileMode::Tree)],
        );
        (dir, repo, root)
    }

    fn paths(walk: impl Iterator<Item = Result<FileDescriptor>>) -> Vec<String> {
        walk.map(|f| f.unwrap().path).collect()
    }

    #[test]
    fn yields_only_plain_files_matching_the_predicate() {
        let (_dir, repo, root) = fixture();
        let tree = repo.find_tree(root).unwrap();

        let found = paths(walk(&repo, tree, "", true, has_extension("xpo")));

        assert_eq!(found, vec!["src/a.xpo", "src/nested/deep.xpo", "top.XPO"]);
    }

    #[test]
    fn non_recursive_stays_at_the_top_level() {
        let (_dir, repo, root) = fixture();
        let tree = repo.find_tree(root).unwrap();

        let found = paths(walk(&repo, tree, "", false, |_| true));

        assert_eq!(found, vec!["top.XPO"]);
    }

    #[test]
    fn subtree_walk_keeps_repository_paths() {
        let (_dir, repo, root) = fixture();
        let tree = repo.find_tree(root).unwrap();
        let src = subtree(&repo, tree, "src/").unwrap();

        let found = paths(walk(&repo, src, "src", true, |_| true));

        assert_eq!(found, vec!["src/a.xpo", "src/b.txt", "src/nested/deep.xpo"]);
    }

    #[test]
    fn subtree_of_a_file_is_invalid() {
        let (_dir, repo, root) = fixture();
        let tree = repo.find_tree(root).unwrap();

        let err = subtree(&repo, tree, "top.XPO").unwrap_err();
        assert!(matches!(err, AppError::InvalidPath(_)));
    }

    #[test]
    fn missing_subtree_is_not_found() {
        let (_dir, repo, root) = fixture();
        let tree = repo.find_tree(root).unwrap();

        let err = subtree(&repo, tree, "nope").unwrap_err();
        assert!(matches!(err, AppError::PathNotFound(_)));
    }

    #[test]
    fn submodule_links_are_skipped() {
        let (_dir, repo, root) = fixture();
        let tree = repo.find_tree(root).unwrap();
        let src = subtree(&repo, tree, "src").unwrap();
        assert!(src.get_name("module.xpo").is_some());

        let found = paths(walk(&repo, src, "src", false, |_| true));

        assert_eq!(found, vec!["src/a.xpo", "src/b.txt"]);
    }

    #[test]
    fn walking_twice_gives_the_same_files() {
        let (_dir, repo, root) = fixture();

        let first = paths(walk(&repo, repo.find_tree(root).unwrap(), "", true, |_| true));
        let second = paths(walk(&repo, repo.find_tree(root).unwrap(), "", true, |_| true));

        assert_eq!(first, second);
    }
}
