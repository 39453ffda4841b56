//! Directory classification.
//!
//! Walks the projects directory breadth-first and sorts each candidate
//! directory into one of three bins:
//!
//! 1. **Project**: contains `config/environment.rb` and is not a symlink.
//!    Not descended into.
//! 2. **Symlink directory**: has at least one entry and every entry is a
//!    symlink. A hand-built shared host. Not descended into.
//! 3. Anything else that is itself a symlink is ignored; remaining
//!    directories have their subdirectories queued, down to
//!    [`MAX_PROJECT_DEPTH`] levels below the projects directory.
//!
//! Hidden entries are never candidates. Discovery order is queue order,
//! which later fixes the order stanzas are generated and hostnames listed.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::defaults::MAX_PROJECT_DEPTH;
use crate::error::Result;
use crate::project::is_project_dir;

/// Directories found by [`discover`], in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    pub projects: Vec<PathBuf>,
    pub symlink_dirs: Vec<PathBuf>,
}

/// Visible entries of `dir`, sorted by name. Unreadable directories have
/// no entries.
fn visible_children(dir: &Path) -> Vec<PathBuf> {
    let mut children: Vec<PathBuf> = match fs::read_dir(dir) {
        Ok(entries) => entries
            .flatten()
            .filter(|entry| !entry.file_name().to_string_lossy().starts_with('.'))
            .map(|entry| entry.path())
            .collect(),
        Err(_) => Vec::new(),
    };
    children.sort();
    children
}

/// Subdirectories of `dir` (following symlinks) that may be queued.
fn candidate_children(dir: &Path) -> Vec<PathBuf> {
    visible_children(dir)
        .into_iter()
        .filter(|child| child.is_dir())
        .collect()
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

/// Whether `dir` is non-empty and holds nothing but symlinks.
pub fn is_symlink_dir(dir: &Path) -> bool {
    let children = visible_children(dir);
    !children.is_empty() && children.iter().all(|child| is_symlink(child))
}

fn depth_below(root: &Path, path: &Path) -> usize {
    path.strip_prefix(root)
        .map(|relative| relative.components().count())
        .unwrap_or(usize::MAX)
}

/// Levels between `projects_dir` and `start`, compared by real path. A
/// start outside the projects directory counts as level 0.
fn start_depth(start: &Path, projects_dir: &Path) -> usize {
    let real = |path: &Path| fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    match real(start).strip_prefix(real(projects_dir)) {
        Ok(relative) => relative.components().count(),
        Err(_) => 0,
    }
}

/// Classify the tree under `root`, bounding the walk at
/// [`MAX_PROJECT_DEPTH`] levels below `projects_dir`.
///
/// If `root` is itself a project the walk is skipped and it is returned on
/// its own.
pub fn discover(root: &Path, projects_dir: &Path) -> Result<Discovery> {
    let mut discovery = Discovery::default();

    if is_project_dir(root) {
        debug!("{} is a single project", root.display());
        discovery.projects.push(root.to_path_buf());
        return Ok(discovery);
    }

    let offset = start_depth(root, projects_dir);
    let mut queue: VecDeque<PathBuf> = candidate_children(root)
        .into_iter()
        .filter(|child| offset.saturating_add(depth_below(root, child)) <= MAX_PROJECT_DEPTH)
        .collect();
    while let Some(candidate) = queue.pop_front() {
        if is_project_dir(&candidate) {
            debug!("project: {}", candidate.display());
            discovery.projects.push(candidate);
        } else if is_symlink_dir(&candidate) {
            debug!("symlink directory: {}", candidate.display());
            discovery.symlink_dirs.push(candidate);
        } else if is_symlink(&candidate) {
            debug!("ignoring symlink {}", candidate.display());
        } else {
            queue.extend(
                candidate_children(&candidate)
                    .into_iter()
                    .filter(|child| {
                        offset.saturating_add(depth_below(root, child)) <= MAX_PROJECT_DEPTH
                    }),
            );
        }
    }

    Ok(discovery)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    fn make_app(dir: &Path) {
        fs::create_dir_all(dir.join("config")).unwrap();
        fs::write(dir.join("config/environment.rb"), "").unwrap();
    }

    #[test]
    fn test_root_project_is_single_project() {
        let temp = TempDir::new().unwrap();
        make_app(temp.path());
        make_app(&temp.path().join("nested"));

        let discovery = discover(temp.path(), temp.path()).unwrap();

        assert_eq!(discovery.projects, vec![temp.path().to_path_buf()]);
        assert!(discovery.symlink_dirs.is_empty());
    }

    #[test]
    fn test_breadth_first_order() {
        let temp = TempDir::new().unwrap();
        make_app(&temp.path().join("b/deep"));
        make_app(&temp.path().join("c"));
        make_app(&temp.path().join("a/x/y"));
        make_app(&temp.path().join("a/early"));

        let discovery = discover(temp.path(), temp.path()).unwrap();

        let relative: Vec<_> = discovery
            .projects
            .iter()
            .map(|p| p.strip_prefix(temp.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            relative,
            vec![
                PathBuf::from("c"),
                PathBuf::from("a/early"),
                PathBuf::from("b/deep"),
                PathBuf::from("a/x/y"),
            ]
        );
    }

    #[test]
    fn test_does_not_descend_into_projects() {
        let temp = TempDir::new().unwrap();
        make_app(&temp.path().join("app"));
        make_app(&temp.path().join("app/test/fixtures/inner"));

        let discovery = discover(temp.path(), temp.path()).unwrap();

        assert_eq!(discovery.projects, vec![temp.path().join("app")]);
    }

    #[test]
    fn test_depth_bound() {
        let temp = TempDir::new().unwrap();
        make_app(&temp.path().join("one/two/three"));
        make_app(&temp.path().join("one/two/deeper/four"));

        let discovery = discover(temp.path(), temp.path()).unwrap();

        assert_eq!(discovery.projects, vec![temp.path().join("one/two/three")]);
    }

    #[test]
    fn test_symlink_dirs_and_ignored_symlinks() {
        let temp = TempDir::new().unwrap();
        make_app(&temp.path().join("app"));
        fs::create_dir_all(temp.path().join("app/public")).unwrap();
        fs::create_dir(temp.path().join("farm")).unwrap();
        symlink(temp.path().join("app/public"), temp.path().join("farm/app")).unwrap();
        fs::create_dir_all(temp.path().join("real/sub")).unwrap();
        symlink(temp.path().join("real"), temp.path().join("shortcut")).unwrap();
        symlink(temp.path().join("app"), temp.path().join("zalias")).unwrap();

        let discovery = discover(temp.path(), temp.path()).unwrap();

        assert_eq!(discovery.projects, vec![temp.path().join("app")]);
        assert_eq!(discovery.symlink_dirs, vec![temp.path().join("farm")]);
    }

    #[test]
    fn test_hidden_directories_skipped() {
        let temp = TempDir::new().unwrap();
        make_app(&temp.path().join(".webconfig/app"));
        make_app(&temp.path().join(".hidden"));

        let discovery = discover(temp.path(), temp.path()).unwrap();

        assert!(discovery.projects.is_empty());
    }

    #[test]
    fn test_never_both_project_and_symlink_dir() {
        let temp = TempDir::new().unwrap();
        make_app(&temp.path().join("app"));
        fs::create_dir(temp.path().join("farm")).unwrap();
        symlink(temp.path().join("app"), temp.path().join("farm/app")).unwrap();

        let discovery = discover(temp.path(), temp.path()).unwrap();

        for project in &discovery.projects {
            assert!(!discovery.symlink_dirs.contains(project));
        }
    }

    #[test]
    fn test_depth_bound_counts_from_projects_dir() {
        let temp = TempDir::new().unwrap();
        make_app(&temp.path().join("clients/acme/shop"));
        make_app(&temp.path().join("clients/acme/tests/fixtures_app"));
        let clients = temp.path().join("clients");

        let from_clients = discover(&clients, temp.path()).unwrap();
        let from_root = discover(temp.path(), temp.path()).unwrap();

        assert_eq!(from_clients.projects, vec![clients.join("acme/shop")]);
        assert_eq!(from_root.projects, from_clients.projects);
    }
}
