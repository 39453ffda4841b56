//! Filesystem mutations with dry-run support.
//!
//! Every write this tool performs goes through [`FileOps`], which either
//! carries it out, logs it (`test mode: ...`) or skips it, depending on the
//! run's [`Mode`]. Reads always hit the disk.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::{Error, Result};
use crate::settings::Mode;

/// What [`FileOps::ensure_symlink`] found or did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The link was missing and has been created (or would have been).
    Created,
    /// The link already resolves to the expected target.
    AlreadyCorrect,
    /// A symlink is present but resolves somewhere else. Left untouched.
    WrongTarget,
    /// Something other than a symlink occupies the path. Left untouched.
    Occupied,
}

/// What [`FileOps::write_tracked`] found on disk before writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// No file existed at the path.
    Created,
    /// The file already held exactly these contents.
    Unchanged,
    /// The file held different contents and has been overwritten.
    Replaced,
}

/// Executes filesystem mutations according to a [`Mode`].
#[derive(Debug, Clone, Copy)]
pub struct FileOps {
    mode: Mode,
}

impl FileOps {
    pub fn new(mode: Mode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Whether mutations actually reach the disk.
    pub fn is_live(&self) -> bool {
        self.mode == Mode::Live
    }

    /// Runs `action` only in live mode; logs `description` in test mode.
    fn perform<F>(&self, description: impl FnOnce() -> String, action: F) -> Result<()>
    where
        F: FnOnce() -> Result<()>,
    {
        match self.mode {
            Mode::Live => action(),
            Mode::Test => {
                info!("test mode: {}", description());
                Ok(())
            }
            Mode::ReadOnly => Ok(()),
        }
    }

    /// Create a directory and all missing parents.
    pub fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.perform(
            || format!("mkpath {}", path.display()),
            || {
                fs::create_dir_all(path).map_err(|e| Error::Filesystem {
                    message: format!("Failed to create directory '{}': {}", path.display(), e),
                })
            },
        )
    }

    /// Write `contents` to `path`, creating parent directories as needed.
    pub fn write(&self, path: &Path, contents: &str) -> Result<()> {
        self.perform(
            || {
                let preview: String = contents.chars().take(100).collect();
                format!("write {}, {}...", path.display(), preview)
            },
            || {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent).map_err(|e| Error::Filesystem {
                        message: format!(
                            "Failed to create directory '{}': {}",
                            parent.display(),
                            e
                        ),
                    })?;
                }
                fs::write(path, contents).map_err(|e| Error::Filesystem {
                    message: format!("Failed to write file '{}': {}", path.display(), e),
                })
            },
        )
    }

    /// Write `contents` to `path`, reporting whether an existing file differed.
    ///
    /// A differing file is overwritten after a warning naming the path.
    pub fn write_tracked(&self, path: &Path, contents: &str) -> Result<WriteOutcome> {
        let outcome = match read_optional(path)? {
            None => WriteOutcome::Created,
            Some(old) if old == contents => return Ok(WriteOutcome::Unchanged),
            Some(_) => {
                warn!("{} exists, but doesn't match; overwriting", path.display());
                WriteOutcome::Replaced
            }
        };
        self.write(path, contents)?;
        Ok(outcome)
    }

    /// Make sure `link` is a symlink resolving to `target`.
    ///
    /// Existing entries are never replaced: a symlink resolving elsewhere or
    /// a non-symlink at `link` is reported with a warning and left alone.
    pub fn ensure_symlink(&self, target: &Path, link: &Path) -> Result<LinkOutcome> {
        match fs::symlink_metadata(link) {
            Ok(meta) if meta.file_type().is_symlink() => {
                if links_to(link, target) {
                    Ok(LinkOutcome::AlreadyCorrect)
                } else {
                    warn!(
                        "symlink '{}' exists, but doesn't appear to link to the correct place",
                        link.display()
                    );
                    Ok(LinkOutcome::WrongTarget)
                }
            }
            Ok(_) => {
                warn!(
                    "couldn't make symlink '{}', something's already there",
                    link.display()
                );
                Ok(LinkOutcome::Occupied)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.perform(
                    || format!("symlink {} -> {}", link.display(), target.display()),
                    || create_symlink(target, link),
                )?;
                Ok(LinkOutcome::Created)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Read a file, treating a missing file as `None`.
pub fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::Filesystem {
            message: format!("Failed to read file '{}': {}", path.display(), e),
        }),
    }
}

/// Whether `link` and `target` resolve to the same real path.
fn links_to(link: &Path, target: &Path) -> bool {
    match (fs::canonicalize(link), fs::canonicalize(target)) {
        (Ok(actual), Ok(expected)) => actual == expected,
        _ => false,
    }
}

/// Resolve a symlink's target against the directory containing it.
pub fn resolve_link(link: &Path) -> Result<PathBuf> {
    let target = fs::read_link(link)?;
    let joined = match link.parent() {
        Some(parent) => parent.join(target),
        None => target,
    };
    Ok(fs::canonicalize(joined)?)
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> Result<()> {
    std::os::unix::fs::symlink(target, link).map_err(|e| Error::Filesystem {
        message: format!(
            "Failed to create symlink '{}' -> '{}': {}",
            link.display(),
            target.display(),
            e
        ),
    })
}

#[cfg(not(unix))]
fn create_symlink(target: &Path, link: &Path) -> Result<()> {
    Err(Error::Filesystem {
        message: format!(
            "Symlinks are not supported on this platform: '{}' -> '{}'",
            link.display(),
            target.display()
        ),
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use log::Level;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a/b/c.conf");

        FileOps::new(Mode::Live).write(&path, "hello").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn test_test_mode_writes_nothing_and_logs() {
        testing_logger::setup();
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.conf");

        FileOps::new(Mode::Test).write(&path, "server {}").unwrap();

        assert!(!path.exists());
        testing_logger::validate(|logs| {
            assert_eq!(logs.len(), 1);
            assert_eq!(logs[0].level, Level::Info);
            assert!(logs[0].body.starts_with("test mode: write"));
        });
    }

    #[test]
    fn test_read_only_mode_is_silent() {
        testing_logger::setup();
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.conf");
        let files = FileOps::new(Mode::ReadOnly);

        files.write(&path, "x").unwrap();
        files.create_dir_all(&temp.path().join("dir")).unwrap();

        assert!(!path.exists());
        assert!(!temp.path().join("dir").exists());
        testing_logger::validate(|logs| assert!(logs.is_empty()));
    }

    #[test]
    fn test_write_tracked_reports_drift_then_settles() {
        testing_logger::setup();
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("site.conf");
        let files = FileOps::new(Mode::Live);

        assert_eq!(files.write_tracked(&path, "one").unwrap(), WriteOutcome::Created);
        assert_eq!(files.write_tracked(&path, "one").unwrap(), WriteOutcome::Unchanged);
        assert_eq!(files.write_tracked(&path, "two").unwrap(), WriteOutcome::Replaced);
        assert_eq!(fs::read_to_string(&path).unwrap(), "two");

        testing_logger::validate(|logs| {
            let warnings: Vec<_> = logs.iter().filter(|l| l.level == Level::Warn).collect();
            assert_eq!(warnings.len(), 1);
            assert!(warnings[0].body.contains("doesn't match"));
        });
    }

    #[test]
    fn test_ensure_symlink_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("target");
        fs::create_dir(&target).unwrap();
        let link = temp.path().join("link");
        let files = FileOps::new(Mode::Live);

        assert_eq!(files.ensure_symlink(&target, &link).unwrap(), LinkOutcome::Created);
        assert_eq!(
            files.ensure_symlink(&target, &link).unwrap(),
            LinkOutcome::AlreadyCorrect
        );
        assert_eq!(fs::canonicalize(&link).unwrap(), fs::canonicalize(&target).unwrap());
    }

    #[test]
    fn test_ensure_symlink_leaves_wrong_target_alone() {
        testing_logger::setup();
        let temp = TempDir::new().unwrap();
        let expected = temp.path().join("expected");
        let other = temp.path().join("other");
        fs::create_dir(&expected).unwrap();
        fs::create_dir(&other).unwrap();
        let link = temp.path().join("link");
        symlink(&other, &link).unwrap();

        let outcome = FileOps::new(Mode::Live).ensure_symlink(&expected, &link).unwrap();

        assert_eq!(outcome, LinkOutcome::WrongTarget);
        assert_eq!(fs::read_link(&link).unwrap(), other);
        testing_logger::validate(|logs| {
            assert_eq!(logs.len(), 1);
            assert_eq!(logs[0].level, Level::Warn);
            assert!(logs[0].body.contains("doesn't appear to link to the correct place"));
        });
    }

    #[test]
    fn test_ensure_symlink_leaves_regular_file_alone() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("target");
        fs::create_dir(&target).unwrap();
        let link = temp.path().join("link");
        fs::write(&link, "not a link").unwrap();

        let outcome = FileOps::new(Mode::Live).ensure_symlink(&target, &link).unwrap();

        assert_eq!(outcome, LinkOutcome::Occupied);
        assert_eq!(fs::read_to_string(&link).unwrap(), "not a link");
    }

    #[test]
    fn test_resolve_link_handles_relative_targets() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("app")).unwrap();
        fs::create_dir(temp.path().join("farm")).unwrap();
        let link = temp.path().join("farm/app");
        symlink("../app", &link).unwrap();

        assert_eq!(
            resolve_link(&link).unwrap(),
            fs::canonicalize(temp.path().join("app")).unwrap()
        );
    }

    #[test]
    fn test_read_optional_missing_file() {
        let temp = TempDir::new().unwrap();
        assert_eq!(read_optional(&temp.path().join("nope")).unwrap(), None);
    }
}
