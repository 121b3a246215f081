use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread::Scope;
use tracing::{trace, warn};

use crate::errors::{SearchError, SearchResult};
use crate::limiter::Limiter;
use crate::matcher::WordMatcher;
use crate::results::{MatchWriter, RunStats};
use crate::searcher::FileTask;

/// What a directory entry turned out to be once resolved.
///
/// Classification happens once, before the open/recurse decision, so a path
/// that is both openable and a directory is never opened as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    RegularFile,
    Other,
}

/// Resolves a path's kind, following symlinks
pub fn classify(path: &Path) -> std::io::Result<EntryKind> {
    let file_type = fs::metadata(path)?.file_type();
    Ok(if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_file() {
        EntryKind::RegularFile
    } else {
        EntryKind::Other
    })
}

/// Recursive directory walker and worker dispatcher.
///
/// The walk itself is a synchronous depth-first traversal on one control
/// thread; every regular file it finds is handed to an independently
/// scheduled worker, throttled by the [`Limiter`]. Sibling order follows
/// filesystem enumeration order. Workers are spawned into the surrounding
/// [`Scope`], so they are all joined before the run is declared done.
pub(crate) struct Walker<'env, W: Write + Send> {
    matcher: &'env WordMatcher,
    limiter: &'env Limiter,
    stats: &'env RunStats,
    sink: &'env MatchWriter<W>,
}

impl<'env, W: Write + Send> Walker<'env, W> {
    pub fn new(
        matcher: &'env WordMatcher,
        limiter: &'env Limiter,
        stats: &'env RunStats,
        sink: &'env MatchWriter<W>,
    ) -> Self {
        Self {
            matcher,
            limiter,
            stats,
            sink,
        }
    }

    /// Walks a directory tree, dispatching a search task per regular file.
    ///
    /// Returns an error only if `dir` itself cannot be listed; failures
    /// deeper in the tree are logged and skipped so one bad subtree never
    /// suppresses matches elsewhere.
    pub fn walk<'scope>(
        &'scope self,
        scope: &'scope Scope<'scope, 'env>,
        dir: &Path,
    ) -> SearchResult<()> {
        trace!("Walking directory: {}", dir.display());
        let entries = fs::read_dir(dir).map_err(|e| SearchError::path_unreadable(dir, e))?;

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Failed to read an entry of {}: {}", dir.display(), e);
                    self.stats.record_skip();
                    continue;
                }
            };

            let path = entry.path();
            match classify(&path) {
                Ok(EntryKind::Directory) => {
                    if let Err(e) = self.walk(scope, &path) {
                        warn!("{}", e);
                        self.stats.record_skip();
                    }
                }
                Ok(EntryKind::RegularFile) => self.dispatch(scope, path),
                Ok(EntryKind::Other) => {
                    trace!("Skipping special entry: {}", path.display());
                }
                Err(e) => {
                    warn!("Cannot classify {}: {}", path.display(), e);
                    self.stats.record_skip();
                }
            }
        }

        Ok(())
    }

    /// Opens a regular file and hands it to a worker, fire-and-forget
    /// relative to the walk
    fn dispatch<'scope>(&'scope self, scope: &'scope Scope<'scope, 'env>, path: PathBuf) {
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) => {
                warn!("Cannot open {}: {}", path.display(), e);
                self.stats.record_skip();
                return;
            }
        };
        let task = FileTask::new(path, file);

        // May block the walk here until a running search finishes
        let guard = self.limiter.acquire();
        self.stats.task_started();

        let (matcher, sink, stats) = (self.matcher, self.sink, self.stats);
        scope.spawn(move || {
            let path = task.path.clone();
            match task.scan(matcher, sink) {
                Ok(lines_matched) => stats.record_scan(lines_matched),
                Err(e) => {
                    // Ends only this file's scan; siblings and the walk go on
                    warn!("Search of {} ended early: {}", path.display(), e);
                    stats.record_read_error();
                }
            }
            // scan consumed the task, so the handle is already closed;
            // only now does the slot free
            stats.task_finished();
            drop(guard);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_classify_directory_and_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("plain.txt");
        std::fs::write(&file_path, "contents\n").unwrap();

        assert_eq!(classify(dir.path()).unwrap(), EntryKind::Directory);
        assert_eq!(classify(&file_path).unwrap(), EntryKind::RegularFile);
    }

    #[test]
    fn test_classify_missing_path_errors() {
        let dir = tempdir().unwrap();
        assert!(classify(&dir.path().join("missing")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_classify_follows_symlinks() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("target.txt");
        std::fs::write(&target, "contents\n").unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        assert_eq!(classify(&link).unwrap(), EntryKind::RegularFile);
    }
}
