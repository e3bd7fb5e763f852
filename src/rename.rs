use std::{
    collections::HashSet,
    fmt, fs, io,
    path::{Path, PathBuf},
};

use tracing::{debug, error, info, instrument, warn};
use walkdir::WalkDir;

use crate::{
    config::Levels,
    error::{NotesError, Result},
    title::normalize,
};

/// What happened to one directory during a rename run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed { from: PathBuf, to: PathBuf },
    /// Name was already in its final form.
    Unchanged { path: PathBuf },
    /// Source disappeared before the move ran.
    Vanished { path: PathBuf },
    /// Target name is taken; the directory was left where it was.
    Collision { from: PathBuf, to: PathBuf },
    Failed { path: PathBuf, reason: String },
}

impl RenameOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Collision { .. } | Self::Failed { .. })
    }
}

impl fmt::Display for RenameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Renamed { from, to } => {
                write!(f, "Renamed: '{}' -> '{}'", from.display(), to.display())
            }
            Self::Unchanged { path } => {
                write!(f, "Skipped (already formatted): '{}'", path.display())
            }
            Self::Vanished { path } => {
                write!(f, "Skipped (already moved): '{}'", path.display())
            }
            Self::Collision { from, to } => write!(
                f,
                "Error renaming '{}': target '{}' already exists",
                from.display(),
                to.display()
            ),
            Self::Failed { path, reason } => {
                write!(f, "Error renaming '{}': {}", path.display(), reason)
            }
        }
    }
}

/// Outcomes of a run, in the order they happened.
#[derive(Debug, Clone, Default)]
pub struct RenameReport {
    pub outcomes: Vec<RenameOutcome>,
}

impl RenameReport {
    fn push(&mut self, outcome: RenameOutcome) {
        match &outcome {
            RenameOutcome::Renamed { .. } => info!("{outcome}"),
            RenameOutcome::Unchanged { .. } | RenameOutcome::Vanished { .. } => {
                debug!("{outcome}")
            }
            RenameOutcome::Collision { .. } => warn!("{outcome}"),
            RenameOutcome::Failed { .. } => error!("{outcome}"),
        }
        self.outcomes.push(outcome);
    }

    pub fn renamed(&self) -> usize {
        self.count(|o| matches!(o, RenameOutcome::Renamed { .. }))
    }

    pub fn vanished(&self) -> usize {
        self.count(|o| matches!(o, RenameOutcome::Vanished { .. }))
    }

    pub fn errors(&self) -> usize {
        self.count(RenameOutcome::is_error)
    }

    fn count(&self, pred: impl Fn(&RenameOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|&o| pred(o)).count()
    }
}

/// Moves `from` to `to`, classifying whatever goes wrong.
pub fn rename_dir(from: &Path, to: &Path) -> RenameOutcome {
    if from == to {
        return RenameOutcome::Unchanged {
            path: from.to_path_buf(),
        };
    }

    match fs::symlink_metadata(from) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return RenameOutcome::Vanished {
                path: from.to_path_buf(),
            };
        }
        Err(e) => {
            return RenameOutcome::Failed {
                path: from.to_path_buf(),
                reason: e.to_string(),
            };
        }
        Ok(_) => {}
    }

    if fs::symlink_metadata(to).is_ok() {
        return RenameOutcome::Collision {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        };
    }

    match fs::rename(from, to) {
        Ok(()) => RenameOutcome::Renamed {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        },
        // target and source share a parent, so this can only be the source
        Err(e) if e.kind() == io::ErrorKind::NotFound => RenameOutcome::Vanished {
            path: from.to_path_buf(),
        },
        Err(e) => RenameOutcome::Failed {
            path: from.to_path_buf(),
            reason: e.to_string(),
        },
    }
}

/// Every directory below `root`, children before their parent.
///
/// The listing is taken up front so renames made while consuming it cannot
/// disturb the walk.
fn directories_bottom_up(root: &Path) -> Result<Vec<PathBuf>> {
    match fs::metadata(root) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return Err(NotesError::RootNotFound(root.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(NotesError::RootNotFound(root.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    }

    let mut dirs = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .contents_first(true)
        .sort_by_file_name()
    {
        match entry {
            Ok(entry) if entry.file_type().is_dir() => dirs.push(entry.into_path()),
            Ok(_) => {}
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => warn!("skipping unreadable entry: {e}"),
        }
    }

    Ok(dirs)
}

/// Normalizes the name of every directory under `root`, deepest first.
#[instrument(level = "info", skip_all, fields(root = %root.display()))]
pub fn rename_all(root: &Path) -> Result<RenameReport> {
    let mut report = RenameReport::default();

    for dir in directories_bottom_up(root)? {
        let Some(name) = dir.file_name().and_then(|n| n.to_str()) else {
            report.push(RenameOutcome::Failed {
                path: dir.clone(),
                reason: "name is not valid UTF-8".to_string(),
            });
            continue;
        };

        let target = dir.with_file_name(normalize(name));
        report.push(rename_dir(&dir, &target));
    }

    info!(
        renamed = report.renamed(),
        errors = report.errors(),
        "flat rename finished"
    );
    Ok(report)
}

/// Name a directory at a prefixed level should carry.
pub fn level_name(name: &str, prefix: &str) -> String {
    let title = normalize(name);
    if title.starts_with(prefix) {
        title
    } else {
        format!("{prefix}{title}")
    }
}

/// Applies `levels` to the first `levels.depth()` levels under `root`.
///
/// One full scan per level, deepest level first, so a rename never changes
/// the path of a directory still waiting to be renamed.
#[instrument(level = "info", skip_all, fields(root = %root.display()))]
pub fn rename_all_levels(root: &Path, levels: &Levels) -> Result<RenameReport> {
    let mut report = RenameReport::default();

    for (depth, prefix) in levels.prefixes.iter().enumerate().rev() {
        debug!(depth, prefix = %prefix, "starting level pass");
        rename_level(root, depth, prefix, &mut report)?;
    }

    info!(
        renamed = report.renamed(),
        vanished = report.vanished(),
        errors = report.errors(),
        "level rename finished"
    );
    Ok(report)
}

fn rename_level(
    root: &Path,
    depth: usize,
    prefix: &str,
    report: &mut RenameReport,
) -> Result<()> {
    let mut seen = HashSet::new();

    for dir in directories_bottom_up(root)? {
        let Ok(relative) = dir.strip_prefix(root) else {
            continue;
        };
        let segments: Vec<_> = relative.iter().collect();
        if segments.len() <= depth {
            continue;
        }

        // deeper directories move with their ancestor at this level
        let level_dir: PathBuf = root.join(segments[..=depth].iter().collect::<PathBuf>());
        if !seen.insert(level_dir.clone()) {
            continue;
        }

        let Some(name) = segments[depth].to_str() else {
            report.push(RenameOutcome::Failed {
                path: level_dir,
                reason: "name is not valid UTF-8".to_string(),
            });
            continue;
        };

        let target = level_dir.with_file_name(level_name(name, prefix));
        report.push(rename_dir(&level_dir, &target));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_name_adds_prefix_once() {
        assert_eq!(level_name("01_course-a", "Course "), "Course 1. Course A");
        assert_eq!(
            level_name("Course 1. Course A", "Course "),
            "Course 1. Course A"
        );
        assert_eq!(level_name("notes", "Module "), "Module Notes");
    }

    #[test]
    fn outcome_lines() {
        let renamed = RenameOutcome::Renamed {
            from: PathBuf::from("/v/01_a"),
            to: PathBuf::from("/v/1. A"),
        };
        assert_eq!(renamed.to_string(), "Renamed: '/v/01_a' -> '/v/1. A'");

        let skipped = RenameOutcome::Unchanged {
            path: PathBuf::from("/v/Notes"),
        };
        assert_eq!(
            skipped.to_string(),
            "Skipped (already formatted): '/v/Notes'"
        );

        let failed = RenameOutcome::Failed {
            path: PathBuf::from("/v/x"),
            reason: "Permission denied".to_string(),
        };
        assert_eq!(failed.to_string(), "Error renaming '/v/x': Permission denied");
        assert!(failed.is_error());
        assert!(!skipped.is_error());
    }

    #[test]
    fn missing_source_is_vanished_not_failed() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("01_gone");
        let to = dir.path().join("1. Gone");

        assert_eq!(
            rename_dir(&from, &to),
            RenameOutcome::Vanished { path: from.clone() }
        );
    }

    #[test]
    fn existing_target_is_collision() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("01_a");
        let to = dir.path().join("1. A");
        fs::create_dir(&from).unwrap();
        fs::create_dir(&to).unwrap();

        assert!(matches!(
            rename_dir(&from, &to),
            RenameOutcome::Collision { .. }
        ));
        assert!(from.is_dir());
    }

    #[test]
    fn listing_is_bottom_up() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b/c")).unwrap();
        fs::write(dir.path().join("a/file.txt"), "x").unwrap();

        let dirs = directories_bottom_up(dir.path()).unwrap();
        assert_eq!(
            dirs,
            vec![
                dir.path().join("a/b/c"),
                dir.path().join("a/b"),
                dir.path().join("a"),
            ]
        );
    }

    #[test]
    fn missing_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nope");
        assert!(matches!(
            directories_bottom_up(&root),
            Err(NotesError::RootNotFound(_))
        ));
    }
}
