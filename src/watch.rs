//! Auto-rebuild on source changes
//!
//! Watches a project tree and rebuilds and reruns the application when a
//! source, resource or build file is written and is newer than the last
//! build output.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::event::{AccessKind, AccessMode};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use tracing::{debug, error, info};
use wax::{CandidatePath, Glob, Pattern};

use crate::error::{CiqwError, Result};

/// Project-relative paths whose changes trigger a rebuild
const WATCHED: [&str; 6] = [
    "**/manifest.xml",
    "*.jungle",
    "*.monkey",
    "source*/**/*.mc",
    "resources*/**/*.xml",
    "resources*/**/*.png",
];

/// Generated resource files, never a reason to rebuild
const IGNORED: [&str; 1] = ["**/*.debug.xml"];

/// Decides which changed files are relevant to a build
pub struct WatchFilter {
    watched: Vec<Glob<'static>>,
    ignored: Vec<Glob<'static>>,
}

impl WatchFilter {
    pub fn new() -> Result<Self> {
        let compile = |patterns: &[&'static str]| -> Result<Vec<Glob<'static>>> {
            patterns
                .iter()
                .map(|&pattern| {
                    Glob::new(pattern).map_err(|e| CiqwError::WatchFailed {
                        reason: format!("invalid pattern '{pattern}': {e}"),
                    })
                })
                .collect()
        };

        Ok(Self {
            watched: compile(&WATCHED)?,
            ignored: compile(&IGNORED)?,
        })
    }

    /// Whether a path relative to the project root is relevant
    pub fn is_relevant(&self, relative: &Path) -> bool {
        // Forward slashes on every platform
        let normalized = relative.to_string_lossy().replace('\\', "/");
        let candidate = CandidatePath::from(normalized.as_str());

        self.watched
            .iter()
            .any(|glob| glob.matched(&candidate).is_some())
            && !self
                .ignored
                .iter()
                .any(|glob| glob.matched(&candidate).is_some())
    }

    /// First relevant path of a file event, if the event is a completed write
    pub fn relevant_change(&self, event: &Event, root: &Path) -> Option<PathBuf> {
        if !is_write(&event.kind) {
            return None;
        }

        event
            .paths
            .iter()
            .find(|path| {
                path.strip_prefix(root)
                    .map(|relative| self.is_relevant(relative))
                    .unwrap_or(false)
            })
            .cloned()
    }
}

/// inotify reports a modification for every chunk written; only the close
/// marks a complete file
#[cfg(any(target_os = "linux", target_os = "android"))]
fn is_write(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Access(AccessKind::Close(AccessMode::Write)))
}

/// FSEvents and ReadDirectoryChangesW have no close events
#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn is_write(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Access(AccessKind::Close(AccessMode::Write))
            | EventKind::Modify(notify::event::ModifyKind::Data(_))
    )
}

/// Whether `changed` is newer than the build output (or there is none)
pub fn needs_rebuild(changed: &Path, output: &Path) -> bool {
    let Ok(output_time) = fs::metadata(output).and_then(|m| m.modified()) else {
        return true;
    };
    match fs::metadata(changed).and_then(|m| m.modified()) {
        Ok(changed_time) => changed_time > output_time,
        // Deleted in the meantime
        Err(_) => false,
    }
}

/// Watch `root` until the watcher fails, calling `on_change` for every
/// relevant change that is newer than `output`
///
/// Errors returned by `on_change` are logged and watching continues.
pub fn watch<F>(root: &Path, output: &Path, on_change: F) -> Result<()>
where
    F: FnMut(&Path) -> Result<()>,
{
    let root = fs::canonicalize(root)?;

    let (tx, rx) = mpsc::channel::<notify::Result<Event>>();
    let mut watcher = notify::recommended_watcher(tx)?;
    watcher.watch(&root, RecursiveMode::Recursive)?;
    info!("Watching '{}' for changes.", root.display());

    dispatch_events(rx, &root, output, on_change)?;

    Err(CiqwError::WatchFailed {
        reason: "file watcher stopped".to_string(),
    })
}

/// Call `on_change` for every relevant event until `events` runs out
fn dispatch_events<I, F>(events: I, root: &Path, output: &Path, mut on_change: F) -> Result<()>
where
    I: IntoIterator<Item = notify::Result<Event>>,
    F: FnMut(&Path) -> Result<()>,
{
    let filter = WatchFilter::new()?;

    for received in events {
        let event = received?;
        let Some(changed) = filter.relevant_change(&event, root) else {
            continue;
        };
        if !needs_rebuild(&changed, output) {
            debug!("{} is older than the build output", changed.display());
            continue;
        }

        info!("File modified: '{}'.", changed.display());
        if let Err(e) = on_change(&changed) {
            error!("{}", e);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, ModifyKind};
    use std::io::Write;
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;

    fn filter() -> WatchFilter {
        WatchFilter::new().unwrap()
    }

    #[test]
    fn test_relevant_paths() {
        let filter = filter();
        for path in [
            "manifest.xml",
            "monkey.jungle",
            "app.monkey",
            "source/App.mc",
            "source/views/MainView.mc",
            "source-round/App.mc",
            "resources/layouts/layout.xml",
            "resources-fr/strings.xml",
            "resources/drawables/icon.png",
        ] {
            assert!(filter.is_relevant(Path::new(path)), "{path}");
        }
    }

    #[test]
    fn test_irrelevant_paths() {
        let filter = filter();
        for path in [
            "resources/layout.debug.xml",
            "bin/App.prg",
            "notes.txt",
            "source/App.java",
            "docs/diagram.png",
            "nested/app.monkey",
        ] {
            assert!(!filter.is_relevant(Path::new(path)), "{path}");
        }
    }

    #[test]
    fn test_relevant_change_requires_write() {
        let filter = filter();
        let root = Path::new("/project");
        let path = PathBuf::from("/project/source/App.mc");

        let closed = Event::new(EventKind::Access(AccessKind::Close(AccessMode::Write)))
            .add_path(path.clone());
        assert_eq!(filter.relevant_change(&closed, root), Some(path.clone()));

        let modified = Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
            .add_path(path.clone());
        let expected = if cfg!(any(target_os = "linux", target_os = "android")) {
            None
        } else {
            Some(path.clone())
        };
        assert_eq!(filter.relevant_change(&modified, root), expected);

        let created = Event::new(EventKind::Create(CreateKind::File)).add_path(path);
        assert_eq!(filter.relevant_change(&created, root), None);
    }

    #[test]
    fn test_relevant_change_outside_root() {
        let filter = filter();
        let event = Event::new(EventKind::Access(AccessKind::Close(AccessMode::Write)))
            .add_path(PathBuf::from("/elsewhere/source/App.mc"));
        assert_eq!(filter.relevant_change(&event, Path::new("/project")), None);
    }

    #[test]
    fn test_needs_rebuild_without_output() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("App.mc");
        fs::write(&source, "").unwrap();
        assert!(needs_rebuild(&source, &temp.path().join("App.prg")));
    }

    #[test]
    fn test_needs_rebuild_compares_times() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("App.mc");
        let output = temp.path().join("App.prg");

        fs::write(&source, "").unwrap();
        thread::sleep(Duration::from_millis(50));
        fs::write(&output, "").unwrap();
        assert!(!needs_rebuild(&source, &output));

        thread::sleep(Duration::from_millis(50));
        fs::write(&source, "changed").unwrap();
        assert!(needs_rebuild(&source, &output));
    }

    #[test]
    #[cfg(any(target_os = "linux", target_os = "android"))]
    fn test_chunked_write_rebuilds_once_with_full_contents() {
        let temp = TempDir::new().unwrap();
        let root = fs::canonicalize(temp.path()).unwrap();
        fs::create_dir_all(root.join("source")).unwrap();
        let source = root.join("source/App.mc");

        let (tx, rx) = mpsc::channel::<notify::Result<Event>>();
        let mut watcher = notify::recommended_watcher(tx).unwrap();
        watcher.watch(&root, RecursiveMode::Recursive).unwrap();

        let writer = {
            let source = source.clone();
            thread::spawn(move || {
                let mut file = fs::File::create(&source).unwrap();
                file.write_all(b"class App {").unwrap();
                file.flush().unwrap();
                thread::sleep(Duration::from_millis(700));
                file.write_all(b" }").unwrap();
            })
        };

        let events = std::iter::from_fn(|| rx.recv_timeout(Duration::from_secs(2)).ok());
        let mut seen = Vec::new();
        dispatch_events(events, &root, &root.join("bin/App.prg"), |changed| {
            seen.push(fs::read_to_string(changed)?);
            Ok(())
        })
        .unwrap();
        writer.join().unwrap();

        assert_eq!(seen, vec!["class App { }".to_string()]);
    }
}
