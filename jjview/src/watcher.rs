//! Filesystem watcher for the working copy.
//!
//! Every directory of the workspace is registered non-recursively, skipping
//! jj's and git's own storage, so the commands jjview runs never feed back
//! into the watcher. Directories created later are registered as they show
//! up. Relevant notifications are squeezed through a one-slot channel: a
//! burst of writes leaves at most one pending signal, and the debounce thread
//! turns each burst into a single [`AppEvent::FileChanged`].

use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TrySendError};
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

use crate::event::AppEvent;

/// Directory names whose trees are never watched.
pub const EXCLUDED_DIRS: &[&str] = &[".jj", ".git"];

/// Files with this suffix are lock files written by jj or git mid-command.
const LOCK_SUFFIX: &str = ".lock";

/// Extra ignore rules on top of the built-in exclusions.
pub trait PathFilter: Send + Sync {
    fn should_ignore(&self, _path: &Path, _is_dir: bool) -> bool {
        false
    }
}

/// Ignores nothing beyond the built-in exclusions.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFilter;

impl PathFilter for NoFilter {}

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("failed to create filesystem watcher: {0}")]
    Backend(#[from] notify::Error),
    #[error("cannot watch {path}: {source}")]
    Root {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
    #[error("failed to start watcher thread: {0}")]
    Thread(#[from] io::Error),
}

/// A running watcher. Dropping it (or calling [`WatchHandle::close`]) stops
/// the watch thread and closes the change channel.
pub struct WatchHandle {
    changes: Receiver<()>,
    shutdown: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl WatchHandle {
    /// Receiving end of the one-slot change channel.
    pub fn changes(&self) -> Receiver<()> {
        self.changes.clone()
    }

    /// Stops watching and waits for the watch thread to exit.
    pub fn close(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        drop(self.shutdown.take());
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Starts watching the workspace at `root`.
///
/// Fails only when the backend cannot be created or `root` itself cannot be
/// watched. Subdirectories that fail to register are logged and skipped.
pub fn start(root: &Path, filter: Arc<dyn PathFilter>) -> Result<WatchHandle, WatchError> {
    let (raw_tx, raw_rx) = crossbeam_channel::unbounded::<notify::Result<Event>>();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        let _ = raw_tx.send(res);
    })?;

    watcher
        .watch(root, RecursiveMode::NonRecursive)
        .map_err(|source| WatchError::Root { path: root.to_owned(), source })?;
    let registered = register_subtree(&mut watcher, root, root, filter.as_ref());
    debug!(root = %root.display(), directories = registered + 1, "watching workspace");

    let (changes_tx, changes_rx) = crossbeam_channel::bounded(1);
    let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded::<()>(0);
    let root = root.to_owned();
    let thread = thread::Builder::new().name("fs-watch".into()).spawn(move || {
        watch_loop(watcher, &root, filter.as_ref(), &raw_rx, &shutdown_rx, &changes_tx);
    })?;

    Ok(WatchHandle { changes: changes_rx, shutdown: Some(shutdown_tx), thread: Some(thread) })
}

/// Forwards one [`AppEvent::FileChanged`] per burst of changes.
///
/// After the first signal of a burst it waits `debounce`, then swallows
/// whatever arrived meanwhile. Exits when the watcher closes its channel or
/// the event loop has gone away.
pub fn spawn_debouncer(
    changes: Receiver<()>,
    tx: UnboundedSender<AppEvent>,
    debounce: Duration,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new().name("fs-debounce".into()).spawn(move || {
        while changes.recv().is_ok() {
            thread::sleep(debounce);
            while changes.try_recv().is_ok() {}
            if tx.send(AppEvent::FileChanged).is_err() {
                break;
            }
        }
    })
}

fn watch_loop(
    mut watcher: RecommendedWatcher,
    root: &Path,
    filter: &dyn PathFilter,
    raw_rx: &Receiver<notify::Result<Event>>,
    shutdown_rx: &Receiver<()>,
    changes_tx: &Sender<()>,
) {
    loop {
        crossbeam_channel::select! {
            recv(raw_rx) -> msg => match msg {
                Ok(Ok(event)) => handle_event(&mut watcher, root, filter, &event, changes_tx),
                Ok(Err(err)) => warn!(error = %err, "filesystem watch error"),
                Err(_) => break,
            },
            recv(shutdown_rx) -> _ => break,
        }
    }
    debug!("filesystem watcher stopped");
}

fn handle_event(
    watcher: &mut dyn Watcher,
    root: &Path,
    filter: &dyn PathFilter,
    event: &Event,
    changes_tx: &Sender<()>,
) {
    if matches!(event.kind, EventKind::Create(_)) {
        for path in &event.paths {
            if path.is_dir() && !is_excluded(root, path) && !filter.should_ignore(path, true) {
                if let Err(err) = watcher.watch(path, RecursiveMode::NonRecursive) {
                    warn!(path = %path.display(), error = %err, "cannot watch new directory");
                    continue;
                }
                register_subtree(watcher, root, path, filter);
            }
        }
    }

    if is_relevant(root, filter, event) {
        trace!(kind = ?event.kind, paths = ?event.paths, "change detected");
        offer(changes_tx);
    }
}

/// Registers every directory strictly below `dir`. Returns how many were
/// registered.
fn register_subtree(
    watcher: &mut dyn Watcher,
    root: &Path,
    dir: &Path,
    filter: &dyn PathFilter,
) -> usize {
    let mut count = 0;
    for path in subdirectories(root, dir, filter) {
        match watcher.watch(&path, RecursiveMode::NonRecursive) {
            Ok(()) => count += 1,
            Err(err) => warn!(path = %path.display(), error = %err, "cannot watch directory"),
        }
    }
    count
}

/// Directories below `dir`, pruning excluded and filtered trees.
pub(crate) fn subdirectories(root: &Path, dir: &Path, filter: &dyn PathFilter) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| {
            !entry.file_type().is_dir()
                || !(is_excluded(root, entry.path()) || filter.should_ignore(entry.path(), true))
        })
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(error = %err, "skipping unreadable directory");
                None
            }
        })
        .filter(|entry| entry.file_type().is_dir())
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Whether `event` should trigger a refresh.
pub(crate) fn is_relevant(root: &Path, filter: &dyn PathFilter, event: &Event) -> bool {
    let kind_matters = matches!(
        event.kind,
        EventKind::Create(_)
            | EventKind::Remove(_)
            | EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Name(_) | ModifyKind::Any)
    );
    kind_matters
        && event.paths.iter().any(|path| {
            !is_excluded(root, path)
                && !is_lock_file(path)
                && !filter.should_ignore(path, path.is_dir())
        })
}

/// Whether `path` lies in one of the [`EXCLUDED_DIRS`] trees of `root`.
pub(crate) fn is_excluded(root: &Path, path: &Path) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.components().any(|component| match component {
        Component::Normal(name) => EXCLUDED_DIRS.iter().any(|dir| name == *dir),
        _ => false,
    })
}

fn is_lock_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(LOCK_SUFFIX))
}

/// Puts a signal in the one-slot channel unless one is already pending.
/// Returns whether a new signal was queued.
pub(crate) fn offer(changes_tx: &Sender<()>) -> bool {
    match changes_tx.try_send(()) {
        Ok(()) => true,
        Err(TrySendError::Full(())) | Err(TrySendError::Disconnected(())) => false,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use notify::event::{AccessKind, CreateKind, DataChange, MetadataKind};

    use super::*;

    fn event(kind: EventKind, path: &Path) -> Event {
        Event::new(kind).add_path(path.to_owned())
    }

    struct IgnoreTarget;

    impl PathFilter for IgnoreTarget {
        fn should_ignore(&self, path: &Path, _is_dir: bool) -> bool {
            path.components().any(|c| c.as_os_str() == "target")
        }
    }

    #[test]
    fn storage_directories_are_excluded() {
        let root = Path::new("/work/repo");
        assert!(is_excluded(root, Path::new("/work/repo/.jj/repo/op_heads")));
        assert!(is_excluded(root, Path::new("/work/repo/.git")));
        assert!(is_excluded(root, Path::new("/work/repo/sub/.git/index")));
        assert!(!is_excluded(root, Path::new("/work/repo/src/main.rs")));
        assert!(!is_excluded(root, Path::new("/work/repo/.github/ci.yml")));
    }

    #[test]
    fn only_content_changes_are_relevant() {
        let root = Path::new("/work/repo");
        let file = Path::new("/work/repo/src/lib.rs");
        let data = EventKind::Modify(ModifyKind::Data(DataChange::Content));

        assert!(is_relevant(root, &NoFilter, &event(data, file)));
        assert!(is_relevant(root, &NoFilter, &event(EventKind::Create(CreateKind::File), file)));
        assert!(!is_relevant(root, &NoFilter, &event(EventKind::Access(AccessKind::Any), file)));
        assert!(!is_relevant(
            root,
            &NoFilter,
            &event(EventKind::Modify(ModifyKind::Metadata(MetadataKind::Any)), file)
        ));
        assert!(!is_relevant(root, &NoFilter, &event(data, Path::new("/work/repo/.git/index.lock"))));
        assert!(!is_relevant(root, &NoFilter, &event(data, Path::new("/work/repo/Cargo.lock.lock"))));
        assert!(is_relevant(root, &NoFilter, &event(data, Path::new("/work/repo/Cargo.lock"))));
        assert!(!is_relevant(
            root,
            &IgnoreTarget,
            &event(data, Path::new("/work/repo/target/debug/x"))
        ));
    }

    #[test]
    fn one_slot_channel_keeps_a_single_pending_signal() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        assert!(offer(&tx));
        assert!(!offer(&tx));
        assert!(!offer(&tx));
        assert_eq!(rx.try_iter().count(), 1);
        assert!(offer(&tx));
        drop(rx);
        assert!(!offer(&tx));
    }

    #[test]
    fn walk_skips_storage_and_filtered_trees() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        for sub in ["src/ui", ".jj/repo/store", ".git/objects", "target/debug", "docs"] {
            std::fs::create_dir_all(root.join(sub)).expect("mkdir");
        }

        let mut found = subdirectories(root, root, &IgnoreTarget);
        found.sort();
        let expected: Vec<PathBuf> =
            ["docs", "src", "src/ui"].iter().map(|p| root.join(p)).collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn debouncer_collapses_a_burst_into_one_event() {
        let (changes_tx, changes_rx) = crossbeam_channel::bounded(1);
        let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel();
        let handle = spawn_debouncer(changes_rx, event_tx, Duration::from_millis(50))
            .expect("spawn debouncer");

        for _ in 0..20 {
            offer(&changes_tx);
        }
        drop(changes_tx);
        handle.join().expect("debouncer exits when the channel closes");

        assert!(matches!(event_rx.try_recv(), Ok(AppEvent::FileChanged)));
        assert!(event_rx.try_recv().is_err());
    }

    /// Waits up to `timeout` for one change signal.
    fn signalled(changes: &Receiver<()>, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if changes.recv_timeout(Duration::from_millis(50)).is_ok() {
                return true;
            }
        }
        false
    }

    /// Drains signals until none has arrived for a while.
    fn settle(changes: &Receiver<()>) {
        while changes.recv_timeout(Duration::from_millis(300)).is_ok() {}
    }

    #[test]
    fn directories_created_after_start_are_watched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path().canonicalize().expect("canonical root");

        let handle = start(&root, Arc::new(NoFilter)).expect("watcher starts");
        let changes = handle.changes();
        std::fs::create_dir(root.join("fresh")).expect("mkdir");
        assert!(signalled(&changes, Duration::from_secs(5)), "directory creation not reported");
        settle(&changes);

        std::fs::write(root.join("fresh/a.rs"), "fn a() {}\n").expect("write");
        assert!(
            signalled(&changes, Duration::from_secs(5)),
            "no change reported for a write in a new directory"
        );
        handle.close();
    }

    #[test]
    fn lock_file_writes_send_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path().canonicalize().expect("canonical root");

        let handle = start(&root, Arc::new(NoFilter)).expect("watcher starts");
        let changes = handle.changes();
        settle(&changes);

        std::fs::write(root.join("index.lock"), "locked").expect("write lock");
        assert!(!signalled(&changes, Duration::from_millis(500)), "lock file write was reported");

        std::fs::write(root.join("README.md"), "hello").expect("write");
        assert!(signalled(&changes, Duration::from_secs(5)), "ordinary write not reported");
        handle.close();
    }

    #[test]
    fn writes_in_the_workspace_are_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path().canonicalize().expect("canonical root");
        std::fs::create_dir_all(root.join("src")).expect("mkdir");

        let handle = start(&root, Arc::new(NoFilter)).expect("watcher starts");
        let changes = handle.changes();
        std::fs::write(root.join("src/new.rs"), "fn main() {}\n").expect("write");

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut seen = false;
        while Instant::now() < deadline && !seen {
            seen = changes.recv_timeout(Duration::from_millis(100)).is_ok();
        }
        assert!(seen, "no change reported for a write under src/");

        handle.close();
        changes.try_iter().for_each(drop);
        assert!(changes.recv().is_err(), "channel stays open after close");
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = start(&dir.path().join("gone"), Arc::new(NoFilter)).err();
        assert!(matches!(err, Some(WatchError::Root { .. })));
    }
}
