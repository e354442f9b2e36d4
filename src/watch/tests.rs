use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tempfile::TempDir;

use super::debouncer::{Debouncer, PRUNE_THRESHOLD};
use super::filter::EventFilter;
use super::{ChangeWatcher, WatchOptions};

fn window() -> Duration {
    Duration::from_millis(100)
}

fn make_event(paths: Vec<&str>, kind: notify::EventKind) -> notify::Event {
    notify::Event {
        kind,
        paths: paths.into_iter().map(PathBuf::from).collect(),
        attrs: Default::default(),
    }
}

fn modify_kind() -> notify::EventKind {
    notify::EventKind::Modify(notify::event::ModifyKind::Data(
        notify::event::DataChange::Any,
    ))
}

fn metadata_kind() -> notify::EventKind {
    notify::EventKind::Modify(notify::event::ModifyKind::Metadata(
        notify::event::MetadataKind::WriteTime,
    ))
}

fn create_kind() -> notify::EventKind {
    notify::EventKind::Create(notify::event::CreateKind::File)
}

fn remove_kind() -> notify::EventKind {
    notify::EventKind::Remove(notify::event::RemoveKind::File)
}

fn py_filter() -> EventFilter {
    EventFilter::new(&["py".to_string()])
}

// ----------------------------------------------------------------------------
// Debouncer
// ----------------------------------------------------------------------------

#[test]
fn test_burst_collapses_to_one() {
    let mut debouncer = Debouncer::new(window());
    let path = Path::new("/tmp/mod/a.py");
    let t0 = Instant::now();

    let accepted = (0..10u64)
        .filter(|&i| debouncer.accept(path, t0 + Duration::from_millis(i * 5)))
        .count();
    assert_eq!(accepted, 1);
}

#[test]
fn test_spaced_writes_each_accepted() {
    let mut debouncer = Debouncer::new(window());
    let path = Path::new("/tmp/mod/a.py");
    let t0 = Instant::now();

    assert!(debouncer.accept(path, t0));
    assert!(debouncer.accept(path, t0 + Duration::from_millis(100)));
    assert!(debouncer.accept(path, t0 + Duration::from_millis(250)));
}

#[test]
fn test_window_measured_from_last_accepted() {
    let mut debouncer = Debouncer::new(window());
    let path = Path::new("/tmp/mod/a.py");
    let t0 = Instant::now();

    assert!(debouncer.accept(path, t0));
    assert!(!debouncer.accept(path, t0 + Duration::from_millis(60)));
    // 120ms after the accepted event, even though only 60ms after the last one
    assert!(debouncer.accept(path, t0 + Duration::from_millis(120)));
}

#[test]
fn test_paths_are_independent() {
    let mut debouncer = Debouncer::new(window());
    let t0 = Instant::now();

    assert!(debouncer.accept(Path::new("/tmp/a.py"), t0));
    assert!(debouncer.accept(Path::new("/tmp/b.py"), t0));
    assert!(!debouncer.accept(Path::new("/tmp/a.py"), t0 + Duration::from_millis(1)));
}

#[test]
fn test_prune_keeps_map_bounded() {
    let mut debouncer = Debouncer::new(window());
    let t0 = Instant::now();

    for i in 0..PRUNE_THRESHOLD {
        debouncer.accept(&PathBuf::from(format!("/tmp/{i}.py")), t0);
    }
    assert_eq!(debouncer.last_accepted.len(), PRUNE_THRESHOLD);

    // All earlier entries are stale by now and get pruned on the next insert
    let later = t0 + Duration::from_secs(1);
    assert!(debouncer.accept(Path::new("/tmp/new.py"), later));
    assert_eq!(debouncer.last_accepted.len(), 1);
}

#[test]
fn test_prune_keeps_recent_entries() {
    let mut debouncer = Debouncer::new(window());
    let t0 = Instant::now();

    debouncer.accept(Path::new("/tmp/recent.py"), t0);
    debouncer.prune(t0 + Duration::from_millis(10));
    assert!(!debouncer.accept(Path::new("/tmp/recent.py"), t0 + Duration::from_millis(20)));
}

// ----------------------------------------------------------------------------
// EventFilter
// ----------------------------------------------------------------------------

#[test]
fn test_filter_accepts_modify_and_create() {
    let filter = py_filter();

    let event = make_event(vec!["/tmp/a.py"], modify_kind());
    assert_eq!(filter.written_paths(&event).count(), 1);

    let event = make_event(vec!["/tmp/a.py"], create_kind());
    assert_eq!(filter.written_paths(&event).count(), 1);
}

#[test]
fn test_filter_rejects_metadata_and_remove() {
    let filter = py_filter();

    let event = make_event(vec!["/tmp/a.py"], metadata_kind());
    assert_eq!(filter.written_paths(&event).count(), 0);

    let event = make_event(vec!["/tmp/a.py"], remove_kind());
    assert_eq!(filter.written_paths(&event).count(), 0);
}

#[test]
fn test_filter_extension() {
    let filter = py_filter();
    let event = make_event(
        vec!["/tmp/a.py", "/tmp/b.json", "/tmp/C.PY", "/tmp/noext"],
        modify_kind(),
    );
    let paths: Vec<_> = filter.written_paths(&event).cloned().collect();
    assert_eq!(paths, vec![PathBuf::from("/tmp/a.py"), PathBuf::from("/tmp/C.PY")]);
}

#[test]
fn test_filter_empty_extensions_accepts_all() {
    let filter = EventFilter::new(&[]);
    let event = make_event(vec!["/tmp/a.json", "/tmp/noext"], modify_kind());
    assert_eq!(filter.written_paths(&event).count(), 2);
}

#[test]
fn test_filter_ignores_editor_artifacts() {
    let filter = EventFilter::new(&[]);
    let event = make_event(
        vec!["/tmp/.a.py.swp", "/tmp/a.py~", "/tmp/a.tmp", "/tmp/.hidden"],
        modify_kind(),
    );
    assert_eq!(filter.written_paths(&event).count(), 0);
}

// ----------------------------------------------------------------------------
// ChangeWatcher (real filesystem)
// ----------------------------------------------------------------------------

fn collecting() -> (Arc<Mutex<Vec<PathBuf>>>, impl Fn(&Path) -> anyhow::Result<()> + Send + 'static) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    (seen, move |path: &Path| {
        sink.lock().push(path.to_path_buf());
        Ok(())
    })
}

fn wait_for<F: Fn() -> bool>(cond: F, timeout: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    cond()
}

#[test]
fn test_no_watchable_dirs() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("file.txt");
    std::fs::write(&file, "x").unwrap();

    let (_, on_change) = collecting();
    let dirs = vec![temp.path().join("missing"), file];
    let watcher = ChangeWatcher::spawn(&dirs, WatchOptions::default(), on_change).unwrap();
    assert!(watcher.is_none());
}

#[test]
fn test_missing_dir_skipped_others_watched() {
    let temp = TempDir::new().unwrap();
    let dirs = vec![temp.path().join("missing"), temp.path().to_path_buf()];

    let (_, on_change) = collecting();
    let mut watcher = ChangeWatcher::spawn(&dirs, WatchOptions::default(), on_change)
        .unwrap()
        .expect("one directory is watchable");
    assert_eq!(watcher.roots().len(), 1);
    watcher.stop();
}

#[test]
fn test_write_reported_once_per_burst() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("pkg").join("mod");
    std::fs::create_dir_all(&dir).unwrap();
    let file = dir.join("a.py");
    std::fs::write(&file, "x = 0\n").unwrap();

    let (seen, on_change) = collecting();
    let options = WatchOptions {
        debounce: Duration::from_millis(500),
        extensions: vec!["py".into()],
    };
    let mut watcher = ChangeWatcher::spawn(&[temp.path().to_path_buf()], options, on_change)
        .unwrap()
        .unwrap();

    std::fs::write(&file, "x = 1\n").unwrap();
    std::fs::write(&file, "x = 2\n").unwrap();

    assert!(wait_for(|| !seen.lock().is_empty(), Duration::from_secs(5)));
    std::thread::sleep(Duration::from_millis(200));
    watcher.stop();

    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].ends_with("pkg/mod/a.py"));
}

#[test]
fn test_no_callbacks_after_stop() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("a.py");

    let (seen, on_change) = collecting();
    let mut watcher = ChangeWatcher::spawn(
        &[temp.path().to_path_buf()],
        WatchOptions::default(),
        on_change,
    )
    .unwrap()
    .unwrap();

    watcher.stop();
    watcher.stop();
    std::fs::write(&file, "late\n").unwrap();
    std::thread::sleep(Duration::from_millis(200));
    assert!(seen.lock().is_empty());
}

#[test]
fn test_failing_callback_keeps_loop_alive() {
    let temp = TempDir::new().unwrap();
    let calls = Arc::new(Mutex::new(0usize));
    let counter = Arc::clone(&calls);

    let mut watcher = ChangeWatcher::spawn(
        &[temp.path().to_path_buf()],
        WatchOptions::default(),
        move |_: &Path| {
            *counter.lock() += 1;
            anyhow::bail!("callback failure")
        },
    )
    .unwrap()
    .unwrap();

    std::fs::write(temp.path().join("a.py"), "1").unwrap();
    assert!(wait_for(|| *calls.lock() >= 1, Duration::from_secs(5)));
    std::fs::write(temp.path().join("b.py"), "2").unwrap();
    assert!(wait_for(|| *calls.lock() >= 2, Duration::from_secs(5)));
    watcher.stop();
}
