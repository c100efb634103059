//! Library-level tests of the stash state machine.
//!
//! These drive a [`Workspace`] directly, the way the command handlers do,
//! and check the cross-component guarantees end to end.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use stasher::core::errors::StashError;
use stasher::core::paths::StasherPaths;
use stasher::core::registry::{RemoveOutcome, RemoveTarget};
use stasher::core::tracked::TrackOutcome;
use stasher::core::types::ConflictPolicy;
use stasher::engine::{CopyOptions, Workspace};

// =============================================================================
// Test Fixtures
// =============================================================================

struct TestHome {
    dir: TempDir,
    ws: Workspace,
}

impl TestHome {
    fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let paths = StasherPaths::new(dir.path().join("data"));
        paths.ensure_dirs().expect("create storage");
        let ws = Workspace::with_options(paths, CopyOptions::default());
        Self { dir, ws }
    }

    /// Create `home/.config/<name>` containing one file.
    fn config_dir(&self, name: &str, file: &str, contents: &str) -> PathBuf {
        let dir = self.dir.path().join("home/.config").join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file), contents).unwrap();
        dir
    }

    fn activate_new(&self, name: &str) {
        self.ws.store.create(name).expect("create");
        self.ws.active.activate(name).expect("activate");
    }

    fn tracked_count(&self) -> usize {
        self.ws.tracked.list_tracked().unwrap().count()
    }
}

// =============================================================================
// Stash lifecycle
// =============================================================================

#[test]
fn create_then_resolve_has_empty_metadata() {
    let home = TestHome::new();
    for name in ["my-theme_1", "dark", ".hidden"] {
        home.ws.store.create(name).unwrap();
        let record = home.ws.store.resolve(name).unwrap();
        assert!(record.directory.is_dir());
        assert!(record.tracked().unwrap().is_empty());
    }
}

#[test]
fn second_create_fails_without_changing_state() {
    let home = TestHome::new();
    home.ws.store.create("x").unwrap();
    let before: Vec<String> = home.ws.store.list().unwrap().collect();

    let err = home.ws.store.create("x").unwrap_err();

    assert!(matches!(err, StashError::AlreadyExists(_)));
    let after: Vec<String> = home.ws.store.list().unwrap().collect();
    assert_eq!(before, after);
}

#[test]
fn name_validation_is_shared() {
    let home = TestHome::new();
    for name in ["", "a/b", "..."] {
        assert!(matches!(
            home.ws.store.create(name),
            Err(StashError::InvalidName { .. })
        ));
    }
    assert!(home.ws.store.create("my-theme_1").is_ok());
}

#[test]
fn deleting_active_clears_pointer_but_not_others() {
    let home = TestHome::new();
    home.ws.store.create("a").unwrap();
    home.ws.store.create("b").unwrap();

    home.ws.active.activate("a").unwrap();
    home.ws.store.delete("b", &home.ws.active).unwrap();
    assert_eq!(home.ws.active.get_active().unwrap().as_deref(), Some("a"));

    home.ws.store.delete("a", &home.ws.active).unwrap();
    assert_eq!(home.ws.active.get_active().unwrap(), None);
}

#[test]
fn activate_missing_keeps_previous_pointer() {
    let home = TestHome::new();
    assert!(home.ws.active.activate("missing").unwrap_err().is_not_found());
    assert_eq!(home.ws.active.get_active().unwrap(), None);

    home.activate_new("dark");
    assert!(home.ws.active.activate("missing").is_err());
    assert_eq!(home.ws.active.get_active().unwrap().as_deref(), Some("dark"));
}

#[test]
fn crafted_names_never_resolve() {
    let home = TestHome::new();
    home.ws.store.create("dark").unwrap();
    for name in ["../../etc", "..", "../stashes/dark"] {
        assert!(home.ws.store.resolve(name).is_err(), "{} resolved", name);
        assert!(home.ws.active.activate(name).is_err());
    }
}

// =============================================================================
// Tracking
// =============================================================================

#[test]
fn tracking_twice_is_a_reported_no_op() {
    let home = TestHome::new();
    home.activate_new("dark");
    let waybar = home.config_dir("waybar", "config", "");

    home.ws.tracked.track(&waybar).unwrap();
    let second = home.ws.tracked.track(&waybar).unwrap();

    assert!(matches!(second, TrackOutcome::AlreadyTracked(_)));
    assert_eq!(home.tracked_count(), 1);
}

#[test]
fn track_untrack_round_trip() {
    let home = TestHome::new();
    home.activate_new("dark");
    let before = home.tracked_count();
    let waybar = home.config_dir("waybar", "config", "");

    home.ws.tracked.track(&waybar).unwrap();
    home.ws.tracked.untrack(waybar.to_str().unwrap()).unwrap();

    assert_eq!(home.tracked_count(), before);
    let record = home.ws.active.active_record().unwrap();
    assert!(record.tracked().unwrap().is_empty());
}

// =============================================================================
// Snapshots
// =============================================================================

#[test]
fn push_is_idempotent() {
    let home = TestHome::new();
    home.activate_new("dark");
    let waybar = home.config_dir("waybar", "config", "bar");
    fs::create_dir_all(waybar.join("scripts")).unwrap();
    fs::write(waybar.join("scripts/clock.sh"), "date").unwrap();
    home.ws.tracked.track(&waybar).unwrap();

    let engine = home.ws.snapshot();
    engine.push().unwrap().into_result().unwrap();
    let record = home.ws.active.active_record().unwrap();
    let first = fs::read(record.directory.join("waybar/scripts/clock.sh")).unwrap();
    let first_meta = fs::read(record.metadata_path()).unwrap();

    engine.push().unwrap().into_result().unwrap();

    assert_eq!(
        fs::read(record.directory.join("waybar/scripts/clock.sh")).unwrap(),
        first
    );
    assert_eq!(fs::read(record.metadata_path()).unwrap(), first_meta);
    let entries: Vec<String> = fs::read_dir(&record.directory)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries.len(), 2, "unexpected entries {:?}", entries);
}

#[test]
fn seeding_scenario() {
    let home = TestHome::new();
    let engine = home.ws.snapshot();

    assert!(matches!(
        engine.create_seeded("x"),
        Err(StashError::NoTrackablePaths)
    ));

    let foo = home.config_dir("foo", "foo.conf", "value = 1");
    let entry = home.ws.registry.add(&foo).unwrap();
    assert_eq!(entry.key, "foo");

    let record = engine.create_seeded("x").unwrap();
    assert_eq!(
        fs::read_to_string(record.directory.join("foo/foo.conf")).unwrap(),
        "value = 1"
    );
}

#[test]
fn apply_restores_switched_theme() {
    let home = TestHome::new();
    let waybar = home.config_dir("waybar", "style.css", "dark");
    let engine = home.ws.snapshot();

    home.activate_new("dark");
    home.ws.tracked.track(&waybar).unwrap();
    engine.push().unwrap();

    fs::write(waybar.join("style.css"), "light").unwrap();
    home.activate_new("light");
    home.ws.tracked.track(&waybar).unwrap();
    engine.push().unwrap();

    engine.apply("dark", ConflictPolicy::Overwrite).unwrap();
    assert_eq!(fs::read_to_string(waybar.join("style.css")).unwrap(), "dark");

    engine.apply("light", ConflictPolicy::Overwrite).unwrap();
    assert_eq!(fs::read_to_string(waybar.join("style.css")).unwrap(), "light");
}

// =============================================================================
// Registry
// =============================================================================

#[test]
fn registry_bulk_remove_honours_confirmation() {
    let home = TestHome::new();
    home.ws
        .registry
        .add(&home.config_dir("waybar", "config", ""))
        .unwrap();

    let declined = home
        .ws
        .registry
        .remove(&RemoveTarget::parse("*"), |_| Ok(false))
        .unwrap();
    assert_eq!(declined, RemoveOutcome::Cancelled);
    assert!(!home.ws.registry.is_empty().unwrap());

    home.ws
        .registry
        .remove(&RemoveTarget::parse("*"), |_| Ok(true))
        .unwrap();
    assert!(home.ws.registry.is_empty().unwrap());
}

#[test]
fn corrupt_registry_reads_empty_until_next_write() {
    let home = TestHome::new();
    let file = home.ws.paths.registry_path();
    fs::write(&file, "{ not json").unwrap();

    assert!(home.ws.registry.is_empty().unwrap());
    assert_eq!(fs::read_to_string(&file).unwrap(), "{ not json");

    home.ws
        .registry
        .add(&home.config_dir("hypr", "hyprland.conf", ""))
        .unwrap();
    let keys: Vec<String> = home.ws.registry.list().unwrap().map(|e| e.key).collect();
    assert_eq!(keys, vec!["hypr"]);
}
