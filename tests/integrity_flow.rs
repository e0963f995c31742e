// End-to-end generate/verify flows through the library API.

use std::fs;
use std::path::Path;

use tempfile::tempdir;

use intact::reconcile::{reconcile, Outcome, Report};
use intact::scanner::scan;
use intact::Manifest;

fn snapshot(root: &Path, manifest_path: &Path) -> Manifest {
    let outcome = scan(root, &[], &[manifest_path.to_path_buf()]).unwrap();
    assert!(outcome.skipped.is_empty());
    outcome.manifest.save(manifest_path).unwrap();
    Manifest::load(manifest_path).unwrap()
}

fn rescan(root: &Path, manifest_path: &Path) -> Manifest {
    scan(root, &[], &[manifest_path.to_path_buf()])
        .unwrap()
        .manifest
}

fn lines(report: &Report) -> Vec<String> {
    report.outcomes().iter().map(ToString::to_string).collect()
}

#[test]
fn rename_delete_add_cycle() {
    let tree = tempdir().unwrap();
    let state = tempdir().unwrap();
    let manifest_path = state.path().join("hash_table.json");

    fs::write(tree.path().join("a.txt"), "hello").unwrap();
    fs::write(tree.path().join("b.txt"), "world").unwrap();

    let stored = snapshot(tree.path(), &manifest_path);
    assert_eq!(stored.len(), 2);

    // a.txt keeps its content under a new name, b.txt disappears and
    // d.txt shows up.
    fs::rename(tree.path().join("a.txt"), tree.path().join("c.txt")).unwrap();
    fs::remove_file(tree.path().join("b.txt")).unwrap();
    fs::write(tree.path().join("d.txt"), "new").unwrap();

    let report = reconcile(&stored, &rescan(tree.path(), &manifest_path));
    assert_eq!(
        report.outcomes(),
        [
            Outcome::Renamed {
                from: "a.txt".into(),
                to: "c.txt".into(),
            },
            Outcome::Deleted("b.txt".into()),
            Outcome::Added("d.txt".into()),
        ]
    );
    assert!(lines(&report).iter().all(|l| !l.contains("hash is invalid")));
}

#[test]
fn content_modification_is_the_only_invalid_line() {
    let tree = tempdir().unwrap();
    let state = tempdir().unwrap();
    let manifest_path = state.path().join("hash_table.json");

    fs::write(tree.path().join("a.txt"), "hello").unwrap();
    fs::write(tree.path().join("b.txt"), "world").unwrap();

    let stored = snapshot(tree.path(), &manifest_path);

    fs::write(tree.path().join("a.txt"), "hello, changed").unwrap();

    let report = reconcile(&stored, &rescan(tree.path(), &manifest_path));
    let all = lines(&report);
    let invalid: Vec<_> = all.iter().filter(|l| l.contains("hash is invalid")).collect();
    assert_eq!(invalid, ["a.txt hash is invalid."]);
    assert!(all.contains(&"b.txt hash is valid.".to_string()));
    assert_eq!(report.counters().modified, 1);
    assert_eq!(report.counters().unchanged, 1);
}

#[test]
fn untouched_tree_verifies_clean() {
    let tree = tempdir().unwrap();
    let state = tempdir().unwrap();
    let manifest_path = state.path().join("hash_table.json");

    fs::create_dir(tree.path().join("sub")).unwrap();
    fs::write(tree.path().join("a.txt"), "hello").unwrap();
    fs::write(tree.path().join("sub").join("b.txt"), "world").unwrap();

    let stored = snapshot(tree.path(), &manifest_path);
    let report = reconcile(&stored, &rescan(tree.path(), &manifest_path));

    let counters = report.counters();
    assert_eq!(counters.unchanged, 2);
    assert_eq!(
        counters.modified + counters.added + counters.deleted + counters.renamed,
        0
    );
}

#[test]
fn move_into_a_subdirectory_is_a_rename() {
    let tree = tempdir().unwrap();
    let state = tempdir().unwrap();
    let manifest_path = state.path().join("hash_table.json");

    fs::write(tree.path().join("a.txt"), "hello").unwrap();
    let stored = snapshot(tree.path(), &manifest_path);

    fs::create_dir(tree.path().join("nested")).unwrap();
    fs::rename(
        tree.path().join("a.txt"),
        tree.path().join("nested").join("a.txt"),
    )
    .unwrap();

    let report = reconcile(&stored, &rescan(tree.path(), &manifest_path));
    assert_eq!(
        report.outcomes(),
        [Outcome::Renamed {
            from: "a.txt".into(),
            to: "nested/a.txt".into(),
        }]
    );
    // Basenames are equal here, so the rename line names the same file
    // twice.
    assert_eq!(
        lines(&report),
        ["File name change detected, a.txt has been renamed to a.txt."]
    );
}

#[test]
fn manifest_stored_inside_the_tree_never_reports_itself() {
    let tree = tempdir().unwrap();
    let manifest_path = tree.path().join("hash_table.json");

    fs::write(tree.path().join("a.txt"), "hello").unwrap();

    let stored = snapshot(tree.path(), &manifest_path);
    assert_eq!(stored.len(), 1);

    let report = reconcile(&stored, &rescan(tree.path(), &manifest_path));
    assert_eq!(report.outcomes(), [Outcome::Unchanged("a.txt".into())]);
}

#[test]
fn verify_against_a_vanished_tree_reports_everything_deleted() {
    let tree = tempdir().unwrap();
    let state = tempdir().unwrap();
    let manifest_path = state.path().join("hash_table.json");

    fs::write(tree.path().join("a.txt"), "hello").unwrap();
    let stored = snapshot(tree.path(), &manifest_path);

    // The scan root is gone; reconciling against an empty manifest is the
    // documented fallback.
    let report = reconcile(&stored, &Manifest::default());
    assert_eq!(report.outcomes(), [Outcome::Deleted("a.txt".into())]);
}

#[test]
fn persisted_manifest_round_trips_through_the_store() {
    let tree = tempdir().unwrap();
    let state = tempdir().unwrap();
    let manifest_path = state.path().join("hash_table.json");

    fs::write(tree.path().join("x.bin"), [0u8, 159, 146, 150]).unwrap();
    fs::write(tree.path().join("y.txt"), "text").unwrap();

    let scanned = scan(tree.path(), &[], &[]).unwrap().manifest;
    scanned.save(&manifest_path).unwrap();
    let loaded = Manifest::load(&manifest_path).unwrap();

    assert_eq!(loaded, scanned);
    let order: Vec<_> = loaded.records().iter().map(|r| r.filepath.as_str()).collect();
    assert_eq!(order, ["x.bin", "y.txt"]);
}
