use dupsweep::actions::{DeleteConfig, DeleteError, SelectionError};
use dupsweep::duplicates::SortOrder;
use dupsweep::scanner::WalkerConfig;
use dupsweep::session::{ScanSession, SessionConfig, SessionError};
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

/// Three copies of a 4-byte file and two copies of a 9-byte file.
fn duplicate_tree() -> TempDir {
    let dir = tempdir().unwrap();
    for name in ["a1", "a2", "a3"] {
        fs::write(dir.path().join(name), b"aaaa").unwrap();
    }
    for name in ["b1", "b2"] {
        fs::write(dir.path().join(name), b"bbbbbbbbb").unwrap();
    }
    dir
}

fn grouped_session(root: &Path, delete: DeleteConfig) -> ScanSession {
    let mut session = ScanSession::new(
        SessionConfig::new(root)
            .with_walker(WalkerConfig::default())
            .with_sort_order(SortOrder::Descending)
            .with_delete(delete),
    );
    session.scan().unwrap();
    session.group().unwrap();
    session
}

fn remaining(root: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(root)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_freed_total_is_sum_of_selected_sizes() {
    let dir = duplicate_tree();
    let session = grouped_session(dir.path(), DeleteConfig::default());

    // Descending: 1=b1 2=b2 3=a1 4=a2 5=a3
    let report = session.select_and_delete("2 4 5").unwrap();

    assert_eq!(report.bytes_freed, 9 + 4 + 4);
    assert_eq!(report.success_count(), 3);
    assert_eq!(remaining(dir.path()), vec!["a1", "b1"]);
}

#[test]
fn test_invalid_selections_delete_nothing() {
    let dir = duplicate_tree();
    let session = grouped_session(dir.path(), DeleteConfig::default());

    for input in ["", "1 x", "-2", "3 3", "6", "0", "1 2 99"] {
        let err = session.select_and_delete(input).unwrap_err();
        assert!(
            matches!(err, SessionError::Selection(_)),
            "{input:?} gave {err:?}"
        );
    }
    assert_eq!(remaining(dir.path()).len(), 5);
}

#[test]
fn test_selection_error_variants() {
    let dir = duplicate_tree();
    let session = grouped_session(dir.path(), DeleteConfig::default());

    let selection_err = |input: &str| match session.select_and_delete(input) {
        Err(SessionError::Selection(e)) => e,
        other => panic!("expected selection error, got {other:?}"),
    };

    assert_eq!(selection_err("  "), SelectionError::Empty);
    assert_eq!(
        selection_err("1 one"),
        SelectionError::NotANumber("one".to_string())
    );
    assert_eq!(selection_err("2 2"), SelectionError::DuplicateNumber("2".to_string()));
    assert_eq!(
        selection_err("6"),
        SelectionError::OutOfRange {
            number: "6".to_string(),
            max: 5
        }
    );
}

#[test]
fn test_vanished_file_aborts_by_default() {
    let dir = duplicate_tree();
    let session = grouped_session(dir.path(), DeleteConfig::default());
    fs::remove_file(dir.path().join("a1")).unwrap();

    let err = session.select_and_delete("1 3 4").unwrap_err();

    assert!(matches!(err, SessionError::Delete(DeleteError::NotFound(_))));
    // b1 went before the failure, a2 was never reached
    assert!(!dir.path().join("b1").exists());
    assert!(dir.path().join("a2").exists());
}

#[test]
fn test_keep_going_reports_failures() {
    let dir = duplicate_tree();
    let config = DeleteConfig::default().with_continue_on_error(true);
    let session = grouped_session(dir.path(), config);
    fs::remove_file(dir.path().join("a1")).unwrap();

    let report = session.select_and_delete("1 3 4").unwrap();

    assert_eq!(report.success_count(), 2);
    assert_eq!(report.failure_count(), 1);
    assert_eq!(report.failures[0].0, 3);
    assert_eq!(report.bytes_freed, 9 + 4);
    assert!(!dir.path().join("a2").exists());
}
