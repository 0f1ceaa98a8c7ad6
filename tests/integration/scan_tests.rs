use dupsweep::duplicates::{group_by_hash, group_by_size, HashConfig, SortOrder};
use dupsweep::scanner::{Hasher, Walker, WalkerConfig};
use dupsweep::session::{ScanSession, SessionConfig};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn write(path: &Path, content: &[u8]) {
    File::create(path).unwrap().write_all(content).unwrap();
}

fn session(root: &Path, extension: Option<&str>, order: SortOrder) -> ScanSession {
    let walker = WalkerConfig::default().with_extension(extension.map(str::to_string));
    ScanSession::new(
        SessionConfig::new(root)
            .with_walker(walker)
            .with_sort_order(order),
    )
}

fn catalog_names(session: &ScanSession) -> Vec<String> {
    session
        .catalog()
        .unwrap()
        .entries()
        .iter()
        .map(|e| e.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let mut session = session(dir.path(), None, SortOrder::Descending);

    assert!(session.scan().unwrap().is_empty());
    assert!(session.group().unwrap().is_empty());
    assert_eq!(session.grouping_stats().unwrap().total_files, 0);
}

#[test]
fn test_reference_scenario() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"X");
    write(&dir.path().join("b.txt"), b"X");
    write(&dir.path().join("c.txt"), b"Y");
    write(&dir.path().join("d.txt"), b"much larger");

    let mut session = session(dir.path(), Some(".txt"), SortOrder::Ascending);
    session.scan().unwrap();
    session.group().unwrap();

    assert_eq!(catalog_names(&session), vec!["a.txt", "b.txt"]);

    assert!(session.select_and_delete("1 3").is_err());
    assert!(session.select_and_delete("1 1").is_err());
    assert!(dir.path().join("a.txt").exists());

    let report = session.select_and_delete("1").unwrap();
    assert_eq!(report.bytes_freed, 1);
    assert!(!dir.path().join("a.txt").exists());
    assert!(dir.path().join("b.txt").exists());
}

#[test]
fn test_scan_nested_directories() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("subdir");
    fs::create_dir(&sub).unwrap();
    write(&dir.path().join("a.txt"), b"dup");
    write(&sub.join("b.txt"), b"dup");

    let mut session = session(dir.path(), None, SortOrder::Descending);
    session.scan().unwrap();
    let catalog = session.group().unwrap();

    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.path(1), Some(dir.path().join("a.txt").as_path()));
    assert_eq!(catalog.path(2), Some(sub.join("b.txt").as_path()));
}

#[test]
fn test_sort_order_applies_to_catalog() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("small1"), b"ab");
    write(&dir.path().join("small2"), b"ab");
    write(&dir.path().join("big1"), b"abcdef");
    write(&dir.path().join("big2"), b"abcdef");

    let mut descending = session(dir.path(), None, SortOrder::Descending);
    descending.scan().unwrap();
    descending.group().unwrap();
    assert_eq!(
        catalog_names(&descending),
        vec!["big1", "big2", "small1", "small2"]
    );

    let mut ascending = session(dir.path(), None, SortOrder::Ascending);
    ascending.scan().unwrap();
    ascending.group().unwrap();
    assert_eq!(
        catalog_names(&ascending),
        vec!["small1", "small2", "big1", "big2"]
    );
}

#[test]
fn test_same_size_different_digests_split() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("1a"), b"aaaa");
    write(&dir.path().join("2b"), b"bbbb");
    write(&dir.path().join("3a"), b"aaaa");
    write(&dir.path().join("4b"), b"bbbb");
    write(&dir.path().join("5c"), b"cccc");

    let mut session = session(dir.path(), None, SortOrder::Descending);
    session.scan().unwrap();
    let catalog = session.group().unwrap();

    let sections: Vec<Vec<usize>> = catalog
        .sections()
        .map(|s| s.entries.iter().map(|e| e.number).collect())
        .collect();
    // Groups in first-arrival order, numbering continues across groups
    assert_eq!(sections, vec![vec![1, 2], vec![3, 4]]);
    assert_eq!(catalog_names(&session), vec!["1a", "3a", "2b", "4b"]);
}

#[test]
fn test_empty_files_are_grouped() {
    let dir = tempdir().unwrap();
    File::create(dir.path().join("empty1.txt")).unwrap();
    File::create(dir.path().join("empty2.txt")).unwrap();

    let mut session = session(dir.path(), None, SortOrder::Descending);
    session.scan().unwrap();
    let catalog = session.group().unwrap();

    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.entries()[0].size, 0);
}

#[test]
fn test_repeated_runs_identical() {
    let dir = tempdir().unwrap();
    for i in 0..5 {
        write(&dir.path().join(format!("copy{i}.bin")), b"same bytes");
        write(&dir.path().join(format!("other{i}.bin")), &[i as u8; 10]);
    }

    let run = || {
        let mut s = session(dir.path(), None, SortOrder::Ascending);
        s.scan().unwrap();
        s.group().unwrap().entries().to_vec()
    };

    assert_eq!(run(), run());
}

#[test]
fn test_unreadable_file_is_excluded() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.bin"), b"dup");
    write(&dir.path().join("b.bin"), b"dup");
    write(&dir.path().join("c.bin"), b"dup");

    let files = Walker::new(dir.path(), WalkerConfig::default())
        .collect()
        .unwrap();
    let (size_groups, _) = group_by_size(files);
    fs::remove_file(dir.path().join("b.bin")).unwrap();

    let (groups, stats) = group_by_hash(size_groups, &Hasher::new(), &HashConfig::default());

    assert_eq!(stats.failed_files, 1);
    assert_eq!(stats.errors[0].path(), dir.path().join("b.bin").as_path());
    assert_eq!(groups.file_count(), 2);
}

#[test]
fn test_extension_filter_is_case_sensitive() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"same");
    write(&dir.path().join("b.TXT"), b"same");
    write(&dir.path().join("c.txt"), b"same");

    let mut session = session(dir.path(), Some(".txt"), SortOrder::Descending);
    session.scan().unwrap();
    session.group().unwrap();

    assert_eq!(catalog_names(&session), vec!["a.txt", "c.txt"]);
}
