use dupsweep::duplicates::SortOrder;
use dupsweep::scanner::{Walker, WalkerConfig};
use dupsweep::session::{ScanSession, SessionConfig};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;
use unicode_normalization::UnicodeNormalization;

fn catalog_len(root: &Path) -> usize {
    let config = SessionConfig::new(root).with_sort_order(SortOrder::Ascending);
    let mut session = ScanSession::new(config);
    session.scan().unwrap();
    session.group().unwrap().len()
}

#[test]
fn test_paths_with_quotes() {
    let dir = tempdir().unwrap();

    // Windows does not allow double quotes in filenames.
    if cfg!(not(windows)) {
        let file_path = dir.path().join("file_with_\"quote\".txt");
        File::create(&file_path)
            .expect("Failed to create file with quotes")
            .write_all(b"content")
            .unwrap();
        fs::write(dir.path().join("duplicate.txt"), b"content").unwrap();

        assert_eq!(catalog_len(dir.path()), 2);
    }
}

#[test]
fn test_paths_with_spaces_and_newlines() {
    let dir = tempdir().unwrap();

    if cfg!(not(windows)) {
        fs::write(dir.path().join("with space.txt"), b"content").unwrap();
        fs::write(dir.path().join("with\nnewline.txt"), b"content").unwrap();

        let mut session = ScanSession::new(SessionConfig::new(dir.path()));
        session.scan().unwrap();
        let catalog = session.group().unwrap();

        assert_eq!(catalog.len(), 2);
        assert!(catalog
            .entries()
            .iter()
            .any(|e| e.path.to_string_lossy().contains('\n')));
    }
}

#[test]
fn test_extremely_long_paths() {
    let dir = tempdir().unwrap();

    let mut current_path = dir.path().to_path_buf();
    let folder_name = "a".repeat(50);
    for i in 0..6 {
        current_path = current_path.join(format!("{}_{}", i, folder_name));
        if let Err(e) = fs::create_dir(&current_path) {
            eprintln!("Skipping extremely long path test: failed to create dir: {}", e);
            return;
        }
    }

    if let Err(e) = fs::write(current_path.join("file.txt"), b"content") {
        eprintln!("Skipping extremely long path test: failed to create file: {}", e);
        return;
    }
    fs::write(dir.path().join("duplicate.txt"), b"content").unwrap();

    assert_eq!(catalog_len(dir.path()), 2);
}

#[test]
fn test_unicode_nfc_and_nfd_names_recorded_once() {
    let dir = tempdir().unwrap();

    let name_nfc = "café_test.txt";
    let name_nfd = "cafe\u{0301}_test.txt";
    assert_ne!(name_nfc, name_nfd);
    assert_eq!(name_nfc, name_nfd.nfc().collect::<String>());

    fs::write(dir.path().join(name_nfc), b"content").unwrap();
    // On normalizing filesystems this reopens the first file.
    let _ = fs::write(dir.path().join(name_nfd), b"content");

    let files = Walker::new(dir.path(), WalkerConfig::default())
        .collect()
        .unwrap();

    // Whether the filesystem kept one entry or two, both names share one
    // identity and are recorded once.
    assert_eq!(files.len(), 1);
}

#[cfg(unix)]
#[test]
fn test_lowercase_rename_keeps_directory_casing() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("MixedCase");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("FILE.TXT"), b"data").unwrap();

    let config = WalkerConfig::default().with_lowercase_names(true);
    let files = Walker::new(dir.path(), config).collect().unwrap();

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, sub.join("file.txt"));
    assert!(sub.join("file.txt").exists());
}

#[cfg(unix)]
#[test]
fn test_fifo_is_not_recorded_or_read() {
    use std::sync::mpsc;
    use std::time::Duration;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("empty_a.txt"), b"").unwrap();
    fs::write(dir.path().join("empty_b.txt"), b"").unwrap();
    let made = std::process::Command::new("mkfifo")
        .arg(dir.path().join("pipe"))
        .status()
        .map(|s| s.success())
        .unwrap_or(false);
    if !made {
        eprintln!("Skipping FIFO test: mkfifo unavailable");
        return;
    }

    let root = dir.path().to_path_buf();
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let mut session = ScanSession::new(SessionConfig::new(&root));
        let scanned: Vec<_> = session
            .scan()
            .unwrap()
            .get(0)
            .unwrap()
            .iter()
            .map(|f| f.path.clone())
            .collect();
        let grouped = session.group().unwrap().len();
        let _ = tx.send((scanned, grouped));
    });

    // A recorded FIFO would block the hash stage forever
    let (scanned, grouped) = rx
        .recv_timeout(Duration::from_secs(10))
        .expect("grouping blocked on a non-regular file");

    assert_eq!(
        scanned,
        vec![dir.path().join("empty_a.txt"), dir.path().join("empty_b.txt")]
    );
    assert_eq!(grouped, 2);
}
