use bayan::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use bayan::scanner::{FileCandidate, HashError, ScanError, Walker, WalkerConfig};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_missing_files_are_excluded_and_recorded() {
    let finder = DuplicateFinder::with_defaults();
    let candidates = vec![
        Ok(FileCandidate::new(PathBuf::from("nonexistent_1.txt"), 100)),
        Ok(FileCandidate::new(PathBuf::from("nonexistent_2.txt"), 100)),
    ];

    let (groups, summary) = finder.find_duplicates_from_candidates(candidates).unwrap();

    assert!(groups.is_empty());
    // The second file fails first when opened against the first
    assert_eq!(summary.hash_errors.len(), 1);
    match &summary.hash_errors[0] {
        HashError::NotFound(path) => assert_eq!(path, &PathBuf::from("nonexistent_2.txt")),
        other => panic!("Expected NotFound HashError, got: {:?}", other),
    }
}

#[test]
fn test_file_removed_after_discovery_does_not_block_others() {
    let dir = tempdir().unwrap();
    for name in ["a", "b", "c", "d"] {
        fs::write(dir.path().join(name), b"shared content").unwrap();
    }

    let walker = Walker::new(vec![dir.path().to_path_buf()], WalkerConfig::default()).unwrap();
    let discovered: Vec<_> = walker.walk().collect();
    assert_eq!(discovered.len(), 4);

    fs::remove_file(dir.path().join("b")).unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates_from_candidates(discovered).unwrap();

    assert_eq!(groups.len(), 1);
    let names: Vec<_> = groups[0]
        .files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a", "c", "d"]);
    assert_eq!(summary.hash_errors.len(), 1);
    assert!(summary.hash_errors[0].path().ends_with("b"));
    assert!(summary.has_errors());
}

#[test]
fn test_removed_representative_is_replaced() {
    let dir = tempdir().unwrap();
    for name in ["first", "second", "third"] {
        fs::write(dir.path().join(name), b"payload").unwrap();
    }
    let first = FileCandidate::new(dir.path().join("first"), 7);
    let second = FileCandidate::new(dir.path().join("second"), 7);
    let third = FileCandidate::new(dir.path().join("third"), 7);
    let finder = DuplicateFinder::with_defaults();

    // first and second are classed together; first then disappears before third arrives
    let first_path = first.path.clone();
    let head: Vec<Result<FileCandidate, ScanError>> = vec![Ok(first), Ok(second)];
    let candidates = head.into_iter().chain(
        std::iter::once_with(move || {
            fs::remove_file(&first_path).unwrap();
            Ok(third)
        }),
    );

    let (groups, summary) = finder.find_duplicates_from_candidates(candidates).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].files.len(), 2);
    assert!(groups[0].files[0].ends_with("second"));
    assert!(groups[0].files[1].ends_with("third"));
    assert_eq!(summary.hash_errors.len(), 1);
}

#[test]
fn test_strict_mode_stops_on_first_error() {
    let config = FinderConfig::default().with_strict(true);
    let finder = DuplicateFinder::new(config).unwrap();
    let candidates = vec![
        Ok(FileCandidate::new(PathBuf::from("nonexistent_1.txt"), 100)),
        Ok(FileCandidate::new(PathBuf::from("nonexistent_2.txt"), 100)),
    ];

    let result = finder.find_duplicates_from_candidates(candidates);

    match result {
        Err(FinderError::Hash(HashError::NotFound(_))) => {}
        other => panic!("Expected NotFound HashError, got: {:?}", other.map(|r| r.0)),
    }
}

#[test]
fn test_strict_mode_stops_on_scan_error() {
    let config = FinderConfig::default().with_strict(true);
    let finder = DuplicateFinder::new(config).unwrap();
    let candidates = vec![Err(ScanError::PermissionDenied(PathBuf::from("/locked")))];

    assert!(matches!(
        finder.find_duplicates_from_candidates(candidates),
        Err(FinderError::Scan(ScanError::PermissionDenied(_)))
    ));
}

#[test]
fn test_missing_root_is_fatal() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let result = finder.find_duplicates_in_paths(vec![dir.path().join("does-not-exist")]);

    assert!(matches!(result, Err(FinderError::Scan(ScanError::NotFound(_)))));
}

#[test]
fn test_zero_block_size_rejected_before_scanning() {
    let config = FinderConfig::default().with_block_size(0);
    assert!(matches!(
        DuplicateFinder::new(config),
        Err(FinderError::Config(_))
    ));
}
