use bayan::duplicates::DuplicateFinder;
use bayan::output::{CsvOutput, TextOutput};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_unicode_and_spaces_in_names() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("отчёт 2024.txt"), b"report body").unwrap();
    fs::write(dir.path().join("レポート copy.txt"), b"report body").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder
        .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(groups.len(), 1);
    let text = TextOutput::new(&groups).render();
    assert!(text.contains("отчёт 2024.txt"));
    assert!(text.contains("レポート copy.txt"));
}

#[test]
fn test_comma_in_name_survives_csv() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a,b.txt"), b"data").unwrap();
    fs::write(dir.path().join("c.txt"), b"data").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder
        .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
        .unwrap();

    let csv = CsvOutput::new(&groups).to_string().unwrap();
    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let paths: Vec<String> = reader
        .records()
        .map(|r| r.unwrap()[2].to_string())
        .collect();
    assert_eq!(paths.len(), 2);
    assert!(paths[0].ends_with("a,b.txt"));
}

#[test]
fn test_hidden_files_are_compared() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".hidden"), b"secret").unwrap();
    fs::write(dir.path().join("visible"), b"secret").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder
        .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(groups.len(), 1);
}

#[cfg(unix)]
#[test]
fn test_symlink_to_duplicate_is_ignored() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("real");
    fs::write(&target, b"linked").unwrap();
    std::os::unix::fs::symlink(&target, dir.path().join("link")).unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder
        .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 1);
}

#[test]
fn test_relative_root_yields_absolute_paths() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("one"), b"x").unwrap();
    fs::write(dir.path().join("two"), b"x").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder
        .find_duplicates_in_paths(vec![dir.path().join(".")])
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert!(groups[0].files.iter().all(|p| p.is_absolute()));
}
