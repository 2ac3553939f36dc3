use bayan::duplicates::{DuplicateFinder, DuplicateGroup, FinderConfig, MatchStrategy};
use bayan::scanner::{FileCandidate, WalkerConfig};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn names(groups: &[DuplicateGroup]) -> Vec<Vec<String>> {
    groups
        .iter()
        .map(|g| {
            g.files
                .iter()
                .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
                .collect()
        })
        .collect()
}

fn scan(root: &Path, config: FinderConfig) -> Vec<DuplicateGroup> {
    let finder = DuplicateFinder::new(config).unwrap();
    finder
        .find_duplicates_in_paths(vec![root.to_path_buf()])
        .unwrap()
        .0
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let (groups, summary) = finder
        .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.duplicate_groups, 0);
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"content a").unwrap();
    fs::write(dir.path().join("b.txt"), b"content b").unwrap();
    fs::write(dir.path().join("c.txt"), b"content cc").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder
        .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 3);
    // c.txt differs in size from both others
    assert_eq!(summary.size_rejections, 2);
    assert_eq!(summary.content_mismatches, 1);
}

#[test]
fn test_reference_scenario() {
    let dir = tempdir().unwrap();
    let base: Vec<u8> = (0..100u8).map(|b| b.wrapping_mul(7)).collect();
    let mut last_byte_differs = base.clone();
    last_byte_differs[99] ^= 0xFF;

    fs::write(dir.path().join("A"), &base).unwrap();
    fs::write(dir.path().join("B"), &base).unwrap();
    fs::write(dir.path().join("C"), &base[..50]).unwrap();
    fs::write(dir.path().join("D"), &last_byte_differs).unwrap();

    let groups = scan(dir.path(), FinderConfig::default().with_block_size(10));

    assert_eq!(names(&groups), vec![vec!["A", "B"]]);
    assert_eq!(groups[0].size, 100);
}

#[test]
fn test_discovery_order_independent() {
    let dir = tempdir().unwrap();
    let mut candidates = Vec::new();
    for name in ["C", "A", "B"] {
        let path = dir.path().join(name);
        fs::write(&path, b"same same").unwrap();
        candidates.push(Ok(FileCandidate::new(path, 9)));
    }

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder.find_duplicates_from_candidates(candidates).unwrap();

    assert_eq!(names(&groups), vec![vec!["C", "A", "B"]]);
}

#[test]
fn test_two_separate_groups() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a1"), b"alpha").unwrap();
    fs::write(dir.path().join("b1"), b"bravo").unwrap();
    fs::write(dir.path().join("a2"), b"alpha").unwrap();
    fs::write(dir.path().join("b2"), b"bravo").unwrap();
    fs::write(dir.path().join("lonely"), b"charlie").unwrap();

    let groups = scan(dir.path(), FinderConfig::default());

    assert_eq!(names(&groups), vec![vec!["a1", "a2"], vec!["b1", "b2"]]);
}

#[test]
fn test_empty_files_skipped_by_default_min_size() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("empty1"), b"").unwrap();
    fs::write(dir.path().join("empty2"), b"").unwrap();

    assert!(scan(dir.path(), FinderConfig::default()).is_empty());

    let walker = WalkerConfig::new(false, 0, Vec::new(), Vec::new());
    let groups = scan(dir.path(), FinderConfig::default().with_walker_config(walker));
    assert_eq!(names(&groups), vec![vec!["empty1", "empty2"]]);
}

#[test]
fn test_min_size_excludes_small_duplicates() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("small1"), b"tiny").unwrap();
    fs::write(dir.path().join("small2"), b"tiny").unwrap();
    fs::write(dir.path().join("big1"), vec![3u8; 2048]).unwrap();
    fs::write(dir.path().join("big2"), vec![3u8; 2048]).unwrap();

    let walker = WalkerConfig::new(false, 1024, Vec::new(), Vec::new());
    let groups = scan(dir.path(), FinderConfig::default().with_walker_config(walker));

    assert_eq!(names(&groups), vec![vec!["big1", "big2"]]);
}

#[test]
fn test_masks_filter_file_names() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("one.JPG"), b"image").unwrap();
    fs::write(dir.path().join("two.jpg"), b"image").unwrap();
    fs::write(dir.path().join("three.txt"), b"image").unwrap();

    let walker = WalkerConfig::new(false, 1, vec!["*.jpg".to_string()], Vec::new());
    let groups = scan(dir.path(), FinderConfig::default().with_walker_config(walker));

    assert_eq!(names(&groups), vec![vec!["one.JPG", "two.jpg"]]);
}

#[test]
fn test_recursion_flag() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("nested");
    fs::create_dir(&nested).unwrap();
    fs::write(dir.path().join("top"), b"payload").unwrap();
    fs::write(nested.join("deep"), b"payload").unwrap();

    assert!(scan(dir.path(), FinderConfig::default()).is_empty());

    let walker = WalkerConfig::new(true, 1, Vec::new(), Vec::new());
    let groups = scan(dir.path(), FinderConfig::default().with_walker_config(walker));
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
}

#[test]
fn test_excluded_directory_not_scanned() {
    let dir = tempdir().unwrap();
    let skip = dir.path().join("skip");
    fs::create_dir(&skip).unwrap();
    fs::write(dir.path().join("keep"), b"payload").unwrap();
    fs::write(skip.join("copy"), b"payload").unwrap();

    let walker = WalkerConfig::new(true, 1, Vec::new(), vec![skip]);
    let finder = DuplicateFinder::new(FinderConfig::default().with_walker_config(walker)).unwrap();
    let (groups, summary) = finder
        .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 1);
}

#[test]
fn test_large_files_with_late_difference() {
    let dir = tempdir().unwrap();
    let content = vec![0xABu8; 256 * 1024];
    let mut changed = content.clone();
    *changed.last_mut().unwrap() = 0;

    fs::write(dir.path().join("a.bin"), &content).unwrap();
    fs::write(dir.path().join("b.bin"), &content).unwrap();
    fs::write(dir.path().join("c.bin"), &changed).unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder
        .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(names(&groups), vec![vec!["a.bin", "b.bin"]]);
    assert_eq!(summary.reclaimable_space, 256 * 1024);
    assert_eq!(summary.content_mismatches, 1);
}

#[test]
fn test_strategies_and_threads_agree() {
    let dir = tempdir().unwrap();
    for i in 0..30 {
        let content = format!("bucket-{}", i % 7);
        fs::write(dir.path().join(format!("file{i:02}")), content).unwrap();
    }

    let baseline = scan(dir.path(), FinderConfig::default());
    assert_eq!(baseline.len(), 7);

    for strategy in [MatchStrategy::Representative, MatchStrategy::Exhaustive] {
        for threads in [1, 4] {
            let config = FinderConfig::default()
                .with_strategy(strategy)
                .with_threads(threads);
            assert_eq!(
                scan(dir.path(), config),
                baseline,
                "strategy {strategy}, {threads} threads"
            );
        }
    }
}

#[test]
fn test_representative_needs_fewer_comparisons() {
    let dir = tempdir().unwrap();
    for i in 0..10 {
        fs::write(dir.path().join(format!("copy{i}")), b"identical").unwrap();
    }

    let run = |strategy| {
        let finder =
            DuplicateFinder::new(FinderConfig::default().with_strategy(strategy)).unwrap();
        finder
            .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
            .unwrap()
            .1
            .comparisons
    };

    assert_eq!(run(MatchStrategy::Representative), 9);
    assert_eq!(run(MatchStrategy::Exhaustive), 45);
}
