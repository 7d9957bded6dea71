use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tempfile::tempdir;

use nukex::config::{DeletionStrategy, ScanConfig};
use nukex::models::{format_all, total_size};
use nukex::operations::CleanupOperation;
use nukex::scanner::ParallelScanner;
use nukex::utils::format_size;

fn sorted_match_paths(outcome: &nukex::ScanOutcome) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = outcome.matches.iter().map(|m| m.path.clone()).collect();
    paths.sort();
    paths
}

#[tokio::test]
async fn test_example_scenario() {
    let temp_dir = tempdir().unwrap();
    let base = temp_dir.path();

    // a/node_modules: 1500 + 500 字节
    let a = base.join("a").join("node_modules");
    fs::create_dir_all(&a).unwrap();
    fs::write(a.join("one.js"), vec![b'1'; 1500]).unwrap();
    fs::write(a.join("two.js"), vec![b'2'; 500]).unwrap();

    // b/.git/node_modules: .git 被排除，永远不会被访问
    let hidden = base.join("b").join(".git").join("node_modules");
    fs::create_dir_all(&hidden).unwrap();
    fs::write(hidden.join("big.bin"), vec![0u8; 10_000]).unwrap();

    // c/sub/node_modules: 空目录
    let c = base.join("c").join("sub").join("node_modules");
    fs::create_dir_all(&c).unwrap();

    let outcome = ParallelScanner::new(ScanConfig::default())
        .scan(base)
        .await
        .unwrap();

    assert_eq!(sorted_match_paths(&outcome), vec![a.clone(), c.clone()]);
    assert!(outcome.warnings.is_empty());
    assert!(!outcome.cancelled);
    assert_eq!(outcome.stats.units_dispatched, 3);

    let sizes: Vec<(PathBuf, u64)> = {
        let mut sizes: Vec<_> = outcome
            .matches
            .iter()
            .map(|m| (m.path.clone(), m.size_bytes))
            .collect();
        sizes.sort();
        sizes
    };
    assert_eq!(sizes, vec![(a.clone(), 2000), (c.clone(), 0)]);

    let display = format_all(&outcome.matches, format_size, |p: &Path| {
        p.display().to_string()
    });
    let formatted: HashSet<String> = display.into_iter().map(|d| d.formatted_size).collect();
    assert!(formatted.contains("1.95 KB"));
    assert!(formatted.contains("0 B"));

    assert_eq!(format_size(total_size(&outcome.matches)), "1.95 KB");
    assert_eq!(total_size(&outcome.matches), total_size(&outcome.matches));
}

#[tokio::test]
async fn test_matches_never_nest_and_never_repeat() {
    let temp_dir = tempdir().unwrap();
    let base = temp_dir.path();

    for project in 0..6 {
        let root = base.join(format!("project-{}", project));
        let outer = root.join("node_modules");
        fs::create_dir_all(outer.join("dep").join("node_modules").join("inner")).unwrap();
        fs::create_dir_all(root.join("packages").join("ui").join("node_modules")).unwrap();
        fs::create_dir_all(root.join("packages").join("api").join("src")).unwrap();
    }

    let outcome = ParallelScanner::new(ScanConfig::new("", 2, Vec::<String>::new()))
        .scan(base)
        .await
        .unwrap();

    let paths = sorted_match_paths(&outcome);
    assert_eq!(paths.len(), 12);

    let unique: HashSet<&PathBuf> = paths.iter().collect();
    assert_eq!(unique.len(), paths.len());

    for a in &paths {
        for b in &paths {
            if a != b {
                assert!(!b.starts_with(a), "{} 嵌套在 {} 中", b.display(), a.display());
            }
        }
        let name = a.file_name().unwrap().to_string_lossy();
        assert!(name.contains("node_modules"));
    }
}

#[tokio::test]
async fn test_exclusion_applies_to_every_depth() {
    let temp_dir = tempdir().unwrap();
    let base = temp_dir.path();

    fs::create_dir_all(base.join("app").join("venv").join("node_modules")).unwrap();
    fs::create_dir_all(base.join("app").join(".yarn").join("cache").join("node_modules")).unwrap();
    fs::create_dir_all(base.join(".venv").join("node_modules")).unwrap();
    let kept = base.join("app").join("web").join("node_modules");
    fs::create_dir_all(&kept).unwrap();

    let outcome = ParallelScanner::new(ScanConfig::default())
        .scan(base)
        .await
        .unwrap();

    assert_eq!(sorted_match_paths(&outcome), vec![kept]);
}

#[tokio::test]
async fn test_top_level_children_use_the_same_rules() {
    let temp_dir = tempdir().unwrap();
    let base = temp_dir.path();

    // 顶层子目录本身匹配：报告它，不报告其内部的嵌套匹配
    let top = base.join("node_modules");
    fs::create_dir_all(top.join("pkg").join("node_modules")).unwrap();

    // 顶层子目录本身被排除：内部匹配不会被报告
    fs::create_dir_all(base.join(".git").join("node_modules")).unwrap();

    // 顶层的普通文件不会被当成匹配
    fs::write(base.join("node_modules.txt"), "x").unwrap();

    let outcome = ParallelScanner::new(ScanConfig::default())
        .scan(base)
        .await
        .unwrap();

    assert_eq!(sorted_match_paths(&outcome), vec![top]);
    assert_eq!(outcome.stats.units_dispatched, 3);
}

#[tokio::test]
async fn test_custom_pattern_and_exclusions() {
    let temp_dir = tempdir().unwrap();
    let base = temp_dir.path();

    let target = base.join("crate").join("target");
    fs::create_dir_all(&target).unwrap();
    fs::write(target.join("app"), vec![0u8; 64]).unwrap();
    fs::create_dir_all(base.join("skipme").join("target")).unwrap();
    fs::create_dir_all(base.join("web").join("node_modules")).unwrap();

    let config = ScanConfig::new("target", 4, vec!["skipme"]);
    let outcome = ParallelScanner::new(config).scan(base).await.unwrap();

    assert_eq!(sorted_match_paths(&outcome), vec![target]);
    assert_eq!(outcome.total_size(), 64);
}

#[tokio::test]
async fn test_single_worker_runs_units_one_at_a_time() {
    let temp_dir = tempdir().unwrap();
    for i in 0..8 {
        fs::create_dir_all(temp_dir.path().join(format!("p{}", i)).join("node_modules")).unwrap();
    }

    let outcome = ParallelScanner::new(ScanConfig::new("", 1, Vec::<String>::new()))
        .scan(temp_dir.path())
        .await
        .unwrap();

    assert_eq!(outcome.matches.len(), 8);
    assert_eq!(outcome.stats.units_dispatched, 8);
    assert_eq!(outcome.stats.peak_concurrency, 1);
}

#[tokio::test]
async fn test_more_workers_than_children() {
    let temp_dir = tempdir().unwrap();
    for i in 0..3 {
        fs::create_dir_all(temp_dir.path().join(format!("p{}", i)).join("node_modules")).unwrap();
    }

    let outcome = ParallelScanner::new(ScanConfig::new("", 64, Vec::<String>::new()))
        .scan(temp_dir.path())
        .await
        .unwrap();

    assert_eq!(outcome.matches.len(), 3);
    assert!(outcome.stats.peak_concurrency <= 3);
}

/// 以 root 运行时权限限制不生效，这类测试直接跳过
#[cfg(unix)]
fn lock_dir(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::read_dir(path).is_ok() {
        unlock_dir(path);
        eprintln!("跳过: 当前用户不受目录权限限制");
        return false;
    }
    true
}

#[cfg(unix)]
fn unlock_dir(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[tokio::test]
async fn test_failed_child_does_not_affect_siblings() {
    let temp_dir = tempdir().unwrap();
    let base = temp_dir.path();

    for name in ["a", "b", "c"] {
        let modules = base.join(name).join("node_modules");
        fs::create_dir_all(&modules).unwrap();
        fs::write(modules.join("index.js"), vec![0u8; 42]).unwrap();
    }

    // 单个并发时，第一个子项报告匹配后才会派发其余子项；
    // 此时删掉其余子项，它们的遍历必然从根目录开始就失败
    let root = base.to_path_buf();
    let removed = Arc::new(AtomicBool::new(false));
    let outcome = ParallelScanner::new(ScanConfig::new("", 1, Vec::<String>::new()))
        .scan_with_progress(base, move |progress| {
            let Some(found) = progress.current_path else {
                return;
            };
            if progress.matches_found != 1 || removed.swap(true, Ordering::SeqCst) {
                return;
            }
            for entry in fs::read_dir(&root).unwrap() {
                let child = entry.unwrap().path();
                if !found.starts_with(&child) {
                    fs::remove_dir_all(&child).unwrap();
                }
            }
        })
        .await
        .unwrap();

    assert_eq!(outcome.matches.len(), 1);
    assert_eq!(outcome.total_size(), 42);
    assert_eq!(outcome.stats.units_dispatched, 3);
    assert_eq!(outcome.stats.units_failed, 2);
    assert_eq!(outcome.warnings.len(), 2);

    let survivor = &outcome.matches[0].path;
    for warning in &outcome.warnings {
        assert!(!survivor.starts_with(base.join(&warning.child)));
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlinked_child_is_not_walked() {
    let temp_dir = tempdir().unwrap();
    let base = temp_dir.path();

    let modules = base.join("a").join("node_modules");
    fs::create_dir_all(&modules).unwrap();
    fs::write(modules.join("index.js"), vec![0u8; 100]).unwrap();

    // 指回基础目录的链接，跟随就会重复报告所有匹配
    std::os::unix::fs::symlink(base, base.join("loop")).unwrap();
    // 名称匹配的链接也不算匹配
    std::os::unix::fs::symlink(&modules, base.join("node_modules")).unwrap();

    let outcome = ParallelScanner::new(ScanConfig::default())
        .scan(base)
        .await
        .unwrap();

    assert_eq!(sorted_match_paths(&outcome), vec![modules]);
    assert_eq!(outcome.total_size(), 100);
    assert_eq!(outcome.stats.units_dispatched, 3);
    assert!(outcome.warnings.is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_unreadable_match_reports_unknown_size() {
    let temp_dir = tempdir().unwrap();
    let base = temp_dir.path();

    let matched = base.join("app").join("node_modules");
    let locked = matched.join("private");
    fs::create_dir_all(&locked).unwrap();
    fs::write(matched.join("index.js"), vec![0u8; 10]).unwrap();
    if !lock_dir(&locked) {
        return;
    }

    let outcome = ParallelScanner::new(ScanConfig::default())
        .scan(base)
        .await
        .unwrap();
    unlock_dir(&locked);

    assert_eq!(outcome.matches.len(), 1);
    assert!(outcome.matches[0].size_unknown);
    assert_eq!(outcome.matches[0].size_bytes, 0);
    assert!(outcome.warnings.is_empty());
}

#[tokio::test]
async fn test_scan_then_delete_selected() {
    let temp_dir = tempdir().unwrap();
    let base = temp_dir.path();

    let first = base.join("a").join("node_modules");
    let second = base.join("b").join("node_modules");
    fs::create_dir_all(&first).unwrap();
    fs::write(first.join("x.js"), vec![0u8; 300]).unwrap();
    fs::create_dir_all(&second).unwrap();
    fs::write(second.join("y.js"), vec![0u8; 700]).unwrap();

    let outcome = ParallelScanner::new(ScanConfig::default())
        .scan(base)
        .await
        .unwrap();
    assert_eq!(outcome.matches.len(), 2);

    let selected: Vec<_> = outcome
        .matches
        .iter()
        .filter(|m| m.path == first)
        .cloned()
        .collect();
    let report = CleanupOperation::new(DeletionStrategy::Permanent).delete_all(&selected, |_| {});

    assert_eq!(report.failed_count(), 0);
    assert_eq!(report.freed_bytes(), 300);
    assert!(!first.exists());
    assert!(second.exists());

    let rescan = ParallelScanner::new(ScanConfig::default())
        .scan(base)
        .await
        .unwrap();
    assert_eq!(sorted_match_paths(&rescan), vec![second]);
}
