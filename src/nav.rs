//! Previous/next navigation between charts
//!
//! Two orderings are offered on the chart-view page: the chronologically
//! adjacent plot file within the same folder, and the chronologically
//! adjacent occurrence of the same-named file across sibling run folders
//! (e.g. `run1/snap.json`, `run2/snap.json`, ...).

use crate::resolve::{is_plot_file, PlotRoot};
use std::path::Path;
use std::time::SystemTime;
use walkdir::WalkDir;

/// Neighbor lookup result. Absent neighbors are a normal outcome, not an
/// error: a file at either end of the sequence, or one that cannot be
/// located at all, simply has fewer links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Neighbors {
    /// Root-relative path of the previous chart, if any.
    pub prev: Option<String>,
    /// Root-relative path of the next chart, if any.
    pub next: Option<String>,
}

fn neighbors_at(paths: &[String], index: Option<usize>) -> Neighbors {
    let index = match index {
        Some(i) => i,
        None => return Neighbors::default(),
    };
    Neighbors {
        prev: if index > 0 {
            paths.get(index - 1).cloned()
        } else {
            None
        },
        next: paths.get(index + 1).cloned(),
    }
}

/// Find the plot files adjacent to `current` within `folder`, ordered by
/// modification time. A missing folder or an unlisted `current` yields
/// empty neighbors.
pub fn sibling_neighbors(root: &PlotRoot, folder: &str, current: &str) -> Neighbors {
    let dir = match root.resolve_dir(folder) {
        Ok(d) => d,
        Err(_) => return Neighbors::default(),
    };
    let read = match dir.read_dir() {
        Ok(r) => r,
        Err(_) => return Neighbors::default(),
    };

    let mut files: Vec<(String, SystemTime)> = Vec::new();
    for child in read.filter_map(|c| c.ok()) {
        let name = child.file_name().to_string_lossy().into_owned();
        if !is_plot_file(&name) {
            continue;
        }
        // Skip entries that vanished between readdir and stat
        let meta = match child.metadata() {
            Ok(m) => m,
            Err(_) => continue,
        };
        if !meta.is_file() {
            continue;
        }
        let mtime = match meta.modified() {
            Ok(t) => t,
            Err(_) => continue,
        };
        files.push((name, mtime));
    }
    files.sort_by(|a, b| a.1.cmp(&b.1));

    let folder = folder.trim_matches('/');
    let paths: Vec<String> = files
        .into_iter()
        .map(|(name, _)| {
            if folder.is_empty() {
                name
            } else {
                format!("{}/{}", folder, name)
            }
        })
        .collect();

    let index = paths
        .iter()
        .position(|p| Path::new(p).file_name().is_some_and(|n| n == current));
    neighbors_at(&paths, index)
}

/// The run-group directory: `folder` with its last two path segments
/// removed. A folder nested less than two levels deep degrades to the
/// plot root itself.
fn run_group(folder: &str) -> String {
    let parts: Vec<&str> = folder.split('/').filter(|p| !p.is_empty()).collect();
    let keep = parts.len().saturating_sub(2);
    parts[..keep].join("/")
}

/// Find occurrences of the file named `current` across the run group
/// containing `folder`, ordered by modification time, and return the
/// occurrences adjacent to the one inside `folder` itself.
pub fn cross_folder_neighbors(root: &PlotRoot, folder: &str, current: &str) -> Neighbors {
    let group_rel = run_group(folder);
    let group_dir = if group_rel.is_empty() {
        root.path().to_path_buf()
    } else {
        match root.resolve_dir(&group_rel) {
            Ok(d) => d,
            Err(_) => return Neighbors::default(),
        }
    };

    let mut matches: Vec<(String, SystemTime)> = Vec::new();
    for entry in WalkDir::new(&group_dir).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() || entry.file_name() != current {
            continue;
        }
        let mtime = match entry.metadata().ok().and_then(|m| m.modified().ok()) {
            Some(t) => t,
            None => continue,
        };
        if let Some(rel) = root.relative(entry.path()) {
            matches.push((rel, mtime));
        }
    }
    matches.sort_by(|a, b| a.1.cmp(&b.1));

    let folder = folder.trim_matches('/');
    let paths: Vec<String> = matches.into_iter().map(|(rel, _)| rel).collect();
    // Exact parent match, so "run1" never claims "run10/snap.json"
    let index = paths
        .iter()
        .position(|p| Path::new(p).parent() == Some(Path::new(folder)));
    neighbors_at(&paths, index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use std::time::{Duration, SystemTime};

    // ==========================================================================
    // NAVIGATION TESTS
    // ==========================================================================
    //
    // Modification times are set explicitly so the chronological ordering
    // under test never depends on how fast the files were created.
    // ==========================================================================

    fn write_with_age(path: &Path, secs_ago: u64) {
        fs::write(path, b"x").unwrap();
        let mtime = SystemTime::now() - Duration::from_secs(secs_ago);
        let file = fs::File::options().write(true).open(path).unwrap();
        file.set_modified(mtime).unwrap();
    }

    fn sibling_fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write_with_age(&dir.path().join("a.html"), 300);
        write_with_age(&dir.path().join("b.html"), 200);
        write_with_age(&dir.path().join("c.html"), 100);
        dir
    }

    #[test]
    fn test_sibling_middle_has_both() {
        let dir = sibling_fixture();
        let root = PlotRoot::open(dir.path()).unwrap();
        let n = sibling_neighbors(&root, "", "b.html");
        assert_eq!(n.prev.as_deref(), Some("a.html"));
        assert_eq!(n.next.as_deref(), Some("c.html"));
    }

    #[test]
    fn test_sibling_oldest_has_no_prev() {
        let dir = sibling_fixture();
        let root = PlotRoot::open(dir.path()).unwrap();
        let n = sibling_neighbors(&root, "", "a.html");
        assert_eq!(n.prev, None);
        assert_eq!(n.next.as_deref(), Some("b.html"));
    }

    #[test]
    fn test_sibling_newest_has_no_next() {
        let dir = sibling_fixture();
        let root = PlotRoot::open(dir.path()).unwrap();
        let n = sibling_neighbors(&root, "", "c.html");
        assert_eq!(n.prev.as_deref(), Some("b.html"));
        assert_eq!(n.next, None);
    }

    #[test]
    fn test_sibling_missing_file_has_no_neighbors() {
        let dir = sibling_fixture();
        let root = PlotRoot::open(dir.path()).unwrap();
        assert_eq!(sibling_neighbors(&root, "", "missing.html"), Neighbors::default());
    }

    #[test]
    fn test_sibling_missing_folder_has_no_neighbors() {
        let dir = tempfile::tempdir().unwrap();
        let root = PlotRoot::open(dir.path()).unwrap();
        assert_eq!(sibling_neighbors(&root, "gone", "a.html"), Neighbors::default());
    }

    #[test]
    fn test_sibling_paths_include_folder() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("run1")).unwrap();
        write_with_age(&dir.path().join("run1/a.html"), 200);
        write_with_age(&dir.path().join("run1/b.html"), 100);

        let root = PlotRoot::open(dir.path()).unwrap();
        let n = sibling_neighbors(&root, "run1", "b.html");
        assert_eq!(n.prev.as_deref(), Some("run1/a.html"));
    }

    #[test]
    fn test_sibling_ignores_non_plot_files() {
        let dir = tempfile::tempdir().unwrap();
        write_with_age(&dir.path().join("a.html"), 300);
        write_with_age(&dir.path().join("skip.txt"), 200);
        write_with_age(&dir.path().join("b.html"), 100);

        let root = PlotRoot::open(dir.path()).unwrap();
        let n = sibling_neighbors(&root, "", "a.html");
        assert_eq!(n.next.as_deref(), Some("b.html"));
    }

    #[test]
    fn test_run_group_strips_two_segments() {
        assert_eq!(run_group("exp/batch/run1"), "exp");
        assert_eq!(run_group("batch/run1"), "");
        assert_eq!(run_group("run1"), "");
        assert_eq!(run_group(""), "");
    }

    fn cross_fixture() -> tempfile::TempDir {
        // group/  (run-group level, reached by stripping two segments
        //   batch/run1/snap.json   oldest
        //   batch/run2/snap.json
        //   batch/run3/snap.json   newest
        let dir = tempfile::tempdir().unwrap();
        for (run, age) in [("run1", 300u64), ("run2", 200), ("run3", 100)] {
            let d = dir.path().join("batch").join(run);
            fs::create_dir_all(&d).unwrap();
            write_with_age(&d.join("snap.json"), age);
        }
        dir
    }

    #[test]
    fn test_cross_folder_middle() {
        let dir = cross_fixture();
        let root = PlotRoot::open(dir.path()).unwrap();
        let n = cross_folder_neighbors(&root, "batch/run2", "snap.json");
        assert_eq!(n.prev.as_deref(), Some("batch/run1/snap.json"));
        assert_eq!(n.next.as_deref(), Some("batch/run3/snap.json"));
    }

    #[test]
    fn test_cross_folder_oldest_and_newest() {
        let dir = cross_fixture();
        let root = PlotRoot::open(dir.path()).unwrap();

        let first = cross_folder_neighbors(&root, "batch/run1", "snap.json");
        assert_eq!(first.prev, None);
        assert_eq!(first.next.as_deref(), Some("batch/run2/snap.json"));

        let last = cross_folder_neighbors(&root, "batch/run3", "snap.json");
        assert_eq!(last.prev.as_deref(), Some("batch/run2/snap.json"));
        assert_eq!(last.next, None);
    }

    #[test]
    fn test_cross_folder_matches_exact_folder_not_substring() {
        let dir = tempfile::tempdir().unwrap();
        for (run, age) in [("run1", 300u64), ("run10", 200), ("run2", 100)] {
            let d = dir.path().join("batch").join(run);
            fs::create_dir_all(&d).unwrap();
            write_with_age(&d.join("snap.json"), age);
        }

        let root = PlotRoot::open(dir.path()).unwrap();
        // "run1" is a substring of "run10"; only the exact folder counts
        let n = cross_folder_neighbors(&root, "batch/run1", "snap.json");
        assert_eq!(n.prev, None);
        assert_eq!(n.next.as_deref(), Some("batch/run10/snap.json"));
    }

    #[test]
    fn test_cross_folder_ignores_other_filenames() {
        let dir = cross_fixture();
        write_with_age(&dir.path().join("batch/run2/other.json"), 150);

        let root = PlotRoot::open(dir.path()).unwrap();
        let n = cross_folder_neighbors(&root, "batch/run2", "snap.json");
        assert_eq!(n.prev.as_deref(), Some("batch/run1/snap.json"));
        assert_eq!(n.next.as_deref(), Some("batch/run3/snap.json"));
    }

    #[test]
    fn test_cross_folder_unknown_folder_has_no_neighbors() {
        let dir = cross_fixture();
        let root = PlotRoot::open(dir.path()).unwrap();
        let n = cross_folder_neighbors(&root, "batch/run9", "snap.json");
        assert_eq!(n, Neighbors::default());
    }
}
