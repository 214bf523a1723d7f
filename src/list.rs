//! Directory listing for the browse page
//!
//! Produces the `{entries, current, parent}` contract the listing page
//! renders: folders and plot files under one directory, sorted oldest
//! first by creation-time metadata.

use crate::resolve::{is_plot_file, PlotRoot};
use serde::Serialize;
use std::io;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Folder,
    File,
}

/// One row of a directory listing. Transient, rebuilt on every request.
#[derive(Serialize, Debug, Clone)]
pub struct Entry {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub name: String,
    /// Root-relative path with forward slashes.
    pub path: String,
    #[serde(serialize_with = "unix_secs")]
    pub time: SystemTime,
}

/// A rendered-listing view of one directory.
#[derive(Serialize, Debug, Clone)]
pub struct Listing {
    pub entries: Vec<Entry>,
    /// The requested root-relative path ("" at the root).
    pub current: String,
    /// One level up, or None exactly at the root.
    pub parent: Option<String>,
}

fn unix_secs<S: serde::Serializer>(t: &SystemTime, s: S) -> Result<S::Ok, S::Error> {
    let secs = t
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0);
    s.serialize_f64(secs)
}

/// The directory one level up from `rel_path`, or None at the root.
/// Children of the root get `Some("")` so the link leads back to it.
pub fn parent_of(rel_path: &str) -> Option<String> {
    let trimmed = rel_path.trim_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.rfind('/') {
        Some(idx) => Some(trimmed[..idx].to_string()),
        None => Some(String::new()),
    }
}

/// List the folders and plot files directly under `rel_path`, sorted
/// ascending by creation time. Entries that vanish between the readdir
/// and the stat are skipped, never surfaced.
pub fn list(root: &PlotRoot, rel_path: &str) -> io::Result<Listing> {
    let dir = root.resolve_dir(rel_path)?;
    let current = rel_path.trim_matches('/').to_string();

    let mut entries = Vec::new();
    for child in dir.read_dir()? {
        let child = match child {
            Ok(c) => c,
            Err(_) => continue,
        };
        let name = child.file_name().to_string_lossy().into_owned();
        // Stat may fail if the entry vanished mid-listing; skip it.
        let meta = match child.metadata() {
            Ok(m) => m,
            Err(_) => continue,
        };
        // Birth time where the filesystem records it, change/modify
        // time otherwise (the same platform-dependent semantics as the
        // st_ctime this ordering comes from).
        let time = meta
            .created()
            .or_else(|_| meta.modified())
            .unwrap_or(UNIX_EPOCH);

        let kind = if meta.is_dir() {
            EntryKind::Folder
        } else if meta.is_file() && is_plot_file(&name) {
            EntryKind::File
        } else {
            continue;
        };

        let path = if current.is_empty() {
            name.clone()
        } else {
            format!("{}/{}", current, name)
        };
        entries.push(Entry { kind, name, path, time });
    }

    // Oldest first; sort_by is stable so equal timestamps keep readdir order
    entries.sort_by(|a, b| a.time.cmp(&b.time));

    let parent = parent_of(&current);
    Ok(Listing { entries, current, parent })
}
