//! Records parsed from a recursive MASS listing.
//!
//! `moo ls -Rl <uri>` prints one line per record below the URI:
//!
//! ```text
//! D owner         2021-03-08 11:21:10 GMT moose:/adhoc/users/owner/test
//! F owner    1024 2021-03-08 11:21:10 GMT moose:/adhoc/users/owner/test/file.nc
//! ```
//!
//! The first column is the media type (`D` for directories) and the last
//! column is the record path. Nothing else on the line is used.

use std::collections::BTreeMap;

use serde::Serialize;

/// One record (directory, file, collection) in MASS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MassRecord {
    pub path: String,
    pub parent: String,
    pub is_dir: bool,
    /// Directories with no file anywhere below them are empty. Files never
    /// are.
    pub is_empty: bool,
}

impl MassRecord {
    fn new(path: &str, media_type: &str) -> Self {
        let is_dir = media_type == "D";
        Self {
            path: path.to_string(),
            parent: path
                .rsplit_once('/')
                .map_or_else(String::new, |(parent, _)| parent.to_string()),
            is_dir,
            is_empty: is_dir,
        }
    }

    /// The final path segment.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Parse a listing into records keyed by path, with emptiness resolved.
pub fn parse_listing(stdout: &str) -> BTreeMap<String, MassRecord> {
    let mut records: BTreeMap<String, MassRecord> = stdout
        .lines()
        .filter_map(|line| {
            let mut columns = line.split_whitespace();
            let media_type = columns.next()?;
            let path = columns.last().unwrap_or(media_type);
            Some((path.to_string(), MassRecord::new(path, media_type)))
        })
        .collect();

    // Deepest first, so a directory is settled before its parent looks at it.
    let mut paths: Vec<String> = records.keys().cloned().collect();
    paths.sort_by_key(|p| std::cmp::Reverse(p.len()));
    for path in paths {
        let Some(record) = records.get(&path) else {
            continue;
        };
        if record.is_empty {
            continue;
        }
        let parent = record.parent.clone();
        if let Some(parent) = records.get_mut(&parent) {
            parent.is_empty = false;
        }
    }
    records
}

/// Empty directories, deepest first, so they can be removed in order.
pub fn empty_dirs(records: &BTreeMap<String, MassRecord>) -> Vec<String> {
    let mut dirs: Vec<String> = records
        .values()
        .filter(|r| r.is_dir && r.is_empty)
        .map(|r| r.path.clone())
        .collect();
    dirs.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    dirs
}
