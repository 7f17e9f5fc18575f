//! core/grouping.rs
//! Group loaded files by base name (`track.mp3` + `track.lrc` -> `track`).

use indexmap::IndexMap;

use super::types::FileEntry;

/// File name without its last extension. Names without a dot are their own base.
pub fn base_name(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((base, _)) => base,
        None => name,
    }
}

/// Groups in first-seen order; entries keep their input order inside a group.
pub fn group_by_base_name(entries: &[FileEntry]) -> IndexMap<String, Vec<&FileEntry>> {
    let mut groups: IndexMap<String, Vec<&FileEntry>> = IndexMap::new();
    for entry in entries {
        groups
            .entry(base_name(&entry.name).to_string())
            .or_default()
            .push(entry);
    }
    groups
}
