//! core/mod.rs
//!
//! The brain of the app:
//! - Load files into tag objects and save them back (library, tags, types)
//! - Read/write standard fields through a closed accessor table (accessor, catalog)
//! - Enumerate and edit per-format custom metadata (family, custom)
//! - Serialize everything to JSON/CSV (export, csv)
//! - Run per-file batches with progress and cancellation (batch)
//!
//! The CLI stays dumb: it parses arguments and calls into here.

pub mod accessor;
pub mod batch;
pub mod catalog;
pub mod csv;
pub mod custom;
pub mod error;
pub mod export;
pub mod family;
pub mod grouping;
pub mod library;
pub mod lyrics;
pub mod tags;
pub mod types;

use std::path::PathBuf;

use tracing::warn;

use batch::{BatchReport, CancelFlag, Progress};
use catalog::StandardField;
use types::FileEntry;

/// Load every path; unreadable files are logged and skipped.
///
/// Returns (loaded paths, entries, load_failures). Paths and entries line up.
pub fn load_files(paths: Vec<PathBuf>) -> (Vec<PathBuf>, Vec<FileEntry>, usize) {
    let mut kept = Vec::with_capacity(paths.len());
    let mut entries = Vec::with_capacity(paths.len());
    let mut failures = 0;

    for path in paths {
        match library::load_file(&path) {
            Ok(entry) => {
                kept.push(path);
                entries.push(entry);
            }
            Err(e) => {
                warn!(file = %path.display(), error = %format!("{e:#}"), "load failed");
                failures += 1;
            }
        }
    }

    (kept, entries, failures)
}

/// Set one standard field on every entry, one batch step per file.
///
/// Entries processed before a cancel keep the new value.
pub fn apply_standard_field(
    entries: &mut [FileEntry],
    field: &StandardField,
    value: Option<&str>,
    cancel: &CancelFlag,
    progress: impl FnMut(&Progress),
) -> BatchReport {
    let title = format!("Setting {}", field.display_name);
    batch::run(&title, entries.iter_mut(), cancel, progress, |entry| {
        accessor::set(value, &mut entry.tag, field);
        Ok::<(), std::convert::Infallible>(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_standard_field_stops_on_cancel() {
        let mut entries: Vec<FileEntry> = (0..3)
            .map(|i| FileEntry::from_bytes(format!("{i}.mp3"), Vec::new()).unwrap())
            .collect();
        let field = catalog::find("Track").unwrap();
        let cancel = CancelFlag::new();
        let report = apply_standard_field(&mut entries, field, Some("4"), &cancel, |p| {
            if p.current == 2 {
                cancel.cancel();
            }
        });
        assert!(report.cancelled);
        assert_eq!(report.processed, 2);
        assert_eq!(entries[1].tag.standard().track, Some(4));
        assert_eq!(entries[2].tag.standard().track, None);
    }
}
