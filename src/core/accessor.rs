//! core/accessor.rs
//! Generic get/set bridge between plain strings and [`StandardTag`] fields.
//!
//! Each accessor name maps to a typed getter/setter pair ([`FieldAccess`]).
//! There is no reflection: an accessor that is not listed here does not exist,
//! and reads as "" / ignores writes.
//!
//! Coercion on `set`:
//! - string list: one-element list, or cleared when the value is empty/absent
//! - unsigned integer: parsed (trimmed); cleared when parsing fails
//! - text: stored raw

use super::catalog::StandardField;
use super::tags::{StandardTag, TagFile};
use super::types::FileEntry;

/// Getter/setter pair for one accessor.
#[derive(Clone, Copy)]
pub enum FieldAccess {
    Text {
        get: fn(&StandardTag) -> Option<&str>,
        set: fn(&mut StandardTag, Option<String>),
    },
    List {
        get: fn(&StandardTag) -> &[String],
        set: fn(&mut StandardTag, Vec<String>),
    },
    Number {
        get: fn(&StandardTag) -> Option<u32>,
        set: fn(&mut StandardTag, Option<u32>),
    },
    /// Derived values; writes are ignored.
    ReadOnly(fn(&StandardTag) -> String),
}

macro_rules! text {
    ($field:ident) => {
        FieldAccess::Text {
            get: |t| t.$field.as_deref(),
            set: |t, v| t.$field = v,
        }
    };
}

macro_rules! list {
    ($field:ident) => {
        FieldAccess::List {
            get: |t| &t.$field,
            set: |t, v| t.$field = v,
        }
    };
}

macro_rules! number {
    ($field:ident) => {
        FieldAccess::Number {
            get: |t| t.$field,
            set: |t, v| t.$field = v,
        }
    };
}

/// Resolve an accessor name (case-sensitive, as stored in the catalog).
pub fn lookup(accessor: &str) -> Option<FieldAccess> {
    Some(match accessor {
        "Album" => text!(album),
        "AlbumArtists" => list!(album_artists),
        "AlbumArtistsSort" => list!(album_artists_sort),
        "AmazonID" => text!(amazon_id),
        "Artists" => list!(artists),
        "Comment" => text!(comment),
        "Composers" => list!(composers),
        "ComposersSort" => list!(composers_sort),
        "Conductor" => text!(conductor),
        "Copyright" => text!(copyright),
        "Description" => text!(description),
        "Disc" => number!(disc),
        "DiscCount" => number!(disc_count),
        "Genres" => list!(genres),
        "Lyrics" => text!(lyrics),
        "Publisher" => text!(publisher),
        "RemixedBy" => text!(remixed_by),
        "Subtitle" => text!(subtitle),
        "Title" => text!(title),
        "TitleSort" => text!(title_sort),
        "Track" => number!(track),
        "TrackCount" => number!(track_count),
        "Year" => number!(year),

        "FirstArtist" => FieldAccess::ReadOnly(|t| t.artists.first().cloned().unwrap_or_default()),
        "JoinedArtists" => FieldAccess::ReadOnly(|t| t.artists.join("; ")),
        "FirstGenre" => FieldAccess::ReadOnly(|t| t.genres.first().cloned().unwrap_or_default()),
        "JoinedGenres" => FieldAccess::ReadOnly(|t| t.genres.join("; ")),
        _ => return None,
    })
}

/// Read a field of the entry's standard tag as display text.
pub fn get(accessor: &str, entry: &FileEntry) -> String {
    get_from(accessor, &entry.tag.standard())
}

pub fn get_from(accessor: &str, tag: &StandardTag) -> String {
    match lookup(accessor) {
        Some(FieldAccess::Text { get, .. }) => get(tag).unwrap_or_default().to_string(),
        Some(FieldAccess::List { get, .. }) => get(tag).join(", "),
        Some(FieldAccess::Number { get, .. }) => {
            get(tag).map(|n| n.to_string()).unwrap_or_default()
        }
        Some(FieldAccess::ReadOnly(get)) => get(tag),
        None => String::new(),
    }
}

/// Write `value` into `field` of the file's tag, coercing by accessor type.
/// An ID3 tag sees the new frame immediately.
pub fn set(value: Option<&str>, tag: &mut TagFile, field: &StandardField) {
    tag.edit_standard(|standard| set_on(value, standard, field));
}

/// [`set`] against a detached [`StandardTag`].
pub fn set_on(value: Option<&str>, tag: &mut StandardTag, field: &StandardField) {
    match lookup(field.accessor) {
        Some(FieldAccess::Text { set, .. }) => set(tag, value.map(str::to_string)),
        Some(FieldAccess::List { set, .. }) => set(
            tag,
            value
                .filter(|v| !v.is_empty())
                .map(|v| vec![v.to_string()])
                .unwrap_or_default(),
        ),
        Some(FieldAccess::Number { set, .. }) => {
            set(tag, value.and_then(|v| v.trim().parse::<u32>().ok()))
        }
        Some(FieldAccess::ReadOnly(_)) | None => {}
    }
}

/// Apply one value to several files. Each entry is independent.
pub fn set_many(value: Option<&str>, entries: &mut [FileEntry], field: &StandardField) {
    for entry in entries {
        set(value, &mut entry.tag, field);
    }
}
