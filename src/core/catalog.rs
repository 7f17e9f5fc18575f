//! core/catalog.rs
//! The standard field catalog and the picture type table.
//!
//! Both tables are static: built into the binary, never configured or persisted.

/// How a standard field is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Unsigned integer (track, disc, year...)
    UInt,
    /// Single-line text
    String,
    /// List of strings; edited as one value
    StringList,
    /// Multi-line text (comment, lyrics)
    TextArea,
}

/// One row of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardField {
    /// Column header / picker label.
    pub display_name: &'static str,
    /// Accessor name understood by [`crate::core::accessor`].
    pub accessor: &'static str,
    pub kind: ValueKind,
}

const fn field(
    display_name: &'static str,
    accessor: &'static str,
    kind: ValueKind,
) -> StandardField {
    StandardField {
        display_name,
        accessor,
        kind,
    }
}

pub const STANDARD_FIELDS: &[StandardField] = &[
    field("Album", "Album", ValueKind::String),
    field("Album Artists", "AlbumArtists", ValueKind::StringList),
    field("Album Artists (Sort by)", "AlbumArtistsSort", ValueKind::StringList),
    field("Amazon ID", "AmazonID", ValueKind::String),
    field("Artists", "Artists", ValueKind::StringList),
    field("Comment", "Comment", ValueKind::TextArea),
    field("Composers", "Composers", ValueKind::StringList),
    field("Composers (Sort by)", "ComposersSort", ValueKind::StringList),
    field("Conductor", "Conductor", ValueKind::String),
    field("Copyright", "Copyright", ValueKind::String),
    field("Description", "Description", ValueKind::TextArea),
    field("Disc", "Disc", ValueKind::UInt),
    field("Disc count", "DiscCount", ValueKind::UInt),
    field("Genres", "Genres", ValueKind::StringList),
    field("Lyrics", "Lyrics", ValueKind::TextArea),
    field("Publisher", "Publisher", ValueKind::String),
    field("Remixed By", "RemixedBy", ValueKind::String),
    field("Subtitle", "Subtitle", ValueKind::String),
    field("Title", "Title", ValueKind::String),
    field("Title (Sort by)", "TitleSort", ValueKind::String),
    field("Track", "Track", ValueKind::UInt),
    field("Track count", "TrackCount", ValueKind::UInt),
    field("Year", "Year", ValueKind::UInt),
];

pub fn find_by_accessor(accessor: &str) -> Option<&'static StandardField> {
    STANDARD_FIELDS.iter().find(|f| f.accessor == accessor)
}

/// Lookup used by the CLI: accepts either the display name or the accessor name.
pub fn find(name: &str) -> Option<&'static StandardField> {
    STANDARD_FIELDS
        .iter()
        .find(|f| {
            f.accessor.eq_ignore_ascii_case(name) || f.display_name.eq_ignore_ascii_case(name)
        })
}

/// Picture type code (ID3 APIC / FLAC picture block) and its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PictureKind {
    pub code: u8,
    pub description: &'static str,
}

const fn picture(code: u8, description: &'static str) -> PictureKind {
    PictureKind { code, description }
}

/// Ordered for a picker: alphabetical by label, not by code.
pub const PICTURE_TYPES: &[PictureKind] = &[
    picture(8, "Artist image"),
    picture(3, "Front cover"),
    picture(4, "Back cover"),
    picture(10, "Band/orchestra image"),
    picture(19, "Band/performer logo"),
    picture(17, "Large, colored fish"),
    picture(11, "Composer"),
    picture(9, "Conductor"),
    picture(15, "During artist's performance"),
    picture(14, "During track's recording"),
    picture(1, "File Icon"),
    picture(18, "Illustration"),
    picture(7, "Lead artist"),
    picture(5, "Leaflet page"),
    picture(12, "Lyricist"),
    picture(6, "Media (album or disk itself)"),
    picture(16, "Movie screen capture"),
    picture(255, "Not a Picture (another file type)"),
    picture(0, "Other"),
    picture(2, "Other file icon"),
    picture(20, "Publisher logo"),
    picture(13, "Recording location"),
];

pub fn picture_type_description(code: u8) -> Option<&'static str> {
    PICTURE_TYPES
        .iter()
        .find(|p| p.code == code)
        .map(|p| p.description)
}
