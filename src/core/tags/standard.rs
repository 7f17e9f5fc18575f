//! core/tags/standard.rs
//! The unified ("standard") tag: one field per catalog row plus embedded pictures.
//!
//! Rule of thumb, same as the rest of core:
//! - boring bag of data
//! - `None` / empty Vec means "field not set"

/// An embedded picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    /// ID3/FLAC picture type code, see [`crate::core::catalog::PICTURE_TYPES`].
    pub picture_type: u8,
    pub mime_type: String,
    pub description: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StandardTag {
    pub title: Option<String>,
    pub title_sort: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,

    pub artists: Vec<String>,
    pub album: Option<String>,
    pub album_artists: Vec<String>,
    pub album_artists_sort: Vec<String>,
    pub composers: Vec<String>,
    pub composers_sort: Vec<String>,
    pub conductor: Option<String>,
    pub remixed_by: Option<String>,

    pub track: Option<u32>,
    pub track_count: Option<u32>,
    pub disc: Option<u32>,
    pub disc_count: Option<u32>,
    pub year: Option<u32>,

    pub genres: Vec<String>,
    pub comment: Option<String>,
    pub lyrics: Option<String>,
    pub copyright: Option<String>,
    pub publisher: Option<String>,
    pub amazon_id: Option<String>,

    pub pictures: Vec<Picture>,
}

impl StandardTag {
    /// True when no field and no picture is set.
    pub fn is_empty(&self) -> bool {
        *self == StandardTag::default()
    }
}
