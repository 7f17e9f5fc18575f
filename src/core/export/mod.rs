//! core/export/mod.rs
//!
//! Serialize loaded files to JSON or CSV.
//!
//! Two knobs decide what comes out:
//! - [`ExportMode`]: which layers are included (standard fields, raw native
//!   tags, start/end wrapper tags, custom metadata)
//! - [`BinaryPolicy`]: what happens to byte payloads (omit, number arrays, base64)
//!
//! A [`Resolver`] combines the two and is consulted while the JSON graph is built.

mod native;

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Map, Value, json};
use tracing::{debug, info};

use super::batch::{self, BatchReport, CancelFlag, Progress};
use super::catalog::{STANDARD_FIELDS, picture_type_description};
use super::csv;
use super::custom::{self, MetadataEntry};
use super::error::ParseNameError;
use super::family::ContainerFamily;
use super::tags::{Layout, NativeTag, StandardTag};
use super::types::FileEntry;

/// Which layers of a file are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportMode {
    /// Standard fields and pictures only.
    #[default]
    Common,
    /// Standard fields plus every native tag.
    AllTaglib,
    /// Native tags only, in their format-specific shape.
    AllTaglibSpecificOnly,
    /// Everything, plus start/end wrapper tags and the custom metadata entries.
    AllApp,
}

impl ExportMode {
    pub fn name(self) -> &'static str {
        match self {
            ExportMode::Common => "common",
            ExportMode::AllTaglib => "all-taglib",
            ExportMode::AllTaglibSpecificOnly => "all-taglib-specific-only",
            ExportMode::AllApp => "all-app",
        }
    }
}

impl fmt::Display for ExportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportMode {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_ascii_lowercase().replace('_', "-");
        [
            ExportMode::Common,
            ExportMode::AllTaglib,
            ExportMode::AllTaglibSpecificOnly,
            ExportMode::AllApp,
        ]
        .into_iter()
        .find(|m| m.name() == wanted)
        .ok_or_else(|| ParseNameError::new("export mode", s))
    }
}

/// What to do with byte payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BinaryPolicy {
    /// Drop every binary-bearing field (and the Xiph picture block).
    #[default]
    Omit,
    /// Keep bytes as JSON number arrays.
    Reference,
    /// Keep bytes as base64 text.
    Base64,
}

impl BinaryPolicy {
    pub fn name(self) -> &'static str {
        match self {
            BinaryPolicy::Omit => "omit",
            BinaryPolicy::Reference => "reference",
            BinaryPolicy::Base64 => "base64",
        }
    }
}

impl fmt::Display for BinaryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BinaryPolicy {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "omit" => Ok(BinaryPolicy::Omit),
            "reference" => Ok(BinaryPolicy::Reference),
            "base64" => Ok(BinaryPolicy::Base64),
            _ => Err(ParseNameError::new("binary policy", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl FromStr for ExportFormat {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(ParseNameError::new("export format", s)),
        }
    }
}

/// Per-field decisions for one export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resolver {
    pub mode: ExportMode,
    pub binary: BinaryPolicy,
}

impl Resolver {
    pub fn new(mode: ExportMode, binary: BinaryPolicy) -> Self {
        Resolver { mode, binary }
    }

    /// JSON form of a byte payload, or `None` to leave the field out.
    pub fn bytes(&self, data: &[u8]) -> Option<Value> {
        match self.binary {
            BinaryPolicy::Omit => None,
            BinaryPolicy::Reference => Some(Value::from(data.to_vec())),
            BinaryPolicy::Base64 => Some(Value::String(STANDARD.encode(data))),
        }
    }

    /// Insert `key: bytes` into `map` unless binaries are omitted.
    pub(crate) fn put_bytes(&self, map: &mut Map<String, Value>, key: &str, data: &[u8]) {
        if let Some(value) = self.bytes(data) {
            map.insert(key.to_string(), value);
        }
    }

    pub fn keep_standard_fields(&self) -> bool {
        self.mode != ExportMode::AllTaglibSpecificOnly
    }

    /// The raw per-format `Tags` array.
    pub fn keep_format_tags(&self) -> bool {
        self.mode != ExportMode::Common
    }

    pub fn keep_wrapper_tags(&self) -> bool {
        self.mode == ExportMode::AllApp
    }

    pub fn keep_custom_metadata(&self) -> bool {
        self.mode == ExportMode::AllApp
    }

    pub fn keep_block_picture(&self) -> bool {
        self.binary != BinaryPolicy::Omit
    }
}

fn opt<T: Into<Value>>(v: Option<T>) -> Value {
    v.map(Into::into).unwrap_or(Value::Null)
}

fn standard_fields(std_tag: &StandardTag, resolver: &Resolver, out: &mut Map<String, Value>) {
    for field in STANDARD_FIELDS {
        let value = match field.accessor {
            "Album" => opt(std_tag.album.clone()),
            "AlbumArtists" => json!(std_tag.album_artists),
            "AlbumArtistsSort" => json!(std_tag.album_artists_sort),
            "AmazonID" => opt(std_tag.amazon_id.clone()),
            "Artists" => json!(std_tag.artists),
            "Comment" => opt(std_tag.comment.clone()),
            "Composers" => json!(std_tag.composers),
            "ComposersSort" => json!(std_tag.composers_sort),
            "Conductor" => opt(std_tag.conductor.clone()),
            "Copyright" => opt(std_tag.copyright.clone()),
            "Description" => opt(std_tag.description.clone()),
            "Disc" => opt(std_tag.disc),
            "DiscCount" => opt(std_tag.disc_count),
            "Genres" => json!(std_tag.genres),
            "Lyrics" => opt(std_tag.lyrics.clone()),
            "Publisher" => opt(std_tag.publisher.clone()),
            "RemixedBy" => opt(std_tag.remixed_by.clone()),
            "Subtitle" => opt(std_tag.subtitle.clone()),
            "Title" => opt(std_tag.title.clone()),
            "TitleSort" => opt(std_tag.title_sort.clone()),
            "Track" => opt(std_tag.track),
            "TrackCount" => opt(std_tag.track_count),
            "Year" => opt(std_tag.year),
            _ => continue,
        };
        out.insert(field.accessor.to_string(), value);
    }

    let pictures: Vec<Value> = std_tag
        .pictures
        .iter()
        .map(|p| {
            let mut map = Map::new();
            map.insert("Type".into(), json!(p.picture_type));
            map.insert(
                "TypeDescription".into(),
                opt(picture_type_description(p.picture_type)),
            );
            map.insert("MimeType".into(), json!(p.mime_type));
            map.insert("Description".into(), json!(p.description));
            resolver.put_bytes(&mut map, "Data", &p.data);
            Value::Object(map)
        })
        .collect();
    out.insert("Pictures".into(), Value::Array(pictures));
}

fn custom_entry(family: ContainerFamily, entry: &MetadataEntry, resolver: &Resolver) -> Value {
    let mut map = Map::new();
    map.insert("Family".into(), json!(family));
    map.insert("Key".into(), json!(entry.key));
    map.insert("MeanKey".into(), opt(entry.mean_key.clone()));
    match entry.binary.as_deref().and_then(|b| resolver.bytes(b)) {
        Some(bytes) => {
            map.insert("Binary".into(), bytes);
        }
        None => {
            map.insert("Values".into(), json!(entry.values));
        }
    }
    Value::Object(map)
}

fn custom_metadata(file: &FileEntry, resolver: &Resolver) -> Value {
    let include_binary = resolver.binary != BinaryPolicy::Omit;
    let entries = file
        .tag
        .families()
        .into_iter()
        .filter_map(|family| {
            custom::enumerate(family, &file.tag, include_binary)
                .ok()
                .map(|entries| (family, entries))
        })
        .flat_map(|(family, entries)| {
            entries
                .into_iter()
                .map(move |entry| custom_entry(family, &entry, resolver))
        })
        .collect();
    Value::Array(entries)
}

/// The JSON object for one file.
pub fn file_to_json(file: &FileEntry, resolver: &Resolver) -> Value {
    let mut out = Map::new();
    out.insert("FileName".into(), json!(file.name));
    out.insert("Id".into(), json!(file.id));
    out.insert("TagTypes".into(), json!(file.tag.families()));

    if resolver.keep_standard_fields() {
        standard_fields(&file.tag.standard(), resolver, &mut out);
    }

    if resolver.keep_format_tags() {
        let tags = file
            .tag
            .tags()
            .iter()
            .map(|t| native::tag_to_json(t, resolver))
            .collect();
        out.insert("Tags".into(), Value::Array(tags));
    }

    if resolver.keep_wrapper_tags() && file.tag.layout() == Layout::NonContainer {
        let wrap = |tags: Vec<&NativeTag>| {
            let tags: Vec<Value> = tags
                .into_iter()
                .map(|t| native::tag_to_json(t, resolver))
                .collect();
            json!({ "Tags": tags })
        };
        out.insert("StartTag".into(), wrap(file.tag.start_tags()));
        out.insert("EndTag".into(), wrap(file.tag.end_tags()));
    }

    if resolver.keep_custom_metadata() {
        out.insert("CustomMetadata".into(), custom_metadata(file, resolver));
    }

    Value::Object(out)
}

/// Build the JSON graph of every file, one batch step per file.
pub fn collect(
    files: &[FileEntry],
    resolver: &Resolver,
    cancel: &CancelFlag,
    progress: impl FnMut(&Progress),
) -> (Vec<Value>, BatchReport) {
    let mut values = Vec::with_capacity(files.len());
    let report = batch::run("Exporting metadata", files, cancel, progress, |file| {
        values.push(file_to_json(file, resolver));
        Ok::<(), std::convert::Infallible>(())
    });
    (values, report)
}

/// Export in the requested format.
pub fn export_files(
    files: &[FileEntry],
    format: ExportFormat,
    resolver: &Resolver,
    cancel: &CancelFlag,
    progress: impl FnMut(&Progress),
) -> Result<(String, BatchReport), serde_json::Error> {
    let (values, report) = collect(files, resolver, cancel, progress);
    let text = match format {
        ExportFormat::Json => serde_json::to_string_pretty(&values)?,
        ExportFormat::Csv => csv::render(&csv::flatten(&values)),
    };
    info!(
        files = values.len(),
        mode = %resolver.mode,
        binary = %resolver.binary,
        ?format,
        "export finished"
    );
    debug!(bytes = text.len(), "export size");
    Ok((text, report))
}
