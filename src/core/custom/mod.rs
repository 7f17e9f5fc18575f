//! core/custom/mod.rs
//!
//! Custom metadata adapter: one interface over every family's "anything that is
//! not a standard field" storage.
//!
//! - [`enumerate`] turns a native tag into [`MetadataEntry`]s.
//! - [`edit_value`], [`rename_key`], [`rename_mean_key`] and [`delete`] act on
//!   the live tag through the entry's [`Locator`] and update the entry in place.
//! - [`apply_new_entry`] creates one entry in the family's natural shape.
//!
//! Every operation returns a [`Change`]. `Change::Structure` means entries
//! enumerated earlier from the same tag may be stale; enumerate again.

mod ape;
mod apple;
mod asf;
mod id3v2;
mod matroska;
mod png;
mod xiph;

use std::str::FromStr;

use tracing::{debug, warn};

use super::error::{AdapterError, Operation, ParseNameError};
use super::family::ContainerFamily;
use super::tags::{NativeTag, TagFile};
use super::types::EntryId;

pub use id3v2::{Id3FrameKind, Id3Locator};

/// Text shown in place of a binary value.
pub const BINARY_PLACEHOLDER: &str = "Binary data";

/// What an entry lets the caller do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub edit_value: bool,
    pub rename_key: bool,
    pub rename_mean_key: bool,
    pub delete: bool,
}

impl Capabilities {
    pub const ALL: Capabilities = Capabilities {
        edit_value: true,
        rename_key: true,
        rename_mean_key: true,
        delete: true,
    };
    /// Edit, rename and delete; the family has no mean-key.
    pub const FLAT: Capabilities = Capabilities {
        rename_mean_key: false,
        ..Capabilities::ALL
    };
    pub const RENAME_DELETE: Capabilities = Capabilities {
        edit_value: false,
        rename_key: true,
        rename_mean_key: false,
        delete: true,
    };
    pub const DELETE_ONLY: Capabilities = Capabilities {
        edit_value: false,
        rename_key: false,
        rename_mean_key: false,
        delete: true,
    };
    pub const EDIT_ONLY: Capabilities = Capabilities {
        edit_value: true,
        rename_key: false,
        rename_mean_key: false,
        delete: false,
    };

    pub fn allows(&self, op: Operation) -> bool {
        match op {
            Operation::EditValue => self.edit_value,
            Operation::RenameKey => self.rename_key,
            Operation::RenameMeanKey => self.rename_mean_key,
            Operation::Delete => self.delete,
        }
    }
}

/// Where an entry lives inside its native tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Id3(Id3Locator),
    Apple(AppleLocator),
    Xiph { field: String },
    /// `group: None` is a flat simple tag named `key`; otherwise `key` is a
    /// child of group `group`.
    Matroska { key: String, group: Option<String> },
    Asf { name: String },
    Ape { key: String },
    Png { keyword: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppleLocator {
    Flat { box_type: super::tags::apple::BoxType },
    DashBox { mean: String, name: String },
}

impl Locator {
    pub fn family(&self) -> ContainerFamily {
        match self {
            Locator::Id3(_) => ContainerFamily::Id3,
            Locator::Apple(_) => ContainerFamily::Apple,
            Locator::Xiph { .. } => ContainerFamily::Xiph,
            Locator::Matroska { .. } => ContainerFamily::Matroska,
            Locator::Asf { .. } => ContainerFamily::Asf,
            Locator::Ape { .. } => ContainerFamily::Ape,
            Locator::Png { .. } => ContainerFamily::Png,
        }
    }
}

/// One editable custom metadata item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEntry {
    pub id: EntryId,
    pub key: String,
    /// Text values. Just [`BINARY_PLACEHOLDER`] when `binary` is set.
    pub values: Vec<String>,
    /// `None`: the family has no grouping. `Some("")`: ungrouped in a family that has it.
    pub mean_key: Option<String>,
    pub binary: Option<Vec<u8>>,
    pub capabilities: Capabilities,
    pub locator: Locator,
}

impl MetadataEntry {
    pub(crate) fn text(
        key: impl Into<String>,
        values: Vec<String>,
        capabilities: Capabilities,
        locator: Locator,
    ) -> Self {
        MetadataEntry {
            id: EntryId::new(),
            key: key.into(),
            values,
            mean_key: None,
            binary: None,
            capabilities,
            locator,
        }
    }

    pub(crate) fn binary(
        key: impl Into<String>,
        payload: Vec<u8>,
        capabilities: Capabilities,
        locator: Locator,
    ) -> Self {
        MetadataEntry {
            binary: Some(payload),
            ..Self::text(key, vec![BINARY_PLACEHOLDER.to_string()], capabilities, locator)
        }
    }

    pub(crate) fn with_mean_key(mut self, mean_key: impl Into<String>) -> Self {
        self.mean_key = Some(mean_key.into());
        self
    }

    pub fn family(&self) -> ContainerFamily {
        self.locator.family()
    }

    pub fn is_binary(&self) -> bool {
        self.binary.is_some()
    }

    /// Values joined for single-line display.
    pub fn display_value(&self) -> String {
        self.values.join("; ")
    }

    fn require(&self, op: Operation) -> Result<(), AdapterError> {
        if self.capabilities.allows(op) {
            Ok(())
        } else {
            Err(AdapterError::NotPermitted(op))
        }
    }
}

/// What an operation did to the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// Only the entry's value changed; other entries stay valid.
    Value,
    /// Entries were added, removed or moved; enumerate again.
    Structure,
}

/// Which ID3 frame [`apply_new_entry`] creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Id3FrameHint {
    /// TXXX
    #[default]
    UserText,
    /// PRIV, value stored as UTF-8 bytes
    Private,
    /// COMM with the key as description
    Comment,
}

impl FromStr for Id3FrameHint {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "user-text" | "txxx" => Ok(Id3FrameHint::UserText),
            "private" | "priv" => Ok(Id3FrameHint::Private),
            "comment" | "comm" => Ok(Id3FrameHint::Comment),
            _ => Err(ParseNameError::new("ID3 frame hint", s)),
        }
    }
}

fn absent(family: ContainerFamily) -> AdapterError {
    if NativeTag::empty(family).is_none() {
        AdapterError::Unsupported(family)
    } else {
        AdapterError::FamilyAbsent(family)
    }
}

/// Custom entries of one family, in the tag's own order.
///
/// Errors with [`AdapterError::FamilyAbsent`] when the file has no such tag,
/// which is distinct from an empty tag (`Ok(vec![])`).
pub fn enumerate(
    family: ContainerFamily,
    file: &TagFile,
    include_binary: bool,
) -> Result<Vec<MetadataEntry>, AdapterError> {
    let entries = match file.tag(family).ok_or_else(|| absent(family))? {
        NativeTag::Id3(tag) => id3v2::enumerate(tag, include_binary),
        NativeTag::Apple(tag) => apple::enumerate(tag, include_binary),
        NativeTag::Xiph(tag) => xiph::enumerate(tag, include_binary),
        NativeTag::Matroska(tag) => matroska::enumerate(tag, include_binary),
        NativeTag::Asf(tag) => asf::enumerate(tag, include_binary),
        NativeTag::Ape(tag) => ape::enumerate(tag, include_binary),
        NativeTag::Png(tag) => png::enumerate(tag),
    };
    debug!(family = %family, count = entries.len(), include_binary, "enumerated custom metadata");
    Ok(entries)
}

/// Create one new entry, adding the family's tag if the file has none.
pub fn apply_new_entry(
    family: ContainerFamily,
    file: &mut TagFile,
    key: &str,
    value: &str,
    mean_key: Option<&str>,
    hint: Id3FrameHint,
) -> Result<(), AdapterError> {
    if key.is_empty() {
        return Err(AdapterError::rejected("key", key));
    }
    let native = file
        .tag_mut(family, true)
        .ok_or(AdapterError::Unsupported(family))?;

    let result = match native {
        NativeTag::Id3(tag) => id3v2::apply(tag, key, value, hint),
        NativeTag::Apple(tag) => apple::apply(tag, key, value, mean_key),
        NativeTag::Xiph(tag) => xiph::apply(tag, key, value),
        NativeTag::Matroska(tag) => matroska::apply(tag, key, value, mean_key),
        NativeTag::Asf(tag) => asf::apply(tag, key, value),
        NativeTag::Ape(tag) => ape::apply(tag, key, value),
        NativeTag::Png(tag) => png::apply(tag, key, value),
    };

    match &result {
        Ok(()) => debug!(family = %family, key, "added custom entry"),
        Err(e) => warn!(family = %family, key, error = %e, "could not add custom entry"),
    }
    result
}

fn native_mut<'a>(
    file: &'a mut TagFile,
    entry: &MetadataEntry,
) -> Result<&'a mut NativeTag, AdapterError> {
    let family = entry.family();
    file.tag_mut(family, false).ok_or_else(|| absent(family))
}

fn logged(
    op: Operation,
    entry: &MetadataEntry,
    result: Result<Change, AdapterError>,
) -> Result<Change, AdapterError> {
    let family = entry.family();
    match &result {
        Ok(change) => {
            debug!(op = %op, %family, key = %entry.key, ?change, "custom entry updated")
        }
        Err(e) => {
            warn!(op = %op, %family, key = %entry.key, error = %e, "custom entry update failed")
        }
    }
    result
}

/// Replace the entry's value.
pub fn edit_value(
    file: &mut TagFile,
    entry: &mut MetadataEntry,
    value: &str,
) -> Result<Change, AdapterError> {
    entry.require(Operation::EditValue)?;
    let result = match native_mut(file, entry)? {
        NativeTag::Id3(tag) => id3v2::edit_value(tag, entry, value),
        NativeTag::Apple(tag) => apple::edit_value(tag, entry, value),
        NativeTag::Xiph(tag) => xiph::edit_value(tag, entry, value),
        NativeTag::Matroska(tag) => matroska::edit_value(tag, entry, value),
        NativeTag::Asf(tag) => asf::edit_value(tag, entry, value),
        NativeTag::Ape(tag) => ape::edit_value(tag, entry, value),
        NativeTag::Png(tag) => png::edit_value(tag, entry, value),
    };
    logged(Operation::EditValue, entry, result)
}

/// Move the entry to `new_key`, keeping its value. An existing entry under
/// `new_key` is overwritten.
pub fn rename_key(
    file: &mut TagFile,
    entry: &mut MetadataEntry,
    new_key: &str,
) -> Result<Change, AdapterError> {
    entry.require(Operation::RenameKey)?;
    if new_key.is_empty() {
        return Err(AdapterError::rejected("key", new_key));
    }
    if new_key == entry.key {
        return Ok(Change::Value);
    }
    let result = match native_mut(file, entry)? {
        NativeTag::Id3(tag) => id3v2::rename_key(tag, entry, new_key),
        NativeTag::Apple(tag) => apple::rename_key(tag, entry, new_key),
        NativeTag::Xiph(tag) => xiph::rename_key(tag, entry, new_key),
        NativeTag::Matroska(tag) => matroska::rename_key(tag, entry, new_key),
        NativeTag::Asf(tag) => asf::rename_key(tag, entry, new_key),
        NativeTag::Ape(tag) => ape::rename_key(tag, entry, new_key),
        NativeTag::Png(_) => Err(AdapterError::NotPermitted(Operation::RenameKey)),
    };
    logged(Operation::RenameKey, entry, result)
}

/// Move the entry to another group. For Matroska an empty `new_mean` ungroups it.
pub fn rename_mean_key(
    file: &mut TagFile,
    entry: &mut MetadataEntry,
    new_mean: &str,
) -> Result<Change, AdapterError> {
    entry.require(Operation::RenameMeanKey)?;
    if entry.mean_key.as_deref() == Some(new_mean) {
        return Ok(Change::Value);
    }
    let result = match native_mut(file, entry)? {
        NativeTag::Apple(tag) => apple::rename_mean_key(tag, entry, new_mean),
        NativeTag::Matroska(tag) => matroska::rename_mean_key(tag, entry, new_mean),
        _ => Err(AdapterError::NotPermitted(Operation::RenameMeanKey)),
    };
    logged(Operation::RenameMeanKey, entry, result)
}

/// Remove the entry from the tag.
pub fn delete(file: &mut TagFile, entry: &mut MetadataEntry) -> Result<Change, AdapterError> {
    entry.require(Operation::Delete)?;
    let result = match native_mut(file, entry)? {
        NativeTag::Id3(tag) => id3v2::delete(tag, entry),
        NativeTag::Apple(tag) => apple::delete(tag, entry),
        NativeTag::Xiph(tag) => xiph::delete(tag, entry),
        NativeTag::Matroska(tag) => matroska::delete(tag, entry),
        NativeTag::Asf(tag) => asf::delete(tag, entry),
        NativeTag::Ape(tag) => ape::delete(tag, entry),
        NativeTag::Png(_) => Err(AdapterError::NotPermitted(Operation::Delete)),
    };
    logged(Operation::Delete, entry, result)
}

/// Error for an entry whose locator does not belong to the tag it was dispatched to.
pub(crate) fn stale(entry: &MetadataEntry) -> AdapterError {
    AdapterError::Missing(entry.key.clone())
}
