//! Core data types shared between the tag layer, the adapters and the CLI.
//!
//! Rule of thumb:
//! - `FileEntry` owns everything about one loaded file (bytes + tag object)
//! - No filesystem code here; `library` does the disk IO
//!
//! Ids are session-unique (random v4 UUIDs). They are not persisted anywhere.

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use super::error::LoadError;
use super::tags::{self, TagFile};

/// Session id of a loaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FileId(Uuid);

impl FileId {
    pub fn new() -> Self {
        FileId(Uuid::new_v4())
    }
}

impl Default for FileId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Session id of one custom metadata entry, generated when the entry is enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        EntryId(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One loaded file.
///
/// - `tag` is mutated in place by the accessor and the custom metadata adapter.
/// - `buffer` holds the bytes as last loaded or committed.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub id: FileId,
    /// Display name (file name, no directories).
    pub name: String,
    pub tag: TagFile,
    buffer: Vec<u8>,
}

impl FileEntry {
    pub fn new(name: impl Into<String>, tag: TagFile, buffer: Vec<u8>) -> Self {
        FileEntry {
            id: FileId::new(),
            name: name.into(),
            tag,
            buffer,
        }
    }

    /// Parse `bytes` into a tag object. See [`tags::load`] for what is understood.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, LoadError> {
        let name = name.into();
        let tag = tags::load(&name, &bytes)?;
        Ok(Self::new(name, tag, bytes))
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Lowercased extension, if the name has one.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }

    /// Bytes of the file with current tag state applied. Does not change the entry.
    pub fn render(&self) -> Result<Vec<u8>, LoadError> {
        self.tag.render(&self.buffer)
    }

    /// Render, then make the result the entry's new buffer.
    pub fn commit(&mut self) -> Result<&[u8], LoadError> {
        let bytes = self.render()?;
        self.tag.commit();
        self.buffer = bytes;
        Ok(&self.buffer)
    }
}
