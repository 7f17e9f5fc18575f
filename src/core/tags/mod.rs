//! core/tags/mod.rs
//!
//! The tag object graph owned by a loaded file.
//!
//! - [`TagFile`] = the native tags actually present. Its [`StandardTag`] view
//!   is read from and written into the ID3 frames.
//! - [`NativeTag`] = one format-specific tag (ID3 via the `id3` crate, the rest
//!   as small typed models in this module).
//! - Only ID3 is decoded from / encoded to bytes; see [`load`] and
//!   [`TagFile::render`].

pub mod ape;
pub mod apple;
mod art;
pub mod asf;
pub mod matroska;
pub mod png;
mod read;
pub mod standard;
mod util;
mod write;
pub mod xiph;

use std::io::Cursor;

use id3::{Tag, Version};
use tracing::debug;

use super::error::LoadError;
use super::family::{ContainerFamily, classify};
use ape::ApeTag;
use apple::AppleTag;
use asf::AsfTag;
use matroska::MatroskaTag;
use png::PngTag;
use xiph::XiphComment;

pub use read::standard_from_id3;
pub use standard::{Picture, StandardTag};
pub(crate) use art::picture_type_code;
pub(crate) use util::{id3v2_len, rewrite_frames};

/// Where a file keeps its tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Raw streams (MP3, AAC...) with tags glued to the start and/or end.
    NonContainer,
    /// Formats where tags live inside the container structure.
    Container,
}

/// One format-specific tag.
#[derive(Debug, Clone)]
pub enum NativeTag {
    Id3(Tag),
    Apple(AppleTag),
    Xiph(XiphComment),
    Matroska(MatroskaTag),
    Asf(AsfTag),
    Ape(ApeTag),
    Png(PngTag),
}

impl NativeTag {
    /// An empty tag of `family`, or `None` for families without a model.
    pub fn empty(family: ContainerFamily) -> Option<NativeTag> {
        Some(match family {
            ContainerFamily::Id3 => NativeTag::Id3(Tag::with_version(Version::Id3v24)),
            ContainerFamily::Apple => NativeTag::Apple(AppleTag::new()),
            ContainerFamily::Xiph => NativeTag::Xiph(XiphComment::new()),
            ContainerFamily::Matroska => NativeTag::Matroska(MatroskaTag::new()),
            ContainerFamily::Asf => NativeTag::Asf(AsfTag::new()),
            ContainerFamily::Ape => NativeTag::Ape(ApeTag::new()),
            ContainerFamily::Png => NativeTag::Png(PngTag::new()),
            ContainerFamily::Riff | ContainerFamily::Xmp => return None,
        })
    }

    pub fn family(&self) -> ContainerFamily {
        match self {
            NativeTag::Id3(_) => ContainerFamily::Id3,
            NativeTag::Apple(_) => ContainerFamily::Apple,
            NativeTag::Xiph(_) => ContainerFamily::Xiph,
            NativeTag::Matroska(_) => ContainerFamily::Matroska,
            NativeTag::Asf(_) => ContainerFamily::Asf,
            NativeTag::Ape(_) => ContainerFamily::Ape,
            NativeTag::Png(_) => ContainerFamily::Png,
        }
    }

    /// Descriptor string, the input [`classify`] understands.
    pub fn type_descriptor(&self) -> &'static str {
        match self {
            NativeTag::Id3(_) => "tag/id3v2",
            NativeTag::Apple(_) => "tag/apple",
            NativeTag::Xiph(_) => "tag/xiph",
            NativeTag::Matroska(_) => "tag/matroska",
            NativeTag::Asf(_) => "tag/asf",
            NativeTag::Ape(_) => "tag/ape",
            NativeTag::Png(_) => "tag/png",
        }
    }
}

/// The tag object of one file.
///
/// When the file has an ID3 tag, its frames are the only copy of the standard
/// fields: [`TagFile::standard`] reads them and [`TagFile::edit_standard`]
/// writes them straight through.
#[derive(Debug, Clone)]
pub struct TagFile {
    /// Standard fields of a file with no ID3 tag to hold them.
    detached: StandardTag,
    layout: Layout,
    tags: Vec<NativeTag>,
    dirty: bool,
}

impl TagFile {
    pub fn new(layout: Layout) -> Self {
        TagFile {
            detached: StandardTag::default(),
            layout,
            tags: Vec::new(),
            dirty: false,
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn tags(&self) -> &[NativeTag] {
        &self.tags
    }

    /// Add a native tag, replacing any existing tag of the same family in place.
    pub fn push_tag(&mut self, tag: NativeTag) {
        let family = tag.family();
        match self.tags.iter_mut().find(|t| t.family() == family) {
            Some(existing) => *existing = tag,
            None => self.tags.push(tag),
        }
        self.dirty = true;
    }

    pub fn tag(&self, family: ContainerFamily) -> Option<&NativeTag> {
        self.tags.iter().find(|t| t.family() == family)
    }

    /// Mutable tag of `family`. With `create`, an empty one is added when
    /// missing (never for RIFF/XMP).
    ///
    /// Handing out the tag marks the file dirty.
    pub fn tag_mut(&mut self, family: ContainerFamily, create: bool) -> Option<&mut NativeTag> {
        let index = self.slot(family, create)?;
        self.dirty = true;
        self.tags.get_mut(index)
    }

    fn slot(&mut self, family: ContainerFamily, create: bool) -> Option<usize> {
        match self.tags.iter().position(|t| t.family() == family) {
            Some(i) => Some(i),
            None if create => {
                let tag = NativeTag::empty(family)?;
                debug!(family = %family, "created empty tag");
                self.tags.push(tag);
                Some(self.tags.len() - 1)
            }
            None => None,
        }
    }

    pub fn remove_tag(&mut self, family: ContainerFamily) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t.family() != family);
        let removed = self.tags.len() != before;
        self.dirty |= removed;
        removed
    }

    pub fn families(&self) -> Vec<ContainerFamily> {
        self.tags.iter().map(NativeTag::family).collect()
    }

    /// Best-guess family for custom metadata: the first tag whose descriptor classifies.
    pub fn suggested_family(&self) -> Option<ContainerFamily> {
        self.tags.iter().find_map(|t| classify(t.type_descriptor()))
    }

    /// Tags glued to the start of a non-container file.
    pub fn start_tags(&self) -> Vec<&NativeTag> {
        self.edge_tags(ContainerFamily::Id3)
    }

    /// Tags glued to the end of a non-container file.
    pub fn end_tags(&self) -> Vec<&NativeTag> {
        self.edge_tags(ContainerFamily::Ape)
    }

    fn edge_tags(&self, family: ContainerFamily) -> Vec<&NativeTag> {
        match self.layout {
            Layout::NonContainer => self.tags.iter().filter(|t| t.family() == family).collect(),
            Layout::Container => Vec::new(),
        }
    }

    /// The standard fields as they are right now.
    pub fn standard(&self) -> StandardTag {
        match self.tag(ContainerFamily::Id3) {
            Some(NativeTag::Id3(tag)) => standard_from_id3(tag),
            _ => self.detached.clone(),
        }
    }

    /// Change standard fields. Fields `edit` touches are written to the ID3
    /// frames at once; a non-container file gets an ID3 tag if it had none.
    pub fn edit_standard(&mut self, edit: impl FnOnce(&mut StandardTag)) {
        let before = self.standard();
        let mut after = before.clone();
        edit(&mut after);
        if after == before {
            return;
        }
        self.dirty = true;

        let create = self.layout == Layout::NonContainer;
        match self.slot(ContainerFamily::Id3, create) {
            Some(i) => {
                if let Some(NativeTag::Id3(tag)) = self.tags.get_mut(i) {
                    write::apply_standard(tag, &after, &before);
                }
            }
            None => self.detached = after,
        }
    }

    /// True when something changed since load or the last [`TagFile::commit`].
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// File bytes with the tags re-encoded. Container files are returned as-is.
    pub fn render(&self, buffer: &[u8]) -> Result<Vec<u8>, LoadError> {
        match (self.layout, self.tag(ContainerFamily::Id3)) {
            (Layout::NonContainer, Some(NativeTag::Id3(tag))) => write::render(tag, buffer),
            _ => Ok(buffer.to_vec()),
        }
    }

    /// Mark the current state as saved.
    pub fn commit(&mut self) {
        self.dirty = false;
    }
}

fn extension(name: &str) -> Option<String> {
    name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Build the tag object for a file from its name and bytes.
///
/// - `.lrc` sidecars => container layout, no tags
/// - ID3v2 header or an MPEG-ish extension => non-container, ID3 read from the front
/// - anything else => [`LoadError::Unsupported`]
pub fn load(name: &str, bytes: &[u8]) -> Result<TagFile, LoadError> {
    let ext = extension(name);

    if ext.as_deref() == Some("lrc") {
        return Ok(TagFile::new(Layout::Container));
    }

    let has_id3 = id3v2_len(bytes) > 0;
    if !has_id3 && !matches!(ext.as_deref(), Some("mp3" | "mp2" | "aac")) {
        return Err(LoadError::Unsupported(name.to_string()));
    }

    let mut file = TagFile::new(Layout::NonContainer);
    if has_id3 {
        match Tag::read_from2(Cursor::new(bytes)) {
            Ok(tag) => {
                debug!(file = name, frames = tag.frames().count(), "read ID3 tag");
                file.tags.push(NativeTag::Id3(tag));
            }
            Err(e) if matches!(e.kind, id3::ErrorKind::NoTag) => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use id3::TagLike;

    fn id3_bytes(title: &str) -> Vec<u8> {
        let mut tag = Tag::new();
        tag.set_title(title);
        let mut out = Vec::new();
        tag.write_to(&mut out, Version::Id3v24).unwrap();
        out.extend_from_slice(b"AUDIO");
        out
    }

    #[test]
    fn load_reads_standard_fields() {
        let file = load("a.mp3", &id3_bytes("Oben")).unwrap();
        assert_eq!(file.layout(), Layout::NonContainer);
        assert_eq!(file.standard().title.as_deref(), Some("Oben"));
        assert_eq!(file.families(), [ContainerFamily::Id3]);
        assert_eq!(file.suggested_family(), Some(ContainerFamily::Id3));
        assert!(!file.is_dirty());
    }

    #[test]
    fn untagged_mp3_and_lyrics_load_empty() {
        let mp3 = load("b.mp3", b"\xFF\xFBframes").unwrap();
        assert!(mp3.tags().is_empty());
        let lrc = load("b.lrc", b"[00:01.00]hi").unwrap();
        assert_eq!(lrc.layout(), Layout::Container);
        assert!(matches!(load("c.flac", b"fLaC"), Err(LoadError::Unsupported(_))));
    }

    #[test]
    fn tag_mut_creates_only_modelled_families() {
        let mut file = TagFile::new(Layout::Container);
        assert!(file.tag_mut(ContainerFamily::Xiph, false).is_none());
        assert!(file.tag_mut(ContainerFamily::Xiph, true).is_some());
        assert!(file.tag_mut(ContainerFamily::Riff, true).is_none());
        assert_eq!(file.families(), [ContainerFamily::Xiph]);
    }

    #[test]
    fn standard_edits_reach_the_id3_frames_at_once() {
        let bytes = id3_bytes("Oben");
        let mut file = load("a.mp3", &bytes).unwrap();
        file.edit_standard(|s| s.title = Some("Unten".into()));
        assert!(file.is_dirty());
        match file.tag(ContainerFamily::Id3) {
            Some(NativeTag::Id3(tag)) => assert_eq!(tag.title(), Some("Unten")),
            other => panic!("unexpected {other:?}"),
        }

        let out = file.render(&bytes).unwrap();
        assert!(out.ends_with(b"AUDIO"));
        assert_eq!(load("a.mp3", &out).unwrap().standard().title.as_deref(), Some("Unten"));

        file.commit();
        assert!(!file.is_dirty());
    }

    #[test]
    fn frame_edits_show_in_the_standard_view() {
        let mut file = load("a.mp3", &id3_bytes("Oben")).unwrap();
        if let Some(NativeTag::Id3(tag)) = file.tag_mut(ContainerFamily::Id3, false) {
            tag.set_title("Unten");
        }
        assert_eq!(file.standard().title.as_deref(), Some("Unten"));
    }

    #[test]
    fn untagged_file_gets_an_id3_tag_on_first_edit() {
        let mut mp3 = load("b.mp3", b"\xFF\xFBframes").unwrap();
        mp3.edit_standard(|s| s.track_count = Some(12));
        assert_eq!(mp3.families(), [ContainerFamily::Id3]);
        assert_eq!(mp3.standard().track, None);
        assert_eq!(mp3.standard().track_count, Some(12));

        let mut lrc = load("b.lrc", b"[00:01.00]hi").unwrap();
        lrc.edit_standard(|s| s.lyrics = Some("hi".into()));
        assert!(lrc.tags().is_empty());
        assert_eq!(lrc.standard().lyrics.as_deref(), Some("hi"));
    }

    #[test]
    fn edge_tags_follow_layout() {
        let mut file = TagFile::new(Layout::NonContainer);
        file.push_tag(NativeTag::Ape(ApeTag::new()));
        file.push_tag(NativeTag::empty(ContainerFamily::Id3).unwrap());
        assert_eq!(file.start_tags().len(), 1);
        assert_eq!(file.end_tags().len(), 1);
    }
}
