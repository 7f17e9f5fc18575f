//! core/custom/id3v2.rs
//! ID3v2 frames as custom metadata entries.
//!
//! Frame kinds and what they allow:
//! - user text (TXXX), comment (COMM), lyrics (USLT): key = description;
//!   edit, rename, delete
//! - private (PRIV): key = owner; edit only when the data is UTF-8 text
//! - generic text (T***): key = frame id; rename only to another text frame id
//! - attachments (APIC, GEOB): always the binary placeholder + payload;
//!   rename (description), delete
//! - anything else (GRP1, UFID, SYLT, CHAP...): key = frame id, delete only.
//!   The value is the frame's text where it has one, else the placeholder.
//!
//! The id3 crate has no in-place frame mutation, so every change rebuilds the
//! frame list ([`rewrite_frames`]). Renames append the renamed frame at the end
//! and replace any frame it now collides with.

use std::collections::HashMap;

use id3::frame::{
    Comment, Content, EncapsulatedObject, ExtendedText, Frame, Lyrics, Picture, Private,
};
use id3::{Tag, TagLike};

use super::{
    BINARY_PLACEHOLDER, Capabilities, Change, Id3FrameHint, Locator, MetadataEntry, stale,
};
use crate::core::error::AdapterError;
use crate::core::tags::rewrite_frames;

/// Language written on comments created here.
const LANG: &str = "eng";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Id3FrameKind {
    UserText,
    Private,
    Comment,
    Text,
    Lyrics,
    Attachment,
    Other,
}

/// Identifies one frame: id, kind-specific description/language, and which
/// of several identical frames it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Id3Locator {
    pub kind: Id3FrameKind,
    pub frame_id: String,
    pub description: String,
    pub lang: String,
    pub occurrence: usize,
}

impl Id3Locator {
    fn matches(&self, frame: &Frame) -> bool {
        frame.id() == self.frame_id
            && identity(frame) == (self.description.as_str(), self.lang.as_str())
    }
}

fn kind_of(frame: &Frame) -> Id3FrameKind {
    match frame.content() {
        Content::ExtendedText(_) => Id3FrameKind::UserText,
        Content::Private(_) => Id3FrameKind::Private,
        Content::Comment(_) => Id3FrameKind::Comment,
        Content::Text(_) if frame.id().starts_with('T') => Id3FrameKind::Text,
        Content::Lyrics(_) => Id3FrameKind::Lyrics,
        Content::Picture(_) | Content::EncapsulatedObject(_) => Id3FrameKind::Attachment,
        _ => Id3FrameKind::Other,
    }
}

/// (description, language) of a frame; empty where the kind has none.
fn identity(frame: &Frame) -> (&str, &str) {
    match frame.content() {
        Content::ExtendedText(t) => (&t.description, ""),
        Content::Private(p) => (&p.owner_identifier, ""),
        Content::Comment(c) => (&c.description, &c.lang),
        Content::Lyrics(l) => (&l.description, &l.lang),
        Content::Picture(p) => (&p.description, ""),
        Content::EncapsulatedObject(o) => (&o.description, ""),
        Content::ExtendedLink(l) => (&l.description, ""),
        Content::UniqueFileIdentifier(u) => (&u.owner_identifier, ""),
        _ => ("", ""),
    }
}

/// T*** other than TXXX, uppercase letters and digits.
fn is_text_frame_id(id: &str) -> bool {
    id.len() == 4
        && id.starts_with('T')
        && id != "TXXX"
        && id.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

fn split_values(s: &str) -> Vec<String> {
    s.split('\0').map(str::to_string).collect()
}

pub(super) fn enumerate(tag: &Tag, include_binary: bool) -> Vec<MetadataEntry> {
    let mut seen: HashMap<(String, String, String), usize> = HashMap::new();
    let mut out = Vec::new();

    for frame in tag.frames() {
        let (description, lang) = identity(frame);
        let counter = seen
            .entry((frame.id().to_string(), description.to_string(), lang.to_string()))
            .or_insert(0);
        let occurrence = *counter;
        *counter += 1;

        let kind = kind_of(frame);
        let locator = Locator::Id3(Id3Locator {
            kind,
            frame_id: frame.id().to_string(),
            description: description.to_string(),
            lang: lang.to_string(),
            occurrence,
        });

        let entry = match (kind, frame.content()) {
            (Id3FrameKind::UserText, Content::ExtendedText(t)) => Some(MetadataEntry::text(
                &t.description,
                split_values(&t.value),
                Capabilities::FLAT,
                locator,
            )),
            (Id3FrameKind::Private, Content::Private(p)) => {
                match std::str::from_utf8(&p.private_data) {
                    Ok(text) => Some(MetadataEntry::text(
                        &p.owner_identifier,
                        vec![text.to_string()],
                        Capabilities::FLAT,
                        locator,
                    )),
                    Err(_) if include_binary => Some(MetadataEntry::binary(
                        &p.owner_identifier,
                        p.private_data.clone(),
                        Capabilities::RENAME_DELETE,
                        locator,
                    )),
                    Err(_) => None,
                }
            }
            (Id3FrameKind::Comment, Content::Comment(c)) => Some(MetadataEntry::text(
                &c.description,
                vec![c.text.clone()],
                Capabilities::FLAT,
                locator,
            )),
            (Id3FrameKind::Lyrics, Content::Lyrics(l)) => Some(MetadataEntry::text(
                &l.description,
                vec![l.text.clone()],
                Capabilities::FLAT,
                locator,
            )),
            (Id3FrameKind::Text, Content::Text(s)) => Some(MetadataEntry::text(
                frame.id(),
                split_values(s),
                Capabilities::FLAT,
                locator,
            )),
            // Attachments ignore `include_binary`.
            (Id3FrameKind::Attachment, Content::Picture(p)) => Some(MetadataEntry::binary(
                &p.description,
                p.data.clone(),
                Capabilities::RENAME_DELETE,
                locator,
            )),
            (Id3FrameKind::Attachment, Content::EncapsulatedObject(o)) => {
                Some(MetadataEntry::binary(
                    &o.description,
                    o.data.clone(),
                    Capabilities::RENAME_DELETE,
                    locator,
                ))
            }
            (_, content) => Some(other_entry(frame.id(), content, include_binary, locator)),
        };
        out.extend(entry);
    }

    out
}

/// Read-only entry for a frame no other kind claims.
fn other_entry(
    id: &str,
    content: &Content,
    include_binary: bool,
    locator: Locator,
) -> MetadataEntry {
    let text = match content {
        Content::Text(s) => s.clone(),
        Content::Link(url) => url.clone(),
        Content::ExtendedLink(l) => l.link.clone(),
        Content::Popularimeter(p) => format!("{}:{}:{}", p.user, p.rating, p.counter),
        Content::UniqueFileIdentifier(u) => format!(
            "{}:{}",
            u.owner_identifier,
            String::from_utf8_lossy(&u.identifier)
        ),
        Content::Unknown(u) if include_binary => {
            return MetadataEntry::binary(id, u.data.clone(), Capabilities::DELETE_ONLY, locator);
        }
        _ => BINARY_PLACEHOLDER.to_string(),
    };
    MetadataEntry::text(id, vec![text], Capabilities::DELETE_ONLY, locator)
}

fn locator(entry: &MetadataEntry) -> Result<&Id3Locator, AdapterError> {
    match &entry.locator {
        Locator::Id3(loc) => Ok(loc),
        _ => Err(stale(entry)),
    }
}

/// Run `f` on the located frame only. Returns the frame as it was, if found.
fn replace_located(
    tag: &mut Tag,
    loc: &Id3Locator,
    f: impl FnOnce(&Frame) -> Option<Frame>,
) -> Option<Frame> {
    let mut remaining = loc.occurrence;
    let mut f = Some(f);
    let mut original = None;
    rewrite_frames(tag, |frame| {
        if original.is_some() || !loc.matches(&frame) {
            return Some(frame);
        }
        if remaining > 0 {
            remaining -= 1;
            return Some(frame);
        }
        let replacement = f.take().and_then(|f| f(&frame));
        original = Some(frame);
        replacement
    });
    original
}

fn with_value(frame: &Frame, value: &str) -> Option<Frame> {
    let content = match frame.content() {
        Content::ExtendedText(t) => Content::ExtendedText(ExtendedText {
            description: t.description.clone(),
            value: value.to_string(),
        }),
        Content::Private(p) => Content::Private(Private {
            owner_identifier: p.owner_identifier.clone(),
            private_data: value.as_bytes().to_vec(),
        }),
        Content::Comment(c) => Content::Comment(Comment {
            lang: c.lang.clone(),
            description: c.description.clone(),
            text: value.to_string(),
        }),
        Content::Lyrics(l) => Content::Lyrics(Lyrics {
            lang: l.lang.clone(),
            description: l.description.clone(),
            text: value.to_string(),
        }),
        Content::Text(_) => Content::Text(value.to_string()),
        _ => return None,
    };
    Some(Frame::with_content(frame.id(), content))
}

/// The frame moved to a new key, or `None` when the kind cannot take that key.
fn with_key(frame: &Frame, kind: Id3FrameKind, key: &str) -> Option<Frame> {
    if kind == Id3FrameKind::Text {
        return match frame.content() {
            Content::Text(s) if is_text_frame_id(key) => Some(Frame::text(key, s.clone())),
            _ => None,
        };
    }

    let content = match frame.content() {
        Content::ExtendedText(t) => Content::ExtendedText(ExtendedText {
            description: key.to_string(),
            value: t.value.clone(),
        }),
        Content::Private(p) => Content::Private(Private {
            owner_identifier: key.to_string(),
            private_data: p.private_data.clone(),
        }),
        Content::Comment(c) => Content::Comment(Comment {
            lang: c.lang.clone(),
            description: key.to_string(),
            text: c.text.clone(),
        }),
        Content::Lyrics(l) => Content::Lyrics(Lyrics {
            lang: l.lang.clone(),
            description: key.to_string(),
            text: l.text.clone(),
        }),
        Content::Picture(p) => Content::Picture(Picture {
            mime_type: p.mime_type.clone(),
            picture_type: p.picture_type,
            description: key.to_string(),
            data: p.data.clone(),
        }),
        Content::EncapsulatedObject(o) => Content::EncapsulatedObject(EncapsulatedObject {
            mime_type: o.mime_type.clone(),
            filename: o.filename.clone(),
            description: key.to_string(),
            data: o.data.clone(),
        }),
        _ => return None,
    };
    Some(Frame::with_content(frame.id(), content))
}

pub(super) fn edit_value(
    tag: &mut Tag,
    entry: &mut MetadataEntry,
    value: &str,
) -> Result<Change, AdapterError> {
    let loc = locator(entry)?.clone();
    let mut unsupported = false;
    let found = replace_located(tag, &loc, |frame| {
        let next = with_value(frame, value);
        unsupported = next.is_none();
        next.or_else(|| Some(frame.clone()))
    });
    if found.is_none() {
        return Err(stale(entry));
    }
    if unsupported {
        return Err(AdapterError::rejected("value for frame", loc.frame_id));
    }
    entry.values = vec![value.to_string()];
    Ok(Change::Value)
}

pub(super) fn rename_key(
    tag: &mut Tag,
    entry: &mut MetadataEntry,
    new_key: &str,
) -> Result<Change, AdapterError> {
    let loc = locator(entry)?.clone();
    let frame = tag
        .frames()
        .filter(|f| loc.matches(f))
        .nth(loc.occurrence)
        .cloned()
        .ok_or_else(|| stale(entry))?;

    let renamed = with_key(&frame, loc.kind, new_key)
        .ok_or_else(|| AdapterError::rejected("frame key", new_key))?;

    replace_located(tag, &loc, |_| None);
    let (description, lang) = identity(&renamed);
    let next = Id3Locator {
        kind: loc.kind,
        frame_id: renamed.id().to_string(),
        description: description.to_string(),
        lang: lang.to_string(),
        occurrence: 0,
    };
    tag.add_frame(renamed);

    entry.key = new_key.to_string();
    entry.locator = Locator::Id3(next);
    Ok(Change::Structure)
}

pub(super) fn delete(tag: &mut Tag, entry: &mut MetadataEntry) -> Result<Change, AdapterError> {
    let loc = locator(entry)?.clone();
    replace_located(tag, &loc, |_| None).ok_or_else(|| stale(entry))?;
    Ok(Change::Structure)
}

pub(super) fn apply(
    tag: &mut Tag,
    key: &str,
    value: &str,
    hint: Id3FrameHint,
) -> Result<(), AdapterError> {
    match hint {
        Id3FrameHint::UserText => tag.add_frame(ExtendedText {
            description: key.to_string(),
            value: value.to_string(),
        }),
        Id3FrameHint::Private => tag.add_frame(Private {
            owner_identifier: key.to_string(),
            private_data: value.as_bytes().to_vec(),
        }),
        Id3FrameHint::Comment => tag.add_frame(Comment {
            lang: LANG.to_string(),
            description: key.to_string(),
            text: value.to_string(),
        }),
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use id3::frame::{PictureType, UniqueFileIdentifier};

    fn tag_with_frames() -> Tag {
        let mut tag = Tag::new();
        tag.set_text("TIT2", "Oben");
        tag.add_frame(ExtendedText {
            description: "MOOD".into(),
            value: "calm".into(),
        });
        tag.add_frame(Picture {
            mime_type: "image/png".into(),
            picture_type: PictureType::CoverFront,
            description: "cover".into(),
            data: vec![1, 2, 3],
        });
        tag.add_frame(Private {
            owner_identifier: "blob".into(),
            private_data: vec![0xFF, 0xFE],
        });
        tag
    }

    fn find<'a>(entries: &'a mut [MetadataEntry], key: &str) -> &'a mut MetadataEntry {
        entries.iter_mut().find(|e| e.key == key).unwrap()
    }

    #[test]
    fn kinds_and_binary_gating() {
        let tag = tag_with_frames();
        let entries = enumerate(&tag, false);
        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, ["TIT2", "MOOD", "cover"]);

        let cover = &entries[2];
        assert_eq!(cover.values, [BINARY_PLACEHOLDER]);
        assert_eq!(cover.binary.as_deref(), Some(&[1u8, 2, 3][..]));
        assert!(!cover.capabilities.edit_value);

        let with_binary = enumerate(&tag, true);
        assert_eq!(with_binary.len(), 4);
        assert!(with_binary[3].is_binary());
    }

    #[test]
    fn edit_then_rename_keeps_value() {
        let mut tag = tag_with_frames();
        let mut entries = enumerate(&tag, false);
        let mood = find(&mut entries, "MOOD");

        assert_eq!(edit_value(&mut tag, mood, "dark"), Ok(Change::Value));
        assert_eq!(rename_key(&mut tag, mood, "FEELING"), Ok(Change::Structure));

        let after = enumerate(&tag, false);
        let feeling: Vec<_> = after.iter().filter(|e| e.key == "FEELING").collect();
        assert_eq!(feeling.len(), 1);
        assert_eq!(feeling[0].values, ["dark"]);
        assert!(after.iter().all(|e| e.key != "MOOD"));
    }

    #[test]
    fn text_frames_only_rename_to_text_ids() {
        let mut tag = tag_with_frames();
        let mut entries = enumerate(&tag, false);
        let title = find(&mut entries, "TIT2");

        assert!(rename_key(&mut tag, title, "TXXX").is_err());
        assert!(rename_key(&mut tag, title, "Mood").is_err());
        assert_eq!(rename_key(&mut tag, title, "TIT3"), Ok(Change::Structure));
        assert_eq!(tag.get("TIT3").and_then(|f| f.content().text()), Some("Oben"));
        assert!(tag.get("TIT2").is_none());
    }

    #[test]
    fn attachment_rename_and_delete() {
        let mut tag = tag_with_frames();
        let mut entries = enumerate(&tag, false);
        let cover = find(&mut entries, "cover");

        rename_key(&mut tag, cover, "front").unwrap();
        assert_eq!(tag.pictures().next().map(|p| p.description.as_str()), Some("front"));
        delete(&mut tag, cover).unwrap();
        assert_eq!(tag.pictures().count(), 0);
        assert_eq!(delete(&mut tag, cover), Err(AdapterError::Missing("front".into())));
    }

    #[test]
    fn unclaimed_frames_are_listed_read_only() {
        let mut tag = Tag::new();
        tag.add_frame(Frame::text("GRP1", "Strings"));
        tag.add_frame(Frame::with_content(
            "UFID",
            Content::UniqueFileIdentifier(UniqueFileIdentifier {
                owner_identifier: "http://musicbrainz.org".into(),
                identifier: b"1234".to_vec(),
            }),
        ));

        let mut entries = enumerate(&tag, false);
        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, ["GRP1", "UFID"]);
        assert_eq!(entries[0].values, ["Strings"]);
        assert_eq!(entries[1].values, ["http://musicbrainz.org:1234"]);
        assert!(entries.iter().all(|e| e.capabilities == Capabilities::DELETE_ONLY));

        let grouping = find(&mut entries, "GRP1");
        assert_eq!(delete(&mut tag, grouping), Ok(Change::Structure));
        assert_eq!(tag.frames().count(), 1);
        assert_eq!(enumerate(&tag, true).len(), 1);
    }

    #[test]
    fn apply_creates_each_hinted_frame() {
        let mut tag = Tag::new();
        apply(&mut tag, "A", "1", Id3FrameHint::UserText).unwrap();
        apply(&mut tag, "B", "2", Id3FrameHint::Private).unwrap();
        apply(&mut tag, "C", "3", Id3FrameHint::Comment).unwrap();

        let entries = enumerate(&tag, false);
        let kinds: Vec<_> = entries
            .iter()
            .map(|e| match &e.locator {
                Locator::Id3(l) => (l.frame_id.as_str(), e.values[0].as_str()),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(kinds, [("TXXX", "1"), ("PRIV", "2"), ("COMM", "3")]);
    }
}
