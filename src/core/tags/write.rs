//! core/tags/write.rs
//! Write the unified [`StandardTag`] back into ID3 frames, and render the file.
//!
//! Semantics:
//! - Only fields that differ between the old and new value are written; every
//!   other frame is left exactly as it is.
//! - `None` / empty list => remove that frame.
//! - Lists are stored ID3v2.4 style, NUL-separated.

use id3::frame::{Comment, Content, ExtendedText, Lyrics};
use id3::{Tag, TagLike, Version};

use super::art::picture_to_id3;
use super::read::{TXXX_AMAZON_ID, TXXX_DESCRIPTION};
use super::standard::StandardTag;
use super::util::{id3v2_len, rewrite_frames};
use crate::core::error::LoadError;

/// Language code written on new COMM/USLT frames.
const LANG: &str = "eng";

/// Helper: set/remove a plain text frame (T***)
fn set_text_opt(tag: &mut Tag, id: &str, v: &Option<String>) {
    match v.as_deref() {
        Some(s) if !s.trim().is_empty() => tag.set_text(id, s.to_string()),
        _ => {
            let _ = tag.remove(id); // TagLike::remove returns Vec<Frame>; discard it
        }
    }
}

fn set_list(tag: &mut Tag, id: &str, v: &[String]) {
    if v.is_empty() {
        let _ = tag.remove(id);
    } else {
        tag.set_text(id, v.join("\0"));
    }
}

/// Helper: write TRCK/TPOS as "n" or "n/total" (or remove if None)
fn set_slash_pair(tag: &mut Tag, id: &str, n: Option<u32>, total: Option<u32>) {
    match (n, total) {
        (None, None) => {
            let _ = tag.remove(id);
        }
        (Some(n), Some(t)) => tag.set_text(id, format!("{n}/{t}")),
        (Some(n), None) => tag.set_text(id, n.to_string()),
        (None, Some(t)) => tag.set_text(id, format!("/{t}")),
    }
}

fn set_user_text(tag: &mut Tag, description: &str, v: &Option<String>) {
    tag.remove_extended_text(Some(description), None);
    if let Some(value) = v.as_deref().filter(|s| !s.is_empty()) {
        tag.add_frame(ExtendedText {
            description: description.to_string(),
            value: value.to_string(),
        });
    }
}

/// Drop COMM/USLT frames with an empty description; described ones are custom entries.
fn remove_undescribed(tag: &mut Tag, id: &str) {
    rewrite_frames(tag, |frame| {
        let undescribed = match frame.content() {
            Content::Comment(c) => c.description.is_empty(),
            Content::Lyrics(l) => l.description.is_empty(),
            _ => false,
        };
        (!(frame.id() == id && undescribed)).then_some(frame)
    });
}

/// Write every field of `standard` that differs from `baseline` into `tag`.
/// `baseline` is what `tag` held before the edit.
pub fn apply_standard(tag: &mut Tag, standard: &StandardTag, baseline: &StandardTag) {
    macro_rules! changed {
        ($field:ident) => {
            standard.$field != baseline.$field
        };
    }

    if changed!(title) {
        set_text_opt(tag, "TIT2", &standard.title);
    }
    if changed!(title_sort) {
        set_text_opt(tag, "TSOT", &standard.title_sort);
    }
    if changed!(subtitle) {
        set_text_opt(tag, "TIT3", &standard.subtitle);
    }
    if changed!(description) {
        set_user_text(tag, TXXX_DESCRIPTION, &standard.description);
    }

    if changed!(artists) {
        set_list(tag, "TPE1", &standard.artists);
    }
    if changed!(album) {
        set_text_opt(tag, "TALB", &standard.album);
    }
    if changed!(album_artists) {
        set_list(tag, "TPE2", &standard.album_artists);
    }
    if changed!(album_artists_sort) {
        set_list(tag, "TSO2", &standard.album_artists_sort);
    }
    if changed!(composers) {
        set_list(tag, "TCOM", &standard.composers);
    }
    if changed!(composers_sort) {
        set_list(tag, "TSOC", &standard.composers_sort);
    }
    if changed!(conductor) {
        set_text_opt(tag, "TPE3", &standard.conductor);
    }
    if changed!(remixed_by) {
        set_text_opt(tag, "TPE4", &standard.remixed_by);
    }

    if changed!(track) || changed!(track_count) {
        set_slash_pair(tag, "TRCK", standard.track, standard.track_count);
    }
    if changed!(disc) || changed!(disc_count) {
        set_slash_pair(tag, "TPOS", standard.disc, standard.disc_count);
    }
    if changed!(year) {
        let _ = tag.remove("TYER");
        set_text_opt(tag, "TDRC", &standard.year.map(|y| y.to_string()));
    }

    if changed!(genres) {
        set_list(tag, "TCON", &standard.genres);
    }

    // Comment (COMM): replace the undescribed one with a single "eng" comment
    if changed!(comment) {
        remove_undescribed(tag, "COMM");
        if let Some(text) = standard.comment.as_deref().filter(|s| !s.is_empty()) {
            tag.add_frame(Comment {
                lang: LANG.to_string(),
                description: String::new(),
                text: text.to_string(),
            });
        }
    }
    if changed!(lyrics) {
        remove_undescribed(tag, "USLT");
        if let Some(text) = standard.lyrics.as_deref().filter(|s| !s.is_empty()) {
            tag.add_frame(Lyrics {
                lang: LANG.to_string(),
                description: String::new(),
                text: text.to_string(),
            });
        }
    }

    if changed!(copyright) {
        set_text_opt(tag, "TCOP", &standard.copyright);
    }
    if changed!(publisher) {
        set_text_opt(tag, "TPUB", &standard.publisher);
    }
    if changed!(amazon_id) {
        set_user_text(tag, TXXX_AMAZON_ID, &standard.amazon_id);
    }

    if changed!(pictures) {
        tag.remove_all_pictures();
        for picture in &standard.pictures {
            tag.add_frame(picture_to_id3(picture));
        }
    }
}

/// Encode `tag` as ID3v2.4 and put it in front of `buffer`'s audio payload,
/// replacing whatever ID3v2 tag the buffer started with.
pub fn render(tag: &Tag, buffer: &[u8]) -> Result<Vec<u8>, LoadError> {
    let payload = &buffer[id3v2_len(buffer)..];
    let mut out = Vec::with_capacity(payload.len() + 1024);

    // Write back (choose v2.4 consistently)
    if tag.frames().next().is_some() {
        tag.write_to(&mut out, Version::Id3v24)?;
    }
    out.extend_from_slice(payload);
    Ok(out)
}
