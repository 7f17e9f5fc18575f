//! core/tags/read.rs
//! Read an ID3 tag into the unified [`StandardTag`].
//!
//! - Only frames the catalog has a field for are read here.
//! - Everything else stays in the native tag and is reached through the
//!   custom metadata adapter.

use id3::frame::Content;
use id3::{Tag, TagLike};

use super::art::pictures_from_id3;
use super::standard::StandardTag;
use super::util::{parse_slash_pair_u32, parse_year, split_multi};

/// User-text (TXXX) descriptions that map onto standard fields.
pub(crate) const TXXX_DESCRIPTION: &str = "Description";
pub(crate) const TXXX_AMAZON_ID: &str = "ASIN";

pub fn standard_from_id3(tag: &Tag) -> StandardTag {
    let (track, track_count) = parse_slash_pair_u32(text_frame(tag, "TRCK").as_deref());
    let (disc, disc_count) = parse_slash_pair_u32(text_frame(tag, "TPOS").as_deref());

    let year = text_frame(tag, "TDRC")
        .or_else(|| text_frame(tag, "TYER"))
        .and_then(|s| parse_year(&s));

    StandardTag {
        title: text_frame(tag, "TIT2"),
        title_sort: text_frame(tag, "TSOT"),
        subtitle: text_frame(tag, "TIT3"),
        description: user_text(tag, TXXX_DESCRIPTION),

        artists: list_frame(tag, "TPE1"),
        album: text_frame(tag, "TALB"),
        album_artists: list_frame(tag, "TPE2"),
        album_artists_sort: list_frame(tag, "TSO2"),
        composers: list_frame(tag, "TCOM"),
        composers_sort: list_frame(tag, "TSOC"),
        conductor: text_frame(tag, "TPE3"),
        remixed_by: text_frame(tag, "TPE4"),

        track,
        track_count,
        disc,
        disc_count,
        year,

        genres: list_frame(tag, "TCON"),
        comment: first_comment(tag),
        lyrics: first_lyrics(tag),
        copyright: text_frame(tag, "TCOP"),
        publisher: text_frame(tag, "TPUB"),
        amazon_id: user_text(tag, TXXX_AMAZON_ID),

        pictures: pictures_from_id3(tag),
    }
}

/// Text of a T*** frame, with multi-values joined back the way they were stored.
fn text_frame(tag: &Tag, id: &str) -> Option<String> {
    let frame = tag.get(id)?;
    match frame.content() {
        Content::Text(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn list_frame(tag: &Tag, id: &str) -> Vec<String> {
    text_frame(tag, id)
        .map(|s| split_multi(&s))
        .unwrap_or_default()
}

fn user_text(tag: &Tag, description: &str) -> Option<String> {
    tag.frames().find_map(|frame| match frame.content() {
        Content::ExtendedText(et) if et.description == description => Some(et.value.clone()),
        _ => None,
    })
}

/// The comment with an empty description; described comments are custom metadata.
fn first_comment(tag: &Tag) -> Option<String> {
    tag.frames().find_map(|frame| match frame.content() {
        Content::Comment(c) if c.description.is_empty() => Some(c.text.clone()),
        _ => None,
    })
}

fn first_lyrics(tag: &Tag) -> Option<String> {
    tag.frames().find_map(|frame| match frame.content() {
        Content::Lyrics(l) if l.description.is_empty() => Some(l.text.clone()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use id3::frame::{Comment, ExtendedText};

    #[test]
    fn reads_pairs_lists_and_user_text() {
        let mut tag = Tag::new();
        tag.set_text("TIT2", "Oben");
        tag.set_text("TPE1", "A\0B");
        tag.set_text("TRCK", "3/12");
        tag.set_text("TDRC", "1998-04-01");
        tag.add_frame(ExtendedText {
            description: TXXX_AMAZON_ID.to_string(),
            value: "B000002".to_string(),
        });
        tag.add_frame(Comment {
            lang: "eng".to_string(),
            description: "rip".to_string(),
            text: "not the comment".to_string(),
        });
        tag.add_frame(Comment {
            lang: "eng".to_string(),
            description: String::new(),
            text: "the comment".to_string(),
        });

        let read = standard_from_id3(&tag);
        assert_eq!(read.title.as_deref(), Some("Oben"));
        assert_eq!(read.artists, ["A", "B"]);
        assert_eq!((read.track, read.track_count), (Some(3), Some(12)));
        assert_eq!(read.year, Some(1998));
        assert_eq!(read.amazon_id.as_deref(), Some("B000002"));
        assert_eq!(read.comment.as_deref(), Some("the comment"));
        assert_eq!(read.disc, None);
    }
}
