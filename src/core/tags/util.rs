//! core/tags/util.rs
//! Small parsing helpers shared by tag reading/writing.

use id3::frame::Frame;
use id3::{Tag, TagLike};

/// Parse strings like:
/// - "3" -> (Some(3), None)
/// - "3/12" -> (Some(3), Some(12))
pub(crate) fn parse_slash_pair_u32(s: Option<&str>) -> (Option<u32>, Option<u32>) {
    let Some(s) = s else { return (None, None) };
    let s = s.trim();
    if s.is_empty() {
        return (None, None);
    }

    let mut parts = s.split('/');
    let a = parts.next().and_then(|p| p.trim().parse::<u32>().ok());
    let b = parts.next().and_then(|p| p.trim().parse::<u32>().ok());
    (a, b)
}

/// Leading four-digit year of a date string ("1998", "1998-04-01", "1998-04-01T10:00").
pub(crate) fn parse_year(s: &str) -> Option<u32> {
    let s = s.trim();
    let digits: String = s.chars().take_while(char::is_ascii_digit).collect();
    if digits.len() != 4 {
        return None;
    }
    digits.parse().ok()
}

/// Split an ID3v2.4 multi-value text on NUL, dropping empty parts.
pub(crate) fn split_multi(s: &str) -> Vec<String> {
    s.split('\0')
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Total byte length of a leading ID3v2 tag (header + body + optional footer), or 0.
pub(crate) fn id3v2_len(bytes: &[u8]) -> usize {
    if bytes.len() < 10 || &bytes[..3] != b"ID3" {
        return 0;
    }

    // Syncsafe: 7 significant bits per byte.
    let body = bytes[6..10]
        .iter()
        .fold(0usize, |acc, &b| (acc << 7) | usize::from(b & 0x7F));
    let footer = if bytes[5] & 0x10 != 0 { 10 } else { 0 };

    (10 + body + footer).min(bytes.len())
}

/// Rebuild a tag frame by frame, preserving order.
///
/// `f` returns `None` to drop a frame or `Some` to keep (or replace) it.
/// The id3 crate exposes no in-place frame mutation, so this is the one way
/// every edit goes through.
pub(crate) fn rewrite_frames(tag: &mut Tag, mut f: impl FnMut(Frame) -> Option<Frame>) {
    let frames: Vec<Frame> = tag.frames().cloned().collect();
    let mut next = Tag::with_version(tag.version());
    for frame in frames.into_iter().filter_map(&mut f) {
        next.add_frame(frame);
    }
    *tag = next;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_pairs() {
        assert_eq!(parse_slash_pair_u32(Some("3/12")), (Some(3), Some(12)));
        assert_eq!(parse_slash_pair_u32(Some(" 7 ")), (Some(7), None));
        assert_eq!(parse_slash_pair_u32(Some("x/4")), (None, Some(4)));
        assert_eq!(parse_slash_pair_u32(None), (None, None));
    }

    #[test]
    fn years_from_dates() {
        assert_eq!(parse_year("1998-04-01"), Some(1998));
        assert_eq!(parse_year("98"), None);
        assert_eq!(parse_year(""), None);
    }

    #[test]
    fn id3v2_header_length() {
        // size 0x00 0x00 0x02 0x01 -> (2 << 7) | 1 = 257
        let mut bytes = b"ID3\x04\x00\x00\x00\x00\x02\x01".to_vec();
        bytes.resize(400, 0);
        assert_eq!(id3v2_len(&bytes), 267);
        assert_eq!(id3v2_len(b"\xFF\xFBnot a tag"), 0);
    }
}
