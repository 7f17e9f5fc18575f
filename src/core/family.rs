//! core/family.rs
//! Container families and the classifier that guesses one from a type descriptor.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use super::error::ParseNameError;

/// Tag-format families that can carry custom metadata.
///
/// Declaration order matters: [`classify`] returns the first family whose name
/// appears in the descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContainerFamily {
    Ape,
    Apple,
    Asf,
    Id3,
    Matroska,
    Xiph,
    Png,
    Riff,
    Xmp,
}

impl ContainerFamily {
    pub const ALL: [ContainerFamily; 9] = [
        ContainerFamily::Ape,
        ContainerFamily::Apple,
        ContainerFamily::Asf,
        ContainerFamily::Id3,
        ContainerFamily::Matroska,
        ContainerFamily::Xiph,
        ContainerFamily::Png,
        ContainerFamily::Riff,
        ContainerFamily::Xmp,
    ];

    /// Stable identifier used in exports and lookup tables.
    pub fn name(self) -> &'static str {
        match self {
            ContainerFamily::Ape => "APE",
            ContainerFamily::Apple => "APPLE",
            ContainerFamily::Asf => "ASF",
            ContainerFamily::Id3 => "ID3",
            ContainerFamily::Matroska => "MATROSKA",
            ContainerFamily::Xiph => "XIPH",
            ContainerFamily::Png => "PNG",
            ContainerFamily::Riff => "RIFF",
            ContainerFamily::Xmp => "XMP",
        }
    }

    /// Whether the family supports key/group/subkey entries.
    pub fn supports_mean_key(self) -> bool {
        matches!(self, ContainerFamily::Apple | ContainerFamily::Matroska)
    }
}

impl fmt::Display for ContainerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContainerFamily {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContainerFamily::ALL
            .into_iter()
            .find(|family| family.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseNameError::new("container family", s))
    }
}

impl Serialize for ContainerFamily {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Guess the custom-metadata family from a type descriptor such as `"audio/x-id3"`.
///
/// Heuristic substring test, not a structural check: first match in declaration
/// order wins.
pub fn classify(type_descriptor: &str) -> Option<ContainerFamily> {
    let haystack = type_descriptor.to_ascii_lowercase();
    ContainerFamily::ALL
        .into_iter()
        .find(|family| haystack.contains(&family.name().to_ascii_lowercase()))
}

/// Keys the tag layer duplicates on its own when tags are copied between two
/// files of the same family. Callers hide these from the custom view because
/// the standard field catalog already covers them.
pub fn auto_duplicated_keys(family: ContainerFamily) -> &'static [&'static str] {
    match family {
        ContainerFamily::Id3 => &[
            "TIT2", "TIT3", "TALB", "TPE1", "TPE2", "TPE3", "TPE4", "TCOM", "TCON", "TCOP",
            "TPUB", "TRCK", "TPOS", "TDRC", "TYER", "TSOT", "TSO2", "TSOC", "COMM", "USLT",
            "APIC", "ASIN", "Description",
        ],
        ContainerFamily::Apple => &[
            "©nam", "©ART", "©alb", "aART", "©wrt", "©gen", "©day", "©cmt", "©lyr", "©grp",
            "cprt", "desc", "trkn", "disk", "covr", "sonm", "soaa", "soco", "ASIN", "CONDUCTOR",
            "REMIXEDBY", "SUBTITLE", "LABEL",
        ],
        ContainerFamily::Xiph => &[
            "TITLE", "TITLESORT", "SUBTITLE", "ALBUM", "ARTIST", "ALBUMARTIST",
            "ALBUMARTISTSORT", "COMPOSER", "COMPOSERSORT", "CONDUCTOR", "REMIXER", "GENRE",
            "DATE", "TRACKNUMBER", "TRACKTOTAL", "DISCNUMBER", "DISCTOTAL", "COMMENT",
            "DESCRIPTION", "LYRICS", "COPYRIGHT", "ORGANIZATION", "ASIN",
            "METADATA_BLOCK_PICTURE",
        ],
        ContainerFamily::Matroska => &[
            "TITLE", "SUBTITLE", "ARTIST", "ALBUM", "COMPOSER", "CONDUCTOR", "REMIXED_BY",
            "GENRE", "DATE_RELEASED", "PART_NUMBER", "TOTAL_PARTS", "COMMENT", "DESCRIPTION",
            "LYRICS", "COPYRIGHT", "PUBLISHER",
        ],
        ContainerFamily::Asf => &[
            "WM/AlbumTitle", "WM/AlbumArtist", "WM/AlbumArtistSortOrder", "WM/Composer",
            "WM/Conductor", "WM/Genre", "WM/Year", "WM/TrackNumber", "WM/PartOfSet",
            "WM/Lyrics", "WM/Publisher", "WM/ModifiedBy", "WM/SubTitle", "WM/TitleSortOrder",
            "WM/Picture", "AmazonID",
        ],
        ContainerFamily::Ape => &[
            "Title", "Subtitle", "Artist", "Album", "Album Artist", "Composer", "Conductor",
            "MixArtist", "Genre", "Year", "Track", "Disc", "Comment", "Lyrics", "Copyright",
            "Publisher", "Cover Art (Front)",
        ],
        ContainerFamily::Png => &["Title", "Author", "Description", "Copyright", "Comment"],
        ContainerFamily::Riff => &["INAM", "IART", "IPRD", "ICMT", "IGNR", "ICRD", "ITRK", "ICOP"],
        ContainerFamily::Xmp => &[],
    }
}

/// Case-insensitive membership test against [`auto_duplicated_keys`].
pub fn is_auto_duplicated(family: ContainerFamily, key: &str) -> bool {
    auto_duplicated_keys(family)
        .iter()
        .any(|k| k.eq_ignore_ascii_case(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_matches_substring_case_insensitively() {
        assert_eq!(classify("audio/x-id3"), Some(ContainerFamily::Id3));
        assert_eq!(classify("Tag/Matroska"), Some(ContainerFamily::Matroska));
        assert_eq!(classify("unknown/format"), None);
    }

    #[test]
    fn classify_prefers_declaration_order() {
        // Both "ape" and "xiph" appear; APE is declared first.
        assert_eq!(classify("xiph+ape"), Some(ContainerFamily::Ape));
    }

    #[test]
    fn family_names_round_trip_through_from_str() {
        for family in ContainerFamily::ALL {
            assert_eq!(family.name().parse::<ContainerFamily>().ok(), Some(family));
        }
        assert!("vorbis".parse::<ContainerFamily>().is_err());
    }

    #[test]
    fn auto_duplicated_lookup_ignores_case() {
        assert!(is_auto_duplicated(ContainerFamily::Xiph, "title"));
        assert!(!is_auto_duplicated(ContainerFamily::Xiph, "MOOD"));
        assert!(auto_duplicated_keys(ContainerFamily::Xmp).is_empty());
    }
}
