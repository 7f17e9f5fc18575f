//! core/tags/art.rs
//! Embedded pictures: ID3 APIC frames <-> standard [`Picture`]s.

use id3::Tag;
use id3::frame::{Content, Picture as Id3Picture, PictureType};

use super::standard::Picture;

/// All APIC/PIC pictures in frame order.
pub(crate) fn pictures_from_id3(tag: &Tag) -> Vec<Picture> {
    tag.frames()
        .filter(|f| f.id() == "APIC" || f.id() == "PIC")
        .filter_map(|f| match f.content() {
            Content::Picture(p) => Some(Picture {
                picture_type: picture_type_code(p.picture_type),
                mime_type: p.mime_type.clone(),
                description: p.description.clone(),
                data: p.data.clone(),
            }),
            _ => None,
        })
        .collect()
}

pub(crate) fn picture_to_id3(picture: &Picture) -> Id3Picture {
    Id3Picture {
        mime_type: picture.mime_type.clone(),
        picture_type: picture_type_from_code(picture.picture_type),
        description: picture.description.clone(),
        data: picture.data.clone(),
    }
}

pub(crate) fn picture_type_code(t: PictureType) -> u8 {
    match t {
        PictureType::Other => 0,
        PictureType::Icon => 1,
        PictureType::OtherIcon => 2,
        PictureType::CoverFront => 3,
        PictureType::CoverBack => 4,
        PictureType::Leaflet => 5,
        PictureType::Media => 6,
        PictureType::LeadArtist => 7,
        PictureType::Artist => 8,
        PictureType::Conductor => 9,
        PictureType::Band => 10,
        PictureType::Composer => 11,
        PictureType::Lyricist => 12,
        PictureType::RecordingLocation => 13,
        PictureType::DuringRecording => 14,
        PictureType::DuringPerformance => 15,
        PictureType::ScreenCapture => 16,
        PictureType::BrightFish => 17,
        PictureType::Illustration => 18,
        PictureType::BandLogo => 19,
        PictureType::PublisherLogo => 20,
        PictureType::Undefined(b) => b,
        #[allow(unreachable_patterns)]
        _ => 0,
    }
}

pub(crate) fn picture_type_from_code(code: u8) -> PictureType {
    match code {
        0 => PictureType::Other,
        1 => PictureType::Icon,
        2 => PictureType::OtherIcon,
        3 => PictureType::CoverFront,
        4 => PictureType::CoverBack,
        5 => PictureType::Leaflet,
        6 => PictureType::Media,
        7 => PictureType::LeadArtist,
        8 => PictureType::Artist,
        9 => PictureType::Conductor,
        10 => PictureType::Band,
        11 => PictureType::Composer,
        12 => PictureType::Lyricist,
        13 => PictureType::RecordingLocation,
        14 => PictureType::DuringRecording,
        15 => PictureType::DuringPerformance,
        16 => PictureType::ScreenCapture,
        17 => PictureType::BrightFish,
        18 => PictureType::Illustration,
        19 => PictureType::BandLogo,
        20 => PictureType::PublisherLogo,
        other => PictureType::Undefined(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picture_type_codes_round_trip() {
        for code in [0u8, 3, 17, 20, 200] {
            assert_eq!(picture_type_code(picture_type_from_code(code)), code);
        }
    }
}
