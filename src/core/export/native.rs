//! core/export/native.rs
//! Format-specific JSON for each native tag.

use id3::frame::Content;
use id3::{Frame, Tag, Version};
use serde_json::{Map, Value, json};

use super::Resolver;
use crate::core::tags::NativeTag;
use crate::core::tags::ape::{ApeTag, ApeValue};
use crate::core::tags::apple::{AppleAtom, AppleData, AppleTag};
use crate::core::tags::asf::AsfTag;
use crate::core::tags::matroska::MatroskaTag;
use crate::core::tags::picture_type_code;
use crate::core::tags::png::PngTag;
use crate::core::tags::xiph::{BLOCK_PICTURE, XiphComment};

pub(super) fn tag_to_json(tag: &NativeTag, resolver: &Resolver) -> Value {
    let mut out = Map::new();
    out.insert("TagType".into(), json!(tag.family()));
    match tag {
        NativeTag::Id3(t) => id3_tag(t, resolver, &mut out),
        NativeTag::Apple(t) => apple_tag(t, resolver, &mut out),
        NativeTag::Xiph(t) => xiph_tag(t, resolver, &mut out),
        NativeTag::Matroska(t) => matroska_tag(t, &mut out),
        NativeTag::Asf(t) => asf_tag(t, resolver, &mut out),
        NativeTag::Ape(t) => ape_tag(t, resolver, &mut out),
        NativeTag::Png(t) => png_tag(t, &mut out),
    }
    Value::Object(out)
}

fn version_name(version: Version) -> &'static str {
    match version {
        Version::Id3v22 => "2.2",
        Version::Id3v23 => "2.3",
        Version::Id3v24 => "2.4",
    }
}

fn id3_tag(tag: &Tag, resolver: &Resolver, out: &mut Map<String, Value>) {
    out.insert("Version".into(), json!(version_name(tag.version())));
    let frames: Vec<Value> = tag.frames().map(|f| id3_frame(f, resolver)).collect();
    out.insert("Frames".into(), Value::Array(frames));
}

fn id3_frame(frame: &Frame, resolver: &Resolver) -> Value {
    let mut map = Map::new();
    map.insert("FrameId".into(), json!(frame.id()));
    match frame.content() {
        Content::Text(text) => {
            let values: Vec<&str> = text.split('\0').collect();
            map.insert("Text".into(), json!(values));
        }
        Content::ExtendedText(t) => {
            map.insert("Description".into(), json!(t.description));
            let values: Vec<&str> = t.value.split('\0').collect();
            map.insert("Text".into(), json!(values));
        }
        Content::Link(url) => {
            map.insert("Url".into(), json!(url));
        }
        Content::ExtendedLink(l) => {
            map.insert("Description".into(), json!(l.description));
            map.insert("Url".into(), json!(l.link));
        }
        Content::Comment(c) => {
            map.insert("Language".into(), json!(c.lang));
            map.insert("Description".into(), json!(c.description));
            map.insert("Text".into(), json!(c.text));
        }
        Content::Lyrics(l) => {
            map.insert("Language".into(), json!(l.lang));
            map.insert("Description".into(), json!(l.description));
            map.insert("Text".into(), json!(l.text));
        }
        Content::Popularimeter(p) => {
            map.insert("User".into(), json!(p.user));
            map.insert("Rating".into(), json!(p.rating));
            map.insert("Counter".into(), json!(p.counter));
        }
        Content::Private(p) => {
            map.insert("Owner".into(), json!(p.owner_identifier));
            resolver.put_bytes(&mut map, "Data", &p.private_data);
        }
        Content::Picture(p) => {
            map.insert("PictureType".into(), json!(picture_type_code(p.picture_type)));
            map.insert("MimeType".into(), json!(p.mime_type));
            map.insert("Description".into(), json!(p.description));
            resolver.put_bytes(&mut map, "Data", &p.data);
        }
        Content::EncapsulatedObject(o) => {
            map.insert("MimeType".into(), json!(o.mime_type));
            map.insert("FileName".into(), json!(o.filename));
            map.insert("Description".into(), json!(o.description));
            resolver.put_bytes(&mut map, "Data", &o.data);
        }
        Content::Unknown(u) => {
            resolver.put_bytes(&mut map, "Data", &u.data);
        }
        _ => {}
    }
    Value::Object(map)
}

fn apple_tag(tag: &AppleTag, resolver: &Resolver, out: &mut Map<String, Value>) {
    let atoms: Vec<Value> = tag
        .atoms()
        .iter()
        .filter_map(|atom| {
            let mut map = Map::new();
            match atom {
                AppleAtom::Flat { box_type, data } => {
                    map.insert("BoxType".into(), json!(box_type.text()));
                    match data {
                        AppleData::Text(values) => {
                            map.insert("Values".into(), json!(values));
                        }
                        AppleData::Binary { class, bytes } => {
                            map.insert("Class".into(), json!(class));
                            map.insert("Data".into(), resolver.bytes(bytes)?);
                        }
                    }
                }
                AppleAtom::DashBox { mean, name, value } => {
                    map.insert("BoxType".into(), json!(atom.box_types()));
                    map.insert("Mean".into(), json!(mean));
                    map.insert("Name".into(), json!(name));
                    map.insert("Values".into(), json!([value]));
                }
            }
            Some(Value::Object(map))
        })
        .collect();
    out.insert("Atoms".into(), Value::Array(atoms));
}

fn xiph_tag(tag: &XiphComment, resolver: &Resolver, out: &mut Map<String, Value>) {
    out.insert("Vendor".into(), json!(tag.vendor));
    let comments: Map<String, Value> = tag
        .fields()
        .filter(|(name, _)| {
            resolver.keep_block_picture() || !name.eq_ignore_ascii_case(BLOCK_PICTURE)
        })
        .map(|(name, values)| (name.to_string(), json!(values)))
        .collect();
    out.insert("Comments".into(), Value::Object(comments));
}

/// Flat tags keep their name; a child is keyed by the JSON pair `["GROUP","NAME"]`.
/// Values are UTF-8 text; a repeated name keeps its last value.
fn matroska_tag(tag: &MatroskaTag, out: &mut Map<String, Value>) {
    let mut simple = Map::new();
    for (name, list) in tag.simple_tags() {
        for entry in list {
            match &entry.children {
                None => {
                    simple.insert(name.clone(), json!(entry.value_text()));
                }
                Some(children) => {
                    for (sub, child_list) in children {
                        let key = json!([name, sub]).to_string();
                        for child in child_list {
                            simple.insert(key.clone(), json!(child.value_text()));
                        }
                    }
                }
            }
        }
    }
    out.insert("SimpleTags".into(), Value::Object(simple));
}

fn asf_tag(tag: &AsfTag, resolver: &Resolver, out: &mut Map<String, Value>) {
    let mut descriptors = Map::new();
    for d in tag.descriptors() {
        let value = match d.value.bytes() {
            Some(bytes) => resolver.bytes(bytes),
            None => Some(json!(d.value.to_string())),
        };
        if let Some(value) = value {
            descriptors.insert(d.name.clone(), value);
        }
    }
    out.insert("Descriptors".into(), Value::Object(descriptors));
}

fn ape_tag(tag: &ApeTag, resolver: &Resolver, out: &mut Map<String, Value>) {
    let items: Vec<Value> = tag
        .items()
        .iter()
        .filter_map(|item| {
            let mut map = Map::new();
            map.insert("Key".into(), json!(item.key));
            match &item.value {
                ApeValue::Text(values) => {
                    map.insert("Type".into(), json!("Text"));
                    map.insert("Values".into(), json!(values));
                }
                ApeValue::Locator(url) => {
                    map.insert("Type".into(), json!("Locator"));
                    map.insert("Values".into(), json!([url]));
                }
                ApeValue::Binary(bytes) => {
                    map.insert("Type".into(), json!("Binary"));
                    map.insert("Data".into(), resolver.bytes(bytes)?);
                }
            }
            Some(Value::Object(map))
        })
        .collect();
    out.insert("Items".into(), Value::Array(items));
}

fn png_tag(tag: &PngTag, out: &mut Map<String, Value>) {
    let keywords: Map<String, Value> = tag
        .keywords()
        .map(|(k, v)| (k.to_string(), json!(v)))
        .collect();
    out.insert("Keywords".into(), Value::Object(keywords));
}
