//! core/custom/xiph.rs
//! Vorbis comments: one entry per distinct field name, carrying every value.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::{Capabilities, Change, Locator, MetadataEntry, stale};
use crate::core::error::AdapterError;
use crate::core::tags::xiph::{BLOCK_PICTURE, XiphComment, is_valid_field_name};

pub(super) fn enumerate(tag: &XiphComment, include_binary: bool) -> Vec<MetadataEntry> {
    tag.fields()
        .filter_map(|(name, values)| {
            let locator = Locator::Xiph {
                field: name.to_string(),
            };
            if name == BLOCK_PICTURE {
                if !include_binary {
                    return None;
                }
                let first = values.first().map(String::as_str).unwrap_or_default();
                let payload = STANDARD
                    .decode(first)
                    .unwrap_or_else(|_| first.as_bytes().to_vec());
                let caps = Capabilities::DELETE_ONLY;
                return Some(MetadataEntry::binary(name, payload, caps, locator));
            }
            Some(MetadataEntry::text(name, values.to_vec(), Capabilities::FLAT, locator))
        })
        .collect()
}

fn field(entry: &MetadataEntry) -> Result<String, AdapterError> {
    match &entry.locator {
        Locator::Xiph { field } => Ok(field.clone()),
        _ => Err(stale(entry)),
    }
}

pub(super) fn edit_value(
    tag: &mut XiphComment,
    entry: &mut MetadataEntry,
    value: &str,
) -> Result<Change, AdapterError> {
    let name = field(entry)?;
    if !tag.contains(&name) {
        return Err(stale(entry));
    }
    tag.set_field(&name, vec![value.to_string()]);
    entry.values = vec![value.to_string()];
    Ok(Change::Value)
}

/// Moves the whole value list.
pub(super) fn rename_key(
    tag: &mut XiphComment,
    entry: &mut MetadataEntry,
    new_key: &str,
) -> Result<Change, AdapterError> {
    let name = field(entry)?;
    if !is_valid_field_name(new_key) {
        return Err(AdapterError::rejected("field name", new_key));
    }
    let values = tag.field(&name).to_vec();
    if values.is_empty() {
        return Err(stale(entry));
    }
    tag.remove_field(&name);
    tag.set_field(new_key, values);

    let stored = new_key.to_ascii_uppercase();
    entry.key = stored.clone();
    entry.locator = Locator::Xiph { field: stored };
    Ok(Change::Structure)
}

pub(super) fn delete(
    tag: &mut XiphComment,
    entry: &mut MetadataEntry,
) -> Result<Change, AdapterError> {
    let name = field(entry)?;
    if tag.remove_field(&name) {
        Ok(Change::Structure)
    } else {
        Err(stale(entry))
    }
}

pub(super) fn apply(tag: &mut XiphComment, key: &str, value: &str) -> Result<(), AdapterError> {
    if tag.add_field(key, value) {
        Ok(())
    } else {
        Err(AdapterError::rejected("field name", key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_moves_every_value() {
        let mut tag = XiphComment::new();
        tag.add_field("PERFORMER", "A");
        tag.add_field("PERFORMER", "B");
        let mut entries = enumerate(&tag, false);

        rename_key(&mut tag, &mut entries[0], "Soloist").unwrap();
        assert_eq!(entries[0].key, "SOLOIST");
        assert_eq!(tag.field("SOLOIST"), ["A".to_string(), "B".to_string()]);
        assert!(!tag.contains("PERFORMER"));
        assert!(rename_key(&mut tag, &mut entries[0], "A=B").is_err());
    }

    #[test]
    fn block_picture_needs_include_binary() {
        let mut tag = XiphComment::new();
        tag.add_field(BLOCK_PICTURE, &STANDARD.encode([1u8, 2, 3]));
        tag.add_field("MOOD", "calm");

        assert_eq!(enumerate(&tag, false).len(), 1);
        let all = enumerate(&tag, true);
        assert_eq!(all[0].binary.as_deref(), Some(&[1u8, 2, 3][..]));
        assert!(!all[0].capabilities.edit_value);
    }
}
