//! core/custom/png.rs
//! PNG text keywords. Value edits only.

use super::{Capabilities, Change, Locator, MetadataEntry, stale};
use crate::core::error::AdapterError;
use crate::core::tags::png::PngTag;

pub(super) fn enumerate(tag: &PngTag) -> Vec<MetadataEntry> {
    tag.keywords()
        .map(|(keyword, value)| {
            MetadataEntry::text(
                keyword,
                vec![value.to_string()],
                Capabilities::EDIT_ONLY,
                Locator::Png {
                    keyword: keyword.to_string(),
                },
            )
        })
        .collect()
}

pub(super) fn edit_value(
    tag: &mut PngTag,
    entry: &mut MetadataEntry,
    value: &str,
) -> Result<Change, AdapterError> {
    let Locator::Png { keyword } = &entry.locator else {
        return Err(stale(entry));
    };
    if tag.get(keyword).is_none() {
        return Err(stale(entry));
    }
    tag.set(keyword, value);
    entry.values = vec![value.to_string()];
    Ok(Change::Value)
}

pub(super) fn apply(tag: &mut PngTag, key: &str, value: &str) -> Result<(), AdapterError> {
    if tag.set(key, value) {
        Ok(())
    } else {
        Err(AdapterError::rejected("keyword", key))
    }
}
