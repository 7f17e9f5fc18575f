//! core/custom/ape.rs
//! APEv2 items, created/replaced by key.

use super::{Capabilities, Change, Locator, MetadataEntry, stale};
use crate::core::error::AdapterError;
use crate::core::tags::ape::{ApeItem, ApeTag, ApeValue, is_valid_key};

pub(super) fn enumerate(tag: &ApeTag, include_binary: bool) -> Vec<MetadataEntry> {
    tag.items()
        .iter()
        .filter_map(|item| {
            let locator = Locator::Ape {
                key: item.key.clone(),
            };
            match &item.value {
                ApeValue::Text(values) => Some(MetadataEntry::text(
                    &item.key,
                    values.clone(),
                    Capabilities::FLAT,
                    locator,
                )),
                ApeValue::Locator(url) => Some(MetadataEntry::text(
                    &item.key,
                    vec![url.clone()],
                    Capabilities::FLAT,
                    locator,
                )),
                ApeValue::Binary(bytes) if include_binary => Some(MetadataEntry::binary(
                    &item.key,
                    bytes.clone(),
                    Capabilities::DELETE_ONLY,
                    locator,
                )),
                ApeValue::Binary(_) => None,
            }
        })
        .collect()
}

fn key(entry: &MetadataEntry) -> Result<String, AdapterError> {
    match &entry.locator {
        Locator::Ape { key } => Ok(key.clone()),
        _ => Err(stale(entry)),
    }
}

pub(super) fn edit_value(
    tag: &mut ApeTag,
    entry: &mut MetadataEntry,
    value: &str,
) -> Result<Change, AdapterError> {
    let key = key(entry)?;
    let item = tag.get(&key).ok_or_else(|| stale(entry))?;
    let value_out = match item.value {
        ApeValue::Locator(_) => ApeValue::Locator(value.to_string()),
        _ => ApeValue::Text(vec![value.to_string()]),
    };
    let stored_key = item.key.clone();
    tag.set(ApeItem {
        key: stored_key,
        value: value_out,
    });
    entry.values = vec![value.to_string()];
    Ok(Change::Value)
}

pub(super) fn rename_key(
    tag: &mut ApeTag,
    entry: &mut MetadataEntry,
    new_key: &str,
) -> Result<Change, AdapterError> {
    let key = key(entry)?;
    if !is_valid_key(new_key) {
        return Err(AdapterError::rejected("item key", new_key));
    }
    let value = tag.get(&key).map(|i| i.value.clone()).ok_or_else(|| stale(entry))?;
    tag.remove(&key);
    tag.set(ApeItem {
        key: new_key.to_string(),
        value,
    });
    entry.key = new_key.to_string();
    entry.locator = Locator::Ape {
        key: new_key.to_string(),
    };
    Ok(Change::Structure)
}

pub(super) fn delete(tag: &mut ApeTag, entry: &mut MetadataEntry) -> Result<Change, AdapterError> {
    let key = key(entry)?;
    if tag.remove(&key) {
        Ok(Change::Structure)
    } else {
        Err(stale(entry))
    }
}

pub(super) fn apply(tag: &mut ApeTag, key: &str, value: &str) -> Result<(), AdapterError> {
    if tag.set(ApeItem::text(key, value)) {
        Ok(())
    } else {
        Err(AdapterError::rejected("item key", key))
    }
}

// Never exercised against real APE files; these pin the in-memory behaviour only.
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_keeps_locator_items_typed() {
        let mut tag = ApeTag::new();
        tag.set(ApeItem {
            key: "Homepage".into(),
            value: ApeValue::Locator("http://example.com".into()),
        });
        let mut entries = enumerate(&tag, false);

        assert!(rename_key(&mut tag, &mut entries[0], "Tag").is_err());
        rename_key(&mut tag, &mut entries[0], "Website").unwrap();
        edit_value(&mut tag, &mut entries[0], "http://example.org").unwrap();
        assert_eq!(
            tag.get("website").map(|i| &i.value),
            Some(&ApeValue::Locator("http://example.org".into()))
        );
    }
}
