//! core/custom/asf.rs
//! ASF extended content descriptors, handled through their string form.

use super::{Capabilities, Change, Locator, MetadataEntry, stale};
use crate::core::error::AdapterError;
use crate::core::tags::asf::{AsfTag, AsfValue};

pub(super) fn enumerate(tag: &AsfTag, include_binary: bool) -> Vec<MetadataEntry> {
    tag.descriptors()
        .iter()
        .filter_map(|d| {
            let locator = Locator::Asf {
                name: d.name.clone(),
            };
            match d.value.bytes() {
                Some(bytes) if include_binary => Some(MetadataEntry::binary(
                    &d.name,
                    bytes.to_vec(),
                    Capabilities::DELETE_ONLY,
                    locator,
                )),
                Some(_) => None,
                None => Some(MetadataEntry::text(
                    &d.name,
                    vec![d.value.to_string()],
                    Capabilities::FLAT,
                    locator,
                )),
            }
        })
        .collect()
}

fn name(entry: &MetadataEntry) -> Result<String, AdapterError> {
    match &entry.locator {
        Locator::Asf { name } => Ok(name.clone()),
        _ => Err(stale(entry)),
    }
}

/// Edits always store a Unicode string.
pub(super) fn edit_value(
    tag: &mut AsfTag,
    entry: &mut MetadataEntry,
    value: &str,
) -> Result<Change, AdapterError> {
    let name = name(entry)?;
    if tag.get(&name).is_none() {
        return Err(stale(entry));
    }
    tag.set(&name, AsfValue::Unicode(value.to_string()));
    entry.values = vec![value.to_string()];
    Ok(Change::Value)
}

/// The descriptor keeps its type under the new name.
pub(super) fn rename_key(
    tag: &mut AsfTag,
    entry: &mut MetadataEntry,
    new_key: &str,
) -> Result<Change, AdapterError> {
    let name = name(entry)?;
    let value = tag.get(&name).cloned().ok_or_else(|| stale(entry))?;
    tag.remove(&name);
    if !tag.set(new_key, value) {
        return Err(AdapterError::rejected("descriptor name", new_key));
    }
    entry.key = new_key.to_string();
    entry.locator = Locator::Asf {
        name: new_key.to_string(),
    };
    Ok(Change::Structure)
}

pub(super) fn delete(tag: &mut AsfTag, entry: &mut MetadataEntry) -> Result<Change, AdapterError> {
    let name = name(entry)?;
    if tag.remove(&name) {
        Ok(Change::Structure)
    } else {
        Err(stale(entry))
    }
}

pub(super) fn apply(tag: &mut AsfTag, key: &str, value: &str) -> Result<(), AdapterError> {
    if tag.set(key, AsfValue::Unicode(value.to_string())) {
        Ok(())
    } else {
        Err(AdapterError::rejected("descriptor name", key))
    }
}
