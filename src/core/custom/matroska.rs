//! core/custom/matroska.rs
//! Matroska simple tags.
//!
//! Flat tags report `mean_key = ""`; children report their parent's name.
//! Group bookkeeping: whenever a child leaves a group and the group has no
//! non-empty children left, the parent tag is removed too.

use super::{Capabilities, Change, Locator, MetadataEntry, stale};
use crate::core::error::AdapterError;
use crate::core::tags::matroska::{MatroskaTag, SimpleTag};

fn entry_for(
    key: &str,
    group: Option<&str>,
    tag: &SimpleTag,
    include_binary: bool,
) -> Option<MetadataEntry> {
    let locator = Locator::Matroska {
        key: key.to_string(),
        group: group.map(str::to_string),
    };
    let entry = match std::str::from_utf8(&tag.value) {
        Ok(text) => MetadataEntry::text(key, vec![text.to_string()], Capabilities::ALL, locator),
        Err(_) if include_binary => {
            MetadataEntry::binary(key, tag.value.clone(), Capabilities::DELETE_ONLY, locator)
        }
        Err(_) => return None,
    };
    Some(entry.with_mean_key(group.unwrap_or_default()))
}

pub(super) fn enumerate(tag: &MatroskaTag, include_binary: bool) -> Vec<MetadataEntry> {
    let mut out = Vec::new();
    for (name, list) in tag.simple_tags() {
        for simple in list {
            match &simple.children {
                None => out.extend(entry_for(name, None, simple, include_binary)),
                Some(children) => {
                    for (sub, child_list) in children {
                        for child in child_list {
                            out.extend(entry_for(sub, Some(name.as_str()), child, include_binary));
                        }
                    }
                }
            }
        }
    }
    out
}

fn locator(entry: &MetadataEntry) -> Result<(String, Option<String>), AdapterError> {
    match &entry.locator {
        Locator::Matroska { key, group } => Ok((key.clone(), group.clone())),
        _ => Err(stale(entry)),
    }
}

/// Drop `group` once nothing non-empty is left in it.
fn cleanup(tag: &mut MatroskaTag, group: Option<&str>) {
    if let Some(group) = group {
        if tag.live_children(group) == 0 {
            tag.remove_group(group);
        }
    }
}

pub(super) fn edit_value(
    tag: &mut MatroskaTag,
    entry: &mut MetadataEntry,
    value: &str,
) -> Result<Change, AdapterError> {
    let (key, group) = locator(entry)?;
    let (name, sub) = path(&key, group.as_deref());
    if tag.get(name, sub).is_none() {
        return Err(stale(entry));
    }
    tag.set(name, sub, value);
    entry.values = vec![value.to_string()];
    Ok(Change::Value)
}

/// (simple tag name, child name) for `MatroskaTag` calls.
fn path<'a>(key: &'a str, group: Option<&'a str>) -> (&'a str, Option<&'a str>) {
    match group {
        Some(group) => (group, Some(key)),
        None => (key, None),
    }
}

pub(super) fn rename_key(
    tag: &mut MatroskaTag,
    entry: &mut MetadataEntry,
    new_key: &str,
) -> Result<Change, AdapterError> {
    let (key, group) = locator(entry)?;
    let (name, sub) = path(&key, group.as_deref());
    let value = tag.get(name, sub).ok_or_else(|| stale(entry))?;

    let (new_name, new_sub) = path(new_key, group.as_deref());
    tag.set(new_name, new_sub, &value);
    tag.remove(name, sub);
    cleanup(tag, group.as_deref());

    entry.key = new_key.to_string();
    entry.locator = Locator::Matroska {
        key: new_key.to_string(),
        group,
    };
    Ok(Change::Structure)
}

/// Move to group `new_mean`; an empty mean-key makes the tag flat.
pub(super) fn rename_mean_key(
    tag: &mut MatroskaTag,
    entry: &mut MetadataEntry,
    new_mean: &str,
) -> Result<Change, AdapterError> {
    let (key, group) = locator(entry)?;
    let (name, sub) = path(&key, group.as_deref());
    let value = tag.get(name, sub).ok_or_else(|| stale(entry))?;

    let new_group = (!new_mean.is_empty()).then(|| new_mean.to_string());
    let (new_name, new_sub) = path(&key, new_group.as_deref());
    tag.set(new_name, new_sub, &value);
    tag.remove(name, sub);
    cleanup(tag, group.as_deref());

    entry.mean_key = Some(new_mean.to_string());
    entry.locator = Locator::Matroska {
        key,
        group: new_group,
    };
    Ok(Change::Structure)
}

pub(super) fn delete(
    tag: &mut MatroskaTag,
    entry: &mut MetadataEntry,
) -> Result<Change, AdapterError> {
    let (key, group) = locator(entry)?;
    let (name, sub) = path(&key, group.as_deref());
    if !tag.remove(name, sub) {
        return Err(stale(entry));
    }
    cleanup(tag, group.as_deref());
    Ok(Change::Structure)
}

/// No (or empty) mean-key writes a flat tag, otherwise a child of that group.
pub(super) fn apply(
    tag: &mut MatroskaTag,
    key: &str,
    value: &str,
    mean_key: Option<&str>,
) -> Result<(), AdapterError> {
    let group = mean_key.filter(|m| !m.is_empty());
    let (name, sub) = path(key, group);
    tag.set(name, sub, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MatroskaTag {
        let mut tag = MatroskaTag::new();
        tag.set("MOOD", None, "calm");
        tag.set("ORIGINAL", Some("TITLE"), "Oben");
        tag.set("ORIGINAL", Some("ARTIST"), "A");
        tag
    }

    #[test]
    fn flat_entries_report_empty_mean_key() {
        let entries = enumerate(&sample(), false);
        let view: Vec<_> = entries
            .iter()
            .map(|e| (e.key.as_str(), e.mean_key.as_deref()))
            .collect();
        assert_eq!(
            view,
            [("MOOD", Some("")), ("TITLE", Some("ORIGINAL")), ("ARTIST", Some("ORIGINAL"))]
        );
    }

    #[test]
    fn deleting_every_child_removes_the_parent() {
        let mut tag = sample();
        let mut entries = enumerate(&tag, false);
        delete(&mut tag, &mut entries[1]).unwrap();
        assert!(tag.simple_tags().contains_key("ORIGINAL"));
        delete(&mut tag, &mut entries[2]).unwrap();
        assert!(!tag.simple_tags().contains_key("ORIGINAL"));
    }

    #[test]
    fn ungroup_and_regroup() {
        let mut tag = MatroskaTag::new();
        tag.set("ORIGINAL", Some("TITLE"), "Oben");
        let mut entries = enumerate(&tag, false);
        let title = &mut entries[0];

        rename_mean_key(&mut tag, title, "").unwrap();
        assert_eq!(tag.get("TITLE", None).as_deref(), Some("Oben"));
        assert!(!tag.simple_tags().contains_key("ORIGINAL"));
        assert_eq!(title.mean_key.as_deref(), Some(""));

        rename_mean_key(&mut tag, title, "SOURCE").unwrap();
        assert_eq!(tag.get("SOURCE", Some("TITLE")).as_deref(), Some("Oben"));
        assert_eq!(tag.get("TITLE", None), None);
    }

    #[test]
    fn rename_inside_group_keeps_parent() {
        let mut tag = MatroskaTag::new();
        tag.set("ORIGINAL", Some("TITLE"), "Oben");
        let mut entries = enumerate(&tag, false);

        rename_key(&mut tag, &mut entries[0], "NAME").unwrap();
        assert_eq!(tag.get("ORIGINAL", Some("NAME")).as_deref(), Some("Oben"));
        assert_eq!(tag.live_children("ORIGINAL"), 1);
    }
}
