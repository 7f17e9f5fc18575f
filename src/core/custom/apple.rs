//! core/custom/apple.rs
//! MP4 atoms: flat atoms keyed by box type, dash-boxes keyed by name + mean-string.

use super::{AppleLocator, Capabilities, Change, Locator, MetadataEntry, stale};
use crate::core::error::AdapterError;
use crate::core::tags::apple::{AppleAtom, AppleData, AppleTag, BoxType, DEFAULT_MEAN};

pub(super) fn enumerate(tag: &AppleTag, include_binary: bool) -> Vec<MetadataEntry> {
    tag.atoms()
        .iter()
        .filter_map(|atom| match atom {
            AppleAtom::Flat { box_type, data } => {
                let locator = Locator::Apple(AppleLocator::Flat { box_type: *box_type });
                match data {
                    AppleData::Text(values) => Some(MetadataEntry::text(
                        box_type.text(),
                        values.clone(),
                        Capabilities::FLAT,
                        locator,
                    )),
                    AppleData::Binary { bytes, .. } if include_binary => Some(MetadataEntry::binary(
                        box_type.text(),
                        bytes.clone(),
                        Capabilities::DELETE_ONLY,
                        locator,
                    )),
                    AppleData::Binary { .. } => None,
                }
            }
            AppleAtom::DashBox { mean, name, value } => Some(
                MetadataEntry::text(
                    name,
                    vec![value.clone()],
                    Capabilities::ALL,
                    Locator::Apple(AppleLocator::DashBox {
                        mean: mean.clone(),
                        name: name.clone(),
                    }),
                )
                .with_mean_key(mean),
            ),
        })
        .collect()
}

fn locator(entry: &MetadataEntry) -> Result<AppleLocator, AdapterError> {
    match &entry.locator {
        Locator::Apple(loc) => Ok(loc.clone()),
        _ => Err(stale(entry)),
    }
}

pub(super) fn edit_value(
    tag: &mut AppleTag,
    entry: &mut MetadataEntry,
    value: &str,
) -> Result<Change, AdapterError> {
    let change = match locator(entry)? {
        AppleLocator::Flat { box_type } => {
            if tag.flat(box_type).is_none() {
                return Err(stale(entry));
            }
            tag.set_flat(box_type, AppleData::Text(vec![value.to_string()]));
            Change::Value
        }
        AppleLocator::DashBox { mean, name } => {
            if tag.dash_box(&mean, &name).is_none() {
                return Err(stale(entry));
            }
            // An empty value clears the dash-box.
            tag.set_dash_box(&mean, &name, value);
            if value.is_empty() {
                Change::Structure
            } else {
                Change::Value
            }
        }
    };
    entry.values = vec![value.to_string()];
    Ok(change)
}

pub(super) fn rename_key(
    tag: &mut AppleTag,
    entry: &mut MetadataEntry,
    new_key: &str,
) -> Result<Change, AdapterError> {
    match locator(entry)? {
        AppleLocator::Flat { box_type } => {
            let target = BoxType::parse(new_key)
                .ok_or_else(|| AdapterError::rejected("box type", new_key))?;
            let data = tag.flat(box_type).cloned().ok_or_else(|| stale(entry))?;
            tag.remove_flat(box_type);
            tag.set_flat(target, data);
            entry.locator = Locator::Apple(AppleLocator::Flat { box_type: target });
        }
        AppleLocator::DashBox { mean, name } => {
            let value = tag
                .dash_box(&mean, &name)
                .map(str::to_string)
                .ok_or_else(|| stale(entry))?;
            tag.clear_dash_box(&mean, &name);
            tag.set_dash_box(&mean, new_key, &value);
            entry.locator = Locator::Apple(AppleLocator::DashBox {
                mean,
                name: new_key.to_string(),
            });
        }
    }
    entry.key = new_key.to_string();
    Ok(Change::Structure)
}

pub(super) fn rename_mean_key(
    tag: &mut AppleTag,
    entry: &mut MetadataEntry,
    new_mean: &str,
) -> Result<Change, AdapterError> {
    let AppleLocator::DashBox { mean, name } = locator(entry)? else {
        return Err(AdapterError::NotPermitted(crate::core::error::Operation::RenameMeanKey));
    };
    if new_mean.is_empty() {
        return Err(AdapterError::rejected("mean-string", new_mean));
    }
    let value = tag
        .dash_box(&mean, &name)
        .map(str::to_string)
        .ok_or_else(|| stale(entry))?;
    tag.clear_dash_box(&mean, &name);
    tag.set_dash_box(new_mean, &name, &value);

    entry.mean_key = Some(new_mean.to_string());
    entry.locator = Locator::Apple(AppleLocator::DashBox {
        mean: new_mean.to_string(),
        name,
    });
    Ok(Change::Structure)
}

pub(super) fn delete(
    tag: &mut AppleTag,
    entry: &mut MetadataEntry,
) -> Result<Change, AdapterError> {
    let removed = match locator(entry)? {
        AppleLocator::Flat { box_type } => tag.remove_flat(box_type),
        AppleLocator::DashBox { mean, name } => tag.clear_dash_box(&mean, &name),
    };
    if removed {
        Ok(Change::Structure)
    } else {
        Err(stale(entry))
    }
}

/// New entries are always dash-boxes; no mean-string means iTunes'.
pub(super) fn apply(
    tag: &mut AppleTag,
    key: &str,
    value: &str,
    mean_key: Option<&str>,
) -> Result<(), AdapterError> {
    if value.is_empty() {
        return Err(AdapterError::rejected("dash-box value", value));
    }
    let mean = mean_key.filter(|m| !m.is_empty()).unwrap_or(DEFAULT_MEAN);
    tag.set_dash_box(mean, key, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tags::apple::COVER_ART;

    fn sample() -> AppleTag {
        let mut tag = AppleTag::new();
        tag.set_flat(BoxType::parse("©nam").unwrap(), AppleData::Text(vec!["Oben".into()]));
        tag.set_flat(
            COVER_ART,
            AppleData::Binary {
                class: 13,
                bytes: vec![0xFF, 0xD8],
            },
        );
        tag.set_dash_box(DEFAULT_MEAN, "MOOD", "calm");
        tag
    }

    #[test]
    fn cover_art_is_gated_and_dash_boxes_carry_mean() {
        let tag = sample();
        let plain = enumerate(&tag, false);
        assert_eq!(plain.len(), 2);
        assert_eq!(plain[0].key, "©nam");
        assert_eq!(plain[0].mean_key, None);
        assert_eq!(plain[1].mean_key.as_deref(), Some(DEFAULT_MEAN));

        let all = enumerate(&tag, true);
        assert_eq!(all.len(), 3);
        assert_eq!(all[1].binary.as_deref(), Some(&[0xFF, 0xD8][..]));
    }

    #[test]
    fn renames_preserve_value() {
        let mut tag = sample();
        let mut entries = enumerate(&tag, false);
        let mood = &mut entries[1];

        rename_key(&mut tag, mood, "FEELING").unwrap();
        rename_mean_key(&mut tag, mood, "org.example").unwrap();
        assert_eq!(tag.dash_box("org.example", "FEELING"), Some("calm"));
        assert_eq!(tag.dash_box(DEFAULT_MEAN, "MOOD"), None);
        assert!(rename_mean_key(&mut tag, mood, "").is_err());

        let title = &mut entries[0];
        assert!(rename_key(&mut tag, title, "title").is_err());
        rename_key(&mut tag, title, "©alb").unwrap();
        assert!(tag.flat(BoxType::parse("©alb").unwrap()).is_some());
    }

    #[test]
    fn emptying_a_dash_box_is_structural() {
        let mut tag = sample();
        let mut entries = enumerate(&tag, false);
        assert_eq!(edit_value(&mut tag, &mut entries[1], ""), Ok(Change::Structure));
        assert_eq!(enumerate(&tag, false).len(), 1);
    }
}
