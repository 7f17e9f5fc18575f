//! Custom metadata adapter, exercised through the public API only.

use tagwright::core::custom::{self, Change, Id3FrameHint, MetadataEntry};
use tagwright::core::error::AdapterError;
use tagwright::core::family::ContainerFamily;
use tagwright::core::tags::{Layout, NativeTag, TagFile};

const WRITABLE: [ContainerFamily; 7] = [
    ContainerFamily::Id3,
    ContainerFamily::Apple,
    ContainerFamily::Xiph,
    ContainerFamily::Matroska,
    ContainerFamily::Asf,
    ContainerFamily::Ape,
    ContainerFamily::Png,
];

fn with_empty(family: ContainerFamily) -> TagFile {
    let mut file = TagFile::new(Layout::Container);
    file.push_tag(NativeTag::empty(family).unwrap());
    file
}

fn add(file: &mut TagFile, family: ContainerFamily, key: &str, value: &str, mean: Option<&str>) {
    custom::apply_new_entry(family, file, key, value, mean, Id3FrameHint::default()).unwrap();
}

fn find(file: &TagFile, family: ContainerFamily, key: &str) -> Option<MetadataEntry> {
    custom::enumerate(family, file, false)
        .unwrap()
        .into_iter()
        .find(|e| e.key == key)
}

#[test]
fn apply_new_entry_adds_exactly_one_entry() {
    for family in WRITABLE {
        let mut file = with_empty(family);
        let before = custom::enumerate(family, &file, false).unwrap();

        add(&mut file, family, "MYKEY", "v1", None);

        let after = custom::enumerate(family, &file, false).unwrap();
        assert_eq!(after.len(), before.len() + 1, "{family}");
        let added = after.iter().find(|e| e.key == "MYKEY").unwrap();
        assert_eq!(added.values, ["v1"], "{family}");
        assert_eq!(added.family(), family);
    }
}

#[test]
fn edit_then_rename_keeps_the_edited_value() {
    for family in WRITABLE.into_iter().filter(|f| *f != ContainerFamily::Png) {
        let mut file = with_empty(family);
        add(&mut file, family, "MYKEY", "v1", None);

        let mut entry = find(&file, family, "MYKEY").unwrap();
        assert_eq!(custom::edit_value(&mut file, &mut entry, "v2"), Ok(Change::Value));
        assert_eq!(
            custom::rename_key(&mut file, &mut entry, "OTHERKEY"),
            Ok(Change::Structure),
            "{family}"
        );

        assert!(find(&file, family, "MYKEY").is_none(), "{family}");
        let renamed = find(&file, family, "OTHERKEY").unwrap();
        assert_eq!(renamed.values, ["v2"], "{family}");
    }
}

#[test]
fn png_keywords_only_take_value_edits() {
    let mut file = with_empty(ContainerFamily::Png);
    add(&mut file, ContainerFamily::Png, "Author", "me", None);
    let mut entry = find(&file, ContainerFamily::Png, "Author").unwrap();

    assert!(matches!(
        custom::rename_key(&mut file, &mut entry, "Creator"),
        Err(AdapterError::NotPermitted(_))
    ));
    assert!(matches!(
        custom::delete(&mut file, &mut entry),
        Err(AdapterError::NotPermitted(_))
    ));
    assert_eq!(custom::edit_value(&mut file, &mut entry, "you"), Ok(Change::Value));
}

#[test]
fn matroska_parent_goes_with_its_last_child() {
    let family = ContainerFamily::Matroska;
    let mut file = with_empty(family);
    for key in ["TITLE", "ARTIST"] {
        add(&mut file, family, key, "x", Some("ORIGINAL"));
    }

    let entries = custom::enumerate(family, &file, false).unwrap();
    assert!(entries.iter().all(|e| e.mean_key.as_deref() == Some("ORIGINAL")));

    for mut entry in entries {
        assert_eq!(custom::delete(&mut file, &mut entry), Ok(Change::Structure));
    }

    let Some(NativeTag::Matroska(tag)) = file.tag(family) else {
        panic!("matroska tag vanished");
    };
    assert!(tag.simple_tags().is_empty());
}

#[test]
fn xiph_rename_moves_every_value() {
    let family = ContainerFamily::Xiph;
    let mut file = with_empty(family);
    add(&mut file, family, "PERFORMER", "A", None);
    add(&mut file, family, "PERFORMER", "B", None);

    let mut entry = find(&file, family, "PERFORMER").unwrap();
    assert_eq!(entry.values, ["A", "B"]);
    custom::rename_key(&mut file, &mut entry, "player").unwrap();

    let renamed = find(&file, family, "PLAYER").unwrap();
    assert_eq!(renamed.values, ["A", "B"]);
}

#[test]
fn apple_mean_key_rename_moves_the_dash_box() {
    let family = ContainerFamily::Apple;
    let mut file = with_empty(family);
    add(&mut file, family, "MOOD", "calm", Some("org.example"));

    let mut entry = find(&file, family, "MOOD").unwrap();
    assert_eq!(entry.mean_key.as_deref(), Some("org.example"));
    custom::rename_mean_key(&mut file, &mut entry, "com.apple.iTunes").unwrap();

    let moved = find(&file, family, "MOOD").unwrap();
    assert_eq!(moved.mean_key.as_deref(), Some("com.apple.iTunes"));
    assert_eq!(moved.values, ["calm"]);
}

#[test]
fn absent_and_unsupported_families_are_told_apart() {
    let file = TagFile::new(Layout::NonContainer);
    assert_eq!(
        custom::enumerate(ContainerFamily::Ape, &file, false),
        Err(AdapterError::FamilyAbsent(ContainerFamily::Ape))
    );
    assert_eq!(
        custom::enumerate(ContainerFamily::Riff, &file, false),
        Err(AdapterError::Unsupported(ContainerFamily::Riff))
    );

    let empty = with_empty(ContainerFamily::Ape);
    assert_eq!(custom::enumerate(ContainerFamily::Ape, &empty, false), Ok(Vec::new()));
}

#[test]
fn apply_creates_the_family_tag_when_missing() {
    let mut file = TagFile::new(Layout::NonContainer);
    custom::apply_new_entry(
        ContainerFamily::Id3,
        &mut file,
        "MusicBrainz Album Id",
        "abc",
        None,
        Id3FrameHint::UserText,
    )
    .unwrap();
    assert_eq!(file.families(), [ContainerFamily::Id3]);
    let hint = Id3FrameHint::UserText;
    let xmp = custom::apply_new_entry(ContainerFamily::Xmp, &mut file, "k", "v", None, hint);
    assert!(xmp.is_err());
}
