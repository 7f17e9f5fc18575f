//! Loading, saving, grouping and exporting real byte buffers.

use id3::{Tag, TagLike, Version};
use serde_json::json;

use tagwright::core::batch::CancelFlag;
use tagwright::core::custom::{self, Id3FrameHint, MetadataEntry};
use tagwright::core::export::{self, BinaryPolicy, ExportFormat, ExportMode, Resolver};
use tagwright::core::family::{ContainerFamily, classify};
use tagwright::core::grouping::group_by_base_name;
use tagwright::core::tags::NativeTag;
use tagwright::core::types::FileEntry;
use tagwright::core::{accessor, catalog, csv, library, lyrics};

const AUDIO: &[u8] = b"\xFF\xFB\x90\x00audio-frames";

fn tagged_mp3(title: &str) -> Vec<u8> {
    let mut tag = Tag::new();
    tag.set_title(title);
    tag.set_artist("Band");
    let mut out = Vec::new();
    tag.write_to(&mut out, Version::Id3v24).unwrap();
    out.extend_from_slice(AUDIO);
    out
}

#[test]
fn classify_by_descriptor() {
    assert_eq!(classify("audio/x-id3"), Some(ContainerFamily::Id3));
    assert_eq!(classify("unknown/format"), None);
}

#[test]
fn group_audio_with_sidecars() {
    let entries: Vec<FileEntry> = ["track.mp3", "track.lrc", "other.mp3"]
        .into_iter()
        .map(|n| FileEntry::from_bytes(n, Vec::new()).unwrap())
        .collect();
    let groups = group_by_base_name(&entries);
    let view: Vec<(&str, Vec<&str>)> = groups
        .iter()
        .map(|(k, v)| (k.as_str(), v.iter().map(|e| e.name.as_str()).collect()))
        .collect();
    assert_eq!(
        view,
        [("track", vec!["track.mp3", "track.lrc"]), ("other", vec!["other.mp3"])]
    );
}

#[test]
fn flatten_scalar_pair() {
    let table = csv::flatten(&[json!({"a": "x", "b": [1, 2]})]);
    assert_eq!(table.headers, ["a", "b"]);
    assert_eq!(table.rows, [["x", "[1,2]"]]);
}

#[test]
fn non_numeric_input_clears_a_number_field() {
    let mut entry = FileEntry::from_bytes("a.mp3", tagged_mp3("T")).unwrap();
    let track = catalog::find("Track").unwrap();

    accessor::set(Some("7"), &mut entry.tag, track);
    assert_eq!(accessor::get("Track", &entry), "7");

    accessor::set(Some("abc"), &mut entry.tag, track);
    assert_eq!(entry.tag.standard().track, None);
    assert_eq!(accessor::get("Track", &entry), "");
}

#[test]
fn common_export_has_no_format_tags_and_all_app_has_wrappers() {
    let mut entry = FileEntry::from_bytes("a.mp3", tagged_mp3("Oben")).unwrap();
    entry.tag.push_tag(NativeTag::empty(ContainerFamily::Ape).unwrap());
    let files = [entry];

    let common = Resolver::new(ExportMode::Common, BinaryPolicy::Omit);
    let common = export::file_to_json(&files[0], &common);
    assert!(common.get("Tags").is_none());
    assert_eq!(common["Title"], "Oben");
    assert_eq!(common["Artists"], json!(["Band"]));

    let all = Resolver::new(ExportMode::AllApp, BinaryPolicy::Omit);
    let all = export::file_to_json(&files[0], &all);
    assert_eq!(all["Tags"].as_array().map(Vec::len), Some(2));
    assert_eq!(all["StartTag"]["Tags"][0]["TagType"], "ID3");
    assert_eq!(all["EndTag"]["Tags"][0]["TagType"], "APE");
    assert!(all["CustomMetadata"].is_array());

    let (text, report) = export::export_files(
        &files,
        ExportFormat::Json,
        &Resolver::default(),
        &CancelFlag::new(),
        |_| {},
    )
    .unwrap();
    assert_eq!(report.processed, 1);
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed[0]["FileName"], "a.mp3");
}

#[test]
fn cancelled_export_is_empty() {
    let files = [FileEntry::from_bytes("a.mp3", tagged_mp3("x")).unwrap()];
    let cancel = CancelFlag::new();
    cancel.cancel();
    let (values, report) = export::collect(&files, &Resolver::default(), &cancel, |_| {});
    assert!(values.is_empty());
    assert!(report.cancelled);
}

#[test]
fn save_and_reload_keeps_audio_and_edits() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("song.mp3");
    std::fs::write(&path, tagged_mp3("Before")).unwrap();

    let mut entry = library::load_file(&path).unwrap();
    assert_eq!(entry.tag.standard().title.as_deref(), Some("Before"));

    accessor::set(Some("After"), &mut entry.tag, catalog::find("Title").unwrap());
    let hint = Id3FrameHint::UserText;
    custom::apply_new_entry(ContainerFamily::Id3, &mut entry.tag, "MOOD", "calm", None, hint)
        .unwrap();
    library::save_file(&path, &mut entry).unwrap();
    assert!(!entry.tag.is_dirty());

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.ends_with(AUDIO));

    let reloaded = library::load_file(&path).unwrap();
    let standard = reloaded.tag.standard();
    assert_eq!(standard.title.as_deref(), Some("After"));
    assert_eq!(standard.artists, ["Band"]);
    let mood = custom::enumerate(ContainerFamily::Id3, &reloaded.tag, false)
        .unwrap()
        .into_iter()
        .find(|e| e.key == "MOOD")
        .unwrap();
    assert_eq!(mood.values, ["calm"]);
}

#[test]
fn sidecar_lyrics_survive_a_save() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("song.mp3"), tagged_mp3("x")).unwrap();
    std::fs::write(dir.path().join("song.lrc"), "[00:01.00]la la").unwrap();

    let paths = library::collect_paths(&[dir.path().to_path_buf()]).unwrap();
    let mut entries: Vec<FileEntry> = paths
        .iter()
        .map(|p| library::load_file(p).unwrap())
        .collect();
    assert_eq!(lyrics::embed_sidecars(&mut entries), 1);

    let (path, entry) = paths
        .iter()
        .zip(entries.iter_mut())
        .find(|(_, e)| e.name == "song.mp3")
        .unwrap();
    library::save_file(path, entry).unwrap();

    let reloaded = library::load_file(path).unwrap();
    assert_eq!(reloaded.tag.standard().lyrics.as_deref(), Some("[00:01.00]la la"));
}

fn title_entry(entry: &FileEntry) -> MetadataEntry {
    custom::enumerate(ContainerFamily::Id3, &entry.tag, false)
        .unwrap()
        .into_iter()
        .find(|e| e.key == "TIT2")
        .unwrap()
}

#[test]
fn frame_edit_shows_in_standard_fields_and_export() {
    let mut entry = FileEntry::from_bytes("a.mp3", tagged_mp3("Oben")).unwrap();
    let mut title = title_entry(&entry);
    custom::edit_value(&mut entry.tag, &mut title, "Unten").unwrap();

    assert_eq!(accessor::get("Title", &entry), "Unten");

    let json = export::file_to_json(&entry, &Resolver::new(ExportMode::AllApp, BinaryPolicy::Omit));
    assert_eq!(json["Title"], "Unten");
    assert_eq!(json["Tags"][0]["Frames"][0]["FrameId"], "TIT2");
    assert_eq!(json["Tags"][0]["Frames"][0]["Text"], json!(["Unten"]));
}

#[test]
fn standard_set_shows_as_a_frame_entry() {
    let mut entry = FileEntry::from_bytes("a.mp3", tagged_mp3("Oben")).unwrap();
    accessor::set(Some("Unten"), &mut entry.tag, catalog::find("Title").unwrap());

    assert_eq!(title_entry(&entry).values, ["Unten"]);
}

#[test]
fn last_title_edit_wins_on_save() {
    let mut entry = FileEntry::from_bytes("a.mp3", tagged_mp3("Oben")).unwrap();
    accessor::set(Some("A"), &mut entry.tag, catalog::find("Title").unwrap());
    let mut title = title_entry(&entry);
    assert_eq!(title.values, ["A"]);
    custom::edit_value(&mut entry.tag, &mut title, "B").unwrap();

    let bytes = entry.commit().unwrap().to_vec();
    let reloaded = FileEntry::from_bytes("a.mp3", bytes).unwrap();
    assert_eq!(reloaded.tag.standard().title.as_deref(), Some("B"));
}
