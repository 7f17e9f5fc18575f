//! core/lyrics.rs
//! Lyrics from `.lrc` sidecars and LRCLib lookup responses.

use serde::Deserialize;
use tracing::{debug, info};

use super::grouping::base_name;
use super::types::FileEntry;

fn is_sidecar(entry: &FileEntry) -> bool {
    entry.extension().as_deref() == Some("lrc")
}

/// Copy each `.lrc` sidecar's text into the Lyrics field of the audio files that
/// share its base name. Returns how many audio entries were updated.
pub fn embed_sidecars(entries: &mut [FileEntry]) -> usize {
    let sidecars: Vec<(String, String)> = entries
        .iter()
        .filter(|e| is_sidecar(e))
        .map(|e| {
            (
                base_name(&e.name).to_string(),
                String::from_utf8_lossy(e.buffer()).into_owned(),
            )
        })
        .collect();

    let mut updated = 0;
    for entry in entries.iter_mut().filter(|e| !is_sidecar(e)) {
        let base = base_name(&entry.name);
        if let Some((_, text)) = sidecars.iter().find(|(b, _)| b == base) {
            debug!(file = %entry.name, chars = text.len(), "embedding sidecar lyrics");
            entry.tag.edit_standard(|s| s.lyrics = Some(text.clone()));
            updated += 1;
        }
    }

    info!(updated, sidecars = sidecars.len(), "embedded sidecar lyrics");
    updated
}

/// One LRCLib `/api/get` response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LrcLibRecord {
    pub id: Option<i64>,
    pub track_name: Option<String>,
    pub artist_name: Option<String>,
    pub album_name: Option<String>,
    pub duration: Option<f32>,
    pub instrumental: Option<bool>,
    pub plain_lyrics: Option<String>,
    pub synced_lyrics: Option<String>,
}

impl LrcLibRecord {
    /// Synced lyrics, else plain lyrics. Instrumentals have none.
    pub fn preferred_lyrics(&self) -> Option<&str> {
        if self.instrumental == Some(true) {
            return None;
        }
        self.synced_lyrics
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.plain_lyrics.as_deref().filter(|s| !s.is_empty()))
    }
}

pub fn parse_lrclib(body: &str) -> Result<LrcLibRecord, serde_json::Error> {
    serde_json::from_str(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sidecar_text_lands_in_matching_audio_only() {
        let mut entries = vec![
            FileEntry::from_bytes("track.mp3", Vec::new()).unwrap(),
            FileEntry::from_bytes("track.lrc", b"[00:01.00]hello".to_vec()).unwrap(),
            FileEntry::from_bytes("other.mp3", Vec::new()).unwrap(),
        ];
        assert_eq!(embed_sidecars(&mut entries), 1);
        assert_eq!(entries[0].tag.standard().lyrics.as_deref(), Some("[00:01.00]hello"));
        assert_eq!(entries[2].tag.standard().lyrics, None);
        assert!(entries[0].tag.is_dirty());
    }

    #[test]
    fn lrclib_prefers_synced_lyrics() {
        let record = parse_lrclib(
            r#"{"id":7,"trackName":"Oben","duration":201.5,"instrumental":false,
                "plainLyrics":"hello","syncedLyrics":"[00:01.00]hello"}"#,
        )
        .unwrap();
        assert_eq!(record.track_name.as_deref(), Some("Oben"));
        assert_eq!(record.preferred_lyrics(), Some("[00:01.00]hello"));

        let plain = LrcLibRecord {
            plain_lyrics: Some("hello".into()),
            synced_lyrics: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(plain.preferred_lyrics(), Some("hello"));

        let instrumental = LrcLibRecord {
            instrumental: Some(true),
            ..plain
        };
        assert_eq!(instrumental.preferred_lyrics(), None);
    }
}
