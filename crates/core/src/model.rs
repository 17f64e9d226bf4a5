use serde::{Deserialize, Deserializer};

/// metadata document returned by the embed provider for one episode.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceMetadata {
    /// playback urls; a well-formed document carries exactly one.
    #[serde(default, deserialize_with = "sources_or_empty")]
    pub sources: Vec<VideoSource>,
    #[serde(default)]
    pub tracks: Vec<SubtitleTrack>,
    /// set when the stream urls are shipped encrypted instead of in plain.
    #[serde(default)]
    pub encrypted: bool,
    #[serde(default)]
    pub intro: TimeWindow,
    #[serde(default)]
    pub outro: TimeWindow,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoSource {
    pub file: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// sidecar track advertised next to the video sources.
///
/// `kind` is an open set; only `captions` and `thumbnails` are meaningful to
/// this tool, so it stays a plain string the caller can match and report on.
#[derive(Debug, Clone, Deserialize)]
pub struct SubtitleTrack {
    pub kind: String,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub label: Option<String>,
}

impl SubtitleTrack {
    /// three-letter language code derived from the track label.
    pub fn language_code(&self) -> Option<String> {
        let label = self.label.as_deref()?;
        Some(label.chars().take(3).collect::<String>().to_lowercase())
    }

    /// extension of the final path segment of the track url.
    pub fn file_extension(&self) -> Option<String> {
        let url = reqwest::Url::parse(&self.file).ok()?;
        let path = url.path();
        path.rsplit('.').next().map(str::to_string)
    }
}

/// start/end offsets of an intro or outro sequence, in whole seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct TimeWindow {
    #[serde(default)]
    pub start: i64,
    #[serde(default)]
    pub end: i64,
}

// encrypted documents ship `sources` as an opaque string; decode those to an
// empty list so the caller can still read the tracks and the encrypted flag.
fn sources_or_empty<'de, D>(deserializer: D) -> Result<Vec<VideoSource>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_document() {
        let raw = r#"{
            "sources": [{"file": "https://cdn.example.net/master.m3u8", "type": "hls"}],
            "tracks": [
                {"file": "https://cdn.example.net/subs/eng-2.vtt", "label": "English", "kind": "captions", "default": true},
                {"file": "https://cdn.example.net/thumbnails.vtt", "kind": "thumbnails"}
            ],
            "encrypted": false,
            "intro": {"start": 90, "end": 210},
            "outro": {"start": 1300, "end": 1380},
            "server": 4
        }"#;

        let metadata: SourceMetadata = serde_json::from_str(raw).expect("document should parse");
        assert_eq!(metadata.sources.len(), 1);
        assert_eq!(metadata.tracks.len(), 2);
        assert!(!metadata.encrypted);
        assert_eq!(metadata.intro, TimeWindow { start: 90, end: 210 });
        assert_eq!(metadata.outro.end, 1380);
    }

    #[test]
    fn encrypted_documents_with_string_sources_still_parse() {
        let raw = r#"{
            "sources": "U2FsdGVkX1+8yb0pZXc=",
            "tracks": [{"file": "https://cdn.example.net/thumbnails.vtt", "kind": "thumbnails"}],
            "encrypted": true,
            "intro": {"start": 0, "end": 0},
            "outro": {"start": 0, "end": 0}
        }"#;

        let metadata: SourceMetadata = serde_json::from_str(raw).expect("document should parse");
        assert!(metadata.encrypted);
        assert!(metadata.sources.is_empty());
        assert_eq!(metadata.tracks.len(), 1);
    }

    #[test]
    fn missing_windows_default_to_zero() {
        let metadata: SourceMetadata =
            serde_json::from_str(r#"{"sources": []}"#).expect("document should parse");
        assert_eq!(metadata.intro, TimeWindow::default());
        assert_eq!(metadata.outro, TimeWindow::default());
        assert!(!metadata.encrypted);
    }

    #[test]
    fn language_code_is_first_three_label_chars_lowercased() {
        let track = SubtitleTrack {
            kind: "captions".to_string(),
            file: "https://cdn.example.net/subs/eng-2.vtt".to_string(),
            label: Some("English".to_string()),
        };
        assert_eq!(track.language_code().as_deref(), Some("eng"));
    }

    #[test]
    fn language_code_handles_short_labels() {
        let track = SubtitleTrack {
            kind: "captions".to_string(),
            file: String::new(),
            label: Some("It".to_string()),
        };
        assert_eq!(track.language_code().as_deref(), Some("it"));
    }

    #[test]
    fn file_extension_ignores_query_parameters() {
        let track = SubtitleTrack {
            kind: "captions".to_string(),
            file: "https://cdn.example.net/subs/eng-2.vtt?token=abc".to_string(),
            label: Some("English".to_string()),
        };
        assert_eq!(track.file_extension().as_deref(), Some("vtt"));
    }

    #[test]
    fn file_extension_requires_an_absolute_url() {
        let track = SubtitleTrack {
            kind: "captions".to_string(),
            file: "subs/eng-2.vtt".to_string(),
            label: None,
        };
        assert_eq!(track.file_extension(), None);
    }
}
