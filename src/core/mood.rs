use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// The fixed set of moods a journal entry can record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Excited,
    Calm,
    Anxious,
    Angry,
    Neutral,
}

impl Mood {
    pub const ALL: [Mood; 7] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Excited,
        Mood::Calm,
        Mood::Anxious,
        Mood::Angry,
        Mood::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Excited => "excited",
            Self::Calm => "calm",
            Self::Anxious => "anxious",
            Self::Angry => "angry",
            Self::Neutral => "neutral",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "happy" => Some(Self::Happy),
            "sad" => Some(Self::Sad),
            "excited" => Some(Self::Excited),
            "calm" => Some(Self::Calm),
            "anxious" => Some(Self::Anxious),
            "angry" => Some(Self::Angry),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Happy => "😊",
            Self::Sad => "😢",
            Self::Excited => "🤩",
            Self::Calm => "😌",
            Self::Anxious => "😰",
            Self::Angry => "😠",
            Self::Neutral => "😐",
        }
    }
}

/// Display glyph for a mood name; unknown names map to the neutral glyph.
pub fn emoji_for(name: &str) -> &'static str {
    Mood::from_name(name)
        .map(|mood| mood.emoji())
        .unwrap_or_else(|| Mood::Neutral.emoji())
}

/// A raster snapshot of the drawing surface, captured at save time and
/// immutable thereafter. Held as a PNG data URL, the encoding the drawing
/// surface produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Drawing(String);

impl Drawing {
    pub fn from_data_url(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn from_png_bytes(bytes: &[u8]) -> Self {
        Self(format!("{DATA_URL_PREFIX}{}", B64.encode(bytes)))
    }

    pub fn as_data_url(&self) -> &str {
        &self.0
    }

    /// Decode the snapshot back to raw PNG bytes.
    pub fn png_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        let encoded = self
            .0
            .strip_prefix(DATA_URL_PREFIX)
            .or_else(|| self.0.split_once(',').map(|(_, rest)| rest))
            .unwrap_or(&self.0);
        B64.decode(encoded)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: Uuid,
    pub mood: Mood,
    pub drawing: Drawing,
    pub timestamp: NaiveDateTime,
}

impl MoodEntry {
    pub fn new(mood: Mood, drawing: Drawing) -> Self {
        Self {
            id: Uuid::new_v4(),
            mood,
            drawing,
            timestamp: chrono::Local::now().naive_local(),
        }
    }

    /// File name for an exported drawing: mood plus entry date.
    pub fn export_file_name(&self) -> String {
        format!(
            "mood-{}-{}.png",
            self.mood.as_str(),
            self.timestamp.format("%Y-%m-%d")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn mood_names_roundtrip() {
        for mood in Mood::ALL {
            assert_eq!(Mood::from_name(mood.as_str()), Some(mood));
        }
        assert_eq!(Mood::from_name("ecstatic"), None);
    }

    #[test]
    fn unknown_mood_gets_neutral_emoji() {
        assert_eq!(emoji_for("happy"), "😊");
        assert_eq!(emoji_for("ecstatic"), "😐");
        assert_eq!(emoji_for(""), "😐");
    }

    #[test]
    fn drawing_roundtrips_png_bytes() {
        let bytes = b"\x89PNG\r\n\x1a\nfake";
        let drawing = Drawing::from_png_bytes(bytes);
        assert!(drawing.as_data_url().starts_with(DATA_URL_PREFIX));
        assert_eq!(drawing.png_bytes().unwrap(), bytes);
    }

    #[test]
    fn drawing_decodes_bare_base64() {
        let drawing = Drawing::from_data_url(B64.encode(b"raw"));
        assert_eq!(drawing.png_bytes().unwrap(), b"raw");
    }

    #[test]
    fn export_file_name_uses_mood_and_date() {
        let mut entry = MoodEntry::new(Mood::Calm, Drawing::from_png_bytes(b""));
        entry.timestamp = NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(entry.export_file_name(), "mood-calm-2025-03-10.png");
    }
}
