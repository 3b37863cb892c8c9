use serde::{Deserialize, Serialize};

use crate::config::SummaryMode;
use crate::format;

/// One caption track offered for a video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionTrack {
    /// Platform language code, e.g. "en" or "zh-TW".
    pub language_code: String,
    /// Human-readable label, e.g. "English (auto-generated)".
    pub display_name: String,
    /// True for speech-recognition tracks, false for human-authored ones.
    pub is_auto_generated: bool,
    /// Opaque URL the raw caption document is fetched from.
    pub fetch_locator: String,
}

impl CaptionTrack {
    /// "auto-generated" or "manual".
    pub fn kind(&self) -> &'static str {
        if self.is_auto_generated {
            "auto-generated"
        } else {
            "manual"
        }
    }
}

/// Metadata about a video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoDetails {
    pub video_id: String,
    pub title: String,
    pub author: String,
    pub duration_secs: u64,
    pub view_count: Option<u64>,
}

/// A timed line of caption text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Offset from the start of the video.
    pub start_ms: u64,
    /// `start_ms` rendered as `[MM:SS]`.
    pub timestamp: String,
    pub text: String,
}

impl Segment {
    pub fn new(start_ms: u64, text: impl Into<String>) -> Self {
        Self {
            start_ms,
            timestamp: format::format_timestamp(start_ms),
            text: text.into(),
        }
    }
}

/// Parsed captions of one video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub video: VideoDetails,
    pub track: CaptionTrack,
    /// In caption document order. Empty when the track holds no spoken text.
    pub segments: Vec<Segment>,
}

impl Transcript {
    /// Full text (all segments joined by spaces).
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// One `[MM:SS] text` line per segment.
    pub fn to_timestamped_text(&self) -> String {
        format::format_segments(&self.segments)
    }

    /// Format as a Markdown report.
    pub fn to_markdown(&self) -> String {
        format::format_transcript(self)
    }

    /// Format as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Generated synopsis of one video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub video: VideoDetails,
    /// Caption track the summary service read.
    pub track: CaptionTrack,
    pub language: String,
    pub mode: SummaryMode,
    /// Video title translated into `language`, or the original title when
    /// translation failed.
    pub title: String,
    pub text: String,
}

impl Summary {
    /// Format as a Markdown report.
    pub fn to_markdown(&self) -> String {
        format::format_summary(self)
    }

    /// Format as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
