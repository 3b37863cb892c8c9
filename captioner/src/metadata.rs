//! Video metadata and caption track listing from the platform player API.

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result, Service};
use crate::types::{CaptionTrack, VideoDetails};

const CLIENT_NAME: &str = "ANDROID";
const CLIENT_VERSION: &str = "20.10.38";

/// Everything the player API tells us about one video.
#[derive(Debug, Clone)]
pub struct VideoInfo {
    pub details: VideoDetails,
    /// Caption tracks in the order the platform lists them. May be empty.
    pub tracks: Vec<CaptionTrack>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    playability_status: Option<PlayabilityStatus>,
    video_details: Option<RawVideoDetails>,
    captions: Option<RawCaptions>,
}

#[derive(Deserialize)]
struct PlayabilityStatus {
    status: String,
    reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVideoDetails {
    title: Option<String>,
    author: Option<String>,
    length_seconds: Option<String>,
    view_count: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCaptions {
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<RawCaptionTrack>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCaptionTrack {
    base_url: Option<String>,
    language_code: Option<String>,
    kind: Option<String>,
    name: Option<TrackName>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackName {
    simple_text: Option<String>,
    #[serde(default)]
    runs: Vec<TextRun>,
}

#[derive(Deserialize)]
struct TextRun {
    text: String,
}

impl TrackName {
    fn label(self) -> Option<String> {
        self.simple_text.or_else(|| {
            let joined: String = self.runs.into_iter().map(|r| r.text).collect();
            (!joined.is_empty()).then_some(joined)
        })
    }
}

/// Request body for the player endpoint.
pub(crate) fn player_request_body(video_id: &str) -> serde_json::Value {
    serde_json::json!({
        "context": {
            "client": {
                "clientName": CLIENT_NAME,
                "clientVersion": CLIENT_VERSION,
                "hl": "en"
            }
        },
        "videoId": video_id
    })
}

/// Decode a player API response.
///
/// A non-`OK` playability status is an error. A response without captions is
/// not: the returned track list is simply empty. Track entries lacking a
/// locator or language are skipped.
pub fn parse_player_response(video_id: &str, body: &str) -> Result<VideoInfo> {
    let response: PlayerResponse =
        serde_json::from_str(body).map_err(|e| Error::UnexpectedResponse {
            service: Service::Metadata,
            detail: format!("invalid player response: {e}"),
        })?;

    if let Some(playability) = response.playability_status {
        if playability.status != "OK" {
            return Err(Error::VideoUnavailable {
                video_id: video_id.to_string(),
                reason: playability.reason.unwrap_or(playability.status),
            });
        }
    }

    let raw = response.video_details.ok_or_else(|| Error::UnexpectedResponse {
        service: Service::Metadata,
        detail: "missing videoDetails".into(),
    })?;

    let details = VideoDetails {
        video_id: video_id.to_string(),
        title: raw.title.unwrap_or_default(),
        author: raw.author.unwrap_or_default(),
        duration_secs: raw
            .length_seconds
            .and_then(|s| s.parse().ok())
            .unwrap_or(0),
        view_count: raw.view_count.and_then(|s| s.parse().ok()),
    };

    let tracks = response
        .captions
        .and_then(|c| c.player_captions_tracklist_renderer)
        .map(|r| r.caption_tracks)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|raw| {
            let (Some(fetch_locator), Some(language_code)) = (raw.base_url, raw.language_code)
            else {
                debug!(%video_id, "skipping caption track without locator or language");
                return None;
            };
            let display_name = raw
                .name
                .and_then(TrackName::label)
                .unwrap_or_else(|| language_code.clone());
            Some(CaptionTrack {
                language_code,
                display_name,
                is_auto_generated: raw.kind.as_deref() == Some("asr"),
                fetch_locator,
            })
        })
        .collect();

    Ok(VideoInfo { details, tracks })
}

/// Fetch metadata and caption tracks for a video.
#[cfg(feature = "client")]
pub async fn fetch_video_info(
    client: &reqwest::Client,
    endpoint: &str,
    video_id: &str,
) -> Result<VideoInfo> {
    tracing::info!(%video_id, "fetching video metadata");

    let request = client
        .post(endpoint)
        .query(&[("prettyPrint", "false")])
        .json(&player_request_body(video_id));
    let response = crate::http::send(Service::Metadata, request).await?;
    let body = crate::http::read_text(Service::Metadata, response).await?;

    let info = parse_player_response(video_id, &body)?;
    debug!(
        %video_id,
        title = %info.details.title,
        tracks = info.tracks.len(),
        "video metadata decoded"
    );
    Ok(info)
}
