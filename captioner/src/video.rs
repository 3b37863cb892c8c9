use url::Url;

use crate::error::{Error, Result};

const VIDEO_ID_LEN: usize = 11;

fn is_video_id(candidate: &str) -> bool {
    candidate.len() == VIDEO_ID_LEN
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn is_platform_host(host: &str) -> bool {
    matches!(
        host.to_ascii_lowercase().as_str(),
        "youtube.com" | "www.youtube.com" | "m.youtube.com" | "music.youtube.com"
    )
}

/// Extract the 11-character video id from a bare id or a video URL.
///
/// Accepts `watch?v=`, `/shorts/`, `/embed/`, `/live/`, `/v/` and `youtu.be/`
/// links, with or without a scheme.
pub fn extract_video_id(input: &str) -> Result<String> {
    let input = input.trim();
    if is_video_id(input) {
        return Ok(input.to_string());
    }

    let with_scheme = if input.starts_with("http://") || input.starts_with("https://") {
        input.to_string()
    } else {
        format!("https://{input}")
    };
    let invalid = || Error::InvalidVideoId(input.to_string());
    let url = Url::parse(&with_scheme).map_err(|_| invalid())?;
    let host = url.host_str().ok_or_else(invalid)?;

    let candidate = if host.eq_ignore_ascii_case("youtu.be") {
        url.path_segments().and_then(|mut s| s.next()).map(str::to_string)
    } else if is_platform_host(host) {
        let mut segments = url.path_segments().into_iter().flatten();
        match segments.next() {
            Some("watch") => url
                .query_pairs()
                .find(|(k, _)| k == "v")
                .map(|(_, v)| v.into_owned()),
            Some("shorts" | "embed" | "live" | "v") => segments.next().map(str::to_string),
            _ => None,
        }
    } else {
        None
    };

    candidate
        .filter(|id| is_video_id(id))
        .ok_or_else(invalid)
}
