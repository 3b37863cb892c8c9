//! Video caption library: URL in, timestamped transcript or summary out.
//!
//! **captioner** looks up a video's caption tracks, picks the best one for the
//! requested language, downloads the timed-text document and parses it into
//! clean `[MM:SS]` segments. It can also ask an external summary service for a
//! synopsis of the same captions.
//!
//! # Quick start
//!
//! ```rust,no_run
//! # #[tokio::main]
//! # async fn main() -> captioner::Result<()> {
//! let transcript = captioner::get_transcript("https://youtu.be/dQw4w9WgXcQ").await?;
//! for segment in &transcript.segments {
//!     println!("{} {}", segment.timestamp, segment.text);
//! }
//!
//! // Summaries need a summary service (CAPTIONER_SUMMARY_URL).
//! let options = captioner::ClientOptions::from_env()?
//!     .mode(captioner::SummaryMode::BulletPoint);
//! let summary = captioner::get_summary_with_options("dQw4w9WgXcQ", &options).await?;
//! println!("{}", summary.to_markdown());
//! # Ok(())
//! # }
//! ```
//!
//! The parser works offline too; see [`parse_timed_text`].

pub mod captions;
pub mod config;
pub mod error;
pub mod format;
#[cfg(feature = "client")]
pub(crate) mod http;
pub mod metadata;
pub mod summary;
pub mod timedtext;
pub mod tracks;
pub mod types;
pub mod video;

pub use config::{ClientOptions, Language, SummaryMode};
pub use error::{Error, Result, Service};
pub use format::format_timestamp;
pub use timedtext::{parse_document as parse_timed_text, TimedTextFormat};
pub use tracks::select_track;
pub use types::{CaptionTrack, Segment, Summary, Transcript, VideoDetails};
pub use video::extract_video_id;

#[cfg(feature = "client")]
use tracing::{info, warn};

/// Everything needed after track selection.
#[cfg(feature = "client")]
struct Selected {
    http: reqwest::Client,
    details: VideoDetails,
    track: CaptionTrack,
}

#[cfg(feature = "client")]
async fn lookup_and_select(input: &str, options: &ClientOptions) -> Result<Selected> {
    let video_id = video::extract_video_id(input)?;
    let http = http::build_client(options)?;
    let info = metadata::fetch_video_info(&http, &options.player_endpoint, &video_id).await?;

    let track = tracks::select_track(&info.tracks, &options.language)
        .cloned()
        .ok_or_else(|| Error::NoCaptions {
            video_id: video_id.clone(),
        })?;
    info!(
        %video_id,
        language = %track.language_code,
        kind = track.kind(),
        available = info.tracks.len(),
        "caption track selected"
    );

    Ok(Selected {
        http,
        details: info.details,
        track,
    })
}

/// Fetch the transcript of a video with default options.
#[cfg(feature = "client")]
pub async fn get_transcript(input: &str) -> Result<Transcript> {
    get_transcript_with_options(input, &ClientOptions::default()).await
}

/// Fetch the transcript of a video (id or URL) with custom options.
///
/// An empty `segments` list means the track exists but holds no spoken text.
#[cfg(feature = "client")]
pub async fn get_transcript_with_options(
    input: &str,
    options: &ClientOptions,
) -> Result<Transcript> {
    let Selected {
        http,
        details,
        track,
    } = lookup_and_select(input, options).await?;

    let document = captions::fetch_caption_document(&http, &track).await?;
    let segments = timedtext::parse_document(&document);
    info!(
        video_id = %details.video_id,
        segments = segments.len(),
        "transcript parsed"
    );

    Ok(Transcript {
        video: details,
        track,
        segments,
    })
}

/// Summarize a video with options read from the environment.
#[cfg(feature = "client")]
pub async fn get_summary(input: &str) -> Result<Summary> {
    get_summary_with_options(input, &ClientOptions::from_env()?).await
}

/// Summarize a video (id or URL) with custom options.
///
/// Summary generation and title translation run concurrently. A failed
/// summary fails the call; a failed translation keeps the original title.
#[cfg(feature = "client")]
pub async fn get_summary_with_options(input: &str, options: &ClientOptions) -> Result<Summary> {
    let endpoint = options
        .summary_endpoint
        .as_deref()
        .ok_or(Error::SummaryNotConfigured)?;

    let Selected {
        http,
        details,
        track,
    } = lookup_and_select(input, options).await?;

    let client = summary::SummaryClient::new(&http, endpoint);
    let caption_args = captions::locator_query(&track.fetch_locator).unwrap_or_default();
    let language = options.language.code();

    let (text, title) = summarize_and_translate(
        client.summarize(caption_args, language, options.mode, &details.title),
        client.translate(&details.title, language),
        &details,
    )
    .await?;
    info!(
        video_id = %details.video_id,
        mode = %options.mode,
        chars = text.len(),
        "summary generated"
    );

    Ok(Summary {
        video: details,
        track,
        language: language.to_string(),
        mode: options.mode,
        title,
        text,
    })
}

/// Run summary and title translation together.
///
/// The summary's error wins; a failed translation falls back to the
/// original title.
#[cfg(feature = "client")]
async fn summarize_and_translate(
    summary: impl std::future::Future<Output = Result<String>>,
    translation: impl std::future::Future<Output = Result<String>>,
    details: &VideoDetails,
) -> Result<(String, String)> {
    let (text, title) = tokio::join!(summary, translation);

    let text = text?;
    let title = title.unwrap_or_else(|e| {
        warn!(
            video_id = %details.video_id,
            service = %Service::Translation,
            error = %e,
            "title translation failed, keeping original title"
        );
        details.title.clone()
    });
    Ok((text, title))
}

/// List the caption tracks of a video without fetching any of them.
#[cfg(feature = "client")]
pub async fn list_tracks(
    input: &str,
    options: &ClientOptions,
) -> Result<(VideoDetails, Vec<CaptionTrack>)> {
    let video_id = video::extract_video_id(input)?;
    let http = http::build_client(options)?;
    let info = metadata::fetch_video_info(&http, &options.player_endpoint, &video_id).await?;
    Ok((info.details, info.tracks))
}
