use crate::types::{Segment, Summary, Transcript, VideoDetails};

/// Format a millisecond offset as `[MM:SS]`.
///
/// Minutes are not wrapped into hours, so an offset past the first hour
/// renders as `[61:05]`.
pub fn format_timestamp(ms: u64) -> String {
    let total_secs = ms / 1000;
    format!("[{:02}:{:02}]", total_secs / 60, total_secs % 60)
}

/// Format a duration as `H:MM:SS`, or `M:SS` under an hour.
pub fn format_duration(secs: u64) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

/// One `[MM:SS] text` line per segment.
pub fn format_segments(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|seg| format!("{} {}", seg.timestamp, seg.text))
        .collect::<Vec<_>>()
        .join("\n")
}

fn push_video_header(output: &mut String, title: &str, video: &VideoDetails) {
    output.push_str(&format!("# {title}\n\n"));
    output.push_str(&format!(
        "**Channel:** {} | **Duration:** {} | **Video:** https://www.youtube.com/watch?v={}\n",
        video.author,
        format_duration(video.duration_secs),
        video.video_id
    ));
}

/// Render a transcript as Markdown.
pub fn format_transcript(transcript: &Transcript) -> String {
    let mut output = String::new();
    push_video_header(&mut output, &transcript.video.title, &transcript.video);
    output.push_str(&format!(
        "**Captions:** {} ({}, {})\n\n",
        transcript.track.display_name,
        transcript.track.language_code,
        transcript.track.kind()
    ));

    output.push_str("## Transcript\n\n");
    if transcript.segments.is_empty() {
        output.push_str("_No usable captions: the track contains no spoken text._\n");
    } else {
        output.push_str(&format_segments(&transcript.segments));
        output.push('\n');
    }

    output
}

/// Render a summary as Markdown.
pub fn format_summary(summary: &Summary) -> String {
    let mut output = String::new();
    push_video_header(&mut output, &summary.title, &summary.video);
    if summary.title != summary.video.title {
        output.push_str(&format!("**Original title:** {}\n", summary.video.title));
    }
    output.push_str(&format!(
        "**Language:** {} | **Style:** {}\n\n",
        summary.language, summary.mode
    ));

    output.push_str("## Summary\n\n");
    output.push_str(summary.text.trim());
    output.push('\n');

    output
}
