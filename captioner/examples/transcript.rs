//! Fetch a video's transcript and print it with timestamps.
//!
//! Usage: cargo run --example transcript -- https://youtu.be/dQw4w9WgXcQ

#[tokio::main]
async fn main() -> captioner::Result<()> {
    let input = std::env::args()
        .nth(1)
        .expect("usage: transcript <video-url-or-id>");

    let transcript = captioner::get_transcript(&input).await?;

    println!("{} ({})", transcript.video.title, transcript.track.display_name);
    for segment in &transcript.segments {
        println!("{} {}", segment.timestamp, segment.text);
    }

    Ok(())
}
