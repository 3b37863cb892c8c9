//! Summarize a video in another language as bullet points.
//!
//! Usage: CAPTIONER_SUMMARY_URL=https://... cargo run --example summary -- <video> [language]

use captioner::{ClientOptions, SummaryMode};

#[tokio::main]
async fn main() -> captioner::Result<()> {
    let mut args = std::env::args().skip(1);
    let input = args.next().expect("usage: summary <video-url-or-id> [language]");
    let language = args.next().unwrap_or_else(|| "en".to_string());

    let opts = ClientOptions::from_env()?
        .language(&language)?
        .mode(SummaryMode::BulletPoint);

    let summary = captioner::get_summary_with_options(&input, &opts).await?;
    println!("{}", summary.to_markdown());

    Ok(())
}
