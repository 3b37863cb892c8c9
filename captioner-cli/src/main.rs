mod mcp;

use std::path::PathBuf;
use std::time::Duration;

use captioner::{ClientOptions, SummaryMode};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Parser)]
#[command(
    name = "captioner",
    version,
    about = "Timestamped transcripts and summaries of online videos"
)]
struct Cli {
    /// Video URL or 11-character video id.
    #[arg(required_unless_present = "serve")]
    input: Option<String>,

    /// Summarize the video instead of printing its transcript.
    #[arg(long)]
    summary: bool,

    /// Summary style.
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Preferred caption and summary language (e.g. "en", "pt-BR").
    #[arg(short, long)]
    language: Option<String>,

    /// Output format.
    #[arg(short, long, default_value = "markdown")]
    format: OutputFormat,

    /// Write output to file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Request timeout in seconds.
    #[arg(long)]
    timeout: Option<u64>,

    /// Summary service base URL (overrides CAPTIONER_SUMMARY_URL).
    #[arg(long)]
    summary_url: Option<String>,

    /// List the video's caption tracks and exit.
    #[arg(long, conflicts_with = "summary")]
    list_tracks: bool,

    /// Run as an MCP server on stdin/stdout.
    #[arg(long, conflicts_with_all = ["summary", "list_tracks", "output"])]
    serve: bool,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Markdown,
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Narrative,
    BulletPoint,
}

impl From<ModeArg> for SummaryMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Narrative => SummaryMode::Narrative,
            ModeArg::BulletPoint => SummaryMode::BulletPoint,
        }
    }
}

fn exit_with(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

fn build_options(cli: &Cli) -> captioner::Result<ClientOptions> {
    let mut opts = ClientOptions::from_env()?;
    if let Some(lang) = &cli.language {
        opts = opts.language(lang)?;
    }
    if let Some(mode) = cli.mode {
        opts = opts.mode(mode.into());
    }
    if let Some(secs) = cli.timeout {
        opts = opts.timeout(Duration::from_secs(secs))?;
    }
    if let Some(url) = &cli.summary_url {
        opts = opts.summary_endpoint(url.as_str())?;
    }
    Ok(opts)
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("captioner=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let opts = build_options(&cli).unwrap_or_else(|e| exit_with(e));

    if cli.serve {
        if let Err(e) = mcp::serve(mcp::LiveBackend::new(opts)).await {
            exit_with(e);
        }
        return;
    }

    let Some(input) = cli.input.as_deref() else {
        exit_with("missing video URL or id");
    };

    if cli.list_tracks {
        let (details, tracks) = captioner::list_tracks(input, &opts)
            .await
            .unwrap_or_else(|e| exit_with(e));
        println!("{} ({})", details.title, details.video_id);
        if tracks.is_empty() {
            println!("No caption tracks.");
            return;
        }
        println!("{:<10} {:<15} {}", "LANGUAGE", "KIND", "NAME");
        println!("{:<10} {:<15} {}", "--------", "----", "----");
        for track in &tracks {
            println!(
                "{:<10} {:<15} {}",
                track.language_code,
                track.kind(),
                track.display_name
            );
        }
        return;
    }

    let output_text = if cli.summary {
        let pb = spinner("Summarizing...");
        let result = captioner::get_summary_with_options(input, &opts).await;
        pb.finish_and_clear();
        let summary = result.unwrap_or_else(|e| exit_with(e));

        eprintln!(
            "Summary complete: {} ({}, {})",
            summary.video.video_id, summary.language, summary.mode
        );
        match cli.format {
            OutputFormat::Markdown => summary.to_markdown(),
            OutputFormat::Text => format!("{}\n\n{}\n", summary.title, summary.text),
            OutputFormat::Json => summary.to_json_pretty().unwrap_or_else(|e| exit_with(e)),
        }
    } else {
        let pb = spinner("Fetching captions...");
        let result = captioner::get_transcript_with_options(input, &opts).await;
        pb.finish_and_clear();
        let transcript = result.unwrap_or_else(|e| exit_with(e));

        eprintln!(
            "Transcript complete: {} segments, {} track \"{}\"",
            transcript.segments.len(),
            transcript.track.kind(),
            transcript.track.language_code,
        );
        match cli.format {
            OutputFormat::Markdown => transcript.to_markdown(),
            OutputFormat::Text => transcript.to_timestamped_text(),
            OutputFormat::Json => transcript.to_json_pretty().unwrap_or_else(|e| exit_with(e)),
        }
    };

    match cli.output {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, &output_text) {
                exit_with(format!("writing to {}: {e}", path.display()));
            }
            eprintln!("Written to {}", path.display());
        }
        None => print!("{output_text}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_input_required_unless_serving() {
        assert!(Cli::try_parse_from(["captioner"]).is_err());
        let cli = Cli::try_parse_from(["captioner", "--serve"]).unwrap();
        assert!(cli.serve);
        assert!(cli.input.is_none());
    }

    #[test]
    fn test_summary_flags() {
        let cli = Cli::try_parse_from([
            "captioner",
            "https://youtu.be/dQw4w9WgXcQ",
            "--summary",
            "--mode",
            "bullet-point",
            "-l",
            "de",
            "-f",
            "json",
        ])
        .unwrap();
        assert!(cli.summary);
        assert!(matches!(cli.mode, Some(ModeArg::BulletPoint)));
        assert_eq!(cli.language.as_deref(), Some("de"));
        assert!(matches!(cli.format, OutputFormat::Json));
        assert_eq!(
            SummaryMode::from(ModeArg::BulletPoint),
            SummaryMode::BulletPoint
        );
    }

    #[test]
    fn test_serve_conflicts_with_summary() {
        assert!(Cli::try_parse_from(["captioner", "--serve", "--summary"]).is_err());
    }
}
