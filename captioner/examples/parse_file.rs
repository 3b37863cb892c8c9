//! Parse a saved timed-text document offline and print it as text and JSON.
//!
//! Usage: cargo run --example parse_file -- captions.xml

fn main() {
    let path = std::env::args()
        .nth(1)
        .expect("usage: parse_file <timed-text-file>");
    let document = std::fs::read_to_string(&path).expect("readable caption file");

    let format = captioner::TimedTextFormat::detect(&document);
    let segments = captioner::parse_timed_text(&document);
    eprintln!("{path}: {format:?} format, {} segments", segments.len());

    println!("{}", captioner::format::format_segments(&segments));
    match serde_json::to_string_pretty(&segments) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("JSON error: {e}"),
    }
}
