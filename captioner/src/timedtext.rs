//! Timed-text caption document parser.
//!
//! The platform serves caption tracks in two shapes:
//!
//! - **Legacy**: `<p t="1234">` paragraphs with inline text. Word-timing
//!   elements may wrap parts of the text; their tags are dropped and their
//!   text kept in order.
//! - **Syllable** (`<timedtext format="3">`): paragraph text lives in `<s>`
//!   syllable elements. A syllable starting with whitespace opens a new word,
//!   any other syllable continues the current one.
//!
//! The format is detected once per document, but manual tracks served as
//! `format="3"` carry inline paragraph text with no `<s>` children. Such
//! paragraphs are read the legacy way. Both formats share the same
//! entity decoding, whitespace normalization and filtering.

use std::borrow::Cow;
use std::panic;
use std::sync::LazyLock;

use regex::Regex;

use crate::types::Segment;

/// Cue texts that stand for an instrumental passage with no lyrics.
pub const MUSIC_ONLY_CUES: &[&str] = &["♪", "♪♪", "♪♪♪"];

const ENTITIES: &[(&str, char)] = &[
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&#39;", '\''),
    ("&nbsp;", ' '),
];

static FORMAT_3_ROOT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<timedtext\b[^>]*\sformat\s*=\s*["']3["']"#).expect("valid root regex")
});

static PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<p\b([^>]*?)(?:/>|>(.*?)</p>)").expect("valid paragraph regex")
});

static START_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|\s)t\s*=\s*["'](\d+)["']"#).expect("valid start attribute regex")
});

static SYLLABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<s\b[^>]*?(?:/>|>(.*?)</s>)").expect("valid syllable regex")
});

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// Document shape, detected from content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimedTextFormat {
    /// Inline paragraph text.
    Legacy,
    /// Text split into `<s>` syllables.
    Syllable,
}

impl TimedTextFormat {
    /// Detect the format from the root element.
    pub fn detect(document: &str) -> Self {
        if FORMAT_3_ROOT.is_match(document) {
            TimedTextFormat::Syllable
        } else {
            TimedTextFormat::Legacy
        }
    }

    /// Shape of one paragraph within a document of this format.
    fn paragraph_shape(self, inner: &str) -> Self {
        match self {
            TimedTextFormat::Syllable if !SYLLABLE.is_match(inner) => TimedTextFormat::Legacy,
            other => other,
        }
    }

    /// Raw text fragments of one paragraph, tags removed, in document order.
    fn fragments<'a>(&self, inner: &'a str) -> Vec<&'a str> {
        match self {
            TimedTextFormat::Legacy => text_between_tags(inner),
            TimedTextFormat::Syllable => SYLLABLE
                .captures_iter(inner)
                .filter_map(|caps| caps.get(1))
                .flat_map(|m| text_between_tags(m.as_str()))
                .collect(),
        }
    }

    /// Join decoded fragments into the paragraph text.
    fn reconstruct(&self, fragments: &[Cow<'_, str>]) -> String {
        match self {
            TimedTextFormat::Legacy => fragments.concat(),
            TimedTextFormat::Syllable => join_syllables(fragments),
        }
    }
}

/// Parse a caption document, recovering from any internal failure.
///
/// Returns an empty list (and logs the failure) instead of unwinding into
/// the caller.
pub fn parse_document(document: &str) -> Vec<Segment> {
    match panic::catch_unwind(|| parse(document)) {
        Ok(segments) => segments,
        Err(cause) => {
            let message = cause
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| cause.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".into());
            tracing::error!(
                document_len = document.len(),
                error = %message,
                "caption parser failed; returning empty transcript"
            );
            Vec::new()
        }
    }
}

/// Parse a caption document into segments, in document order.
///
/// Malformed paragraphs are skipped. Empty output is valid.
pub fn parse(document: &str) -> Vec<Segment> {
    let format = TimedTextFormat::detect(document);

    PARAGRAPH
        .captures_iter(document)
        .filter_map(|caps| {
            let attrs = caps.get(1).map_or("", |m| m.as_str());
            let Some(start_ms) = start_of(attrs) else {
                tracing::debug!(attrs, "skipping paragraph without a usable start time");
                return None;
            };
            let inner = caps.get(2)?.as_str();
            if inner.trim().is_empty() {
                return None;
            }

            let shape = format.paragraph_shape(inner);
            let decoded: Vec<Cow<'_, str>> = shape
                .fragments(inner)
                .into_iter()
                .map(decode_entities)
                .collect();
            if decoded.is_empty() {
                return None;
            }

            let text = normalize_whitespace(&shape.reconstruct(&decoded));
            if is_non_speech(&text) {
                return None;
            }
            Some(Segment::new(start_ms, text))
        })
        .collect()
}

fn start_of(attrs: &str) -> Option<u64> {
    START_ATTR.captures(attrs)?.get(1)?.as_str().parse().ok()
}

/// Decode the entities the platform emits in caption text.
///
/// Single pass, so `&amp;lt;` becomes `&lt;`. Unknown entities are kept as-is.
pub fn decode_entities(fragment: &str) -> Cow<'_, str> {
    if !fragment.contains('&') {
        return Cow::Borrowed(fragment);
    }

    let mut out = String::with_capacity(fragment.len());
    let mut rest = fragment;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match ENTITIES.iter().find(|(name, _)| tail.starts_with(name)) {
            Some((name, ch)) => {
                out.push(*ch);
                rest = &tail[name.len()..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Collapse whitespace runs (including newlines) to single spaces and trim.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text outside tags, in order. `<br>` counts as a space.
fn text_between_tags(markup: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut last = 0;
    for tag in TAG.find_iter(markup) {
        if tag.start() > last {
            pieces.push(&markup[last..tag.start()]);
        }
        if is_line_break(tag.as_str()) {
            pieces.push(" ");
        }
        last = tag.end();
    }
    if last < markup.len() {
        pieces.push(&markup[last..]);
    }
    pieces
}

fn is_line_break(tag: &str) -> bool {
    let name = tag
        .trim_start_matches('<')
        .trim_end_matches('>')
        .trim_end_matches('/')
        .trim();
    name.eq_ignore_ascii_case("br")
}

fn join_syllables(syllables: &[Cow<'_, str>]) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for syllable in syllables {
        if syllable.starts_with(char::is_whitespace) {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            current.push_str(syllable.trim_start());
        } else {
            current.push_str(syllable);
        }
    }
    if !current.is_empty() {
        words.push(current);
    }

    words.join(" ")
}

/// Empty text, `[Music]`-style annotations and music-note cues.
fn is_non_speech(text: &str) -> bool {
    text.is_empty()
        || (text.len() >= 2 && text.starts_with('[') && text.ends_with(']'))
        || MUSIC_ONLY_CUES.contains(&text)
}
