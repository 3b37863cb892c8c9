use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Platform player endpoint used for video metadata and caption track listing.
pub const DEFAULT_PLAYER_ENDPOINT: &str = "https://www.youtube.com/youtubei/v1/player";

/// Default timeout applied to every network call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound accepted for `ClientOptions::timeout`.
pub const MAX_TIMEOUT: Duration = Duration::from_secs(300);

const DEFAULT_USER_AGENT: &str = concat!("captioner/", env!("CARGO_PKG_VERSION"));

static LANGUAGE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]{2,3}(-[A-Za-z0-9]{2,8})*$").expect("valid language tag regex")
});

/// A validated caption language code.
///
/// Accepts BCP-47 shaped tags as the platform reports them ("en", "pt-BR",
/// "zh-Hant"). The primary subtag is lowercased; region and script subtags
/// are kept as given. Comparison against track codes ignores ASCII case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Language(String);

impl Language {
    /// Create a language from a code, validating its shape.
    pub fn new(code: &str) -> Result<Self, Error> {
        let trimmed = code.trim();
        if !LANGUAGE_TAG.is_match(trimmed) {
            return Err(Error::InvalidLanguage(code.to_string()));
        }

        let normalized = match trimmed.split_once('-') {
            Some((primary, rest)) => format!("{}-{rest}", primary.to_ascii_lowercase()),
            None => trimmed.to_ascii_lowercase(),
        };
        Ok(Language(normalized))
    }

    /// The normalized code, e.g. "en" or "pt-BR".
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Whether a track language code names exactly this language.
    pub fn matches(&self, code: &str) -> bool {
        self.0.eq_ignore_ascii_case(code.trim())
    }
}

impl Default for Language {
    fn default() -> Self {
        Language("en".into())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Language {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Language::new(&value)
    }
}

impl From<Language> for String {
    fn from(lang: Language) -> Self {
        lang.0
    }
}

/// Shape of the generated summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryMode {
    /// Flowing prose.
    #[default]
    Narrative,
    /// A list of key points.
    BulletPoint,
}

impl SummaryMode {
    /// Wire name sent to the summary service.
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryMode::Narrative => "narrative",
            SummaryMode::BulletPoint => "bullet-point",
        }
    }

    /// Parse from a string (CLI argument, tool argument, env var).
    pub fn parse_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "narrative" => Some(SummaryMode::Narrative),
            "bullet-point" | "bullet_point" | "bullets" => Some(SummaryMode::BulletPoint),
            _ => None,
        }
    }
}

impl fmt::Display for SummaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builder for request options shared by every operation.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub language: Language,
    pub mode: SummaryMode,
    pub timeout: Duration,
    pub user_agent: String,
    pub player_endpoint: String,
    pub summary_endpoint: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            language: Language::default(),
            mode: SummaryMode::default(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.into(),
            player_endpoint: DEFAULT_PLAYER_ENDPOINT.into(),
            summary_endpoint: None,
        }
    }
}

impl ClientOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with `CAPTIONER_*` environment variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`ClientOptions::from_env`] but reading values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut opts = Self::default();

        if let Some(lang) = get("CAPTIONER_LANGUAGE") {
            opts = opts.language(&lang)?;
        }
        if let Some(mode) = get("CAPTIONER_SUMMARY_MODE") {
            let mode = SummaryMode::parse_name(&mode).ok_or_else(|| {
                Error::InvalidOption(format!("CAPTIONER_SUMMARY_MODE: unknown mode \"{mode}\""))
            })?;
            opts = opts.mode(mode);
        }
        if let Some(secs) = get("CAPTIONER_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                Error::InvalidOption(format!("CAPTIONER_TIMEOUT_SECS: not a number: \"{secs}\""))
            })?;
            opts = opts.timeout(Duration::from_secs(secs))?;
        }
        if let Some(endpoint) = get("CAPTIONER_PLAYER_ENDPOINT") {
            opts = opts.player_endpoint(endpoint)?;
        }
        if let Some(endpoint) = get("CAPTIONER_SUMMARY_URL") {
            opts = opts.summary_endpoint(endpoint)?;
        }

        Ok(opts)
    }

    /// Set the preferred caption and summary language.
    pub fn language(mut self, lang: &str) -> Result<Self, Error> {
        self.language = Language::new(lang)?;
        Ok(self)
    }

    pub fn mode(mut self, mode: SummaryMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the per-request network timeout. Must be non-zero and at most 300s.
    pub fn timeout(mut self, timeout: Duration) -> Result<Self, Error> {
        if timeout.is_zero() || timeout > MAX_TIMEOUT {
            return Err(Error::InvalidOption(format!(
                "timeout must be between 1s and {}s, got {}s",
                MAX_TIMEOUT.as_secs(),
                timeout.as_secs()
            )));
        }
        self.timeout = timeout;
        Ok(self)
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    pub fn player_endpoint(mut self, endpoint: impl Into<String>) -> Result<Self, Error> {
        self.player_endpoint = validate_endpoint(endpoint.into())?;
        Ok(self)
    }

    pub fn summary_endpoint(mut self, endpoint: impl Into<String>) -> Result<Self, Error> {
        self.summary_endpoint = Some(validate_endpoint(endpoint.into())?);
        Ok(self)
    }
}

/// Endpoints must be absolute http(s) URLs.
fn validate_endpoint(endpoint: String) -> Result<String, Error> {
    let parsed = url::Url::parse(endpoint.trim())
        .map_err(|e| Error::InvalidOption(format!("invalid endpoint \"{endpoint}\": {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::InvalidOption(format!(
            "endpoint must use http or https: {endpoint}"
        )));
    }
    Ok(endpoint.trim().to_string())
}
