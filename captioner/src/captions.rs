use url::Url;

use crate::error::{Error, Result, Service};

/// Caption document format requested from the platform.
const PREFERRED_FORMAT: &str = "srv3";

/// The track locator with `fmt=srv3` added when it names no format.
pub fn caption_url(locator: &str) -> Result<Url> {
    let mut url = Url::parse(locator).map_err(|e| Error::UnexpectedResponse {
        service: Service::Captions,
        detail: format!("invalid caption locator \"{locator}\": {e}"),
    })?;
    if !url.query_pairs().any(|(k, _)| k == "fmt") {
        url.query_pairs_mut().append_pair("fmt", PREFERRED_FORMAT);
    }
    Ok(url)
}

/// The query component of a track locator, passed through untouched.
pub fn locator_query(locator: &str) -> Option<&str> {
    locator
        .split_once('?')
        .map(|(_, query)| query.split('#').next().unwrap_or(query))
        .filter(|query| !query.is_empty())
}

/// Download the raw caption document of a track.
#[cfg(feature = "client")]
pub async fn fetch_caption_document(
    client: &reqwest::Client,
    track: &crate::types::CaptionTrack,
) -> Result<String> {
    let url = caption_url(&track.fetch_locator)?;
    tracing::info!(
        language = %track.language_code,
        kind = track.kind(),
        "fetching caption document"
    );

    let response = crate::http::send(Service::Captions, client.get(url)).await?;
    let document = crate::http::read_text(Service::Captions, response).await?;
    tracing::debug!(bytes = document.len(), "caption document received");
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_url_adds_format() {
        let url = caption_url("https://www.youtube.com/api/timedtext?v=abc&lang=en").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.youtube.com/api/timedtext?v=abc&lang=en&fmt=srv3"
        );
    }

    #[test]
    fn test_caption_url_keeps_existing_format() {
        let url = caption_url("https://www.youtube.com/api/timedtext?v=abc&fmt=srv1").unwrap();
        assert_eq!(url.as_str(), "https://www.youtube.com/api/timedtext?v=abc&fmt=srv1");
    }

    #[test]
    fn test_caption_url_rejects_relative_locator() {
        let err = caption_url("/api/timedtext?v=abc").unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedResponse {
                service: Service::Captions,
                ..
            }
        ));
    }

    #[test]
    fn test_locator_query_is_opaque() {
        assert_eq!(
            locator_query("https://www.youtube.com/api/timedtext?v=abc&sig=A%2FB&lang=en"),
            Some("v=abc&sig=A%2FB&lang=en")
        );
        assert_eq!(locator_query("https://example.com/x?a=1#frag"), Some("a=1"));
        assert_eq!(locator_query("https://example.com/x"), None);
        assert_eq!(locator_query("https://example.com/x?"), None);
    }
}
