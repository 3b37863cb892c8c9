//! Client for the external summary and translation service.
//!
//! The service exposes two JSON endpoints under one base URL:
//!
//! - `POST {base}/summarize` with the caption locator's query string, the
//!   target language and the summary style;
//! - `POST {base}/translate` with a text and a target language.
//!
//! Both answer `{"text": "..."}`.

use serde::{Deserialize, Serialize};

use crate::config::SummaryMode;
use crate::error::{Error, Result, Service};

#[derive(Debug, Serialize)]
pub(crate) struct SummarizeRequest<'a> {
    /// Caption locator query, forwarded without interpretation.
    pub caption_args: &'a str,
    pub language: &'a str,
    pub mode: SummaryMode,
    pub title: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct TranslateRequest<'a> {
    pub text: &'a str,
    pub language: &'a str,
}

#[derive(Debug, Deserialize)]
struct TextResponse {
    text: String,
}

/// `{base}/{path}` regardless of a trailing slash on `base`.
pub(crate) fn endpoint_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}

fn non_empty(service: Service, response: TextResponse) -> Result<String> {
    let text = response.text.trim();
    if text.is_empty() {
        return Err(Error::UnexpectedResponse {
            service,
            detail: "empty text".into(),
        });
    }
    Ok(text.to_string())
}

/// Summary service bound to one base URL and HTTP client.
#[cfg(feature = "client")]
pub struct SummaryClient<'a> {
    http: &'a reqwest::Client,
    base: String,
}

#[cfg(feature = "client")]
impl<'a> SummaryClient<'a> {
    pub fn new(http: &'a reqwest::Client, base: impl Into<String>) -> Self {
        Self {
            http,
            base: base.into(),
        }
    }

    async fn post<B: Serialize>(&self, service: Service, path: &str, body: &B) -> Result<String> {
        let url = endpoint_url(&self.base, path);
        tracing::debug!(%service, %url, "calling summary service");
        let request = self.http.post(&url).json(body);
        let response = crate::http::send(service, request).await?;
        let parsed: TextResponse = crate::http::read_json(service, response).await?;
        non_empty(service, parsed)
    }

    /// Generate a summary of the captions behind `caption_args`.
    pub async fn summarize(
        &self,
        caption_args: &str,
        language: &str,
        mode: SummaryMode,
        title: &str,
    ) -> Result<String> {
        let body = SummarizeRequest {
            caption_args,
            language,
            mode,
            title,
        };
        self.post(Service::Summary, "summarize", &body).await
    }

    /// Translate `text` into `language`.
    pub async fn translate(&self, text: &str, language: &str) -> Result<String> {
        let body = TranslateRequest { text, language };
        self.post(Service::Translation, "translate", &body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_joins_once() {
        assert_eq!(
            endpoint_url("https://api.example.com/v1", "summarize"),
            "https://api.example.com/v1/summarize"
        );
        assert_eq!(
            endpoint_url("https://api.example.com/v1/", "translate"),
            "https://api.example.com/v1/translate"
        );
    }

    #[test]
    fn test_summarize_request_shape() {
        let body = SummarizeRequest {
            caption_args: "v=abc&lang=en&sig=XYZ",
            language: "de",
            mode: SummaryMode::BulletPoint,
            title: "Market Update",
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["caption_args"], "v=abc&lang=en&sig=XYZ");
        assert_eq!(value["language"], "de");
        assert_eq!(value["mode"], "bullet-point");
        assert_eq!(value["title"], "Market Update");
    }

    #[test]
    fn test_translate_request_shape() {
        let value = serde_json::to_value(TranslateRequest {
            text: "Market Update",
            language: "fr",
        })
        .unwrap();
        assert_eq!(value, serde_json::json!({"text": "Market Update", "language": "fr"}));
    }

    #[test]
    fn test_non_empty_trims_and_rejects_blank() {
        let ok = non_empty(
            Service::Summary,
            TextResponse {
                text: "  A recap.\n".into(),
            },
        )
        .unwrap();
        assert_eq!(ok, "A recap.");

        let err = non_empty(
            Service::Translation,
            TextResponse { text: " \n".into() },
        )
        .unwrap_err();
        assert_eq!(err.service(), Some(Service::Translation));
    }

    #[test]
    fn test_text_response_ignores_extra_fields() {
        let parsed: TextResponse =
            serde_json::from_str(r#"{"text": "hi", "model": "x", "usage": {"tokens": 3}}"#)
                .unwrap();
        assert_eq!(parsed.text, "hi");
    }
}
