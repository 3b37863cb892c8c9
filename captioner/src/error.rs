use std::fmt;

/// The external call an error is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    /// Video metadata / caption track listing.
    Metadata,
    /// Raw caption document download.
    Captions,
    /// Summary generation.
    Summary,
    /// Title translation.
    Translation,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Service::Metadata => "metadata",
            Service::Captions => "captions",
            Service::Summary => "summary",
            Service::Translation => "translation",
        };
        f.write_str(name)
    }
}

/// All errors that can occur in captioner.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid video id or URL: {0}")]
    InvalidVideoId(String),

    #[error("invalid language code: \"{0}\" (expected something like \"en\", \"pt-BR\" or \"zh-Hant\")")]
    InvalidLanguage(String),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("video {video_id} is unavailable: {reason}")]
    VideoUnavailable { video_id: String, reason: String },

    #[error("no captions available for video {video_id}")]
    NoCaptions { video_id: String },

    #[error("summary service not configured: set CAPTIONER_SUMMARY_URL or pass a summary endpoint")]
    SummaryNotConfigured,

    #[cfg(feature = "client")]
    #[error("{service} request failed: {source}")]
    Request {
        service: Service,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} service returned HTTP {status}")]
    Status { service: Service, status: u16 },

    #[error("unexpected {service} response: {detail}")]
    UnexpectedResponse { service: Service, detail: String },

    #[cfg(feature = "client")]
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// The external call that failed, if the error came from one.
    pub fn service(&self) -> Option<Service> {
        match self {
            #[cfg(feature = "client")]
            Error::Request { service, .. } => Some(*service),
            Error::Status { service, .. } | Error::UnexpectedResponse { service, .. } => {
                Some(*service)
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_video_id() {
        let e = Error::InvalidVideoId("not-a-video".into());
        assert_eq!(e.to_string(), "invalid video id or URL: not-a-video");
    }

    #[test]
    fn test_error_display_invalid_language() {
        let e = Error::InvalidLanguage("english!".into());
        let msg = e.to_string();
        assert!(msg.contains("english!"));
        assert!(msg.contains("pt-BR"));
    }

    #[test]
    fn test_error_display_unavailable() {
        let e = Error::VideoUnavailable {
            video_id: "dQw4w9WgXcQ".into(),
            reason: "Video unavailable".into(),
        };
        assert_eq!(
            e.to_string(),
            "video dQw4w9WgXcQ is unavailable: Video unavailable"
        );
    }

    #[test]
    fn test_error_display_status_names_service() {
        let e = Error::Status {
            service: Service::Translation,
            status: 502,
        };
        assert_eq!(e.to_string(), "translation service returned HTTP 502");
        assert_eq!(e.service(), Some(Service::Translation));
    }

    #[test]
    fn test_error_service_absent_for_local_errors() {
        assert_eq!(Error::SummaryNotConfigured.service(), None);
        assert_eq!(Error::NoCaptions { video_id: "x".into() }.service(), None);
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<String>("invalid json").unwrap_err();
        let e: Error = json_err.into();
        assert!(matches!(e, Error::Json(_)));
    }

    #[test]
    fn test_error_debug_impl() {
        let e = Error::UnexpectedResponse {
            service: Service::Summary,
            detail: "empty text".into(),
        };
        let debug = format!("{:?}", e);
        assert!(debug.contains("UnexpectedResponse"));
        assert!(debug.contains("Summary"));
    }
}
