use captioner_lib::{ClientOptions, Error, SummaryMode};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

/// One caption line: start offset, `[MM:SS]` stamp and text.
#[pyclass(name = "Segment", module = "captioner", frozen, get_all)]
#[derive(Clone)]
struct PySegment {
    start_ms: u64,
    timestamp: String,
    text: String,
}

#[pymethods]
impl PySegment {
    fn __repr__(&self) -> String {
        format!(
            "Segment(start_ms={}, timestamp={:?}, text={:?})",
            self.start_ms, self.timestamp, self.text
        )
    }

    fn __str__(&self) -> String {
        format!("{} {}", self.timestamp, self.text)
    }
}

impl From<captioner_lib::Segment> for PySegment {
    fn from(s: captioner_lib::Segment) -> Self {
        Self {
            start_ms: s.start_ms,
            timestamp: s.timestamp,
            text: s.text,
        }
    }
}

fn to_py_err(e: Error) -> PyErr {
    match e {
        Error::InvalidVideoId(_) | Error::InvalidLanguage(_) | Error::InvalidOption(_) => {
            PyValueError::new_err(e.to_string())
        }
        other => PyRuntimeError::new_err(other.to_string()),
    }
}

fn options_for(language: Option<&str>, mode: Option<&str>) -> PyResult<ClientOptions> {
    let mut options = ClientOptions::from_env().map_err(to_py_err)?;
    if let Some(lang) = language {
        options = options.language(lang).map_err(to_py_err)?;
    }
    if let Some(name) = mode {
        let mode = SummaryMode::parse_name(name)
            .ok_or_else(|| PyValueError::new_err(format!("unknown summary mode: {name}")))?;
        options = options.mode(mode);
    }
    Ok(options)
}

/// Parse a timed-text caption document into segments. Never raises.
#[pyfunction]
fn parse_timed_text(document: &str) -> Vec<PySegment> {
    captioner_lib::parse_timed_text(document)
        .into_iter()
        .map(PySegment::from)
        .collect()
}

/// Format a millisecond offset as `[MM:SS]`.
#[pyfunction]
fn format_timestamp(ms: u64) -> String {
    captioner_lib::format_timestamp(ms)
}

/// Fetch a video's transcript as markdown. Returns an awaitable.
#[pyfunction]
#[pyo3(signature = (url, language = None))]
fn get_transcript(
    py: Python<'_>,
    url: String,
    language: Option<String>,
) -> PyResult<Bound<'_, PyAny>> {
    let options = options_for(language.as_deref(), None)?;
    pyo3_async_runtimes::tokio::future_into_py(py, async move {
        let transcript = captioner_lib::get_transcript_with_options(&url, &options)
            .await
            .map_err(to_py_err)?;
        Ok(transcript.to_markdown())
    })
}

/// Summarize a video as markdown. Returns an awaitable.
///
/// Needs `CAPTIONER_SUMMARY_URL` in the environment.
#[pyfunction]
#[pyo3(signature = (url, language = None, mode = None))]
fn get_summary(
    py: Python<'_>,
    url: String,
    language: Option<String>,
    mode: Option<String>,
) -> PyResult<Bound<'_, PyAny>> {
    let options = options_for(language.as_deref(), mode.as_deref())?;
    pyo3_async_runtimes::tokio::future_into_py(py, async move {
        let summary = captioner_lib::get_summary_with_options(&url, &options)
            .await
            .map_err(to_py_err)?;
        Ok(summary.to_markdown())
    })
}

#[pymodule]
fn captioner(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PySegment>()?;
    m.add_function(wrap_pyfunction!(parse_timed_text, m)?)?;
    m.add_function(wrap_pyfunction!(format_timestamp, m)?)?;
    m.add_function(wrap_pyfunction!(get_transcript, m)?)?;
    m.add_function(wrap_pyfunction!(get_summary, m)?)?;
    Ok(())
}
