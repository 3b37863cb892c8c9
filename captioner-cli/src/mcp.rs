//! MCP server exposing the transcript and summary operations as tools.

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use captioner::{ClientOptions, SummaryMode};
use rmcp::model::*;
use rmcp::service::RequestContext;
use rmcp::{transport::stdio, ErrorData, RoleServer, ServerHandler, ServiceExt};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

/// The operations exposed as tools.
pub trait ToolBackend: Send + Sync + 'static {
    fn transcript(
        &self,
        url: &str,
        language: Option<&str>,
    ) -> impl Future<Output = captioner::Result<String>> + Send;

    fn summary(
        &self,
        url: &str,
        language: Option<&str>,
        mode: Option<SummaryMode>,
    ) -> impl Future<Output = captioner::Result<String>> + Send;
}

/// Backend that talks to the real services.
pub struct LiveBackend {
    options: ClientOptions,
}

impl LiveBackend {
    pub fn new(options: ClientOptions) -> Self {
        Self { options }
    }

    fn options_for(&self, language: Option<&str>) -> captioner::Result<ClientOptions> {
        match language {
            Some(lang) => self.options.clone().language(lang),
            None => Ok(self.options.clone()),
        }
    }
}

impl ToolBackend for LiveBackend {
    async fn transcript(&self, url: &str, language: Option<&str>) -> captioner::Result<String> {
        let options = self.options_for(language)?;
        let transcript = captioner::get_transcript_with_options(url, &options).await?;
        Ok(transcript.to_markdown())
    }

    async fn summary(
        &self,
        url: &str,
        language: Option<&str>,
        mode: Option<SummaryMode>,
    ) -> captioner::Result<String> {
        let mut options = self.options_for(language)?;
        if let Some(mode) = mode {
            options = options.mode(mode);
        }
        let summary = captioner::get_summary_with_options(url, &options).await?;
        Ok(summary.to_markdown())
    }
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetTranscriptInput {
    /// Video URL or 11-character video id
    pub url: String,
    /// Preferred caption language code, e.g. "en" (default) or "pt-BR"
    #[serde(default)]
    pub language: Option<String>,
}

/// Summary style
#[derive(Debug, Serialize, Deserialize, JsonSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryStyle {
    /// Flowing prose (default)
    Narrative,
    /// Short bullet points
    BulletPoint,
}

impl From<SummaryStyle> for SummaryMode {
    fn from(style: SummaryStyle) -> Self {
        match style {
            SummaryStyle::Narrative => SummaryMode::Narrative,
            SummaryStyle::BulletPoint => SummaryMode::BulletPoint,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetSummaryInput {
    /// Video URL or 11-character video id
    pub url: String,
    /// Summary language code, e.g. "en" (default)
    #[serde(default)]
    pub language: Option<String>,
    /// Summary style, "narrative" unless given
    #[serde(default)]
    pub mode: Option<SummaryStyle>,
}

fn input_schema<T: JsonSchema>() -> Result<Arc<JsonObject>, ErrorData> {
    match serde_json::to_value(schemars::schema_for!(T)) {
        Ok(Value::Object(schema)) => Ok(Arc::new(schema)),
        Ok(_) => Err(ErrorData::internal_error("tool schema is not an object", None)),
        Err(e) => Err(ErrorData::internal_error(e.to_string(), None)),
    }
}

/// Tool definitions, with input schemas derived from the argument types.
pub fn tool_list() -> Result<Vec<Tool>, ErrorData> {
    Ok(vec![
        Tool {
            name: Cow::Borrowed("get_transcript"),
            title: None,
            description: Some(Cow::Borrowed(
                "Get the timestamped transcript of a video from its captions, as markdown.",
            )),
            input_schema: input_schema::<GetTranscriptInput>()?,
            output_schema: None,
            annotations: None,
            icons: None,
        },
        Tool {
            name: Cow::Borrowed("get_summary"),
            title: None,
            description: Some(Cow::Borrowed(
                "Get an AI-generated summary of a video, with its title translated into the requested language.",
            )),
            input_schema: input_schema::<GetSummaryInput>()?,
            output_schema: None,
            annotations: None,
            icons: None,
        },
    ])
}

fn parse_input<T: serde::de::DeserializeOwned>(
    arguments: Option<JsonObject>,
) -> Result<T, ErrorData> {
    let args = Value::Object(arguments.unwrap_or_default());
    serde_json::from_value(args)
        .map_err(|e| ErrorData::invalid_params(format!("invalid tool arguments: {e}"), None))
}

pub struct CaptionServer<B> {
    backend: B,
}

impl<B: ToolBackend> CaptionServer<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Run one tool call. Operation failures become error results, bad
    /// arguments and unknown tools become protocol errors.
    pub async fn dispatch(&self, request: CallToolRequestParam) -> Result<CallToolResult, ErrorData> {
        let name = request.name.as_ref();
        info!(tool = name, "tool call");

        let outcome = match name {
            "get_transcript" => {
                let input: GetTranscriptInput = parse_input(request.arguments)?;
                self.backend
                    .transcript(&input.url, input.language.as_deref())
                    .await
            }
            "get_summary" => {
                let input: GetSummaryInput = parse_input(request.arguments)?;
                self.backend
                    .summary(
                        &input.url,
                        input.language.as_deref(),
                        input.mode.map(SummaryMode::from),
                    )
                    .await
            }
            other => {
                return Err(ErrorData::invalid_params(
                    format!("unknown tool: {other}"),
                    None,
                ))
            }
        };

        Ok(match outcome {
            Ok(text) => CallToolResult::success(vec![Content::text(text)]),
            Err(e) => {
                warn!(tool = name, error = %e, "tool call failed");
                CallToolResult::error(vec![Content::text(format!("Error: {e}"))])
            }
        })
    }
}

impl<B: ToolBackend> ServerHandler for CaptionServer<B> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "captioner".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(
                "Fetch timestamped transcripts (get_transcript) or summaries (get_summary) of online videos."
                    .into(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult {
            tools: tool_list()?,
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch(request).await
    }
}

/// Serve MCP over stdin/stdout until the client disconnects.
pub async fn serve<B: ToolBackend>(backend: B) -> Result<(), Box<dyn std::error::Error>> {
    info!("MCP server listening on stdio");
    let service = CaptionServer::new(backend).serve(stdio()).await?;
    let reason = service.waiting().await?;
    info!(?reason, "MCP session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use captioner::Error;
    use serde_json::json;

    struct FakeBackend;

    impl ToolBackend for FakeBackend {
        async fn transcript(&self, url: &str, language: Option<&str>) -> captioner::Result<String> {
            if url == "nocaps" {
                return Err(Error::NoCaptions {
                    video_id: url.into(),
                });
            }
            Ok(format!("transcript of {url} in {}", language.unwrap_or("default")))
        }

        async fn summary(
            &self,
            url: &str,
            language: Option<&str>,
            mode: Option<SummaryMode>,
        ) -> captioner::Result<String> {
            Ok(format!(
                "summary of {url} in {} as {}",
                language.unwrap_or("default"),
                mode.unwrap_or_default()
            ))
        }
    }

    fn call(name: &'static str, arguments: Value) -> CallToolRequestParam {
        CallToolRequestParam {
            name: Cow::Borrowed(name),
            arguments: arguments.as_object().cloned(),
        }
    }

    fn text_of(result: &CallToolResult) -> &str {
        result.content[0]
            .as_text()
            .map(|t| t.text.as_str())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn test_get_transcript_tool() {
        let server = CaptionServer::new(FakeBackend);
        let result = server
            .dispatch(call(
                "get_transcript",
                json!({"url": "dQw4w9WgXcQ", "language": "de"}),
            ))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(false));
        assert_eq!(text_of(&result), "transcript of dQw4w9WgXcQ in de");
    }

    #[tokio::test]
    async fn test_get_summary_tool_with_mode() {
        let server = CaptionServer::new(FakeBackend);
        let result = server
            .dispatch(call("get_summary", json!({"url": "x", "mode": "bullet-point"})))
            .await
            .unwrap();
        assert_eq!(text_of(&result), "summary of x in default as bullet-point");
    }

    #[tokio::test]
    async fn test_operation_failure_is_error_result() {
        let server = CaptionServer::new(FakeBackend);
        let result = server
            .dispatch(call("get_transcript", json!({"url": "nocaps"})))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(text_of(&result).contains("no captions available"));
    }

    #[tokio::test]
    async fn test_bad_arguments_are_invalid_params() {
        let server = CaptionServer::new(FakeBackend);

        let missing_url = server
            .dispatch(call("get_transcript", json!({})))
            .await
            .unwrap_err();
        assert_eq!(missing_url.code, ErrorCode::INVALID_PARAMS);

        let no_arguments = server
            .dispatch(CallToolRequestParam {
                name: Cow::Borrowed("get_summary"),
                arguments: None,
            })
            .await
            .unwrap_err();
        assert_eq!(no_arguments.code, ErrorCode::INVALID_PARAMS);

        let bad_mode = server
            .dispatch(call("get_summary", json!({"url": "x", "mode": "haiku"})))
            .await
            .unwrap_err();
        assert_eq!(bad_mode.code, ErrorCode::INVALID_PARAMS);

        let unknown_tool = server
            .dispatch(call("rm_rf", json!({})))
            .await
            .unwrap_err();
        assert_eq!(unknown_tool.code, ErrorCode::INVALID_PARAMS);
    }

    #[test]
    fn test_tool_schemas_come_from_input_types() {
        let tools = tool_list().unwrap();
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert_eq!(names, vec!["get_transcript", "get_summary"]);

        let transcript = &tools[0].input_schema;
        assert_eq!(transcript["type"], "object");
        assert!(transcript["properties"].get("url").is_some());
        assert!(transcript["properties"].get("language").is_some());
        assert_eq!(transcript["required"], json!(["url"]));

        let summary = &tools[1].input_schema;
        assert!(summary["properties"].get("mode").is_some());
        assert_eq!(summary["required"], json!(["url"]));
    }

    #[test]
    fn test_server_info() {
        let info = CaptionServer::new(FakeBackend).get_info();
        assert_eq!(info.protocol_version, ProtocolVersion::V_2024_11_05);
        assert_eq!(info.server_info.name, "captioner");
        assert!(info.capabilities.tools.is_some());
    }
}
