use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ClientOptions;
use crate::error::{Error, Result, Service};

/// Build the HTTP client shared by one operation's calls.
pub(crate) fn build_client(options: &ClientOptions) -> Result<Client> {
    Ok(Client::builder()
        .timeout(options.timeout)
        .user_agent(options.user_agent.as_str())
        .build()?)
}

/// Send a request, turning transport failures and non-2xx statuses into
/// errors attributed to `service`.
pub(crate) async fn send(service: Service, request: RequestBuilder) -> Result<Response> {
    let response = request
        .send()
        .await
        .map_err(|source| Error::Request { service, source })?;

    let status = response.status();
    debug!(%service, status = status.as_u16(), "response received");
    if !status.is_success() {
        return Err(Error::Status {
            service,
            status: status.as_u16(),
        });
    }
    Ok(response)
}

pub(crate) async fn read_text(service: Service, response: Response) -> Result<String> {
    response
        .text()
        .await
        .map_err(|source| Error::Request { service, source })
}

pub(crate) async fn read_json<T: DeserializeOwned>(service: Service, response: Response) -> Result<T> {
    let body = read_text(service, response).await?;
    serde_json::from_str(&body).map_err(|e| Error::UnexpectedResponse {
        service,
        detail: format!("invalid JSON: {e}"),
    })
}
