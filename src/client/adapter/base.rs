//! Request plumbing shared by the HTTP adapters.

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::client::error::{ErrorResponse, parse_retry_after};
use crate::models::ProviderKind;
use crate::{Error, Result};

pub(crate) struct RequestExecutor;

/// Drops the request URL from a transport error. Some providers carry the
/// API key in the query string, and the error text ends up in results and logs.
fn transport_error(err: reqwest::Error) -> Error {
    Error::Network(err.without_url())
}

impl RequestExecutor {
    /// Sends `body` as JSON and decodes a success body into `R`.
    ///
    /// Non-success statuses are classified through [`ErrorResponse`]; a
    /// success body that does not match `R` is an [`Error::Parse`].
    pub async fn post_json<B, R>(
        provider: ProviderKind,
        request: reqwest::RequestBuilder,
        body: &B,
    ) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = request
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = parse_retry_after(response.headers());
            let text = response.text().await.unwrap_or_default();
            let err = ErrorResponse::parse(&text).into_error(provider, status.as_u16(), retry_after);
            tracing::debug!(%provider, status = status.as_u16(), error = %err, "provider returned error");
            return Err(err);
        }

        let text = response.text().await.map_err(transport_error)?;
        serde_json::from_str(&text).map_err(|e| {
            Error::Parse(format!("Unexpected {} response: {}", provider.label(), e))
        })
    }
}
