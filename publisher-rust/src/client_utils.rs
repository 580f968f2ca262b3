use crate::{PublishError, PublishResult};
use reqwest::Response;
use serde::de::DeserializeOwned;

/// Pass the response through on a success status, otherwise turn it into
/// `PublishError::StatusCode` carrying the body text.
pub(crate) async fn ensure_success(response: Response) -> PublishResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(PublishError::StatusCode(
            status,
            response.text().await.unwrap_or_default(),
        ))
    }
}

/// Check the status, then parse the JSON body.
pub(crate) async fn read_json<R: DeserializeOwned>(response: Response) -> PublishResult<R> {
    Ok(ensure_success(response).await?.json::<R>().await?)
}
