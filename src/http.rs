//! JSON fetching shared by the API clients.

use serde::de::DeserializeOwned;

use crate::errors::WidgetError;

/// GET `url` and decode its JSON body. One attempt, no retry.
pub async fn fetch_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
) -> Result<T, WidgetError> {
    tracing::debug!(url, "fetching");

    let resp = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|source| WidgetError::Fetch {
            url: url.to_string(),
            source,
        })?;

    let status = resp.status();
    if !status.is_success() {
        tracing::warn!(url, %status, "upstream API error");
        return Err(WidgetError::HttpStatus {
            url: url.to_string(),
            status,
        });
    }

    resp.json::<T>().await.map_err(|source| WidgetError::Decode {
        url: url.to_string(),
        source,
    })
}
