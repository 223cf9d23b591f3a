use crate::api::{check_status, ApiError, ModelInfo, ModelsResponse, API_KEY_HEADER};
use crate::utils::url::construct_api_url;
use tracing::debug;

const PAGE_SIZE: &str = "1000";

/// Fetch every model the key can see, following `nextPageToken` until exhausted.
pub async fn fetch_models(
    client: &reqwest::Client,
    base_url: &str,
    api_key: &str,
) -> Result<Vec<ModelInfo>, ApiError> {
    let models_url = construct_api_url(base_url, "models");
    let mut models = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let mut request = client
            .get(&models_url)
            .header(API_KEY_HEADER, api_key)
            .query(&[("pageSize", PAGE_SIZE)]);
        if let Some(token) = page_token.as_deref() {
            request = request.query(&[("pageToken", token)]);
        }

        let response = check_status(request.send().await?).await?;
        let page = response.json::<ModelsResponse>().await?;
        debug!(count = page.models.len(), "fetched model page");
        models.extend(page.models);

        match page.next_page_token {
            Some(token) if !token.is_empty() => page_token = Some(token),
            _ => break,
        }
    }

    Ok(models)
}

/// Sort models by identifier so listings are stable between runs.
pub fn sort_models(models: &mut [ModelInfo]) {
    models.sort_by(|a, b| a.name.cmp(&b.name));
}
