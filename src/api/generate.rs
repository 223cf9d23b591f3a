use crate::api::{
    check_status, ApiError, GenerateContentRequest, GenerateContentResponse, API_KEY_HEADER,
    GENERATE_CONTENT_METHOD,
};
use crate::utils::url::model_action_url;

/// Send one `generateContent` call and return the reply text.
pub async fn generate_content(
    client: &reqwest::Client,
    base_url: &str,
    api_key: &str,
    model: &str,
    request: &GenerateContentRequest,
) -> Result<String, ApiError> {
    let url = model_action_url(base_url, model, GENERATE_CONTENT_METHOD);
    let response = client
        .post(url)
        .header(API_KEY_HEADER, api_key)
        .json(request)
        .send()
        .await?;

    let response = check_status(response).await?;
    let body = response.json::<GenerateContentResponse>().await?;

    match body.first_text() {
        Some(text) => Ok(text),
        None => {
            let reason = body
                .prompt_feedback
                .and_then(|feedback| feedback.block_reason)
                .or_else(|| {
                    body.candidates
                        .into_iter()
                        .next()
                        .and_then(|candidate| candidate.finish_reason)
                });
            Err(ApiError::EmptyResponse { reason })
        }
    }
}
