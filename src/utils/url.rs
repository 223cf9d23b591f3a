//! URL helpers for building Gemini endpoints from a configurable base URL.

/// Strip trailing slashes so endpoint joins never produce `//`.
///
/// ```
/// use sarangbang::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("https://example.com/v1beta/"), "https://example.com/v1beta");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Join a base URL and an endpoint path.
///
/// ```
/// use sarangbang::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("https://example.com/v1beta/", "/models"),
///     "https://example.com/v1beta/models"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{normalized_base}/{endpoint}")
}

/// Qualify a bare model name with the `models/` collection prefix.
pub fn qualified_model_name(model: &str) -> String {
    if model.starts_with("models/") || model.starts_with("tunedModels/") {
        model.to_string()
    } else {
        format!("models/{model}")
    }
}

/// Endpoint for a model-scoped action such as `generateContent`.
pub fn model_action_url(base_url: &str, model: &str, action: &str) -> String {
    construct_api_url(
        base_url,
        &format!("{}:{action}", qualified_model_name(model)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("https://generativelanguage.googleapis.com/v1beta"),
            "https://generativelanguage.googleapis.com/v1beta"
        );
        assert_eq!(
            normalize_base_url("https://generativelanguage.googleapis.com/v1beta///"),
            "https://generativelanguage.googleapis.com/v1beta"
        );
        assert_eq!(normalize_base_url("///"), "");
    }

    #[test]
    fn test_construct_api_url() {
        assert_eq!(
            construct_api_url("http://127.0.0.1:8080/", "///models"),
            "http://127.0.0.1:8080/models"
        );
    }

    #[test]
    fn model_names_are_qualified_once() {
        assert_eq!(qualified_model_name("gemini-pro"), "models/gemini-pro");
        assert_eq!(
            qualified_model_name("models/gemini-1.5-flash"),
            "models/gemini-1.5-flash"
        );
        assert_eq!(
            qualified_model_name("tunedModels/family-v1"),
            "tunedModels/family-v1"
        );
    }

    #[test]
    fn model_action_urls_use_colon_suffix() {
        assert_eq!(
            model_action_url(
                "https://generativelanguage.googleapis.com/v1beta/",
                "gemini-flash-latest",
                "generateContent"
            ),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-flash-latest:generateContent"
        );
    }
}
