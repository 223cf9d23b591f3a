//! Model resolution: pick one generation-capable model for the whole run.

use crate::api::models::sort_models;
use crate::api::ModelInfo;
use crate::core::config::Config;
use crate::core::provider::ChatProvider;
use crate::utils::url::qualified_model_name;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(name: &str) -> Self {
        Self(qualified_model_name(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name without the `models/` prefix, for display.
    pub fn short_name(&self) -> &str {
        self.0.strip_prefix("models/").unwrap_or(&self.0)
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    NoModelAvailable { reason: String },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::NoModelAvailable { reason } => {
                write!(f, "모델 연결 실패: no usable model available ({reason})")
            }
        }
    }
}

impl Error for ResolveError {}

/// Pick a model from the generation-capable set.
///
/// The first preference present wins; otherwise the first id containing the
/// family marker; otherwise nothing.
pub fn select_model(supported: &[String], preferences: &[String], marker: &str) -> Option<ModelId> {
    let supported: Vec<String> = supported
        .iter()
        .map(|name| qualified_model_name(name))
        .collect();

    for preference in preferences {
        let wanted = qualified_model_name(preference.trim());
        if supported.iter().any(|name| *name == wanted) {
            return Some(ModelId(wanted));
        }
    }

    let marker = marker.to_lowercase();
    if marker.is_empty() {
        return None;
    }
    supported
        .into_iter()
        .find(|name| name.to_lowercase().contains(&marker))
        .map(ModelId)
}

pub struct ModelResolver {
    provider: Arc<dyn ChatProvider>,
    preferences: Vec<String>,
    family_marker: String,
    pinned: Option<ModelId>,
    cache: OnceCell<ModelId>,
}

impl ModelResolver {
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        preferences: Vec<String>,
        family_marker: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            preferences,
            family_marker: family_marker.into(),
            pinned: None,
            cache: OnceCell::new(),
        }
    }

    pub fn from_config(provider: Arc<dyn ChatProvider>, config: &Config) -> Self {
        let mut resolver = Self::new(
            provider,
            config.preferred_models(),
            config.model_family_marker(),
        );
        resolver.pinned = config.pinned_model().map(ModelId::new);
        resolver
    }

    /// Resolve once per process. Concurrent callers share a single lookup;
    /// failures are not cached.
    pub async fn resolve_model(&self) -> Result<ModelId, ResolveError> {
        self.cache
            .get_or_try_init(|| self.lookup())
            .await
            .cloned()
    }

    pub fn cached_model(&self) -> Option<&ModelId> {
        self.cache.get()
    }

    /// Resolve against a listing the caller already fetched. Shares the
    /// cache with [`ModelResolver::resolve_model`].
    pub async fn resolve_from(&self, supported: &[String]) -> Result<ModelId, ResolveError> {
        self.cache
            .get_or_try_init(|| async {
                match self.pinned_model() {
                    Some(pinned) => Ok(pinned),
                    None => self.pick(supported),
                }
            })
            .await
            .cloned()
    }

    /// Generation-capable models, sorted.
    pub async fn supported_model_infos(&self) -> Result<Vec<ModelInfo>, ResolveError> {
        let models = self.provider.list_models().await.map_err(|err| {
            warn!(error = %err, "model listing failed");
            ResolveError::NoModelAvailable {
                reason: err.to_string(),
            }
        })?;
        let mut models: Vec<_> = models
            .into_iter()
            .filter(|model| model.supports_generation())
            .collect();
        sort_models(&mut models);
        debug!(count = models.len(), "generation-capable models listed");
        Ok(models)
    }

    /// Generation-capable model ids, sorted.
    pub async fn supported_models(&self) -> Result<Vec<String>, ResolveError> {
        let models = self.supported_model_infos().await?;
        Ok(models.into_iter().map(|model| model.name).collect())
    }

    fn pinned_model(&self) -> Option<ModelId> {
        self.pinned
            .clone()
            .inspect(|pinned| info!(model = %pinned, "using pinned model"))
    }

    async fn lookup(&self) -> Result<ModelId, ResolveError> {
        if let Some(pinned) = self.pinned_model() {
            return Ok(pinned);
        }
        let supported = self.supported_models().await?;
        self.pick(&supported)
    }

    fn pick(&self, supported: &[String]) -> Result<ModelId, ResolveError> {
        if supported.is_empty() {
            return Err(ResolveError::NoModelAvailable {
                reason: "provider lists no generation-capable models".to_string(),
            });
        }

        match select_model(supported, &self.preferences, &self.family_marker) {
            Some(model) => {
                info!(model = %model, "resolved model");
                Ok(model)
            }
            None => Err(ResolveError::NoModelAvailable {
                reason: format!(
                    "none of {} listed models matches the preference list or contains '{}'",
                    supported.len(),
                    self.family_marker
                ),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::defaults::DEFAULT_PREFERRED_MODELS;
    use crate::utils::test_utils::{model_info, MockProvider};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn default_preferences() -> Vec<String> {
        strings(DEFAULT_PREFERRED_MODELS)
    }

    #[test]
    fn highest_priority_match_wins() {
        let supported = strings(&[
            "models/gemini-pro",
            "models/gemini-1.5-pro",
            "models/gemini-1.5-flash-latest",
            "models/gemini-1.5-flash",
        ]);
        let chosen = select_model(&supported, &default_preferences(), "gemini");
        assert_eq!(chosen, Some(ModelId::new("models/gemini-1.5-flash")));

        let without_flash = strings(&["models/gemini-pro", "models/gemini-1.5-pro"]);
        let chosen = select_model(&without_flash, &default_preferences(), "gemini");
        assert_eq!(chosen, Some(ModelId::new("models/gemini-1.5-pro")));
    }

    #[test]
    fn bare_and_qualified_names_compare_equal() {
        let supported = strings(&["models/gemini-2.0-flash"]);
        let chosen = select_model(&supported, &strings(&["gemini-2.0-flash"]), "");
        assert_eq!(chosen.map(|m| m.to_string()).as_deref(), Some("models/gemini-2.0-flash"));
    }

    #[test]
    fn falls_back_to_family_marker() {
        let supported = strings(&["models/aqa", "models/gemini-2.5-flash", "models/gemma-3"]);
        let chosen = select_model(&supported, &default_preferences(), "gemini")
            .expect("marker-bearing id exists");
        assert!(chosen.as_str().contains("gemini"));
    }

    #[test]
    fn no_match_and_no_marker_yields_none() {
        let supported = strings(&["models/aqa", "models/gemma-3"]);
        assert!(select_model(&supported, &default_preferences(), "gemini").is_none());
        assert!(select_model(&[], &default_preferences(), "gemini").is_none());
    }

    #[tokio::test]
    async fn empty_listing_is_no_model_available() {
        let provider = Arc::new(MockProvider::with_models(&[]));
        let resolver = ModelResolver::new(provider, default_preferences(), "gemini");
        let err = resolver.resolve_model().await.expect_err("nothing to pick");
        assert!(matches!(err, ResolveError::NoModelAvailable { .. }));
    }

    #[tokio::test]
    async fn listing_failure_is_no_model_available() {
        let resolver =
            ModelResolver::new(Arc::new(MockProvider::unreachable()), default_preferences(), "gemini");
        let err = resolver.resolve_model().await.expect_err("listing fails");
        assert!(err.to_string().contains("listing unavailable"));
        assert!(resolver.cached_model().is_none());
    }

    #[tokio::test]
    async fn result_is_cached_for_the_process() {
        let provider = Arc::new(MockProvider::with_models(&[
            "models/gemini-pro",
            "models/gemini-1.5-flash",
        ]));
        let resolver = ModelResolver::new(provider.clone(), default_preferences(), "gemini");

        for _ in 0..3 {
            let model = resolver.resolve_model().await.expect("resolves");
            assert_eq!(model.short_name(), "gemini-1.5-flash");
        }
        assert_eq!(provider.list_calls(), 1);
    }

    #[tokio::test]
    async fn models_without_generate_content_are_ignored() {
        struct EmbeddingOnly;

        #[async_trait::async_trait]
        impl ChatProvider for EmbeddingOnly {
            async fn list_models(&self) -> Result<Vec<crate::api::ModelInfo>, crate::api::ApiError> {
                Ok(vec![
                    model_info("models/gemini-1.5-flash", &["embedContent"]),
                    model_info("models/gemini-pro", &["generateContent"]),
                ])
            }

            async fn generate(
                &self,
                _request: &crate::core::provider::GenerateRequest<'_>,
            ) -> Result<String, crate::api::ApiError> {
                unreachable!("resolution never generates")
            }
        }

        let resolver = ModelResolver::new(Arc::new(EmbeddingOnly), default_preferences(), "gemini");
        let model = resolver.resolve_model().await.expect("resolves");
        assert_eq!(model.as_str(), "models/gemini-pro");
    }

    #[tokio::test]
    async fn pinned_model_skips_listing() {
        let provider = Arc::new(MockProvider::unreachable());
        let config = Config {
            pinned_model: Some("gemini-flash-latest".to_string()),
            ..Default::default()
        };
        let resolver = ModelResolver::from_config(provider.clone(), &config);
        let model = resolver.resolve_model().await.expect("pinned resolves");
        assert_eq!(model.as_str(), "models/gemini-flash-latest");
        assert_eq!(provider.list_calls(), 0);
    }

    #[tokio::test]
    async fn prefetched_listing_seeds_the_cache() {
        let provider = Arc::new(MockProvider::with_models(&["models/gemini-1.5-flash"]));
        let resolver = ModelResolver::new(provider.clone(), default_preferences(), "gemini");

        let listed = resolver.supported_models().await.expect("listing");
        let model = resolver.resolve_from(&listed).await.expect("resolves");
        assert_eq!(model.short_name(), "gemini-1.5-flash");
        assert_eq!(resolver.resolve_model().await.expect("cached"), model);
        assert_eq!(provider.list_calls(), 1);
    }
}
