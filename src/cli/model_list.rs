//! Model listing functionality
//!
//! Shows the generation-capable models visible to the configured key and
//! which one the resolver would pick.

use crate::api::ModelInfo;
use crate::cli::Services;
use crate::core::resolver::ModelId;
use std::error::Error;

pub async fn list_models(services: &Services) -> Result<(), Box<dyn Error>> {
    println!("🤖 Available Models for Gemini");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();

    let resolver = &services.resolver;
    let models = resolver.supported_model_infos().await?;
    if models.is_empty() {
        println!("No generation-capable models found for this key.");
        return Ok(());
    }

    let names: Vec<String> = models.iter().map(|model| model.name.clone()).collect();
    let picked = match resolver.resolve_from(&names).await {
        Ok(model) => Some(model),
        Err(err) => {
            eprintln!("⚠️  {err}");
            None
        }
    };

    println!("Found {} models:", models.len());
    println!();
    for model in &models {
        println!("{}", format_model_entry(model, picked.as_ref()));
    }

    if let Some(pinned) = services.config.pinned_model() {
        println!();
        println!("📌 pinned_model = {pinned} (from config)");
    }
    Ok(())
}

fn format_model_entry(model: &ModelInfo, picked: Option<&ModelId>) -> String {
    let short = model.name.strip_prefix("models/").unwrap_or(&model.name);
    let mut entry = if picked.is_some_and(|id| id.as_str() == model.name) {
        format!("  🎯 {short}  (selected)")
    } else {
        format!("  • {short}")
    };

    if let Some(display_name) = model.display_name.as_deref().filter(|n| *n != short) {
        entry.push_str(&format!("  {display_name}"));
    }
    if let Some(version) = &model.version {
        entry.push_str(&format!(" (v{version})"));
    }
    if let Some(description) = model.description.as_deref().map(str::trim) {
        if !description.is_empty() {
            entry.push_str(&format!("\n      {description}"));
        }
    }
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::utils::test_utils::{model_info, MockProvider};
    use std::sync::Arc;

    #[test]
    fn entry_shows_metadata_and_selection() {
        let mut model = model_info("models/gemini-1.5-flash", &["generateContent"]);
        model.display_name = Some("Gemini 1.5 Flash".to_string());
        model.version = Some("001".to_string());
        model.description = Some("Fast and versatile.".to_string());

        let picked = ModelId::new("gemini-1.5-flash");
        assert_eq!(
            format_model_entry(&model, Some(&picked)),
            "  🎯 gemini-1.5-flash  (selected)  Gemini 1.5 Flash (v001)\n      Fast and versatile."
        );
        assert_eq!(
            format_model_entry(&model_info("models/gemini-pro", &[]), Some(&picked)),
            "  • gemini-pro"
        );
    }

    #[tokio::test]
    async fn listing_models_fetches_once() {
        let provider = Arc::new(MockProvider::with_models(&[
            "models/gemini-pro",
            "models/gemini-1.5-flash",
        ]));
        let services = Services::new(Config::default(), provider.clone());

        list_models(&services).await.expect("listing succeeds");
        assert_eq!(provider.list_calls(), 1);
        assert_eq!(
            services.resolver.cached_model().map(ModelId::short_name),
            Some("gemini-1.5-flash")
        );
    }
}
