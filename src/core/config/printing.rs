use crate::core::config::data::{path_display, Config};

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.api_key {
            Some(_) => println!("  api-key: (set in config file)"),
            None => println!("  api-key: (unset)"),
        }
        println!("  base-url: {}", self.base_url());
        match self.pinned_model() {
            Some(model) => println!("  pinned-model: {model}"),
            None => {
                println!("  preferred-models:");
                for model in self.preferred_models() {
                    println!("    {model}");
                }
                println!("  model-family-marker: {}", self.model_family_marker());
            }
        }
        println!("  request-timeout: {}s", self.request_timeout().as_secs());
        match &self.default_persona {
            Some(persona) => println!("  default-persona: {persona}"),
            None => println!("  default-persona: (unset)"),
        }
        println!("  exit-phrase: {}", self.exit_phrase());
        match &self.background_image {
            Some(path) => println!("  background-image: {}", path_display(path)),
            None => println!("  background-image: (unset)"),
        }
        if !self.personas.is_empty() {
            println!("  persona-overrides:");
            for id in self.personas.keys() {
                println!("    {id}");
            }
        }
    }
}
