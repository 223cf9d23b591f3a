//! Per-user session isolation.
//!
//! Each user key owns its own [`SessionManager`]. The model resolver and the
//! provider are shared, so the model is still resolved once per process.

use crate::core::persona::PersonaRegistry;
use crate::core::provider::ChatProvider;
use crate::core::resolver::ModelResolver;
use crate::core::session::SessionManager;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

pub struct SessionRegistry {
    resolver: Arc<ModelResolver>,
    provider: Arc<dyn ChatProvider>,
    personas: Arc<PersonaRegistry>,
    managers: HashMap<String, SessionManager>,
}

impl SessionRegistry {
    pub fn new(
        resolver: Arc<ModelResolver>,
        provider: Arc<dyn ChatProvider>,
        personas: Arc<PersonaRegistry>,
    ) -> Self {
        Self {
            resolver,
            provider,
            personas,
            managers: HashMap::new(),
        }
    }

    /// The manager for `user`, created empty on first use.
    pub fn manager(&mut self, user: &str) -> &mut SessionManager {
        let Self {
            resolver,
            provider,
            personas,
            managers,
        } = self;
        managers.entry(user.to_string()).or_insert_with(|| {
            debug!(user, "creating session manager");
            SessionManager::new(resolver.clone(), provider.clone(), personas.clone())
        })
    }

    pub fn get(&self, user: &str) -> Option<&SessionManager> {
        self.managers.get(user)
    }

    /// Drop a user's session and transcript. Returns whether one existed.
    pub fn remove(&mut self, user: &str) -> bool {
        self.managers.remove(user).is_some()
    }

    pub fn len(&self) -> usize {
        self.managers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }
}
