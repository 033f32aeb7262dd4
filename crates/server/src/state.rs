//! # Application State
//!
//! The live assistant, its config and the per-session store shared by all handlers.

use prodpilot_core::config::{AssistantConfig, ConfigPatch};
use prodpilot_core::state::Session;
use prodpilot_core::swarm::Assistant;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};

/// Builds an assistant from config; swapped out in tests
pub type AssistantFactory = Arc<dyn Fn(&AssistantConfig) -> anyhow::Result<Assistant> + Send + Sync>;

pub struct AppState {
    assistant: RwLock<Arc<Assistant>>,
    config: RwLock<AssistantConfig>,
    config_path: PathBuf,
    factory: AssistantFactory,
    pub sessions: SessionStore,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(
        config: AssistantConfig,
        config_path: PathBuf,
        factory: AssistantFactory,
    ) -> anyhow::Result<Self> {
        let assistant = factory(&config)?;
        Ok(Self {
            assistant: RwLock::new(Arc::new(assistant)),
            config: RwLock::new(config),
            config_path,
            factory,
            sessions: SessionStore::default(),
        })
    }

    pub async fn assistant(&self) -> Arc<Assistant> {
        self.assistant.read().await.clone()
    }

    pub async fn config(&self) -> AssistantConfig {
        self.config.read().await.clone()
    }

    /// Merge, persist and rebuild the assistant. A failed save or rebuild is
    /// logged; the merged config still applies to what could be applied.
    pub async fn update_config(&self, patch: ConfigPatch) -> AssistantConfig {
        let mut config = self.config.write().await;
        config.merge(patch);

        if let Err(e) = config.save(&self.config_path).await {
            tracing::warn!("Failed to save config to {}: {}", self.config_path.display(), e);
        }

        match (self.factory)(&config) {
            Ok(assistant) => *self.assistant.write().await = Arc::new(assistant),
            Err(e) => tracing::warn!("Keeping previous assistant, rebuild failed: {:#}", e),
        }

        config.clone()
    }
}

/// Sessions keyed by id. Each one sits behind its own mutex so turns of a
/// session run one at a time while different sessions proceed independently.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Slot>>,
}

struct Slot {
    session: Arc<Mutex<Session>>,
    last_used: Instant,
}

impl SessionStore {
    /// Look up `id`, creating the session if needed; no id means a fresh one
    pub async fn get_or_create(&self, id: Option<String>) -> (String, Arc<Mutex<Session>>) {
        let id = id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let mut sessions = self.sessions.write().await;
        let slot = sessions.entry(id.clone()).or_insert_with(|| Slot {
            session: Arc::new(Mutex::new(Session::new())),
            last_used: Instant::now(),
        });
        slot.last_used = Instant::now();
        (id, slot.session.clone())
    }

    pub async fn get(&self, id: &str) -> Option<Arc<Mutex<Session>>> {
        let mut sessions = self.sessions.write().await;
        let slot = sessions.get_mut(id)?;
        slot.last_used = Instant::now();
        Some(slot.session.clone())
    }

    /// Drop a session; false if it did not exist
    pub async fn remove(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    /// Evict sessions untouched for `max_idle`. Sessions a handler still holds are kept.
    pub async fn sweep_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, slot| {
            slot.last_used.elapsed() < max_idle || Arc::strong_count(&slot.session) > 1
        });
        before - sessions.len()
    }
}

/// Periodically evict idle sessions until the process exits
pub fn spawn_session_sweeper(state: SharedState, max_idle: Duration, every: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let evicted = state.sessions.sweep_idle(max_idle).await;
            if evicted > 0 {
                tracing::info!("Evicted {} idle session(s)", evicted);
            }
        }
    });
}
