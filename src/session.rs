//! Process-scoped segmentation session cache
//!
//! Sessions are created lazily on first use of a model identifier, retained
//! for the lifetime of the registry (in practice: the process), and shared
//! across requests. The get-or-create discipline guarantees at-most-one
//! construction per key even under concurrent first use, while resolutions
//! of different keys proceed independently.

use crate::backends::{ModelLoader, SegmentationModel};
use crate::error::Result;
use crate::models::KnownModel;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{OnceCell, RwLock};

type SessionSlot = Arc<OnceCell<Arc<dyn SegmentationModel>>>;

/// Lazily populated cache of loaded model sessions, keyed by model
///
/// Construction failures are not cached: the per-key cell stays empty, so a
/// later resolve calls the loader again. The registry never retries on its
/// own; recovery is a call-site decision.
pub struct SessionRegistry {
    loader: Arc<dyn ModelLoader>,
    sessions: RwLock<HashMap<KnownModel, SessionSlot>>,
}

impl SessionRegistry {
    /// Create a registry that constructs sessions through the given loader
    #[must_use]
    pub fn new(loader: Arc<dyn ModelLoader>) -> Self {
        Self {
            loader,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Resolve the session for a model, constructing it on first use
    ///
    /// Concurrent callers for the same key share one construction; the
    /// per-key cell serializes only that key's create path.
    ///
    /// # Errors
    /// - Session construction failure from the loader
    pub async fn resolve(&self, model: KnownModel) -> Result<Arc<dyn SegmentationModel>> {
        let slot = {
            let sessions = self.sessions.read().await;
            sessions.get(&model).cloned()
        };
        let slot = match slot {
            Some(slot) => slot,
            None => {
                let mut sessions = self.sessions.write().await;
                Arc::clone(sessions.entry(model).or_default())
            },
        };

        let session = slot.get_or_try_init(|| self.load_session(model)).await?;

        Ok(Arc::clone(session))
    }

    async fn load_session(&self, model: KnownModel) -> Result<Arc<dyn SegmentationModel>> {
        log::info!("loading segmentation model '{}'", model.id());
        let session = self.loader.load(model).await?;
        log::info!("segmentation model '{}' ready", model.id());
        Ok(session)
    }

    /// Whether a session for the model has been constructed
    pub async fn is_loaded(&self, model: KnownModel) -> bool {
        let sessions = self.sessions.read().await;
        sessions
            .get(&model)
            .is_some_and(|slot| slot.initialized())
    }

    /// Number of sessions currently constructed
    pub async fn loaded_count(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.values().filter(|slot| slot.initialized()).count()
    }
}
