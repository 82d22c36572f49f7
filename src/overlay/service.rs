use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Mutex;

use super::{
    controller::OverlayController,
    geometry::ScreenBounds,
    state::{OverlaySnapshot, PersistIntent, PersistedGeometry},
};
use crate::{db::Database, log_error, log_info, log_warn, surface::SurfaceCommand};

const ENABLE_LOGS: bool = true;

/// Shared handle over the overlay controller and its durable store.
///
/// Every operation takes the controller lock, applies the transition and,
/// while still holding the lock, queues the resulting writes. Writes thus
/// reach the database in the same order the transitions happened.
#[derive(Clone)]
pub struct OverlayService {
    controller: Arc<Mutex<OverlayController>>,
    db: Database,
}

impl OverlayService {
    pub fn new(controller: OverlayController, db: Database) -> Self {
        Self {
            controller: Arc::new(Mutex::new(controller)),
            db,
        }
    }

    /// Loads the persisted geometry and applies it once.
    ///
    /// A failed load keeps the screen-derived defaults; the session still
    /// counts as restored so a late retry cannot clobber user gestures.
    pub async fn restore(&self) -> OverlaySnapshot {
        let persisted = match self.db.load_overlay_geometry().await {
            Ok(persisted) => persisted,
            Err(err) => {
                log_error!("Failed to load overlay geometry: {err:#}");
                PersistedGeometry::default()
            }
        };

        let mut controller = self.controller.lock().await;
        if controller.apply_persisted(persisted) {
            log_info!("Overlay geometry restored: {:?}", persisted);
        }
        controller.snapshot()
    }

    pub async fn snapshot(&self) -> OverlaySnapshot {
        self.controller.lock().await.snapshot()
    }

    pub async fn tap(&self) -> OverlaySnapshot {
        self.transition(|controller| controller.tap()).await
    }

    pub async fn close(&self) -> OverlaySnapshot {
        self.transition(|controller| controller.close()).await
    }

    pub async fn drag_start(&self) -> OverlaySnapshot {
        self.transition(|controller| {
            controller.drag_start();
            Vec::new()
        })
        .await
    }

    pub async fn drag_move(&self, dx: f32, dy: f32) -> OverlaySnapshot {
        self.transition(|controller| {
            controller.drag_move(dx, dy);
            Vec::new()
        })
        .await
    }

    pub async fn drag_end(&self) -> OverlaySnapshot {
        self.transition(|controller| controller.drag_end()).await
    }

    pub async fn resize_start(&self) -> OverlaySnapshot {
        self.transition(|controller| {
            controller.resize_start();
            Vec::new()
        })
        .await
    }

    pub async fn resize_move(&self, dx: f32, dy: f32) -> OverlaySnapshot {
        self.transition(|controller| {
            controller.resize_move(dx, dy);
            Vec::new()
        })
        .await
    }

    pub async fn resize_end(&self) -> OverlaySnapshot {
        self.transition(|controller| controller.resize_end()).await
    }

    pub async fn set_screen(&self, screen: ScreenBounds) -> OverlaySnapshot {
        self.transition(|controller| {
            controller.set_screen(screen);
            Vec::new()
        })
        .await
    }

    pub async fn reset(&self) -> OverlaySnapshot {
        self.transition(|controller| controller.reset_geometry()).await
    }

    /// Overlay side effect of a menu command: everything but an overlay
    /// reload folds the panel back into the bubble.
    pub async fn after_surface_command(&self, command: SurfaceCommand) -> OverlaySnapshot {
        if !command.collapses_overlay() {
            return self.snapshot().await;
        }
        self.close().await
    }

    async fn transition<F>(&self, apply: F) -> OverlaySnapshot
    where
        F: FnOnce(&mut OverlayController) -> Vec<PersistIntent>,
    {
        let mut controller = self.controller.lock().await;
        let intents = apply(&mut *controller);
        self.persist(intents);
        controller.snapshot()
    }

    fn persist(&self, intents: Vec<PersistIntent>) {
        for intent in intents {
            if let Err(err) = self.db.save_overlay_geometry(intent) {
                log_warn!("Dropped overlay write {:?}: {err:#}", intent);
            }
        }
    }

    /// Waits until every queued geometry write has reached the database.
    pub async fn flush(&self) -> Result<()> {
        self.db.flush().await
    }
}
