//! Durable copy of the floating overlay geometry.
//!
//! Six scalar fields under their own namespace. Loaded once per session;
//! written per gesture end, each write touching only its own pair of keys.

use anyhow::Result;

use super::preferences::{read_namespace, upsert_values};
use crate::{
    db::Database,
    overlay::{PersistIntent, PersistedGeometry},
};

pub const OVERLAY_NAMESPACE: &str = "floating_window";

const COLLAPSED_OFFSET_X: &str = "collapsed_offset_x";
const COLLAPSED_OFFSET_Y: &str = "collapsed_offset_y";
const EXPANDED_OFFSET_X: &str = "expanded_offset_x";
const EXPANDED_OFFSET_Y: &str = "expanded_offset_y";
const EXPANDED_WIDTH: &str = "expanded_width";
const EXPANDED_HEIGHT: &str = "expanded_height";

fn intent_values(intent: PersistIntent) -> (&'static str, [(&'static str, f64); 2]) {
    match intent {
        PersistIntent::CollapsedPosition { x, y } => (
            "save collapsed position",
            [(COLLAPSED_OFFSET_X, x as f64), (COLLAPSED_OFFSET_Y, y as f64)],
        ),
        PersistIntent::ExpandedPosition { x, y } => (
            "save expanded position",
            [(EXPANDED_OFFSET_X, x as f64), (EXPANDED_OFFSET_Y, y as f64)],
        ),
        PersistIntent::ExpandedSize { width, height } => (
            "save expanded size",
            [(EXPANDED_WIDTH, width as f64), (EXPANDED_HEIGHT, height as f64)],
        ),
    }
}

impl Database {
    pub async fn load_overlay_geometry(&self) -> Result<PersistedGeometry> {
        self.execute(|conn| {
            let values = read_namespace(conn, OVERLAY_NAMESPACE)?;
            // non-finite values are treated as never saved
            let field = |key: &str| {
                values
                    .get(key)
                    .map(|value| *value as f32)
                    .filter(|value| value.is_finite())
            };

            Ok(PersistedGeometry {
                collapsed_x: field(COLLAPSED_OFFSET_X),
                collapsed_y: field(COLLAPSED_OFFSET_Y),
                expanded_x: field(EXPANDED_OFFSET_X),
                expanded_y: field(EXPANDED_OFFSET_Y),
                expanded_width: field(EXPANDED_WIDTH),
                expanded_height: field(EXPANDED_HEIGHT),
            })
        })
        .await
    }

    /// Fire-and-forget write of one geometry pair.
    pub fn save_overlay_geometry(&self, intent: PersistIntent) -> Result<()> {
        let (label, values) = intent_values(intent);
        self.enqueue(label, move |conn| upsert_values(conn, OVERLAY_NAMESPACE, &values))
    }

    pub fn save_collapsed_position(&self, x: f32, y: f32) -> Result<()> {
        self.save_overlay_geometry(PersistIntent::CollapsedPosition { x, y })
    }

    pub fn save_expanded_position(&self, x: f32, y: f32) -> Result<()> {
        self.save_overlay_geometry(PersistIntent::ExpandedPosition { x, y })
    }

    pub fn save_expanded_size(&self, width: f32, height: f32) -> Result<()> {
        self.save_overlay_geometry(PersistIntent::ExpandedSize { width, height })
    }

    pub async fn clear_overlay_geometry(&self) -> Result<()> {
        self.clear_preferences(OVERLAY_NAMESPACE).await
    }
}
