use serde::{Deserialize, Serialize};

use super::geometry::{CollapsedFrame, ExpandedFrame, ScreenBounds};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum OverlayMode {
    Collapsed,
    Expanded,
}

impl Default for OverlayMode {
    fn default() -> Self {
        OverlayMode::Collapsed
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CollapsedGesture {
    Idle,
    Dragging,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ExpandedGesture {
    Idle,
    Dragging,
    Resizing,
}

/// Current mode plus the gesture in flight. Resizing only exists while expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Collapsed(CollapsedGesture),
    Expanded(ExpandedGesture),
}

impl Default for OverlayState {
    fn default() -> Self {
        OverlayState::Collapsed(CollapsedGesture::Idle)
    }
}

impl OverlayState {
    pub fn mode(self) -> OverlayMode {
        match self {
            OverlayState::Collapsed(_) => OverlayMode::Collapsed,
            OverlayState::Expanded(_) => OverlayMode::Expanded,
        }
    }

    pub fn is_idle(self) -> bool {
        matches!(
            self,
            OverlayState::Collapsed(CollapsedGesture::Idle)
                | OverlayState::Expanded(ExpandedGesture::Idle)
        )
    }
}

/// A write for the persisted geometry. Each variant touches only its own two fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PersistIntent {
    CollapsedPosition { x: f32, y: f32 },
    ExpandedPosition { x: f32, y: f32 },
    ExpandedSize { width: f32, height: f32 },
}

/// Durable copy of the geometry as read at startup. `None` = never saved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedGeometry {
    pub collapsed_x: Option<f32>,
    pub collapsed_y: Option<f32>,
    pub expanded_x: Option<f32>,
    pub expanded_y: Option<f32>,
    pub expanded_width: Option<f32>,
    pub expanded_height: Option<f32>,
}

/// What the host renders. Both frames are always present: the expanded
/// panel stays alive while collapsed, it is just parked out of view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlaySnapshot {
    pub mode: OverlayMode,
    pub collapsed: CollapsedFrame,
    pub collapsed_side: f32,
    pub expanded: ExpandedFrame,
    pub screen: ScreenBounds,
    pub restored: bool,
    pub interacting: bool,
}
