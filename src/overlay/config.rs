use serde::{Deserialize, Serialize};

use super::geometry::{CollapsedFrame, ExpandedFrame, ScreenBounds, SizeLimits};

/// Sizes and defaults of the floating overlay, in logical pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverlayConfig {
    /// Side of the collapsed bubble.
    pub collapsed_side: f32,
    /// Distance of the default bubble position from the right screen edge.
    pub collapsed_default_inset: f32,
    pub collapsed_default_y: f32,

    pub expanded_default_width: f32,
    pub expanded_default_height: f32,
    pub min_width: f32,
    pub min_height: f32,
    /// Max size is the screen minus these margins.
    pub max_width_margin: f32,
    pub max_height_margin: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            collapsed_side: 56.0,
            collapsed_default_inset: 200.0,
            collapsed_default_y: 300.0,
            expanded_default_width: 320.0,
            expanded_default_height: 480.0,
            min_width: 200.0,
            min_height: 300.0,
            max_width_margin: 32.0,
            max_height_margin: 100.0,
        }
    }
}

impl OverlayConfig {
    /// Max never drops below min, even on screens smaller than the margins.
    pub fn size_limits(&self, screen: ScreenBounds) -> SizeLimits {
        SizeLimits {
            min_width: self.min_width,
            min_height: self.min_height,
            max_width: (screen.width - self.max_width_margin).max(self.min_width),
            max_height: (screen.height - self.max_height_margin).max(self.min_height),
        }
    }

    pub fn default_collapsed(&self, screen: ScreenBounds) -> CollapsedFrame {
        CollapsedFrame {
            x: screen.width - self.collapsed_default_inset,
            y: self.collapsed_default_y,
        }
        .clamped(self.collapsed_side, screen)
    }

    /// Default-sized panel centered on screen.
    pub fn default_expanded(&self, screen: ScreenBounds) -> ExpandedFrame {
        let sized = ExpandedFrame {
            x: 0.0,
            y: 0.0,
            width: self.expanded_default_width,
            height: self.expanded_default_height,
        }
        .with_size_clamped(self.size_limits(screen));
        centered(sized, screen)
    }
}

pub(crate) fn centered(frame: ExpandedFrame, screen: ScreenBounds) -> ExpandedFrame {
    ExpandedFrame {
        x: (screen.width - frame.width) / 2.0,
        y: (screen.height - frame.height) / 2.0,
        ..frame
    }
    .with_position_clamped(screen)
}
