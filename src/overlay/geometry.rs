use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenBounds {
    pub width: f32,
    pub height: f32,
}

impl ScreenBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }
}

/// Clamps a position on one axis to `[0, screen - extent]`.
///
/// When the shape is larger than the screen the range collapses to `0`.
/// NaN maps to `0`.
pub fn clamp_axis(position: f32, extent: f32, screen: f32) -> f32 {
    let upper = (screen - extent).max(0.0);
    if position.is_nan() {
        return 0.0;
    }
    position.clamp(0.0, upper)
}

/// Clamps a size to `[min, max]`, treating `max < min` as `max == min`.
pub fn clamp_extent(value: f32, min: f32, max: f32) -> f32 {
    let max = max.max(min);
    if value.is_nan() {
        return min;
    }
    value.clamp(min, max)
}

/// Drops non-finite pointer deltas.
pub(crate) fn finite(delta: f32) -> f32 {
    if delta.is_finite() {
        delta
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeLimits {
    pub min_width: f32,
    pub min_height: f32,
    pub max_width: f32,
    pub max_height: f32,
}

/// The collapsed bubble: a fixed square, so only its position varies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollapsedFrame {
    pub x: f32,
    pub y: f32,
}

impl CollapsedFrame {
    pub fn clamped(self, side: f32, screen: ScreenBounds) -> Self {
        Self {
            x: clamp_axis(self.x, side, screen.width),
            y: clamp_axis(self.y, side, screen.height),
        }
    }

    /// Sticks the bubble to the nearer vertical edge and keeps it on screen vertically.
    pub fn snapped(self, side: f32, screen: ScreenBounds) -> Self {
        let center_x = self.x + side / 2.0;
        let x = if center_x < screen.width / 2.0 {
            0.0
        } else {
            screen.width - side
        };
        Self {
            x: clamp_axis(x, side, screen.width),
            y: clamp_axis(self.y, side, screen.height),
        }
    }
}

/// The expanded panel. The top-left corner anchors resizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandedFrame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ExpandedFrame {
    pub fn with_position_clamped(self, screen: ScreenBounds) -> Self {
        Self {
            x: clamp_axis(self.x, self.width, screen.width),
            y: clamp_axis(self.y, self.height, screen.height),
            ..self
        }
    }

    pub fn with_size_clamped(self, limits: SizeLimits) -> Self {
        Self {
            width: clamp_extent(self.width, limits.min_width, limits.max_width),
            height: clamp_extent(self.height, limits.min_height, limits.max_height),
            ..self
        }
    }

    /// Size first, then position against the clamped size.
    pub fn clamped(self, limits: SizeLimits, screen: ScreenBounds) -> Self {
        self.with_size_clamped(limits).with_position_clamped(screen)
    }
}
