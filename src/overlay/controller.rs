use super::{
    config::{centered, OverlayConfig},
    geometry::{
        clamp_axis, finite, CollapsedFrame, ExpandedFrame, ScreenBounds, SizeLimits,
    },
    state::{
        CollapsedGesture, ExpandedGesture, OverlayMode, OverlayState, OverlaySnapshot,
        PersistIntent, PersistedGeometry,
    },
};

/// Which frames a gesture has moved this session.
#[derive(Debug, Clone, Copy, Default)]
struct Touched {
    collapsed: bool,
    expanded: bool,
}

/// Geometric state machine of the floating overlay.
///
/// Owns both frames for the whole session. Gesture callbacks mutate them
/// synchronously; gesture ends return the [`PersistIntent`]s the caller
/// should flush. A frame is only ever persisted by a gesture on that frame.
#[derive(Debug, Clone)]
pub struct OverlayController {
    config: OverlayConfig,
    screen: ScreenBounds,
    limits: SizeLimits,
    collapsed: CollapsedFrame,
    expanded: ExpandedFrame,
    state: OverlayState,
    restored: bool,
    touched: Touched,
}

impl OverlayController {
    /// Starts collapsed with screen-derived defaults; persisted values arrive
    /// later through [`apply_persisted`](Self::apply_persisted).
    pub fn new(config: OverlayConfig, screen: ScreenBounds) -> Self {
        let limits = config.size_limits(screen);
        let collapsed = config.default_collapsed(screen);
        let expanded = config.default_expanded(screen);
        Self {
            config,
            screen,
            limits,
            collapsed,
            expanded,
            state: OverlayState::default(),
            restored: false,
            touched: Touched::default(),
        }
    }

    pub fn mode(&self) -> OverlayMode {
        self.state.mode()
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn collapsed(&self) -> CollapsedFrame {
        self.collapsed
    }

    pub fn expanded(&self) -> ExpandedFrame {
        self.expanded
    }

    pub fn screen(&self) -> ScreenBounds {
        self.screen
    }

    pub fn limits(&self) -> SizeLimits {
        self.limits
    }

    pub fn snapshot(&self) -> OverlaySnapshot {
        OverlaySnapshot {
            mode: self.mode(),
            collapsed: self.collapsed,
            collapsed_side: self.config.collapsed_side,
            expanded: self.expanded,
            screen: self.screen,
            restored: self.restored,
            interacting: !self.state.is_idle(),
        }
    }

    /// Tap on the bubble. Finishes a drag that was still open.
    pub fn tap(&mut self) -> Vec<PersistIntent> {
        if self.mode() != OverlayMode::Collapsed {
            return Vec::new();
        }
        let intents = self.finish_gesture();
        self.state = OverlayState::Expanded(ExpandedGesture::Idle);
        intents
    }

    /// Close button on the panel. Finishes a drag or resize that was still open.
    pub fn close(&mut self) -> Vec<PersistIntent> {
        if self.mode() != OverlayMode::Expanded {
            return Vec::new();
        }
        let intents = self.finish_gesture();
        self.state = OverlayState::Collapsed(CollapsedGesture::Idle);
        intents
    }

    pub fn drag_start(&mut self) {
        self.state = match self.state {
            OverlayState::Collapsed(_) => {
                self.touched.collapsed = true;
                OverlayState::Collapsed(CollapsedGesture::Dragging)
            }
            OverlayState::Expanded(_) => {
                self.touched.expanded = true;
                OverlayState::Expanded(ExpandedGesture::Dragging)
            }
        };
    }

    /// The bubble follows the pointer freely; the panel stays on screen.
    pub fn drag_move(&mut self, dx: f32, dy: f32) {
        let (dx, dy) = (finite(dx), finite(dy));
        match self.state {
            OverlayState::Collapsed(CollapsedGesture::Dragging) => {
                self.collapsed.x += dx;
                self.collapsed.y += dy;
            }
            OverlayState::Expanded(ExpandedGesture::Dragging) => {
                let frame = self.expanded;
                self.expanded.x = clamp_axis(frame.x + dx, frame.width, self.screen.width);
                self.expanded.y = clamp_axis(frame.y + dy, frame.height, self.screen.height);
            }
            _ => {}
        }
    }

    pub fn drag_end(&mut self) -> Vec<PersistIntent> {
        match self.state {
            OverlayState::Collapsed(CollapsedGesture::Dragging)
            | OverlayState::Expanded(ExpandedGesture::Dragging) => self.finish_gesture(),
            _ => Vec::new(),
        }
    }

    /// Ignored while collapsed: the bubble has no resize handle.
    pub fn resize_start(&mut self) {
        if let OverlayState::Expanded(_) = self.state {
            self.touched.expanded = true;
            self.state = OverlayState::Expanded(ExpandedGesture::Resizing);
        }
    }

    /// Grows or shrinks from the bottom-right handle; the top-left corner stays put.
    pub fn resize_move(&mut self, dx: f32, dy: f32) {
        if self.state != OverlayState::Expanded(ExpandedGesture::Resizing) {
            return;
        }
        let frame = self.expanded;
        self.expanded = ExpandedFrame {
            width: frame.width + finite(dx),
            height: frame.height + finite(dy),
            ..frame
        }
        .with_size_clamped(self.limits);
    }

    pub fn resize_end(&mut self) -> Vec<PersistIntent> {
        if self.state != OverlayState::Expanded(ExpandedGesture::Resizing) {
            return Vec::new();
        }
        self.finish_gesture()
    }

    /// Screen size changed (rotation, window resize). Re-clamps both frames
    /// without persisting them.
    pub fn set_screen(&mut self, screen: ScreenBounds) {
        self.screen = screen;
        self.limits = self.config.size_limits(screen);
        self.collapsed = self.collapsed.clamped(self.config.collapsed_side, screen);
        self.expanded = self.expanded.clamped(self.limits, screen);
    }

    /// Applies the persisted geometry read at startup. Only the first call
    /// counts, and frames a gesture already moved keep their session values.
    ///
    /// Returns whether anything was applied.
    pub fn apply_persisted(&mut self, persisted: PersistedGeometry) -> bool {
        if self.restored {
            return false;
        }
        self.restored = true;

        if !self.touched.collapsed {
            let fallback = self.config.default_collapsed(self.screen);
            self.collapsed = CollapsedFrame {
                x: persisted.collapsed_x.unwrap_or(fallback.x),
                y: persisted.collapsed_y.unwrap_or(fallback.y),
            }
            .clamped(self.config.collapsed_side, self.screen);
        }

        if !self.touched.expanded {
            let sized = ExpandedFrame {
                x: 0.0,
                y: 0.0,
                width: persisted
                    .expanded_width
                    .unwrap_or(self.config.expanded_default_width),
                height: persisted
                    .expanded_height
                    .unwrap_or(self.config.expanded_default_height),
            }
            .with_size_clamped(self.limits);
            let fallback = centered(sized, self.screen);
            self.expanded = ExpandedFrame {
                x: persisted.expanded_x.unwrap_or(fallback.x),
                y: persisted.expanded_y.unwrap_or(fallback.y),
                ..sized
            }
            .with_position_clamped(self.screen);
        }

        true
    }

    /// Back to screen-derived defaults for both frames, all six fields persisted.
    pub fn reset_geometry(&mut self) -> Vec<PersistIntent> {
        self.state = OverlayState::Collapsed(CollapsedGesture::Idle);
        self.collapsed = self.config.default_collapsed(self.screen);
        self.expanded = self.config.default_expanded(self.screen);
        self.touched = Touched {
            collapsed: true,
            expanded: true,
        };
        vec![
            self.collapsed_position(),
            self.expanded_position(),
            self.expanded_size(),
        ]
    }

    /// Normalizes the frame of the current gesture, returns to idle and
    /// reports what needs flushing.
    fn finish_gesture(&mut self) -> Vec<PersistIntent> {
        match self.state {
            OverlayState::Collapsed(CollapsedGesture::Dragging) => {
                self.collapsed = self
                    .collapsed
                    .snapped(self.config.collapsed_side, self.screen);
                self.state = OverlayState::Collapsed(CollapsedGesture::Idle);
                vec![self.collapsed_position()]
            }
            OverlayState::Expanded(ExpandedGesture::Dragging) => {
                self.expanded = self.expanded.with_position_clamped(self.screen);
                self.state = OverlayState::Expanded(ExpandedGesture::Idle);
                vec![self.expanded_position()]
            }
            OverlayState::Expanded(ExpandedGesture::Resizing) => {
                let before = self.expanded;
                self.expanded = self.expanded.with_position_clamped(self.screen);
                self.state = OverlayState::Expanded(ExpandedGesture::Idle);

                let mut intents = vec![self.expanded_size()];
                if (before.x, before.y) != (self.expanded.x, self.expanded.y) {
                    intents.push(self.expanded_position());
                }
                intents
            }
            OverlayState::Collapsed(CollapsedGesture::Idle)
            | OverlayState::Expanded(ExpandedGesture::Idle) => Vec::new(),
        }
    }

    fn collapsed_position(&self) -> PersistIntent {
        PersistIntent::CollapsedPosition {
            x: self.collapsed.x,
            y: self.collapsed.y,
        }
    }

    fn expanded_position(&self) -> PersistIntent {
        PersistIntent::ExpandedPosition {
            x: self.expanded.x,
            y: self.expanded.y,
        }
    }

    fn expanded_size(&self) -> PersistIntent {
        PersistIntent::ExpandedSize {
            width: self.expanded.width,
            height: self.expanded.height,
        }
    }
}
