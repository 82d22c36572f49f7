mod config;
mod controller;
pub mod geometry;
mod service;
mod state;

pub use config::OverlayConfig;
pub use controller::OverlayController;
pub use geometry::{CollapsedFrame, ExpandedFrame, ScreenBounds, SizeLimits};
pub use service::OverlayService;
pub use state::{
    CollapsedGesture, ExpandedGesture, OverlayMode, OverlaySnapshot, OverlayState,
    PersistIntent, PersistedGeometry,
};
