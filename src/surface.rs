//! Commands from the overlay menu that act on the two web surfaces.
//!
//! The primary surface hosts the game, the overlay surface hosts the GM
//! panel. Hosts implement [`ContentSurfaces`]; this module only decides
//! which surface operations a command maps to.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SurfaceCommand {
    /// Navigate the primary surface back to its start URL.
    ReloadPrimary,
    ReloadOverlay,
    /// Drop both surfaces' HTTP caches, then reload both.
    ClearCachesAndReload,
    /// Remove the stored login from the primary surface and reload it.
    ClearSessionAndReload,
}

impl SurfaceCommand {
    pub fn collapses_overlay(self) -> bool {
        !matches!(self, SurfaceCommand::ReloadOverlay)
    }
}

pub trait ContentSurfaces {
    fn navigate_primary(&self, url: &str) -> Result<()>;
    fn reload_primary(&self) -> Result<()>;
    fn reload_overlay(&self) -> Result<()>;
    fn clear_caches(&self) -> Result<()>;
    fn eval_primary(&self, script: &str) -> Result<()>;
}

/// Script that forgets the stored login and reloads the page.
pub fn clear_session_script(credential_key: &str) -> Result<String> {
    let quoted = serde_json::to_string(credential_key)
        .context("failed to encode credential key")?;
    Ok(format!("localStorage.removeItem({quoted}); location.reload();"))
}

/// `entry_url` is where the primary surface starts, normally the game page on the offline origin.
pub fn run_surface_command<S: ContentSurfaces + ?Sized>(
    surfaces: &S,
    command: SurfaceCommand,
    entry_url: &str,
    credential_key: &str,
) -> Result<()> {
    match command {
        SurfaceCommand::ReloadPrimary => surfaces
            .navigate_primary(entry_url)
            .with_context(|| format!("failed to navigate to {entry_url}")),
        SurfaceCommand::ReloadOverlay => surfaces
            .reload_overlay()
            .context("failed to reload overlay surface"),
        SurfaceCommand::ClearCachesAndReload => {
            surfaces.clear_caches().context("failed to clear caches")?;
            surfaces.reload_primary().context("failed to reload primary surface")?;
            surfaces.reload_overlay().context("failed to reload overlay surface")
        }
        SurfaceCommand::ClearSessionAndReload => {
            let script = clear_session_script(credential_key)?;
            surfaces
                .eval_primary(&script)
                .context("failed to clear session")
        }
    }
}
