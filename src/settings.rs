use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use url::Url;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::{
    offline::{InterceptRule, MissStrategy},
    overlay::OverlayConfig,
};

pub const ASSET_ROOT_ENV: &str = "SGCAT_ASSET_ROOT";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    /// Game page. The main window loads it through the offline origin.
    pub primary_url: String,
    /// GM page, loaded directly in the overlay window.
    pub overlay_url: String,
    /// How requests the bundle can't answer reach the game server.
    pub miss_strategy: MissStrategy,
    /// Relative paths are resolved against the app resource directory.
    pub asset_root: String,
    pub overlay_enabled: bool,
    /// `localStorage` key holding the game login, removed on logout.
    pub session_credential_key: String,
    pub intercept_rule: InterceptRule,
    pub overlay: OverlayConfig,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            primary_url: "http://81.69.17.107:81".into(),
            overlay_url: "http://81.69.17.107:81/gm".into(),
            miss_strategy: MissStrategy::default(),
            asset_root: "game".into(),
            overlay_enabled: true,
            session_credential_key: "game_login_info".into(),
            intercept_rule: InterceptRule::default(),
            overlay: OverlayConfig::default(),
        }
    }
}

impl AppSettings {
    /// URL of the overlay window, or `None` when the overlay is turned off.
    pub fn overlay_window_url(&self) -> Result<Option<Url>> {
        if !self.overlay_enabled {
            return Ok(None);
        }
        let url = Url::parse(&self.overlay_url)
            .with_context(|| format!("Invalid overlay url {}", self.overlay_url))?;
        Ok(Some(url))
    }

    /// Bundle root on disk. An explicit override wins over the configured value.
    pub fn resolve_asset_root(&self, resource_dir: &Path, env_override: Option<&str>) -> PathBuf {
        let configured = env_override
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(self.asset_root.as_str());
        let path = Path::new(configured);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            resource_dir.join(path)
        }
    }
}

pub fn asset_root_override() -> Option<String> {
    std::env::var(ASSET_ROOT_ENV).ok()
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<AppSettings>,
}

impl SettingsStore {
    /// Missing file means defaults. An unreadable or corrupt file is logged
    /// and also falls back to defaults; it is only overwritten on the next update.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!(
                    "Ignoring malformed settings at {}: {err}",
                    path.display()
                );
                AppSettings::default()
            })
        } else {
            AppSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn get(&self) -> AppSettings {
        self.read().clone()
    }

    pub fn update<F>(&self, apply: F) -> Result<AppSettings>
    where
        F: FnOnce(&mut AppSettings),
    {
        let mut guard = self.write();
        apply(&mut *guard);
        self.persist(&guard)?;
        Ok(guard.clone())
    }

    fn persist(&self, data: &AppSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    fn read(&self) -> RwLockReadGuard<'_, AppSettings> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, AppSettings> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SettingsStore::new(dir.path().join("settings.json")).expect("store");
        let settings = store.get();
        assert_eq!(settings.primary_url, "http://81.69.17.107:81");
        assert_eq!(settings.session_credential_key, "game_login_info");
        assert!(settings.overlay_enabled);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").expect("write");
        let store = SettingsStore::new(path).expect("store");
        assert_eq!(store.get().asset_root, "game");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "overlayEnabled": false, "overlay": { "minWidth": 240 } }"#)
            .expect("write");
        let settings = SettingsStore::new(path).expect("store").get();
        assert!(!settings.overlay_enabled);
        assert_eq!(settings.overlay.min_width, 240.0);
        assert_eq!(settings.overlay.min_height, 300.0);
        assert_eq!(settings.intercept_rule.content_folder, "game");
    }

    #[test]
    fn miss_strategy_defaults_to_proxy() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "missStrategy": "redirect" }"#).expect("write");
        assert_eq!(
            SettingsStore::new(path).expect("store").get().miss_strategy,
            MissStrategy::Redirect
        );
        assert_eq!(AppSettings::default().miss_strategy, MissStrategy::Proxy);
    }

    #[test]
    fn overlay_window_follows_settings() {
        let mut settings = AppSettings::default();
        settings.overlay_url = "http://localhost:9000/gm?tab=mail".into();
        assert_eq!(
            settings
                .overlay_window_url()
                .expect("valid")
                .map(|url| url.to_string()),
            Some("http://localhost:9000/gm?tab=mail".to_string())
        );

        settings.overlay_enabled = false;
        assert!(settings.overlay_window_url().expect("valid").is_none());

        settings.overlay_enabled = true;
        settings.overlay_url = "gm".into();
        assert!(settings.overlay_window_url().is_err());
    }

    #[test]
    fn update_persists_to_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        let store = SettingsStore::new(path.clone()).expect("store");
        store
            .update(|settings| settings.primary_url = "http://localhost:8080".into())
            .expect("update");

        let reopened = SettingsStore::new(path).expect("reopen");
        assert_eq!(reopened.get().primary_url, "http://localhost:8080");
    }

    #[test]
    fn asset_root_resolution() {
        let settings = AppSettings::default();
        let resources = Path::new("/opt/sgcat/resources");

        assert_eq!(
            settings.resolve_asset_root(resources, None),
            resources.join("game")
        );
        assert_eq!(
            settings.resolve_asset_root(resources, Some("/srv/bundle")),
            PathBuf::from("/srv/bundle")
        );
        assert_eq!(
            settings.resolve_asset_root(resources, Some("  ")),
            resources.join("game")
        );
    }
}
