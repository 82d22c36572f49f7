use anyhow::{anyhow, Context, Result};
use log::error;
use tauri::{
    http::{Request, Response, StatusCode},
    AppHandle, Emitter, Manager, Runtime, State, Url, WebviewWindow,
};

use crate::{
    offline::{GatewayRequest, GatewayResponse},
    overlay::{OverlayService, OverlaySnapshot, ScreenBounds},
    surface::{self, ContentSurfaces, SurfaceCommand},
    AppState,
};

pub const PRIMARY_LABEL: &str = "main";
pub const OVERLAY_LABEL: &str = "overlay";
pub const OVERLAY_STATE_EVENT: &str = "overlay-state-changed";

fn overlay_from_state(state: &State<'_, AppState>) -> OverlayService {
    state.overlay.clone()
}

fn emit_snapshot(
    app_handle: &AppHandle,
    snapshot: OverlaySnapshot,
) -> Result<OverlaySnapshot, String> {
    app_handle
        .emit(OVERLAY_STATE_EVENT, &snapshot)
        .map_err(|e| e.to_string())?;
    Ok(snapshot)
}

#[tauri::command]
pub async fn get_overlay_state(state: State<'_, AppState>) -> Result<OverlaySnapshot, String> {
    Ok(overlay_from_state(&state).snapshot().await)
}

#[tauri::command]
pub async fn overlay_tap(
    state: State<'_, AppState>,
    app_handle: AppHandle,
) -> Result<OverlaySnapshot, String> {
    let snapshot = overlay_from_state(&state).tap().await;
    emit_snapshot(&app_handle, snapshot)
}

#[tauri::command]
pub async fn overlay_close(
    state: State<'_, AppState>,
    app_handle: AppHandle,
) -> Result<OverlaySnapshot, String> {
    let snapshot = overlay_from_state(&state).close().await;
    emit_snapshot(&app_handle, snapshot)
}

#[tauri::command]
pub async fn overlay_drag_start(
    state: State<'_, AppState>,
    app_handle: AppHandle,
) -> Result<OverlaySnapshot, String> {
    let snapshot = overlay_from_state(&state).drag_start().await;
    emit_snapshot(&app_handle, snapshot)
}

#[tauri::command]
pub async fn overlay_drag_move(
    state: State<'_, AppState>,
    app_handle: AppHandle,
    dx: f32,
    dy: f32,
) -> Result<OverlaySnapshot, String> {
    let snapshot = overlay_from_state(&state).drag_move(dx, dy).await;
    emit_snapshot(&app_handle, snapshot)
}

#[tauri::command]
pub async fn overlay_drag_end(
    state: State<'_, AppState>,
    app_handle: AppHandle,
) -> Result<OverlaySnapshot, String> {
    let snapshot = overlay_from_state(&state).drag_end().await;
    emit_snapshot(&app_handle, snapshot)
}

#[tauri::command]
pub async fn overlay_resize_start(
    state: State<'_, AppState>,
    app_handle: AppHandle,
) -> Result<OverlaySnapshot, String> {
    let snapshot = overlay_from_state(&state).resize_start().await;
    emit_snapshot(&app_handle, snapshot)
}

#[tauri::command]
pub async fn overlay_resize_move(
    state: State<'_, AppState>,
    app_handle: AppHandle,
    dx: f32,
    dy: f32,
) -> Result<OverlaySnapshot, String> {
    let snapshot = overlay_from_state(&state).resize_move(dx, dy).await;
    emit_snapshot(&app_handle, snapshot)
}

#[tauri::command]
pub async fn overlay_resize_end(
    state: State<'_, AppState>,
    app_handle: AppHandle,
) -> Result<OverlaySnapshot, String> {
    let snapshot = overlay_from_state(&state).resize_end().await;
    emit_snapshot(&app_handle, snapshot)
}

#[tauri::command]
pub async fn overlay_set_screen(
    state: State<'_, AppState>,
    app_handle: AppHandle,
    width: f32,
    height: f32,
) -> Result<OverlaySnapshot, String> {
    let snapshot = overlay_from_state(&state)
        .set_screen(ScreenBounds::new(width, height))
        .await;
    emit_snapshot(&app_handle, snapshot)
}

#[tauri::command]
pub async fn overlay_reset(
    state: State<'_, AppState>,
    app_handle: AppHandle,
) -> Result<OverlaySnapshot, String> {
    let snapshot = overlay_from_state(&state).reset().await;
    emit_snapshot(&app_handle, snapshot)
}

#[tauri::command]
pub async fn run_surface_command(
    state: State<'_, AppState>,
    app_handle: AppHandle,
    command: SurfaceCommand,
) -> Result<OverlaySnapshot, String> {
    let settings = state.settings.get();
    let surfaces = TauriSurfaces::new(&app_handle);
    surface::run_surface_command(
        &surfaces,
        command,
        state.gateway.entry_url().as_str(),
        &settings.session_credential_key,
    )
    .map_err(|e| format!("{e:#}"))?;

    let snapshot = overlay_from_state(&state)
        .after_surface_command(command)
        .await;
    emit_snapshot(&app_handle, snapshot)
}

pub fn gateway_request(request: Request<Vec<u8>>) -> GatewayRequest {
    let (parts, body) = request.into_parts();
    let headers = parts
        .headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();

    GatewayRequest {
        method: parts.method.as_str().to_string(),
        uri: parts.uri.to_string(),
        headers,
        body,
    }
}

pub fn http_response(response: GatewayResponse) -> Response<Vec<u8>> {
    let mut builder = Response::builder().status(response.status);
    for (name, value) in &response.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    builder.body(response.body).unwrap_or_else(|err| {
        error!("Failed to build offline response: {err}");
        let mut fallback = Response::new(Vec::new());
        *fallback.status_mut() = StatusCode::BAD_GATEWAY;
        fallback
    })
}

/// The two webview windows of the desktop host.
pub struct TauriSurfaces<R: Runtime> {
    app_handle: AppHandle<R>,
}

impl<R: Runtime> TauriSurfaces<R> {
    pub fn new(app_handle: &AppHandle<R>) -> Self {
        Self {
            app_handle: app_handle.clone(),
        }
    }

    fn primary(&self) -> Result<WebviewWindow<R>> {
        self.app_handle
            .get_webview_window(PRIMARY_LABEL)
            .ok_or_else(|| anyhow!("webview window {PRIMARY_LABEL} is not open"))
    }

    /// `None` when the overlay is disabled in settings, so the window was never built.
    fn overlay(&self) -> Option<WebviewWindow<R>> {
        self.app_handle.get_webview_window(OVERLAY_LABEL)
    }
}

impl<R: Runtime> ContentSurfaces for TauriSurfaces<R> {
    fn navigate_primary(&self, url: &str) -> Result<()> {
        let url: Url = url.parse().with_context(|| format!("invalid url {url}"))?;
        self.primary()?.navigate(url)?;
        Ok(())
    }

    fn reload_primary(&self) -> Result<()> {
        self.primary()?.reload()?;
        Ok(())
    }

    fn reload_overlay(&self) -> Result<()> {
        if let Some(overlay) = self.overlay() {
            overlay.reload()?;
        }
        Ok(())
    }

    fn clear_caches(&self) -> Result<()> {
        self.primary()?.clear_all_browsing_data()?;
        if let Some(overlay) = self.overlay() {
            overlay.clear_all_browsing_data()?;
        }
        Ok(())
    }

    fn eval_primary(&self, script: &str) -> Result<()> {
        self.primary()?.eval(script)?;
        Ok(())
    }
}
