pub mod db;
pub mod offline;
pub mod overlay;
pub mod settings;
pub mod surface;
mod utils;

#[cfg(feature = "desktop")]
mod commands;

#[cfg(feature = "desktop")]
pub use desktop::run;

#[cfg(feature = "desktop")]
pub(crate) use desktop::AppState;

pub const DEBUG_ENV: &str = "SGCAT_DEBUG";

/// `SGCAT_DEBUG=1` (or `true`) turns on per-request debug output.
pub fn debug_enabled() -> bool {
    std::env::var(DEBUG_ENV)
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

#[cfg(feature = "desktop")]
mod desktop {
    use std::sync::Arc;

    use tauri::{Manager, WebviewUrl, WebviewWindowBuilder};

    use crate::{
        commands::{
            gateway_request, get_overlay_state, http_response, overlay_close, overlay_drag_end,
            overlay_drag_move, overlay_drag_start, overlay_reset, overlay_resize_end,
            overlay_resize_move, overlay_resize_start, overlay_set_screen, overlay_tap,
            run_surface_command, OVERLAY_LABEL, PRIMARY_LABEL,
        },
        db::Database,
        debug_enabled,
        offline::{
            AssetBundle, GatewayResponse, OfflineGateway, OfflineInterceptor, ReqwestUpstream,
        },
        overlay::{OverlayController, OverlayService, ScreenBounds},
        settings::{asset_root_override, SettingsStore},
    };

    pub(crate) struct AppState {
        pub(crate) settings: SettingsStore,
        pub(crate) gateway: Arc<OfflineGateway>,
        pub(crate) overlay: OverlayService,
    }

    /// Used until the first `overlay_set_screen` from the page.
    const FALLBACK_SCREEN: (f32, f32) = (1280.0, 800.0);

    fn initial_screen(app_handle: &tauri::AppHandle) -> ScreenBounds {
        match app_handle.primary_monitor() {
            Ok(Some(monitor)) => {
                let size = monitor.size().to_logical::<f32>(monitor.scale_factor());
                ScreenBounds::new(size.width, size.height)
            }
            Ok(None) => ScreenBounds::new(FALLBACK_SCREEN.0, FALLBACK_SCREEN.1),
            Err(err) => {
                log::warn!("Failed to query primary monitor: {err}");
                ScreenBounds::new(FALLBACK_SCREEN.0, FALLBACK_SCREEN.1)
            }
        }
    }

    #[cfg_attr(mobile, tauri::mobile_entry_point)]
    pub fn run() {
        // Initialize logging (reads RUST_LOG env var)
        let level = if debug_enabled() {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };
        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();

        log::info!("sgcat starting up...");

        tauri::Builder::default()
            .setup(|app| {
                let result = (|| -> anyhow::Result<()> {
                    let app_data_dir = app
                        .path()
                        .app_data_dir()
                        .map_err(|err| anyhow::anyhow!(err))?;
                    std::fs::create_dir_all(&app_data_dir)?;

                    let database = Database::new(app_data_dir.join("sgcat.sqlite3"))?;
                    let settings_store = SettingsStore::new(app_data_dir.join("settings.json"))?;
                    let settings = settings_store.get();

                    let resource_dir = app
                        .path()
                        .resource_dir()
                        .map_err(|err| anyhow::anyhow!(err))?;
                    let asset_root = settings
                        .resolve_asset_root(&resource_dir, asset_root_override().as_deref());
                    log::info!("Serving offline assets from {}", asset_root.display());

                    let interceptor = OfflineInterceptor::new(
                        settings.intercept_rule.clone(),
                        AssetBundle::new(asset_root),
                    );
                    let gateway = Arc::new(OfflineGateway::new(
                        interceptor,
                        &settings.primary_url,
                        settings.miss_strategy,
                        Box::new(ReqwestUpstream::new()?),
                    )?);
                    log::info!("Loading game from {}", gateway.entry_url());

                    WebviewWindowBuilder::new(
                        app,
                        PRIMARY_LABEL,
                        WebviewUrl::CustomProtocol(gateway.entry_url().clone()),
                    )
                    .title("sgcat")
                    .inner_size(1280.0, 800.0)
                    .resizable(true)
                    .build()?;

                    if let Some(overlay_url) = settings.overlay_window_url()? {
                        WebviewWindowBuilder::new(
                            app,
                            OVERLAY_LABEL,
                            WebviewUrl::External(overlay_url),
                        )
                        .title("GM")
                        .inner_size(320.0, 480.0)
                        .decorations(false)
                        .always_on_top(true)
                        .skip_taskbar(true)
                        .build()?;
                    }

                    let controller = OverlayController::new(
                        settings.overlay.clone(),
                        initial_screen(app.handle()),
                    );
                    let overlay = OverlayService::new(controller, database.clone());

                    // Gestures that land before this finishes win over stored values.
                    {
                        let overlay = overlay.clone();
                        tauri::async_runtime::spawn(async move {
                            overlay.restore().await;
                        });
                    }

                    app.manage(AppState {
                        settings: settings_store,
                        gateway,
                        overlay,
                    });

                    Ok(())
                })();

                result.map_err(|err| err.into())
            })
            .register_asynchronous_uri_scheme_protocol("offline", |ctx, request, responder| {
                let Some(gateway) = ctx
                    .app_handle()
                    .try_state::<AppState>()
                    .map(|state| state.gateway.clone())
                else {
                    responder.respond(http_response(GatewayResponse::not_found()));
                    return;
                };

                // Misses may block on the game server.
                tauri::async_runtime::spawn_blocking(move || {
                    let response = gateway.handle(&gateway_request(request));
                    responder.respond(http_response(response));
                });
            })
            .invoke_handler(tauri::generate_handler![
                get_overlay_state,
                overlay_tap,
                overlay_close,
                overlay_drag_start,
                overlay_drag_move,
                overlay_drag_end,
                overlay_resize_start,
                overlay_resize_move,
                overlay_resize_end,
                overlay_set_screen,
                overlay_reset,
                run_surface_command,
            ])
            .run(tauri::generate_context!())
            .expect("error while running tauri application");
    }
}
