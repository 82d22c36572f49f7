use std::path::Path;

use sgcat_lib::{
    db::Database,
    overlay::{OverlayConfig, OverlayController, OverlayMode, OverlayService, ScreenBounds},
};

fn open_service(db_path: &Path, screen: ScreenBounds) -> (Database, OverlayService) {
    let db = Database::new(db_path.to_path_buf()).expect("open database");
    let controller = OverlayController::new(OverlayConfig::default(), screen);
    let service = OverlayService::new(controller, db.clone());
    (db, service)
}

#[tokio::test]
async fn collapsed_position_survives_narrower_screen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("sgcat.sqlite3");

    {
        let (db, _service) = open_service(&db_path, ScreenBounds::new(1080.0, 1920.0));
        db.save_collapsed_position(500.0, 300.0).expect("queue");
        db.save_collapsed_position(700.0, 300.0).expect("queue");
        db.flush().await.expect("flush");
    }

    let (_db, service) = open_service(&db_path, ScreenBounds::new(720.0, 1280.0));
    let snapshot = service.restore().await;
    assert_eq!(snapshot.collapsed.x, 664.0);
    assert_eq!(snapshot.collapsed.y, 300.0);
}

#[tokio::test]
async fn stored_position_inside_screen_is_kept() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("sgcat.sqlite3");

    {
        let (db, _service) = open_service(&db_path, ScreenBounds::new(1080.0, 1920.0));
        db.save_collapsed_position(500.0, 300.0).expect("queue");
        db.flush().await.expect("flush");
    }

    let (_db, service) = open_service(&db_path, ScreenBounds::new(720.0, 1280.0));
    let snapshot = service.restore().await;
    assert_eq!(snapshot.collapsed.x, 500.0_f32.min(720.0 - 56.0));
}

#[tokio::test]
async fn gestures_are_restored_on_next_launch() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("sgcat.sqlite3");
    let screen = ScreenBounds::new(1080.0, 1920.0);

    {
        let (_db, service) = open_service(&db_path, screen);
        service.restore().await;

        service.drag_start().await;
        service.drag_move(100.0, 40.0).await;
        service.drag_end().await;

        service.tap().await;
        service.resize_start().await;
        service.resize_move(80.0, 120.0).await;
        service.resize_end().await;
        service.drag_start().await;
        service.drag_move(-300.0, -500.0).await;
        let closed = service.close().await;
        assert_eq!(closed.mode, OverlayMode::Collapsed);
        service.flush().await.expect("flush");
    }

    let (_db, service) = open_service(&db_path, screen);
    let snapshot = service.restore().await;
    assert_eq!(snapshot.mode, OverlayMode::Collapsed);
    assert_eq!((snapshot.collapsed.x, snapshot.collapsed.y), (1024.0, 340.0));
    assert_eq!(
        (snapshot.expanded.width, snapshot.expanded.height),
        (400.0, 600.0)
    );
    assert_eq!((snapshot.expanded.x, snapshot.expanded.y), (80.0, 220.0));
}

#[tokio::test]
async fn gesture_before_restore_keeps_session_value() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("sgcat.sqlite3");
    let screen = ScreenBounds::new(1080.0, 1920.0);

    {
        let (db, _service) = open_service(&db_path, screen);
        db.save_collapsed_position(0.0, 1000.0).expect("queue");
        db.save_expanded_size(500.0, 700.0).expect("queue");
        db.flush().await.expect("flush");
    }

    let (_db, service) = open_service(&db_path, screen);
    service.drag_start().await;
    service.drag_move(0.0, 100.0).await;
    service.drag_end().await;

    let snapshot = service.restore().await;
    assert!(snapshot.restored);
    // the bubble was dragged from its default spot, so the stored one is ignored
    assert_eq!((snapshot.collapsed.x, snapshot.collapsed.y), (1024.0, 400.0));
    // the panel was never touched and takes the stored size
    assert_eq!(
        (snapshot.expanded.width, snapshot.expanded.height),
        (500.0, 700.0)
    );
}
