mod common;

use std::sync::Arc;

use common::{FakeCamera, ScriptedService, controller, sample_image};
use rollcall_kiosk::domains::feedback::NotificationKind;
use rollcall_kiosk::domains::media::{CaptureError, DeviceError};
use rollcall_kiosk::domains::session::{CameraOutcome, Mode, SessionMessage, update};

#[tokio::test]
async fn camera_is_live_only_on_scan_screen() {
    let camera = FakeCamera::new();
    let kiosk = controller(camera.clone(), Arc::new(ScriptedService::new())).await;

    for target in [Mode::Register, Mode::Scan, Mode::Log, Mode::Scan, Mode::Home] {
        kiosk.set_mode(target).await;
        let snapshot = kiosk.snapshot();
        assert_eq!(snapshot.mode, target);
        assert_eq!(snapshot.media.is_active(), target == Mode::Scan);
        assert_eq!(camera.live(), usize::from(target == Mode::Scan));
    }
    assert_eq!(camera.opened(), 2);
}

#[tokio::test]
async fn scan_to_scan_restarts_the_camera() {
    let camera = FakeCamera::new();
    let kiosk = controller(camera.clone(), Arc::new(ScriptedService::new())).await;

    kiosk.set_mode(Mode::Scan).await;
    let first = kiosk.snapshot().media.session_id;
    let change = kiosk.set_mode(Mode::Scan).await;

    assert!(change.released.is_some());
    assert!(matches!(change.camera, CameraOutcome::Started(_)));
    assert_ne!(kiosk.snapshot().media.session_id, first);
    assert_eq!(camera.opened(), 2);
    assert_eq!(camera.live(), 1);
}

#[tokio::test]
async fn capture_stores_frame_until_screen_is_left() {
    let camera = FakeCamera::new();
    let kiosk = controller(camera.clone(), Arc::new(ScriptedService::new())).await;

    kiosk.set_mode(Mode::Scan).await;
    let frame = kiosk.capture().await.unwrap();
    assert_eq!((frame.width, frame.height), (64, 48));
    assert_eq!(&frame.jpeg[..2], &[0xFF, 0xD8]);

    let snapshot = kiosk.snapshot();
    assert_eq!(snapshot.captured_frame.as_ref(), Some(&frame));
    assert_eq!(snapshot.notification.kind, NotificationKind::Success);
    assert_eq!(snapshot.notification.text, "Photo captured");

    kiosk.set_mode(Mode::Home).await;
    assert!(kiosk.snapshot().captured_frame.is_none());
    assert_eq!(camera.live(), 0);
}

#[tokio::test]
async fn capture_outside_scan_reports_camera_not_ready() {
    let kiosk = controller(FakeCamera::new(), Arc::new(ScriptedService::new())).await;

    let err = kiosk.capture().await.unwrap_err();
    assert!(matches!(err, CaptureError::NotReady));
    let snapshot = kiosk.snapshot();
    assert!(snapshot.captured_frame.is_none());
    assert_eq!(snapshot.notification.kind, NotificationKind::Error);
    assert_eq!(snapshot.notification.text, "Camera not ready");
}

#[tokio::test]
async fn denied_camera_still_enters_scan() {
    let camera = FakeCamera::failing(DeviceError::not_allowed("Permission denied"));
    let kiosk = controller(camera.clone(), Arc::new(ScriptedService::new())).await;

    let change = kiosk.set_mode(Mode::Scan).await;
    assert_eq!(change.camera, CameraOutcome::Unavailable);

    let snapshot = kiosk.snapshot();
    assert_eq!(snapshot.mode, Mode::Scan);
    assert!(!snapshot.media.is_active());
    assert_eq!(snapshot.notification.kind, NotificationKind::Error);
    assert_eq!(
        snapshot.notification.text,
        "Error accessing webcam: NotAllowedError: Permission denied"
    );
}

#[tokio::test]
async fn draft_survives_navigation() {
    let kiosk = controller(FakeCamera::new(), Arc::new(ScriptedService::new())).await;

    kiosk.set_mode(Mode::Register).await;
    kiosk.set_name("Alice");
    kiosk.set_roll_no("17");
    kiosk.set_image(sample_image());

    kiosk.set_mode(Mode::Scan).await;
    kiosk.set_mode(Mode::Register).await;

    let draft = kiosk.snapshot().draft;
    assert_eq!(draft.name, "Alice");
    assert_eq!(draft.roll_no, "17");
    assert_eq!(draft.image, Some(sample_image()));
}

#[tokio::test]
async fn stop_releases_camera_and_is_repeatable() {
    let camera = FakeCamera::new();
    let kiosk = controller(camera.clone(), Arc::new(ScriptedService::new())).await;
    assert!(kiosk.snapshot().started);

    kiosk.set_mode(Mode::Scan).await;
    kiosk.capture().await.unwrap();

    let released = kiosk.stop().await.expect("a session was active");
    assert_eq!(released.tracks_stopped, 1);
    assert!(kiosk.stop().await.is_none());

    let snapshot = kiosk.snapshot();
    assert!(!snapshot.started);
    assert_eq!(snapshot.mode, Mode::Home);
    assert!(!snapshot.media.is_active());
    assert!(snapshot.captured_frame.is_none());
    assert_eq!(camera.live(), 0);
}

#[tokio::test]
async fn restart_from_scan_releases_camera_and_allows_reentry() {
    let camera = FakeCamera::new();
    let kiosk = controller(camera.clone(), Arc::new(ScriptedService::new())).await;
    kiosk.set_mode(Mode::Scan).await;
    kiosk.capture().await.unwrap();

    let change = kiosk.start().await;
    assert_eq!((change.from, change.to), (Mode::Scan, Mode::Home));
    assert!(change.released.is_some());

    let snapshot = kiosk.snapshot();
    assert!(snapshot.started);
    assert_eq!(snapshot.mode, Mode::Home);
    assert!(!snapshot.media.is_active());
    assert!(snapshot.captured_frame.is_none());
    assert_eq!(camera.live(), 0);

    let change = kiosk.set_mode(Mode::Scan).await;
    assert!(matches!(change.camera, CameraOutcome::Started(_)));
    assert!(kiosk.snapshot().media.is_active());
    assert_eq!(camera.opened(), 2);
    assert_eq!(camera.live(), 1);
}

#[tokio::test]
async fn stop_then_start_begins_on_home_with_camera_off() {
    let camera = FakeCamera::new();
    let kiosk = controller(camera.clone(), Arc::new(ScriptedService::new())).await;
    kiosk.set_mode(Mode::Scan).await;
    kiosk.stop().await;

    let change = kiosk.start().await;
    assert_eq!((change.from, change.to), (Mode::Home, Mode::Home));
    assert!(change.released.is_none());
    assert_eq!(change.camera, CameraOutcome::Untouched);
    assert_eq!(camera.live(), 0);
}

#[tokio::test]
async fn capture_finishing_after_scan_was_left_is_dropped() {
    let camera = FakeCamera::new();
    let kiosk = controller(camera.clone(), Arc::new(ScriptedService::new())).await;
    kiosk.set_mode(Mode::Scan).await;
    let first_session = kiosk.snapshot().media.session_id;

    let capture = tokio::spawn({
        let kiosk = kiosk.clone();
        async move { kiosk.capture().await }
    });
    // Frame grabbed; the encode is now running off the media lock.
    while camera.grabs() == 0 {
        tokio::task::yield_now().await;
    }
    kiosk.set_mode(Mode::Home).await;
    kiosk.set_mode(Mode::Scan).await;
    assert_ne!(kiosk.snapshot().media.session_id, first_session);

    let err = capture.await.unwrap().unwrap_err();
    assert!(matches!(err, CaptureError::SessionEnded));

    let snapshot = kiosk.snapshot();
    assert!(snapshot.captured_frame.is_none());
    assert!(snapshot.media.is_active());
}

#[tokio::test]
async fn back_to_back_captures_keep_a_single_frame() {
    let camera = FakeCamera::new();
    let kiosk = controller(camera.clone(), Arc::new(ScriptedService::new())).await;
    kiosk.set_mode(Mode::Scan).await;

    let first = kiosk.capture().await.unwrap();
    let second = kiosk.capture().await.unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(kiosk.snapshot().captured_frame, Some(second));

    let (a, b) = tokio::join!(kiosk.capture(), kiosk.capture());
    let (a, b) = (a.unwrap(), b.unwrap());
    let stored = kiosk.snapshot().captured_frame.unwrap();
    assert!(stored.id == a.id || stored.id == b.id);
    assert_eq!(camera.grabs(), 4);
}

#[tokio::test]
async fn dropping_the_controller_releases_the_camera() {
    let camera = FakeCamera::new();
    let kiosk = controller(camera.clone(), Arc::new(ScriptedService::new())).await;
    kiosk.set_mode(Mode::Scan).await;
    assert_eq!(camera.live(), 1);

    drop(kiosk);
    assert_eq!(camera.live(), 0);
}

#[tokio::test]
async fn messages_drive_the_same_entry_points() {
    let kiosk = controller(FakeCamera::new(), Arc::new(ScriptedService::new())).await;

    update(&kiosk, SessionMessage::Navigate(Mode::Register)).await;
    update(&kiosk, SessionMessage::UpdateName("Bob".into())).await;
    update(&kiosk, SessionMessage::UpdateRollNo("8".into())).await;
    let outcome = update(
        &kiosk,
        SessionMessage::PickImage("/definitely/not/here.jpg".into()),
    )
    .await;
    assert!(outcome.is_failure());

    let snapshot = kiosk.snapshot();
    assert_eq!(snapshot.mode, Mode::Register);
    assert_eq!(snapshot.draft.name, "Bob");
    assert_eq!(snapshot.draft.roll_no, "8");
    assert!(snapshot.draft.image.is_none());
    assert_eq!(snapshot.notification.kind, NotificationKind::Error);
}

#[tokio::test]
async fn picked_image_file_lands_in_draft() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("alice.png");
    std::fs::write(&path, b"\x89PNG fake").unwrap();

    let kiosk = controller(FakeCamera::new(), Arc::new(ScriptedService::new())).await;
    let outcome = update(&kiosk, SessionMessage::PickImage(path)).await;
    assert!(!outcome.is_failure());

    let image = kiosk.snapshot().draft.image.unwrap();
    assert_eq!(image.file_name, "alice.png");
    assert_eq!(image.mime_type, "image/png");
    assert_eq!(image.bytes, b"\x89PNG fake");
}
