//! 状態遷移の統合テスト
//!
//! 記録済み応答の再生と、接続できないエンドポイントへの送信で
//! landing → uploading → analyzing → result / uploading を検証

use plant_doctor::acquisition::ImageSource;
use plant_doctor::app::{App, AppState};
use plant_doctor::config::Config;
use plant_doctor::diagnosis::{GeminiClient, ReplayProvider};
use plant_doctor_common::{EncodedImage, Language};
use std::io::Cursor;
use std::path::Path;
use tempfile::tempdir;

const PERSIAN_REPLY: &str = r#"{
  "diseaseName": "لکه برگی",
  "confidence": "بالا",
  "description": "لکه‌های قهوه‌ای با حاشیه زرد روی برگ‌ها دیده می‌شود",
  "treatments": ["حذف برگ‌های آلوده", "سمپاشی با قارچ‌کش مسی"],
  "preventions": ["آبیاری از پای بوته"]
}"#;

fn write_jpeg(path: &Path) {
    let img = image::RgbImage::from_pixel(16, 12, image::Rgb([40, 140, 60]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Jpeg)
        .unwrap();
    std::fs::write(path, bytes).unwrap();
}

fn replay_app(dir: &Path) -> App {
    let reply = dir.join("reply.json");
    std::fs::write(&reply, PERSIAN_REPLY).unwrap();
    App::new(Box::new(ReplayProvider::new(reply, Language::Persian)), Language::Persian)
}

/// 接続を拒否するエンドポイント
fn unreachable_app(language: Language) -> App {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = Config {
        endpoint: format!("http://{}", addr),
        language,
        ..Default::default()
    };
    let client = GeminiClient::from_config(&config)
        .unwrap()
        .with_api_key(Some("test-key".into()));
    App::new(Box::new(client), language)
}

#[tokio::test]
async fn test_persian_reply_reaches_result() {
    let dir = tempdir().unwrap();
    let photo = dir.path().join("leaf.jpg");
    write_jpeg(&photo);

    let mut app = replay_app(dir.path());
    app.start().unwrap();

    let state = app.accept_file(ImageSource::Picker, Some(&photo)).await.unwrap();
    assert_eq!(state, AppState::Result);

    let result = app.result().unwrap();
    assert_eq!(result.disease_name(), "لکه برگی");
    assert_eq!(result.confidence(), "بالا");
    assert_eq!(result.treatments().len(), 2);
    assert_eq!(result.treatments()[1], "سمپاشی با قارچ‌کش مسی");
    assert_eq!(result.preventions(), ["آبیاری از پای بوته".to_string()]);
    // ペルシア数字のジャラリ暦
    assert!(result.timestamp().contains('۱'));

    let image = app.image().unwrap();
    assert_eq!(image.mime_type(), "image/jpeg");
    assert!(app.error().is_none());
}

#[tokio::test]
async fn test_selection_enters_analyzing_immediately() {
    let dir = tempdir().unwrap();
    let mut app = replay_app(dir.path());
    app.start().unwrap();

    app.begin_analysis(EncodedImage::from_bytes(b"jpeg", "image/jpeg")).unwrap();
    assert_eq!(app.state(), AppState::Analyzing);
    assert!(app.image().is_some());
    assert!(app.result().is_none());

    // 解析中の再選択は拒否
    let second = app.begin_analysis(EncodedImage::from_bytes(b"jpeg", "image/jpeg"));
    assert!(second.is_err());
    assert_eq!(app.state(), AppState::Analyzing);
}

#[tokio::test]
async fn test_network_failure_returns_to_uploading() {
    for language in [Language::Persian, Language::English] {
        let mut app = unreachable_app(language);
        app.start().unwrap();

        let state = app
            .select_image(EncodedImage::from_bytes(b"jpeg", "image/jpeg"))
            .await
            .unwrap();

        assert_eq!(state, AppState::Uploading);
        assert_eq!(app.error(), Some(language.analysis_failure_message()));
        assert!(app.result().is_none());
        assert!(app.image().is_none());
    }
}

#[tokio::test]
async fn test_reset_after_error_history() {
    let mut app = unreachable_app(Language::Persian);
    app.start().unwrap();
    app.select_image(EncodedImage::from_bytes(b"jpeg", "image/jpeg")).await.unwrap();
    assert!(app.error().is_some());

    app.reset().unwrap();
    assert_eq!(app.state(), AppState::Landing);
    assert!(app.error().is_none());
    assert!(app.result().is_none());
    assert!(app.image().is_none());
}

#[tokio::test]
async fn test_reset_from_result_is_idempotent() {
    let dir = tempdir().unwrap();
    let mut app = replay_app(dir.path());
    app.start().unwrap();
    app.select_image(EncodedImage::from_bytes(b"jpeg", "image/jpeg")).await.unwrap();
    assert_eq!(app.state(), AppState::Result);

    for _ in 0..2 {
        app.reset().unwrap();
        assert_eq!(app.state(), AppState::Landing);
        assert!(app.result().is_none());
        assert!(app.image().is_none());
        assert!(app.error().is_none());
    }
}

#[tokio::test]
async fn test_dropped_non_image_changes_nothing() {
    let dir = tempdir().unwrap();
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, "not a photo").unwrap();

    let mut app = replay_app(dir.path());
    app.start().unwrap();

    let state = app.accept_file(ImageSource::Drop, Some(&notes)).await.unwrap();
    assert_eq!(state, AppState::Uploading);
    assert!(app.error().is_none());
    assert!(app.image().is_none());
}

/// 先頭が "P1 " のテキストも画像扱いしない
#[tokio::test]
async fn test_dropped_text_with_image_signature_changes_nothing() {
    let dir = tempdir().unwrap();
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, "P1 water the ficus on monday\n").unwrap();

    let mut app = replay_app(dir.path());
    app.start().unwrap();

    let state = app.accept_file(ImageSource::Drop, Some(&notes)).await.unwrap();
    assert_eq!(state, AppState::Uploading);
    assert!(app.image().is_none());
    assert!(app.result().is_none());
}

#[tokio::test]
async fn test_missing_file_is_reported_without_state_change() {
    let dir = tempdir().unwrap();
    let mut app = replay_app(dir.path());
    app.start().unwrap();

    let err = app
        .accept_file(ImageSource::Camera, Some(&dir.path().join("missing.jpg")))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "file_not_found");
    assert_eq!(app.state(), AppState::Uploading);
    assert!(app.error().is_none());
}
