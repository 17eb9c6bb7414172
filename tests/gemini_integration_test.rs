//! 実APIを使う統合テスト（GEMINI_API_KEY が無ければスキップ）

use plant_doctor::config::Config;
use plant_doctor::diagnosis::{DiagnosisProvider, GeminiClient};
use plant_doctor_common::{EncodedImage, Language};
use std::io::Cursor;

#[tokio::test]
async fn gemini_diagnosis_integration() {
    let api_key = match std::env::var("GEMINI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => key,
        _ => {
            eprintln!("GEMINI_API_KEY not set; skipping integration test");
            return;
        }
    };

    let img = image::RgbImage::from_fn(64, 64, |x, y| {
        if (x / 8 + y / 8) % 2 == 0 {
            image::Rgb([40, 140, 50])
        } else {
            image::Rgb([120, 90, 40])
        }
    });
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Jpeg)
        .expect("encode failed");

    let config = Config {
        language: Language::English,
        timeout_seconds: Some(60),
        ..Default::default()
    };
    let client = GeminiClient::from_config(&config)
        .expect("client build failed")
        .with_api_key(Some(api_key));

    let result = client
        .analyze(&EncodedImage::from_bytes(&bytes, "image/jpeg"))
        .await
        .expect("diagnosis failed");

    assert!(!result.disease_name().is_empty());
    assert!(!result.confidence().is_empty());
    assert!(!result.timestamp().is_empty());
}
