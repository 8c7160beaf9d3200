//! End-to-end pipeline tests with stub recognition engines.

use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use snapform::core::{FormOcrConfig, OcrError, ParallelPolicy};
use snapform::domain::{BoundingBox, FieldKind, ImageStatus, RawImage, TextSpan};
use snapform::engine::TextEngine;
use snapform::pipeline::FormOcr;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

fn make_png(width: u32, height: u32) -> Vec<u8> {
    let img = GrayImage::from_pixel(width, height, Luma([255]));
    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn span(text: &str, confidence: f32) -> TextSpan {
    TextSpan::new(text, confidence, BoundingBox::from_coords(0.0, 0.0, 10.0, 10.0))
}

/// Returns scripted spans keyed by image width, empty spans for unknown
/// widths.
struct ScriptedEngine {
    by_width: HashMap<u32, Vec<TextSpan>>,
}

impl ScriptedEngine {
    fn new(by_width: HashMap<u32, Vec<TextSpan>>) -> Self {
        Self { by_width }
    }

    fn empty() -> Self {
        Self::new(HashMap::new())
    }
}

impl TextEngine for ScriptedEngine {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn recognize(&self, image: &GrayImage) -> Result<Vec<TextSpan>, OcrError> {
        Ok(self.by_width.get(&image.width()).cloned().unwrap_or_default())
    }
}

/// Always reports the backend as unusable.
struct FailingEngine;

impl TextEngine for FailingEngine {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn recognize(&self, _image: &GrayImage) -> Result<Vec<TextSpan>, OcrError> {
        Err(OcrError::recognizer_unavailable("model data missing"))
    }
}

#[test]
fn batch_preserves_order_and_isolates_bad_images() {
    let mut by_width = HashMap::new();
    by_width.insert(10, vec![span("alpha", 0.9)]);
    by_width.insert(20, vec![span("charlie", 0.9)]);
    let pipeline = FormOcr::new(Arc::new(ScriptedEngine::new(by_width)));

    let images = vec![
        RawImage::new("a.png", make_png(10, 10)),
        RawImage::new("b.png", b"not an image".to_vec()),
        RawImage::new("c.png", make_png(20, 20)),
    ];
    let batch = pipeline.process_batch(&images).unwrap();

    assert_eq!(batch.len(), 3);
    assert_eq!(batch.succeeded, 2);
    assert_eq!(batch.failed, 1);

    assert_eq!(&*batch.results[0].source_id, "a.png");
    assert_eq!(&*batch.results[1].source_id, "b.png");
    assert_eq!(&*batch.results[2].source_id, "c.png");

    assert!(batch.results[0].status.is_success());
    assert!(matches!(batch.results[1].status, ImageStatus::Failed { .. }));
    assert!(batch.results[2].status.is_success());
    assert_eq!(&*batch.results[2].raw_text[0].text, "charlie");
}

#[test]
fn recognized_email_becomes_a_typed_field() {
    let mut by_width = HashMap::new();
    by_width.insert(10, vec![span("john@example.com", 0.91)]);
    let pipeline = FormOcr::new(Arc::new(ScriptedEngine::new(by_width)));

    let result = pipeline
        .process_image(&RawImage::new("form.png", make_png(10, 10)))
        .unwrap();

    let email = result.fields.get(&FieldKind::Email).expect("email field");
    assert_eq!(email.value, "john@example.com");
    assert_eq!(email.confidence, 0.91);
    assert!((result.overall_confidence - 0.91).abs() < 1e-6);
}

#[test]
fn blank_image_succeeds_with_empty_output() {
    let pipeline = FormOcr::new(Arc::new(ScriptedEngine::empty()));

    let result = pipeline
        .process_image(&RawImage::new("blank.png", make_png(10, 10)))
        .unwrap();

    assert!(result.status.is_success());
    assert!(result.raw_text.is_empty());
    assert!(result.fields.is_empty());
    assert_eq!(result.overall_confidence, 0.0);
}

#[test]
fn unusable_engine_aborts_the_whole_batch() {
    let pipeline = FormOcr::new(Arc::new(FailingEngine));

    let images = vec![
        RawImage::new("a.png", make_png(10, 10)),
        RawImage::new("b.png", make_png(20, 20)),
    ];
    let err = pipeline.process_batch(&images).unwrap_err();
    assert!(err.is_batch_fatal());
}

#[test]
fn expired_batch_deadline_fails_remaining_images() {
    let config = FormOcrConfig::new().with_batch_timeout(Some(Duration::ZERO));
    let pipeline = FormOcr::with_config(Arc::new(ScriptedEngine::empty()), config).unwrap();

    let images = vec![
        RawImage::new("a.png", make_png(10, 10)),
        RawImage::new("b.png", make_png(20, 20)),
    ];
    let batch = pipeline.process_batch(&images).unwrap();

    assert_eq!(batch.failed, 2);
    for result in &batch.results {
        match &result.status {
            ImageStatus::Failed { reason } => assert!(reason.contains("timeout")),
            ImageStatus::Success => panic!("expected timeout failure"),
        }
    }
}

#[test]
fn parallel_batches_keep_submission_order() {
    let mut by_width = HashMap::new();
    for width in 1..=16u32 {
        by_width.insert(width, vec![span(&format!("image {width}"), 0.9)]);
    }
    let config = FormOcrConfig::new().with_parallel(
        ParallelPolicy::new()
            .with_max_threads(Some(4))
            .with_image_threshold(1),
    );
    let pipeline = FormOcr::with_config(Arc::new(ScriptedEngine::new(by_width)), config).unwrap();

    let images: Vec<RawImage> = (1..=16u32)
        .map(|w| RawImage::new(format!("{w}.png"), make_png(w, 10)))
        .collect();
    let batch = pipeline.process_batch(&images).unwrap();

    assert_eq!(batch.succeeded, 16);
    for (i, result) in batch.results.iter().enumerate() {
        let width = i as u32 + 1;
        assert_eq!(&*result.source_id, format!("{width}.png"));
        assert_eq!(&*result.raw_text[0].text, format!("image {width}"));
    }
}

#[test]
fn report_schema_matches_wire_format() {
    let mut by_width = HashMap::new();
    by_width.insert(
        10,
        vec![span("Name: Jane Doe", 0.8), span("jane@doe.io", 0.95)],
    );
    let pipeline = FormOcr::new(Arc::new(ScriptedEngine::new(by_width)));

    let images = vec![
        RawImage::new("form.png", make_png(10, 10)),
        RawImage::new("junk.bin", b"garbage".to_vec()),
    ];
    let batch = pipeline.process_batch(&images).unwrap();
    let json = serde_json::to_value(batch.to_report()).unwrap();

    assert_eq!(json["succeeded"], 1);
    assert_eq!(json["failed"], 1);

    let ok = &json["results"][0];
    assert_eq!(ok["filename"], "form.png");
    assert_eq!(ok["status"], "success");
    assert_eq!(ok["fields"]["email"], "jane@doe.io");
    assert_eq!(ok["fields"]["name"], "Jane Doe");
    assert_eq!(ok["raw_text"][0], "Name: Jane Doe");
    assert!(ok["confidence"].as_f64().unwrap() > 0.8);
    assert!(ok.get("error").is_none());

    let bad = &json["results"][1];
    assert_eq!(bad["status"], "failed");
    assert!(bad["error"].as_str().unwrap().contains("junk.bin"));
}

#[test]
fn stats_accumulate_across_batches() {
    let pipeline = FormOcr::new(Arc::new(ScriptedEngine::empty()));

    pipeline
        .process_batch(&[RawImage::new("a.png", make_png(10, 10))])
        .unwrap();
    pipeline
        .process_batch(&[
            RawImage::new("b.png", make_png(10, 10)),
            RawImage::new("c.bin", b"oops".to_vec()),
        ])
        .unwrap();

    let stats = pipeline.stats();
    assert_eq!(stats.total_processed, 3);
    assert_eq!(stats.succeeded, 2);
    assert_eq!(stats.failed, 1);

    pipeline.reset_stats();
    assert_eq!(pipeline.stats().total_processed, 0);
}

#[test]
fn overlapping_matches_resolve_by_field_priority() {
    let mut by_width = HashMap::new();
    by_width.insert(
        10,
        vec![span("Order #20231015 due $45.00", 0.85)],
    );
    let pipeline = FormOcr::new(Arc::new(ScriptedEngine::new(by_width)));

    let result = pipeline
        .process_image(&RawImage::new("invoice.png", make_png(10, 10)))
        .unwrap();

    assert!(!result.fields.contains_key(&FieldKind::Date));
    assert_eq!(result.fields[&FieldKind::IdNumber].value, "20231015");
    assert_eq!(result.fields[&FieldKind::Amount].value, "$45.00");
}
