//! Recognition wrapper applying confidence filtering and retry policy.

use crate::core::OcrError;
use crate::domain::{mean_confidence, TextSpan};
use crate::engine::TextEngine;
use crate::utils::decode_gray;
use crate::{core::FormOcrConfig, domain::RawImage};
use image::GrayImage;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Runs the text engine with a low-confidence retry against the original
/// image.
///
/// Enhancement helps most scans but can destroy thin strokes on clean
/// photos. When recognition of the enhanced image comes back empty or with
/// a mean confidence below the retry threshold, the recognizer runs the
/// engine once more on the unenhanced grayscale image and keeps whichever
/// attempt read more.
pub(crate) struct TextRecognizer {
    engine: Arc<dyn TextEngine>,
    /// Present when the engine must not be called concurrently.
    guard: Option<Mutex<()>>,
    retry_threshold: f32,
    confidence_floor: f32,
}

impl TextRecognizer {
    pub(crate) fn new(engine: Arc<dyn TextEngine>, config: &FormOcrConfig) -> Self {
        Self {
            engine,
            guard: config.serialize_engine.then(|| Mutex::new(())),
            retry_threshold: config.retry_threshold,
            confidence_floor: config.confidence_floor,
        }
    }

    /// Recognizes text in the enhanced image, retrying on the original
    /// when the first pass reads poorly.
    pub(crate) fn recognize(
        &self,
        enhanced: &GrayImage,
        original: &RawImage,
    ) -> Result<Vec<TextSpan>, OcrError> {
        let first = self.run_engine(enhanced)?;
        let first_mean = mean_confidence(&first);
        if !first.is_empty() && first_mean >= self.retry_threshold {
            return Ok(first);
        }

        debug!(
            source_id = %original.source_id,
            spans = first.len(),
            mean_confidence = first_mean,
            "enhanced pass read poorly, retrying on original image"
        );
        let plain = decode_gray(original)?;
        let second = self.run_engine(&plain)?;

        Ok(self.pick_attempt(first, second))
    }

    fn run_engine(&self, image: &GrayImage) -> Result<Vec<TextSpan>, OcrError> {
        let _lock = match &self.guard {
            Some(guard) => Some(guard.lock().map_err(|_| {
                OcrError::recognizer_unavailable("engine guard poisoned by a previous panic")
            })?),
            None => None,
        };
        let spans = self.engine.recognize(image)?;
        Ok(spans
            .into_iter()
            .filter(|span| span.has_text() && span.confidence >= self.confidence_floor)
            .collect())
    }

    /// Prefers the attempt that read more spans; on a tie, the one with the
    /// higher mean confidence.
    fn pick_attempt(&self, first: Vec<TextSpan>, second: Vec<TextSpan>) -> Vec<TextSpan> {
        if second.len() > first.len() {
            return second;
        }
        if second.len() == first.len() && mean_confidence(&second) > mean_confidence(&first) {
            return second;
        }
        first
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BoundingBox;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn span(text: &str, confidence: f32) -> TextSpan {
        TextSpan::new(text, confidence, BoundingBox::from_coords(0.0, 0.0, 1.0, 1.0))
    }

    /// Returns a different scripted result on each call.
    struct ScriptedEngine {
        calls: AtomicUsize,
        script: Vec<Vec<TextSpan>>,
    }

    impl ScriptedEngine {
        fn new(script: Vec<Vec<TextSpan>>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                script,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl TextEngine for ScriptedEngine {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn recognize(&self, _image: &GrayImage) -> Result<Vec<TextSpan>, OcrError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.script.get(call).cloned().unwrap_or_default())
        }
    }

    fn raw_png() -> RawImage {
        use image::{DynamicImage, ImageFormat};
        use std::io::Cursor;

        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 8, image::Luma([255u8])))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        RawImage::new("test.png", bytes)
    }

    fn recognizer(engine: Arc<dyn TextEngine>) -> TextRecognizer {
        TextRecognizer::new(engine, &FormOcrConfig::default())
    }

    #[test]
    fn confident_first_pass_skips_retry() {
        let engine = Arc::new(ScriptedEngine::new(vec![
            vec![span("hello", 0.9)],
            vec![span("should not run", 0.99)],
        ]));
        let rec = recognizer(engine.clone());

        let spans = rec
            .recognize(&GrayImage::from_pixel(8, 8, image::Luma([255u8])), &raw_png())
            .unwrap();

        assert_eq!(spans.len(), 1);
        assert_eq!(&*spans[0].text, "hello");
        assert_eq!(engine.call_count(), 1);
    }

    #[test]
    fn low_confidence_first_pass_retries_and_keeps_better_attempt() {
        let engine = Arc::new(ScriptedEngine::new(vec![
            vec![span("blur", 0.3)],
            vec![span("crisp", 0.8), span("text", 0.7)],
        ]));
        let rec = recognizer(engine.clone());

        let spans = rec
            .recognize(&GrayImage::from_pixel(8, 8, image::Luma([255u8])), &raw_png())
            .unwrap();

        assert_eq!(engine.call_count(), 2);
        assert_eq!(spans.len(), 2);
        assert_eq!(&*spans[0].text, "crisp");
    }

    #[test]
    fn retry_that_reads_worse_keeps_first_attempt() {
        let engine = Arc::new(ScriptedEngine::new(vec![
            vec![span("faint", 0.4)],
            vec![],
        ]));
        let rec = recognizer(engine.clone());

        let spans = rec
            .recognize(&GrayImage::from_pixel(8, 8, image::Luma([255u8])), &raw_png())
            .unwrap();

        assert_eq!(engine.call_count(), 2);
        assert_eq!(spans.len(), 1);
        assert_eq!(&*spans[0].text, "faint");
    }

    #[test]
    fn spans_below_floor_are_dropped() {
        let engine = Arc::new(ScriptedEngine::new(vec![
            vec![span("keep", 0.9), span("noise", 0.1)],
        ]));
        let rec = recognizer(engine);

        let spans = rec
            .recognize(&GrayImage::from_pixel(8, 8, image::Luma([255u8])), &raw_png())
            .unwrap();

        assert_eq!(spans.len(), 1);
        assert_eq!(&*spans[0].text, "keep");
    }
}
