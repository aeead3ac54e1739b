use image::GrayImage;

use crate::edges::{detect_edges, EdgeMask, Thresholds};

/// Emitted by the side panel when either slider moved this frame.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ThresholdChanged {
    pub low: u32,
    pub high: u32,
}

/// Owns the preprocessed canvas and the mask derived from it.
///
/// Every applied change recomputes the whole mask; there is no queue or
/// debounce, so the last change in a frame wins.
pub struct EdgePreview {
    source: GrayImage,
    thresholds: Thresholds,
    mask: EdgeMask,
    generation: u64,
}

impl EdgePreview {
    pub fn new(source: GrayImage, thresholds: Thresholds) -> Self {
        let mask = detect_edges(&source, thresholds);
        log::debug!("Initial edge mask: {} edge pixels", mask.count());
        Self {
            source,
            thresholds,
            mask,
            generation: 0,
        }
    }

    pub fn apply(&mut self, event: ThresholdChanged) -> &EdgeMask {
        self.thresholds = Thresholds::new(event.low, event.high);
        self.mask = detect_edges(&self.source, self.thresholds);
        self.generation += 1;
        log::debug!(
            "Thresholds low={} high={}: {} edge pixels",
            self.thresholds.low,
            self.thresholds.high,
            self.mask.count()
        );
        &self.mask
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn mask(&self) -> &EdgeMask {
        &self.mask
    }

    pub fn source(&self) -> &GrayImage {
        &self.source
    }

    /// Number of recomputations since construction.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
