use image::GrayImage;
use imageproc::edges::canny;

/// Inclusive upper bound of either threshold slider.
pub const THRESHOLD_MAX: u32 = 1000;

// The detector keeps gradients >= threshold, so a zero threshold would mark
// every flat pixel as an edge.
const MIN_GRADIENT: f32 = f32::EPSILON;

/// Canny hysteresis thresholds as the user set them.
///
/// `low` and `high` move independently; nothing keeps `low <= high`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Thresholds {
    pub low: u32,
    pub high: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { low: 50, high: 100 }
    }
}

impl Thresholds {
    pub fn new(low: u32, high: u32) -> Self {
        Self {
            low: low.min(THRESHOLD_MAX),
            high: high.min(THRESHOLD_MAX),
        }
    }

    /// The pair in the order the detector expects: weak edge bound first.
    pub fn ordered(&self) -> (f32, f32) {
        let (weak, strong) = if self.low <= self.high {
            (self.low, self.high)
        } else {
            (self.high, self.low)
        };
        ((weak as f32).max(MIN_GRADIENT), (strong as f32).max(MIN_GRADIENT))
    }
}

/// Binary edge image, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeMask {
    rows: usize,
    cols: usize,
    pixels: Vec<bool>,
}

impl EdgeMask {
    /// An all-unset mask.
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            pixels: vec![false; rows * cols],
        }
    }

    /// Any non-zero pixel counts as an edge.
    pub fn from_gray(image: &GrayImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            rows: height as usize,
            cols: width as usize,
            pixels: image.pixels().map(|p| p[0] != 0).collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Panics when `row` or `col` is outside the mask.
    pub fn get(&self, row: usize, col: usize) -> bool {
        assert!(row < self.rows && col < self.cols, "mask index ({row}, {col}) out of bounds");
        self.pixels[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: bool) {
        assert!(row < self.rows && col < self.cols, "mask index ({row}, {col}) out of bounds");
        self.pixels[row * self.cols + col] = value;
    }

    pub fn count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.pixels.iter().any(|&p| p)
    }

    /// White edges on black, ready to upload as an egui texture.
    pub fn to_color_image(&self) -> egui::ColorImage {
        egui::ColorImage {
            size: [self.cols, self.rows],
            pixels: self
                .pixels
                .iter()
                .map(|&p| if p { egui::Color32::WHITE } else { egui::Color32::BLACK })
                .collect(),
        }
    }
}

/// Runs Canny edge detection over the preprocessed canvas.
///
/// An inverted pair (`low > high`) is swapped before detection rather than
/// rejected, so every slider position produces a mask.
pub fn detect_edges(image: &GrayImage, thresholds: Thresholds) -> EdgeMask {
    let (weak, strong) = thresholds.ordered();
    EdgeMask::from_gray(&canny(image, weak, strong))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn split_image() -> GrayImage {
        GrayImage::from_fn(64, 64, |x, _| if x < 32 { Luma([0]) } else { Luma([255]) })
    }

    #[test]
    fn solid_image_has_no_edges() {
        let img = GrayImage::from_pixel(480, 480, Luma([200]));
        let pairs = [
            Thresholds::new(0, 0),
            Thresholds::new(300, 0),
            Thresholds::default(),
            Thresholds::new(1000, 1000),
        ];
        for t in pairs {
            let mask = detect_edges(&img, t);
            assert!(mask.is_empty(), "edges found at {t:?}");
        }
    }

    #[test]
    fn step_produces_vertical_edge() {
        let mask = detect_edges(&split_image(), Thresholds::default());
        assert_eq!((mask.rows(), mask.cols()), (64, 64));
        assert!(!mask.is_empty());

        // All edge pixels hug the intensity step.
        for row in 0..mask.rows() {
            for col in 0..mask.cols() {
                if mask.get(row, col) {
                    assert!((29..=34).contains(&col), "stray edge at column {col}");
                }
            }
        }
    }

    #[test]
    fn detection_is_deterministic() {
        let img = split_image();
        let t = Thresholds::new(20, 300);
        assert_eq!(detect_edges(&img, t), detect_edges(&img, t));
    }

    #[test]
    fn inverted_thresholds_match_ordered_ones() {
        let img = split_image();
        assert_eq!(
            detect_edges(&img, Thresholds::new(300, 20)),
            detect_edges(&img, Thresholds::new(20, 300))
        );
    }

    #[test]
    fn thresholds_are_clamped_to_slider_range() {
        assert_eq!(Thresholds::new(5000, 7), Thresholds { low: 1000, high: 7 });
        assert_eq!(Thresholds::new(5000, 7).ordered(), (7.0, 1000.0));
    }

    #[test]
    fn color_image_matches_mask_layout() {
        let mut mask = EdgeMask::empty(2, 3);
        mask.set(1, 2, true);
        let img = mask.to_color_image();
        assert_eq!(img.size, [3, 2]);
        assert_eq!(img.pixels[5], egui::Color32::WHITE);
        assert_eq!(img.pixels[0], egui::Color32::BLACK);
        assert_eq!(mask.count(), 1);
    }
}
