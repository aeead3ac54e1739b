use std::path::{Path, PathBuf};

use image::{imageops::FilterType, DynamicImage, GrayImage};
use imageproc::filter::box_filter;

use crate::error::{Result, TracerError};

/// Extensions offered by the file picker. Anything `image` can decode still
/// loads when passed on the command line.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tif", "tiff", "webp"];

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct PreprocessParams {
    /// Side of the square canvas every source image is resized to.
    pub canvas_size: u32,
    /// Radius of the box blur applied before edge detection. 1 gives a 3x3 kernel.
    pub blur_radius: u32,
}

impl Default for PreprocessParams {
    fn default() -> Self {
        Self {
            canvas_size: 480,
            blur_radius: 1,
        }
    }
}

/// Picks the image to trace.
///
/// A path given on the command line wins; otherwise a native file dialog is
/// shown. Cancelling the dialog is an input-selection failure.
pub fn select_image_path(cli_path: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = cli_path {
        return Ok(path);
    }

    rfd::FileDialog::new()
        .set_title("Choose an image to trace")
        .add_filter("Image Files", IMAGE_EXTENSIONS)
        .pick_file()
        .ok_or(TracerError::NoFileSelected)
}

/// Decodes the file at `path` and runs it through [`preprocess`].
pub fn load_source(path: &Path, params: &PreprocessParams) -> Result<GrayImage> {
    let source_img = image::open(path).map_err(|source| TracerError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!(
        "Image loaded successfully with dimensions: {}x{}",
        source_img.width(),
        source_img.height()
    );

    Ok(preprocess(&source_img, params))
}

/// Turns an arbitrary decoded image into the blurred grayscale canvas the
/// edge detector runs on.
///
/// # Arguments
/// * `img` - The decoded source image, any color type.
/// * `params` - Canvas size and blur radius.
///
/// # Returns
/// A `canvas_size` x `canvas_size` `GrayImage`. The square is cut from the
/// top-left corner using the smaller dimension, so the right or bottom edge
/// of a non-square image is discarded.
pub fn preprocess(img: &DynamicImage, params: &PreprocessParams) -> GrayImage {
    let crop_size = img.width().min(img.height());
    if crop_size == 0 || params.canvas_size == 0 {
        return GrayImage::new(params.canvas_size, params.canvas_size);
    }

    let square = img.crop_imm(0, 0, crop_size, crop_size);
    let resized = square.resize_exact(params.canvas_size, params.canvas_size, FilterType::Triangle);
    let gray = resized.to_luma8();

    if params.blur_radius == 0 {
        gray
    } else {
        box_filter(&gray, params.blur_radius, params.blur_radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage};

    #[test]
    fn preprocess_produces_square_canvas() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(640, 300, Rgb([10, 200, 30])));
        let out = preprocess(&img, &PreprocessParams::default());
        assert_eq!(out.dimensions(), (480, 480));
    }

    #[test]
    fn crop_is_anchored_at_top_left() {
        // Left 100 columns white, the rest black. The crop keeps columns 0..100
        // of a 300x100 image, so everything should come out white.
        let img = RgbImage::from_fn(300, 100, |x, _| {
            if x < 100 {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        });
        let out = preprocess(&DynamicImage::ImageRgb8(img), &PreprocessParams::default());
        assert!(out.pixels().all(|p| p[0] > 250));
    }

    #[test]
    fn solid_image_stays_solid() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(50, 80, Luma([90])));
        let out = preprocess(&img, &PreprocessParams::default());
        assert!(out.pixels().all(|p| p[0] == 90));
    }

    #[test]
    fn empty_image_yields_black_canvas() {
        let img = DynamicImage::ImageLuma8(GrayImage::new(0, 10));
        let out = preprocess(&img, &PreprocessParams::default());
        assert_eq!(out.dimensions(), (480, 480));
        assert!(out.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn cli_path_skips_dialog() {
        let path = PathBuf::from("picture.png");
        assert_eq!(select_image_path(Some(path.clone())).unwrap(), path);
    }

    #[test]
    fn load_source_reports_undecodable_file() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        std::io::Write::write_all(&mut file, b"definitely not a png").unwrap();

        let err = load_source(file.path(), &PreprocessParams::default()).unwrap_err();
        assert!(matches!(err, TracerError::ImageLoad { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn load_source_decodes_png_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        GrayImage::from_pixel(32, 32, Luma([128])).save(&path).unwrap();

        let out = load_source(&path, &PreprocessParams::default()).unwrap();
        assert_eq!(out.dimensions(), (480, 480));
    }
}
