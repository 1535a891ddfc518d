//! Image cleanup applied before OCR: greyscale, fixed-threshold binarisation,
//! then a smoothing and a sharpening 3x3 convolution.

use std::path::Path;

use image::{imageops, DynamicImage, GrayImage, Luma};

use super::interface::OcrError;

const SMOOTH_KERNEL: [f32; 9] = [1.0, 1.0, 1.0, 1.0, 5.0, 1.0, 1.0, 1.0, 1.0];
const SHARPEN_KERNEL: [f32; 9] = [-2.0, -2.0, -2.0, -2.0, 32.0, -2.0, -2.0, -2.0, -2.0];

pub fn load_image(path: &Path) -> Result<DynamicImage, OcrError> {
    Ok(image::open(path)?)
}

pub fn preprocess(image: &DynamicImage, threshold: u8) -> GrayImage {
    let gray = image.to_luma8();
    let binary = binarize(&gray, threshold);
    let smoothed = convolve(&binary, &SMOOTH_KERNEL);
    convolve(&smoothed, &SHARPEN_KERNEL)
}

/// Pixels strictly brighter than `threshold` become white, the rest black.
pub fn binarize(image: &GrayImage, threshold: u8) -> GrayImage {
    let mut out = image.clone();
    for Luma([value]) in out.pixels_mut() {
        *value = if *value > threshold { 255 } else { 0 };
    }
    out
}

/// 3x3 convolution normalised by the kernel sum. Edge pixels are copied
/// through unfiltered.
fn convolve(image: &GrayImage, kernel: &[f32; 9]) -> GrayImage {
    let (width, height) = image.dimensions();
    if width < 3 || height < 3 {
        return image.clone();
    }

    let mut out: GrayImage = imageops::filter3x3(image, kernel);
    for x in 0..width {
        out.put_pixel(x, 0, *image.get_pixel(x, 0));
        out.put_pixel(x, height - 1, *image.get_pixel(x, height - 1));
    }
    for y in 0..height {
        out.put_pixel(0, y, *image.get_pixel(0, y));
        out.put_pixel(width - 1, y, *image.get_pixel(width - 1, y));
    }
    out
}
