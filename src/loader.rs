//! Comic image loader
//!
//! Downloads the image, decodes it, and immediately downscales to display
//! resolution so the big decoded buffer is dropped right away. The retained
//! image is at most 740×700 RGBA. Delivery is fire-and-forget: on failure
//! the controller hears nothing and keeps whatever image it was showing.

use egui::{ColorImage, Context};
use image::imageops::FilterType;
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Maximum retained display dimensions.
pub const MAX_DISPLAY_WIDTH: u32 = 740;
pub const MAX_DISPLAY_HEIGHT: u32 = 700;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("download error: {0}")]
    Download(#[from] reqwest::Error),
    #[error("decode error: {0}")]
    Decode(#[from] image::ImageError),
}

/// Calculate dimensions that fit within max_w × max_h while preserving
/// aspect ratio. Images already within bounds keep their size.
pub fn fit_dimensions(w: u32, h: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    if w <= max_w && h <= max_h {
        return (w, h);
    }

    let scale_x = max_w as f64 / w as f64;
    let scale_y = max_h as f64 / h as f64;
    let scale = scale_x.min(scale_y);

    let new_w = (w as f64 * scale).round() as u32;
    let new_h = (h as f64 * scale).round() as u32;

    (new_w.max(1), new_h.max(1))
}

/// Download and decode one image, returning it ready for texture upload.
/// Blocking; callers run this off the UI thread.
pub fn load_image(
    client: &reqwest::blocking::Client,
    url: &str,
) -> Result<ColorImage, LoadError> {
    let bytes = client.get(url).send()?.error_for_status()?.bytes()?;
    let decoded = image::load_from_memory(&bytes)?;

    let (w, h) = (decoded.width(), decoded.height());
    let (disp_w, disp_h) = fit_dimensions(w, h, MAX_DISPLAY_WIDTH, MAX_DISPLAY_HEIGHT);
    let resized = if disp_w < w || disp_h < h {
        decoded.resize_exact(disp_w, disp_h, FilterType::Triangle)
        // the full-size decode is dropped here
    } else {
        decoded
    };

    let rgba = resized.to_rgba8();
    let (out_w, out_h) = rgba.dimensions();
    Ok(ColorImage::from_rgba_unmultiplied(
        [out_w as usize, out_h as usize],
        rgba.as_raw(),
    ))
}

/// Run an image load on a worker thread, delivering the decoded image over
/// `tx`. Failures are logged and swallowed; the prior image stays on screen.
pub fn spawn_load(url: String, tx: Sender<ColorImage>, ctx: Context) {
    std::thread::spawn(move || {
        let client = reqwest::blocking::Client::new();
        match load_image(&client, &url) {
            Ok(img) => {
                let _ = tx.send(img);
                ctx.request_repaint();
            }
            Err(e) => log::warn!("could not load image {}: {}", url, e),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_small_image_unchanged() {
        assert_eq!(fit_dimensions(300, 200, 740, 700), (300, 200));
    }

    #[test]
    fn test_fit_wide_image_scales_by_width() {
        let (w, h) = fit_dimensions(1480, 700, 740, 700);
        assert_eq!(w, 740);
        assert_eq!(h, 350);
    }

    #[test]
    fn test_fit_tall_image_scales_by_height() {
        let (w, h) = fit_dimensions(700, 1400, 740, 700);
        assert_eq!(w, 350);
        assert_eq!(h, 700);
    }

    #[test]
    fn test_fit_never_returns_zero() {
        let (w, h) = fit_dimensions(10000, 1, 740, 700);
        assert!(w >= 1 && h >= 1);
    }

    #[test]
    fn test_decode_png_bytes_into_color_image() {
        // 2x1 white PNG, encoded in-process so the test carries no fixture.
        let mut png = Vec::new();
        let img = image::RgbaImage::from_pixel(2, 1, image::Rgba([255, 255, 255, 255]));
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let decoded = image::load_from_memory(&png).unwrap();
        let rgba = decoded.to_rgba8();
        let color = ColorImage::from_rgba_unmultiplied([2, 1], rgba.as_raw());
        assert_eq!(color.size, [2, 1]);
        assert_eq!(color.pixels[0], egui::Color32::WHITE);
    }
}
