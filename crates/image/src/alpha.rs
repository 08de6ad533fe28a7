//! Alpha channel handling for formats that cannot store transparency.

use image::{DynamicImage, GenericImageView, ImageBuffer, Rgb};

/// Background a canvas uses when a transparent bitmap is exported as JPEG.
pub const CANVAS_JPEG_BACKGROUND: [u8; 3] = [0, 0, 0];

/// Check whether the image has an alpha channel.
pub fn has_alpha_channel(img: &DynamicImage) -> bool {
    img.color().has_alpha()
}

/// Composite an image over a solid background, producing RGB8.
pub fn flatten_alpha(img: &DynamicImage, background_color: [u8; 3]) -> DynamicImage {
    if !has_alpha_channel(img) {
        return DynamicImage::ImageRgb8(img.to_rgb8());
    }

    let (width, height) = img.dimensions();
    let rgba_img = img.to_rgba8();

    let mut output = ImageBuffer::new(width, height);

    for (x, y, pixel) in rgba_img.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;

        // Alpha blending: composite over background
        let alpha = a as f32 / 255.0;
        let inv_alpha = 1.0 - alpha;

        let blend = |c: u8, bg: u8| ((c as f32 * alpha) + (bg as f32 * inv_alpha)).round() as u8;

        output.put_pixel(
            x,
            y,
            Rgb([
                blend(r, background_color[0]),
                blend(g, background_color[1]),
                blend(b, background_color[2]),
            ]),
        );
    }

    DynamicImage::ImageRgb8(output)
}
