use image::{DynamicImage, codecs::jpeg::JpegEncoder, imageops::FilterType};
use tracing::{debug, warn};

use super::orientation::{OrientationReading, Rotation, read_orientation};

/// Widest raster embedded into a report page, in pixels.
pub const EMBED_MAX_WIDTH_PX: u32 = 1600;

const EMBED_JPEG_QUALITY: u8 = 85;

/// Upright, size-capped photo ready to be placed on a page as a DCT image.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub width_px: u32,
    pub height_px: u32,
    pub rotation: Rotation,
    pub jpeg: Vec<u8>,
}

impl NormalizedImage {
    pub fn aspect_ratio(&self) -> f32 {
        self.height_px as f32 / self.width_px as f32
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("Invalid or corrupted image data: {0}")]
    Decode(image::ImageError),
    #[error("JPEG encoding failed: {0}")]
    Encode(image::ImageError),
    #[error("Image has no pixels")]
    Empty,
}

/// Decodes an uploaded photo, applies its EXIF orientation and prepares it for embedding.
///
/// Orientation metadata is optional: a photo without it, or with a tag that
/// cannot be read, is embedded as decoded.
pub fn normalize(raw: &[u8]) -> Result<NormalizedImage, NormalizeError> {
    let reading = read_orientation(raw);
    if let OrientationReading::Unreadable(reason) = &reading {
        warn!("EXIF orientation unreadable, embedding unrotated: {}", reason);
    }
    let rotation = Rotation::for_reading(&reading);

    let decoded = image::load_from_memory(raw).map_err(NormalizeError::Decode)?;
    let upright = rotation.apply(decoded);
    let resized = cap_width(upright, EMBED_MAX_WIDTH_PX);

    if resized.width() == 0 || resized.height() == 0 {
        return Err(NormalizeError::Empty);
    }

    let jpeg = encode_jpeg(&resized)?;
    debug!(
        width = resized.width(),
        height = resized.height(),
        rotation = rotation.degrees(),
        bytes = jpeg.len(),
        "Normalized photo"
    );

    Ok(NormalizedImage {
        width_px: resized.width(),
        height_px: resized.height(),
        rotation,
        jpeg,
    })
}

/// Loads a raster that is already upright, such as the branding logo.
pub fn prepare_unrotated(raw: &[u8]) -> Result<NormalizedImage, NormalizeError> {
    let decoded = image::load_from_memory(raw).map_err(NormalizeError::Decode)?;
    let decoded = cap_width(decoded, EMBED_MAX_WIDTH_PX);
    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(NormalizeError::Empty);
    }
    let jpeg = encode_jpeg(&decoded)?;
    Ok(NormalizedImage {
        width_px: decoded.width(),
        height_px: decoded.height(),
        rotation: Rotation::Identity,
        jpeg,
    })
}

fn cap_width(img: DynamicImage, max_width: u32) -> DynamicImage {
    if img.width() > max_width {
        img.resize(max_width, u32::MAX, FilterType::Triangle)
    } else {
        img
    }
}

fn encode_jpeg(img: &DynamicImage) -> Result<Vec<u8>, NormalizeError> {
    let rgb = flatten_onto_white(img);
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, EMBED_JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(NormalizeError::Encode)?;
    Ok(buffer)
}

/// Drops alpha by compositing over white, so transparent logos don't turn black.
fn flatten_onto_white(img: &DynamicImage) -> image::RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }
    let rgba = img.to_rgba8();
    image::RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let blend = |c: u8| ((c as u16 * a as u16 + 255 * (255 - a as u16)) / 255) as u8;
        image::Rgb([blend(r), blend(g), blend(b)])
    })
}
