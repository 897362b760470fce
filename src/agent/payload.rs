use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use image::{ColorType, DynamicImage, codecs::jpeg::JpegEncoder, imageops::FilterType};

use crate::agent::error::AgentError;

pub const MAX_IMAGE_DIMENSION: u32 = 1024;
pub const JPEG_QUALITY: u8 = 60;
pub const IMAGE_MIME_TYPE: &str = "image/jpeg";

/// Screenshot as it goes on the wire.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub base64: String,
    pub width: u32,
    pub height: u32,
    pub jpeg_bytes: usize,
}

/// Downscale only when a side exceeds `max_dimension`; aspect ratio is kept
/// and the larger side lands exactly on the cap.
pub fn fit_within(image: DynamicImage, max_dimension: u32) -> DynamicImage {
    if image.width() <= max_dimension && image.height() <= max_dimension {
        return image;
    }
    image.resize(max_dimension, max_dimension, FilterType::Triangle)
}

pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, AgentError> {
    let rgb = image.to_rgb8();
    let mut buf = Vec::new();

    JpegEncoder::new_with_quality(&mut buf, quality)
        .encode(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)
        .map_err(|e| AgentError::Image(format!("JPEG encoding failed: {}", e)))?;

    Ok(buf)
}

/// Decode, bound, compress and base64 a screenshot for the model request.
pub fn prepare_image(bytes: &[u8], max_dimension: u32, quality: u8) -> Result<EncodedImage, AgentError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| AgentError::Image(format!("screenshot decode failed: {}", e)))?;

    let fitted = fit_within(decoded, max_dimension);
    let jpeg = encode_jpeg(&fitted, quality)?;

    Ok(EncodedImage {
        base64: BASE64.encode(&jpeg),
        width: fitted.width(),
        height: fitted.height(),
        jpeg_bytes: jpeg.len(),
    })
}
