//! Image preparation before upload: decode whatever the user picked and
//! re-encode it as JPEG.

use std::io::Cursor;

use futures::future::join_all;
use image::codecs::jpeg::JpegEncoder;
use thiserror::Error;

use crate::domain::image::ImageSource;

/// JPEG quality used for every uploaded product image.
pub const JPEG_QUALITY: u8 = 85;

/// Content type of encoded images.
pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";

#[derive(Debug, Error)]
pub enum ImageEncodeError {
    #[error("failed to read image: {0}")]
    Read(#[from] std::io::Error),
    #[error("invalid image: {0}")]
    Decode(image::ImageError),
    #[error("image compression failed: {0}")]
    Encode(image::ImageError),
    #[error("image worker stopped: {0}")]
    Worker(String),
}

/// Decode the source and compress it to JPEG at [`JPEG_QUALITY`].
pub fn encode_jpeg(source: &ImageSource) -> Result<Vec<u8>, ImageEncodeError> {
    let data = source.load()?;
    let img = image::load_from_memory(&data).map_err(ImageEncodeError::Decode)?;

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb_img = img.to_rgb8();
        let encoder = JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb_img
            .write_with_encoder(encoder)
            .map_err(ImageEncodeError::Encode)?;
    }

    Ok(buffer)
}

/// Encode every source on the blocking thread pool.
///
/// Buffers come back in the order of `sources`. On failure the lowest failing
/// index is reported.
pub async fn encode_all(
    sources: Vec<ImageSource>,
) -> Result<Vec<Vec<u8>>, (usize, ImageEncodeError)> {
    let tasks = sources
        .into_iter()
        .map(|source| tokio::task::spawn_blocking(move || encode_jpeg(&source)));

    join_all(tasks)
        .await
        .into_iter()
        .enumerate()
        .map(|(index, joined)| {
            joined
                .map_err(|e| ImageEncodeError::Worker(e.to_string()))
                .and_then(|encoded| encoded)
                .map_err(|e| (index, e))
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::Cursor;

    use image::{ImageFormat, Rgb, RgbImage};

    /// A small PNG with a gradient, enough for the encoder to do real work.
    pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 8) as u8, (y * 8) as u8, 128])
        });
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }
}
