use std::io::Cursor;

use async_trait::async_trait;
use image::{ImageError, ImageReader};
use serde::Serialize;

use crate::error::SizeError;

/// Natural pixel size of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Loads an image off-document and reports its natural size.
#[async_trait]
pub trait ThumbnailSizer: Send + Sync {
    async fn size_of(&self, url: &str) -> Result<Dimensions, SizeError>;
}

/// Downloads the whole thumbnail, then decodes only its header for the size.
#[derive(Debug, Clone)]
pub struct HttpSizer {
    http: reqwest::Client,
}

impl HttpSizer {
    pub fn new(http: reqwest::Client) -> Self { Self { http } }
}

#[async_trait]
impl ThumbnailSizer for HttpSizer {
    async fn size_of(&self, url: &str) -> Result<Dimensions, SizeError> {
        let bytes = self.http.get(url).send().await?.error_for_status()?.bytes().await?;
        let dims = measure(&bytes)?;
        tracing::debug!(url, width = dims.width, height = dims.height, "thumbnail measured");
        Ok(dims)
    }
}

pub fn measure(bytes: &[u8]) -> Result<Dimensions, SizeError> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format().map_err(ImageError::IoError)?;
    let (width, height) = reader.into_dimensions()?;
    if width == 0 || height == 0 { return Err(SizeError::Empty); }
    Ok(Dimensions { width, height })
}

#[cfg(test)]
pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::new(width, height);
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}
