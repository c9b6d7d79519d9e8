use std::collections::HashMap;

use image::GenericImageView;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::UploadError;

/// A file picked by the user, before upload.
#[derive(Debug, Clone)]
pub struct RawImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// What the upload collaborator hands back: a reference plus pixel dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

pub trait ImageUploader {
    fn upload(&mut self, file: &RawImage) -> Result<UploadedImage, UploadError>;
}

/// Resolves uploads synchronously to transient `blob:local/N` references.
///
/// The bytes stay in memory so a raster backend can draw them before the permanent upload
/// pipeline has replaced the reference.
#[derive(Debug, Default)]
pub struct LocalBlobUploader {
    next: u64,
    blobs: HashMap<String, Vec<u8>>,
}

impl LocalBlobUploader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoded-image resources keyed by reference.
    pub fn resources(&self) -> &HashMap<String, Vec<u8>> {
        &self.blobs
    }

    pub fn get(&self, url: &str) -> Option<&[u8]> {
        self.blobs.get(url).map(Vec::as_slice)
    }
}

impl ImageUploader for LocalBlobUploader {
    fn upload(&mut self, file: &RawImage) -> Result<UploadedImage, UploadError> {
        let decoded =
            image::load_from_memory(&file.bytes).map_err(|source| UploadError::Unreadable {
                name: file.file_name.clone(),
                source,
            })?;
        let (width, height) = decoded.dimensions();

        self.next += 1;
        let url = format!("blob:local/{}", self.next);
        self.blobs.insert(url.clone(), file.bytes.clone());
        debug!(%url, width, height, file = %file.file_name, "Stored local image");

        Ok(UploadedImage { url, width, height })
    }
}

#[cfg(test)]
pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 30, 30, 255]));
    let mut bytes = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("encode png");
    bytes
}
