//! The drawable surface the rendered image is painted onto.
//!
//! Exports read pixels back from here rather than from the data URL, so what gets saved or
//! copied is always the last frame drawn.

use std::io::Cursor;

use image::{ImageFormat, RgbaImage};
use tracing::{debug, error};

use crate::capability::Blob;
use crate::data_url::DataUrl;
use crate::error::{Error, Result};

pub const PNG_MIME: &str = "image/png";

#[derive(Debug, Default, Clone)]
pub struct Canvas {
    pixels: Option<RgbaImage>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes `src` and replaces the current pixels with it.
    ///
    /// On error the previous frame is kept.
    pub fn draw_data_url(&mut self, src: &str) -> Result<()> {
        let url = DataUrl::parse(src)?;
        let img = image::load_from_memory(&url.data)?.to_rgba8();
        debug!(width = img.width(), height = img.height(), "canvas redrawn");
        self.pixels = Some(img);
        Ok(())
    }

    pub fn is_blank(&self) -> bool {
        self.pixels.is_none()
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.pixels.as_ref().map(|img| img.dimensions())
    }

    pub fn pixels(&self) -> Option<&RgbaImage> {
        self.pixels.as_ref()
    }

    fn encode_png(&self) -> Result<Vec<u8>> {
        let img = self.pixels.as_ref().ok_or(Error::BlankCanvas)?;
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }

    /// Serializes the current pixels as a `data:image/png;base64,...` URL.
    pub fn to_png_data_url(&self) -> Result<String> {
        Ok(DataUrl::new(PNG_MIME, self.encode_png()?).to_url())
    }

    /// Serializes the current pixels as a PNG blob, or `None` when that is not possible.
    pub fn to_png_blob(&self) -> Option<Blob> {
        match self.encode_png() {
            Ok(png) => Some(Blob::new(PNG_MIME, png)),
            Err(err) => {
                error!("failed to serialize canvas: {err}");
                None
            }
        }
    }
}
