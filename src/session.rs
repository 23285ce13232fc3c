//! The QR session controller.
//!
//! A session owns the input text, the last rendered image and the canvas it was drawn on.
//! `generate` is the only operation that changes the image; the export operations read it
//! back and hand it to the host capabilities.

use tracing::{debug, error, info};

use crate::capability::{Anchor, Blob, Capabilities, ClipboardItem, Notification, ObjectUrl};
use crate::config::{SessionConfig, SvgSource};
use crate::encoder::{QrEncoder, QrcodeEncoder};
use crate::error::Result;
use crate::surface::Canvas;

pub const PNG_FILENAME: &str = "qr_code.png";
pub const SVG_FILENAME: &str = "qr_code.svg";
pub const SVG_MIME: &str = "image/svg+xml";

/// The output of the last successful generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    pub data_url: String,
    /// Input text at the time of the generate.
    pub text: String,
}

/// File format for [`QrSession::export`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// `qr_code.png`, read back from the canvas.
    Png,
    /// `qr_code.svg`, re-encoded from text.
    Svg,
}

/// How an export or copy ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing rendered yet, so nothing happened.
    Skipped,
    Completed,
    /// The user was notified of the failure.
    Failed,
}

/// One user's text, its rendered QR code, and the host capabilities exports go through.
///
/// # Example
///
/// ```rust
/// use qrgenius::capability::Capabilities;
/// use qrgenius::config::SessionConfig;
/// use qrgenius::native::{FsDownloads, MemoryBlobRegistry, MemoryClipboard, TracingNotifier};
/// use qrgenius::session::{Outcome, QrSession};
///
/// let caps = Capabilities {
///     clipboard: Box::new(MemoryClipboard::new()),
///     downloads: Box::new(FsDownloads::new("out")),
///     blobs: Box::new(MemoryBlobRegistry::new()),
///     notifier: Box::new(TracingNotifier),
/// };
/// let mut session = QrSession::with_capabilities(caps, SessionConfig::default());
///
/// // Nothing is rendered yet, so copying does nothing.
/// assert_eq!(session.copy(), Outcome::Skipped);
///
/// session.set_text("Hello, World!");
/// session.generate().unwrap();
/// assert_eq!(session.copy(), Outcome::Completed);
/// ```
pub struct QrSession {
    text: String,
    rendered: Option<RenderedImage>,
    canvas: Canvas,
    config: SessionConfig,
    encoder: Box<dyn QrEncoder>,
    caps: Capabilities,
}

impl QrSession {
    /// Creates an empty session: no text, nothing rendered.
    ///
    /// # Arguments
    ///
    /// * `encoder` - Produces the raster and SVG output.
    /// * `caps` - Clipboard, downloads, object URLs and notifications.
    /// * `config` - Render options and the SVG text source.
    pub fn new(encoder: Box<dyn QrEncoder>, caps: Capabilities, config: SessionConfig) -> Self {
        QrSession {
            text: String::new(),
            rendered: None,
            canvas: Canvas::new(),
            config,
            encoder,
            caps,
        }
    }

    /// A session using the `qrcode`-backed encoder.
    pub fn with_capabilities(caps: Capabilities, config: SessionConfig) -> Self {
        Self::new(Box::new(QrcodeEncoder), caps, config)
    }

    /// Replaces the input text. Nothing is rendered until [`generate`](Self::generate).
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The last successful generate, if any.
    pub fn rendered(&self) -> Option<&RenderedImage> {
        self.rendered.as_ref()
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Encodes the current text and redraws the canvas from the result.
    ///
    /// On failure the user is notified and the previous image stays on the canvas.
    ///
    /// # Errors
    ///
    /// [`Error::DataTooLong`](crate::Error::DataTooLong) when the text does not fit, and
    /// [`Error::InvalidOption`](crate::Error::InvalidOption) when the render options would
    /// produce an oversized image.
    pub fn generate(&mut self) -> Result<&RenderedImage> {
        match self.render_current_text() {
            Ok(rendered) => {
                info!(chars = rendered.text.chars().count(), "generated QR code");
                Ok(&*self.rendered.insert(rendered))
            }
            Err(err) => {
                error!("QR generation failed: {err}");
                self.caps
                    .notifier
                    .notify(Notification::error("Failed to generate QR code."));
                Err(err)
            }
        }
    }

    fn render_current_text(&mut self) -> Result<RenderedImage> {
        let data_url = self.encoder.to_data_url(&self.text, &self.config.render)?;
        self.canvas.draw_data_url(&data_url)?;
        Ok(RenderedImage { data_url, text: self.text.clone() })
    }

    /// Saves the QR code as `qr_code.png` or `qr_code.svg`.
    ///
    /// PNG is read from the canvas. SVG is re-encoded from text, chosen by
    /// [`SessionConfig::svg_source`].
    pub fn export(&mut self, format: ExportFormat) -> Outcome {
        if self.canvas.is_blank() {
            debug!(?format, "nothing rendered, export skipped");
            return Outcome::Skipped;
        }
        match format {
            ExportFormat::Png => self.export_png(),
            ExportFormat::Svg => self.export_svg(),
        }
    }

    fn export_png(&mut self) -> Outcome {
        let href = match self.canvas.to_png_data_url() {
            Ok(href) => href,
            Err(err) => {
                error!("failed to serialize canvas: {err}");
                return self.fail("Failed to generate PNG QR code.");
            }
        };
        let anchor = Anchor::new(href, PNG_FILENAME);
        match self.caps.downloads.click(&anchor, &*self.caps.blobs) {
            Ok(()) => Outcome::Completed,
            Err(err) => {
                error!("PNG download failed: {err}");
                self.fail("Failed to download QR code.")
            }
        }
    }

    fn export_svg(&mut self) -> Outcome {
        let source = match self.config.svg_source {
            SvgSource::InputText => self.text.as_str(),
            SvgSource::RenderedText => {
                // `export` checked the canvas, and the canvas is only drawn alongside `rendered`.
                debug_assert!(self.rendered.is_some(), "canvas drawn without a rendered image");
                self.rendered
                    .as_ref()
                    .map_or(self.text.as_str(), |rendered| rendered.text.as_str())
            }
        };
        let svg = match self.encoder.to_svg_string(source, &self.config.render) {
            Ok(svg) => svg,
            Err(err) => {
                error!("Error generating SVG QR code: {err}");
                return self.fail("Failed to generate SVG QR code.");
            }
        };

        let result = {
            let object_url =
                ObjectUrl::create(&mut *self.caps.blobs, Blob::new(SVG_MIME, svg.into_bytes()));
            let anchor = Anchor::new(object_url.url(), SVG_FILENAME);
            self.caps.downloads.click(&anchor, object_url.registry())
        };
        match result {
            Ok(()) => Outcome::Completed,
            Err(err) => {
                error!("SVG download failed: {err}");
                self.fail("Failed to download QR code.")
            }
        }
    }

    /// Writes the canvas to the clipboard as one `image/png` item.
    ///
    /// Shows a success notification when the write goes through, an error notification
    /// otherwise. Does nothing before the first successful generate.
    pub fn copy(&mut self) -> Outcome {
        if self.canvas.is_blank() {
            debug!("nothing rendered, copy skipped");
            return Outcome::Skipped;
        }
        let Some(blob) = self.canvas.to_png_blob() else {
            return self.fail("QR Code is not available");
        };

        match self.caps.clipboard.write(vec![ClipboardItem { blob }]) {
            Ok(()) => {
                self.caps
                    .notifier
                    .notify(Notification::success("Copied QR Code to clipboard!"));
                Outcome::Completed
            }
            Err(err) => {
                error!("clipboard write failed: {err}");
                self.fail("Failed to copy QR Code to clipboard.")
            }
        }
    }

    fn fail(&mut self, description: &str) -> Outcome {
        self.caps.notifier.notify(Notification::error(description));
        Outcome::Failed
    }
}
