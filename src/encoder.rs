//! QR encoding into PNG data URLs, SVG markup and terminal art.
//!
//! The symbol itself comes from the `qrcode` crate; this module only lays its modules out
//! on a pixel grid, a vector path or a character grid.

use std::io::Cursor;

use image::{ImageBuffer, ImageFormat, RgbaImage};
use qrcode::types::QrError;
use qrcode::QrCode;
use tracing::debug;

use crate::config::{ErrorCorrection, RenderOptions};
use crate::data_url::DataUrl;
use crate::error::{Error, Result};

/// Pixels per module when the requested width is too small to hold the symbol.
const FALLBACK_SCALE: u32 = 4;

/// Largest raster edge, in pixels.
pub const MAX_PIXELS: u32 = 8192;

/// Largest quiet zone, in modules.
pub const MAX_MARGIN: u32 = 256;

/// The two encoder entry points the session depends on.
///
/// Both fail with [`Error::DataTooLong`] when the text does not fit in a version 40 symbol
/// at the configured error correction level. Implementations must be deterministic: the same
/// text and options always produce the same output.
pub trait QrEncoder {
    /// Encodes `text` as a PNG and returns it as a `data:image/png;base64,...` URL.
    fn to_data_url(&self, text: &str, opts: &RenderOptions) -> Result<String>;

    /// Encodes `text` as standalone SVG markup.
    fn to_svg_string(&self, text: &str, opts: &RenderOptions) -> Result<String>;
}

/// [`QrEncoder`] backed by the `qrcode` crate and rasterized with `image`.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrcodeEncoder;

impl QrEncoder for QrcodeEncoder {
    fn to_data_url(&self, text: &str, opts: &RenderOptions) -> Result<String> {
        let code = encode_symbol(text, opts.error_correction)?;
        let img = render_raster(&code, opts)?;

        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        debug!(
            modules = code.width(),
            pixels = img.width(),
            bytes = png.len(),
            "encoded raster QR code"
        );
        Ok(DataUrl::new("image/png", png).to_url())
    }

    fn to_svg_string(&self, text: &str, opts: &RenderOptions) -> Result<String> {
        let code = encode_symbol(text, opts.error_correction)?;
        render_svg(&code, opts)
    }
}

/// Encodes `text` into a symbol, picking the smallest version that fits.
pub fn encode_symbol(text: &str, level: ErrorCorrection) -> Result<QrCode> {
    QrCode::with_error_correction_level(text.as_bytes(), level.into()).map_err(|err| match err {
        QrError::DataTooLong => Error::DataTooLong { len: text.len() },
        other => Error::Encode(other),
    })
}

fn is_dark(code: &QrCode, x: usize, y: usize) -> bool {
    code[(x, y)] == qrcode::Color::Dark
}

fn check_margin(opts: &RenderOptions) -> Result<u32> {
    if opts.margin > MAX_MARGIN {
        return Err(Error::InvalidOption(format!(
            "margin {} exceeds {MAX_MARGIN} modules",
            opts.margin
        )));
    }
    Ok(opts.margin)
}

/// Edge length of the raster for `modules` modules plus the quiet zone.
fn raster_size(modules: u32, opts: &RenderOptions) -> Result<(u32, u32)> {
    let margin = check_margin(opts)?;
    let too_large = || {
        Error::InvalidOption(format!(
            "image for width {} and margin {margin} exceeds {MAX_PIXELS} pixels",
            opts.width
        ))
    };

    let total = margin
        .checked_mul(2)
        .and_then(|m| m.checked_add(modules))
        .ok_or_else(too_large)?;
    let size = if opts.width >= total {
        opts.width
    } else {
        total.checked_mul(FALLBACK_SCALE).ok_or_else(too_large)?
    };
    if size > MAX_PIXELS {
        return Err(too_large());
    }
    Ok((total, size))
}

/// Renders the symbol into a square RGBA image.
///
/// The image is exactly `opts.width` pixels wide when that is enough for the symbol plus
/// its quiet zone; modules then get a fractional scale and each pixel samples the module
/// under it. Otherwise every module is drawn [`FALLBACK_SCALE`] pixels wide.
///
/// # Errors
///
/// Returns [`Error::InvalidOption`] when the margin exceeds [`MAX_MARGIN`] or the image
/// would be wider than [`MAX_PIXELS`].
///
/// # Example
///
/// ```rust
/// use qrgenius::config::{ErrorCorrection, RenderOptions};
/// use qrgenius::encoder::{encode_symbol, render_raster};
///
/// let code = encode_symbol("Hello, World!", ErrorCorrection::Medium).unwrap();
/// let img = render_raster(&code, &RenderOptions::default()).unwrap();
/// assert_eq!(img.dimensions(), (400, 400));
/// ```
pub fn render_raster(code: &QrCode, opts: &RenderOptions) -> Result<RgbaImage> {
    let modules = code.width();
    let (total, size) = raster_size(modules as u32, opts)?;

    let scale = f64::from(size) / f64::from(total);
    let scaled_margin = f64::from(opts.margin) * scale;
    let limit = f64::from(size) - scaled_margin;
    let dark = opts.dark.to_rgba();
    let light = opts.light.to_rgba();

    let mut img = ImageBuffer::new(size, size);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let (px, py) = (f64::from(x), f64::from(y));
        let inside = px >= scaled_margin && py >= scaled_margin && px < limit && py < limit;
        *pixel = if inside {
            let mx = (((px - scaled_margin) / scale) as usize).min(modules - 1);
            let my = (((py - scaled_margin) / scale) as usize).min(modules - 1);
            if is_dark(code, mx, my) {
                dark
            } else {
                light
            }
        } else {
            light
        };
    }
    Ok(img)
}

/// Returns SVG markup depicting the symbol with `opts.margin` quiet-zone modules.
///
/// The string always uses Unix newlines (\n), regardless of the platform.
///
/// # Errors
///
/// Returns [`Error::InvalidOption`] when the margin exceeds [`MAX_MARGIN`].
pub fn render_svg(code: &QrCode, opts: &RenderOptions) -> Result<String> {
    let modules = code.width();
    let margin = check_margin(opts)? as usize;
    let dimension = modules + 2 * margin;

    let mut result = String::new();
    result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    result += &format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" viewBox=\"0 0 {0} {0}\" shape-rendering=\"crispEdges\" stroke=\"none\">\n",
        dimension
    );
    result += &format!(
        "\t<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>\n",
        opts.light
    );
    result += "\t<path d=\"";
    let mut first = true;
    for y in 0..modules {
        for x in 0..modules {
            if is_dark(code, x, y) {
                if !first {
                    result += " ";
                }
                first = false;
                result += &format!("M{},{}h1v1h-1z", x + margin, y + margin);
            }
        }
    }
    result += &format!("\" fill=\"{}\"/>\n", opts.dark);
    result += "</svg>\n";
    Ok(result)
}

/// Draws the symbol with block characters, two per module, for terminal preview.
///
/// # Arguments
///
/// * `text` - The text to encode.
/// * `opts` - Only `margin` and `error_correction` are used.
pub fn to_terminal_string(text: &str, opts: &RenderOptions) -> Result<String> {
    let border = i64::from(check_margin(opts)?);
    let code = encode_symbol(text, opts.error_correction)?;
    let modules = code.width() as i64;

    let mut out = String::new();
    for y in -border..modules + border {
        for x in -border..modules + border {
            let inside = (0..modules).contains(&x) && (0..modules).contains(&y);
            let c = if inside && is_dark(&code, x as usize, y as usize) {
                '█'
            } else {
                ' '
            };
            out.push(c);
            out.push(c);
        }
        out.push('\n');
    }
    Ok(out)
}
