//! Render and session options.

use std::fmt;
use std::str::FromStr;

use crate::color::Color;
use crate::error::Error;

/// Error correction level passed to the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorCorrection {
    Low,
    #[default]
    Medium,
    Quartile,
    High,
}

impl From<ErrorCorrection> for qrcode::EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::Low => qrcode::EcLevel::L,
            ErrorCorrection::Medium => qrcode::EcLevel::M,
            ErrorCorrection::Quartile => qrcode::EcLevel::Q,
            ErrorCorrection::High => qrcode::EcLevel::H,
        }
    }
}

impl FromStr for ErrorCorrection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "l" | "low" => Ok(ErrorCorrection::Low),
            "m" | "medium" => Ok(ErrorCorrection::Medium),
            "q" | "quartile" => Ok(ErrorCorrection::Quartile),
            "h" | "high" => Ok(ErrorCorrection::High),
            other => Err(Error::InvalidOption(format!(
                "unknown error correction level `{other}` (expected L, M, Q or H)"
            ))),
        }
    }
}

/// Options shared by the raster and vector encoders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Target raster width in pixels. Ignored when smaller than the symbol plus margin.
    pub width: u32,
    /// Quiet zone, in modules.
    pub margin: u32,
    pub dark: Color,
    pub light: Color,
    pub error_correction: ErrorCorrection,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            width: 400,
            margin: 4,
            dark: Color::BLACK,
            light: Color::WHITE,
            error_correction: ErrorCorrection::Medium,
        }
    }
}

/// Which text the SVG export re-encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SvgSource {
    /// The current input text, even if it changed after the last generate.
    #[default]
    InputText,
    /// The text of the last successful generate, matching the canvas.
    RenderedText,
}

impl FromStr for SvgSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "input" => Ok(SvgSource::InputText),
            "rendered" => Ok(SvgSource::RenderedText),
            other => Err(Error::InvalidOption(format!(
                "unknown svg source `{other}` (expected `input` or `rendered`)"
            ))),
        }
    }
}

impl fmt::Display for SvgSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SvgSource::InputText => f.write_str("input"),
            SvgSource::RenderedText => f.write_str("rendered"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionConfig {
    pub render: RenderOptions,
    pub svg_source: SvgSource,
}
