//! # qrgenius
//!
//! A Rust library for turning text into QR codes and exporting them.
//!
//! `qrgenius` wraps the `qrcode` crate in a small session: type text, generate a 400 pixel
//! black-on-white image, then save it as PNG or SVG or copy it to the clipboard. Every side
//! effect (downloads, object URLs, clipboard, notifications) goes through a trait, so the
//! same session runs against the file system, the desktop clipboard or test doubles.
//!
//! ## Features
//!
//! - Raster output as a PNG data URL sized to a target width, with custom colors.
//! - SVG output re-encoded from text.
//! - PNG export and clipboard copy read back from the rendered canvas.
//! - Failures are reported to the user through a notification channel, never by panicking.
//! - Optional system clipboard support through the `clipboard` feature.
//!
//! ## Installation
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! qrgenius = "0.1" # Replace with the latest version
//! ```
//!
//! ## Example
//!
//! Generate a QR code and save it as `out/qr_code.png`:
//!
//! ```rust,no_run
//! use qrgenius::capability::Capabilities;
//! use qrgenius::config::SessionConfig;
//! use qrgenius::native::{FsDownloads, MemoryBlobRegistry, MemoryClipboard, TracingNotifier};
//! use qrgenius::session::{ExportFormat, QrSession};
//!
//! let caps = Capabilities {
//!     clipboard: Box::new(MemoryClipboard::new()),
//!     downloads: Box::new(FsDownloads::new("out")),
//!     blobs: Box::new(MemoryBlobRegistry::new()),
//!     notifier: Box::new(TracingNotifier),
//! };
//! let mut session = QrSession::with_capabilities(caps, SessionConfig::default());
//! session.set_text("https://example.com");
//! session.generate().expect("text fits in a QR code");
//! session.export(ExportFormat::Png);
//! ```
//!
//! Encode without a session:
//!
//! ```rust
//! use qrgenius::config::RenderOptions;
//! use qrgenius::encoder::{QrEncoder, QrcodeEncoder};
//!
//! let svg = QrcodeEncoder.to_svg_string("Hello, World!", &RenderOptions::default()).unwrap();
//! assert!(svg.contains("<svg"));
//! ```
//!
//! ## Modules
//!
//! - [`session`]: The session controller: generate, export, copy.
//! - [`encoder`]: QR encoding into data URLs, SVG and terminal art.
//! - [`surface`]: The canvas exports read pixels from.
//! - [`capability`]: Host capability traits.
//! - [`native`]: Capability implementations outside a browser.

pub mod capability;
pub mod color;
pub mod config;
pub mod data_url;
pub mod encoder;
pub mod error;
pub mod native;
pub mod session;
pub mod surface;

pub use error::{Error, Result};
