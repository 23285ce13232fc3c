//! Capability implementations for running outside a browser.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::capability::{
    Anchor, Blob, BlobUrlRegistry, ClipboardItem, ClipboardSink, DownloadTrigger, Notification,
    Notifier, Severity,
};
use crate::data_url::DataUrl;
use crate::error::{Error, Result};

/// Saves downloads as files in a directory, creating it on first use.
#[derive(Debug)]
pub struct FsDownloads {
    directory: PathBuf,
    saved: Vec<PathBuf>,
}

impl FsDownloads {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        FsDownloads { directory: directory.into(), saved: Vec::new() }
    }

    pub fn saved(&self) -> &[PathBuf] {
        &self.saved
    }

    fn payload(anchor: &Anchor, blobs: &dyn BlobUrlRegistry) -> Result<Vec<u8>> {
        if anchor.href.starts_with("data:") {
            return Ok(DataUrl::parse(&anchor.href)?.data);
        }
        blobs
            .resolve(&anchor.href)
            .map(|blob| blob.bytes.clone())
            .ok_or_else(|| Error::Capability(format!("cannot resolve `{}`", anchor.href)))
    }
}

impl DownloadTrigger for FsDownloads {
    fn click(&mut self, anchor: &Anchor, blobs: &dyn BlobUrlRegistry) -> Result<()> {
        let bytes = Self::payload(anchor, blobs)?;
        // The anchor's download name is a file name, never a path.
        let name = Path::new(&anchor.download)
            .file_name()
            .ok_or_else(|| Error::Capability(format!("bad file name `{}`", anchor.download)))?;

        if !self.directory.exists() {
            fs::create_dir_all(&self.directory)?;
        }
        let path = self.directory.join(name);
        fs::write(&path, &bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "saved download");
        self.saved.push(path);
        Ok(())
    }
}

/// Object URL registry kept in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryBlobRegistry {
    next_id: u64,
    blobs: HashMap<String, Blob>,
}

impl MemoryBlobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of URLs created and not yet revoked.
    pub fn live(&self) -> usize {
        self.blobs.len()
    }
}

impl BlobUrlRegistry for MemoryBlobRegistry {
    fn create_object_url(&mut self, blob: Blob) -> String {
        self.next_id += 1;
        let url = format!("blob:qrgenius/{}", self.next_id);
        self.blobs.insert(url.clone(), blob);
        url
    }

    fn revoke_object_url(&mut self, url: &str) {
        if self.blobs.remove(url).is_none() {
            warn!(url, "revoking unknown object URL");
        }
    }

    fn resolve(&self, url: &str) -> Option<&Blob> {
        self.blobs.get(url)
    }
}

/// Reports notifications as log events.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&mut self, n: Notification) {
        match n.severity {
            Severity::Default => info!(title = %n.title, "{}", n.description),
            Severity::Destructive => error!(title = %n.title, "{}", n.description),
        }
    }
}

/// Holds the last written items. Useful where no system clipboard exists.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    items: Vec<ClipboardItem>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[ClipboardItem] {
        &self.items
    }
}

impl ClipboardSink for MemoryClipboard {
    fn write(&mut self, items: Vec<ClipboardItem>) -> Result<()> {
        self.items = items;
        Ok(())
    }
}

/// The desktop clipboard, through `arboard`. Only PNG items are accepted.
#[cfg(feature = "clipboard")]
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

#[cfg(feature = "clipboard")]
impl SystemClipboard {
    pub fn new() -> Result<Self> {
        let inner = arboard::Clipboard::new().map_err(|e| Error::Capability(e.to_string()))?;
        Ok(SystemClipboard { inner })
    }
}

#[cfg(feature = "clipboard")]
impl ClipboardSink for SystemClipboard {
    fn write(&mut self, items: Vec<ClipboardItem>) -> Result<()> {
        let item = items
            .into_iter()
            .find(|item| item.mime() == crate::surface::PNG_MIME)
            .ok_or_else(|| Error::Capability("no image/png item to copy".into()))?;
        let rgba = image::load_from_memory(&item.blob.bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        let data = arboard::ImageData {
            width: width as usize,
            height: height as usize,
            bytes: std::borrow::Cow::Owned(rgba.into_raw()),
        };
        self.inner
            .set_image(data)
            .map_err(|e| Error::Capability(e.to_string()))
    }
}
