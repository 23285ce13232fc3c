//! Host capabilities the session talks to.
//!
//! In a browser these are the clipboard, anchor-click downloads, the object URL registry
//! and a toast channel. Here they are traits so the session can run against native
//! implementations ([`crate::native`]) or recording fakes in tests.

use crate::error::Result;

/// In-memory binary payload tagged with a MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Blob {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Blob { mime: mime.into(), bytes }
    }
}

/// One clipboard entry. The blob's MIME type is the entry's type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardItem {
    pub blob: Blob,
}

impl ClipboardItem {
    pub fn mime(&self) -> &str {
        &self.blob.mime
    }
}

/// A disposable link: clicking it saves `href` under `download`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub href: String,
    pub download: String,
}

impl Anchor {
    pub fn new(href: impl Into<String>, download: impl Into<String>) -> Self {
        Anchor { href: href.into(), download: download.into() }
    }
}

/// How a [`Notification`] is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Default,
    /// Failures.
    Destructive,
}

/// A transient banner shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    pub fn success(description: impl Into<String>) -> Self {
        Notification {
            title: "Success!".into(),
            description: description.into(),
            severity: Severity::Default,
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Notification {
            title: "Error!".into(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }
}

/// The system clipboard.
pub trait ClipboardSink {
    /// Replaces the clipboard contents with `items`.
    fn write(&mut self, items: Vec<ClipboardItem>) -> Result<()>;
}

/// Registry of `blob:` URLs. Every created URL must be revoked.
pub trait BlobUrlRegistry {
    /// Stores `blob` and returns a fresh `blob:` URL for it.
    fn create_object_url(&mut self, blob: Blob) -> String;
    /// Releases the blob behind `url`. Unknown URLs are ignored.
    fn revoke_object_url(&mut self, url: &str);
    /// Looks up a live URL.
    fn resolve(&self, url: &str) -> Option<&Blob>;
}

/// Saves files the way a browser does when a download link is clicked.
pub trait DownloadTrigger {
    /// Attaches `anchor`, clicks it, and detaches it. `blob:` hrefs are looked up in `blobs`.
    fn click(&mut self, anchor: &Anchor, blobs: &dyn BlobUrlRegistry) -> Result<()>;
}

/// The toast channel for success and error banners.
pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

/// The set of capabilities a session needs.
pub struct Capabilities {
    pub clipboard: Box<dyn ClipboardSink>,
    pub downloads: Box<dyn DownloadTrigger>,
    pub blobs: Box<dyn BlobUrlRegistry>,
    pub notifier: Box<dyn Notifier>,
}

/// Revokes its object URL when dropped, including on early return.
pub(crate) struct ObjectUrl<'a> {
    registry: &'a mut dyn BlobUrlRegistry,
    url: String,
}

impl<'a> ObjectUrl<'a> {
    pub(crate) fn create(registry: &'a mut dyn BlobUrlRegistry, blob: Blob) -> Self {
        let url = registry.create_object_url(blob);
        ObjectUrl { registry, url }
    }

    pub(crate) fn url(&self) -> &str {
        &self.url
    }

    pub(crate) fn registry(&self) -> &dyn BlobUrlRegistry {
        &*self.registry
    }
}

impl Drop for ObjectUrl<'_> {
    fn drop(&mut self) {
        self.registry.revoke_object_url(&self.url);
    }
}
