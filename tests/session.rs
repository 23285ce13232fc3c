use std::cell::RefCell;
use std::rc::Rc;

use qrgenius::capability::{
    Anchor, Blob, BlobUrlRegistry, Capabilities, ClipboardItem, ClipboardSink, DownloadTrigger,
    Notification, Notifier, Severity,
};
use qrgenius::config::{RenderOptions, SessionConfig, SvgSource};
use qrgenius::data_url::DataUrl;
use qrgenius::encoder::{QrEncoder, QrcodeEncoder};
use qrgenius::native::MemoryBlobRegistry;
use qrgenius::session::{ExportFormat, Outcome, QrSession, PNG_FILENAME, SVG_FILENAME, SVG_MIME};
use qrgenius::Error;

/// Everything the fakes observed.
#[derive(Default)]
struct Record {
    downloads: Vec<(Anchor, Blob)>,
    clipboard: Vec<Vec<ClipboardItem>>,
    notifications: Vec<Notification>,
    created_urls: Vec<String>,
    revoked_urls: Vec<String>,
}

impl Record {
    fn destructive(&self) -> usize {
        self.notifications
            .iter()
            .filter(|n| n.severity == Severity::Destructive)
            .count()
    }
}

type Shared = Rc<RefCell<Record>>;

struct FakeDownloads {
    record: Shared,
    fail: bool,
}

impl DownloadTrigger for FakeDownloads {
    fn click(&mut self, anchor: &Anchor, blobs: &dyn BlobUrlRegistry) -> qrgenius::Result<()> {
        if self.fail {
            return Err(Error::Capability("disk full".into()));
        }
        let blob = if anchor.href.starts_with("data:") {
            let url = DataUrl::parse(&anchor.href)?;
            Blob::new(url.mime, url.data)
        } else {
            blobs.resolve(&anchor.href).cloned().expect("object URL alive during click")
        };
        self.record.borrow_mut().downloads.push((anchor.clone(), blob));
        Ok(())
    }
}

struct FakeBlobs {
    record: Shared,
    inner: MemoryBlobRegistry,
}

impl BlobUrlRegistry for FakeBlobs {
    fn create_object_url(&mut self, blob: Blob) -> String {
        let url = self.inner.create_object_url(blob);
        self.record.borrow_mut().created_urls.push(url.clone());
        url
    }

    fn revoke_object_url(&mut self, url: &str) {
        self.inner.revoke_object_url(url);
        self.record.borrow_mut().revoked_urls.push(url.to_string());
    }

    fn resolve(&self, url: &str) -> Option<&Blob> {
        self.inner.resolve(url)
    }
}

struct FakeClipboard {
    record: Shared,
    fail: bool,
}

impl ClipboardSink for FakeClipboard {
    fn write(&mut self, items: Vec<ClipboardItem>) -> qrgenius::Result<()> {
        if self.fail {
            return Err(Error::Capability("clipboard locked".into()));
        }
        self.record.borrow_mut().clipboard.push(items);
        Ok(())
    }
}

struct FakeNotifier {
    record: Shared,
}

impl Notifier for FakeNotifier {
    fn notify(&mut self, notification: Notification) {
        self.record.borrow_mut().notifications.push(notification);
    }
}

#[derive(Default)]
struct Faults {
    downloads: bool,
    clipboard: bool,
}

fn session_with(config: SessionConfig, faults: Faults) -> (QrSession, Shared) {
    let record = Shared::default();
    let caps = Capabilities {
        clipboard: Box::new(FakeClipboard { record: record.clone(), fail: faults.clipboard }),
        downloads: Box::new(FakeDownloads { record: record.clone(), fail: faults.downloads }),
        blobs: Box::new(FakeBlobs { record: record.clone(), inner: MemoryBlobRegistry::new() }),
        notifier: Box::new(FakeNotifier { record: record.clone() }),
    };
    (QrSession::with_capabilities(caps, config), record)
}

fn session() -> (QrSession, Shared) {
    session_with(SessionConfig::default(), Faults::default())
}

fn too_long() -> String {
    "x".repeat(5000)
}

#[test]
fn generate_draws_a_non_empty_image() {
    let (mut session, record) = session();
    session.set_text("hello");
    let rendered = session.generate().unwrap();
    assert!(rendered.data_url.starts_with("data:image/png;base64,"));
    assert_eq!(rendered.text, "hello");
    assert_eq!(session.canvas().dimensions(), Some((400, 400)));
    assert!(record.borrow().notifications.is_empty());
}

#[test]
fn generate_empty_text_yields_an_image() {
    let (mut session, _) = session();
    session.set_text("");
    session.generate().unwrap();
    assert!(!session.canvas().is_blank());
}

#[test]
fn generate_is_deterministic() {
    let (mut session, _) = session();
    session.set_text("same text");
    let first = session.generate().unwrap().data_url.clone();
    let second = session.generate().unwrap().data_url.clone();
    assert_eq!(first, second);
}

#[test]
fn exports_before_generate_are_no_ops() {
    let (mut session, record) = session();
    session.set_text("not generated");

    assert_eq!(session.export(ExportFormat::Png), Outcome::Skipped);
    assert_eq!(session.export(ExportFormat::Svg), Outcome::Skipped);
    assert_eq!(session.copy(), Outcome::Skipped);

    let record = record.borrow();
    assert!(record.downloads.is_empty());
    assert!(record.clipboard.is_empty());
    assert!(record.notifications.is_empty());
    assert!(record.created_urls.is_empty());
}

#[test]
fn export_png_downloads_one_valid_png() {
    let (mut session, record) = session();
    session.set_text("hello");
    session.generate().unwrap();

    assert_eq!(session.export(ExportFormat::Png), Outcome::Completed);

    let record = record.borrow();
    assert_eq!(record.downloads.len(), 1);
    let (anchor, blob) = &record.downloads[0];
    assert_eq!(anchor.download, PNG_FILENAME);
    assert_eq!(blob.mime, "image/png");
    let img = image::load_from_memory(&blob.bytes).unwrap();
    assert_eq!((img.width(), img.height()), (400, 400));
    // Data URLs never go through the object URL registry.
    assert!(record.created_urls.is_empty());
}

#[test]
fn export_png_reflects_the_canvas_not_the_current_text() {
    let (mut session, record) = session();
    session.set_text("first");
    session.generate().unwrap();
    session.set_text(too_long());

    assert_eq!(session.export(ExportFormat::Png), Outcome::Completed);

    let expected = QrcodeEncoder
        .to_data_url("first", &RenderOptions::default())
        .unwrap();
    let expected = image::load_from_memory(&DataUrl::parse(&expected).unwrap().data)
        .unwrap()
        .to_rgba8();
    let record = record.borrow();
    let saved = image::load_from_memory(&record.downloads[0].1.bytes)
        .unwrap()
        .to_rgba8();
    assert_eq!(saved, expected);
}

#[test]
fn export_svg_downloads_and_revokes_object_url() {
    let (mut session, record) = session();
    session.set_text("hello");
    session.generate().unwrap();

    assert_eq!(session.export(ExportFormat::Svg), Outcome::Completed);

    let record = record.borrow();
    assert_eq!(record.downloads.len(), 1);
    let (anchor, blob) = &record.downloads[0];
    assert_eq!(anchor.download, SVG_FILENAME);
    assert_eq!(blob.mime, SVG_MIME);
    assert!(String::from_utf8(blob.bytes.clone()).unwrap().contains("<svg"));
    assert_eq!(record.created_urls.len(), 1);
    assert_eq!(record.revoked_urls, record.created_urls);
}

#[test]
fn export_svg_too_long_notifies_once_and_downloads_nothing() {
    let (mut session, record) = session();
    session.set_text("hello");
    session.generate().unwrap();
    session.set_text(too_long());

    assert_eq!(session.export(ExportFormat::Svg), Outcome::Failed);

    let record = record.borrow();
    assert_eq!(record.destructive(), 1);
    assert_eq!(record.notifications.len(), 1);
    assert_eq!(record.notifications[0].description, "Failed to generate SVG QR code.");
    assert!(record.downloads.is_empty());
    assert!(record.created_urls.is_empty());
}

#[test]
fn export_svg_from_rendered_text_ignores_later_edits() {
    let config = SessionConfig { svg_source: SvgSource::RenderedText, ..SessionConfig::default() };
    let (mut session, record) = session_with(config, Faults::default());
    session.set_text("hello");
    session.generate().unwrap();
    session.set_text(too_long());

    assert_eq!(session.export(ExportFormat::Svg), Outcome::Completed);

    let expected = QrcodeEncoder
        .to_svg_string("hello", &RenderOptions::default())
        .unwrap();
    let record = record.borrow();
    assert_eq!(record.downloads[0].1.bytes, expected.into_bytes());
    assert!(record.notifications.is_empty());
}

#[test]
fn failed_download_still_revokes_object_url() {
    let faults = Faults { downloads: true, ..Faults::default() };
    let (mut session, record) = session_with(SessionConfig::default(), faults);
    session.set_text("hello");
    session.generate().unwrap();

    assert_eq!(session.export(ExportFormat::Svg), Outcome::Failed);

    let record = record.borrow();
    assert_eq!(record.destructive(), 1);
    assert_eq!(record.created_urls.len(), 1);
    assert_eq!(record.revoked_urls, record.created_urls);
}

#[test]
fn export_png_download_failure_notifies_once() {
    let faults = Faults { downloads: true, ..Faults::default() };
    let (mut session, record) = session_with(SessionConfig::default(), faults);
    session.set_text("hello");
    session.generate().unwrap();

    assert_eq!(session.export(ExportFormat::Png), Outcome::Failed);

    let record = record.borrow();
    assert_eq!(record.notifications.len(), 1);
    let notification = &record.notifications[0];
    assert_eq!(notification.severity, Severity::Destructive);
    assert_eq!(notification.title, "Error!");
    assert_eq!(notification.description, "Failed to download QR code.");
    assert!(record.downloads.is_empty());
    assert!(record.created_urls.is_empty());
    assert!(record.clipboard.is_empty());
}

#[test]
fn copy_writes_one_png_item_and_notifies_success() {
    let (mut session, record) = session();
    session.set_text("hello");
    session.generate().unwrap();

    assert_eq!(session.copy(), Outcome::Completed);

    let record = record.borrow();
    assert_eq!(record.clipboard.len(), 1);
    let items = &record.clipboard[0];
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].mime(), "image/png");
    assert!(image::load_from_memory(&items[0].blob.bytes).is_ok());

    assert_eq!(record.notifications.len(), 1);
    let notification = &record.notifications[0];
    assert_eq!(notification.title, "Success!");
    assert_eq!(notification.severity, Severity::Default);
    assert_eq!(notification.description, "Copied QR Code to clipboard!");
}

#[test]
fn copy_failure_notifies_instead_of_success() {
    let faults = Faults { clipboard: true, ..Faults::default() };
    let (mut session, record) = session_with(SessionConfig::default(), faults);
    session.set_text("hello");
    session.generate().unwrap();

    assert_eq!(session.copy(), Outcome::Failed);

    let record = record.borrow();
    assert_eq!(record.notifications.len(), 1);
    let notification = &record.notifications[0];
    assert_eq!(notification.severity, Severity::Destructive);
    assert_eq!(notification.title, "Error!");
    assert_eq!(notification.description, "Failed to copy QR Code to clipboard.");
}

#[test]
fn failed_generate_notifies_and_keeps_previous_image() {
    let (mut session, record) = session();
    session.set_text("keep me");
    let before = session.generate().unwrap().clone();

    session.set_text(too_long());
    let err = session.generate().unwrap_err();
    assert!(matches!(err, Error::DataTooLong { .. }));

    assert_eq!(session.rendered(), Some(&before));
    assert_eq!(session.canvas().dimensions(), Some((400, 400)));
    let record = record.borrow();
    assert_eq!(record.destructive(), 1);
    assert_eq!(record.notifications[0].description, "Failed to generate QR code.");
}

#[test]
fn failed_first_generate_leaves_exports_disabled() {
    let (mut session, record) = session();
    session.set_text(too_long());
    assert!(session.generate().is_err());

    assert_eq!(session.export(ExportFormat::Png), Outcome::Skipped);
    assert_eq!(session.copy(), Outcome::Skipped);
    assert!(record.borrow().downloads.is_empty());
    assert_eq!(record.borrow().notifications.len(), 1);
}

#[test]
fn oversized_render_options_fail_generate_without_panicking() {
    let config = SessionConfig {
        render: RenderOptions { margin: u32::MAX / 2 + 1, ..RenderOptions::default() },
        ..SessionConfig::default()
    };
    let (mut session, record) = session_with(config, Faults::default());
    session.set_text("hello");

    let err = session.generate().unwrap_err();
    assert!(matches!(err, Error::InvalidOption(_)));
    assert!(session.canvas().is_blank());
    assert_eq!(record.borrow().destructive(), 1);
    assert_eq!(
        record.borrow().notifications[0].description,
        "Failed to generate QR code."
    );
}

#[test]
fn oversized_width_fails_generate_without_panicking() {
    let config = SessionConfig {
        render: RenderOptions { width: 4_000_000_000, ..RenderOptions::default() },
        ..SessionConfig::default()
    };
    let (mut session, record) = session_with(config, Faults::default());
    session.set_text("hello");

    assert!(matches!(session.generate(), Err(Error::InvalidOption(_))));
    assert_eq!(record.borrow().destructive(), 1);
}
