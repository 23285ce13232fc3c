use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use qrgenius::capability::{Capabilities, ClipboardSink};
use qrgenius::color::Color;
use qrgenius::config::{ErrorCorrection, RenderOptions, SessionConfig, SvgSource};
use qrgenius::encoder::to_terminal_string;
use qrgenius::native::{FsDownloads, MemoryBlobRegistry, TracingNotifier};
use qrgenius::session::{ExportFormat, Outcome, QrSession};

#[derive(Parser, Debug)]
#[command(name = "qrgenius", version, about = "Generate a QR code and export it")]
struct Cli {
    /// Text to encode. Read from stdin when omitted.
    text: Option<String>,

    /// Save qr_code.png (the default when no other output is chosen)
    #[arg(long)]
    png: bool,

    /// Save qr_code.svg
    #[arg(long)]
    svg: bool,

    /// Copy the PNG to the system clipboard
    #[arg(long)]
    copy: bool,

    /// Draw the QR code in the terminal
    #[arg(long)]
    print: bool,

    /// Directory downloads are saved to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Raster width in pixels
    #[arg(long, default_value_t = 400)]
    width: u32,

    /// Quiet zone in modules
    #[arg(long, default_value_t = 4)]
    margin: u32,

    #[arg(long, default_value = "#000")]
    dark: Color,

    #[arg(long, default_value = "#FFF")]
    light: Color,

    /// Error correction level: L, M, Q or H
    #[arg(long, default_value = "M")]
    ec_level: ErrorCorrection,

    /// Text the SVG is encoded from: `input` or `rendered`
    #[arg(long, default_value_t = SvgSource::InputText)]
    svg_source: SvgSource,
}

impl Cli {
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            render: RenderOptions {
                width: self.width,
                margin: self.margin,
                dark: self.dark,
                light: self.light,
                error_correction: self.ec_level,
            },
            svg_source: self.svg_source,
        }
    }
}

#[cfg(feature = "clipboard")]
fn clipboard(wanted: bool) -> Result<Box<dyn ClipboardSink>> {
    if !wanted {
        return Ok(Box::new(qrgenius::native::MemoryClipboard::new()));
    }
    let sink = qrgenius::native::SystemClipboard::new().context("opening system clipboard")?;
    Ok(Box::new(sink))
}

#[cfg(not(feature = "clipboard"))]
fn clipboard(wanted: bool) -> Result<Box<dyn ClipboardSink>> {
    if wanted {
        bail!("--copy needs qrgenius built with the `clipboard` feature");
    }
    Ok(Box::new(qrgenius::native::MemoryClipboard::new()))
}

fn read_text(arg: Option<String>) -> Result<String> {
    if let Some(text) = arg {
        return Ok(text);
    }
    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        bail!("no text given; pass it as an argument or pipe it on stdin");
    }
    let mut text = String::new();
    stdin.read_to_string(&mut text).context("reading stdin")?;
    Ok(text.trim_end_matches(['\r', '\n']).to_string())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let mut cli = Cli::parse();
    let config = cli.session_config();
    let text = read_text(cli.text.take())?;

    if cli.print {
        print!("{}", to_terminal_string(&text, &config.render)?);
    }
    let png = cli.png || !(cli.svg || cli.copy || cli.print);

    let caps = Capabilities {
        clipboard: clipboard(cli.copy)?,
        downloads: Box::new(FsDownloads::new(cli.out_dir.clone())),
        blobs: Box::new(MemoryBlobRegistry::new()),
        notifier: Box::new(TracingNotifier),
    };
    let mut session = QrSession::with_capabilities(caps, config);
    session.set_text(text);
    session.generate().context("generating QR code")?;

    let mut outcomes = Vec::new();
    if png {
        outcomes.push(session.export(ExportFormat::Png));
    }
    if cli.svg {
        outcomes.push(session.export(ExportFormat::Svg));
    }
    if cli.copy {
        outcomes.push(session.copy());
    }

    let failed = outcomes.iter().filter(|o| **o == Outcome::Failed).count();
    if failed > 0 {
        bail!("{failed} export(s) failed");
    }
    Ok(())
}
