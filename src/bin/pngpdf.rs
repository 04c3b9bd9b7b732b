//! CLI binary for pngpdf-client.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ClientConfig`, runs one conversion, and prints the result.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pngpdf_client::{
    convert_file_to, ClientConfig, ConversionMode, ConversionProgressCallback, ConvertError,
    ProgressCallback, TransferClient, DEFAULT_API_BASE_URL,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress: a single spinner whose message tracks the workflow
/// step. The bar is cleared before the final summary line is printed.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Preparing");
        bar.set_message("reading input…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_upload_start(&self, filename: &str, size: u64) {
        self.bar.set_prefix("Uploading");
        self.bar
            .set_message(format!("{filename} ({})", format_bytes(size)));
    }

    fn on_converted(&self, output_filename: &str) {
        self.bar.set_prefix("Converted");
        self.bar.set_message(format!("→ {output_filename}"));
    }

    fn on_download_start(&self, _file_id: &str) {
        self.bar.set_prefix("Downloading");
        self.bar.set_message("fetching artifact…");
    }

    fn on_complete(&self, _filename: &str, _size: u64) {
        self.bar.finish_and_clear();
    }

    fn on_error(&self, _message: String) {
        self.bar.finish_and_clear();
    }
}

/// Render a byte count with a binary-unit suffix.
fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # PNG to PDF (mode inferred from the extension)
  pngpdf photo.png

  # PDF to PNG, explicit output path
  pngpdf scan.pdf -o first-page.png

  # Explicit mode against a remote service
  pngpdf --mode pdf2png --api-url https://convert.example.com scan.pdf

  # Check that the service is reachable
  pngpdf --ping

ENVIRONMENT VARIABLES:
  PNGPDF_API_URL           Conversion service base URL
  PNGPDF_OUTPUT            Default output path
  PNGPDF_UPLOAD_TIMEOUT    Submit timeout in seconds
  PNGPDF_DOWNLOAD_TIMEOUT  Artifact download timeout in seconds

NOTES:
  Uploads are capped at 50 MB and checked before any network call.
  Converted artifacts are fetched once; the saved file is the only copy.
"#;

/// Convert PNG files to PDF (and back) via a conversion service.
#[derive(Parser, Debug)]
#[command(
    name = "pngpdf",
    version,
    about = "Convert PNG files to PDF (and back) via a conversion service",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input file (.png or .pdf).
    #[arg(required_unless_present = "ping")]
    input: Option<PathBuf>,

    /// Conversion direction. Inferred from the input extension if omitted.
    #[arg(long, value_enum, env = "PNGPDF_MODE")]
    mode: Option<ModeArg>,

    /// Write the artifact to this path instead of the server-assigned
    /// filename in the current directory.
    #[arg(short, long, env = "PNGPDF_OUTPUT")]
    output: Option<PathBuf>,

    /// Base URL of the conversion service.
    #[arg(long, env = "PNGPDF_API_URL", default_value = DEFAULT_API_BASE_URL)]
    api_url: String,

    /// Submit timeout in seconds.
    #[arg(long, env = "PNGPDF_UPLOAD_TIMEOUT", default_value_t = 60)]
    upload_timeout: u64,

    /// Artifact download timeout in seconds.
    #[arg(long, env = "PNGPDF_DOWNLOAD_TIMEOUT", default_value_t = 60)]
    download_timeout: u64,

    /// Check service health and exit.
    #[arg(long)]
    ping: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "PNGPDF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PNGPDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PNGPDF_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Png2pdf,
    Pdf2png,
}

impl From<ModeArg> for ConversionMode {
    fn from(v: ModeArg) -> Self {
        match v {
            ModeArg::Png2pdf => ConversionMode::PngToPdf,
            ModeArg::Pdf2png => ConversionMode::PdfToPng,
        }
    }
}

/// Pick the conversion mode: explicit flag first, then the input extension,
/// then the PNG→PDF default.
fn resolve_mode(flag: Option<ModeArg>, input: Option<&PathBuf>) -> ConversionMode {
    if let Some(m) = flag {
        return m.into();
    }
    let ext = input
        .and_then(|p| p.extension())
        .map(|e| e.to_string_lossy().to_lowercase());
    match ext.as_deref() {
        Some("pdf") => ConversionMode::PdfToPng,
        _ => ConversionMode::PngToPdf,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner provides the user feedback; keep library logs quiet
    // unless the user asked for them.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = ClientConfig::builder()
        .api_base_url(cli.api_url.as_str())
        .upload_timeout_secs(cli.upload_timeout)
        .download_timeout_secs(cli.download_timeout);

    if show_progress && !cli.ping {
        let cb = CliProgressCallback::new();
        builder = builder.progress_callback(cb as ProgressCallback);
    }

    let config = builder.build().context("Invalid configuration")?;

    // ── Ping mode ────────────────────────────────────────────────────────
    if cli.ping {
        let client = TransferClient::new(config).context("Invalid configuration")?;
        match client.health().await {
            Ok(()) => {
                if !cli.quiet {
                    println!("{} {} is reachable", green("✔"), cli.api_url);
                }
                return Ok(());
            }
            Err(e) => {
                eprintln!("{} {} is not reachable: {e}", red("✘"), cli.api_url);
                std::process::exit(1);
            }
        }
    }

    // input is required by clap unless --ping was given.
    let input = match cli.input {
        Some(ref p) => p.clone(),
        None => anyhow::bail!("no input file given"),
    };
    let mode = resolve_mode(cli.mode, cli.input.as_ref());

    // ── Run conversion ───────────────────────────────────────────────────
    match convert_file_to(&input, mode, config, cli.output.as_deref()).await {
        Ok((path, outcome)) => {
            if !cli.quiet {
                eprintln!(
                    "{} {}  {}  {}ms  →  {}",
                    green("✔"),
                    mode,
                    dim(&format_bytes(outcome.stats.bytes_downloaded)),
                    outcome.stats.total_duration_ms,
                    bold(&path.display().to_string()),
                );
            }
            Ok(())
        }
        Err(e) => {
            // One short message for the user; the full detail goes to the
            // verbose log only.
            eprintln!("{} {}", red("✘"), e.category().user_message());
            tracing::debug!("conversion error detail: {e}");
            if let ConvertError::Network { .. } | ConvertError::Timeout { .. } = e {
                tracing::warn!("is the conversion service running at {}?", cli.api_url);
            }
            std::process::exit(1);
        }
    }
}
