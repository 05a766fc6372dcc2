//! CLI binary for invoice-convert.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConverterConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use invoice_convert::pipeline::input::{read_payload, PayloadSource};
use invoice_convert::toolcheck::{self, ToolStatus};
use invoice_convert::{ConversionRequest, ConverterConfig, InvoiceConverter, OutputMode};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # HTML to stdout
  invoice-convert invoice.xml

  # PDF to a file
  invoice-convert --format pdf invoice.xml -o invoice.pdf

  # PDF as Base64 on stdout, payload from stdin
  cat invoice.xml | invoice-convert --format pdf -

  # Payload that is already Base64-encoded
  invoice-convert --base64-input invoice.b64 -o invoice.html

  # Renderer installed elsewhere, with a 30 s limit
  invoice-convert --jar /opt/invoice/InvoiceConverter.jar --lib-dir /opt/invoice/lib \
      --timeout 30 invoice.xml

  # Check that Java and wkhtmltopdf are installed
  invoice-convert --check

RENDERER CONTRACT:
  <java> [--jvm-arg ...] -cp <jar>:<lib-dir>/* <entry-point> <html|pdf> <true|false>
  The payload is written to the renderer's stdin; the document is read from
  its stdout; a non-zero exit fails the conversion with the renderer's stderr.

ENVIRONMENT VARIABLES:
  INVOICE_JAVA_BIN     Java launcher (default: java)
  INVOICE_JAR          Renderer jar (default: InvoiceConverter.jar)
  INVOICE_LIB_DIR      Dependency jar directory (default: lib)
  INVOICE_TIMEOUT      Per-conversion timeout in seconds (default: 0 = none)
  RUST_LOG             Log filter, overrides --verbose/--quiet
"#;

/// Convert XML invoices to HTML or PDF through the external renderer.
#[derive(Parser, Debug)]
#[command(
    name = "invoice-convert",
    version,
    about = "Convert XML invoices to HTML or PDF through the external renderer",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Invoice XML file, or `-` to read from stdin.
    #[arg(required_unless_present = "check")]
    input: Option<String>,

    /// Output format.
    #[arg(short, long, env = "INVOICE_FORMAT", value_enum, default_value = "html")]
    format: FormatArg,

    /// Write the document to this file instead of stdout (PDF is written as binary).
    #[arg(short, long, env = "INVOICE_OUTPUT")]
    output: Option<PathBuf>,

    /// The input is already Base64-encoded; the renderer decodes it.
    #[arg(long, env = "INVOICE_BASE64_INPUT")]
    base64_input: bool,

    /// Java launcher executable.
    #[arg(long = "java", env = "INVOICE_JAVA_BIN", default_value = "java")]
    java_bin: String,

    /// Renderer jar.
    #[arg(long, env = "INVOICE_JAR", default_value = "InvoiceConverter.jar")]
    jar: PathBuf,

    /// Directory of dependency jars (added as `<dir>/*`).
    #[arg(long, env = "INVOICE_LIB_DIR", default_value = "lib")]
    lib_dir: PathBuf,

    /// Put only the renderer jar on the classpath.
    #[arg(long, conflicts_with = "lib_dir")]
    no_lib_dir: bool,

    /// Renderer main class.
    #[arg(long, env = "INVOICE_ENTRY_POINT", default_value = "InvoiceConverter")]
    entry_point: String,

    /// Extra Java runtime option, placed before `-cp` (repeatable).
    #[arg(long = "jvm-arg", allow_hyphen_values = true)]
    jvm_args: Vec<String>,

    /// Kill the renderer after this many seconds (0 = no limit).
    #[arg(long, env = "INVOICE_TIMEOUT", default_value_t = 0)]
    timeout: u64,

    /// Print the conversion result and stats as JSON.
    #[arg(long, env = "INVOICE_JSON")]
    json: bool,

    /// Check that Java and wkhtmltopdf are installed, then exit.
    #[arg(long)]
    check: bool,

    /// Disable the spinner.
    #[arg(long, env = "INVOICE_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "INVOICE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "INVOICE_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Html,
    Pdf,
}

impl From<FormatArg> for OutputMode {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Html => OutputMode::Html,
            FormatArg::Pdf => OutputMode::Pdf,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner already tells the user something is happening; keep INFO
    // logs out of its way unless --verbose asks for them.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.check;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Installation check ───────────────────────────────────────────────
    if cli.check {
        let ok = run_check(&cli.java_bin);
        if !ok {
            std::process::exit(1);
        }
        return Ok(());
    }

    let input = cli
        .input
        .as_deref()
        .context("An input file (or `-` for stdin) is required")?;

    // ── Build config ─────────────────────────────────────────────────────
    let config = build_config(&cli)?;
    let converter = InvoiceConverter::new(config);

    let payload = read_payload(&PayloadSource::parse(input))
        .await
        .with_context(|| format!("Failed to read input '{input}'"))?;
    let mode = OutputMode::from(cli.format);
    let request = ConversionRequest::new(payload, mode).payload_encoded(cli.base64_input);

    let spinner = show_progress.then(|| start_spinner(mode));

    // ── Run conversion ───────────────────────────────────────────────────
    if let Some(ref output_path) = cli.output {
        let result = converter.convert_to_file(&request, output_path).await;
        if let Some(s) = spinner {
            s.finish_and_clear();
        }
        let stats = result.context("Conversion failed")?;

        if !cli.quiet {
            eprintln!(
                "{}  {}  {}ms  →  {}",
                green("✔"),
                mode,
                stats.duration_ms,
                bold(&output_path.display().to_string()),
            );
            if stats.pdf_preamble_bytes > 0 {
                eprintln!(
                    "   {}",
                    dim(&format!(
                        "stripped {} bytes in front of the PDF header",
                        stats.pdf_preamble_bytes
                    ))
                );
            }
        }
    } else {
        let result = converter.convert(&request).await;
        if let Some(s) = spinner {
            s.finish_and_clear();
        }
        let output = result.context("Conversion failed")?;

        if cli.json {
            let json =
                serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
            println!("{json}");
        } else {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(output.content.as_bytes())
                .context("Failed to write to stdout")?;
            if !output.content.ends_with('\n') {
                handle.write_all(b"\n").ok();
            }
        }

        if !cli.quiet && !cli.json {
            eprintln!(
                "{}",
                dim(&format!(
                    "{} chars of {} in {}ms",
                    output.content.len(),
                    output.mode,
                    output.stats.duration_ms
                ))
            );
        }
    }

    Ok(())
}

/// Map CLI args to `ConverterConfig`.
fn build_config(cli: &Cli) -> Result<ConverterConfig> {
    let mut builder = ConverterConfig::builder()
        .java_bin(cli.java_bin.clone())
        .jar_path(cli.jar.clone())
        .entry_point(cli.entry_point.clone())
        .jvm_args(cli.jvm_args.iter().cloned())
        .timeout_secs(cli.timeout);

    builder = if cli.no_lib_dir {
        builder.no_lib_dir()
    } else {
        builder.lib_dir(cli.lib_dir.clone())
    };

    builder.build().context("Invalid configuration")
}

fn start_spinner(mode: OutputMode) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.set_prefix("Rendering");
    bar.set_message(format!("{mode}…"));
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

/// Print one FOUND / NOT FOUND line per tool. Returns `true` when all are present.
fn run_check(java_bin: &str) -> bool {
    eprintln!("Starting system checks...\n");

    let specs = toolcheck::default_tools(java_bin);
    let reports = tokio::task::block_in_place(|| toolcheck::check_all(&specs));

    for report in &reports {
        match &report.status {
            ToolStatus::Found { version, .. } => {
                let version = version
                    .as_deref()
                    .map(|v| format!(" ({v})"))
                    .unwrap_or_default();
                eprintln!("{}{}", green(&format!("{}: FOUND", report.spec.name)), dim(&version));
            }
            ToolStatus::NotFound { reason } => {
                eprintln!("{}", red(&format!("{}: NOT FOUND", report.spec.name)));
                eprintln!("  {}", dim(&reason.to_string()));
                if let Some(ref hint) = report.spec.install_hint {
                    eprintln!("{}", yellow(hint));
                }
            }
        }
    }

    eprintln!("\nChecks completed.");
    toolcheck::all_found(&reports)
}
