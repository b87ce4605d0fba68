//! texprune-compare - Check that a cleaned LaTeX project renders like the original

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use texprune::compare::{Checker, LatexToolchain, PdfiumBackend, Verdict};
use texprune::config::{
    CompareOptions, CompileOptions, DEFAULT_COMPILE_TIMEOUT, DEFAULT_DPI, DEFAULT_PIXEL_THRESHOLD, default_log_filter,
};

#[derive(Parser)]
#[command(name = "texprune-compare")]
#[command(version, about = "Compile two LaTeX projects and compare the resulting PDFs", long_about = None)]
#[command(after_help = "EXAMPLES:
    texprune-compare -o paper -c cleaned_project -m main.tex
    texprune-compare -o paper -c cleaned_project -m main.tex --visual --dpi 150")]
struct Cli {
    /// Original project directory
    #[arg(short = 'o', long, value_name = "DIR")]
    original: PathBuf,

    /// Cleaned project directory
    #[arg(short = 'c', long, value_name = "DIR")]
    cleaned: PathBuf,

    /// Main TeX file, relative to each project directory
    #[arg(short = 'm', long = "main-tex", value_name = "FILE")]
    main_tex: PathBuf,

    /// Also compare rendered pages when text differs
    #[arg(long)]
    visual: bool,

    /// Rendering resolution for --visual
    #[arg(long, default_value_t = DEFAULT_DPI)]
    dpi: u32,

    /// Fraction of differing pixels tolerated per page
    #[arg(long, default_value_t = DEFAULT_PIXEL_THRESHOLD)]
    threshold: f64,

    /// Seconds before a compiler run is killed
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_COMPILE_TIMEOUT.as_secs())]
    timeout: u64,

    /// Show toolchain details and the text diff
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_log_filter(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let toolchain = LatexToolchain::new(CompileOptions::default().with_timeout(Duration::from_secs(cli.timeout)));
    let pdfium = PdfiumBackend::new();
    let options = CompareOptions::default()
        .with_visual(cli.visual)
        .with_dpi(cli.dpi)
        .with_threshold(cli.threshold)
        .with_diff(cli.verbose);
    let checker = Checker::new(&toolchain, &pdfium, &pdfium, options);

    let result = match checker.check(&cli.original, &cli.cleaned, &cli.main_tex) {
        Ok(result) => result,
        Err(e) => {
            error!("Failed to compile: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!("Summary:");
    match result.verdict {
        Verdict::HashIdentical => info!("✅ PDFs are identical (same hash)"),
        Verdict::TextIdentical => info!("✅ PDFs have identical text content"),
        Verdict::VisuallyIdentical => {
            info!("❌ PDFs have different text content");
            info!("✅ PDFs are visually identical");
        }
        Verdict::Differs => {
            info!("❌ PDFs have different text content");
            if cli.visual {
                info!("❌ PDFs have visual differences");
            }
        }
    }

    if result.verdict.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
