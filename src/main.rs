//! texprune - Minimize a LaTeX project for submission

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use texprune::config::{DEFAULT_OUTPUT_DIR, default_log_filter};
use texprune::{CopyReport, Resolution, clean_project, find_main_tex};

#[derive(Parser)]
#[command(name = "texprune")]
#[command(version, about = "Copy only the files a LaTeX document needs, with comments removed", long_about = None)]
#[command(after_help = "EXAMPLES:
    texprune -s paper                     Clean ./paper into ./cleaned_project
    texprune -s paper -o submit -m ms.tex Use ms.tex as the main file
    texprune -s paper --json > deps.json  Also print the dependency report")]
struct Cli {
    /// Project directory to clean
    #[arg(short = 's', long = "source_dir", value_name = "DIR")]
    source_dir: PathBuf,

    /// Where the cleaned project is written
    #[arg(short = 'o', long = "output_dir", value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Main TeX file, relative to the source directory (auto-detected if omitted)
    #[arg(short = 'm', long = "main_tex", value_name = "FILE")]
    main_tex: Option<PathBuf>,

    /// Log every file found and copied
    #[arg(short, long)]
    verbose: bool,

    /// Print the resolved dependencies as JSON on stdout
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    main: &'a std::path::Path,
    #[serde(flatten)]
    resolution: &'a Resolution,
    copied: usize,
    missing: &'a [PathBuf],
    fallbacks: &'a [PathBuf],
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

    let main_tex = match cli.main_tex.clone() {
        Some(main) => main,
        None => match find_main_tex(&cli.source_dir) {
            Ok(main) => main,
            Err(e) => {
                error!("{e}");
                error!("Please specify the main TeX file using --main_tex");
                let _ = Cli::command().print_help();
                return ExitCode::FAILURE;
            }
        },
    };

    info!("Cleaning LaTeX project from {}", cli.source_dir.display());
    info!("Main TeX file: {}", main_tex.display());

    let (resolution, report) = match clean_project(&cli.source_dir, &cli.output_dir, &main_tex) {
        Ok(result) => result,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    info!("Cleaned project created at {}", cli.output_dir.display());

    if cli.json {
        match render_json(&main_tex, &resolution, &report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                error!("Could not serialize report: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

fn render_json(main: &std::path::Path, resolution: &Resolution, report: &CopyReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        main,
        resolution,
        copied: report.copied.len(),
        missing: &report.missing,
        fallbacks: &report.fallbacks,
    })
}
