//! Driving the external LaTeX toolchain.
//!
//! `latexmk` is tried first. When it fails, `pdflatex` is run directly,
//! followed by `bibtex` if the first pass reports missing auxiliary data,
//! then a fixed number of extra `pdflatex` passes so cross-references settle.
//!
//! Every process runs with its working directory set to the directory of the
//! main file; the caller's working directory is never touched. Each process
//! is killed if it outlives [`CompileOptions::timeout`].

use std::ffi::OsStr;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::config::CompileOptions;
use crate::error::{Error, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Something that turns a project directory into a PDF.
pub trait Toolchain {
    /// Compile `main_tex` (relative to `project_dir`) and return the path of
    /// the produced PDF. A missing artifact is an error.
    fn compile(&self, project_dir: &Path, main_tex: &Path) -> Result<PathBuf>;
}

/// Captured result of one toolchain process.
#[derive(Debug)]
struct RunOutput {
    status: ExitStatus,
    stdout: String,
}

/// `latexmk` / `pdflatex` / `bibtex` from `PATH`.
#[derive(Debug, Clone, Default)]
pub struct LatexToolchain {
    options: CompileOptions,
}

impl LatexToolchain {
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    fn run(&self, program: &str, args: &[&OsStr], dir: &Path) -> Result<RunOutput> {
        debug!(program, dir = %dir.display(), "Running toolchain command");

        let mut capture = tempfile::tempfile()?;
        let mut child = Command::new(program)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(capture.try_clone()?)
            .stderr(capture.try_clone()?)
            .spawn()
            .map_err(|e| Error::Toolchain {
                program: program.to_string(),
                reason: e.to_string(),
            })?;

        let deadline = Instant::now() + self.options.timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::CompileTimeout {
                    program: program.to_string(),
                    timeout: self.options.timeout,
                });
            }
            thread::sleep(POLL_INTERVAL);
        };

        let mut raw = Vec::new();
        capture.seek(SeekFrom::Start(0))?;
        capture.read_to_end(&mut raw)?;

        Ok(RunOutput {
            status,
            stdout: String::from_utf8_lossy(&raw).into_owned(),
        })
    }

    fn latexmk(&self, file: &OsStr, dir: &Path) -> bool {
        let mut args = vec![OsStr::new("-pdf"), file];
        if self.options.shell_escape {
            args.push(OsStr::new("--shell-escape"));
        }

        match self.run("latexmk", &args, dir) {
            Ok(out) if out.status.success() => true,
            Ok(out) => {
                debug!(status = %out.status, "latexmk output:\n{}", out.stdout);
                false
            }
            Err(e) => {
                debug!("latexmk unavailable: {e}");
                false
            }
        }
    }

    fn pdflatex(&self, file: &OsStr, dir: &Path) -> Result<RunOutput> {
        let mut args = vec![OsStr::new("-interaction=nonstopmode")];
        if self.options.shell_escape {
            args.push(OsStr::new("-shell-escape"));
        }
        args.push(file);
        self.run("pdflatex", &args, dir)
    }

    fn pdflatex_fallback(&self, file: &OsStr, stem: &OsStr, dir: &Path) -> Result<()> {
        let first = self.pdflatex(file, dir)?;

        if needs_bibtex(&first.stdout) {
            info!("Running bibtex...");
            match self.run("bibtex", &[stem], dir) {
                Ok(out) if !out.status.success() => warn!(status = %out.status, "bibtex reported errors"),
                Ok(_) => {}
                Err(e) => warn!("bibtex failed: {e}"),
            }
        }

        for _ in 0..self.options.pdflatex_reruns {
            self.pdflatex(file, dir)?;
        }
        Ok(())
    }
}

impl Toolchain for LatexToolchain {
    fn compile(&self, project_dir: &Path, main_tex: &Path) -> Result<PathBuf> {
        let main_path = project_dir.join(main_tex);
        let dir = main_path.parent().unwrap_or(project_dir).to_path_buf();
        let (Some(file), Some(stem)) = (main_path.file_name(), main_path.file_stem()) else {
            return Err(Error::MissingArtifact(main_path));
        };
        let pdf = dir.join(Path::new(stem).with_extension("pdf"));

        info!("Compiling {} in {}", file.to_string_lossy(), dir.display());
        if !self.latexmk(file, &dir) {
            warn!("latexmk failed, trying pdflatex...");
            if let Err(e) = self.pdflatex_fallback(file, stem, &dir) {
                error!("Error compiling LaTeX: {e}");
                return Err(e);
            }
        }

        if pdf.is_file() {
            info!("Successfully compiled: {}", pdf.display());
            Ok(pdf)
        } else {
            error!("PDF not generated. Compilation failed.");
            Err(Error::MissingArtifact(pdf))
        }
    }
}

/// Whether pdflatex output indicates a bibliography pass is required.
pub fn needs_bibtex(output: &str) -> bool {
    output.contains("No file") && output.contains(".aux")
}
