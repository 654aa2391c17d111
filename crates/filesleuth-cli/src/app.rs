/// Top-level CLI flow: parse, set up logging, scan, render, export.
use crate::args::Cli;
use crate::logging;
use crate::prompt::{Prompt, Request};
use crate::render::render;
use anyhow::{Context, Result};
use clap::Parser;
use filesleuth_core::model::size::format_size;
use filesleuth_core::report::{write_csv, write_json};
use filesleuth_core::scanner::progress::ScanProgress;
use filesleuth_core::{start_scan, ScanConfig, ScanResult};
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Where (and how much) to write besides the console report.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    pub top: usize,
    pub json: Option<PathBuf>,
    pub csv: Option<PathBuf>,
    /// Print running counters to stderr while scanning.
    pub show_progress: bool,
}

impl From<&Cli> for ReportOptions {
    fn from(cli: &Cli) -> Self {
        Self {
            top: cli.top,
            json: cli.json.clone(),
            csv: cli.csv.clone(),
            show_progress: true,
        }
    }
}

/// Parse the command line and run.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.no_color, &cli.log_file)?;
    info!("FileSleuth starting");

    let config = cli.scan_config();
    config.validate()?;
    let options = ReportOptions::from(&cli);

    match &cli.directory {
        Some(directory) => {
            let mut stdout = io::stdout().lock();
            audit(directory, config, &options, &mut stdout)?;
        }
        None => interactive(config, &options)?,
    }
    Ok(())
}

/// Prompt for directories until the user exits.
fn interactive(config: ScanConfig, options: &ReportOptions) -> Result<()> {
    let mut prompt = Prompt::new(io::stdin().lock(), io::stdout(), config.size_threshold);
    session(&mut prompt, &config, options, &mut io::stdout())
}

/// The prompt loop. A failed audit is reported on `out` and the user is
/// asked again; only prompt I/O errors end the session early.
pub fn session<R, P, W>(
    prompt: &mut Prompt<R, P>,
    config: &ScanConfig,
    options: &ReportOptions,
    out: &mut W,
) -> Result<()>
where
    R: BufRead,
    P: Write,
    W: Write,
{
    loop {
        writeln!(out, "If you want to exit press '1'")?;
        match prompt.next_request()? {
            Request::Exit => return Ok(()),
            Request::Scan {
                directory,
                threshold,
            } => {
                writeln!(out, "Analyzing directory...")?;
                let config = config.clone().with_size_threshold(threshold);
                if let Err(err) = audit(&directory, config, options, out) {
                    error!("Audit of {} failed: {err:#}", directory.display());
                    writeln!(out, "Error: {err:#}. Please try again.")?;
                }
            }
        }
    }
}

/// Scan `directory`, render the report to `out`, and write any exports.
pub fn audit<W: Write>(
    directory: &Path,
    config: ScanConfig,
    options: &ReportOptions,
    out: &mut W,
) -> Result<ScanResult> {
    let handle = start_scan(directory.to_path_buf(), config)
        .with_context(|| format!("cannot scan {}", directory.display()))?;

    for message in handle.progress_rx.iter() {
        if !options.show_progress {
            continue;
        }
        match message {
            ScanProgress::Update {
                files_scanned,
                bytes_scanned,
                failures,
                ..
            } => eprint!(
                "\r  {files_scanned} files, {}, {failures} errors",
                format_size(bytes_scanned)
            ),
            ScanProgress::Complete { .. } | ScanProgress::Cancelled => eprintln!(),
            // Already logged by the scanner.
            ScanProgress::Error { .. } => {}
        }
    }

    let result = handle.join()?;
    render(out, &result, options.top)?;
    out.flush()?;
    export(&result, options)?;
    Ok(result)
}

fn export(result: &ScanResult, options: &ReportOptions) -> Result<()> {
    if let Some(path) = &options.json {
        let file = File::create(path)
            .with_context(|| format!("cannot create JSON report {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        write_json(result, &mut writer)
            .and_then(|()| writer.flush().map_err(Into::into))
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("JSON report written to {}", path.display());
    }
    if let Some(path) = &options.csv {
        let file = File::create(path)
            .with_context(|| format!("cannot create CSV report {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        write_csv(result, &mut writer)
            .and_then(|()| writer.flush().map_err(Into::into))
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("CSV report written to {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn failed_audit_keeps_the_session_going() {
        let tree = TempDir::new().unwrap();
        std::fs::write(tree.path().join("a.txt"), b"hello").unwrap();
        let options = ReportOptions {
            top: 1,
            json: Some(tree.path().join("no-such-dir").join("report.json")),
            csv: None,
            show_progress: false,
        };

        let input = format!("{}\n\n1\n", tree.path().display());
        let mut prompt_out = Vec::new();
        let mut out = Vec::new();
        let mut prompt = Prompt::new(input.as_bytes(), &mut prompt_out, 100);
        session(&mut prompt, &ScanConfig::default(), &options, &mut out).unwrap();
        drop(prompt);

        let out = String::from_utf8(out).unwrap();
        let prompt_out = String::from_utf8(prompt_out).unwrap();
        assert!(out.contains("Text (1 files): 5 bytes"));
        assert!(out.contains("Error: cannot create JSON report"));
        assert!(out.contains("Please try again."));
        assert_eq!(out.matches("If you want to exit press '1'").count(), 2);
        assert_eq!(prompt_out.matches("Enter the directory to analyze: ").count(), 2);
    }
}
