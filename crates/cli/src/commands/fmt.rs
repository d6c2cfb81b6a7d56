use std::path::Path;
use std::process;

use gxl_core::PrintOptions;

use super::{read_source, report_gxl_error};
use crate::{report_error, OutputFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FmtMode {
    /// Canonical form to stdout
    Print,
    /// Rewrite the file in place
    Write,
    /// Fail unless already canonical
    Check,
}

impl FmtMode {
    pub(crate) fn from_flags(write: bool, check: bool) -> Self {
        match (write, check) {
            (_, true) => FmtMode::Check,
            (true, false) => FmtMode::Write,
            (false, false) => FmtMode::Print,
        }
    }
}

pub(crate) fn cmd_fmt(
    file: &Path,
    options: &PrintOptions,
    mode: FmtMode,
    output: OutputFormat,
    quiet: bool,
) {
    let source = read_source(file, output, quiet);
    let tree = match gxl_core::parse(&source) {
        Ok(t) => t,
        Err(e) => {
            report_gxl_error(&e, &source, file, output, quiet);
            process::exit(1);
        }
    };
    let formatted = gxl_core::print(&tree, options);
    let changed = formatted != source;
    log::debug!("{}: {:?}, changed = {}", file.display(), mode, changed);

    match mode {
        FmtMode::Print => print!("{}", formatted),
        FmtMode::Write => {
            if changed {
                if let Err(e) = std::fs::write(file, &formatted) {
                    let msg = format!("error writing file '{}': {}", file.display(), e);
                    report_error(&msg, output, quiet);
                    process::exit(1);
                }
            }
            report_status(file, changed, output, quiet);
        }
        FmtMode::Check => {
            report_status(file, changed, output, quiet);
            if changed {
                process::exit(1);
            }
        }
    }
}

fn report_status(file: &Path, changed: bool, output: OutputFormat, quiet: bool) {
    match output {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({ "file": file.display().to_string(), "changed": changed })
        ),
        OutputFormat::Text => {
            if !quiet {
                let status = if changed { "reformatted" } else { "unchanged" };
                println!("{} {}", status, file.display());
            }
        }
    }
}
