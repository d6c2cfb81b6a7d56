use std::path::{Path, PathBuf};
use std::process;

use gxl_core::GxlError;

use super::{error_json, read_source, report_gxl_error};
use crate::OutputFormat;

/// Parse every file, each on its own thread, and report per file.
pub(crate) fn cmd_check(files: &[PathBuf], output: OutputFormat, quiet: bool) {
    let sources: Vec<(&Path, String)> = files
        .iter()
        .map(|f| (f.as_path(), read_source(f, output, quiet)))
        .collect();

    let results: Vec<Result<usize, GxlError>> = std::thread::scope(|s| {
        let handles: Vec<_> = sources
            .iter()
            .map(|(_, src)| s.spawn(move || gxl_core::parse(src).map(|tree| tree.items.len())))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    });

    let mut failed = 0usize;
    let mut entries = Vec::new();
    for ((file, source), result) in sources.iter().zip(&results) {
        match result {
            Ok(items) => {
                log::debug!("{}: ok, {} top-level items", file.display(), items);
                match output {
                    OutputFormat::Text => {
                        if !quiet {
                            println!("ok {}", file.display());
                        }
                    }
                    OutputFormat::Json => entries.push(serde_json::json!({
                        "file": file.display().to_string(),
                        "ok": true,
                        "items": items,
                    })),
                }
            }
            Err(e) => {
                failed += 1;
                match output {
                    OutputFormat::Text => report_gxl_error(e, source, file, output, quiet),
                    OutputFormat::Json => entries.push(serde_json::json!({
                        "file": file.display().to_string(),
                        "ok": false,
                        "error": error_json(e, file),
                    })),
                }
            }
        }
    }

    if output == OutputFormat::Json {
        let summary = serde_json::json!({
            "checked": sources.len(),
            "failed": failed,
            "results": entries,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).unwrap_or_default()
        );
    }

    if failed > 0 {
        process::exit(1);
    }
}
