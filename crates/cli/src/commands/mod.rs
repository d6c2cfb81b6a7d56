pub(crate) mod check;
pub(crate) mod fmt;
pub(crate) mod parse;
pub(crate) mod tokens;

use std::path::Path;
use std::process;

use gxl_core::GxlError;

use crate::{report_error, OutputFormat};

/// Read a source file or exit with status 1.
pub(crate) fn read_source(file: &Path, output: OutputFormat, quiet: bool) -> String {
    match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error reading file '{}': {}", file.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

/// The JSON form of an error, tagged with the file it came from.
pub(crate) fn error_json(err: &GxlError, file: &Path) -> serde_json::Value {
    let mut value = err.to_json_value();
    value["file"] = serde_json::json!(file.display().to_string());
    value
}

/// Print a lex/parse error: a rendered diagnostic in text mode, the error
/// object in JSON mode. JSON errors are printed even when quiet.
pub(crate) fn report_gxl_error(
    err: &GxlError,
    source: &str,
    file: &Path,
    output: OutputFormat,
    quiet: bool,
) {
    match output {
        OutputFormat::Json => {
            let err_json = serde_json::to_string_pretty(&error_json(err, file))
                .unwrap_or_else(|_| format!("{{\"error\": \"{:?}\"}}", err));
            eprintln!("{}", err_json);
        }
        OutputFormat::Text => {
            if !quiet {
                eprint!("{}", err.render(source, &file.display().to_string()));
            }
        }
    }
}
