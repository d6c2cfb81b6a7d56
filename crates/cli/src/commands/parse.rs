use std::path::Path;
use std::process;

use super::{read_source, report_gxl_error};
use crate::OutputFormat;

pub(crate) fn cmd_parse(file: &Path, output: OutputFormat, quiet: bool) {
    let source = read_source(file, output, quiet);
    match gxl_core::parse(&source) {
        Ok(tree) => {
            log::debug!("{}: {} top-level items", file.display(), tree.items.len());
            let pretty = serde_json::to_string_pretty(&tree)
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            println!("{}", pretty);
        }
        Err(e) => {
            report_gxl_error(&e, &source, file, output, quiet);
            process::exit(1);
        }
    }
}
