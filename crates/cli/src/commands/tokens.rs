use std::path::Path;
use std::process;

use gxl_core::{GxlError, TokenKind};

use super::{read_source, report_gxl_error};
use crate::OutputFormat;

pub(crate) fn cmd_tokens(file: &Path, output: OutputFormat, quiet: bool) {
    let source = read_source(file, output, quiet);
    let tokens = match gxl_core::tokenize(&source) {
        Ok(t) => t,
        Err(e) => {
            report_gxl_error(&GxlError::from(e), &source, file, output, quiet);
            process::exit(1);
        }
    };

    match output {
        OutputFormat::Text => {
            for tok in tokens.iter().filter(|t| t.kind != TokenKind::Eof) {
                println!(
                    "{}:{}\t{:?}\t{}",
                    tok.span.line,
                    tok.span.column,
                    tok.kind,
                    tok.text(&source)
                );
            }
        }
        OutputFormat::Json => {
            let items: Vec<serde_json::Value> = tokens
                .iter()
                .map(|tok| {
                    serde_json::json!({
                        "kind": tok.kind,
                        "text": tok.text(&source),
                        "line": tok.span.line,
                        "column": tok.span.column,
                        "start": tok.span.start,
                        "end": tok.span.end,
                    })
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&items).unwrap_or_default()
            );
        }
    }
}
