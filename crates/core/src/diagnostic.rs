//! Human-readable rendering of lex and parse errors with a source pointer.

use crate::error::GxlError;

impl GxlError {
    /// Render a report in the usual compiler shape:
    ///
    /// ```text
    /// error: expected identifier, found ']'
    ///  --> build.gxl:1:4
    ///   |
    /// 1 | #[ ]
    ///   |    ^
    ///   = expected one of: identifier
    /// ```
    pub fn render(&self, source: &str, filename: &str) -> String {
        let pos = self.position();
        let line_no = pos.line.to_string();
        let gutter = " ".repeat(line_no.len());
        let line_text = source
            .lines()
            .nth(pos.line.saturating_sub(1) as usize)
            .unwrap_or("");
        // Keep tabs so the caret lines up under the offending column.
        let pad: String = line_text
            .chars()
            .take(pos.column.saturating_sub(1) as usize)
            .map(|c| if c == '\t' { '\t' } else { ' ' })
            .collect();

        let mut out = String::new();
        out.push_str(&format!("error: {}\n", self.message()));
        out.push_str(&format!(
            "{}--> {}:{}:{}\n",
            gutter, filename, pos.line, pos.column
        ));
        out.push_str(&format!("{} |\n", gutter));
        out.push_str(&format!("{} | {}\n", line_no, line_text));
        out.push_str(&format!("{} | {}^\n", gutter, pad));
        if let GxlError::Parse(e) = self {
            if !e.expected.is_empty() {
                let alts: Vec<String> = e.expected.iter().map(|x| x.to_string()).collect();
                out.push_str(&format!("{} = expected one of: {}\n", gutter, alts.join(", ")));
            }
        }
        out
    }
}
