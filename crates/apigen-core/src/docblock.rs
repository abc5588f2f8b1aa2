//! Documentation blocks inside handler files
//!
//! A handler file may contain a region bounded by an open-tag line
//! (`// ::API`) and a close-tag line (`// API::`). The interior of the first
//! such region is owned by the generator and rewritten from the catalog on
//! every run; the tag lines and everything outside them belong to the author.
//!
//! The region is found with a line scanner rather than a pattern match:
//!
//! ```text
//! Before --open tag--> Inside --close tag--> After
//! ```
//!
//! A close tag seen in `Before` is ordinary text, a second open tag seen in
//! `Inside` is interior text, and nothing in `After` is looked at. An open tag
//! that is never closed means the file has no marker pair.

use crate::catalog::CatalogEntry;
use crate::codegen::{body_parameter_expr, path_component_expr};
use std::ops::Range;

/// Prefix of the open-tag line. `// ::API>` written by older stubs also matches.
pub const OPEN_TAG: &str = "// ::API";

/// The close-tag line
pub const CLOSE_TAG: &str = "// API::";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Before,
    Inside,
    After,
}

/// Byte ranges of the first marker pair in a text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerRegion {
    /// The open-tag line, including its line ending
    pub open_line: Range<usize>,
    /// Everything between the two tag lines
    pub interior: Range<usize>,
    /// The close-tag line, including its line ending if any
    pub close_line: Range<usize>,
}

/// Outcome of injecting a block into a file's text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Injection {
    /// The interior changed; holds the complete new text
    Updated(String),
    /// The interior already holds the block
    Unchanged,
    /// No open/close pair was found
    MissingMarkers,
}

fn is_open_tag(line: &str) -> bool {
    line.trim().starts_with(OPEN_TAG)
}

fn is_close_tag(line: &str) -> bool {
    line.trim() == CLOSE_TAG
}

/// Find the first marker region
pub fn locate_region(text: &str) -> Option<MarkerRegion> {
    let mut state = ScanState::Before;
    let mut offset = 0;
    let mut open_line = 0..0;
    let mut close_line = 0..0;

    for line in text.split_inclusive('\n') {
        let span = offset..offset + line.len();
        offset = span.end;

        match state {
            ScanState::Before if is_open_tag(line) => {
                open_line = span;
                state = ScanState::Inside;
            }
            ScanState::Inside if is_close_tag(line) => {
                close_line = span;
                state = ScanState::After;
                break;
            }
            _ => {}
        }
    }

    (state == ScanState::After).then(|| MarkerRegion {
        interior: open_line.end..close_line.start,
        open_line,
        close_line,
    })
}

/// Render the documentation block for an entry
///
/// Every line ends with `\n`; [`inject`] adapts line endings to the file.
pub fn render_doc_block(entry: &CatalogEntry) -> String {
    let mut out = String::new();

    out.push_str("//\n");
    out.push_str(&format!("//\t{}\n", entry.description));
    out.push_str(&format!("//\t{} ({})\n", entry.pretty_path, entry.method));
    out.push_str("//\n");

    if !entry.uri_parameters.is_empty() {
        out.push_str("//\tURI parameters:\n");
        for (index, param) in entry.uri_parameters.iter().enumerate() {
            out.push_str(&format!(
                "//\t\t{} - {} - {}\n",
                param.name,
                param.description,
                path_component_expr(index + 1)
            ));
        }
        out.push_str("//\n");
    }

    if !entry.body_parameters.is_empty() {
        out.push_str("//\tParameters:\n");
        for param in &entry.body_parameters {
            let required = if param.required { " (REQD)" } else { "" };
            out.push_str(&format!(
                "//\t\t{}{} - {} - {}\n",
                param.name,
                required,
                param.description,
                body_parameter_expr(&param.name)
            ));
        }
        out.push_str("//\n");
    }

    out.push_str(&format!("//\tContent-Type: {}\n", entry.content_type));

    if let Some(json_output) = &entry.json_output {
        out.push_str(&format!("//\tJSON output: {json_output}\n"));
    }

    if entry.accepts_file_uploads == Some(true) {
        out.push_str("//\tAccepts file uploads\n");
    }

    out.push_str("//\n");
    out
}

/// Replace the interior of the first marker region with `block`
pub fn inject(text: &str, block: &str) -> Injection {
    let Some(region) = locate_region(text) else {
        return Injection::MissingMarkers;
    };

    let block = if text[region.open_line.clone()].ends_with("\r\n") {
        block.replace('\n', "\r\n")
    } else {
        block.to_string()
    };

    if text[region.interior.clone()] == block {
        return Injection::Unchanged;
    }

    let mut out = String::with_capacity(text.len() + block.len());
    out.push_str(&text[..region.interior.start]);
    out.push_str(&block);
    out.push_str(&text[region.interior.end..]);
    Injection::Updated(out)
}
