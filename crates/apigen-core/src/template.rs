//! Fixed-slot template rendering
//!
//! Each output file has one template and one named slot. Rendering replaces
//! every occurrence of the slot token with the generated text and prefixes
//! the result with a "generated, do not edit" banner naming the template.
//! There are no loops, conditionals or escapes: the shapes are fixed.

use crate::error::{GenError, GenResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Separator between handler paths in the build manifest
pub const MANIFEST_SEPARATOR: &str = "\n\t";

const BANNER_WIDTH: usize = 66;

/// Placeholder a template carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Registration fragments, one per entry
    Registrations,
    /// Handler declarations, one per entry
    Declarations,
    /// Handler source paths for the build manifest
    HandlerPaths,
}

impl Slot {
    pub fn token(self) -> &'static str {
        match self {
            Slot::Registrations => "%REGISTERAPIS%",
            Slot::Declarations => "%APIHANDLERHEADERS%",
            Slot::HandlerPaths => "%HANDLERS%",
        }
    }

    /// Comment style of the file this slot's template produces
    pub fn banner(self) -> Banner {
        match self {
            Slot::Registrations | Slot::Declarations => Banner::Block,
            Slot::HandlerPaths => Banner::Hash,
        }
    }
}

/// "Do not edit" banner styles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    /// C/C++ block comment
    Block,
    /// `#` comment, for CMake
    Hash,
}

impl Banner {
    pub fn render(self, template_name: &str) -> String {
        let lines = [
            "THIS FILE IS AUTO GENERATED".to_string(),
            "DO NOT MODIFY THIS FILE, ANY CHANGES WILL BE UNDONE UPON RECOMPILE".to_string(),
            format!("USE {template_name} INSTEAD"),
        ];

        let (border, open, close) = match self {
            Banner::Block => (format!("/* {} */", "*".repeat(76)), "/* ****", "**** */"),
            Banner::Hash => ("#".repeat(78), "#####", "#####"),
        };

        let mut out = String::new();
        out.push_str(&border);
        out.push('\n');
        for line in &lines {
            out.push_str(&format!("{open} {line:<BANNER_WIDTH$} {close}\n"));
        }
        out.push_str(&border);
        out.push_str("\n\n\n\n");
        out
    }
}

/// A loaded template bound to its slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    path: PathBuf,
    slot: Slot,
    text: String,
}

impl Template {
    /// Read a template from disk
    pub fn load(path: &Path, slot: Slot) -> GenResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| GenError::io(path, e))?;
        Self::parse(path, text, slot)
    }

    /// Build a template from text, checking it carries its slot token
    pub fn parse(path: impl Into<PathBuf>, text: String, slot: Slot) -> GenResult<Self> {
        let path = path.into();
        if !text.contains(slot.token()) {
            return Err(GenError::Template {
                path,
                message: format!("placeholder {} not found", slot.token()),
            });
        }
        Ok(Self { path, slot, text })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// File name shown in the banner
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Banner followed by the template with its slot filled in
    pub fn render(&self, value: &str) -> String {
        let mut out = self.slot.banner().render(&self.name());
        out.push_str(&self.text.replace(self.slot.token(), value));
        out
    }
}

/// Sorted, de-duplicated handler paths joined for the manifest slot
pub fn manifest_list<S: AsRef<str>>(paths: &[S]) -> String {
    let mut sorted: Vec<&str> = paths.iter().map(|p| p.as_ref()).collect();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.join(MANIFEST_SEPARATOR)
}
