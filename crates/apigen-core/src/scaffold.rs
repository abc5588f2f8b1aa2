//! Handler resolution and stub synthesis
//!
//! Every catalog entry needs a handler source file somewhere under the handler
//! root. Existing files are found by their canonical name and never
//! rewritten here. Entries without one get a stub at the top of the handler
//! root with the license header, an empty doc marker pair and a function
//! skeleton that already extracts every declared parameter.

use crate::catalog::CatalogEntry;
use crate::codegen::{body_parameter_expr, naming, path_component_expr};
use crate::docblock::{CLOSE_TAG, OPEN_TAG};
use crate::error::GenResult;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

const STUB_INDENT: &str = "    ";
const STUB_INCLUDES: &[&str] = &["API.h", "APIRequest.h", "APIHandlers.h"];

/// File name → paths for every regular file under the handler root
///
/// Symlinks to files count as files; symlinked directories are not entered.
#[derive(Debug, Clone, Default)]
pub struct HandlerIndex {
    files: BTreeMap<String, Vec<PathBuf>>,
}

impl HandlerIndex {
    /// Walk the handler tree once
    ///
    /// A missing root is an empty index; it is created with the first stub.
    pub fn scan(root: &Path) -> GenResult<Self> {
        let mut files: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();

        if !root.exists() {
            debug!("Handler root {} does not exist yet", root.display());
            return Ok(Self { files });
        }

        for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
            let entry = entry?;
            // links are not followed into directories, but a linked file is a handler
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if !is_file {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            files.entry(name).or_default().push(entry.into_path());
        }

        for (name, paths) in &mut files {
            paths.sort();
            if paths.len() > 1 && name.starts_with(naming::HANDLER_PREFIX) {
                warn!(
                    "{} exists {} times under {}, using {}",
                    name,
                    paths.len(),
                    root.display(),
                    paths[0].display()
                );
            }
        }

        Ok(Self { files })
    }

    /// First path (in sorted order) of a file with this name
    pub fn find(&self, file_name: &str) -> Option<&Path> {
        self.files
            .get(file_name)
            .and_then(|paths| paths.first())
            .map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Where a resolved handler came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerOrigin {
    /// Found in the handler tree
    Existing,
    /// Not found; holds the stub to create
    Stub(String),
}

/// The handler file backing one catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHandler {
    pub key: String,
    pub path: PathBuf,
    /// Path relative to the source root, `/`-separated
    pub manifest_path: String,
    pub origin: HandlerOrigin,
}

impl ResolvedHandler {
    pub fn is_new(&self) -> bool {
        matches!(self.origin, HandlerOrigin::Stub(_))
    }
}

/// Resolves handlers for entries against a scanned tree
pub struct Scaffolder<'a> {
    index: &'a HandlerIndex,
    handler_root: &'a Path,
    source_root: &'a Path,
    license: &'a str,
    namespace: &'a str,
}

impl<'a> Scaffolder<'a> {
    pub fn new(
        index: &'a HandlerIndex,
        handler_root: &'a Path,
        source_root: &'a Path,
        license: &'a str,
        namespace: &'a str,
    ) -> Self {
        Self {
            index,
            handler_root,
            source_root,
            license,
            namespace,
        }
    }

    /// Find the entry's handler, or plan a stub for it
    pub fn resolve(&self, key: &str, entry: &CatalogEntry) -> ResolvedHandler {
        let file_name = naming::handler_file_name(key);

        let (path, origin) = match self.index.find(&file_name) {
            Some(existing) => {
                debug!("Handler for {} found at {}", key, existing.display());
                (existing.to_path_buf(), HandlerOrigin::Existing)
            }
            None => {
                let symbol = naming::handler_symbol(key);
                let stub = stub_source(entry, &symbol, self.namespace, self.license);
                (self.handler_root.join(&file_name), HandlerOrigin::Stub(stub))
            }
        };

        ResolvedHandler {
            key: key.to_string(),
            manifest_path: manifest_path(&path, self.source_root),
            path,
            origin,
        }
    }
}

/// Source of a brand-new handler file
pub fn stub_source(entry: &CatalogEntry, symbol: &str, namespace: &str, license: &str) -> String {
    let mut out = String::new();

    out.push_str(license);
    if !license.is_empty() && !license.ends_with('\n') {
        out.push('\n');
    }

    for include in STUB_INCLUDES {
        out.push_str(&format!("#include \"{include}\"\n"));
    }
    out.push('\n');

    out.push_str(&format!("{OPEN_TAG}\n{CLOSE_TAG}\n\n"));

    out.push_str(&format!(
        "Poco::Net::HTTPResponse::HTTPStatus {namespace}::{symbol}([[maybe_unused]] APIRequest* apiRequest, Poco::Net::HTTPServerResponse& response)\n"
    ));
    out.push_str("{\n");

    for (index, param) in entry.uri_parameters.iter().enumerate() {
        out.push_str(&format!(
            "{STUB_INDENT}const auto {} = {};\n",
            param.name,
            path_component_expr(index + 1)
        ));
    }
    for param in &entry.body_parameters {
        out.push_str(&format!(
            "{STUB_INDENT}const auto {} = {};\n",
            param.name,
            body_parameter_expr(&param.name)
        ));
    }
    if !entry.uri_parameters.is_empty() || !entry.body_parameters.is_empty() {
        out.push('\n');
    }

    out.push_str(&format!("{STUB_INDENT}Poco::JSON::Object o;\n"));
    out.push_str(&format!("{STUB_INDENT}o.set(\"success\", true);\n\n"));
    out.push_str(&format!(
        "{STUB_INDENT}Poco::JSON::Stringifier::stringify(o, response.send());\n\n"
    ));
    out.push_str(&format!(
        "{STUB_INDENT}return Poco::Net::HTTPResponse::HTTP_OK;\n"
    ));
    out.push_str("}\n");

    out
}

/// Path of a handler as listed in the build manifest
///
/// Relative to the source root with `/` separators. Handlers outside the
/// source root keep their full path.
pub fn manifest_path(path: &Path, source_root: &Path) -> String {
    match path.strip_prefix(source_root) {
        Ok(relative) => relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().to_string()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => path.to_string_lossy().replace('\\', "/"),
    }
}
