//! Generator configuration
//!
//! The configuration file names the schema root, the schema file filter and
//! the destination directories. Every path in it is relative to the project
//! root passed on the command line. Keys are kebab-case so the JSON configs
//! used by existing projects load unchanged; TOML is the default format.

use crate::error::{GenError, GenResult};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Default C++ namespace the generated handlers live in
pub const DEFAULT_NAMESPACE: &str = "ZapFR::Server";

pub const REGISTRATION_OUTPUT: &str = "APIRequestHandlerRegistration.cpp";
pub const HEADER_OUTPUT: &str = "APIHandlers.h";
pub const MANIFEST_OUTPUT: &str = "CMakeLists.txt";
const TEMPLATE_EXTENSION: &str = ".tpl";

/// Contents of the generator configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Directory holding the schema files
    pub api_json_files_root: String,

    /// Schema file name prefix (e.g. `api`)
    pub api_prefix: String,

    /// Schema file name suffix (e.g. `.json`)
    pub api_suffix: String,

    /// Source root: registration output, build manifest, manifest path base
    pub dest_src: String,

    /// Include directory: header output
    pub dest_include: String,

    /// Root of the handler tree
    pub dest_handlers: String,

    /// License text written at the top of every new stub
    #[serde(default, alias = "handler-license")]
    pub handler_copyright: String,

    /// C++ namespace used for descriptors and handler symbols
    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(default)]
    pub registration_template: Option<String>,

    #[serde(default)]
    pub header_template: Option<String>,

    #[serde(default)]
    pub manifest_template: Option<String>,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl Config {
    /// Load configuration from a file
    ///
    /// Files ending in `.json` are read as JSON, anything else as TOML.
    pub fn from_file(path: impl AsRef<Path>) -> GenResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| GenError::io(path, e))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let parsed = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        };

        parsed.map_err(|message| GenError::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Load and validate configuration from a file
    pub fn load(path: impl AsRef<Path>) -> GenResult<Self> {
        let path = path.as_ref();
        let config = Self::from_file(path)?;
        config.validate().map_err(|message| GenError::Config {
            path: path.to_path_buf(),
            message,
        })?;
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Parse configuration from JSON text
    pub fn from_json_str(content: &str) -> Result<Self, String> {
        serde_json::from_str(content).map_err(|e| e.to_string())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("api-json-files-root", &self.api_json_files_root),
            ("dest-src", &self.dest_src),
            ("dest-include", &self.dest_include),
            ("dest-handlers", &self.dest_handlers),
        ];

        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(format!("'{key}' cannot be empty"));
            }
        }

        let optional = [
            ("registration-template", &self.registration_template),
            ("header-template", &self.header_template),
            ("manifest-template", &self.manifest_template),
        ];

        let all_paths = required
            .iter()
            .map(|(key, value)| (*key, value.as_str()))
            .chain(
                optional
                    .iter()
                    .filter_map(|(key, value)| value.as_deref().map(|v| (*key, v))),
            );

        for (key, value) in all_paths {
            if Path::new(value).is_absolute() {
                return Err(format!(
                    "'{key}' must be relative to the project root, got {value}"
                ));
            }
        }

        if self.namespace.trim().is_empty() {
            return Err("'namespace' cannot be empty".to_string());
        }

        Ok(())
    }

    /// Resolve every configured path against the project root
    pub fn layout(&self, project_root: impl AsRef<Path>) -> Layout {
        let root = project_root.as_ref();
        let resolve = |rel: &str| normalize(&root.join(rel));

        let source_root = resolve(&self.dest_src);
        let include_root = resolve(&self.dest_include);

        let template_or = |custom: &Option<String>, dir: &Path, output: &str| match custom {
            Some(rel) => resolve(rel),
            None => dir.join(format!("{output}{TEMPLATE_EXTENSION}")),
        };

        Layout {
            schema_root: resolve(&self.api_json_files_root),
            handler_root: resolve(&self.dest_handlers),
            registration_template: template_or(
                &self.registration_template,
                &source_root,
                REGISTRATION_OUTPUT,
            ),
            header_template: template_or(&self.header_template, &include_root, HEADER_OUTPUT),
            manifest_template: template_or(&self.manifest_template, &source_root, MANIFEST_OUTPUT),
            registration_output: source_root.join(REGISTRATION_OUTPUT),
            header_output: include_root.join(HEADER_OUTPUT),
            manifest_output: source_root.join(MANIFEST_OUTPUT),
            source_root,
            include_root,
        }
    }
}

/// Absolute locations of everything a run reads and writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub schema_root: PathBuf,
    pub source_root: PathBuf,
    pub include_root: PathBuf,
    pub handler_root: PathBuf,
    pub registration_template: PathBuf,
    pub header_template: PathBuf,
    pub manifest_template: PathBuf,
    pub registration_output: PathBuf,
    pub header_output: PathBuf,
    pub manifest_output: PathBuf,
}

/// Lexically normalize a path, dropping `.` and folding `..`
///
/// The filesystem is never consulted, so the result is stable whether or not
/// the directories exist yet.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
