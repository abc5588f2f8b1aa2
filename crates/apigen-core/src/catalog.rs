//! API catalog loading
//!
//! A catalog is the merge of every schema file under the schema root whose
//! name matches the configured prefix and suffix. Each schema file is a flat
//! JSON object mapping an API key to its [`CatalogEntry`]. Keys must be unique
//! across all files; the merged catalog always iterates in key order.

use crate::error::{GenError, GenResult};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A positional URI parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UriParameter {
    pub name: String,
    pub description: String,
}

/// A named request body parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyParameter {
    pub name: String,
    #[serde(default)]
    pub required: bool,
    pub description: String,
}

/// One API endpoint as declared in a schema file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub section: String,
    pub description: String,
    pub method: String,
    /// Router path, usually a regular expression
    pub path: String,
    /// Human readable path, e.g. `/feed/<feedID>`
    pub pretty_path: String,

    #[serde(default)]
    pub uri_parameters: Vec<UriParameter>,

    #[serde(default, rename = "parameters")]
    pub body_parameters: Vec<BodyParameter>,

    #[serde(rename = "requireCredentials")]
    pub requires_credentials: bool,

    pub content_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_output: Option<String>,

    /// `None` when the schema does not mention uploads at all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepts_file_uploads: Option<bool>,
}

/// File name filter for schema files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaFilter {
    pub prefix: String,
    pub suffix: String,
}

impl SchemaFilter {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    pub fn matches(&self, file_name: &str) -> bool {
        file_name.starts_with(&self.prefix) && file_name.ends_with(&self.suffix)
    }
}

/// Merged, key-ordered collection of catalog entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: BTreeMap<String, CatalogEntry>,
    origins: BTreeMap<String, PathBuf>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, failing if the key is already present
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        entry: CatalogEntry,
        origin: &Path,
    ) -> GenResult<()> {
        let key = key.into();

        if let Some(first) = self.origins.get(&key) {
            return Err(GenError::DuplicateKey {
                key,
                file: origin.to_path_buf(),
                first_defined_in: first.clone(),
            });
        }

        self.origins.insert(key.clone(), origin.to_path_buf());
        self.entries.insert(key, entry);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&CatalogEntry> {
        self.entries.get(key)
    }

    /// Schema file the key was loaded from
    pub fn origin(&self, key: &str) -> Option<&Path> {
        self.origins.get(key).map(PathBuf::as_path)
    }

    /// Entries in lexicographic key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CatalogEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Schema file contents, in document order
///
/// Deserialized as a list of pairs rather than a map so a key repeated
/// inside one file is reported instead of silently overwritten.
struct SchemaEntries(Vec<(String, CatalogEntry)>);

impl<'de> Deserialize<'de> for SchemaEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = SchemaEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping API keys to entries")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, entry)) = map.next_entry::<String, CatalogEntry>()? {
                    entries.push((key, entry));
                }
                Ok(SchemaEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Parse one schema file's text and merge it into `catalog`
pub fn merge_schema(catalog: &mut Catalog, text: &str, origin: &Path) -> GenResult<usize> {
    let SchemaEntries(entries) =
        serde_json::from_str(text).map_err(|source| GenError::SchemaParse {
            file: origin.to_path_buf(),
            source,
        })?;

    let count = entries.len();
    for (key, entry) in entries {
        catalog.insert(key, entry, origin)?;
    }
    Ok(count)
}

/// Load and merge every matching schema file directly under `root`
///
/// Files are read in file name order. A missing root yields an empty catalog.
pub fn load_catalog(root: &Path, filter: &SchemaFilter) -> GenResult<Catalog> {
    let mut catalog = Catalog::new();

    let dir = match fs::read_dir(root) {
        Ok(dir) => dir,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("Schema root {} does not exist, catalog is empty", root.display());
            return Ok(catalog);
        }
        Err(e) => return Err(GenError::io(root, e)),
    };

    let mut files = Vec::new();
    for dir_entry in dir {
        let dir_entry = dir_entry.map_err(|e| GenError::io(root, e))?;
        let file_name = dir_entry.file_name().to_string_lossy().to_string();
        if !filter.matches(&file_name) {
            continue;
        }
        // follows symlinks, so linked schema files are picked up
        let path = dir_entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    for file in &files {
        let text = fs::read_to_string(file).map_err(|e| GenError::io(file, e))?;
        let count = merge_schema(&mut catalog, &text, file)?;
        debug!("Loaded {} entries from {}", count, file.display());
    }

    debug!(
        "Catalog has {} entries from {} schema file(s)",
        catalog.len(),
        files.len()
    );
    Ok(catalog)
}
