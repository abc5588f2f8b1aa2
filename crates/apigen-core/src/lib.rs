//! apigen-core - keeps a hand-written API handler tree in sync with a JSON catalog
//!
//! This crate provides the pieces of an `apigen` run:
//! - [`catalog`] merges schema files into a key-ordered [`Catalog`]
//! - [`codegen`] turns entries into registration fragments and declarations
//! - [`template`] fills the fixed output templates
//! - [`scaffold`] finds or stubs the handler file for each entry
//! - [`docblock`] rewrites the `// ::API` documentation region of a handler
//! - [`pipeline`] plans a whole run in memory and commits the changed files
//!
//! ```text
//! Load → Generate → { Render, Scaffold → Inject } → Commit
//! ```

pub mod catalog;
pub mod codegen;
pub mod config;
pub mod docblock;
mod error;
pub mod output;
pub mod pipeline;
pub mod scaffold;
pub mod template;

#[cfg(test)]
mod test_support;

pub use catalog::{BodyParameter, Catalog, CatalogEntry, SchemaFilter, UriParameter, load_catalog};
pub use config::{Config, Layout};
pub use error::{GenError, GenResult};
pub use pipeline::{Plan, RunReport, Warning, plan, run, run_config_file};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Catalog, CatalogEntry, Config, GenError, GenResult, RunReport, Warning, run,
        run_config_file,
    };
}
