//! Code generation from catalog entries.
//!
//! Each [`CatalogEntry`](crate::CatalogEntry) produces two pieces of source:
//! a registration fragment that builds the API descriptor, and a header
//! declaration for its handler function. Generation is pure: the same catalog
//! always yields byte-identical output.
//!
//! ```text
//! Catalog (key order)
//!     ↓
//!  [generate]
//!     ↓
//!  EntryCode per key
//!     ├─→ fragment     → %REGISTERAPIS%
//!     └─→ declaration  → %APIHANDLERHEADERS%
//! ```
//!
//! - [`naming`] derives the canonical symbol and file name from a key
//! - [`registration`] renders the fragment and declaration text

pub mod naming;
pub mod registration;

pub use registration::{handler_declaration, raw_string, registration_fragment};

use crate::catalog::Catalog;

/// Generated source for one catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryCode {
    pub key: String,
    pub symbol: String,
    pub fragment: String,
    pub declaration: String,
}

/// Generated source for a whole catalog, in key order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedCode {
    pub entries: Vec<EntryCode>,
}

impl GeneratedCode {
    /// All registration fragments joined for the `%REGISTERAPIS%` slot
    pub fn registrations(&self) -> String {
        self.entries
            .iter()
            .map(|e| e.fragment.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// All declarations joined for the `%APIHANDLERHEADERS%` slot
    pub fn declarations(&self) -> String {
        self.entries
            .iter()
            .map(|e| e.declaration.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Expression reading the URI parameter at a 1-based position
pub fn path_component_expr(position: usize) -> String {
    format!("apiRequest->pathComponentAt({position})")
}

/// Expression reading a named body parameter
pub fn body_parameter_expr(name: &str) -> String {
    format!("apiRequest->parameter(\"{name}\")")
}

/// Generate code for every entry of the catalog
pub fn generate(catalog: &Catalog, namespace: &str) -> GeneratedCode {
    let entries = catalog
        .iter()
        .map(|(key, entry)| {
            let symbol = naming::handler_symbol(key);
            EntryCode {
                key: key.to_string(),
                fragment: registration_fragment(entry, &symbol, namespace),
                declaration: handler_declaration(&symbol),
                symbol,
            }
        })
        .collect();

    GeneratedCode { entries }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::test_support::{about, feed_get};
    use std::path::Path;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .insert("feed-get", feed_get(), Path::new("api.json"))
            .unwrap();
        catalog.insert("about", about(), Path::new("api.json")).unwrap();
        catalog
    }

    #[test]
    fn generate___catalog___follows_key_order() {
        let code = generate(&catalog(), "NS");

        let symbols: Vec<&str> = code.entries.iter().map(|e| e.symbol.as_str()).collect();

        assert_eq!(symbols, vec!["APIHandler_about", "APIHandler_feed_get"]);
    }

    #[test]
    fn declarations___joins_with_newlines() {
        let code = generate(&catalog(), "NS");

        let declarations = code.declarations();

        assert_eq!(declarations.lines().count(), 2);
        assert!(declarations.starts_with("\t\tPoco::Net::HTTPResponse::HTTPStatus APIHandler_about("));
    }

    #[test]
    fn registrations___separates_fragments_with_blank_line() {
        let code = generate(&catalog(), "NS");

        let registrations = code.registrations();

        assert!(registrations.contains("\t\t\t}\n\n\t\t{\n"));
    }

    #[test]
    fn generate___empty_catalog___yields_empty_slots() {
        let code = generate(&Catalog::new(), "NS");

        assert_eq!(code.registrations(), "");
        assert_eq!(code.declarations(), "");
    }
}
