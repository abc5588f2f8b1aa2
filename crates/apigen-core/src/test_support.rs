//! Shared fixtures for unit tests

use crate::catalog::{BodyParameter, CatalogEntry, UriParameter};

/// A `feed-get` style entry with two URI parameters and one body parameter
pub(crate) fn feed_get() -> CatalogEntry {
    CatalogEntry {
        section: "Feeds".to_string(),
        description: "Retrieves a feed".to_string(),
        method: "GET".to_string(),
        path: r"^\/feed\/([0-9]+)\/([0-9]+)$".to_string(),
        pretty_path: "/feed/<feedId>/<limit>".to_string(),
        uri_parameters: vec![
            UriParameter {
                name: "feedId".to_string(),
                description: "The id of the feed".to_string(),
            },
            UriParameter {
                name: "limit".to_string(),
                description: "Maximum number of posts".to_string(),
            },
        ],
        body_parameters: vec![BodyParameter {
            name: "getData".to_string(),
            required: true,
            description: "Whether to fetch the feed data".to_string(),
        }],
        requires_credentials: true,
        content_type: "application/json".to_string(),
        json_output: Some("Object".to_string()),
        accepts_file_uploads: None,
    }
}

/// An entry without parameters or optional fields
pub(crate) fn about() -> CatalogEntry {
    CatalogEntry {
        section: "Misc".to_string(),
        description: "Returns version information".to_string(),
        method: "GET".to_string(),
        path: r"^\/about$".to_string(),
        pretty_path: "/about".to_string(),
        uri_parameters: Vec::new(),
        body_parameters: Vec::new(),
        requires_credentials: false,
        content_type: "application/json".to_string(),
        json_output: None,
        accepts_file_uploads: None,
    }
}
