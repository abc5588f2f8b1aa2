//! Canonical names derived from catalog keys.
//!
//! Every artifact tied to an entry (the handler function, its declaration and
//! its source file) is named from the same normalized key, so a key always
//! maps to exactly one symbol and one file name.
//!
//! | Key | Function | Output |
//! |-----|----------|--------|
//! | `feed-get` | [`normalize_key`] | `feed_get` |
//! | `feed-get` | [`handler_symbol`] | `APIHandler_feed_get` |
//! | `feed-get` | [`handler_file_name`] | `APIHandler_feed_get.cpp` |

/// Prefix shared by every generated handler symbol.
pub const HANDLER_PREFIX: &str = "APIHandler_";

/// Extension of handler source files.
pub const HANDLER_EXTENSION: &str = "cpp";

/// Replace every character that cannot appear in an identifier with `_`.
///
/// # Examples
///
/// ```
/// use apigen_core::codegen::naming::normalize_key;
///
/// assert_eq!(normalize_key("feed-get"), "feed_get");
/// assert_eq!(normalize_key("source.getstatus"), "source_getstatus");
/// ```
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Name of the handler function for a key.
pub fn handler_symbol(key: &str) -> String {
    format!("{HANDLER_PREFIX}{}", normalize_key(key))
}

/// File name the handler for a key is stored under.
pub fn handler_file_name(key: &str) -> String {
    format!("{}.{HANDLER_EXTENSION}", handler_symbol(key))
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    #[test]
    fn normalize_key___replaces_dashes() {
        assert_eq!(normalize_key("feed-get"), "feed_get");
        assert_eq!(normalize_key("a-b-c"), "a_b_c");
    }

    #[test]
    fn normalize_key___replaces_other_punctuation() {
        assert_eq!(normalize_key("user.get-by id"), "user_get_by_id");
        assert_eq!(normalize_key("café"), "caf_");
    }

    #[test]
    fn normalize_key___keeps_alphanumerics_and_underscores() {
        assert_eq!(normalize_key("posts_list2"), "posts_list2");
        assert_eq!(normalize_key("About"), "About");
    }

    #[test]
    fn handler_symbol___prefixes_normalized_key() {
        assert_eq!(handler_symbol("feed-get"), "APIHandler_feed_get");
        assert_eq!(handler_symbol("index"), "APIHandler_index");
    }

    #[test]
    fn handler_file_name___appends_extension() {
        assert_eq!(handler_file_name("feed-get"), "APIHandler_feed_get.cpp");
    }
}
