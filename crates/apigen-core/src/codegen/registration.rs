//! Registration fragments and handler declarations.
//!
//! Both outputs are pure functions of a [`CatalogEntry`] and its handler
//! symbol. The indentation matches the slots in the registration and header
//! templates, so the rendered files diff cleanly against hand-maintained ones.

use crate::catalog::CatalogEntry;

const BODY_INDENT: &str = "\t\t\t\t";

/// Delimiter used when a value contains the plain raw-string terminator.
const RAW_DELIMITER: &str = "apigen";

/// Quote `value` as a C++ raw string literal.
///
/// Falls back to a delimited raw string when the value itself contains `)"`.
pub fn raw_string(value: &str) -> String {
    if value.contains(")\"") {
        format!("R\"{RAW_DELIMITER}({value}){RAW_DELIMITER}\"")
    } else {
        format!("R\"({value})\"")
    }
}

fn cpp_bool(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Source fragment that builds and registers the descriptor for one entry.
pub fn registration_fragment(entry: &CatalogEntry, symbol: &str, namespace: &str) -> String {
    let mut out = String::new();

    out.push_str("\t\t{\n");
    out.push_str(&format!(
        "{BODY_INDENT}auto entry = std::make_unique<{namespace}::API>(daemon, {}, {});\n",
        raw_string(&entry.section),
        raw_string(&entry.description)
    ));
    out.push_str(&format!(
        "{BODY_INDENT}entry->setMethod(\"{}\");\n",
        entry.method
    ));
    out.push_str(&format!(
        "{BODY_INDENT}entry->setPath({}, {});\n",
        raw_string(&entry.path),
        raw_string(&entry.pretty_path)
    ));

    for param in &entry.uri_parameters {
        out.push_str(&format!(
            "{BODY_INDENT}entry->addURIParameter({{{}, {}}});\n",
            raw_string(&param.name),
            raw_string(&param.description)
        ));
    }

    for param in &entry.body_parameters {
        out.push_str(&format!(
            "{BODY_INDENT}entry->addBodyParameter({{{}, {}, {}}});\n",
            raw_string(&param.name),
            cpp_bool(param.required),
            raw_string(&param.description)
        ));
    }

    out.push_str(&format!(
        "{BODY_INDENT}entry->setRequiresCredentials({});\n",
        cpp_bool(entry.requires_credentials)
    ));
    out.push_str(&format!(
        "{BODY_INDENT}entry->setContentType({});\n",
        raw_string(&entry.content_type)
    ));

    if let Some(json_output) = &entry.json_output {
        out.push_str(&format!(
            "{BODY_INDENT}entry->setJSONOutput({});\n",
            raw_string(json_output)
        ));
    }

    out.push_str(&format!(
        "{BODY_INDENT}entry->setHandler({namespace}::{symbol});\n"
    ));

    if let Some(accepts) = entry.accepts_file_uploads {
        out.push_str(&format!(
            "{BODY_INDENT}entry->setAcceptsFileUploads({});\n",
            cpp_bool(accepts)
        ));
    }

    out.push_str(&format!("{BODY_INDENT}msAPIs.emplace_back(std::move(entry));\n"));
    out.push_str("\t\t\t}\n");

    out
}

/// Single-line prototype for the handler function.
pub fn handler_declaration(symbol: &str) -> String {
    format!(
        "\t\tPoco::Net::HTTPResponse::HTTPStatus {symbol}(APIRequest* apiRequest, Poco::Net::HTTPServerResponse& response);"
    )
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::test_support::{about, feed_get};

    #[test]
    fn raw_string___plain_value___uses_short_form() {
        assert_eq!(raw_string("Feeds"), "R\"(Feeds)\"");
    }

    #[test]
    fn raw_string___value_with_terminator___uses_delimiter() {
        assert_eq!(
            raw_string("call f(\"x\")\" now"),
            "R\"apigen(call f(\"x\")\" now)apigen\""
        );
    }

    #[test]
    fn registration_fragment___full_entry___emits_statements_in_order() {
        let fragment = registration_fragment(&feed_get(), "APIHandler_feed_get", "ZapFR::Server");

        let lines: Vec<&str> = fragment.lines().map(str::trim).collect();

        assert_eq!(
            lines,
            vec![
                "{",
                "auto entry = std::make_unique<ZapFR::Server::API>(daemon, R\"(Feeds)\", R\"(Retrieves a feed)\");",
                "entry->setMethod(\"GET\");",
                "entry->setPath(R\"(^\\/feed\\/([0-9]+)\\/([0-9]+)$)\", R\"(/feed/<feedId>/<limit>)\");",
                "entry->addURIParameter({R\"(feedId)\", R\"(The id of the feed)\"});",
                "entry->addURIParameter({R\"(limit)\", R\"(Maximum number of posts)\"});",
                "entry->addBodyParameter({R\"(getData)\", true, R\"(Whether to fetch the feed data)\"});",
                "entry->setRequiresCredentials(true);",
                "entry->setContentType(R\"(application/json)\");",
                "entry->setJSONOutput(R\"(Object)\");",
                "entry->setHandler(ZapFR::Server::APIHandler_feed_get);",
                "msAPIs.emplace_back(std::move(entry));",
                "}",
            ]
        );
    }

    #[test]
    fn registration_fragment___no_optional_fields___omits_them() {
        let fragment = registration_fragment(&about(), "APIHandler_about", "ZapFR::Server");

        assert!(!fragment.contains("setJSONOutput"));
        assert!(!fragment.contains("setAcceptsFileUploads"));
        assert!(!fragment.contains("addURIParameter"));
        assert!(fragment.contains("entry->setRequiresCredentials(false);"));
    }

    #[test]
    fn registration_fragment___upload_flag_present___emits_its_value() {
        let mut entry = about();
        entry.accepts_file_uploads = Some(false);

        let fragment = registration_fragment(&entry, "APIHandler_about", "ZapFR::Server");

        assert!(fragment.contains("entry->setAcceptsFileUploads(false);"));
        let handler = fragment.find("setHandler").unwrap();
        let uploads = fragment.find("setAcceptsFileUploads").unwrap();
        assert!(handler < uploads);
    }

    #[test]
    fn registration_fragment___custom_namespace___qualifies_descriptor_and_handler() {
        let fragment = registration_fragment(&about(), "APIHandler_about", "Acme::Api");

        assert!(fragment.contains("std::make_unique<Acme::Api::API>"));
        assert!(fragment.contains("entry->setHandler(Acme::Api::APIHandler_about);"));
    }

    #[test]
    fn registration_fragment___same_entry___is_byte_identical() {
        let a = registration_fragment(&feed_get(), "APIHandler_feed_get", "NS");
        let b = registration_fragment(&feed_get(), "APIHandler_feed_get", "NS");

        assert_eq!(a, b);
    }

    #[test]
    fn handler_declaration___uses_symbol() {
        assert_eq!(
            handler_declaration("APIHandler_feed_get"),
            "\t\tPoco::Net::HTTPResponse::HTTPStatus APIHandler_feed_get(APIRequest* apiRequest, Poco::Net::HTTPServerResponse& response);"
        );
    }
}
