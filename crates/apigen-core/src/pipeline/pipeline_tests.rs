#![allow(non_snake_case)]

use super::*;
use tempfile::TempDir;

const FEED_SCHEMA: &str = r#"{
    "feed-get": {
        "section": "Feeds",
        "description": "Retrieves a feed",
        "method": "GET",
        "path": "^\\/feed\\/([0-9]+)$",
        "prettyPath": "/feed/<feedID>",
        "uriParameters": [
            {"name": "feedID", "description": "The id of the feed"}
        ],
        "parameters": [],
        "requireCredentials": true,
        "contentType": "application/json"
    }
}"#;

const ABOUT_SCHEMA: &str = r#"{
    "about": {
        "section": "Misc",
        "description": "Returns version information",
        "method": "GET",
        "path": "^\\/about$",
        "prettyPath": "/about",
        "requireCredentials": false,
        "contentType": "application/json"
    }
}"#;

const REGISTRATION_TEMPLATE: &str = "void registerAPIs()\n{\n%REGISTERAPIS%\n}\n";
const HEADER_TEMPLATE: &str = "#pragma once\n\n%APIHANDLERHEADERS%\n";
const MANIFEST_TEMPLATE: &str = "set(HANDLERS\n\t%HANDLERS%\n)\n";

struct Project {
    dir: TempDir,
    config: Config,
}

impl Project {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let project = Self {
            dir,
            config: Config {
                api_json_files_root: "server/api".to_string(),
                api_prefix: "api".to_string(),
                api_suffix: ".json".to_string(),
                dest_src: "server/src".to_string(),
                dest_include: "server/include".to_string(),
                dest_handlers: "server/src/handlers".to_string(),
                handler_copyright: "// license\n\n".to_string(),
                namespace: "ZapFR::Server".to_string(),
                registration_template: None,
                header_template: None,
                manifest_template: None,
            },
        };
        project.write(
            "server/src/APIRequestHandlerRegistration.cpp.tpl",
            REGISTRATION_TEMPLATE,
        );
        project.write("server/include/APIHandlers.h.tpl", HEADER_TEMPLATE);
        project.write("server/src/CMakeLists.txt.tpl", MANIFEST_TEMPLATE);
        project.write("server/api/api-feeds.json", FEED_SCHEMA);
        project.write("server/api/api-misc.json", ABOUT_SCHEMA);
        project
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    fn write(&self, rel: &str, content: &str) {
        let path = self.path(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel)).unwrap()
    }
}

#[test]
fn plan___fresh_project___queues_stubs_and_outputs_without_writing() {
    let project = Project::new();

    let plan = plan(&project.config, project.root()).unwrap();

    assert_eq!(plan.entries, 2);
    let stubs = plan
        .writes
        .iter()
        .filter(|w| w.kind == WriteKind::Stub)
        .count();
    let outputs = plan
        .writes
        .iter()
        .filter(|w| w.kind == WriteKind::Output)
        .count();
    assert_eq!(stubs, 2);
    assert_eq!(outputs, 3);
    assert!(plan.handlers.iter().all(ResolvedHandler::is_new));
    assert!(!project.path("server/src/handlers").exists());
    assert!(!project.path("server/src/CMakeLists.txt").exists());
}

#[test]
fn run___fresh_project___creates_stubs_with_doc_blocks() {
    let project = Project::new();

    let report = run(&project.config, project.root()).unwrap();

    assert_eq!(report.created.len(), 2);
    let stub = project.read("server/src/handlers/APIHandler_feed_get.cpp");
    assert!(stub.starts_with("// license\n\n#include \"API.h\"\n"));
    assert!(stub.contains("// ::API\n//\n//\tRetrieves a feed\n"));
    assert!(stub.contains("const auto feedID = apiRequest->pathComponentAt(1);"));
    assert!(stub.contains("ZapFR::Server::APIHandler_feed_get("));
}

#[test]
fn run___fresh_project___renders_all_outputs() {
    let project = Project::new();

    let report = run(&project.config, project.root()).unwrap();

    assert_eq!(report.outputs.len(), 3);
    let manifest = project.read("server/src/CMakeLists.txt");
    assert!(manifest.starts_with("#####"));
    assert!(manifest.contains("USE CMakeLists.txt.tpl INSTEAD"));
    assert!(manifest.ends_with(
        "set(HANDLERS\n\thandlers/APIHandler_about.cpp\n\thandlers/APIHandler_feed_get.cpp\n)\n"
    ));

    let header = project.read("server/include/APIHandlers.h");
    let about = header.find("APIHandler_about").unwrap();
    let feed = header.find("APIHandler_feed_get").unwrap();
    assert!(about < feed);

    let registration = project.read("server/src/APIRequestHandlerRegistration.cpp");
    assert!(registration.contains("setHandler(ZapFR::Server::APIHandler_feed_get)"));
    assert!(!registration.contains("%REGISTERAPIS%"));
}

#[test]
fn run___second_time___writes_nothing() {
    let project = Project::new();
    run(&project.config, project.root()).unwrap();

    let report = run(&project.config, project.root()).unwrap();

    assert_eq!(report.files_written(), 0);
    assert_eq!(report.unchanged.len(), 5);
    assert!(report.warnings.is_empty());
}

#[test]
fn run___nested_existing_handler___updates_docs_in_place() {
    let project = Project::new();
    let body = "#include \"API.h\"\n\n// ::API\nstale\n// API::\n\nint body() { return 1; }\n";
    project.write("server/src/handlers/feeds/APIHandler_feed_get.cpp", body);

    let report = run(&project.config, project.root()).unwrap();

    let updated = project.path("server/src/handlers/feeds/APIHandler_feed_get.cpp");
    assert_eq!(report.updated, vec![updated]);
    assert!(!project.path("server/src/handlers/APIHandler_feed_get.cpp").exists());

    let text = project.read("server/src/handlers/feeds/APIHandler_feed_get.cpp");
    assert!(!text.contains("stale"));
    assert!(text.ends_with("// API::\n\nint body() { return 1; }\n"));
    assert!(project
        .read("server/src/CMakeLists.txt")
        .contains("\thandlers/feeds/APIHandler_feed_get.cpp\n"));
}

#[test]
fn run___handler_without_markers___warns_and_leaves_file() {
    let project = Project::new();
    let body = "int handler() { return 0; }\n";
    project.write("server/src/handlers/APIHandler_about.cpp", body);

    let report = run(&project.config, project.root()).unwrap();

    assert_eq!(report.warnings, vec![Warning::MissingMarkers {
        path: project.path("server/src/handlers/APIHandler_about.cpp"),
    }]);
    assert_eq!(project.read("server/src/handlers/APIHandler_about.cpp"), body);
    assert!(project
        .read("server/src/CMakeLists.txt")
        .contains("handlers/APIHandler_about.cpp"));
}

#[test]
fn run___duplicate_key___aborts_before_any_write() {
    let project = Project::new();
    project.write("server/api/api-dupe.json", FEED_SCHEMA);

    let err = run(&project.config, project.root()).unwrap_err();

    assert!(matches!(err, GenError::DuplicateKey { ref key, .. } if key == "feed-get"));
    assert!(!project.path("server/src/handlers").exists());
    assert!(!project.path("server/src/APIRequestHandlerRegistration.cpp").exists());
}

#[test]
fn run___keys_with_same_symbol___aborts() {
    let project = Project::new();
    project.write(
        "server/api/api-other.json",
        &FEED_SCHEMA.replace("feed-get", "feed.get"),
    );

    let err = run(&project.config, project.root()).unwrap_err();

    match err {
        GenError::SymbolCollision { symbol, first_key, key } => {
            assert_eq!(symbol, "APIHandler_feed_get");
            assert_eq!(first_key, "feed-get");
            assert_eq!(key, "feed.get");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!project.path("server/src/handlers").exists());
}

#[test]
fn run___template_without_placeholder___fails_without_writing() {
    let project = Project::new();
    project.write("server/include/APIHandlers.h.tpl", "#pragma once\n");

    let err = run(&project.config, project.root()).unwrap_err();

    assert!(matches!(err, GenError::Template { .. }));
    assert!(!project.path("server/src/handlers").exists());
    assert!(!project.path("server/src/CMakeLists.txt").exists());
}

#[test]
fn run___missing_template___returns_io_error() {
    let project = Project::new();
    fs::remove_file(project.path("server/src/CMakeLists.txt.tpl")).unwrap();

    let err = run(&project.config, project.root()).unwrap_err();

    assert!(matches!(err, GenError::Io { ref path, .. } if path.ends_with("CMakeLists.txt.tpl")));
}

#[test]
fn run___empty_schema_root___renders_empty_outputs() {
    let project = Project::new();
    fs::remove_file(project.path("server/api/api-feeds.json")).unwrap();
    fs::remove_file(project.path("server/api/api-misc.json")).unwrap();

    let report = run(&project.config, project.root()).unwrap();

    assert_eq!(report.entries, 0);
    assert!(report.created.is_empty());
    assert!(project
        .read("server/src/CMakeLists.txt")
        .ends_with("set(HANDLERS\n\t\n)\n"));
}

#[test]
fn run___template_override___reads_custom_path() {
    let mut project = Project::new();
    project.write("templates/handlers.cmake.tpl", "list(%HANDLERS%)\n");
    project.config.manifest_template = Some("templates/handlers.cmake.tpl".to_string());

    run(&project.config, project.root()).unwrap();

    let manifest = project.read("server/src/CMakeLists.txt");
    assert!(manifest.contains("USE handlers.cmake.tpl INSTEAD"));
    assert!(manifest.ends_with(
        "list(handlers/APIHandler_about.cpp\n\thandlers/APIHandler_feed_get.cpp)\n"
    ));
}

#[test]
fn run_config_file___toml___runs_project() {
    let project = Project::new();
    project.write(
        "apigen.toml",
        r#"
api-json-files-root = "server/api"
api-prefix = "api"
api-suffix = ".json"
dest-src = "server/src"
dest-include = "server/include"
dest-handlers = "server/src/handlers"
"#,
    );

    let report = run_config_file(&project.path("apigen.toml"), project.root()).unwrap();

    assert_eq!(report.entries, 2);
    assert_eq!(report.files_written(), 5);
}

#[test]
fn Warning___missing_markers___names_file() {
    let warning = Warning::MissingMarkers {
        path: PathBuf::from("handlers/APIHandler_about.cpp"),
    };

    assert_eq!(
        warning.to_string(),
        "::API:: tag missing for handlers/APIHandler_about.cpp"
    );
}

#[test]
fn RunReport___files_written___counts_every_kind() {
    let report = RunReport {
        created: vec![PathBuf::from("a")],
        updated: vec![PathBuf::from("b"), PathBuf::from("c")],
        outputs: vec![PathBuf::from("d")],
        unchanged: vec![PathBuf::from("e")],
        ..RunReport::default()
    };

    assert_eq!(report.files_written(), 4);
}
