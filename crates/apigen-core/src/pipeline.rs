//! The generator run
//!
//! A run has two phases. [`plan`] does every read and every render in memory:
//! load the catalog, generate code, resolve handlers, inject doc blocks and
//! render the three outputs. It returns the list of files whose content would
//! change. [`Plan::commit`] then writes exactly those files. Any error during
//! planning (duplicate key, bad schema, missing template, unreadable handler)
//! therefore leaves the tree untouched.

use crate::catalog::{SchemaFilter, load_catalog};
use crate::codegen::{self, GeneratedCode};
use crate::config::{Config, Layout};
use crate::docblock::{Injection, inject, render_doc_block};
use crate::error::{GenError, GenResult};
use crate::output::{PendingWrite, WriteKind, is_current, write_atomic, write_new};
use crate::scaffold::{HandlerIndex, HandlerOrigin, ResolvedHandler, Scaffolder};
use crate::template::{Slot, Template, manifest_list};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Non-fatal conditions found during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A handler has no `// ::API` / `// API::` pair; its docs were not updated
    MissingMarkers { path: PathBuf },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MissingMarkers { path } => {
                write!(f, "::API:: tag missing for {}", path.display())
            }
        }
    }
}

/// The three templates a run renders
#[derive(Debug, Clone)]
pub struct Templates {
    pub registration: Template,
    pub header: Template,
    pub manifest: Template,
}

impl Templates {
    pub fn load(layout: &Layout) -> GenResult<Self> {
        Ok(Self {
            registration: Template::load(&layout.registration_template, Slot::Registrations)?,
            header: Template::load(&layout.header_template, Slot::Declarations)?,
            manifest: Template::load(&layout.manifest_template, Slot::HandlerPaths)?,
        })
    }
}

/// Everything a run would write, computed without touching the disk
#[derive(Debug, Clone)]
pub struct Plan {
    pub entries: usize,
    pub handlers: Vec<ResolvedHandler>,
    pub writes: Vec<PendingWrite>,
    pub unchanged: Vec<PathBuf>,
    pub warnings: Vec<Warning>,
}

impl Plan {
    /// Write every pending file
    pub fn commit(self) -> GenResult<RunReport> {
        let mut report = RunReport {
            entries: self.entries,
            unchanged: self.unchanged,
            warnings: self.warnings,
            ..RunReport::default()
        };

        for write in self.writes {
            match write.kind {
                WriteKind::Stub => write_new(&write.path, &write.contents)?,
                WriteKind::HandlerDocs | WriteKind::Output => {
                    write_atomic(&write.path, &write.contents)?
                }
            }
            match write.kind {
                WriteKind::Stub => {
                    info!("Created handler stub {}", write.path.display());
                    report.created.push(write.path);
                }
                WriteKind::HandlerDocs => {
                    info!("Updated API docs in {}", write.path.display());
                    report.updated.push(write.path);
                }
                WriteKind::Output => {
                    info!("Wrote {}", write.path.display());
                    report.outputs.push(write.path);
                }
            }
        }

        Ok(report)
    }
}

/// What a committed run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Number of catalog entries
    pub entries: usize,
    /// New handler stubs
    pub created: Vec<PathBuf>,
    /// Existing handlers whose doc block changed
    pub updated: Vec<PathBuf>,
    /// Rendered outputs that changed
    pub outputs: Vec<PathBuf>,
    /// Files that already had the right content
    pub unchanged: Vec<PathBuf>,
    pub warnings: Vec<Warning>,
}

impl RunReport {
    pub fn files_written(&self) -> usize {
        self.created.len() + self.updated.len() + self.outputs.len()
    }
}

/// Reject catalogs where two keys normalize to the same handler symbol
fn check_unique_symbols(code: &GeneratedCode) -> GenResult<()> {
    let mut seen: BTreeMap<&str, &str> = BTreeMap::new();
    for entry in &code.entries {
        if let Some(first) = seen.insert(&entry.symbol, &entry.key) {
            return Err(GenError::SymbolCollision {
                symbol: entry.symbol.clone(),
                first_key: first.to_string(),
                key: entry.key.clone(),
            });
        }
    }
    Ok(())
}

/// Compute the handler file content after doc injection
fn handler_write(
    handler: &ResolvedHandler,
    block: &str,
    plan: &mut Plan,
) -> GenResult<Option<PendingWrite>> {
    match &handler.origin {
        HandlerOrigin::Stub(stub) => {
            let contents = match inject(stub, block) {
                Injection::Updated(text) => text,
                Injection::Unchanged | Injection::MissingMarkers => stub.clone(),
            };
            Ok(Some(PendingWrite {
                path: handler.path.clone(),
                contents,
                kind: WriteKind::Stub,
            }))
        }
        HandlerOrigin::Existing => {
            let text = fs::read_to_string(&handler.path)
                .map_err(|e| GenError::io(&handler.path, e))?;
            match inject(&text, block) {
                Injection::Updated(contents) => Ok(Some(PendingWrite {
                    path: handler.path.clone(),
                    contents,
                    kind: WriteKind::HandlerDocs,
                })),
                Injection::Unchanged => {
                    debug!("API docs current in {}", handler.path.display());
                    plan.unchanged.push(handler.path.clone());
                    Ok(None)
                }
                Injection::MissingMarkers => {
                    let warning = Warning::MissingMarkers {
                        path: handler.path.clone(),
                    };
                    warn!("{}", warning);
                    plan.warnings.push(warning);
                    Ok(None)
                }
            }
        }
    }
}

/// Queue an output unless the disk already holds it
fn output_write(path: &Path, contents: String, plan: &mut Plan) -> GenResult<()> {
    if is_current(path, &contents)? {
        debug!("{} is up to date", path.display());
        plan.unchanged.push(path.to_path_buf());
    } else {
        plan.writes.push(PendingWrite {
            path: path.to_path_buf(),
            contents,
            kind: WriteKind::Output,
        });
    }
    Ok(())
}

/// Plan a run without writing anything
pub fn plan(config: &Config, project_root: &Path) -> GenResult<Plan> {
    let layout = config.layout(project_root);
    let filter = SchemaFilter::new(&config.api_prefix, &config.api_suffix);

    let catalog = load_catalog(&layout.schema_root, &filter)?;
    info!(
        "Loaded {} API entries from {}",
        catalog.len(),
        layout.schema_root.display()
    );

    let templates = Templates::load(&layout)?;
    let code = codegen::generate(&catalog, &config.namespace);
    check_unique_symbols(&code)?;

    let index = HandlerIndex::scan(&layout.handler_root)?;
    let scaffolder = Scaffolder::new(
        &index,
        &layout.handler_root,
        &layout.source_root,
        &config.handler_copyright,
        &config.namespace,
    );

    let mut plan = Plan {
        entries: catalog.len(),
        handlers: Vec::with_capacity(catalog.len()),
        writes: Vec::new(),
        unchanged: Vec::new(),
        warnings: Vec::new(),
    };

    for (key, entry) in catalog.iter() {
        let handler = scaffolder.resolve(key, entry);
        let block = render_doc_block(entry);
        if let Some(write) = handler_write(&handler, &block, &mut plan)? {
            plan.writes.push(write);
        }
        plan.handlers.push(handler);
    }

    let manifest_paths: Vec<&str> = plan
        .handlers
        .iter()
        .map(|h| h.manifest_path.as_str())
        .collect();
    let manifest = templates.manifest.render(&manifest_list(&manifest_paths));
    let registration = templates.registration.render(&code.registrations());
    let header = templates.header.render(&code.declarations());

    output_write(&layout.registration_output, registration, &mut plan)?;
    output_write(&layout.header_output, header, &mut plan)?;
    output_write(&layout.manifest_output, manifest, &mut plan)?;

    debug!(
        "Plan: {} write(s), {} unchanged, {} warning(s)",
        plan.writes.len(),
        plan.unchanged.len(),
        plan.warnings.len()
    );
    Ok(plan)
}

/// Plan and commit a run
pub fn run(config: &Config, project_root: &Path) -> GenResult<RunReport> {
    plan(config, project_root)?.commit()
}

/// Load, validate and run a configuration file
pub fn run_config_file(config_path: &Path, project_root: &Path) -> GenResult<RunReport> {
    let config = Config::load(config_path)?;
    run(&config, project_root)
}

#[cfg(test)]
#[path = "pipeline/pipeline_tests.rs"]
mod pipeline_tests;
