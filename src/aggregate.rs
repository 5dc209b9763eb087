//! Aggregate type synthesis and final file assembly.
//!
//! The generated source is scanned line by line for collection schemas
//! (`    Items<Name>: ...`) and a single type mapping each collection's
//! snake_case name to its schema is prepended to the output.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::Error;
use crate::typescript::snake_case;

/// Comment placed at the top of every generated file.
pub const HEADER: &str = "/** \n Arquivo gerado automaticamente pelo Directus2TS \n */";

/// Four spaces, `Items`, then the collection name up to the first colon.
static ITEM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^    Items([^:]*)").unwrap_or_else(|e| unreachable!("invalid pattern: {e}"))
});

/// One member of the aggregate type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportProperty {
    /// snake_case property name, e.g. `author_profile`
    pub key: String,
    /// Collection name as captured from the source, e.g. `AuthorProfile`
    pub collection: String,
}

impl ExportProperty {
    /// Render as a member line referencing `components["schemas"]["{prefix}{collection}"]`.
    pub fn render(&self, prefix: &str) -> String {
        format!(
            "  {}: components[\"schemas\"][\"{}{}\"];",
            self.key, prefix, self.collection
        )
    }
}

/// Collect one property per collection schema line, in source order.
///
/// Lines that do not match produce nothing, and neither does a match whose
/// name has no alphanumeric characters. When two collections map to the same
/// key, the first one wins.
pub fn export_properties(source: &str) -> Vec<ExportProperty> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut props = Vec::new();

    for line in source.split('\n') {
        let Some(captures) = ITEM_PATTERN.captures(line) else {
            continue;
        };
        let collection = captures.get(1).map_or("", |m| m.as_str());
        let key = snake_case(collection);
        if key.is_empty() {
            debug!(line, "skipping collection line without a name");
            continue;
        }
        if !seen.insert(key.clone()) {
            warn!(key = %key, collection, "duplicate collection key, keeping the first");
            continue;
        }
        props.push(ExportProperty {
            key,
            collection: collection.to_string(),
        });
    }

    props
}

/// `export type {type_name} = { ... };` for the given properties.
pub fn aggregate_type(type_name: &str, props: &[ExportProperty], prefix: &str) -> String {
    let members = props
        .iter()
        .map(|p| p.render(prefix))
        .collect::<Vec<_>>()
        .join("\n");
    format!("export type {type_name} = {{\n{members}\n}};")
}

/// Header, aggregate type and generated source, joined by single newlines.
pub fn render_output(type_name: &str, source: &str, prefix: &str) -> String {
    let props = export_properties(source);
    assemble(type_name, &props, source, prefix)
}

fn assemble(type_name: &str, props: &[ExportProperty], source: &str, prefix: &str) -> String {
    debug!(collections = props.len(), "aggregate type synthesized");
    [HEADER, &aggregate_type(type_name, props, prefix), source].join("\n")
}

/// Render the final file and write it to `path`, replacing any existing file.
/// Returns the number of collections in the aggregate type.
pub fn write_output(path: &Path, type_name: &str, source: &str, prefix: &str) -> Result<usize, Error> {
    let props = export_properties(source);
    let output = assemble(type_name, &props, source, prefix);
    std::fs::write(path, output).map_err(|source| Error::WriteFile {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), collections = props.len(), "types written");
    Ok(props.len())
}
