//! OpenAPI document handling: simplification and persistence.
//!
//! The spec stays a loosely typed `serde_json::Value`; only the keys named
//! below are ever inspected.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::Error;

/// Top-level keys dropped by [`simplify`].
pub const ROOT_DENYLIST: &[&str] = &["paths", "operations", "external", "webhooks"];

/// `components.*` keys dropped by [`simplify`].
pub const COMPONENT_DENYLIST: &[&str] = &[
    "parameters",
    "tags",
    "responses",
    "securitySchemes",
    "Auth",
];

/// Directus system schemas under `components.schemas` dropped by [`simplify`].
pub const SCHEMA_DENYLIST: &[&str] = &[
    "Query",
    "Activity",
    "Collections",
    "Fields",
    "Permissions",
    "Presets",
    "Relations",
    "Revisions",
    "Settings",
    "Operations",
    "Webhooks",
    "Flows",
    "x-metadata",
];

/// Return a copy of `spec` without the Directus system entries.
///
/// Missing keys are ignored, so applying this twice yields the same document.
/// Everything not on a denylist is kept as-is and in its original order.
pub fn simplify(spec: &Value) -> Value {
    let Some(root) = spec.as_object() else {
        return spec.clone();
    };

    let mut out = without(root, ROOT_DENYLIST);
    if let Some(Value::Object(components)) = out.get("components") {
        let mut components = without(components, COMPONENT_DENYLIST);
        if let Some(Value::Object(schemas)) = components.get("schemas") {
            let schemas = without(schemas, SCHEMA_DENYLIST);
            components.insert("schemas".to_string(), Value::Object(schemas));
        }
        out.insert("components".to_string(), Value::Object(components));
    }

    let kept_schemas = out
        .get("components")
        .and_then(|c| c.get("schemas"))
        .and_then(Value::as_object)
        .map_or(0, Map::len);
    debug!(kept_schemas, "spec simplified");
    Value::Object(out)
}

fn without(map: &Map<String, Value>, denied: &[&str]) -> Map<String, Value> {
    map.iter()
        .filter(|(key, _)| !denied.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Write `spec` as two-space indented JSON, replacing any existing file.
pub fn write_spec_file(path: &Path, spec: &Value) -> Result<(), Error> {
    let json = serde_json::to_string_pretty(spec).map_err(Error::SerializeSpec)?;
    std::fs::write(path, json).map_err(|source| Error::WriteFile {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "spec written");
    Ok(())
}

/// Schema names under `components.schemas`, in document order.
pub fn schema_names(spec: &Value) -> Vec<&str> {
    spec.get("components")
        .and_then(|c| c.get("schemas"))
        .and_then(Value::as_object)
        .map(|schemas| schemas.keys().map(String::as_str).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn directus_spec() -> Value {
        json!({
            "openapi": "3.0.1",
            "info": { "title": "Dynamic API Specification", "version": "10.10.4" },
            "components": {
                "parameters": {},
                "tags": {},
                "responses": {},
                "securitySchemes": {},
                "Auth": {},
                "schemas": {
                    "Query": {},
                    "Activity": {},
                    "Collections": {},
                    "Fields": {},
                    "Permissions": {},
                    "Presets": {},
                    "Relations": {},
                    "Revisions": {},
                    "Settings": {},
                    "Operations": {},
                    "Webhooks": {},
                    "Flows": {},
                    "x-metadata": {},
                    "Users": { "type": "object", "properties": { "id": { "type": "string" } } },
                    "CustomSchema": {},
                    "ItemsArticle": {
                        "type": "object",
                        "properties": { "title": { "type": "string", "nullable": true } },
                        "x-collection": "article"
                    }
                }
            },
            "operations": {},
            "external": {},
            "webhooks": {},
            "paths": { "/items/article": {} }
        })
    }

    #[test]
    fn simplify_removes_every_denylisted_key() {
        let simplified = simplify(&directus_spec());

        for key in ROOT_DENYLIST {
            assert!(simplified.get(key).is_none(), "{key} should be removed");
        }
        let components = simplified["components"].as_object().unwrap();
        for key in COMPONENT_DENYLIST {
            assert!(!components.contains_key(*key), "components.{key} should be removed");
        }
        let schemas = components["schemas"].as_object().unwrap();
        for key in SCHEMA_DENYLIST {
            assert!(!schemas.contains_key(*key), "schemas.{key} should be removed");
        }
    }

    #[test]
    fn simplify_preserves_other_entries_unchanged() {
        let original = directus_spec();
        let simplified = simplify(&original);

        assert_eq!(simplified["openapi"], original["openapi"]);
        assert_eq!(simplified["info"], original["info"]);
        assert_eq!(
            simplified["components"]["schemas"],
            json!({
                "Users": original["components"]["schemas"]["Users"],
                "CustomSchema": {},
                "ItemsArticle": original["components"]["schemas"]["ItemsArticle"],
            })
        );
        assert_eq!(schema_names(&simplified), ["Users", "CustomSchema", "ItemsArticle"]);
    }

    #[test]
    fn simplify_does_not_touch_its_input() {
        let original = directus_spec();
        let copy = original.clone();
        let _ = simplify(&original);
        assert_eq!(original, copy);
    }

    #[test]
    fn simplify_is_idempotent() {
        let once = simplify(&directus_spec());
        let twice = simplify(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn simplify_tolerates_missing_components() {
        let spec = json!({ "openapi": "3.0.1", "paths": {} });
        assert_eq!(simplify(&spec), json!({ "openapi": "3.0.1" }));

        let spec = json!({ "components": { "tags": {} } });
        assert_eq!(simplify(&spec), json!({ "components": {} }));
    }

    #[test]
    fn simplify_leaves_non_objects_alone() {
        assert_eq!(simplify(&json!([1, 2])), json!([1, 2]));
    }

    #[test]
    fn write_spec_file_uses_two_space_indent_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spec.json");
        std::fs::write(&path, "stale content that is longer than the new file").unwrap();

        let spec = json!({ "test": "data", "nested": { "a": [1] } });
        write_spec_file(&path, &spec).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "{\n  \"test\": \"data\",\n  \"nested\": {\n    \"a\": [\n      1\n    ]\n  }\n}"
        );
    }

    #[test]
    fn write_spec_file_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("spec.json");

        let err = write_spec_file(&path, &json!({})).unwrap_err();
        assert!(matches!(err, Error::WriteFile { .. }));
        assert!(err.to_string().contains("spec.json"), "got: {err}");
    }

    #[test]
    fn schema_names_is_empty_without_components() {
        assert!(schema_names(&json!({})).is_empty());
    }
}
