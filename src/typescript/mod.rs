//! OpenAPI → TypeScript declaration generator.
//!
//! The output follows the layout of `openapi-typescript`: one `export`
//! per top-level section (`paths`, `webhooks`, `components`, `$defs`,
//! `external`, `operations`), two spaces of indentation per level, and every
//! component referenced through indexed access types such as
//! `components["schemas"]["ItemsArticle"]`.
//!
//! Because schema keys live two levels deep, each one starts with exactly
//! four spaces. [`crate::aggregate`] depends on that.
//!
//! ## Module Structure
//!
//! - `types`: TypeScript type IR (`TsType`, `TsProp`, ...)
//! - `schema`: JSON Schema → `TsType`
//! - `document`: section assembly (paths, components, operations)
//! - `emit`: `TsType` → source text
//! - `naming`: identifier and key helpers

mod document;
mod emit;
mod naming;
mod schema;
mod types;

use serde_json::Value;
use tracing::debug;

use crate::error::Error;

pub use naming::{is_valid_identifier, snake_case};

/// Anything that turns an OpenAPI document into declaration source text.
///
/// Implementations must keep `components.schemas` entries on lines starting
/// with exactly four spaces followed by the schema name.
pub trait TypeGenerator {
    fn generate(&self, spec: &Value) -> Result<String, Error>;
}

/// The built-in `openapi-typescript` compatible generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScriptGenerator;

impl TypeScriptGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl TypeGenerator for TypeScriptGenerator {
    fn generate(&self, spec: &Value) -> Result<String, Error> {
        let root = spec
            .as_object()
            .ok_or_else(|| Error::Generation("OpenAPI spec must be a JSON object".into()))?;
        let source = document::render_document(root);
        debug!(bytes = source.len(), "types generated");
        Ok(source)
    }
}

/// Convenience wrapper around [`TypeScriptGenerator`].
pub fn generate(spec: &Value) -> Result<String, Error> {
    TypeScriptGenerator.generate(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const DIRECTUS_SPEC: &str = r##"{
  "openapi": "3.0.1",
  "info": { "title": "Dynamic API Specification", "version": "10.10.4" },
  "paths": {
    "/items/article": {
      "get": {
        "operationId": "readItemsArticle",
        "summary": "List Items",
        "tags": ["ItemsArticle"],
        "responses": {
          "200": {
            "description": "Successful request",
            "content": {
              "application/json": {
                "schema": {
                  "type": "object",
                  "properties": {
                    "data": { "type": "array", "items": { "$ref": "#/components/schemas/ItemsArticle" } }
                  }
                }
              }
            }
          }
        }
      }
    }
  },
  "components": {
    "schemas": {
      "Users": {
        "type": "object",
        "properties": {
          "id": { "type": "string", "format": "uuid" },
          "email": { "type": "string", "format": "email", "nullable": true }
        },
        "x-collection": "directus_users"
      },
      "ItemsArticle": {
        "type": "object",
        "properties": {
          "id": { "nullable": false, "type": "integer" },
          "status": { "nullable": false, "type": "string" },
          "user_created": {
            "nullable": true,
            "oneOf": [{ "type": "string", "format": "uuid" }, { "$ref": "#/components/schemas/Users" }]
          },
          "tags": { "nullable": true, "type": "array", "items": { "type": "string" } }
        },
        "x-collection": "article"
      },
      "ItemsAuthorProfile": {
        "type": "object",
        "properties": { "bio": { "type": "string", "nullable": true } },
        "x-collection": "author_profile"
      }
    }
  }
}"##;

    #[test]
    fn generates_openapi_typescript_layout() {
        let spec: Value = serde_json::from_str(DIRECTUS_SPEC).unwrap();
        let source = generate(&spec).unwrap();

        assert!(source.starts_with("export interface paths {\n"), "got:\n{source}");
        assert!(source.contains("export type webhooks = Record<string, never>;"));
        assert!(source.contains("export interface components {\n  schemas: {\n"));
        assert!(source.contains(
            "    ItemsArticle: {\n      id?: number;\n      status?: string;\n      user_created?: string | components[\"schemas\"][\"Users\"] | null;\n      tags?: string[] | null;\n    };\n"
        ), "got:\n{source}");
        assert!(source.contains("    ItemsAuthorProfile: {\n      bio?: string | null;\n    };\n"));
        assert!(source.contains("export interface operations {\n  /** List Items */\n  readItemsArticle: {\n"));
        assert!(source.ends_with("}\n"));
    }

    #[test]
    fn schema_lines_start_with_four_spaces() {
        let spec: Value = serde_json::from_str(DIRECTUS_SPEC).unwrap();
        let source = generate(&spec).unwrap();
        let schema_lines: Vec<&str> = source
            .lines()
            .filter(|l| l.starts_with("    ") && !l.starts_with("     "))
            .filter(|l| l.trim_start().starts_with("Items") || l.trim_start().starts_with("Users"))
            .collect();
        assert_eq!(
            schema_lines,
            [
                "    Users: {",
                "    ItemsArticle: {",
                "    ItemsAuthorProfile: {"
            ]
        );
    }

    #[test]
    fn rejects_non_object_specs() {
        let err = generate(&json!("not a spec")).unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
    }

    #[test]
    fn generator_is_usable_as_trait_object() {
        let generator: &dyn TypeGenerator = &TypeScriptGenerator::new();
        let source = generator.generate(&json!({})).unwrap();
        assert!(source.contains("export interface components {"));
    }
}
