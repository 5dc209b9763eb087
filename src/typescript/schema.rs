//! JSON Schema (OpenAPI flavour) → `TsType`.
//!
//! References are never inlined: `#/components/schemas/Users` becomes the
//! indexed access `components["schemas"]["Users"]`, which keeps recursive
//! schemas finite.

use serde_json::Value;
use tracing::warn;

use super::naming::quoted;
use super::types::{TsLiteral, TsObject, TsProp, TsType};

/// Convert a schema node into a TypeScript type.
pub fn schema_type(schema: &Value) -> TsType {
    let obj = match schema {
        Value::Object(obj) => obj,
        Value::Bool(false) => return TsType::NEVER,
        _ => return TsType::UNKNOWN,
    };

    let base = if let Some(reference) = obj.get("$ref").and_then(Value::as_str) {
        ref_type(reference)
    } else if let Some(value) = obj.get("const") {
        literal(value).map_or(TsType::UNKNOWN, TsType::Literal)
    } else if let Some(values) = obj.get("enum").and_then(Value::as_array) {
        TsType::union(values.iter().filter_map(literal).map(TsType::Literal))
    } else {
        composed_type(schema)
    };

    if obj.get("nullable").and_then(Value::as_bool) == Some(true) {
        base.nullable()
    } else {
        base
    }
}

/// `allOf`/`oneOf`/`anyOf` combined with the schema's own shape.
fn composed_type(schema: &Value) -> TsType {
    let mut parts: Vec<TsType> = Vec::new();

    if let Some(all_of) = schema.get("allOf").and_then(Value::as_array) {
        parts.extend(all_of.iter().map(schema_type));
    }
    for key in ["oneOf", "anyOf"] {
        if let Some(variants) = schema.get(key).and_then(Value::as_array) {
            parts.push(TsType::union(variants.iter().map(schema_type)));
        }
    }

    match own_type(schema) {
        Some(own) => parts.push(own),
        None if parts.is_empty() => return TsType::UNKNOWN,
        None => {}
    }
    TsType::intersection(parts)
}

/// The type described by `type`, `properties`, `items` and friends, if any.
fn own_type(schema: &Value) -> Option<TsType> {
    match schema.get("type") {
        Some(Value::String(name)) => Some(named_type(name, schema)),
        // OpenAPI 3.1 type arrays, e.g. ["string", "null"]
        Some(Value::Array(names)) => Some(TsType::union(
            names
                .iter()
                .filter_map(Value::as_str)
                .map(|name| named_type(name, schema)),
        )),
        _ if schema.get("properties").is_some()
            || schema.get("additionalProperties").is_some() =>
        {
            Some(object_type(schema))
        }
        _ if schema.get("items").is_some() => Some(named_type("array", schema)),
        _ => None,
    }
}

fn named_type(name: &str, schema: &Value) -> TsType {
    match name {
        "string" => TsType::STRING,
        "integer" | "number" => TsType::NUMBER,
        "boolean" => TsType::BOOLEAN,
        "null" => TsType::NULL,
        "array" => TsType::array(schema.get("items").map_or(TsType::UNKNOWN, schema_type)),
        "object" => object_type(schema),
        _ => TsType::UNKNOWN,
    }
}

fn object_type(schema: &Value) -> TsType {
    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let props = schema
        .get("properties")
        .and_then(Value::as_object)
        .map(|properties| {
            properties
                .iter()
                .map(|(name, prop)| {
                    let ty = schema_type(prop);
                    let prop_ts = if required.contains(&name.as_str()) {
                        TsProp::required(name.clone(), ty)
                    } else {
                        TsProp::optional(name.clone(), ty)
                    };
                    prop_ts.with_doc(schema_doc(prop))
                })
                .collect()
        })
        .unwrap_or_default();

    let index = match schema.get("additionalProperties") {
        Some(Value::Bool(true)) => Some(TsType::UNKNOWN),
        Some(Value::Object(extra)) if extra.is_empty() => Some(TsType::UNKNOWN),
        Some(extra @ Value::Object(_)) => Some(schema_type(extra)),
        _ => None,
    };

    TsType::Object(TsObject {
        props,
        index: index.map(Box::new),
    })
}

/// Render a local JSON reference as an indexed access type.
///
/// `#/components/schemas/Users` → `components["schemas"]["Users"]`.
/// Non-local references cannot be expressed and become `unknown`.
pub fn ref_type(reference: &str) -> TsType {
    let Some(pointer) = reference.strip_prefix("#/") else {
        warn!(reference, "unsupported non-local $ref, emitting unknown");
        return TsType::UNKNOWN;
    };

    let mut segments = pointer
        .split('/')
        .map(|s| s.replace("~1", "/").replace("~0", "~"));
    let Some(root) = segments.next().filter(|s| !s.is_empty()) else {
        warn!(reference, "empty $ref, emitting unknown");
        return TsType::UNKNOWN;
    };

    let mut path = root;
    for segment in segments {
        path.push('[');
        path.push_str(&quoted(&segment));
        path.push(']');
    }
    TsType::Ref(path)
}

fn literal(value: &Value) -> Option<TsLiteral> {
    match value {
        Value::String(s) => Some(TsLiteral::String(s.clone())),
        Value::Number(n) => Some(TsLiteral::Number(n.clone())),
        Value::Bool(b) => Some(TsLiteral::Bool(*b)),
        Value::Null => Some(TsLiteral::Null),
        _ => None,
    }
}

/// JSDoc lines describing a schema: format, deprecation, description, default.
pub fn schema_doc(schema: &Value) -> Vec<String> {
    let mut doc = Vec::new();
    if let Some(format) = schema.get("format").and_then(Value::as_str) {
        doc.push(format!("Format: {format}"));
    }
    if schema.get("deprecated").and_then(Value::as_bool) == Some(true) {
        doc.push("@deprecated".to_string());
    }
    if let Some(description) = schema.get("description").and_then(Value::as_str) {
        if !description.trim().is_empty() {
            doc.push(format!("@description {}", description.trim()));
        }
    }
    if let Some(default) = schema.get("default") {
        doc.push(format!("@default {default}"));
    }
    doc
}
