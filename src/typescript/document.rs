//! Whole-document assembly: `paths`, `webhooks`, `components`, `$defs`,
//! `external` and `operations` declarations.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::emit::declaration;
use super::naming::quoted;
use super::schema::{ref_type, schema_doc, schema_type};
use super::types::{TsProp, TsType};

/// HTTP methods recognised inside a path item, in emission order.
const METHODS: &[&str] = &[
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Parameter locations, in emission order.
const LOCATIONS: &[&str] = &["query", "header", "path", "cookie"];

/// Sub-sections of `components`, in emission order.
const COMPONENT_SECTIONS: &[&str] = &[
    "schemas",
    "responses",
    "parameters",
    "requestBodies",
    "headers",
    "pathItems",
];

/// Render every top-level declaration for `spec`, separated by blank lines.
pub fn render_document(spec: &Map<String, Value>) -> String {
    let mut builder = DocumentBuilder {
        root: spec,
        operations: Vec::new(),
    };

    let paths = builder.path_items(spec.get("paths"));
    let webhooks = builder.path_items(spec.get("webhooks"));
    let components = builder.components(spec.get("components"));
    let operations = TsType::object(std::mem::take(&mut builder.operations));
    debug!(
        operations = match &operations {
            TsType::Object(obj) => obj.props.len(),
            _ => 0,
        },
        "document assembled"
    );

    [
        declaration("paths", &paths),
        declaration("webhooks", &webhooks),
        declaration("components", &components),
        declaration("$defs", &TsType::empty_record()),
        declaration("external", &TsType::empty_record()),
        declaration("operations", &operations),
    ]
    .join("\n")
}

struct DocumentBuilder<'a> {
    root: &'a Map<String, Value>,
    /// Operations with an `operationId`, collected while walking path items
    operations: Vec<TsProp>,
}

impl<'a> DocumentBuilder<'a> {
    fn path_items(&mut self, items: Option<&'a Value>) -> TsType {
        let Some(items) = items.and_then(Value::as_object) else {
            return TsType::empty_record();
        };
        let props = items
            .iter()
            .map(|(path, item)| TsProp::required(path.clone(), self.path_item(item)))
            .collect();
        TsType::object(props)
    }

    fn path_item(&mut self, item: &'a Value) -> TsType {
        if let Some(reference) = item.get("$ref").and_then(Value::as_str) {
            return ref_type(reference);
        }

        let shared_params = item.get("parameters");
        let mut props = Vec::new();

        if let Some(params) = self.parameters(shared_params, None) {
            props.push(TsProp::required("parameters", params));
        }

        for method in METHODS {
            let Some(operation) = item.get(*method).filter(|op| op.is_object()) else {
                continue;
            };
            let ty = self.operation(operation, shared_params);
            let ty = match operation.get("operationId").and_then(Value::as_str) {
                Some(id) if !id.is_empty() => self.register_operation(id, operation, ty),
                _ => ty,
            };
            props.push(TsProp::required(*method, ty).with_doc(operation_doc(operation)));
        }

        TsType::object(props)
    }

    /// Store the full operation type under `operations` and return a reference to it.
    fn register_operation(&mut self, id: &str, operation: &Value, ty: TsType) -> TsType {
        if self.operations.iter().any(|op| op.name == id) {
            warn!(operation_id = id, "duplicate operationId, keeping the first definition");
        } else {
            self.operations
                .push(TsProp::required(id, ty).with_doc(operation_doc(operation)));
        }
        TsType::Ref(format!("operations[{}]", quoted(id)))
    }

    fn operation(&self, operation: &'a Value, shared_params: Option<&'a Value>) -> TsType {
        let mut props = Vec::new();

        if let Some(params) = self.parameters(shared_params, operation.get("parameters")) {
            props.push(TsProp::required("parameters", params));
        }

        if let Some(body) = operation.get("requestBody") {
            let required = self
                .resolve(body)
                .and_then(|b| b.get("required"))
                .and_then(Value::as_bool)
                .unwrap_or(false);
            let ty = self.request_body(body);
            props.push(if required {
                TsProp::required("requestBody", ty)
            } else {
                TsProp::optional("requestBody", ty)
            });
        }

        let responses = match operation.get("responses").and_then(Value::as_object) {
            Some(responses) if !responses.is_empty() => TsType::object(
                responses
                    .iter()
                    .map(|(code, response)| {
                        TsProp::required(code.clone(), self.response(response))
                            .with_doc(description_doc(self.resolve(response)))
                    })
                    .collect(),
            ),
            _ => TsType::NEVER,
        };
        props.push(TsProp::required("responses", responses));

        TsType::object(props)
    }

    /// Merge path-level and operation-level parameters, split by location.
    /// An operation-level parameter replaces a path-level one with the same
    /// name and location. Returns `None` when there are no parameters at all.
    fn parameters(
        &self,
        path_level: Option<&'a Value>,
        operation_level: Option<&'a Value>,
    ) -> Option<TsType> {
        let mut merged: Vec<(String, String, &'a Value)> = Vec::new();

        for source in [path_level, operation_level].into_iter().flatten() {
            let Some(params) = source.as_array() else {
                continue;
            };
            for param in params {
                let Some(resolved) = self.resolve(param) else {
                    continue;
                };
                let (Some(name), Some(location)) = (
                    resolved.get("name").and_then(Value::as_str),
                    resolved.get("in").and_then(Value::as_str),
                ) else {
                    continue;
                };
                match merged
                    .iter_mut()
                    .find(|(n, l, _)| n == name && l == location)
                {
                    Some(existing) => existing.2 = param,
                    None => merged.push((name.to_string(), location.to_string(), param)),
                }
            }
        }

        if merged.is_empty() {
            return None;
        }

        let groups = LOCATIONS
            .iter()
            .filter_map(|location| {
                let members: Vec<TsProp> = merged
                    .iter()
                    .filter(|(_, l, _)| l == location)
                    .map(|(name, _, param)| self.parameter_prop(name, location, *param))
                    .collect();
                if members.is_empty() {
                    return None;
                }
                let any_required = members.iter().any(|p| !p.optional);
                let group = TsType::object(members);
                Some(if any_required {
                    TsProp::required(*location, group)
                } else {
                    TsProp::optional(*location, group)
                })
            })
            .collect();

        Some(TsType::object(groups))
    }

    fn parameter_prop(&self, name: &str, location: &str, param: &'a Value) -> TsProp {
        let resolved = self.resolve(param);
        let required = location == "path"
            || resolved
                .and_then(|p| p.get("required"))
                .and_then(Value::as_bool)
                .unwrap_or(false);
        let ty = parameter_type(param);
        let prop = if required {
            TsProp::required(name, ty)
        } else {
            TsProp::optional(name, ty)
        };
        prop.with_doc(description_doc(resolved))
    }

    fn components(&mut self, components: Option<&'a Value>) -> TsType {
        let components = components.and_then(Value::as_object);
        let props = COMPONENT_SECTIONS
            .iter()
            .map(|section| {
                let entries = components
                    .and_then(|c| c.get(*section))
                    .and_then(Value::as_object)
                    .filter(|entries| !entries.is_empty());
                let ty = match entries {
                    Some(entries) => TsType::object(
                        entries
                            .iter()
                            .map(|(name, entry)| self.component(section, name, entry))
                            .collect(),
                    ),
                    None => TsType::NEVER,
                };
                TsProp::required(*section, ty)
            })
            .collect();
        TsType::object(props)
    }

    fn component(&mut self, section: &str, name: &str, entry: &'a Value) -> TsProp {
        match section {
            "schemas" => TsProp::required(name, schema_type(entry)).with_doc(schema_doc(entry)),
            "responses" => TsProp::required(name, self.response(entry))
                .with_doc(description_doc(self.resolve(entry))),
            "parameters" => TsProp::required(name, parameter_type(entry))
                .with_doc(description_doc(self.resolve(entry))),
            "requestBodies" => TsProp::required(name, self.request_body(entry)),
            "headers" => TsProp::required(name, header_type(entry))
                .with_doc(description_doc(self.resolve(entry))),
            _ => TsProp::required(name, self.path_item(entry)),
        }
    }

    fn request_body(&self, body: &Value) -> TsType {
        if let Some(reference) = body.get("$ref").and_then(Value::as_str) {
            return ref_type(reference);
        }
        TsType::object(vec![TsProp::required(
            "content",
            content_type(body.get("content")),
        )])
    }

    fn response(&self, response: &Value) -> TsType {
        if let Some(reference) = response.get("$ref").and_then(Value::as_str) {
            return ref_type(reference);
        }
        let mut props = Vec::new();
        if let Some(headers) = response.get("headers").and_then(Value::as_object) {
            if !headers.is_empty() {
                let members = headers
                    .iter()
                    .map(|(name, header)| TsProp::optional(name.clone(), header_type(header)))
                    .collect();
                props.push(TsProp::required("headers", TsType::object(members)));
            }
        }
        props.push(TsProp::required(
            "content",
            content_type(response.get("content")),
        ));
        TsType::object(props)
    }

    /// Follow a local `$ref` to its target; values without one resolve to themselves.
    fn resolve(&self, value: &'a Value) -> Option<&'a Value> {
        let Some(reference) = value.get("$ref").and_then(Value::as_str) else {
            return Some(value);
        };
        let target = reference
            .strip_prefix('#')
            .and_then(|pointer| lookup(self.root, pointer));
        if target.is_none() {
            warn!(reference, "unresolvable $ref");
        }
        target
    }
}

/// JSON-pointer lookup starting from the document root.
fn lookup<'a>(root: &'a Map<String, Value>, pointer: &str) -> Option<&'a Value> {
    let (first, rest) = pointer.strip_prefix('/')?.split_once('/').unwrap_or((
        pointer.trim_start_matches('/'),
        "",
    ));
    let first = first.replace("~1", "/").replace("~0", "~");
    let value = root.get(&first)?;
    if rest.is_empty() {
        Some(value)
    } else {
        value.pointer(&format!("/{rest}"))
    }
}

fn parameter_type(param: &Value) -> TsType {
    if let Some(reference) = param.get("$ref").and_then(Value::as_str) {
        return ref_type(reference);
    }
    match param.get("schema") {
        Some(schema) => schema_type(schema),
        None => match param.get("content").and_then(Value::as_object) {
            Some(content) => content
                .values()
                .next()
                .and_then(|media| media.get("schema"))
                .map_or(TsType::UNKNOWN, schema_type),
            None => TsType::STRING,
        },
    }
}

fn header_type(header: &Value) -> TsType {
    if let Some(reference) = header.get("$ref").and_then(Value::as_str) {
        return ref_type(reference);
    }
    header.get("schema").map_or(TsType::UNKNOWN, schema_type)
}

/// `{ "<media type>": T }` for a `content` map, `never` when there is none.
fn content_type(content: Option<&Value>) -> TsType {
    match content.and_then(Value::as_object) {
        Some(content) if !content.is_empty() => TsType::object(
            content
                .iter()
                .map(|(media_type, media)| {
                    TsProp::required(
                        media_type.clone(),
                        media.get("schema").map_or(TsType::UNKNOWN, schema_type),
                    )
                })
                .collect(),
        ),
        _ => TsType::NEVER,
    }
}

fn operation_doc(operation: &Value) -> Vec<String> {
    let mut doc = Vec::new();
    if let Some(summary) = operation.get("summary").and_then(Value::as_str) {
        if !summary.trim().is_empty() {
            doc.push(summary.trim().to_string());
        }
    }
    if operation.get("deprecated").and_then(Value::as_bool) == Some(true) {
        doc.push("@deprecated".to_string());
    }
    doc.extend(description_doc(Some(operation)));
    doc
}

fn description_doc(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(|v| v.get("description"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(|d| vec![format!("@description {d}")])
        .unwrap_or_default()
}
