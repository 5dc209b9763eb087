//! TypeScript source emission.
//!
//! Objects are written one member per line with two spaces of indentation per
//! nesting level, so a member `n` levels deep starts with `2 * n` spaces.

use super::naming::{property_key, quoted};
use super::types::{TsLiteral, TsObject, TsPrimitive, TsProp, TsType};

const INDENT: &str = "  ";

/// Conversion of a type node into TypeScript source.
pub trait Emit {
    /// Render the node as if it started on a line indented `level` times.
    fn emit_at(&self, level: usize) -> String;

    fn emit(&self) -> String {
        self.emit_at(0)
    }
}

impl Emit for TsPrimitive {
    fn emit_at(&self, _level: usize) -> String {
        match self {
            TsPrimitive::String => "string",
            TsPrimitive::Number => "number",
            TsPrimitive::Boolean => "boolean",
            TsPrimitive::Null => "null",
            TsPrimitive::Unknown => "unknown",
            TsPrimitive::Never => "never",
        }
        .to_string()
    }
}

impl Emit for TsLiteral {
    fn emit_at(&self, _level: usize) -> String {
        match self {
            TsLiteral::String(s) => quoted(s),
            TsLiteral::Number(n) => n.to_string(),
            TsLiteral::Bool(b) => b.to_string(),
            TsLiteral::Null => "null".to_string(),
        }
    }
}

impl Emit for TsType {
    fn emit_at(&self, level: usize) -> String {
        match self {
            TsType::Primitive(p) => p.emit_at(level),
            TsType::Literal(lit) => lit.emit_at(level),
            TsType::Ref(path) => path.clone(),
            TsType::Array(inner) => {
                let inner_str = inner.emit_at(level);
                // Wrap compound types in parentheses
                if matches!(**inner, TsType::Union(_) | TsType::Intersection(_)) {
                    format!("({inner_str})[]")
                } else {
                    format!("{inner_str}[]")
                }
            }
            TsType::Union(types) => types
                .iter()
                .map(|t| t.emit_at(level))
                .collect::<Vec<_>>()
                .join(" | "),
            TsType::Intersection(types) => types
                .iter()
                .map(|t| {
                    let s = t.emit_at(level);
                    if matches!(t, TsType::Union(_)) {
                        format!("({s})")
                    } else {
                        s
                    }
                })
                .collect::<Vec<_>>()
                .join(" & "),
            TsType::Object(obj) => obj.emit_at(level),
            TsType::Record { key, value } => {
                format!("Record<{}, {}>", key.emit_at(level), value.emit_at(level))
            }
        }
    }
}

impl Emit for TsObject {
    fn emit_at(&self, level: usize) -> String {
        if self.props.is_empty() && self.index.is_none() {
            return TsType::empty_record().emit_at(level);
        }

        let pad = INDENT.repeat(level + 1);
        let mut output = String::from("{\n");
        for prop in &self.props {
            output.push_str(&prop.emit_at(level + 1));
        }
        if let Some(index) = &self.index {
            output.push_str(&format!(
                "{pad}[key: string]: {};\n",
                index.emit_at(level + 1)
            ));
        }
        output.push_str(&INDENT.repeat(level));
        output.push('}');
        output
    }
}

/// Emits the full member line (doc block included), terminated by `;\n`.
impl Emit for TsProp {
    fn emit_at(&self, level: usize) -> String {
        let pad = INDENT.repeat(level);
        let opt = if self.optional { "?" } else { "" };
        format!(
            "{}{pad}{}{opt}: {};\n",
            doc_block(&self.doc, &pad),
            property_key(&self.name),
            self.ty.emit_at(level)
        )
    }
}

fn doc_block(lines: &[String], pad: &str) -> String {
    let lines: Vec<String> = lines
        .iter()
        .flat_map(|l| l.lines())
        .map(|l| l.trim_end().replace("*/", "*\\/"))
        .collect();
    match lines.as_slice() {
        [] => String::new(),
        [single] => format!("{pad}/** {single} */\n"),
        many => {
            let mut block = format!("{pad}/**\n");
            for line in many {
                if line.is_empty() {
                    block.push_str(&format!("{pad} *\n"));
                } else {
                    block.push_str(&format!("{pad} * {line}\n"));
                }
            }
            block.push_str(&format!("{pad} */\n"));
            block
        }
    }
}

/// A top-level `export` for `name`: an interface for object types, a type
/// alias for anything else.
pub fn declaration(name: &str, ty: &TsType) -> String {
    match ty {
        TsType::Object(obj) if !obj.props.is_empty() || obj.index.is_some() => {
            format!("export interface {name} {}\n", obj.emit())
        }
        other => format!("export type {name} = {};\n", other.emit()),
    }
}
