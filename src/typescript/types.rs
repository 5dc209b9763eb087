//! TypeScript type representation used by the emitter.

/// A TypeScript type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TsType {
    /// `string`, `number`, `boolean`, `null`, `unknown`, `never`
    Primitive(TsPrimitive),
    /// `"draft"`, `42`, `true`
    Literal(TsLiteral),
    /// Already-rendered reference such as `components["schemas"]["Users"]`
    Ref(String),
    /// `T[]`
    Array(Box<TsType>),
    /// `A | B`
    Union(Vec<TsType>),
    /// `A & B`
    Intersection(Vec<TsType>),
    /// `{ a: T; b?: U; [key: string]: V }`, emitted across several lines
    Object(TsObject),
    /// `Record<K, V>`
    Record { key: Box<TsType>, value: Box<TsType> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsPrimitive {
    String,
    Number,
    Boolean,
    Null,
    Unknown,
    Never,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TsLiteral {
    String(String),
    Number(serde_json::Number),
    Bool(bool),
    Null,
}

/// Members of an object type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TsObject {
    pub props: Vec<TsProp>,
    /// Value type of a `[key: string]` index signature
    pub index: Option<Box<TsType>>,
}

/// A property of an object type, with an optional JSDoc block.
#[derive(Debug, Clone, PartialEq)]
pub struct TsProp {
    pub name: String,
    pub ty: TsType,
    pub optional: bool,
    pub doc: Vec<String>,
}

impl TsType {
    pub const STRING: TsType = TsType::Primitive(TsPrimitive::String);
    pub const NUMBER: TsType = TsType::Primitive(TsPrimitive::Number);
    pub const BOOLEAN: TsType = TsType::Primitive(TsPrimitive::Boolean);
    pub const NULL: TsType = TsType::Primitive(TsPrimitive::Null);
    pub const UNKNOWN: TsType = TsType::Primitive(TsPrimitive::Unknown);
    pub const NEVER: TsType = TsType::Primitive(TsPrimitive::Never);

    /// `Record<string, never>`, the type of an object with no members.
    pub fn empty_record() -> Self {
        Self::Record {
            key: Box::new(Self::STRING),
            value: Box::new(Self::NEVER),
        }
    }

    /// Build a union, flattening nested unions and dropping repeated members.
    /// A single member collapses to itself; no members yields `never`.
    pub fn union(members: impl IntoIterator<Item = TsType>) -> Self {
        let mut flat: Vec<TsType> = Vec::new();
        for member in members {
            let parts = match member {
                TsType::Union(inner) => inner,
                other => vec![other],
            };
            for part in parts {
                if !flat.contains(&part) {
                    flat.push(part);
                }
            }
        }
        match flat.len() {
            0 => Self::NEVER,
            1 => flat.remove(0),
            _ => Self::Union(flat),
        }
    }

    /// Build an intersection; a single member collapses to itself.
    pub fn intersection(members: Vec<TsType>) -> Self {
        match members.len() {
            0 => Self::UNKNOWN,
            1 => members.into_iter().next().unwrap_or(Self::UNKNOWN),
            _ => Self::Intersection(members),
        }
    }

    /// `self | null`
    pub fn nullable(self) -> Self {
        Self::union([self, Self::NULL])
    }

    pub fn array(item: TsType) -> Self {
        Self::Array(Box::new(item))
    }

    pub fn object(props: Vec<TsProp>) -> Self {
        Self::Object(TsObject { props, index: None })
    }
}

impl TsProp {
    pub fn required(name: impl Into<String>, ty: TsType) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            doc: Vec::new(),
        }
    }

    pub fn optional(name: impl Into<String>, ty: TsType) -> Self {
        Self {
            optional: true,
            ..Self::required(name, ty)
        }
    }

    pub fn with_doc(mut self, doc: Vec<String>) -> Self {
        self.doc = doc;
        self
    }
}
