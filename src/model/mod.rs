//! The emitted expression tree and its document schema.
//!
//! [`Expr`] is a closed tagged union; each variant serializes a `type`
//! discriminator plus its own fields. Trees are strictly descending (children
//! are owned, never referenced back), so serialization is acyclic by
//! construction. Absent optional fields are omitted from the output rather
//! than emitted as empty.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Kind tag for literal constants, in Go's token spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LitKind {
    Int,
    Float,
    Imag,
    Char,
    String,
}

/// One extracted expression.
///
/// The `type` discriminator takes one of `"function"`, `"variable"`,
/// `"constant"`, `"assignment"`, `"constructstruct"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Expr {
    /// A function or method call.
    #[serde(rename = "function")]
    Func {
        name: SmolStr,
        /// The resolved qualifier (canonical module path) or raw identifier,
        /// set when the callee is `qualifier.member`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reference: Option<String>,
        arguments: Vec<Expr>,
        offset: u32,
        scope: String,
    },

    /// A variable access or binding.
    #[serde(rename = "variable")]
    Variable {
        name: SmolStr,
        /// Set when the binding comes from a named composite literal.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reference: Option<SmolStr>,
        offset: u32,
        scope: String,
    },

    /// A literal constant.
    #[serde(rename = "constant")]
    Value {
        #[serde(rename = "typeOf")]
        type_of: LitKind,
        /// Raw literal text, quotes included.
        value: String,
        offset: u32,
        scope: String,
    },

    /// An assignment statement.
    #[serde(rename = "assignment")]
    Assignment {
        lhs: Vec<Expr>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rhs: Option<Box<Expr>>,
        offset: u32,
        scope: String,
    },

    /// A named composite literal.
    #[serde(rename = "constructstruct")]
    ConstructStruct {
        #[serde(rename = "struct")]
        struct_name: SmolStr,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        arguments: Vec<String>,
        #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
        kvargs: IndexMap<SmolStr, SmolStr>,
        offset: u32,
        scope: String,
    },
}

impl Expr {
    /// The byte offset of this expression in its source file.
    pub fn offset(&self) -> u32 {
        match self {
            Expr::Func { offset, .. }
            | Expr::Variable { offset, .. }
            | Expr::Value { offset, .. }
            | Expr::Assignment { offset, .. }
            | Expr::ConstructStruct { offset, .. } => *offset,
        }
    }

    /// The enclosing scope label.
    pub fn scope(&self) -> &str {
        match self {
            Expr::Func { scope, .. }
            | Expr::Variable { scope, .. }
            | Expr::Value { scope, .. }
            | Expr::Assignment { scope, .. }
            | Expr::ConstructStruct { scope, .. } => scope,
        }
    }
}

/// Provenance metadata for an emitted document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub source: String,
}

/// One source file's extraction result: provenance, identity and the ordered
/// top-level expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFileRecord {
    pub meta: Meta,
    pub path: String,
    pub package: String,
    pub file: String,
    pub lines: Vec<Expr>,
}

/// Render a record as one JSON document.
pub fn to_json(record: &SourceFileRecord) -> serde_json::Result<String> {
    serde_json::to_string(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SourceFileRecord {
        SourceFileRecord {
            meta: Meta {
                source: "github.com".to_string(),
            },
            path: "/tmp/demo.go".to_string(),
            package: "demo".to_string(),
            file: "demo.go".to_string(),
            lines: vec![
                Expr::Func {
                    name: "Get".into(),
                    reference: Some("net/http".to_string()),
                    arguments: vec![
                        Expr::Variable {
                            name: "a".into(),
                            reference: None,
                            offset: 40,
                            scope: "F".to_string(),
                        },
                        Expr::Value {
                            type_of: LitKind::String,
                            value: "\"lit\"".to_string(),
                            offset: 43,
                            scope: "F".to_string(),
                        },
                    ],
                    offset: 30,
                    scope: "F".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_discriminators() {
        let json = to_json(&sample()).unwrap();
        assert!(json.contains("\"type\":\"function\""));
        assert!(json.contains("\"type\":\"variable\""));
        assert!(json.contains("\"type\":\"constant\""));
        assert!(json.contains("\"typeOf\":\"STRING\""));
    }

    #[test]
    fn test_absent_reference_is_omitted() {
        let expr = Expr::Variable {
            name: "x".into(),
            reference: None,
            offset: 0,
            scope: String::new(),
        };
        let json = serde_json::to_string(&expr).unwrap();
        assert!(!json.contains("reference"));
    }

    #[test]
    fn test_empty_construct_fields_are_omitted() {
        let expr = Expr::ConstructStruct {
            struct_name: "Foo".into(),
            arguments: Vec::new(),
            kvargs: IndexMap::new(),
            offset: 5,
            scope: "f".to_string(),
        };
        let json = serde_json::to_string(&expr).unwrap();
        assert!(!json.contains("arguments"));
        assert!(!json.contains("kvargs"));
        assert!(json.contains("\"struct\":\"Foo\""));
    }

    #[test]
    fn test_round_trip() {
        let record = sample();
        let json = to_json(&record).unwrap();
        let back: SourceFileRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
