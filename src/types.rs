#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt;

use bon::Builder;
use serde::{Deserialize, Deserializer, Serialize};

/// A single lexer token as emitted by a submission or recorded in a gold file.
///
/// Every attribute is kept as its canonical text so that `3`, `"3"` and
/// `3` written by different emitters compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Builder, Serialize, Deserialize)]
#[builder(on(String, into))]
pub struct Token {
    /// Token category, e.g. `IDENTIFIER`.
    #[serde(rename = "type", deserialize_with = "scalar")]
    #[builder(default)]
    pub kind:   String,
    /// Semantic value (literal value, identifier name).
    #[serde(deserialize_with = "scalar")]
    #[builder(default)]
    pub value:  String,
    /// Raw source text of the lexeme.
    #[serde(deserialize_with = "scalar")]
    #[builder(default)]
    pub source: String,
    /// 1-based line of the first character.
    #[serde(deserialize_with = "scalar")]
    #[builder(default)]
    pub line:   String,
    /// Column of the first character.
    #[serde(deserialize_with = "scalar")]
    #[builder(default)]
    pub column: String,
    /// Offset of the first character in the input.
    #[serde(deserialize_with = "scalar")]
    #[builder(default)]
    pub start:  String,
    /// Offset of the last character in the input.
    #[serde(deserialize_with = "scalar")]
    #[builder(default)]
    pub stop:   String,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}) @{}:{}", self.kind, self.source, self.line, self.column)
    }
}

/// Any JSON scalar a record emitter may use for a token attribute.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    /// Quoted text.
    Text(String),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer too large for `i64`.
    Uint(u64),
    /// Floating point number.
    Float(f64),
    /// Boolean flag.
    Bool(bool),
}

/// Deserializes a JSON scalar into its canonical textual form.
pub(crate) fn scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawScalar::deserialize(deserializer)? {
        RawScalar::Text(text) => text,
        RawScalar::Int(n) => n.to_string(),
        RawScalar::Uint(n) => n.to_string(),
        RawScalar::Float(n) => n.to_string(),
        RawScalar::Bool(b) => b.to_string(),
    })
}

/// A name-binding fact: where a name is declared or what declaration a use
/// resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "fact", rename_all = "snake_case")]
pub enum NameFact {
    /// A declaration.
    Def {
        /// Line of the declaration.
        line: String,
        /// Declared type.
        kind: String,
        /// Declared name.
        name: String,
    },
    /// A use of a name.
    Ref {
        /// Line of the use.
        line:     String,
        /// Type the use resolves to.
        kind:     String,
        /// Referenced name.
        name:     String,
        /// Line of the declaration the use resolves to.
        ref_line: String,
    },
}

impl NameFact {
    /// Creates a declaration fact.
    pub fn def(line: impl Into<String>, kind: impl Into<String>, name: impl Into<String>) -> Self {
        NameFact::Def {
            line: line.into(),
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Creates a use fact resolving to the declaration on `ref_line`.
    pub fn reference(
        line: impl Into<String>,
        kind: impl Into<String>,
        name: impl Into<String>,
        ref_line: impl Into<String>,
    ) -> Self {
        NameFact::Ref {
            line:     line.into(),
            kind:     kind.into(),
            name:     name.into(),
            ref_line: ref_line.into(),
        }
    }
}

impl fmt::Display for NameFact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameFact::Def { line, kind, name } => {
                write!(f, "Def(line={line}, type={kind}, name={name})")
            }
            NameFact::Ref {
                line,
                kind,
                name,
                ref_line,
            } => write!(f, "Ref(line={line}, type={kind}, name={name}, refLine={ref_line})"),
        }
    }
}

/// Which control transfer a [`ControlFact`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    /// `break`, attached to a loop.
    Break,
    /// `continue`, attached to a loop.
    Continue,
    /// `return`, attached to a function.
    Return,
}

impl ControlKind {
    /// Lowercase keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            ControlKind::Break => "break",
            ControlKind::Continue => "continue",
            ControlKind::Return => "return",
        }
    }
}

/// A control-structure fact: a jump statement and the line of the construct
/// it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControlFact {
    /// Line of the jump statement.
    pub line:        String,
    /// Kind of jump.
    pub kind:        ControlKind,
    /// Line of the enclosing loop (`break`/`continue`) or function (`return`).
    pub target_line: String,
}

impl ControlFact {
    /// Creates a fact from its parts.
    pub fn new(kind: ControlKind, line: impl Into<String>, target_line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            kind,
            target_line: target_line.into(),
        }
    }
}

impl fmt::Display for ControlFact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ControlStructure(line={}, type={}, def_line={})",
            self.line,
            self.kind.as_str(),
            self.target_line
        )
    }
}
