#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Loading of token, fact and tree records written by submissions and gold
//! solutions.
//!
//! This is where absent sequences are rejected: a record without its token
//! list is an [`GradeError::InvalidInput`], never an empty stream.

use std::path::Path;

use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    error::GradeError,
    types::{ControlFact, ControlKind, NameFact, Token, scalar},
};

/// Reads a record file into memory.
fn read_text(path: &Path) -> Result<String, GradeError> {
    std::fs::read_to_string(path).map_err(|source| GradeError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads and deserializes a JSON record file.
pub fn read_record<T: DeserializeOwned>(path: &Path) -> Result<T, GradeError> {
    let text = read_text(path)?;
    parse_record(&text, &path.display().to_string())
}

/// Deserializes a JSON record; `what` names the record in errors.
pub fn parse_record<T: DeserializeOwned>(text: &str, what: &str) -> Result<T, GradeError> {
    serde_json::from_str(text).map_err(|e| GradeError::invalid(what, e.to_string()))
}

/// On-disk shape of a token record.
#[derive(Deserialize)]
struct TokenRecord {
    /// The token stream; absent is an error, not an empty stream.
    #[serde(default)]
    tokens: Option<Vec<Token>>,
}

/// Extracts the token stream from a parsed token record.
pub fn parse_tokens(text: &str, what: &str) -> Result<Vec<Token>, GradeError> {
    let record: TokenRecord = parse_record(text, what)?;
    record
        .tokens
        .ok_or_else(|| GradeError::invalid(what, "record has no `tokens` list"))
}

/// Loads the token stream from a token record file.
pub fn load_tokens(path: &Path) -> Result<Vec<Token>, GradeError> {
    let text = read_text(path)?;
    parse_tokens(&text, &path.display().to_string())
}

/// A `<def>` entry.
#[derive(Deserialize)]
struct DefRecord {
    /// Line of the declaration.
    #[serde(deserialize_with = "scalar")]
    line: String,
    /// Declared type.
    #[serde(rename = "type", deserialize_with = "scalar")]
    kind: String,
    /// Declared name.
    #[serde(deserialize_with = "scalar")]
    name: String,
}

/// A `<ref>` entry.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefRecord {
    /// Line of the use.
    #[serde(deserialize_with = "scalar")]
    line:     String,
    /// Type the use resolves to.
    #[serde(rename = "type", deserialize_with = "scalar")]
    kind:     String,
    /// Referenced name.
    #[serde(deserialize_with = "scalar")]
    name:     String,
    /// Line of the resolved declaration.
    #[serde(deserialize_with = "scalar")]
    ref_line: String,
}

/// On-disk shape of a name-resolution record.
#[derive(Deserialize)]
struct NameRecord {
    /// Declarations.
    #[serde(default)]
    defs: Option<Vec<DefRecord>>,
    /// Uses.
    #[serde(default)]
    refs: Option<Vec<RefRecord>>,
}

/// Extracts name-binding facts, declarations first.
pub fn parse_name_facts(text: &str, what: &str) -> Result<Vec<NameFact>, GradeError> {
    let record: NameRecord = parse_record(text, what)?;
    if record.defs.is_none() && record.refs.is_none() {
        return Err(GradeError::invalid(what, "record has neither `defs` nor `refs`"));
    }

    let defs = record.defs.unwrap_or_default().into_iter().map(|d| NameFact::Def {
        line: d.line,
        kind: d.kind,
        name: d.name,
    });
    let refs = record.refs.unwrap_or_default().into_iter().map(|r| NameFact::Ref {
        line:     r.line,
        kind:     r.kind,
        name:     r.name,
        ref_line: r.ref_line,
    });
    Ok(defs.chain(refs).collect())
}

/// Loads name-binding facts from a record file.
pub fn load_name_facts(path: &Path) -> Result<Vec<NameFact>, GradeError> {
    let text = read_text(path)?;
    parse_name_facts(&text, &path.display().to_string())
}

/// A `<break>` or `<continue>` entry.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoopJumpRecord {
    /// Line of the statement.
    #[serde(deserialize_with = "scalar")]
    line:          String,
    /// Line of the loop it leaves or restarts.
    #[serde(deserialize_with = "scalar")]
    attached_loop: String,
}

/// A `<return>` entry.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReturnRecord {
    /// Line of the statement.
    #[serde(deserialize_with = "scalar")]
    line:              String,
    /// Line of the function it returns from.
    #[serde(deserialize_with = "scalar")]
    attached_function: String,
}

/// On-disk shape of a control-structure record.
#[derive(Deserialize)]
struct ControlRecord {
    /// `break` statements.
    #[serde(default)]
    breaks:    Option<Vec<LoopJumpRecord>>,
    /// `continue` statements.
    #[serde(default)]
    continues: Option<Vec<LoopJumpRecord>>,
    /// `return` statements.
    #[serde(default)]
    returns:   Option<Vec<ReturnRecord>>,
}

/// Extracts control-structure facts: breaks, then continues, then returns.
pub fn parse_control_facts(text: &str, what: &str) -> Result<Vec<ControlFact>, GradeError> {
    let record: ControlRecord = parse_record(text, what)?;
    if record.breaks.is_none() && record.continues.is_none() && record.returns.is_none() {
        return Err(GradeError::invalid(
            what,
            "record has none of `breaks`, `continues`, `returns`",
        ));
    }

    let loop_jumps = |records: Option<Vec<LoopJumpRecord>>, kind: ControlKind| {
        records
            .unwrap_or_default()
            .into_iter()
            .map(move |r| ControlFact::new(kind, r.line, r.attached_loop))
    };

    let mut facts: Vec<ControlFact> = loop_jumps(record.breaks, ControlKind::Break)
        .chain(loop_jumps(record.continues, ControlKind::Continue))
        .collect();
    facts.extend(
        record
            .returns
            .unwrap_or_default()
            .into_iter()
            .map(|r| ControlFact::new(ControlKind::Return, r.line, r.attached_function)),
    );
    Ok(facts)
}

/// Loads control-structure facts from a record file.
pub fn load_control_facts(path: &Path) -> Result<Vec<ControlFact>, GradeError> {
    let text = read_text(path)?;
    parse_control_facts(&text, &path.display().to_string())
}
