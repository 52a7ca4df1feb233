#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt;

use serde::{Deserialize, Serialize};

use super::classify::UnitStatus;
use crate::types::Token;

/// How much a field mismatch matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Reported, but the token still counts as recognised.
    Warning,
    /// The token is wrong.
    Error,
}

impl Severity {
    /// Lowercase name used in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A diagnostic attached to an analysis unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Human-readable explanation.
    pub text:     String,
    /// Severity of the mismatch.
    pub severity: Severity,
}

impl Message {
    /// Creates a warning-level message.
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            text:     text.into(),
            severity: Severity::Warning,
        }
    }

    /// Creates an error-level message.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text:     text.into(),
            severity: Severity::Error,
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.text)
    }
}

/// Verdict of comparing one matched pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOutcome {
    /// `Correct`, `Warning` or `Error`.
    pub status:        UnitStatus,
    /// One message per mismatching field.
    pub messages:      Vec<Message>,
    /// Number of warning-level mismatches.
    pub warning_count: usize,
    /// Number of error-level mismatches.
    pub error_count:   usize,
}

/// Compares the secondary attributes of a matched pair.
///
/// Any error-level mismatch makes the pair an `Error`; otherwise any
/// warning-level mismatch makes it a `Warning`; otherwise it is `Correct`.
pub fn compare_fields(stu: &Token, gold: &Token) -> FieldOutcome {
    let mut messages = Vec::new();
    let (mut warning_count, mut error_count) = (0, 0);

    // the token category is not listed: the aligner only pairs equal categories
    let fields = [
        ("source", &gold.source, &stu.source, Severity::Warning),
        ("value", &gold.value, &stu.value, Severity::Error),
        ("line", &gold.line, &stu.line, Severity::Error),
        ("column", &gold.column, &stu.column, Severity::Error),
        ("start", &gold.start, &stu.start, Severity::Error),
        ("stop", &gold.stop, &stu.stop, Severity::Error),
    ];

    for (name, expected, actual, severity) in fields {
        if expected == actual {
            continue;
        }

        let text = format!("expect {name}={expected}, got {name}={actual}");
        messages.push(match severity {
            Severity::Warning => {
                warning_count += 1;
                Message::warning(text)
            }
            Severity::Error => {
                error_count += 1;
                Message::error(text)
            }
        });
    }

    let status = if error_count > 0 {
        UnitStatus::Error
    } else if warning_count > 0 {
        UnitStatus::Warning
    } else {
        UnitStatus::Correct
    };

    FieldOutcome {
        status,
        messages,
        warning_count,
        error_count,
    }
}
