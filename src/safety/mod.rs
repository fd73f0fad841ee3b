//! Read-only guard for SQL submitted to the dataset.
//!
//! Parses SQL and decides whether it only reads. The executor refuses
//! statements that write and anything the parser cannot read.

mod parser;

pub use parser::{classify_sql, SqlClassifier};

use std::fmt;

/// Outcome of inspecting a SQL string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Every statement only reads (SELECT, WITH without data-modifying CTEs, EXPLAIN).
    ReadOnly,
    /// At least one statement writes or changes the schema.
    Writes(StatementType),
    /// The SQL could not be parsed, so nothing is known about what it does.
    Unparsed(String),
}

impl Access {
    /// Returns true if the SQL must not be sent to the database.
    pub fn is_refused(&self) -> bool {
        !matches!(self, Self::ReadOnly)
    }
}

/// The kind of writing statement detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementType {
    Insert,
    Update,
    Delete,
    Merge,
    Drop,
    Truncate,
    Alter,
    Create,
    Grant,
    Revoke,
    /// Statement kind the guard does not recognize as a read.
    Other,
    /// The statement list was empty.
    Empty,
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert => write!(f, "INSERT"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
            Self::Merge => write!(f, "MERGE"),
            Self::Drop => write!(f, "DROP"),
            Self::Truncate => write!(f, "TRUNCATE"),
            Self::Alter => write!(f, "ALTER"),
            Self::Create => write!(f, "CREATE"),
            Self::Grant => write!(f, "GRANT"),
            Self::Revoke => write!(f, "REVOKE"),
            Self::Other => write!(f, "non-SELECT statement"),
            Self::Empty => write!(f, "empty statement"),
        }
    }
}
