//! SQL statement classification.
//!
//! Statements are classified by their leading keyword only. There is no parsing
//! beyond that: the result is a coarse kind used to decide whether a tool may
//! run a statement, plus a couple of advisory predicates.

/// Coarse statement kind derived from the leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlKind {
    Select,
    Insert,
    Update,
    Delete,
    Create,
    Alter,
    Drop,
    Other,
}

impl SqlKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Create => "CREATE",
            Self::Alter => "ALTER",
            Self::Drop => "DROP",
            Self::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for SqlKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Leading keywords in priority order.
const KIND_PREFIXES: &[(&str, SqlKind)] = &[
    ("select", SqlKind::Select),
    ("insert", SqlKind::Insert),
    ("update", SqlKind::Update),
    ("delete", SqlKind::Delete),
    ("create", SqlKind::Create),
    ("alter", SqlKind::Alter),
    ("drop", SqlKind::Drop),
];

const DDL_PREFIXES: &[&str] = &["create", "alter", "drop", "truncate"];

/// Substrings flagged by [`has_dangerous_keyword`].
pub const DANGEROUS_KEYWORDS: &[&str] = &[
    "drop database",
    "drop table",
    "truncate table",
    "delete from",
    "update ",
    "alter table",
    "create table",
    "create database",
];

/// True if `sql` starts with `keyword` followed by whitespace.
/// `sql` must already be trimmed and lower-cased.
fn starts_with_keyword(sql: &str, keyword: &str) -> bool {
    sql.strip_prefix(keyword)
        .and_then(|rest| rest.chars().next())
        .is_some_and(char::is_whitespace)
}

fn normalize(sql: &str) -> String {
    sql.trim().to_lowercase()
}

/// Classify a statement by its leading keyword.
///
/// Total: empty or unrecognized input yields [`SqlKind::Other`].
pub fn classify(sql: &str) -> SqlKind {
    let normalized = normalize(sql);
    KIND_PREFIXES
        .iter()
        .find(|(keyword, _)| starts_with_keyword(&normalized, keyword))
        .map(|(_, kind)| *kind)
        .unwrap_or(SqlKind::Other)
}

pub fn is_select(sql: &str) -> bool {
    classify(sql) == SqlKind::Select
}

/// True for CREATE, ALTER, DROP and TRUNCATE statements.
pub fn is_ddl(sql: &str) -> bool {
    let normalized = normalize(sql);
    DDL_PREFIXES
        .iter()
        .any(|keyword| starts_with_keyword(&normalized, keyword))
}

/// Case-insensitive scan for destructive keywords anywhere in the statement.
///
/// Advisory only: no tool refuses to run a statement because of this.
pub fn has_dangerous_keyword(sql: &str) -> bool {
    let lower = sql.to_lowercase();
    DANGEROUS_KEYWORDS
        .iter()
        .any(|keyword| lower.contains(keyword))
}
