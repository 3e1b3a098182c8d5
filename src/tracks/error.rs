use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    #[error("line {line}: missing {column}")]
    MissingField { line: u64, column: &'static str },
    #[error("line {line}: unreadable row: {message}")]
    Malformed { line: u64, message: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}: invalid {field}: {value:?}")]
pub struct FieldParseError {
    pub line: u64,
    pub field: &'static str,
    pub value: String,
}
