use thiserror::Error;

use crate::tracks::FieldParseError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifyError {
    #[error("{0}")]
    FieldParse(#[from] FieldParseError),
    #[error("track has no frames")]
    EmptyGroup,
}
