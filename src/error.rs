use thiserror::Error;

/// Fatal conditions raised while turning a map document into C artifacts.
///
/// Line numbers are 1-based and refer to the input document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    #[error("line {line}: malformed input: {reason}")]
    MalformedInput { line: usize, reason: String },

    #[error("line {line}: attribute `{attribute}` is not a number: {value:?}")]
    InvalidNumber {
        line: usize,
        attribute: String,
        value: String,
    },

    #[error("layer `{layer}` is {width}x{height} but holds {cells} cells")]
    DimensionMismatch {
        layer: String,
        width: i32,
        height: i32,
        cells: usize,
    },

    #[error("no csv layer named `{layer}` in the document")]
    MissingLayer { layer: String },

    #[error("object in group `{group}` has no `{field}` property")]
    MissingField { group: String, field: String },
}

impl CompileError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        CompileError::MalformedInput {
            line,
            reason: reason.into(),
        }
    }
}
