//! Error types for Turtle parsing

#[derive(Debug, thiserror::Error)]
pub enum TurtleError {
    /// Invalid token
    #[error("{message} at line {line}, column {column}")]
    Lexer {
        line: usize,
        column: usize,
        message: String,
    },

    /// Unexpected token or invalid structure
    #[error("{message} at line {line}, column {column}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Undefined prefix '{0}:'")]
    UndefinedPrefix(String),
}

pub type Result<T> = std::result::Result<T, TurtleError>;

/// 1-based line and column of a byte offset
pub(crate) fn line_col(input: &str, offset: usize) -> (usize, usize) {
    let before = &input[..offset.min(input.len())];
    let line = before.matches('\n').count() + 1;
    let column = before
        .rsplit('\n')
        .next()
        .map_or(0, |tail| tail.chars().count())
        + 1;
    (line, column)
}
