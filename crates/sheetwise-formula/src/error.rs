//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Faults that stop a formula from being evaluated at all.
///
/// Value-level failures (`#DIV/0!`, a poisoned `SUM`, a failed completion) are
/// not faults; they travel as [`FormulaValue::Error`](crate::FormulaValue::Error).
/// [`evaluate_formula`](crate::evaluate_formula) shows every fault as `#ERROR!`.
#[derive(Debug, Error)]
pub enum FormulaError {
    /// Formula parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Formula evaluation error
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// Unknown function
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Wrong number of arguments
    #[error("Wrong number of arguments for {function}: expected {expected}, got {actual}")]
    ArgumentCount {
        function: String,
        expected: String,
        actual: usize,
    },
}
