//! Formula error values

use std::fmt;

/// Error values a formula can evaluate to.
///
/// These are ordinary results, not faults: hosts display them verbatim in the
/// cell, and further formulas that read such a cell see the sentinel text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellError {
    /// #ERROR! - Malformed expression, bad operand or internal fault
    Error,
    /// #DIV/0! - Division by zero
    Div0,
    /// #API_ERROR! - The external completion call failed
    ApiError,
}

impl CellError {
    /// Get the display string for this error
    pub fn as_str(&self) -> &'static str {
        match self {
            CellError::Error => "#ERROR!",
            CellError::Div0 => "#DIV/0!",
            CellError::ApiError => "#API_ERROR!",
        }
    }

    /// Recognize a sentinel string (exact match)
    pub fn from_sentinel(s: &str) -> Option<Self> {
        match s {
            "#ERROR!" => Some(CellError::Error),
            "#DIV/0!" => Some(CellError::Div0),
            "#API_ERROR!" => Some(CellError::ApiError),
            _ => None,
        }
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_round_trip() {
        for err in [CellError::Error, CellError::Div0, CellError::ApiError] {
            assert_eq!(CellError::from_sentinel(err.as_str()), Some(err));
        }
        assert_eq!(CellError::from_sentinel("#VALUE!"), None);
        assert_eq!(CellError::from_sentinel("#error!"), None);
        assert_eq!(CellError::Div0.to_string(), "#DIV/0!");
    }
}
