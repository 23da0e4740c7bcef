//! Host access to cell values

use std::collections::HashMap;

/// Capability the host grants the evaluator for the duration of one call.
///
/// References are canonical A1 strings (`"B7"`). The evaluator never keeps a
/// context beyond the call it was passed to.
pub trait FormulaContext {
    /// Current display value of a cell, `""` when the cell is empty.
    fn get_cell_value(&self, reference: &str) -> String;

    /// Write a cell. No built-in function writes cells yet.
    fn set_cell_value(&self, _reference: &str, _value: &str) {}
}

impl FormulaContext for HashMap<String, String> {
    fn get_cell_value(&self, reference: &str) -> String {
        self.get(reference).cloned().unwrap_or_default()
    }
}
