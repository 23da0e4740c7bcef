//! Math functions

use super::FunctionArg;
use crate::error::FormulaResult;
use crate::evaluator::{parse_number, EvaluationContext, FormulaValue};
use sheetwise_core::CellError;

/// SUM function
///
/// Strict: one non-empty cell or literal that is not a number makes the whole
/// call `#ERROR!`. Empty cells add nothing.
pub fn fn_sum(args: &[FunctionArg], ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    let mut sum = 0.0;

    for arg in args {
        match arg {
            FunctionArg::Value(FormulaValue::Number(n)) => sum += n,
            FunctionArg::Value(FormulaValue::String(s)) => match parse_number(s) {
                Some(n) => sum += n,
                None => return Ok(FormulaValue::Error(CellError::Error)),
            },
            FunctionArg::Value(FormulaValue::Error(e)) => return Ok(FormulaValue::Error(*e)),
            reference => {
                for cell in reference.cells().into_iter().flatten() {
                    let text = ctx.get_cell_value(cell);
                    if text.trim().is_empty() {
                        continue;
                    }
                    match parse_number(&text) {
                        Some(n) => sum += n,
                        None => return Ok(FormulaValue::Error(CellError::Error)),
                    }
                }
            }
        }
    }

    Ok(FormulaValue::number(sum))
}
