//! Logical functions

use super::FunctionArg;
use crate::error::FormulaResult;
use crate::evaluator::{EvaluationContext, FormulaValue};
use sheetwise_core::CellError;

/// IF function
///
/// A lone cell condition holds when the cell is non-empty and not `"0"`;
/// any other condition uses ordinary truthiness. The missing false branch is
/// empty text, and so is the whole call with fewer than two arguments.
///
/// The chosen branch is not evaluated further: a bare reference or range
/// branch yields its own text (`B1`, `A1:B2`), not the cells behind it.
pub fn fn_if(args: &[FunctionArg], ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    let (Some(condition), Some(if_true)) = (args.first(), args.get(1)) else {
        return Ok(FormulaValue::String(String::new()));
    };

    let condition_bool = match condition {
        FunctionArg::Cell(cell) => {
            let value = ctx.get_cell_value(*cell);
            !value.is_empty() && value != "0"
        }
        FunctionArg::Range(_) => return Ok(FormulaValue::Error(CellError::Error)),
        FunctionArg::Value(FormulaValue::Error(e)) => return Ok(FormulaValue::Error(*e)),
        FunctionArg::Value(value) => value.is_truthy(),
    };

    let chosen = if condition_bool {
        Some(if_true)
    } else {
        args.get(2)
    };

    Ok(match chosen {
        None => FormulaValue::String(String::new()),
        Some(FunctionArg::Cell(cell)) => FormulaValue::String(cell.to_a1_string()),
        Some(FunctionArg::Range(range)) => FormulaValue::String(range.to_a1_string()),
        Some(FunctionArg::Value(value)) => value.clone(),
    })
}
