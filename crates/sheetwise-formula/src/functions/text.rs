//! Text functions

use super::FunctionArg;
use crate::error::FormulaResult;
use crate::evaluator::{EvaluationContext, FormulaValue};

/// CONCATENATE function
///
/// A lone cell contributes its value; a range contributes its own `A1:B2`
/// text, as it is not expanded.
pub fn fn_concatenate(args: &[FunctionArg], ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    let mut result = String::new();

    for arg in args {
        match arg {
            FunctionArg::Cell(cell) => result.push_str(&ctx.get_cell_value(*cell)),
            FunctionArg::Range(range) => result.push_str(&range.to_a1_string()),
            FunctionArg::Value(FormulaValue::Error(e)) => return Ok(FormulaValue::Error(*e)),
            FunctionArg::Value(value) => result.push_str(&value.as_string()),
        }
    }

    Ok(FormulaValue::String(result))
}
