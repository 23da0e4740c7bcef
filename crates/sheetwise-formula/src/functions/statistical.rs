//! Statistical functions
//!
//! Unlike SUM these are lenient: text and empty cells are skipped.

use super::FunctionArg;
use crate::error::FormulaResult;
use crate::evaluator::{parse_number, EvaluationContext, FormulaValue};
use sheetwise_core::CellError;

/// Numbers among the arguments, in argument then row-major order
fn numeric_values(args: &[FunctionArg], ctx: &EvaluationContext) -> Result<Vec<f64>, CellError> {
    let mut values = Vec::new();

    for arg in args {
        match arg {
            FunctionArg::Value(FormulaValue::Number(n)) => values.push(*n),
            FunctionArg::Value(FormulaValue::String(s)) => values.extend(parse_number(s)),
            FunctionArg::Value(FormulaValue::Error(e)) => return Err(*e),
            reference => values.extend(
                reference
                    .cells()
                    .into_iter()
                    .flatten()
                    .filter_map(|cell| parse_number(&ctx.get_cell_value(cell))),
            ),
        }
    }

    Ok(values)
}

fn aggregate(
    args: &[FunctionArg],
    ctx: &EvaluationContext,
    reduce: impl FnOnce(&[f64]) -> f64,
) -> FormulaResult<FormulaValue> {
    Ok(match numeric_values(args, ctx) {
        Ok(values) => FormulaValue::number(reduce(&values)),
        Err(e) => FormulaValue::Error(e),
    })
}

/// AVERAGE function (0 when nothing is numeric)
pub fn fn_average(args: &[FunctionArg], ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    aggregate(args, ctx, |values| {
        if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        }
    })
}

/// COUNT function
pub fn fn_count(args: &[FunctionArg], ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    aggregate(args, ctx, |values| values.len() as f64)
}

/// MAX function (0 when nothing is numeric)
pub fn fn_max(args: &[FunctionArg], ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    aggregate(args, ctx, |values| {
        values.iter().copied().reduce(f64::max).unwrap_or(0.0)
    })
}

/// MIN function (0 when nothing is numeric)
pub fn fn_min(args: &[FunctionArg], ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    aggregate(args, ctx, |values| {
        values.iter().copied().reduce(f64::min).unwrap_or(0.0)
    })
}

#[cfg(test)]
mod tests {
    use crate::evaluate_formula;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn sheet() -> HashMap<String, String> {
        [("A1", "4"), ("A2", "oops"), ("A3", ""), ("A4", "-2"), ("B1", "10")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_text_and_empty_cells_skipped() {
        let cells = sheet();
        assert_eq!(evaluate_formula("=AVERAGE(A1:A4)", &cells), "1");
        assert_eq!(evaluate_formula("=COUNT(A1:A4)", &cells), "2");
        assert_eq!(evaluate_formula("=MAX(A1:A4)", &cells), "4");
        assert_eq!(evaluate_formula("=MIN(A1:A4)", &cells), "-2");
    }

    #[test]
    fn test_mixed_arguments() {
        let cells = sheet();
        assert_eq!(evaluate_formula("=MAX(A1:A4,B1,3)", &cells), "10");
        assert_eq!(evaluate_formula("=MIN(A1,\"-7\",\"x\")", &cells), "-7");
        assert_eq!(evaluate_formula("=COUNT(A1,A2,5,\"6\",\"seven\")", &cells), "3");
        assert_eq!(evaluate_formula("=AVERAGE(1,2,3,4)", &cells), "2.5");
    }

    #[test]
    fn test_no_numeric_values_is_zero() {
        let cells = sheet();
        for formula in ["=MAX(A2:A3)", "=MIN(A2:A3)", "=AVERAGE(A2:A3)", "=COUNT(A2:A3)"] {
            assert_eq!(evaluate_formula(formula, &cells), "0", "{formula}");
        }
    }

    #[test]
    fn test_argument_error_propagates() {
        let cells = sheet();
        assert_eq!(evaluate_formula("=AVERAGE(A1,1/0)", &cells), "#DIV/0!");
        assert_eq!(evaluate_formula("=COUNT(\"a\"*2)", &cells), "#ERROR!");
    }
}
