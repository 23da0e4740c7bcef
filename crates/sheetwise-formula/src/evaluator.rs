//! Formula evaluator
//!
//! Evaluates formula ASTs to produce values.

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use crate::context::FormulaContext;
use crate::error::{FormulaError, FormulaResult};
use crate::functions::{FunctionArg, FunctionRegistry};
use sheetwise_core::{CellError, CellRef};
use sheetwise_gpt::{GptHandle, GptService};
use std::cell::RefCell;
use std::sync::OnceLock;

/// Most cells a single range argument may span
pub const MAX_RANGE_CELLS: u64 = 1_000_000;

/// Global function registry (lazily initialized)
static FUNCTION_REGISTRY: OnceLock<FunctionRegistry> = OnceLock::new();

fn get_function_registry() -> &'static FunctionRegistry {
    FUNCTION_REGISTRY.get_or_init(FunctionRegistry::new)
}

/// Parse cell or literal text as a number.
///
/// Surrounding whitespace is ignored; anything else that is not a finite
/// decimal number (including `inf`/`NaN` spellings) is rejected.
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Display form of a number: `3` rather than `3.0`, and never `-0`.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

/// Value types during formula evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaValue {
    Number(f64),
    String(String),
    Error(CellError),
}

impl FormulaValue {
    /// A computed number, or `#ERROR!` when it overflowed or is undefined
    pub fn number(n: f64) -> Self {
        if n.is_finite() {
            FormulaValue::Number(n)
        } else {
            FormulaValue::Error(CellError::Error)
        }
    }

    /// Coerce for arithmetic.
    ///
    /// Empty text counts as 0 and text holding an error sentinel (a cell
    /// that displays `#DIV/0!`) becomes that error.
    pub fn to_number(&self) -> Result<f64, CellError> {
        match self {
            FormulaValue::Number(n) => Ok(*n),
            FormulaValue::Error(e) => Err(*e),
            FormulaValue::String(s) if s.trim().is_empty() => Ok(0.0),
            FormulaValue::String(s) => parse_number(s)
                .ok_or_else(|| CellError::from_sentinel(s.trim()).unwrap_or(CellError::Error)),
        }
    }

    /// Boolean coercion of a literal
    pub fn is_truthy(&self) -> bool {
        match self {
            FormulaValue::Number(n) => *n != 0.0 && !n.is_nan(),
            FormulaValue::String(s) => !s.is_empty(),
            FormulaValue::Error(_) => false,
        }
    }

    /// Convert to the string shown in a cell
    pub fn as_string(&self) -> String {
        match self {
            FormulaValue::Number(n) => format_number(*n),
            FormulaValue::String(s) => s.clone(),
            FormulaValue::Error(e) => e.to_string(),
        }
    }
}

/// Context for formula evaluation
///
/// Borrows the host's cells for one evaluation and, when a completion service
/// is attached, records every GPT request the formula touched.
pub struct EvaluationContext<'a> {
    cells: &'a dyn FormulaContext,
    gpt: Option<&'a GptService>,
    requests: RefCell<Vec<GptHandle>>,
}

impl<'a> EvaluationContext<'a> {
    /// Create a new evaluation context without a completion service
    pub fn new(cells: &'a dyn FormulaContext) -> Self {
        Self {
            cells,
            gpt: None,
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Attach the completion service `GPT()` calls go to
    pub fn with_gpt(mut self, gpt: &'a GptService) -> Self {
        self.gpt = Some(gpt);
        self
    }

    /// Get a cell value from the host
    pub fn get_cell_value(&self, cell: CellRef) -> String {
        self.cells.get_cell_value(&cell.to_a1_string())
    }

    pub fn gpt(&self) -> Option<&'a GptService> {
        self.gpt
    }

    /// Remember a request issued during this evaluation (once per id)
    pub fn track_request(&self, handle: GptHandle) {
        let mut requests = self.requests.borrow_mut();
        if !requests
            .iter()
            .any(|known| known.request_id() == handle.request_id())
        {
            requests.push(handle);
        }
    }

    /// Requests issued or joined during this evaluation, in call order
    pub fn into_requests(self) -> Vec<GptHandle> {
        self.requests.into_inner()
    }
}

/// Evaluate a formula AST
pub fn evaluate(expr: &FormulaExpr, ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    match expr {
        // === Literals ===
        FormulaExpr::Number(n) => Ok(FormulaValue::Number(*n)),
        FormulaExpr::String(s) => Ok(FormulaValue::String(s.clone())),

        // === References ===
        FormulaExpr::CellRef(cell) => Ok(FormulaValue::String(ctx.get_cell_value(*cell))),

        FormulaExpr::RangeRef(range) => Err(FormulaError::Evaluation(format!(
            "Range {} can only be used as a function argument",
            range
        ))),

        // === Operators ===
        FormulaExpr::BinaryOp { op, left, right } => evaluate_binary_op(*op, left, right, ctx),

        FormulaExpr::UnaryOp { op, operand } => evaluate_unary_op(*op, operand, ctx),

        // === Functions ===
        FormulaExpr::Function { name, args } => evaluate_function(name, args, ctx),
    }
}

/// Evaluate a binary operation
fn evaluate_binary_op(
    op: BinaryOperator,
    left: &FormulaExpr,
    right: &FormulaExpr,
    ctx: &EvaluationContext,
) -> FormulaResult<FormulaValue> {
    // Evaluate operands first
    let left_val = evaluate(left, ctx)?;
    let right_val = evaluate(right, ctx)?;

    // Coerce left to right; the first operand that fails is the result
    let l = match left_val.to_number() {
        Ok(n) => n,
        Err(e) => return Ok(FormulaValue::Error(e)),
    };
    let r = match right_val.to_number() {
        Ok(n) => n,
        Err(e) => return Ok(FormulaValue::Error(e)),
    };

    let result = match op {
        BinaryOperator::Add => l + r,
        BinaryOperator::Subtract => l - r,
        BinaryOperator::Multiply => l * r,
        BinaryOperator::Divide => {
            if r == 0.0 {
                return Ok(FormulaValue::Error(CellError::Div0));
            }
            l / r
        }
    };

    Ok(FormulaValue::number(result))
}

/// Evaluate a unary operation
fn evaluate_unary_op(
    op: UnaryOperator,
    operand: &FormulaExpr,
    ctx: &EvaluationContext,
) -> FormulaResult<FormulaValue> {
    let n = match evaluate(operand, ctx)?.to_number() {
        Ok(n) => n,
        Err(e) => return Ok(FormulaValue::Error(e)),
    };

    match op {
        UnaryOperator::Negate => Ok(FormulaValue::Number(-n)),
        UnaryOperator::Plus => Ok(FormulaValue::Number(n)),
    }
}

/// Evaluate a function call
///
/// Bare cell references and ranges reach the function unresolved; every other
/// argument is evaluated first.
fn evaluate_function(
    name: &str,
    args: &[FormulaExpr],
    ctx: &EvaluationContext,
) -> FormulaResult<FormulaValue> {
    let registry = get_function_registry();

    let func = registry
        .get(name)
        .ok_or_else(|| FormulaError::UnknownFunction(name.to_string()))?;

    // Check argument count
    if args.len() < func.min_args {
        return Err(FormulaError::ArgumentCount {
            function: name.to_string(),
            expected: format!("at least {}", func.min_args),
            actual: args.len(),
        });
    }

    if let Some(max) = func.max_args {
        if args.len() > max {
            return Err(FormulaError::ArgumentCount {
                function: name.to_string(),
                expected: format!("at most {}", max),
                actual: args.len(),
            });
        }
    }

    let mut resolved = Vec::with_capacity(args.len());
    for arg in args {
        resolved.push(match arg {
            FormulaExpr::CellRef(cell) => FunctionArg::Cell(*cell),
            FormulaExpr::RangeRef(range) if range.cell_count() > MAX_RANGE_CELLS => {
                return Err(FormulaError::Evaluation(format!(
                    "Range {} spans more than {} cells",
                    range, MAX_RANGE_CELLS
                )));
            }
            FormulaExpr::RangeRef(range) => FunctionArg::Range(*range),
            expr => FunctionArg::Value(evaluate(expr, ctx)?),
        });
    }

    // Call the function
    (func.implementation)(&resolved, ctx)
}
