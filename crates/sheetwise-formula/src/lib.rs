//! # sheetwise-formula
//!
//! Formula parser and evaluator for sheetwise.
//!
//! This crate provides:
//! - Case normalization that leaves quoted text alone
//! - Formula parsing (text → AST)
//! - Formula evaluation (AST → value, errors as values)
//! - Built-in functions: SUM, AVERAGE, COUNT, MAX, MIN, CONCATENATE, IF, GPT
//!
//! ## Example
//!
//! ```rust
//! use sheetwise_formula::{evaluate, parse_formula, EvaluationContext, FormulaValue};
//! use std::collections::HashMap;
//!
//! let cells: HashMap<String, String> = HashMap::new();
//! let ast = parse_formula("=sum(1,2)*3")?;
//! let value = evaluate(&ast, &EvaluationContext::new(&cells))?;
//! assert_eq!(value, FormulaValue::Number(9.0));
//! # Ok::<(), sheetwise_formula::FormulaError>(())
//! ```

pub mod ast;
pub mod context;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod normalize;
pub mod parser;

pub use ast::{BinaryOperator, FormulaExpr, UnaryOperator};
pub use context::FormulaContext;
pub use engine::{evaluate_formula, Engine, Evaluation};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{
    evaluate, format_number, parse_number, EvaluationContext, FormulaValue, MAX_RANGE_CELLS,
};
pub use functions::{FunctionArg, FunctionDef, FunctionRegistry};
pub use normalize::normalize;
pub use parser::{parse_formula, MAX_NESTING_DEPTH, MAX_OPERATORS};
