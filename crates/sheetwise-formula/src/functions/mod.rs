//! Built-in functions

pub mod external;
pub mod logical;
pub mod math;
pub mod statistical;
pub mod text;

use crate::error::FormulaResult;
use crate::evaluator::{EvaluationContext, FormulaValue};
use sheetwise_core::{CellRange, CellRangeIterator, CellRef};
use std::collections::HashMap;

/// A function argument as the function sees it.
///
/// Bare references are left unresolved so each function decides how to read
/// them (a lone cell in `IF` is tested differently from a literal, a range in
/// `SUM` is expanded).
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionArg {
    /// Any other expression, already evaluated
    Value(FormulaValue),
    /// A bare cell reference
    Cell(CellRef),
    /// A bare range
    Range(CellRange),
}

impl FunctionArg {
    /// Cells the argument refers to in row-major order, `None` for values
    pub fn cells(&self) -> Option<CellRangeIterator> {
        match self {
            FunctionArg::Value(_) => None,
            FunctionArg::Cell(cell) => Some(CellRange::single(*cell).cells()),
            FunctionArg::Range(range) => Some(range.cells()),
        }
    }
}

/// Function implementation signature
pub type FunctionImpl = fn(&[FunctionArg], &EvaluationContext) -> FormulaResult<FormulaValue>;

/// Function definition
pub struct FunctionDef {
    /// Function name (uppercase)
    pub name: &'static str,
    /// Minimum arguments
    pub min_args: usize,
    /// Maximum arguments (None = unlimited)
    pub max_args: Option<usize>,
    /// Implementation
    pub implementation: FunctionImpl,
}

/// Function registry
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionDef>,
}

impl FunctionRegistry {
    /// Create a new registry with all built-in functions
    pub fn new() -> Self {
        let mut registry = Self {
            functions: HashMap::new(),
        };

        registry.register_math_functions();
        registry.register_statistical_functions();
        registry.register_text_functions();
        registry.register_logical_functions();
        registry.register_external_functions();

        registry
    }

    /// Look up a function by name
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(&name.to_uppercase())
    }

    /// Register a function
    pub fn register(&mut self, def: FunctionDef) {
        self.functions.insert(def.name.to_uppercase(), def);
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.functions.values().map(|def| def.name).collect();
        names.sort_unstable();
        names
    }

    fn register_math_functions(&mut self) {
        self.register(FunctionDef {
            name: "SUM",
            min_args: 1,
            max_args: None,
            implementation: math::fn_sum,
        });
    }

    fn register_statistical_functions(&mut self) {
        self.register(FunctionDef {
            name: "AVERAGE",
            min_args: 1,
            max_args: None,
            implementation: statistical::fn_average,
        });

        self.register(FunctionDef {
            name: "COUNT",
            min_args: 1,
            max_args: None,
            implementation: statistical::fn_count,
        });

        self.register(FunctionDef {
            name: "MAX",
            min_args: 1,
            max_args: None,
            implementation: statistical::fn_max,
        });

        self.register(FunctionDef {
            name: "MIN",
            min_args: 1,
            max_args: None,
            implementation: statistical::fn_min,
        });
    }

    fn register_text_functions(&mut self) {
        self.register(FunctionDef {
            name: "CONCATENATE",
            min_args: 1,
            max_args: None,
            implementation: text::fn_concatenate,
        });
    }

    fn register_logical_functions(&mut self) {
        // IF with fewer than two arguments is empty text, not an error
        self.register(FunctionDef {
            name: "IF",
            min_args: 0,
            max_args: Some(3),
            implementation: logical::fn_if,
        });
    }

    fn register_external_functions(&mut self) {
        self.register(FunctionDef {
            name: "GPT",
            min_args: 1,
            max_args: Some(1),
            implementation: external::fn_gpt,
        });
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
