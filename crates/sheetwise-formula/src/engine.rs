//! Public entry points: formula text in, display text out

use crate::context::FormulaContext;
use crate::evaluator::{evaluate, EvaluationContext};
use crate::parser::parse_formula;
use sheetwise_core::CellError;
use sheetwise_gpt::{GptHandle, GptService};

/// Evaluate a formula without a completion service.
///
/// Never fails: parse errors and other faults show as `#ERROR!`, and `GPT()`
/// calls evaluate to `#ERROR!`.
///
/// ```
/// use sheetwise_formula::evaluate_formula;
/// use std::collections::HashMap;
///
/// let mut cells = HashMap::new();
/// cells.insert("A1".to_string(), "2".to_string());
///
/// assert_eq!(evaluate_formula("=A1*(1+2)", &cells), "6");
/// assert_eq!(evaluate_formula("=5/0", &cells), "#DIV/0!");
/// ```
pub fn evaluate_formula(formula: &str, cells: &dyn FormulaContext) -> String {
    Engine::new().evaluate_formula(formula, cells)
}

/// Result of one evaluation
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// What the cell shows now (possibly a `Loading... (<id>)` placeholder)
    pub display: String,
    /// Every completion request the formula issued or joined
    pub requests: Vec<GptHandle>,
}

/// Formula evaluator bound to an optional completion service.
///
/// Cloning shares the service, so every clone sees the same request table.
#[derive(Clone, Default)]
pub struct Engine {
    gpt: Option<GptService>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine whose `GPT()` calls go to `gpt`
    pub fn with_gpt(gpt: GptService) -> Self {
        Self { gpt: Some(gpt) }
    }

    /// Evaluate `formula` (leading `=` optional) against the host's cells
    pub fn evaluate(&self, formula: &str, cells: &dyn FormulaContext) -> Evaluation {
        let mut ctx = EvaluationContext::new(cells);
        if let Some(gpt) = &self.gpt {
            ctx = ctx.with_gpt(gpt);
        }

        let display = match parse_formula(formula).and_then(|ast| evaluate(&ast, &ctx)) {
            Ok(value) => value.as_string(),
            Err(e) => {
                tracing::debug!("Formula {:?} failed: {}", formula, e);
                CellError::Error.to_string()
            }
        };

        Evaluation {
            display,
            requests: ctx.into_requests(),
        }
    }

    /// Like [`Engine::evaluate`], keeping only the display text
    pub fn evaluate_formula(&self, formula: &str, cells: &dyn FormulaContext) -> String {
        self.evaluate(formula, cells).display
    }
}
