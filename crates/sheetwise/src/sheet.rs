//! In-memory host grid
//!
//! A [`Sheet`] stores what the user typed into each cell and what the cell
//! currently shows. Formulas are evaluated when they are entered; `GPT()`
//! placeholders are replaced when their completion arrives.

use std::collections::BTreeMap;

use sheetwise_core::{CellRange, CellRef};
use sheetwise_formula::{Engine, FormulaContext};
use sheetwise_gpt::{CompletionSignal, GptHandle};

use crate::error::Result;

/// Contents of one cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellData {
    /// Display value
    pub value: String,
    /// Formula text as entered (with its leading `=`), if the cell holds one
    pub formula: Option<String>,
}

impl CellData {
    pub fn is_formula(&self) -> bool {
        self.formula.is_some()
    }
}

/// A single grid of cells bound to a formula [`Engine`]
#[derive(Clone, Default)]
pub struct Sheet {
    cells: BTreeMap<CellRef, CellData>,
    engine: Engine,
}

impl Sheet {
    /// Sheet whose formulas cannot call `GPT()`
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engine(engine: Engine) -> Self {
        Self {
            cells: BTreeMap::new(),
            engine,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Enter text into a cell, as a user would.
    ///
    /// Text starting with `=` is a formula and is evaluated at once against
    /// the current grid; anything else is stored verbatim. Empty text clears
    /// the cell. Returns the completion requests the formula issued.
    pub fn set_input(&mut self, reference: &str, input: &str) -> Result<Vec<GptHandle>> {
        let cell = CellRef::parse(reference)?;
        Ok(self.set_input_at(cell, input))
    }

    /// Like [`Sheet::set_input`], addressed by index
    pub fn set_input_at(&mut self, cell: CellRef, input: &str) -> Vec<GptHandle> {
        if input.is_empty() {
            self.cells.remove(&cell);
            return Vec::new();
        }

        if !input.starts_with('=') {
            self.cells.insert(
                cell,
                CellData {
                    value: input.to_string(),
                    formula: None,
                },
            );
            return Vec::new();
        }

        let evaluation = self.engine.evaluate(input, &*self);
        tracing::debug!("{} {} -> {:?}", cell, input, evaluation.display);
        self.cells.insert(
            cell,
            CellData {
                value: evaluation.display,
                formula: Some(input.to_string()),
            },
        );
        evaluation.requests
    }

    /// Display value of a cell, `""` when empty
    pub fn value(&self, cell: CellRef) -> &str {
        self.cells.get(&cell).map_or("", |data| data.value.as_str())
    }

    pub fn formula(&self, cell: CellRef) -> Option<&str> {
        self.cells.get(&cell).and_then(|data| data.formula.as_deref())
    }

    pub fn cell(&self, cell: CellRef) -> Option<&CellData> {
        self.cells.get(&cell)
    }

    /// Non-empty cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (CellRef, &CellData)> {
        self.cells.iter().map(|(cell, data)| (*cell, data))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Smallest range from A1 covering every non-empty cell
    pub fn used_range(&self) -> Option<CellRange> {
        let max_row = self.cells.keys().map(|c| c.row).max()?;
        let max_col = self.cells.keys().map(|c| c.col).max()?;
        Some(CellRange::new(CellRef::new(0, 0), CellRef::new(max_row, max_col)))
    }

    /// Re-evaluate every formula once, in row-major order.
    ///
    /// A formula sees the new values of the formulas before it and the old
    /// values of those after it. `GPT()` calls whose prompt is still pending
    /// join that request; finished prompts are asked again.
    pub fn recalculate(&mut self) -> Vec<GptHandle> {
        let formulas: Vec<(CellRef, String)> = self
            .cells
            .iter()
            .filter_map(|(cell, data)| data.formula.clone().map(|f| (*cell, f)))
            .collect();

        let mut requests: Vec<GptHandle> = Vec::new();
        for (cell, formula) in formulas {
            for handle in self.set_input_at(cell, &formula) {
                if !requests.iter().any(|h| h.request_id() == handle.request_id()) {
                    requests.push(handle);
                }
            }
        }
        requests
    }

    /// Show a completion in every cell waiting on it.
    ///
    /// Only the waiting cells change; formulas reading them are not
    /// re-evaluated. Returns the updated cells.
    pub fn apply_completion(&mut self, signal: &CompletionSignal) -> Vec<CellRef> {
        let mut updated = Vec::new();
        for (cell, data) in self.cells.iter_mut() {
            let Some(formula) = &data.formula else {
                continue;
            };
            if signal.matches_cell(formula, &data.value) {
                data.value = signal.result.clone();
                updated.push(*cell);
            }
        }

        tracing::debug!(
            "Completion {} updated {} cell(s)",
            signal.request_id,
            updated.len()
        );
        updated
    }

    /// Wait for `requests` and apply each completion as it is delivered.
    ///
    /// Handles sharing a request id are waited on once. Returns every cell
    /// that changed. A request whose service went away is skipped with a
    /// warning.
    pub async fn settle(&mut self, requests: Vec<GptHandle>) -> Vec<CellRef> {
        let mut updated = Vec::new();
        let mut seen: Vec<String> = Vec::new();
        for handle in requests {
            if seen.iter().any(|id| id == handle.request_id()) {
                continue;
            }
            seen.push(handle.request_id().to_string());

            let request_id = handle.request_id().to_string();
            match handle.wait().await {
                Ok(signal) => updated.extend(self.apply_completion(&signal)),
                Err(e) => tracing::warn!("Request {} never completed: {}", request_id, e),
            }
        }
        updated
    }
}

impl FormulaContext for Sheet {
    fn get_cell_value(&self, reference: &str) -> String {
        CellRef::parse(reference)
            .map(|cell| self.value(cell).to_string())
            .unwrap_or_default()
    }
}
