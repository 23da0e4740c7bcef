//! # sheetwise
//!
//! A spreadsheet formula engine whose formulas can ask a chat model for text.
//!
//! ## Features
//!
//! - A1-style references and rectangular ranges
//! - Formula parsing and evaluation with `+ - * /`, parentheses and nested calls
//! - Built-ins: SUM, AVERAGE, COUNT, MAX, MIN, CONCATENATE, IF
//! - `GPT(prompt)`: returns a `Loading... (<id>)` placeholder at once, deduplicates
//!   identical pending prompts, and delivers the answer later as a completion signal
//! - An in-memory [`Sheet`] host with CSV import and export
//!
//! ## Example
//!
//! ```rust
//! use sheetwise::prelude::*;
//!
//! let mut sheet = Sheet::new();
//! sheet.set_input("A1", "10")?;
//! sheet.set_input("A2", "32")?;
//! sheet.set_input("A3", "=SUM(A1:A2)")?;
//!
//! assert_eq!(sheet.value(CellRef::parse("A3")?), "42");
//! # Ok::<(), sheetwise::Error>(())
//! ```
//!
//! With a completion service attached, `GPT()` answers arrive asynchronously:
//!
//! ```rust,no_run
//! use sheetwise::prelude::*;
//!
//! # async fn example() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let gpt = GptService::http(GptConfig::from_env()?, tokio::runtime::Handle::current())?;
//! let mut sheet = Sheet::with_engine(Engine::with_gpt(gpt));
//!
//! let requests = sheet.set_input("B1", "=GPT(\"Name a prime\")")?;
//! sheet.settle(requests).await;
//! println!("{}", sheet.value(CellRef::parse("B1")?));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod grid;
pub mod prelude;
pub mod sheet;

pub use error::{Error, Result};
pub use grid::{CsvReader, CsvWriter};
pub use sheet::{CellData, Sheet};

// Re-export core types
pub use sheetwise_core::{
    expand_range, format_ref, parse_ref, CellError, CellRange, CellRangeIterator, CellRef,
};

// Re-export formula types
pub use sheetwise_formula::{
    evaluate, evaluate_formula, normalize, parse_formula, Engine, Evaluation, EvaluationContext,
    FormulaContext, FormulaError, FormulaExpr, FormulaResult, FormulaValue, MAX_NESTING_DEPTH,
    MAX_OPERATORS, MAX_RANGE_CELLS,
};

// Re-export completion service types
pub use sheetwise_gpt::{
    placeholder_request_id, ChatClient, ChatFuture, CompletionSignal, GptConfig, GptError,
    GptHandle, GptRequest, GptService, HttpChatClient, RequestStatus,
};
