//! Prelude module - common imports for sheetwise users
//!
//! ```rust
//! use sheetwise::prelude::*;
//! ```

pub use crate::{
    // Cell types
    CellError,
    CellRange,
    CellRef,

    // Completion service
    CompletionSignal,
    GptConfig,
    GptHandle,
    GptService,

    // Evaluation
    Engine,
    FormulaContext,

    // Host grid
    CsvReader,
    CsvWriter,
    Sheet,

    // Error types
    Error,
    Result,
};
