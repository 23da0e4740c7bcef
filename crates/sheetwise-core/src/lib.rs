//! # sheetwise-core
//!
//! Core types shared by the sheetwise formula engine:
//! - [`CellRef`] and [`CellRange`] - A1-style addressing and rectangular ranges
//! - [`parse_ref`], [`format_ref`], [`expand_range`] - the reference resolver
//! - [`CellError`] - the closed set of error values a formula can produce
//!
//! ## Example
//!
//! ```rust
//! use sheetwise_core::{expand_range, format_ref, parse_ref, CellRef};
//!
//! assert_eq!(parse_ref("B3"), Some(CellRef::new(2, 1)));
//! assert_eq!(format_ref(0, 26), "AA1");
//!
//! let cells: Vec<String> = expand_range("A1:B2").iter().map(|c| c.to_string()).collect();
//! assert_eq!(cells, ["A1", "B1", "A2", "B2"]);
//! ```

pub mod cell;
pub mod error;

pub use cell::{expand_range, format_ref, parse_ref, CellError, CellRange, CellRangeIterator, CellRef};
pub use error::{Error, Result};
