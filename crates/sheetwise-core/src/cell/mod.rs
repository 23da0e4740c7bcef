//! Cell addressing and error values

mod address;
mod error;

pub use address::{expand_range, format_ref, parse_ref, CellRange, CellRangeIterator, CellRef};
pub use error::CellError;
