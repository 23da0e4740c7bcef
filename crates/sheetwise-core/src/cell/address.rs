//! Cell reference and range types

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A single cell reference (e.g., "A1", "AA10")
///
/// Rows and columns are 0-based internally. The text form is a base-26 column
/// sequence without a zero digit (A..Z, AA..) followed by the 1-based row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRef {
    /// Row index (0-based internally, 1-based in display)
    pub row: u32,
    /// Column index (0-based, A=0, B=1, ..., Z=25, AA=26)
    pub col: u32,
}

impl CellRef {
    /// Create a new cell reference from 0-based indices
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Parse a reference in canonical upper-case A1 notation
    ///
    /// Lower-case letters, `$` markers and trailing characters are rejected;
    /// case folding is the caller's job.
    ///
    /// # Examples
    /// ```
    /// use sheetwise_core::CellRef;
    ///
    /// let addr = CellRef::parse("B2").unwrap();
    /// assert_eq!(addr, CellRef::new(1, 1));
    ///
    /// assert!(CellRef::parse("b2").is_err());
    /// assert!(CellRef::parse("A0").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let letters = s.bytes().take_while(|b| b.is_ascii_uppercase()).count();
        if letters == 0 {
            return Err(Error::InvalidAddress(format!("no column letters in '{}'", s)));
        }

        let row_str = &s[letters..];
        if row_str.is_empty() {
            return Err(Error::InvalidAddress(format!("no row number in '{}'", s)));
        }
        if !row_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAddress(format!(
                "unexpected characters in '{}'",
                s
            )));
        }

        let col = Self::letters_to_column(&s[..letters])?;

        let row: u32 = row_str
            .parse()
            .map_err(|_| Error::RowOutOfRange(s.to_string()))?;

        // Rows are 1-based in text, 0-based internally
        let row = row
            .checked_sub(1)
            .ok_or_else(|| Error::RowOutOfRange(format!("row number must be >= 1 in '{}'", s)))?;

        Ok(Self { row, col })
    }

    /// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
    pub fn column_to_letters(col: u32) -> String {
        let mut letters = Vec::new();
        let mut n = col as u64 + 1;

        while n > 0 {
            n -= 1;
            letters.push((n % 26) as u8 + b'A');
            n /= 26;
        }

        letters.iter().rev().map(|&b| b as char).collect()
    }

    /// Convert upper-case column letters to an index (A = 0, Z = 25, AA = 26, etc.)
    pub fn letters_to_column(letters: &str) -> Result<u32> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }

        let mut col: u64 = 0;
        for c in letters.bytes() {
            if !c.is_ascii_uppercase() {
                return Err(Error::InvalidAddress(format!(
                    "invalid column letter '{}'",
                    c as char
                )));
            }
            col = col
                .checked_mul(26)
                .and_then(|v| v.checked_add((c - b'A') as u64 + 1))
                .filter(|v| *v <= u32::MAX as u64 + 1)
                .ok_or_else(|| Error::ColumnOutOfRange(letters.to_string()))?;
        }

        Ok((col - 1) as u32)
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        format!(
            "{}{}",
            Self::column_to_letters(self.col),
            self.row as u64 + 1
        )
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Parse a cell reference, returning `None` for anything that is not
/// exactly "upper-case letters then digits".
pub fn parse_ref(text: &str) -> Option<CellRef> {
    CellRef::parse(text).ok()
}

/// Format 0-based coordinates as an A1-style reference.
///
/// `parse_ref(&format_ref(r, c)) == Some(CellRef::new(r, c))` for every row
/// below `u32::MAX`. Row `u32::MAX` formats as row number `4294967296`, which
/// is past the last addressable row, so `parse_ref` rejects it.
pub fn format_ref(row: u32, col: u32) -> String {
    CellRef::new(row, col).to_a1_string()
}

/// Expand a reference or range text into its cells.
///
/// A lone reference yields itself, a two-endpoint range yields every cell of
/// the rectangle in row-major order, and anything unparsable yields nothing.
pub fn expand_range(text: &str) -> Vec<CellRef> {
    let mut parts = text.split(':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(single), None, _) => parse_ref(single).into_iter().collect(),
        (Some(start), Some(end), None) => match (parse_ref(start), parse_ref(end)) {
            (Some(start), Some(end)) => CellRange::new(start, end).cells().collect(),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// A rectangular range of cells (e.g., "A1:B10")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    /// Top-left corner
    pub start: CellRef,
    /// Bottom-right corner
    pub end: CellRef,
}

impl CellRange {
    /// Create a new cell range; the corners may be given in any order
    pub fn new(a: CellRef, b: CellRef) -> Self {
        Self {
            start: CellRef::new(a.row.min(b.row), a.col.min(b.col)),
            end: CellRef::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    /// Create a single-cell range
    pub fn single(addr: CellRef) -> Self {
        Self {
            start: addr,
            end: addr,
        }
    }

    /// Parse a range from A1:B10 notation (a lone reference is a single-cell range)
    pub fn parse(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((start, end)) => {
                let start = CellRef::parse(start)
                    .map_err(|e| Error::InvalidRange(format!("'{}': {}", s, e)))?;
                let end = CellRef::parse(end)
                    .map_err(|e| Error::InvalidRange(format!("'{}': {}", s, e)))?;
                Ok(Self::new(start, end))
            }
            None => Ok(Self::single(CellRef::parse(s)?)),
        }
    }

    /// Check if a cell is within this range
    pub fn contains(&self, addr: &CellRef) -> bool {
        addr.row >= self.start.row
            && addr.row <= self.end.row
            && addr.col >= self.start.col
            && addr.col <= self.end.col
    }

    /// Get the number of rows in the range
    pub fn row_count(&self) -> u64 {
        (self.end.row - self.start.row) as u64 + 1
    }

    /// Get the number of columns in the range
    pub fn col_count(&self) -> u64 {
        (self.end.col - self.start.col) as u64 + 1
    }

    /// Get the total number of cells in the range
    pub fn cell_count(&self) -> u64 {
        self.row_count().saturating_mul(self.col_count())
    }

    /// Iterate over all cells in the range (row by row)
    pub fn cells(&self) -> CellRangeIterator {
        CellRangeIterator {
            range: *self,
            current_row: self.start.row,
            current_col: self.start.col,
            remaining: self.cell_count(),
        }
    }

    /// Format as A1:B10 string
    pub fn to_a1_string(&self) -> String {
        format!("{}:{}", self.start, self.end)
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Row-major iterator over the cells of a range
pub struct CellRangeIterator {
    range: CellRange,
    current_row: u32,
    current_col: u32,
    remaining: u64,
}

impl Iterator for CellRangeIterator {
    type Item = CellRef;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let addr = CellRef::new(self.current_row, self.current_col);

        if self.current_col == self.range.end.col {
            self.current_col = self.range.start.col;
            self.current_row = self.current_row.wrapping_add(1);
        } else {
            self.current_col += 1;
        }

        Some(addr)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CellRangeIterator {}
