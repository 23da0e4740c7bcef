//! CSV grid import and export
//!
//! Record 1 is spreadsheet row 1 and field 1 is column A. No header row.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use sheetwise_core::CellRef;
use sheetwise_gpt::GptHandle;

use crate::error::{Error, Result};
use crate::sheet::Sheet;

/// Loads CSV grids into a [`Sheet`]
pub struct CsvReader;

impl CsvReader {
    /// Read a CSV file into `sheet`
    pub fn read_file<P: AsRef<Path>>(path: P, sheet: &mut Sheet) -> Result<Vec<GptHandle>> {
        let file = File::open(path)?;
        Self::read(file, sheet)
    }

    /// Read CSV from a reader into `sheet`.
    ///
    /// Plain values are stored first, then formulas are entered in row-major
    /// order, so a formula sees every plain value of the grid but only the
    /// formulas above and to the left of it. Returns the completion requests
    /// the formulas issued.
    pub fn read<R: Read>(reader: R, sheet: &mut Sheet) -> Result<Vec<GptHandle>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut formulas = Vec::new();
        for (row, result) in csv_reader.records().enumerate() {
            let record = result?;
            let row = u32::try_from(row).map_err(|_| Error::GridTooLarge(format!("row {}", row + 1)))?;

            for (col, field) in record.iter().enumerate() {
                let col = u32::try_from(col)
                    .map_err(|_| Error::GridTooLarge(format!("column {}", col + 1)))?;
                let cell = CellRef::new(row, col);

                if field.starts_with('=') {
                    formulas.push((cell, field.to_string()));
                } else {
                    sheet.set_input_at(cell, field);
                }
            }
        }

        tracing::debug!("Loaded {} cells, {} formulas", sheet.len(), formulas.len());

        let mut requests: Vec<GptHandle> = Vec::new();
        for (cell, formula) in formulas {
            for handle in sheet.set_input_at(cell, &formula) {
                if !requests.iter().any(|h| h.request_id() == handle.request_id()) {
                    requests.push(handle);
                }
            }
        }
        Ok(requests)
    }
}

/// Writes a [`Sheet`]'s display values as CSV
pub struct CsvWriter;

impl CsvWriter {
    /// Write the sheet's values to a CSV file
    pub fn write_file<P: AsRef<Path>>(sheet: &Sheet, path: P) -> Result<()> {
        let file = File::create(path)?;
        Self::write(sheet, file)
    }

    /// Write the sheet's values, one record per row of the used range
    pub fn write<W: Write>(sheet: &Sheet, writer: W) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(writer);

        if let Some(range) = sheet.used_range() {
            for row in range.start.row..=range.end.row {
                let record: Vec<&str> = (range.start.col..=range.end.col)
                    .map(|col| sheet.value(CellRef::new(row, col)))
                    .collect();
                csv_writer.write_record(&record)?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }
}
