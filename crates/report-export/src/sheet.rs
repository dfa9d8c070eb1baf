use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ExportError;
use batting_analytics::ScorecardBlocks;
use fund_core::TabularBlock;

pub const SHEET_FILE_PREFIX: &str = "combined_data_horizontal_";

/// Blank rows between stacked blocks.
const ROW_GAP: usize = 2;
/// Blank columns between side-by-side batting tables.
const COLUMN_GAP: usize = 3;

/// Top-left (row, column) of every block on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    pub final_scores: (usize, usize),
    pub batting: [(usize, usize); 3],
    pub excess: (usize, usize),
}

impl SheetLayout {
    /// Final scores at the origin, the three batting tables side by side
    /// below it, and the excess-return table below the tallest of those.
    pub fn for_blocks(blocks: &ScorecardBlocks) -> Self {
        let batting_row = blocks.final_scores.rows.len() + ROW_GAP;

        let mut batting = [(batting_row, 0); 3];
        let mut col = 0;
        for (slot, block) in batting.iter_mut().zip(blocks.batting_blocks()) {
            *slot = (batting_row, col);
            col += block.width() + COLUMN_GAP;
        }

        let tallest = blocks
            .batting_blocks()
            .iter()
            .map(|b| b.rows.len())
            .max()
            .unwrap_or(0);

        Self {
            final_scores: (0, 0),
            batting,
            excess: (batting_row + tallest + ROW_GAP, 0),
        }
    }
}

/// A sparse grid of string cells that grows as blocks are placed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetGrid {
    cells: Vec<Vec<String>>,
}

impl SheetGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, row: usize, col: usize, value: String) {
        if self.cells.len() <= row {
            self.cells.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.cells[row];
        if cells.len() <= col {
            cells.resize(col + 1, String::new());
        }
        cells[col] = value;
    }

    pub fn get(&self, row: usize, col: usize) -> &str {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Header row at `(row, col)`, data rows beneath.
    pub fn place(&mut self, block: &TabularBlock, row: usize, col: usize) {
        for (j, header) in block.headers.iter().enumerate() {
            self.set(row, col + j, header.clone());
        }
        for (i, cells) in block.rows.iter().enumerate() {
            for (j, cell) in cells.iter().enumerate() {
                self.set(row + 1 + i, col + j, cell.to_string());
            }
        }
    }

    pub fn height(&self) -> usize {
        self.cells.len()
    }

    pub fn width(&self) -> usize {
        self.cells.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Every row padded to the full grid width.
    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> Result<(), ExportError> {
        let width = self.width();
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in &self.cells {
            let mut padded = row.clone();
            padded.resize(width, String::new());
            csv_writer.write_record(&padded)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

/// Lay out all scorecard blocks on one grid.
pub fn build_sheet(blocks: &ScorecardBlocks) -> SheetGrid {
    let layout = SheetLayout::for_blocks(blocks);
    let mut grid = SheetGrid::new();

    grid.place(&blocks.final_scores, layout.final_scores.0, layout.final_scores.1);
    for (block, (row, col)) in blocks.batting_blocks().into_iter().zip(layout.batting) {
        grid.place(block, row, col);
    }
    grid.place(&blocks.excess, layout.excess.0, layout.excess.1);
    grid
}

/// `combined_data_horizontal_<fund>.csv`, with path separators in the fund
/// name replaced.
pub fn sheet_file_name(fund_name: &str) -> String {
    let safe: String = fund_name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();
    format!("{}{}.csv", SHEET_FILE_PREFIX, safe)
}

/// Write the scorecard sheet into `out_dir` and return its path.
pub fn export_scorecard(
    fund_name: &str,
    blocks: &ScorecardBlocks,
    out_dir: &Path,
) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(sheet_file_name(fund_name));

    let grid = build_sheet(blocks);
    grid.write_csv(fs::File::create(&path)?)?;

    tracing::info!(
        "Exported {}x{} sheet for '{}' to {}",
        grid.height(),
        grid.width(),
        fund_name,
        path.display()
    );
    Ok(path)
}
