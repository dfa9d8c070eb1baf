use serde::{Deserialize, Serialize};
use std::fmt;

/// One cell of an exported table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Text(String),
    Number(f64),
    Flag(bool),
    Empty,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            // Non-finite ratios are shown as undefined rather than inf/NaN
            Cell::Number(v) if !v.is_finite() => f.write_str("undefined"),
            Cell::Number(v) => write!(f, "{}", v),
            Cell::Flag(true) => f.write_str("1"),
            Cell::Flag(false) => f.write_str("0"),
            Cell::Empty => Ok(()),
        }
    }
}

/// A titled, rectangular block of cells placed independently on a sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabularBlock {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl TabularBlock {
    pub fn new(title: impl Into<String>, headers: &[&str]) -> Self {
        Self {
            title: title.into(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub fn width(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }

    /// Header row plus data rows.
    pub fn height(&self) -> usize {
        self.rows.len() + 1
    }

    pub fn column(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }
}
