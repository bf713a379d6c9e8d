//! Border-free text tables.

use std::fmt;

const COLUMN_GAP: &str = "  ";

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Free text
    Text(String),
    /// Boolean flag, printed as `true`/`false`
    Flag(bool),
    /// Integer value
    Int(i64),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Flag(flag) => write!(f, "{flag}"),
            Self::Int(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// Render rows as a left-aligned table.
///
/// Every column is padded to its widest cell and separated from the next by
/// two spaces; trailing whitespace is trimmed. The first row is usually the
/// header. Each line, including the last, ends with a newline.
#[must_use]
pub fn render_table(rows: &[Vec<Cell>]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect();

    let columns = cells.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in &cells {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in &cells {
        let mut line = String::new();
        for (idx, cell) in row.iter().enumerate() {
            if idx > 0 {
                line.push_str(COLUMN_GAP);
            }
            line.push_str(cell);
            let pad = widths[idx] - cell.chars().count();
            line.extend(std::iter::repeat(' ').take(pad));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
