use rayon::prelude::*;

use std::cmp;

/// Threshold for using parallel processing (rows * cols)
const PARALLEL_THRESHOLD: usize = 10_000;

/// Extra column added to every computed width
pub const WIDTH_MARGIN: usize = 1;

/// Terminal display width of a cell value
pub fn display_width(s: &str) -> usize {
    unicode_width::UnicodeWidthStr::width(s)
}

/// Immutable header + rows loaded for one session.
///
/// Rows are expected to be exactly as long as the header; the loader is
/// responsible for handing over a rectangular grid.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.columns.len()
    }

    pub fn get_row(&self, idx: usize) -> Option<&[String]> {
        self.rows.get(idx).map(|r| r.as_slice())
    }

    #[cfg(test)]
    pub fn get_cell(&self, row: usize, col: usize) -> Option<&String> {
        self.rows.get(row)?.get(col)
    }

    /// Header followed by every data row
    fn records(&self) -> impl Iterator<Item = &[String]> {
        std::iter::once(self.columns.as_slice()).chain(self.rows.iter().map(|r| r.as_slice()))
    }
}

/// Per-column rendering widths, computed once from the grid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnWidths {
    col_widths: Vec<usize>,
}

impl ColumnWidths {
    /// Widest value of each column across header and rows, plus the margin.
    /// Uses parallel processing for large grids.
    pub fn compute(grid: &Grid) -> Self {
        let col_count = grid.col_count();
        let size = grid.row_count().saturating_mul(col_count);

        let fold_record = |mut acc: Vec<usize>, record: &[String]| {
            for (acc_w, x) in acc.iter_mut().zip(record.iter()) {
                *acc_w = cmp::max(*acc_w, display_width(x));
            }
            acc
        };

        let maxima: Vec<usize> = if size >= PARALLEL_THRESHOLD && col_count > 1 {
            let header = fold_record(vec![0; col_count], grid.columns());
            grid.rows()
                .par_iter()
                .fold(|| vec![0; col_count], |acc, row| fold_record(acc, row))
                .reduce(
                    || header.clone(),
                    |a, b| a.iter().zip(b.iter()).map(|(x, y)| cmp::max(*x, *y)).collect(),
                )
        } else {
            grid.records().fold(vec![0; col_count], fold_record)
        };

        Self {
            col_widths: maxima.into_iter().map(|w| w + WIDTH_MARGIN).collect(),
        }
    }

    pub fn get(&self, col_idx: usize) -> Option<usize> {
        self.col_widths.get(col_idx).copied()
    }

    #[cfg(test)]
    pub fn as_slice(&self) -> &[usize] {
        &self.col_widths
    }
}
