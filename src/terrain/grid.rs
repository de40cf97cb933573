//! Height grid loading
//!
//! Rows are newline separated, fields split on a single delimiter character.
//! Rows may differ in length.

use std::fs;
use std::path::Path;

use crate::error::GridError;

/// Ragged 2-D grid of height samples
#[derive(Debug, Clone, PartialEq)]
pub struct HeightGrid {
    pub rows: Vec<Vec<f64>>,
}

impl HeightGrid {
    pub fn new(rows: Vec<Vec<f64>>) -> Self {
        Self { rows }
    }

    /// Parse delimited text. Blank lines are skipped.
    pub fn parse(text: &str, delimiter: char) -> Result<Self, GridError> {
        let mut rows = Vec::new();
        for (line_idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let row = line
                .split(delimiter)
                .enumerate()
                .map(|(col_idx, field)| {
                    let field = field.trim();
                    field.parse::<f64>().map_err(|_| GridError::Parse {
                        line: line_idx + 1,
                        column: col_idx + 1,
                        value: field.to_string(),
                    })
                })
                .collect::<Result<Vec<f64>, GridError>>()?;
            rows.push(row);
        }

        let grid = Self { rows };
        if grid.is_empty() {
            return Err(GridError::Empty);
        }
        Ok(grid)
    }

    pub fn load<P: AsRef<Path>>(path: P, delimiter: char) -> Result<Self, GridError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| GridError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let grid = Self::parse(&contents, delimiter)?;
        log::debug!(
            "loaded {} rows, {} samples from {}",
            grid.rows.len(),
            grid.len(),
            path.display()
        );
        Ok(grid)
    }

    /// Total number of samples
    pub fn len(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Global (min, max), None for an empty grid
    pub fn bounds(&self) -> Option<(f64, f64)> {
        self.rows.iter().flatten().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// Rescale every sample to `(v - min) / max`
    ///
    /// The divisor is the global maximum, not the range. A grid whose maximum
    /// is zero is only shifted.
    pub fn normalized(&self) -> HeightGrid {
        let Some((min, max)) = self.bounds() else {
            return self.clone();
        };
        let divisor = if max == 0.0 { 1.0 } else { max };
        let rows = self
            .rows
            .iter()
            .map(|row| row.iter().map(|&v| (v - min) / divisor).collect())
            .collect();
        HeightGrid { rows }
    }
}
