//! This module defines the row-by-row access the mapping layer needs from
//! the matrix data, plus a plain in-memory implementation of it.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::{CiftiError, Result};
use crate::model::HeaderModel;

/// Row-addressable float matrix storage. Row buffers are always exactly as
/// wide as the matrix.
pub trait MatrixResource {
  /// Number of rows.
  fn number_of_rows(&self) -> usize;

  /// Number of columns, i.e. the width of a row buffer.
  fn number_of_columns(&self) -> usize;

  /// Copies a row into a buffer.
  fn get_row(&self, buffer: &mut [f32], row: usize) -> Result<()>;

  /// Copies a buffer into a row.
  fn set_row(&mut self, buffer: &[f32], row: usize) -> Result<()>;

  /// Checks that a row and buffer fit this matrix.
  fn check_access(&self, buffer_len: usize, row: usize) -> Result<()> {
    if row >= self.number_of_rows() {
      return Err(CiftiError::IndexOutOfRange {
        what: "matrix rows",
        index: row,
        length: self.number_of_rows()
      });
    }
    if buffer_len != self.number_of_columns() {
      return Err(CiftiError::BufferSize {
        expected: self.number_of_columns(),
        found: buffer_len
      });
    }
    return Ok(());
  }
}

/// A matrix held entirely in memory.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct InMemoryMatrix {
  /// The data.
  data: DMatrix<f32>
}

impl InMemoryMatrix {
  /// A matrix of zeros.
  pub fn zeros(rows: usize, columns: usize) -> Self {
    return Self { data: DMatrix::zeros(rows, columns) };
  }

  /// A matrix of zeros shaped for a header.
  pub fn for_header(header: &HeaderModel) -> Self {
    return Self::zeros(header.number_of_rows(), header.number_of_columns());
  }

  /// Builds a matrix out of rows, which must all be the same width.
  pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self> {
    let columns = rows.first().map_or(0, |r| r.len());
    if let Some(bad) = rows.iter().find(|r| r.len() != columns) {
      return Err(CiftiError::BufferSize { expected: columns, found: bad.len() });
    }
    let data = DMatrix::from_fn(rows.len(), columns, |r, c| rows[r][c]);
    return Ok(Self { data });
  }

  /// Gets a single value.
  pub fn get(&self, row: usize, column: usize) -> Option<f32> {
    return self.data.get((row, column)).copied();
  }

  /// Iterates over the rows as vectors.
  pub fn rows(&self) -> impl Iterator<Item = Vec<f32>> + '_ {
    return self.data.row_iter().map(|r| r.iter().copied().collect());
  }
}

impl MatrixResource for InMemoryMatrix {
  fn number_of_rows(&self) -> usize {
    return self.data.nrows();
  }

  fn number_of_columns(&self) -> usize {
    return self.data.ncols();
  }

  fn get_row(&self, buffer: &mut [f32], row: usize) -> Result<()> {
    self.check_access(buffer.len(), row)?;
    for (dst, src) in buffer.iter_mut().zip(self.data.row(row).iter()) {
      *dst = *src;
    }
    return Ok(());
  }

  fn set_row(&mut self, buffer: &[f32], row: usize) -> Result<()> {
    self.check_access(buffer.len(), row)?;
    for (dst, src) in self.data.row_mut(row).iter_mut().zip(buffer.iter()) {
      *dst = *src;
    }
    return Ok(());
  }
}
