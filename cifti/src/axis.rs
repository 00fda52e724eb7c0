//! This module defines the two matrix directions and the kinds of mapping
//! that can be attached to each of them.

use std::fmt::Display;
use core::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// The two directions of a CIFTI matrix.
///
/// `AlongColumn` describes the indices met when walking down a column, i.e.
/// the row indices, so its length is the number of rows. `AlongRow` describes
/// the column indices.
#[derive(
  Copy, Clone, Debug, Serialize, Deserialize, PartialOrd, Ord, PartialEq, Eq,
  Hash, ValueEnum
)]
pub enum Direction {
  /// Indices along a row, i.e. the columns.
  AlongRow,
  /// Indices along a column, i.e. the rows.
  AlongColumn
}

impl Direction {
  /// Returns a short, uppercase name for this direction.
  pub const fn name(&self) -> &'static str {
    return match self {
      Self::AlongRow => "ALONG_ROW",
      Self::AlongColumn => "ALONG_COLUMN",
    };
  }

  /// Returns both directions, in header order.
  pub const fn all() -> &'static [Self; 2] {
    return &[Self::AlongColumn, Self::AlongRow];
  }

  /// Returns the matrix dimension number used in `AppliesToMatrixDimension`.
  pub const fn dimension(&self) -> usize {
    return match self {
      Self::AlongColumn => 0,
      Self::AlongRow => 1,
    };
  }
}

impl TryFrom<usize> for Direction {
  type Error = ();

  fn try_from(value: usize) -> Result<Self, Self::Error> {
    return Ok(match value {
      0 => Self::AlongColumn,
      1 => Self::AlongRow,
      _ => return Err(())
    });
  }
}

impl Display for Direction {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return write!(f, "{}", self.name());
  }
}

/// The kinds of information an axis can map its indices to.
#[derive(
  Copy, Clone, Debug, Serialize, Deserialize, PartialOrd, Ord, PartialEq, Eq,
  Hash
)]
pub enum MappingType {
  /// One label map per index.
  Labels,
  /// One named scalar map per index.
  Scalars,
  /// Regularly spaced samples, usually time points.
  Series,
  /// Surface vertices and volume voxels.
  BrainModels,
  /// Named groups of vertices and voxels.
  Parcels
}

impl MappingType {
  /// Returns the XML name of this mapping type.
  pub const fn xml_name(&self) -> &'static str {
    return match self {
      Self::Labels => "CIFTI_INDEX_TYPE_LABELS",
      Self::Scalars => "CIFTI_INDEX_TYPE_SCALARS",
      Self::Series => "CIFTI_INDEX_TYPE_TIME_POINTS",
      Self::BrainModels => "CIFTI_INDEX_TYPE_BRAIN_MODELS",
      Self::Parcels => "CIFTI_INDEX_TYPE_PARCELS",
    };
  }

  /// Returns a short, uppercase name for this mapping type.
  pub const fn name(&self) -> &'static str {
    return match self {
      Self::Labels => "LABELS",
      Self::Scalars => "SCALARS",
      Self::Series => "SERIES",
      Self::BrainModels => "BRAIN_MODELS",
      Self::Parcels => "PARCELS",
    };
  }
}

impl FromStr for MappingType {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    return Ok(match s {
      "CIFTI_INDEX_TYPE_LABELS" => Self::Labels,
      "CIFTI_INDEX_TYPE_SCALARS" => Self::Scalars,
      "CIFTI_INDEX_TYPE_TIME_POINTS" | "CIFTI_INDEX_TYPE_SERIES" => {
        Self::Series
      },
      "CIFTI_INDEX_TYPE_BRAIN_MODELS" => Self::BrainModels,
      "CIFTI_INDEX_TYPE_PARCELS" => Self::Parcels,
      _ => return Err(())
    });
  }
}

impl Display for MappingType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return write!(f, "{}", self.name());
  }
}
