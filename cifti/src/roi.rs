//! This module implements the ROI-from-label transform: given a file with
//! label maps along its rows, it makes a file with scalar maps where every
//! location carrying a chosen label is 1 and everything else is 0.

use std::fmt::Display;

use log::{debug, info, warn};
use thiserror::Error;

use crate::axis::{Direction, MappingType};
use crate::error::CiftiError;
use crate::matrix::{InMemoryMatrix, MatrixResource};
use crate::model::HeaderModel;

/// How to pick the label of interest.
#[derive(Clone, Debug, PartialEq, Eq, derive_more::From)]
pub enum LabelSelector {
  /// By label name, looked up in each map's table.
  Name(String),
  /// By key, used as-is in every map.
  Key(i32)
}

impl Display for LabelSelector {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return match self {
      Self::Name(n) => write!(f, "label name \"{}\"", n),
      Self::Key(k) => write!(f, "label key {}", k),
    };
  }
}

/// Ways the transform can fail.
#[derive(Debug, Error)]
pub enum RoiError {
  /// The input doesn't have labels along rows.
  #[error("input must have labels along rows, found {0}")]
  NotLabels(MappingType),
  /// The requested map doesn't exist.
  #[error("invalid map index {index}, input has {count} maps")]
  InvalidMap {
    /// The requested map.
    index: usize,
    /// How many maps there are.
    count: usize
  },
  /// A map given by name or number could not be resolved.
  #[error("no map with name or number \"{0}\"")]
  UnknownMap(String),
  /// The label name isn't in any of the maps looked at.
  #[error("{0} was not found in any map")]
  LabelNotFound(LabelSelector),
  /// Nothing in the data carried the label.
  #[error("no data matched the {0}")]
  NoDataMatched(LabelSelector),
  /// Something went wrong in the header or the matrix.
  #[error(transparent)]
  Cifti(#[from] CiftiError)
}

/// Does a stored label value equal a key? Values are rounded to the nearest
/// integer first, halves up.
fn matches_key(value: f32, key: i32) -> bool {
  return value.is_finite() && (value + 0.5).floor() as i64 == key as i64;
}

/// Resolves a map given by 1-based number or name, for a label-along-rows
/// input.
pub fn resolve_map(header: &HeaderModel, text: &str) -> Result<usize, RoiError> {
  return header.map_index_from_name_or_number(Direction::AlongRow, text)
    .ok_or_else(|| RoiError::UnknownMap(text.to_string()));
}

/// Runs the transform. With `which_map` set, only that map is used and the
/// output has a single column; otherwise every map gets its own column.
pub fn roi_from_label<M: MatrixResource>(
  header: &HeaderModel,
  input: &M,
  selector: &LabelSelector,
  which_map: Option<usize>
) -> Result<(HeaderModel, InMemoryMatrix), RoiError> {
  let found = header.mapping_type(Direction::AlongRow);
  if found != MappingType::Labels {
    return Err(RoiError::NotLabels(found));
  }
  header.check_dimensions(input.number_of_rows(), input.number_of_columns())?;
  let num_maps = header.dimension_length(Direction::AlongRow);
  let num_rows = header.number_of_rows();
  if let Some(index) = which_map {
    if index >= num_maps {
      return Err(RoiError::InvalidMap { index, count: num_maps });
    }
  }
  // the key to look for in each map, if any
  let keys: Vec<Option<i32>> = (0..num_maps)
    .map(|i| {
      let table = header.label_table_for_column(i);
      return match selector {
        LabelSelector::Name(name) => table.and_then(|t| t.key_for_name(name)),
        LabelSelector::Key(key) => Some(*key),
      };
    })
    .collect();
  let used_maps: Vec<usize> = match which_map {
    Some(i) => vec![i],
    None => (0..num_maps).collect()
  };
  for &i in used_maps.iter() {
    let table = header.label_table_for_column(i);
    let present = match selector {
      LabelSelector::Name(_) => keys[i].is_some(),
      LabelSelector::Key(key) => table.and_then(|t| t.label(*key)).is_some(),
    };
    if !present {
      warn!("{} not found in map #{}", selector, i + 1);
    }
  }
  if used_maps.iter().all(|&i| keys[i].is_none()) {
    return Err(RoiError::LabelNotFound(selector.clone()));
  }
  // build the output header
  let mut out_header = header.clone();
  out_header.reset_axis_to_scalars(Direction::AlongRow, used_maps.len());
  for (out_i, &in_i) in used_maps.iter().enumerate() {
    let name = header.map_name(Direction::AlongRow, in_i).unwrap_or_default();
    out_header.set_map_name(Direction::AlongRow, out_i, name)?;
  }
  debug!(
    "Making ROI of {} over {} rows and {} maps.",
    selector, num_rows, used_maps.len()
  );
  // scan the rows
  let mut output = InMemoryMatrix::for_header(&out_header);
  let mut scratch = vec![0.0_f32; num_maps];
  let mut out_scratch = vec![0.0_f32; used_maps.len()];
  let mut matched: usize = 0;
  for row in 0..num_rows {
    input.get_row(&mut scratch, row)?;
    for (out_i, &in_i) in used_maps.iter().enumerate() {
      let hit = keys[in_i].is_some_and(|k| matches_key(scratch[in_i], k));
      out_scratch[out_i] = if hit { 1.0 } else { 0.0 };
      matched += hit as usize;
    }
    output.set_row(&out_scratch, row)?;
  }
  if matched == 0 {
    return Err(RoiError::NoDataMatched(selector.clone()));
  }
  info!("{} locations matched the {}.", matched, selector);
  return Ok((out_header, output));
}
