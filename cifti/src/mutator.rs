//! This module implements the header rewrites used when deriving a new file
//! from an existing one. They work on an owned model, normally a clone of the
//! input's, so no translator can be looking at it while it changes.

use log::debug;

use crate::axis::{Direction, MappingType};
use crate::error::{CiftiError, Result};
use crate::labels::LabelTable;
use crate::model::{AxisMap, HeaderModel, MapPayload, ScalarMap, SeriesInfo};

impl HeaderModel {
  /// Replaces the map of a direction with unnamed scalar maps. The other
  /// direction is left alone.
  pub fn reset_axis_to_scalars(
    &mut self,
    direction: Direction,
    number_of_maps: usize
  ) {
    debug!("Resetting {} to {} scalar maps.", direction, number_of_maps);
    *self.axis_mut(direction) = AxisMap {
      length: number_of_maps,
      payload: MapPayload::Scalars(vec![ScalarMap::default(); number_of_maps])
    };
  }

  /// Replaces the map of a direction with a series.
  pub fn reset_axis_to_series(
    &mut self,
    direction: Direction,
    length: usize,
    info: SeriesInfo
  ) -> Result<()> {
    debug!("Resetting {} to a series of length {}.", direction, length);
    *self.axis_mut(direction) = AxisMap::series(length, info)?;
    return Ok(());
  }

  /// Renames a map on a scalars or labels direction.
  pub fn set_map_name<S: Into<String>>(
    &mut self,
    direction: Direction,
    index: usize,
    name: S
  ) -> Result<()> {
    self.expect_type(
      direction,
      &[MappingType::Scalars, MappingType::Labels],
      "SCALARS or LABELS"
    )?;
    let axis = self.axis_mut(direction);
    let length = axis.length;
    let slot = match &mut axis.payload {
      MapPayload::Scalars(maps) => maps.get_mut(index).map(|m| &mut m.name),
      MapPayload::Labels(maps) => maps.get_mut(index).map(|m| &mut m.name),
      _ => None
    };
    let slot = slot.ok_or(CiftiError::IndexOutOfRange {
      what: "map names",
      index,
      length
    })?;
    *slot = name.into();
    return Ok(());
  }

  /// Replaces the label table of a map on a labels direction.
  pub fn set_label_table(
    &mut self,
    direction: Direction,
    index: usize,
    table: LabelTable
  ) -> Result<()> {
    self.expect_type(direction, &[MappingType::Labels], "LABELS")?;
    let axis = self.axis_mut(direction);
    let length = axis.length;
    if let MapPayload::Labels(maps) = &mut axis.payload {
      let map = maps.get_mut(index).ok_or(CiftiError::IndexOutOfRange {
        what: "label maps",
        index,
        length
      })?;
      map.table = table;
    }
    return Ok(());
  }

  /// Changes the time step of a series direction. The step is given in
  /// seconds and stored in the series' own unit.
  pub fn set_timestep(&mut self, direction: Direction, seconds: f64) -> Result<()> {
    self.expect_type(direction, &[MappingType::Series], "SERIES")?;
    if !seconds.is_finite() {
      return Err(CiftiError::MalformedHeader(format!(
        "time step {} is not finite", seconds
      )));
    }
    if let MapPayload::Series(info) = &mut self.axis_mut(direction).payload {
      info.step = seconds / info.unit.seconds();
    }
    return Ok(());
  }
}
