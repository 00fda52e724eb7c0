//! This module implements the index translator: the query engine that turns
//! surface vertices, voxels and time points into matrix row and column
//! indices, and enumerates the full correspondence tables of an axis.
//!
//! These queries sit inside per-row loops over large matrices, so none of
//! them fail: a location with no data simply gives `None` (or an empty
//! table). The vertex and voxel lookups go through hash tables that are built
//! the first time they are needed and kept for the life of the translator.
//! The build is guarded by a `OnceLock`, so a translator can be shared between
//! threads from the start.

use std::collections::HashMap;
use std::sync::OnceLock;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::axis::Direction;
use crate::model::{AxisMap, BrainModelPart, HeaderModel, MapPayload};
use crate::structure::Structure;

/// One line of a surface correspondence table.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SurfaceMapEntry {
  /// The index along the axis.
  pub index: usize,
  /// The surface vertex.
  pub node: usize
}

/// One line of a volume correspondence table.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VolumeMapEntry {
  /// The index along the axis.
  pub index: usize,
  /// The voxel.
  pub ijk: [i64; 3],
  /// The structure the voxel belongs to.
  pub structure: Structure
}

/// Lazily-built lookup tables for one axis.
#[derive(Default)]
struct AxisLookup {
  /// (structure, vertex) to index.
  nodes: OnceLock<HashMap<(Structure, usize), usize>>,
  /// Voxel to index.
  voxels: OnceLock<HashMap<[i64; 3], usize>>
}

/// Builds the vertex table of an axis. Parcels map every vertex they contain
/// to the parcel's index.
fn build_node_table(axis: &AxisMap) -> HashMap<(Structure, usize), usize> {
  let mut table = HashMap::new();
  match axis.payload() {
    MapPayload::BrainModels(parts) => {
      let mut offset = 0;
      for part in parts.iter() {
        if let BrainModelPart::Surface(s) = part {
          for (i, node) in s.nodes.iter().enumerate() {
            table.insert((s.structure, *node), offset + i);
          }
        }
        offset += part.len();
      }
    },
    MapPayload::Parcels(info) => {
      for (index, parcel) in info.parcels.iter().enumerate() {
        for pn in parcel.nodes.iter() {
          for node in pn.nodes.iter() {
            table.insert((pn.structure, *node), index);
          }
        }
      }
    },
    _ => {}
  }
  debug!("Built vertex lookup with {} entries.", table.len());
  return table;
}

/// Builds the voxel table of an axis.
fn build_voxel_table(axis: &AxisMap) -> HashMap<[i64; 3], usize> {
  let mut table = HashMap::new();
  match axis.payload() {
    MapPayload::BrainModels(_) => {
      if let Some((offset, part)) = axis.volume_part() {
        for (i, vx) in part.voxels.iter().enumerate() {
          table.insert(vx.ijk, offset + i);
        }
      }
    },
    MapPayload::Parcels(info) => {
      for (index, parcel) in info.parcels.iter().enumerate() {
        for ijk in parcel.voxels.iter() {
          table.insert(*ijk, index);
        }
      }
    },
    _ => {}
  }
  debug!("Built voxel lookup with {} entries.", table.len());
  return table;
}

/// Read-only query engine over a header model.
pub struct IndexTranslator<'a> {
  /// The header being queried.
  header: &'a HeaderModel,
  /// Tables for the column axis.
  along_row: AxisLookup,
  /// Tables for the row axis.
  along_column: AxisLookup
}

impl<'a> IndexTranslator<'a> {
  /// Creates a translator. No tables are built yet.
  pub fn new(header: &'a HeaderModel) -> Self {
    return Self {
      header,
      along_row: AxisLookup::default(),
      along_column: AxisLookup::default()
    };
  }

  /// The header being queried.
  pub fn header(&self) -> &'a HeaderModel {
    return self.header;
  }

  /// Lookup tables of a direction.
  fn lookup(&self, direction: Direction) -> &AxisLookup {
    return match direction {
      Direction::AlongRow => &self.along_row,
      Direction::AlongColumn => &self.along_column,
    };
  }

  /// The vertex table of a direction, built on first use.
  fn node_table(&self, direction: Direction) -> &HashMap<(Structure, usize), usize> {
    return self.lookup(direction).nodes
      .get_or_init(|| build_node_table(self.header.axis(direction)));
  }

  /// The voxel table of a direction, built on first use.
  fn voxel_table(&self, direction: Direction) -> &HashMap<[i64; 3], usize> {
    return self.lookup(direction).voxels
      .get_or_init(|| build_voxel_table(self.header.axis(direction)));
  }

  /// Builds every lookup table now instead of on first use.
  pub fn warm(&self) {
    for d in Direction::all() {
      self.node_table(*d);
      self.voxel_table(*d);
    }
  }

  /// Index of a surface vertex along a direction.
  pub fn index_for_node(
    &self,
    direction: Direction,
    node: usize,
    structure: Structure
  ) -> Option<usize> {
    return self.node_table(direction).get(&(structure, node)).copied();
  }

  /// Index of a voxel along a direction.
  pub fn index_for_voxel(
    &self,
    direction: Direction,
    ijk: [i64; 3]
  ) -> Option<usize> {
    return self.voxel_table(direction).get(&ijk).copied();
  }

  /// Index of the voxel nearest to a spatial coordinate. Only voxels with
  /// data count; the volume bounds don't matter.
  pub fn index_for_voxel_coordinate(
    &self,
    direction: Direction,
    xyz: [f64; 3]
  ) -> Option<usize> {
    let space = self.header.volume_space(direction)?;
    return self.index_for_voxel(direction, space.nearest_voxel(xyz)?);
  }

  /// Index of the sample nearest to a time, in seconds. Halves round away
  /// from zero.
  pub fn index_for_timepoint(
    &self,
    direction: Direction,
    seconds: f64
  ) -> Option<usize> {
    let axis = self.header.axis(direction);
    let MapPayload::Series(info) = axis.payload() else {
      return None;
    };
    let step = info.step_seconds();
    if step == 0.0 {
      return None;
    }
    let index = ((seconds - info.start_seconds()) / step).round();
    if !index.is_finite() || index < 0.0 || index >= axis.length() as f64 {
      return None;
    }
    return Some(index as usize);
  }

  /// Row of a surface vertex.
  pub fn row_index_for_node(
    &self,
    node: usize,
    structure: Structure
  ) -> Option<usize> {
    return self.index_for_node(Direction::AlongColumn, node, structure);
  }

  /// Column of a surface vertex.
  pub fn column_index_for_node(
    &self,
    node: usize,
    structure: Structure
  ) -> Option<usize> {
    return self.index_for_node(Direction::AlongRow, node, structure);
  }

  /// Row of a voxel.
  pub fn row_index_for_voxel(&self, ijk: [i64; 3]) -> Option<usize> {
    return self.index_for_voxel(Direction::AlongColumn, ijk);
  }

  /// Column of a voxel.
  pub fn column_index_for_voxel(&self, ijk: [i64; 3]) -> Option<usize> {
    return self.index_for_voxel(Direction::AlongRow, ijk);
  }

  /// Row of the voxel nearest to a coordinate.
  pub fn row_index_for_voxel_coordinate(&self, xyz: [f64; 3]) -> Option<usize> {
    return self.index_for_voxel_coordinate(Direction::AlongColumn, xyz);
  }

  /// Column of the voxel nearest to a coordinate.
  pub fn column_index_for_voxel_coordinate(
    &self,
    xyz: [f64; 3]
  ) -> Option<usize> {
    return self.index_for_voxel_coordinate(Direction::AlongRow, xyz);
  }

  /// Row of a time point.
  pub fn row_index_for_timepoint(&self, seconds: f64) -> Option<usize> {
    return self.index_for_timepoint(Direction::AlongColumn, seconds);
  }

  /// Column of a time point.
  pub fn column_index_for_timepoint(&self, seconds: f64) -> Option<usize> {
    return self.index_for_timepoint(Direction::AlongRow, seconds);
  }

  /// The full vertex correspondence of a surface along a direction, in index
  /// order. Empty if the surface isn't there.
  pub fn surface_mapping(
    &self,
    structure: Structure,
    direction: Direction
  ) -> Vec<SurfaceMapEntry> {
    let MapPayload::BrainModels(parts) = self.header.axis(direction).payload()
    else {
      return Vec::new();
    };
    let mut offset = 0;
    for part in parts.iter() {
      match part {
        BrainModelPart::Surface(s) if s.structure == structure => {
          return s.nodes.iter()
            .enumerate()
            .map(|(i, node)| SurfaceMapEntry { index: offset + i, node: *node })
            .collect();
        },
        _ => offset += part.len()
      }
    }
    return Vec::new();
  }

  /// The full voxel correspondence along a direction, in index order. Empty
  /// if there are no voxels.
  pub fn volume_mapping(&self, direction: Direction) -> Vec<VolumeMapEntry> {
    let Some((offset, part)) = self.header.axis(direction).volume_part() else {
      return Vec::new();
    };
    return part.voxels.iter()
      .enumerate()
      .map(|(i, vx)| VolumeMapEntry {
        index: offset + i,
        ijk: vx.ijk,
        structure: vx.structure
      })
      .collect();
  }

  /// Does a direction have vertices of a surface?
  pub fn has_surface_data(
    &self,
    structure: Structure,
    direction: Direction
  ) -> bool {
    return self.surface_number_of_nodes(structure, direction).is_some();
  }

  /// Does a direction have voxels?
  pub fn has_volume_data(&self, direction: Direction) -> bool {
    return self.header.volume_space(direction).is_some();
  }

  /// Number of vertices of the full surface a direction was made from.
  pub fn surface_number_of_nodes(
    &self,
    structure: Structure,
    direction: Direction
  ) -> Option<usize> {
    let axis = self.header.axis(direction);
    return match axis.payload() {
      MapPayload::BrainModels(_) => {
        axis.surface_part(structure).map(|s| s.number_of_nodes)
      },
      MapPayload::Parcels(info) => info.surface_number_of_nodes(structure),
      _ => None
    };
  }
}
