//! This module implements the header model: a validated, strongly-typed view
//! of a CIFTI header, with one independent map per matrix direction.
//!
//! Models are built from a header tree (see the `reading` submodule) or
//! assembled by hand through the validating constructors here, and are turned
//! back into a tree by the `writing` submodule. A model that exists is always
//! well-formed: every constructor checks the invariants below and refuses to
//! repair anything.
//!
//!   - a brain-models map has at least one part, at most one surface part per
//!     structure and at most one volume part;
//!   - surface node lists are strictly increasing and below the node count;
//!   - voxels are unique and inside the volume;
//!   - the length of every map matches its contents.

pub mod reading;
pub mod writing;

use std::collections::{BTreeMap, BTreeSet, HashSet};

use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::axis::{Direction, MappingType};
use crate::error::{malformed, CiftiError, Result};
use crate::labels::LabelTable;
use crate::structure::Structure;
use crate::volume::VolumeSpace;

/// The surface vertices of one structure present in a brain-models map.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SurfacePart {
  /// The structure of the surface.
  pub structure: Structure,
  /// The number of vertices in the full surface.
  pub number_of_nodes: usize,
  /// The vertices present, in storage order.
  pub nodes: Vec<usize>
}

impl SurfacePart {
  /// A part covering every vertex of a surface.
  pub fn full(structure: Structure, number_of_nodes: usize) -> Self {
    return Self {
      structure,
      number_of_nodes,
      nodes: (0..number_of_nodes).collect()
    };
  }

  /// Checks node order and range.
  fn validate(&self) -> Result<()> {
    return check_nodes(&self.nodes, self.number_of_nodes, self.structure);
  }
}

/// Checks that a node list is strictly increasing and within the surface.
fn check_nodes(
  nodes: &[usize],
  number_of_nodes: usize,
  structure: Structure
) -> Result<()> {
  if let Some((a, b)) = nodes.iter().tuple_windows().find(|(a, b)| a >= b) {
    return Err(malformed(format!(
      "nodes of {} are not strictly increasing ({} then {})",
      structure, a, b
    )));
  }
  if let Some(last) = nodes.last() {
    if *last >= number_of_nodes {
      return Err(malformed(format!(
        "node {} of {} is past the surface's {} nodes",
        last, structure, number_of_nodes
      )));
    }
  }
  return Ok(());
}

/// A single voxel of a volume part, tagged with its structure.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Voxel {
  /// The voxel index.
  pub ijk: [i64; 3],
  /// The structure the voxel belongs to.
  pub structure: Structure
}

/// All the voxels present in a brain-models map.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct VolumePart {
  /// The volume the voxel indices refer to.
  pub space: VolumeSpace,
  /// The voxels present, in storage order.
  pub voxels: Vec<Voxel>
}

impl VolumePart {
  /// Checks voxel uniqueness and bounds.
  fn validate(&self) -> Result<()> {
    if self.voxels.is_empty() {
      return Err(malformed("volume part has no voxels"));
    }
    return check_voxels(self.voxels.iter().map(|v| v.ijk), &self.space);
  }

  /// The structures present in this part, in order of first appearance.
  pub fn structures(&self) -> Vec<Structure> {
    return self.voxels.iter().map(|v| v.structure).unique().collect();
  }
}

/// Checks that voxels are unique and inside a volume.
fn check_voxels<I: Iterator<Item = [i64; 3]>>(
  voxels: I,
  space: &VolumeSpace
) -> Result<()> {
  let mut seen: HashSet<[i64; 3]> = HashSet::new();
  for ijk in voxels {
    if !space.contains(ijk) {
      return Err(malformed(format!(
        "voxel {:?} is outside the {:?} volume", ijk, space.dimensions()
      )));
    }
    if !seen.insert(ijk) {
      return Err(malformed(format!("voxel {:?} appears twice", ijk)));
    }
  }
  return Ok(());
}

/// One part of a brain-models map.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, derive_more::From)]
pub enum BrainModelPart {
  /// Vertices of one surface.
  Surface(SurfacePart),
  /// Voxels, possibly from several structures.
  Volume(VolumePart)
}

impl BrainModelPart {
  /// The number of indices this part takes up.
  pub fn len(&self) -> usize {
    return match self {
      Self::Surface(s) => s.nodes.len(),
      Self::Volume(v) => v.voxels.len(),
    };
  }

  /// Does this part take up no indices?
  pub fn is_empty(&self) -> bool {
    return self.len() == 0;
  }
}

/// The unit a series is sampled in.
#[derive(
  Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord
)]
pub enum SeriesUnit {
  /// Seconds.
  Seconds,
  /// Milliseconds.
  Milliseconds,
  /// Microseconds.
  Microseconds
}

impl SeriesUnit {
  /// How many seconds one of this unit is.
  pub const fn seconds(&self) -> f64 {
    return match self {
      Self::Seconds => 1.0,
      Self::Milliseconds => 1e-3,
      Self::Microseconds => 1e-6,
    };
  }

  /// The XML name of this unit.
  pub const fn xml_name(&self) -> &'static str {
    return match self {
      Self::Seconds => "NIFTI_UNITS_SEC",
      Self::Milliseconds => "NIFTI_UNITS_MSEC",
      Self::Microseconds => "NIFTI_UNITS_USEC",
    };
  }

  /// Reads a unit from its XML name.
  pub fn from_xml_name(s: &str) -> Option<Self> {
    return [Self::Seconds, Self::Milliseconds, Self::Microseconds]
      .into_iter()
      .find(|u| u.xml_name() == s);
  }
}

/// Timing of a series map. `start` and `step` are in `unit`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SeriesInfo {
  /// Time of the first sample.
  pub start: f64,
  /// Time between samples.
  pub step: f64,
  /// Unit of `start` and `step`.
  pub unit: SeriesUnit
}

impl SeriesInfo {
  /// A series in seconds.
  pub fn in_seconds(start: f64, step: f64) -> Self {
    return Self { start, step, unit: SeriesUnit::Seconds };
  }

  /// Time of the first sample, in seconds.
  pub fn start_seconds(&self) -> f64 {
    return self.start * self.unit.seconds();
  }

  /// Time between samples, in seconds.
  pub fn step_seconds(&self) -> f64 {
    return self.step * self.unit.seconds();
  }
}

/// A named label map.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LabelMap {
  /// The map name.
  pub name: String,
  /// The labels used in the map.
  pub table: LabelTable
}

/// A named scalar map.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScalarMap {
  /// The map name.
  pub name: String
}

/// A surface that parcels may take vertices from.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParcelSurface {
  /// The structure of the surface.
  pub structure: Structure,
  /// The number of vertices in the full surface.
  pub number_of_nodes: usize
}

/// The vertices of a parcel on one surface.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParcelNodes {
  /// The structure of the surface.
  pub structure: Structure,
  /// The vertices, strictly increasing.
  pub nodes: Vec<usize>
}

/// A named group of vertices and voxels.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Parcel {
  /// The parcel name.
  pub name: String,
  /// The vertices of the parcel, per surface.
  pub nodes: Vec<ParcelNodes>,
  /// The voxels of the parcel.
  pub voxels: Vec<[i64; 3]>
}

/// The contents of a parcels map.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ParcelsInfo {
  /// The surfaces parcels may use.
  pub surfaces: Vec<ParcelSurface>,
  /// The volume parcels may use, if any parcel has voxels.
  pub volume: Option<VolumeSpace>,
  /// The parcels, one per index.
  pub parcels: Vec<Parcel>
}

impl ParcelsInfo {
  /// Number of vertices of a surface, if parcels may use it.
  pub fn surface_number_of_nodes(&self, structure: Structure) -> Option<usize> {
    return self.surfaces.iter()
      .find(|s| s.structure == structure)
      .map(|s| s.number_of_nodes);
  }

  /// Checks names, surfaces, node ranges and overlaps.
  fn validate(&self) -> Result<()> {
    let mut structures: BTreeSet<Structure> = BTreeSet::new();
    for s in self.surfaces.iter() {
      if !structures.insert(s.structure) {
        return Err(malformed(format!(
          "parcel surface {} declared twice", s.structure
        )));
      }
    }
    let mut names: BTreeSet<&str> = BTreeSet::new();
    let mut used_nodes: HashSet<(Structure, usize)> = HashSet::new();
    for p in self.parcels.iter() {
      if !names.insert(p.name.as_str()) {
        return Err(malformed(format!("parcel name \"{}\" repeated", p.name)));
      }
      for pn in p.nodes.iter() {
        let n = self.surface_number_of_nodes(pn.structure)
          .ok_or_else(|| malformed(format!(
            "parcel \"{}\" uses undeclared surface {}", p.name, pn.structure
          )))?;
        check_nodes(&pn.nodes, n, pn.structure)?;
        for node in pn.nodes.iter() {
          if !used_nodes.insert((pn.structure, *node)) {
            return Err(malformed(format!(
              "node {} of {} is in more than one parcel", node, pn.structure
            )));
          }
        }
      }
    }
    let all_voxels = self.parcels.iter().flat_map(|p| p.voxels.iter().copied());
    match (&self.volume, self.parcels.iter().any(|p| !p.voxels.is_empty())) {
      (Some(space), true) => check_voxels(all_voxels, space)?,
      (Some(_), false) => {
        return Err(malformed("parcels have a volume but no voxels"));
      },
      (None, true) => {
        return Err(malformed("parcels have voxels but there is no volume"));
      },
      (None, false) => {}
    }
    return Ok(());
  }
}

/// What the indices of an axis map to.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum MapPayload {
  /// One label map per index.
  Labels(Vec<LabelMap>),
  /// One scalar map per index.
  Scalars(Vec<ScalarMap>),
  /// Regular samples.
  Series(SeriesInfo),
  /// Surface vertices and voxels, in part order.
  BrainModels(Vec<BrainModelPart>),
  /// One parcel per index.
  Parcels(ParcelsInfo)
}

impl MapPayload {
  /// The mapping type of this payload.
  pub const fn mapping_type(&self) -> MappingType {
    return match self {
      Self::Labels(_) => MappingType::Labels,
      Self::Scalars(_) => MappingType::Scalars,
      Self::Series(_) => MappingType::Series,
      Self::BrainModels(_) => MappingType::BrainModels,
      Self::Parcels(_) => MappingType::Parcels,
    };
  }

  /// The number of indices implied by the contents. Series don't know their
  /// own length.
  pub fn implied_length(&self) -> Option<usize> {
    return match self {
      Self::Labels(maps) => Some(maps.len()),
      Self::Scalars(maps) => Some(maps.len()),
      Self::Series(_) => None,
      Self::BrainModels(parts) => Some(parts.iter().map(|p| p.len()).sum()),
      Self::Parcels(info) => Some(info.parcels.len()),
    };
  }
}

/// The mapping of one matrix direction.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AxisMap {
  /// Number of indices along this direction.
  pub(crate) length: usize,
  /// What those indices map to.
  pub(crate) payload: MapPayload
}

impl AxisMap {
  /// Creates an axis map with an explicit length, checking it against the
  /// payload and checking the payload itself.
  pub fn new(length: usize, payload: MapPayload) -> Result<Self> {
    match &payload {
      MapPayload::BrainModels(parts) => validate_brain_models(parts)?,
      MapPayload::Parcels(info) => info.validate()?,
      MapPayload::Series(info) => {
        if !info.start.is_finite() || !info.step.is_finite() {
          return Err(malformed("series start and step must be finite"));
        }
      },
      MapPayload::Labels(_) | MapPayload::Scalars(_) => {}
    }
    if let Some(implied) = payload.implied_length() {
      if implied != length {
        return Err(malformed(format!(
          "{} map declares length {} but its contents add up to {}",
          payload.mapping_type(), length, implied
        )));
      }
    }
    return Ok(Self { length, payload });
  }

  /// Creates a brain-models map whose length is the sum of its parts.
  pub fn brain_models(parts: Vec<BrainModelPart>) -> Result<Self> {
    let length = parts.iter().map(|p| p.len()).sum();
    return Self::new(length, MapPayload::BrainModels(parts));
  }

  /// Creates a scalars map with the given names.
  pub fn scalars<S: Into<String>, I: IntoIterator<Item = S>>(names: I) -> Self {
    let maps: Vec<ScalarMap> = names.into_iter()
      .map(|n| ScalarMap { name: n.into() })
      .collect();
    return Self { length: maps.len(), payload: MapPayload::Scalars(maps) };
  }

  /// Creates a labels map.
  pub fn labels(maps: Vec<LabelMap>) -> Self {
    return Self { length: maps.len(), payload: MapPayload::Labels(maps) };
  }

  /// Creates a series map.
  pub fn series(length: usize, info: SeriesInfo) -> Result<Self> {
    return Self::new(length, MapPayload::Series(info));
  }

  /// Creates a parcels map.
  pub fn parcels(info: ParcelsInfo) -> Result<Self> {
    let length = info.parcels.len();
    return Self::new(length, MapPayload::Parcels(info));
  }

  /// Number of indices along this direction.
  pub fn length(&self) -> usize {
    return self.length;
  }

  /// What the indices map to.
  pub fn payload(&self) -> &MapPayload {
    return &self.payload;
  }

  /// The mapping type.
  pub fn mapping_type(&self) -> MappingType {
    return self.payload.mapping_type();
  }

  /// The surface part for a structure, on brain-models maps.
  pub fn surface_part(&self, structure: Structure) -> Option<&SurfacePart> {
    if let MapPayload::BrainModels(parts) = &self.payload {
      return parts.iter().find_map(|p| match p {
        BrainModelPart::Surface(s) if s.structure == structure => Some(s),
        _ => None
      });
    }
    return None;
  }

  /// The volume part and its first index, on brain-models maps.
  pub fn volume_part(&self) -> Option<(usize, &VolumePart)> {
    if let MapPayload::BrainModels(parts) = &self.payload {
      let mut offset = 0;
      for p in parts.iter() {
        if let BrainModelPart::Volume(v) = p {
          return Some((offset, v));
        }
        offset += p.len();
      }
    }
    return None;
  }

  /// The volume this map refers to, if any.
  pub fn volume_space(&self) -> Option<&VolumeSpace> {
    return match &self.payload {
      MapPayload::BrainModels(_) => self.volume_part().map(|(_, v)| &v.space),
      MapPayload::Parcels(info) => info.volume.as_ref(),
      _ => None
    };
  }

  /// The name of a map, on scalars and labels maps.
  pub fn map_name(&self, index: usize) -> Option<&str> {
    return match &self.payload {
      MapPayload::Scalars(maps) => maps.get(index).map(|m| m.name.as_str()),
      MapPayload::Labels(maps) => maps.get(index).map(|m| m.name.as_str()),
      _ => None
    };
  }
}

/// Checks the invariants of a brain-models part list.
fn validate_brain_models(parts: &[BrainModelPart]) -> Result<()> {
  if parts.is_empty() {
    return Err(malformed("brain-models map has no parts"));
  }
  let mut structures: BTreeSet<Structure> = BTreeSet::new();
  let mut volumes = 0;
  for part in parts.iter() {
    match part {
      BrainModelPart::Surface(s) => {
        if !structures.insert(s.structure) {
          return Err(malformed(format!(
            "surface {} appears more than once", s.structure
          )));
        }
        s.validate()?;
      },
      BrainModelPart::Volume(v) => {
        volumes += 1;
        if volumes > 1 {
          return Err(malformed("brain-models map has more than one volume part"));
        }
        v.validate()?;
      }
    }
  }
  return Ok(());
}

/// A parsed CIFTI header.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HeaderModel {
  /// The format version string.
  pub(crate) version: String,
  /// Free-form key/value metadata of the matrix.
  pub(crate) metadata: BTreeMap<String, String>,
  /// The map of the columns.
  pub(crate) along_row: AxisMap,
  /// The map of the rows.
  pub(crate) along_column: AxisMap
}

/// The version written by default.
pub const DEFAULT_VERSION: &str = "1.0";

impl HeaderModel {
  /// Assembles a header from its two axis maps.
  pub fn new(along_row: AxisMap, along_column: AxisMap) -> Self {
    debug!(
      "New header: {} x {} ({} by {}).",
      along_column.length,
      along_row.length,
      along_column.mapping_type(),
      along_row.mapping_type()
    );
    return Self {
      version: DEFAULT_VERSION.to_string(),
      metadata: BTreeMap::new(),
      along_row,
      along_column
    };
  }

  /// The format version string.
  pub fn version(&self) -> &str {
    return &self.version;
  }

  /// The matrix metadata.
  pub fn metadata(&self) -> &BTreeMap<String, String> {
    return &self.metadata;
  }

  /// Sets a metadata entry.
  pub fn set_metadata<K: Into<String>, V: Into<String>>(&mut self, k: K, v: V) {
    self.metadata.insert(k.into(), v.into());
  }

  /// The map for a direction.
  pub fn axis(&self, direction: Direction) -> &AxisMap {
    return match direction {
      Direction::AlongRow => &self.along_row,
      Direction::AlongColumn => &self.along_column,
    };
  }

  /// Mutable access to the map for a direction.
  pub(crate) fn axis_mut(&mut self, direction: Direction) -> &mut AxisMap {
    return match direction {
      Direction::AlongRow => &mut self.along_row,
      Direction::AlongColumn => &mut self.along_column,
    };
  }

  /// The mapping type of a direction.
  pub fn mapping_type(&self, direction: Direction) -> MappingType {
    return self.axis(direction).mapping_type();
  }

  /// The number of indices along a direction.
  pub fn dimension_length(&self, direction: Direction) -> usize {
    return self.axis(direction).length;
  }

  /// The number of rows of the matrix.
  pub fn number_of_rows(&self) -> usize {
    return self.along_column.length;
  }

  /// The number of columns of the matrix.
  pub fn number_of_columns(&self) -> usize {
    return self.along_row.length;
  }

  /// Checks the header against matrix dimensions declared elsewhere, such as
  /// in the file's binary header.
  pub fn check_dimensions(&self, rows: usize, columns: usize) -> Result<()> {
    if self.number_of_rows() != rows || self.number_of_columns() != columns {
      return Err(malformed(format!(
        "header describes a {}x{} matrix, file declares {}x{}",
        self.number_of_rows(), self.number_of_columns(), rows, columns
      )));
    }
    return Ok(());
  }

  /// The name of a map on a scalars or labels axis.
  pub fn map_name(&self, direction: Direction, index: usize) -> Option<&str> {
    return self.axis(direction).map_name(index);
  }

  /// The label table of a map on a labels axis.
  pub fn label_table(
    &self,
    direction: Direction,
    index: usize
  ) -> Option<&LabelTable> {
    if let MapPayload::Labels(maps) = &self.axis(direction).payload {
      return maps.get(index).map(|m| &m.table);
    }
    return None;
  }

  /// The label table of a column, for files with labels along rows.
  pub fn label_table_for_column(&self, index: usize) -> Option<&LabelTable> {
    return self.label_table(Direction::AlongRow, index);
  }

  /// Resolves a map given either a 1-based number or a name. Numbers take
  /// precedence.
  pub fn map_index_from_name_or_number(
    &self,
    direction: Direction,
    text: &str
  ) -> Option<usize> {
    let axis = self.axis(direction);
    if let Ok(number) = text.trim().parse::<usize>() {
      if number >= 1 && number <= axis.length {
        return Some(number - 1);
      }
      return None;
    }
    return (0..axis.length).find(|&i| axis.map_name(i) == Some(text));
  }

  /// The time step of a series axis, in seconds.
  pub fn timestep(&self, direction: Direction) -> Option<f64> {
    if let MapPayload::Series(info) = &self.axis(direction).payload {
      return Some(info.step_seconds());
    }
    return None;
  }

  /// The volume geometry used by a direction, if it has any voxels.
  pub fn volume_space(&self, direction: Direction) -> Option<&VolumeSpace> {
    return self.axis(direction).volume_space();
  }

  /// Fails unless a direction has one of the accepted mapping types.
  pub(crate) fn expect_type(
    &self,
    direction: Direction,
    accepted: &[MappingType],
    expected: &'static str
  ) -> Result<()> {
    let found = self.mapping_type(direction);
    if accepted.contains(&found) {
      return Ok(());
    }
    return Err(CiftiError::WrongMappingType { direction, expected, found });
  }
}
