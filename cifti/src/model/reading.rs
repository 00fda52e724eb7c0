//! This module builds header models out of header trees.

use std::collections::BTreeMap;

use log::debug;

use crate::axis::{Direction, MappingType};
use crate::error::{malformed, Result};
use crate::labels::LabelTable;
use crate::model::*;
use crate::structure::Structure;
use crate::tree::Element;
use crate::volume::VolumeSpace;
use crate::xml::parse_document;

/// Model type of surface brain models.
pub(crate) const MODEL_TYPE_SURFACE: &str = "CIFTI_MODEL_TYPE_SURFACE";

/// Model type of voxel brain models.
pub(crate) const MODEL_TYPE_VOXELS: &str = "CIFTI_MODEL_TYPE_VOXELS";

/// Reads a structure attribute.
fn structure_attr(elem: &Element) -> Result<Structure> {
  let raw = elem.required_attr("BrainStructure")?;
  return raw.parse::<Structure>()
    .map_err(|_| malformed(format!("unknown brain structure \"{}\"", raw)));
}

/// Reads voxel triples out of a `<VoxelIndicesIJK>` element.
fn voxel_triples(elem: &Element) -> Result<Vec<[i64; 3]>> {
  let flat: Vec<i64> = elem.text_list()?;
  if flat.len() % 3 != 0 {
    return Err(malformed(format!(
      "voxel list has {} values, not a multiple of three", flat.len()
    )));
  }
  return Ok(flat.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect());
}

/// A brain model as read, before being merged into parts.
enum RawModel {
  /// A surface part.
  Surface(SurfacePart),
  /// A run of voxels of one structure.
  Voxels(Vec<Voxel>)
}

/// Reads one `<BrainModel>` element, checking its declared offset and count.
fn read_brain_model(elem: &Element, expected_offset: usize) -> Result<RawModel> {
  let offset: usize = elem.parsed_attr("IndexOffset")?;
  let count: usize = elem.parsed_attr("IndexCount")?;
  let structure = structure_attr(elem)?;
  if offset != expected_offset {
    return Err(malformed(format!(
      "brain model {} starts at {}, expected {}",
      structure, offset, expected_offset
    )));
  }
  let model = match elem.required_attr("ModelType")? {
    MODEL_TYPE_SURFACE => {
      let number_of_nodes: usize = elem.parsed_attr("SurfaceNumberOfNodes")?;
      let nodes: Vec<usize> = match elem.child("NodeIndices") {
        Some(ni) => ni.text_list()?,
        // no list means every node, which only makes sense if they all fit
        None if count == number_of_nodes => (0..number_of_nodes).collect(),
        None => return Err(malformed(format!(
          "surface {} has no node list but only {} of {} nodes",
          structure, count, number_of_nodes
        )))
      };
      RawModel::Surface(SurfacePart { structure, number_of_nodes, nodes })
    },
    MODEL_TYPE_VOXELS => {
      let voxels = match elem.child("VoxelIndicesIJK") {
        Some(v) => voxel_triples(v)?,
        None => Vec::new()
      };
      RawModel::Voxels(
        voxels.into_iter().map(|ijk| Voxel { ijk, structure }).collect()
      )
    },
    other => return Err(malformed(format!("unknown model type \"{}\"", other)))
  };
  let actual = match &model {
    RawModel::Surface(s) => s.nodes.len(),
    RawModel::Voxels(v) => v.len(),
  };
  if actual != count {
    return Err(malformed(format!(
      "brain model {} declares {} indices but lists {}",
      structure, count, actual
    )));
  }
  return Ok(model);
}

/// Reads the brain models of a map into parts. Consecutive voxel models are
/// merged into the single volume part.
fn read_brain_models(
  map: &Element,
  volume: Option<&VolumeSpace>
) -> Result<Vec<BrainModelPart>> {
  let mut parts: Vec<BrainModelPart> = Vec::new();
  let mut offset = 0;
  for bm in map.children_named("BrainModel") {
    let raw = read_brain_model(bm, offset)?;
    match raw {
      RawModel::Surface(s) => {
        offset += s.nodes.len();
        parts.push(BrainModelPart::Surface(s));
      },
      RawModel::Voxels(voxels) => {
        offset += voxels.len();
        if let Some(BrainModelPart::Volume(vp)) = parts.last_mut() {
          vp.voxels.extend(voxels);
          continue;
        }
        if parts.iter().any(|p| matches!(p, BrainModelPart::Volume(_))) {
          return Err(malformed(
            "voxel brain models are split into more than one volume part"
          ));
        }
        let space = volume.ok_or_else(|| malformed(
          "voxel brain models present but the matrix has no <Volume>"
        ))?;
        parts.push(BrainModelPart::Volume(VolumePart {
          space: space.clone(),
          voxels
        }));
      }
    }
  }
  return Ok(parts);
}

/// Reads the named maps of a scalars map.
fn read_scalar_maps(map: &Element) -> Vec<ScalarMap> {
  return map.children_named("NamedMap")
    .map(|nm| ScalarMap {
      name: nm.child("MapName").map(|n| n.text.clone()).unwrap_or_default()
    })
    .collect();
}

/// Reads the named maps of a labels map.
fn read_label_maps(map: &Element) -> Result<Vec<LabelMap>> {
  let mut maps = Vec::new();
  for nm in map.children_named("NamedMap") {
    let name = nm.child("MapName").map(|n| n.text.clone()).unwrap_or_default();
    let table = nm.child("LabelTable")
      .ok_or_else(|| malformed(format!("label map \"{}\" has no table", name)))
      .and_then(LabelTable::from_element)?;
    maps.push(LabelMap { name, table });
  }
  return Ok(maps);
}

/// Reads the timing of a series map.
fn read_series(map: &Element) -> Result<(usize, SeriesInfo)> {
  let length: usize = map.parsed_attr("NumberOfSeriesPoints")?;
  let step: f64 = map.parsed_attr("TimeStep")?;
  let start: f64 = map.optional_attr("TimeStart")?.unwrap_or(0.0);
  let unit = match map.attr("TimeStepUnits") {
    None => SeriesUnit::Seconds,
    Some(s) => SeriesUnit::from_xml_name(s)
      .ok_or_else(|| malformed(format!("unknown time unit \"{}\"", s)))?
  };
  return Ok((length, SeriesInfo { start, step, unit }));
}

/// Reads the surfaces and parcels of a parcels map.
fn read_parcels(
  map: &Element,
  volume: Option<&VolumeSpace>
) -> Result<ParcelsInfo> {
  let mut surfaces = Vec::new();
  for s in map.children_named("Surface") {
    surfaces.push(ParcelSurface {
      structure: structure_attr(s)?,
      number_of_nodes: s.parsed_attr("SurfaceNumberOfNodes")?
    });
  }
  let mut parcels = Vec::new();
  for p in map.children_named("Parcel") {
    let mut parcel = Parcel {
      name: p.required_attr("Name")?.to_string(),
      ..Default::default()
    };
    for v in p.children_named("Vertices") {
      parcel.nodes.push(ParcelNodes {
        structure: structure_attr(v)?,
        nodes: v.text_list()?
      });
    }
    if let Some(v) = p.child("VoxelIndicesIJK") {
      parcel.voxels = voxel_triples(v)?;
    }
    parcels.push(parcel);
  }
  let has_voxels = parcels.iter().any(|p| !p.voxels.is_empty());
  return Ok(ParcelsInfo {
    surfaces,
    volume: if has_voxels { volume.cloned() } else { None },
    parcels
  });
}

/// Reads a `<MatrixIndicesMap>` into an axis map.
fn read_axis_map(map: &Element, volume: Option<&VolumeSpace>) -> Result<AxisMap> {
  let raw_type = map.required_attr("IndicesMapToDataType")?;
  let mapping_type = raw_type.parse::<MappingType>()
    .map_err(|_| malformed(format!("unknown mapping type \"{}\"", raw_type)))?;
  let axis = match mapping_type {
    MappingType::BrainModels => {
      AxisMap::brain_models(read_brain_models(map, volume)?)?
    },
    MappingType::Scalars => AxisMap::scalars(
      read_scalar_maps(map).into_iter().map(|m| m.name)
    ),
    MappingType::Labels => AxisMap::labels(read_label_maps(map)?),
    MappingType::Series => {
      let (length, info) = read_series(map)?;
      AxisMap::series(length, info)?
    },
    MappingType::Parcels => AxisMap::parcels(read_parcels(map, volume)?)?,
  };
  debug!("Read a {} map of length {}.", mapping_type, axis.length());
  return Ok(axis);
}

/// Reads the `<MetaData>` of an element.
fn read_metadata(elem: &Element) -> Result<BTreeMap<String, String>> {
  let mut md = BTreeMap::new();
  if let Some(meta) = elem.child("MetaData") {
    for entry in meta.children_named("MD") {
      let name = entry.child("Name")
        .ok_or_else(|| malformed("metadata entry without a name"))?;
      let value = entry.child("Value").map(|v| v.text.clone()).unwrap_or_default();
      md.insert(name.text.clone(), value);
    }
  }
  return Ok(md);
}

impl HeaderModel {
  /// Builds a header model from a header tree rooted at `<CIFTI>`.
  pub fn from_tree(root: &Element) -> Result<Self> {
    if root.name != "CIFTI" {
      return Err(malformed(format!("root element is <{}>", root.name)));
    }
    let version = root.required_attr("Version")?.to_string();
    let mut matrices = root.children_named("Matrix");
    let matrix = matrices.next()
      .ok_or_else(|| malformed("header has no <Matrix>"))?;
    if matrices.next().is_some() {
      return Err(malformed("header has more than one <Matrix>"));
    }
    let metadata = read_metadata(matrix)?;
    let volume = match matrix.child("Volume") {
      Some(v) => Some(VolumeSpace::from_element(v)?),
      None => None
    };
    let mut along_row: Option<AxisMap> = None;
    let mut along_column: Option<AxisMap> = None;
    for map in matrix.children_named("MatrixIndicesMap") {
      let dims = crate::tree::parse_list::<usize>(
        map.required_attr("AppliesToMatrixDimension")?,
        &map.name
      )?;
      if dims.is_empty() {
        return Err(malformed("map applies to no dimension"));
      }
      let axis = read_axis_map(map, volume.as_ref())?;
      for dim in dims {
        let direction = Direction::try_from(dim)
          .map_err(|_| malformed(format!("no matrix dimension {}", dim)))?;
        let slot = match direction {
          Direction::AlongRow => &mut along_row,
          Direction::AlongColumn => &mut along_column,
        };
        if slot.is_some() {
          return Err(malformed(format!("{} is mapped twice", direction)));
        }
        *slot = Some(axis.clone());
      }
    }
    let along_row = along_row
      .ok_or_else(|| malformed(format!("{} has no map", Direction::AlongRow)))?;
    let along_column = along_column
      .ok_or_else(|| malformed(format!("{} has no map", Direction::AlongColumn)))?;
    let mut model = Self::new(along_row, along_column);
    model.version = version;
    model.metadata = metadata;
    return Ok(model);
  }

  /// Parses XML text into a header model.
  pub fn from_xml_str(text: &str) -> Result<Self> {
    return Self::from_tree(&parse_document(text)?);
  }
}
