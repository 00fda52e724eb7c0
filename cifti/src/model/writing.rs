//! This module turns header models back into header trees, symmetrically to
//! the `reading` submodule.

use itertools::Itertools;

use crate::axis::Direction;
use crate::error::{malformed, Result};
use crate::model::reading::{MODEL_TYPE_SURFACE, MODEL_TYPE_VOXELS};
use crate::model::*;
use crate::tree::{format_list, Element};
use crate::volume::VolumeSpace;
use crate::xml::write_document;

/// Builds a `<VoxelIndicesIJK>` element.
fn voxel_element<'a, I: Iterator<Item = &'a [i64; 3]>>(voxels: I) -> Element {
  let text = voxels.map(|ijk| format_list(ijk)).join("\n");
  return Element::new("VoxelIndicesIJK").with_text(text);
}

/// Builds the `<BrainModel>` elements of a brain-models map. The volume part
/// is written as one element per run of voxels of the same structure.
fn write_brain_models(map: &mut Element, parts: &[BrainModelPart]) {
  let mut offset = 0;
  for part in parts.iter() {
    match part {
      BrainModelPart::Surface(s) => {
        map.children.push(
          Element::new("BrainModel")
            .with_attr("IndexOffset", offset)
            .with_attr("IndexCount", s.nodes.len())
            .with_attr("ModelType", MODEL_TYPE_SURFACE)
            .with_attr("BrainStructure", s.structure.xml_name())
            .with_attr("SurfaceNumberOfNodes", s.number_of_nodes)
            .with_child(
              Element::new("NodeIndices").with_text(format_list(&s.nodes))
            )
        );
        offset += s.nodes.len();
      },
      BrainModelPart::Volume(v) => {
        for (structure, run) in &v.voxels.iter().group_by(|vx| vx.structure) {
          let run: Vec<[i64; 3]> = run.map(|vx| vx.ijk).collect();
          map.children.push(
            Element::new("BrainModel")
              .with_attr("IndexOffset", offset)
              .with_attr("IndexCount", run.len())
              .with_attr("ModelType", MODEL_TYPE_VOXELS)
              .with_attr("BrainStructure", structure.xml_name())
              .with_child(voxel_element(run.iter()))
          );
          offset += run.len();
        }
      }
    }
  }
}

/// Builds a `<NamedMap>` element with just a name.
fn named_map(name: &str) -> Element {
  return Element::new("NamedMap")
    .with_child(Element::new("MapName").with_text(name));
}

/// Builds a `<MatrixIndicesMap>` element for an axis.
fn write_axis_map(axis: &AxisMap, dimensions: &[Direction]) -> Element {
  let applies = dimensions.iter().map(|d| d.dimension()).join(",");
  let mut map = Element::new("MatrixIndicesMap")
    .with_attr("AppliesToMatrixDimension", applies)
    .with_attr("IndicesMapToDataType", axis.mapping_type().xml_name());
  match axis.payload() {
    MapPayload::BrainModels(parts) => write_brain_models(&mut map, parts),
    MapPayload::Scalars(maps) => {
      for m in maps.iter() {
        map.children.push(named_map(&m.name));
      }
    },
    MapPayload::Labels(maps) => {
      for m in maps.iter() {
        map.children.push(named_map(&m.name).with_child(m.table.to_element()));
      }
    },
    MapPayload::Series(info) => {
      map = map
        .with_attr("TimeStart", info.start)
        .with_attr("TimeStep", info.step)
        .with_attr("TimeStepUnits", info.unit.xml_name())
        .with_attr("NumberOfSeriesPoints", axis.length());
    },
    MapPayload::Parcels(info) => {
      for s in info.surfaces.iter() {
        map.children.push(
          Element::new("Surface")
            .with_attr("BrainStructure", s.structure.xml_name())
            .with_attr("SurfaceNumberOfNodes", s.number_of_nodes)
        );
      }
      for p in info.parcels.iter() {
        let mut parcel = Element::new("Parcel").with_attr("Name", &p.name);
        for pn in p.nodes.iter() {
          parcel.children.push(
            Element::new("Vertices")
              .with_attr("BrainStructure", pn.structure.xml_name())
              .with_text(format_list(&pn.nodes))
          );
        }
        if !p.voxels.is_empty() {
          parcel.children.push(voxel_element(p.voxels.iter()));
        }
        map.children.push(parcel);
      }
    }
  }
  return map;
}

impl HeaderModel {
  /// The single volume geometry shared by both directions, if any. The format
  /// can only store one.
  fn shared_volume(&self) -> Result<Option<&VolumeSpace>> {
    let row = self.along_row.volume_space();
    let col = self.along_column.volume_space();
    return match (row, col) {
      (Some(a), Some(b)) if a != b => Err(malformed(
        "the two directions use different volumes"
      )),
      (a, b) => Ok(a.or(b))
    };
  }

  /// Builds the header tree for this model.
  pub fn to_tree(&self) -> Result<Element> {
    let mut matrix = Element::new("Matrix");
    if !self.metadata.is_empty() {
      let mut meta = Element::new("MetaData");
      for (k, v) in self.metadata.iter() {
        meta.children.push(
          Element::new("MD")
            .with_child(Element::new("Name").with_text(k.as_str()))
            .with_child(Element::new("Value").with_text(v.as_str()))
        );
      }
      matrix.children.push(meta);
    }
    if let Some(space) = self.shared_volume()? {
      matrix.children.push(space.to_element());
    }
    if self.along_row == self.along_column {
      matrix.children.push(write_axis_map(
        &self.along_column,
        &[Direction::AlongColumn, Direction::AlongRow]
      ));
    } else {
      for d in Direction::all() {
        matrix.children.push(write_axis_map(self.axis(*d), &[*d]));
      }
    }
    return Ok(
      Element::new("CIFTI")
        .with_attr("Version", &self.version)
        .with_child(matrix)
    );
  }

  /// Serializes this model as XML text.
  pub fn to_xml_string(&self) -> Result<String> {
    return write_document(&self.to_tree()?);
  }
}
