use super::fixtures::*;
use crate::prelude::*;
use crate::xml::{parse_document, write_document};

/// A dense time series header, written by hand.
const DTSERIES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<CIFTI Version="1.0">
  <Matrix>
    <MetaData>
      <MD><Name>Provenance</Name><Value>made by hand</Value></MD>
    </MetaData>
    <Volume VolumeDimensions="4,4,4">
      <TransformationMatrixVoxelIndicesIJKtoXYZ DataSpace="NIFTI_XFORM_UNKNOWN" TransformedSpace="NIFTI_XFORM_UNKNOWN" UnitsXYZ="NIFTI_UNITS_MM">
        2 0 0 -4
        0 2 0 -4
        0 0 2 -4
        0 0 0 1
      </TransformationMatrixVoxelIndicesIJKtoXYZ>
    </Volume>
    <MatrixIndicesMap AppliesToMatrixDimension="0" IndicesMapToDataType="CIFTI_INDEX_TYPE_BRAIN_MODELS">
      <BrainModel IndexOffset="0" IndexCount="3" ModelType="CIFTI_MODEL_TYPE_SURFACE" BrainStructure="CIFTI_STRUCTURE_CORTEX_LEFT" SurfaceNumberOfNodes="10">
        <NodeIndices>0 2 5</NodeIndices>
      </BrainModel>
      <BrainModel IndexOffset="3" IndexCount="1" ModelType="CIFTI_MODEL_TYPE_VOXELS" BrainStructure="CIFTI_STRUCTURE_THALAMUS_LEFT">
        <VoxelIndicesIJK>1 1 1</VoxelIndicesIJK>
      </BrainModel>
    </MatrixIndicesMap>
    <MatrixIndicesMap AppliesToMatrixDimension="1" IndicesMapToDataType="CIFTI_INDEX_TYPE_TIME_POINTS" TimeStep="2" TimeStepUnits="NIFTI_UNITS_SEC" NumberOfSeriesPoints="10"/>
  </Matrix>
</CIFTI>
"#;

/// Swaps a piece of the hand-written header for something else.
fn patched(from: &str, to: &str) -> String {
  assert!(DTSERIES.contains(from), "fixture does not contain {:?}", from);
  return DTSERIES.replace(from, to);
}

/// Asserts that XML text is rejected as a malformed header.
fn assert_rejected(text: &str) {
  match HeaderModel::from_xml_str(text) {
    Err(CiftiError::MalformedHeader(_)) => {},
    other => panic!("expected a malformed header, got {:?}", other)
  }
}

#[test]
fn hand_written_header_parses() {
  let parsed = HeaderModel::from_xml_str(DTSERIES).unwrap();
  let mut expected = dense_series();
  expected.set_metadata("Provenance", "made by hand");
  assert_eq!(parsed, expected);
  assert_eq!(parsed.version(), "1.0");
}

#[test]
fn round_trips_are_lossless() {
  let mut with_meta = dense_series();
  with_meta.set_metadata("Description", "a <tricky> & \"quoted\" value");
  let mut ms = dense_series();
  ms.reset_axis_to_series(
    Direction::AlongRow,
    7,
    SeriesInfo { start: -1.5, step: 720.0, unit: SeriesUnit::Milliseconds }
  ).unwrap();
  for header in [with_meta, ms, dense_labels(), parcellated()] {
    let text = header.to_xml_string().unwrap();
    let back = HeaderModel::from_xml_str(&text).unwrap();
    assert_eq!(back, header, "round trip changed header:\n{}", text);
  }
}

#[test]
fn mixed_voxel_structures_round_trip() {
  let voxels = vec![
    Voxel { ijk: [0, 0, 0], structure: Structure::ThalamusLeft },
    Voxel { ijk: [0, 0, 1], structure: Structure::ThalamusLeft },
    Voxel { ijk: [3, 3, 3], structure: Structure::PutamenRight },
    Voxel { ijk: [2, 0, 0], structure: Structure::ThalamusLeft },
  ];
  let rows = AxisMap::brain_models(vec![
    BrainModelPart::Volume(VolumePart { space: small_volume(), voxels }),
    BrainModelPart::Surface(SurfacePart::full(Structure::CortexRight, 2)),
  ]).unwrap();
  let header = HeaderModel::new(AxisMap::scalars(["a", "b"]), rows);
  let tree = header.to_tree().unwrap();
  let matrix = tree.child("Matrix").unwrap();
  let map = matrix.children_named("MatrixIndicesMap")
    .find(|m| m.attr("AppliesToMatrixDimension") == Some("0"))
    .unwrap();
  // three runs of voxels plus the surface
  assert_eq!(map.children_named("BrainModel").count(), 4);
  let back = HeaderModel::from_tree(&tree).unwrap();
  assert_eq!(back, header);
}

#[test]
fn equal_axes_share_one_map() {
  let rows = AxisMap::brain_models(cortex_and_voxel_parts()).unwrap();
  let header = HeaderModel::new(rows.clone(), rows);
  let tree = header.to_tree().unwrap();
  let maps: Vec<&Element> = tree.child("Matrix").unwrap()
    .children_named("MatrixIndicesMap")
    .collect();
  assert_eq!(maps.len(), 1);
  assert_eq!(maps[0].attr("AppliesToMatrixDimension"), Some("0,1"));
  assert_eq!(HeaderModel::from_tree(&tree).unwrap(), header);
}

#[test]
fn full_surface_needs_no_node_list() {
  let text = patched(
    r#"IndexCount="3" ModelType="CIFTI_MODEL_TYPE_SURFACE" BrainStructure="CIFTI_STRUCTURE_CORTEX_LEFT" SurfaceNumberOfNodes="10">
        <NodeIndices>0 2 5</NodeIndices>
      </BrainModel>
      <BrainModel IndexOffset="3""#,
    r#"IndexCount="3" ModelType="CIFTI_MODEL_TYPE_SURFACE" BrainStructure="CIFTI_STRUCTURE_CORTEX_LEFT" SurfaceNumberOfNodes="3">
      </BrainModel>
      <BrainModel IndexOffset="3""#
  );
  let header = HeaderModel::from_xml_str(&text).unwrap();
  let part = header.axis(Direction::AlongColumn)
    .surface_part(Structure::CortexLeft)
    .unwrap();
  assert_eq!(part.nodes, vec![0, 1, 2]);
}

#[test]
fn malformed_headers_are_rejected() {
  // offset doesn't follow the previous model
  assert_rejected(&patched(r#"IndexOffset="3""#, r#"IndexOffset="4""#));
  // count doesn't match the list
  assert_rejected(&patched(r#"IndexCount="3""#, r#"IndexCount="4""#));
  // unsorted nodes
  assert_rejected(&patched("0 2 5", "0 5 2"));
  // voxel list not made of triples
  assert_rejected(&patched("1 1 1</Voxel", "1 1</Voxel"));
  // unknown structure
  assert_rejected(&patched("STRUCTURE_THALAMUS_LEFT", "STRUCTURE_NOSE"));
  // unknown mapping type
  assert_rejected(&patched("CIFTI_INDEX_TYPE_TIME_POINTS", "CIFTI_INDEX_TYPE_SOUNDS"));
  // both maps on the same dimension
  assert_rejected(&patched(r#"AppliesToMatrixDimension="1""#, r#"AppliesToMatrixDimension="0""#));
  // missing series length
  assert_rejected(&patched(r#" NumberOfSeriesPoints="10""#, ""));
  // sheared volume
  assert_rejected(&patched("0 2 0 -4", "1 2 0 -4"));
  // voxels with no volume to refer to
  let start = DTSERIES.find("<Volume").unwrap();
  let end = DTSERIES.find("</Volume>").unwrap() + "</Volume>".len();
  assert_rejected(&patched(&DTSERIES[start..end], ""));
}

#[test]
fn split_volume_is_rejected() {
  let rows = AxisMap::brain_models(cortex_and_voxel_parts()).unwrap();
  let header = HeaderModel::new(AxisMap::scalars(["x"]), rows);
  let mut tree = header.to_tree().unwrap();
  let matrix = tree.children.iter_mut().find(|c| c.name == "Matrix").unwrap();
  let map = matrix.children.iter_mut()
    .find(|c| c.attr("AppliesToMatrixDimension") == Some("0"))
    .unwrap();
  // voxels, surface, voxels: two volume parts
  let mut surface = map.children.remove(0);
  let mut voxels = map.children[0].clone();
  voxels.attributes.retain(|(k, _)| k != "IndexOffset");
  voxels = voxels.with_attr("IndexOffset", 4);
  voxels.children[0].text = "2 2 2".to_string();
  map.children[0].attributes.retain(|(k, _)| k != "IndexOffset");
  map.children[0] = map.children[0].clone().with_attr("IndexOffset", 0);
  surface.attributes.retain(|(k, _)| k != "IndexOffset");
  map.children.push(surface.with_attr("IndexOffset", 1));
  map.children.push(voxels);
  match HeaderModel::from_tree(&tree) {
    Err(CiftiError::MalformedHeader(msg)) => assert!(msg.contains("volume")),
    other => panic!("expected a malformed header, got {:?}", other)
  }
}

#[test]
fn empty_volumes_are_rejected() {
  let empty = VolumePart { space: small_volume(), voxels: vec![] };
  assert!(matches!(
    AxisMap::brain_models(vec![
      SurfacePart::full(Structure::CortexLeft, 2).into(),
      empty.into()
    ]),
    Err(CiftiError::MalformedHeader(_))
  ));
  let mut info = match parcellated().axis(Direction::AlongColumn).payload() {
    MapPayload::Parcels(info) => info.clone(),
    other => panic!("expected parcels, got {:?}", other)
  };
  info.parcels[1].voxels.clear();
  assert!(matches!(
    AxisMap::parcels(info.clone()),
    Err(CiftiError::MalformedHeader(_))
  ));
  // without the volume it's fine, and survives a round trip
  info.volume = None;
  let rows = AxisMap::parcels(info).unwrap();
  let header = HeaderModel::new(AxisMap::scalars(["mean"]), rows);
  let back = HeaderModel::from_xml_str(&header.to_xml_string().unwrap()).unwrap();
  assert_eq!(back, header);
  // a voxel model listing nothing reads as an empty volume part
  let rows = AxisMap::brain_models(cortex_and_voxel_parts()).unwrap();
  let mut tree = HeaderModel::new(AxisMap::scalars(["x"]), rows).to_tree().unwrap();
  let matrix = tree.children.iter_mut().find(|c| c.name == "Matrix").unwrap();
  let map = matrix.children.iter_mut()
    .find(|c| c.attr("AppliesToMatrixDimension") == Some("0"))
    .unwrap();
  let voxels = map.children.iter_mut()
    .find(|c| c.attr("ModelType") == Some("CIFTI_MODEL_TYPE_VOXELS"))
    .unwrap();
  voxels.attributes.retain(|(k, _)| k != "IndexCount");
  *voxels = voxels.clone().with_attr("IndexCount", 0);
  voxels.children.clear();
  assert!(matches!(
    HeaderModel::from_tree(&tree),
    Err(CiftiError::MalformedHeader(_))
  ));
}

#[test]
fn different_volumes_cannot_be_written() {
  let rows = AxisMap::brain_models(cortex_and_voxel_parts()).unwrap();
  let other_space = VolumeSpace::new(
    [8, 8, 8],
    [1.0, 1.0, 1.0],
    [0.0, 0.0, 0.0],
    [
      Orientation::RightToLeft,
      Orientation::PosteriorToAnterior,
      Orientation::InferiorToSuperior
    ]
  ).unwrap();
  let cols = AxisMap::brain_models(vec![BrainModelPart::Volume(VolumePart {
    space: other_space,
    voxels: vec![Voxel { ijk: [7, 7, 7], structure: Structure::BrainStem }]
  })]).unwrap();
  let header = HeaderModel::new(cols, rows);
  assert!(matches!(header.to_tree(), Err(CiftiError::MalformedHeader(_))));
}

#[test]
fn generic_tree_round_trip() {
  let tree = Element::new("Root")
    .with_attr("a", "1 & 2")
    .with_child(Element::new("Leaf").with_text("x < y"))
    .with_child(Element::new("Empty"));
  let text = write_document(&tree).unwrap();
  assert_eq!(parse_document(&text).unwrap(), tree);
  assert!(matches!(parse_document("<a><b></a>"), Err(CiftiError::Xml(_))));
  assert!(matches!(parse_document(""), Err(CiftiError::Xml(_))));
}
