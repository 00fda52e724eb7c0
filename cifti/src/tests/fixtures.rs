//! Headers shared by the tests.

use crate::prelude::*;

/// A 4x4x4 volume of 2mm voxels with voxel (0, 0, 0) at (-4, -4, -4).
pub(super) fn small_volume() -> VolumeSpace {
  return VolumeSpace::new(
    [4, 4, 4],
    [2.0, 2.0, 2.0],
    [-4.0, -4.0, -4.0],
    [
      Orientation::LeftToRight,
      Orientation::PosteriorToAnterior,
      Orientation::InferiorToSuperior
    ]
  ).unwrap();
}

/// Left cortex nodes 0, 2 and 5 out of 10, then voxel (1, 1, 1).
pub(super) fn cortex_and_voxel_parts() -> Vec<BrainModelPart> {
  return vec![
    BrainModelPart::Surface(SurfacePart {
      structure: Structure::CortexLeft,
      number_of_nodes: 10,
      nodes: vec![0, 2, 5]
    }),
    BrainModelPart::Volume(VolumePart {
      space: small_volume(),
      voxels: vec![Voxel { ijk: [1, 1, 1], structure: Structure::ThalamusLeft }]
    }),
  ];
}

/// Brain models down the rows, a 10-point series with a 2s step across.
pub(super) fn dense_series() -> HeaderModel {
  let rows = AxisMap::brain_models(cortex_and_voxel_parts()).unwrap();
  let cols = AxisMap::series(10, SeriesInfo::in_seconds(0.0, 2.0)).unwrap();
  return HeaderModel::new(cols, rows);
}

/// A label table with the given (key, name) pairs.
pub(super) fn table(entries: &[(i32, &str)]) -> LabelTable {
  return entries.iter()
    .map(|(k, n)| (*k, Label::new(*n, [0.5, 0.25, 1.0])))
    .collect();
}

/// Four left cortex nodes down the rows, three label maps across.
pub(super) fn dense_labels() -> HeaderModel {
  let rows = AxisMap::brain_models(vec![
    SurfacePart::full(Structure::CortexLeft, 4).into()
  ]).unwrap();
  let cols = AxisMap::labels(vec![
    LabelMap {
      name: "first".to_string(),
      table: table(&[(0, "???"), (1, "V1"), (2, "V2")])
    },
    LabelMap {
      name: "second".to_string(),
      table: table(&[(0, "???"), (3, "V2")])
    },
    LabelMap {
      name: "third".to_string(),
      table: table(&[(0, "???"), (1, "MT")])
    },
  ]);
  return HeaderModel::new(cols, rows);
}

/// Two parcels over the left cortex and the volume, down the rows; one scalar
/// map across.
pub(super) fn parcellated() -> HeaderModel {
  let info = ParcelsInfo {
    surfaces: vec![ParcelSurface {
      structure: Structure::CortexLeft,
      number_of_nodes: 10
    }],
    volume: Some(small_volume()),
    parcels: vec![
      Parcel {
        name: "motor".to_string(),
        nodes: vec![ParcelNodes {
          structure: Structure::CortexLeft,
          nodes: vec![1, 3, 4]
        }],
        voxels: vec![]
      },
      Parcel {
        name: "thalamus & friends".to_string(),
        nodes: vec![ParcelNodes {
          structure: Structure::CortexLeft,
          nodes: vec![7]
        }],
        voxels: vec![[0, 0, 0], [3, 2, 1]]
      },
    ]
  };
  let rows = AxisMap::parcels(info).unwrap();
  return HeaderModel::new(AxisMap::scalars(["mean"]), rows);
}
